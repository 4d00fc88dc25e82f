//! Integration tests for QueryDeck.

pub mod controller_test;
pub mod grid_test;
pub mod persistence_test;
pub mod workspace_test;
