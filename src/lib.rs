//! QueryDeck - workspace and result-grid engine for a query editor.
//!
//! Manages query sessions with a persisted workspace and a bounded history,
//! decodes delimited row data, and runs it through a filter, sort, paginate
//! and export pipeline. Presentation layers drive it through
//! [`controller::WorkspaceController`].

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod grid;
pub mod logging;
pub mod persistence;
pub mod workspace;
