//! Workspace state: the open sessions, the active pointer, and the store
//! that persists them together with the query history.

mod session;
mod store;

pub use session::{PersistedState, Session, Workspace, SCRATCH_ID_PREFIX};
pub use store::SessionStore;
