//! MySQL durable/audit backend.

mod session_store;

pub use session_store::MySqlSessionStore;
