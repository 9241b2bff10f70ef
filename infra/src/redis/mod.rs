//! Redis TTL backend.

mod session_store;

pub use session_store::RedisSessionStore;
