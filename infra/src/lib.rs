//! # TokenGate Infrastructure
//!
//! Session store backends implementing the core `SessionStore` abstraction:
//! a Redis TTL store (single active session per key, entries self-expire) and
//! a MySQL durable store (audit trail, swept by the cleanup job). Exactly one
//! backend is wired at a time.

pub mod config;
pub mod mysql;
pub mod redis;

pub use config::{DatabaseConfig, StoreConfig};
pub use mysql::MySqlSessionStore;
pub use redis::RedisSessionStore;
