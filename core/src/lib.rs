//! # TokenGate Core
//!
//! Core domain and session lifecycle logic for TokenGate.
//! This crate contains the token entities, the session store abstraction,
//! the token codec, the rotation state machine, and the cleanup job.

pub mod domain;
pub mod errors;
pub mod services;
pub mod stores;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
pub use stores::*;
