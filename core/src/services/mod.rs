//! Business services.

pub mod token;

pub use token::{CleanupConfig, CleanupJob, RotationService, TokenCodec, TokenConfig};
