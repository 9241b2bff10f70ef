//! Session and token lifecycle services:
//! - stateless signing and verification of access/refresh JWTs
//! - refresh-token rotation with reuse detection
//! - revocation, single-session and all-devices
//! - background cleanup of expired durable rows

mod cleanup;
mod codec;
mod config;
mod rotation;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupConfig, CleanupJob};
pub use codec::TokenCodec;
pub use config::TokenConfig;
pub use rotation::RotationService;
