//! Domain layer: entities carried by tokens and session records.

pub mod entities;

pub use entities::*;
