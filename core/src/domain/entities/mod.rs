//! Domain entities.

pub mod principal;
pub mod token;

pub use principal::{Principal, SessionKey};
pub use token::{Claims, TokenPair, TokenType, JWT_AUDIENCE, JWT_ISSUER};
