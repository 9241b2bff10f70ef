//! Session lifecycle routes.

mod create;
mod logout;
mod me;
mod refresh;

use std::sync::Arc;

use tg_core::services::token::RotationService;

pub use create::create_session;
pub use logout::logout;
pub use me::me;
pub use refresh::refresh_session;

/// Shared application state for the session routes.
pub struct AppState {
    pub sessions: Arc<RotationService>,
}

impl AppState {
    pub fn new(sessions: Arc<RotationService>) -> Self {
        Self { sessions }
    }
}
