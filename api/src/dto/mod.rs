//! Request and response DTOs.

pub mod session;

pub use session::{
    ErrorBody, IssueSessionRequest, LogoutRequest, PrincipalResponse, RefreshRequest,
    SessionResponse,
};
