//! # TokenGate API
//!
//! HTTP surface for the session lifecycle core: session issue/refresh/logout
//! endpoints and the bearer-token authentication gateway.

pub mod app;
pub mod config;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
