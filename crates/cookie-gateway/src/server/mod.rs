//! Axum HTTP server, routing, and the cookie-header transport.
//!
//! # Responsibilities
//! - Define the Axum router with all routes and shared middleware.
//! - Adapt request `Cookie` / response `Set-Cookie` headers to [`envelope::Transport`].
//! - Inject shared application state (`AppState`) into handlers.

pub mod handlers;
pub mod jar;
pub mod middleware;
pub mod router;
pub mod state;
