//! # Seatwise Server
//!
//! Axum HTTP surface for the Seatwise event booking platform.
//!
//! The server wires the `seatwise-core` booking service to the wire
//! contract the existing frontend speaks: public event listings,
//! authenticated booking endpoints, and administrative event management.
//! Authentication itself happens upstream — handlers receive a verified
//! `(user_id, role)` identity resolved from the bearer token and trust it.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use auth::{CallerIdentity, IdentityProvider, RequireAdmin, StaticTokenDirectory};
pub use config::Config;
pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
