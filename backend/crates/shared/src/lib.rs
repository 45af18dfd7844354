//! Shared Kernel - Domain-crossing minimal core
//!
//! The smallest shared vocabulary of the gateway:
//! - Unified error type ([`error::app_error::AppError`]) and result alias
//! - Error classification mapped onto HTTP status codes
//! - HTTP rendering (RFC 7807) behind the `axum` feature

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
