//! # REST API Interface Layer
//!
//! One module per resource, plus the session cookie helpers, the
//! `require_session` middleware that puts the route guard in front of the
//! private routes, and the error type every handler returns.

pub mod auth_apis;
pub mod cat_apis;
pub mod error;
pub mod guard;
pub mod health_record_apis;
pub mod image_apis;
pub mod mappers;
pub mod session_cookie;

pub use error::ApiError;
