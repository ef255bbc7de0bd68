//! # Domain Module
//!
//! Business logic for the cat health tracker, independent of HTTP and of
//! the storage backend.
//!
//! ## Module Organization
//!
//! - **models**: cats, health records and sessions
//! - **validation**: field-level checks run before anything reaches the store
//! - **cat_service** / **health_record_service**: CRUD over the cat store
//! - **image_service**: mock image upload
//! - **auth_gate**: per-client authentication state machine
//! - **route_guard**: decorates protected screens with the auth precondition
//!
//! Every signed-in user sees the same global list of cats.

pub mod auth_gate;
pub mod cat_service;
pub mod errors;
pub mod health_record_service;
pub mod image_service;
pub mod models;
pub mod route_guard;
pub mod validation;

pub use auth_gate::{AuthGate, AuthState};
pub use cat_service::CatService;
pub use errors::DomainError;
pub use health_record_service::HealthRecordService;
pub use image_service::ImageService;
pub use route_guard::{GuardOutcome, Guarded, RouteGuard, Screen};
