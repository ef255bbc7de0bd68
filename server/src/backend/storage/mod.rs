//! # Storage Module
//!
//! Data persistence and the external identity collaborator.
//!
//! The domain layer only sees the traits in [`traits`]. The current
//! implementations are in-memory mocks: the cat store resets on restart and
//! the identity provider keeps accounts and sessions in process.

pub mod memory;
pub mod traits;

pub use memory::{InMemoryCatStore, InMemoryIdentityProvider};
pub use traits::{
    AuthError, AuthRejection, CatStorage, IdentityProvider, OAuthCompletion, OAuthRedirect,
    SignInOutcome, StoreError,
};
