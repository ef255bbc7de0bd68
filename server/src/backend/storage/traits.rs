//! # Storage Traits
//!
//! Abstractions over the collaborators the domain layer talks to: the cat
//! record store and the external identity provider. The in-memory
//! implementations live in [`super::memory`]; a database or a hosted identity
//! service can be swapped in without touching the domain.

use async_trait::async_trait;

use crate::backend::domain::models::{
    Cat, CatFields, NewVaccination, NewVetVisit, NewWeight, Session, Vaccination, VetVisit, Weight,
};

/// Failures reported by a [`CatStorage`] implementation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("Cat not found: {0}")]
    CatNotFound(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Interface for cat record storage.
///
/// Lookups of a missing cat return `Ok(None)`. Operations addressed at a
/// missing cat fail with [`StoreError::CatNotFound`] and leave the store
/// untouched, except `delete_cat`, which is idempotent. Deleting a missing
/// health record from an existing cat is a no-op.
#[async_trait]
pub trait CatStorage: Send + Sync {
    /// All cats in insertion order
    async fn list_cats(&self) -> Result<Vec<Cat>, StoreError>;

    async fn get_cat(&self, cat_id: &str) -> Result<Option<Cat>, StoreError>;

    /// Store a new cat under a fresh id with empty health collections
    async fn create_cat(&self, fields: CatFields) -> Result<Cat, StoreError>;

    /// Replace the mutable fields of an existing cat
    async fn update_cat(&self, cat_id: &str, fields: CatFields) -> Result<Cat, StoreError>;

    async fn delete_cat(&self, cat_id: &str) -> Result<(), StoreError>;

    async fn add_weight(&self, cat_id: &str, weight: NewWeight) -> Result<Weight, StoreError>;

    async fn delete_weight(&self, cat_id: &str, weight_id: &str) -> Result<(), StoreError>;

    async fn add_vet_visit(&self, cat_id: &str, visit: NewVetVisit) -> Result<VetVisit, StoreError>;

    async fn delete_vet_visit(&self, cat_id: &str, visit_id: &str) -> Result<(), StoreError>;

    async fn add_vaccination(
        &self,
        cat_id: &str,
        vaccination: NewVaccination,
    ) -> Result<Vaccination, StoreError>;

    async fn delete_vaccination(
        &self,
        cat_id: &str,
        vaccination_id: &str,
    ) -> Result<(), StoreError>;
}

/// The identity provider could not be reached or answered garbage.
///
/// "No session" and "wrong password" are not errors; see [`SignInOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Identity provider unavailable: {0}")]
    Transport(String),
}

/// Reasons the identity provider refused a sign-in or sign-up
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthRejection {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("An account with this email already exists")]
    EmailTaken,
    #[error("Password must be at least {0} characters")]
    WeakPassword(usize),
    #[error("Email address is not valid")]
    InvalidEmail,
    #[error("Sign-in request expired or was never started")]
    UnknownOAuthState,
}

impl AuthRejection {
    /// The login form field the rejection belongs to
    pub fn field(&self) -> &'static str {
        match self {
            AuthRejection::InvalidCredentials | AuthRejection::WeakPassword(_) => "password",
            AuthRejection::EmailTaken | AuthRejection::InvalidEmail => "email",
            AuthRejection::UnknownOAuthState => "state",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInOutcome {
    SignedIn(Session),
    Rejected(AuthRejection),
}

/// Where to send the browser to start an OAuth sign-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthRedirect {
    pub authorize_url: String,
    pub state: String,
}

/// Result of the provider calling back after an OAuth sign-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthCompletion {
    pub outcome: SignInOutcome,
    /// The path the user was trying to reach when the flow started
    pub return_to: String,
}

/// Interface to the external identity provider
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Look up the session behind a token. `Ok(None)` when there is none.
    async fn get_session(&self, token: &str) -> Result<Option<Session>, AuthError>;

    async fn sign_in_with_email(&self, email: &str, password: &str)
        -> Result<SignInOutcome, AuthError>;

    /// Register a new account and sign it in
    async fn sign_up_with_email(&self, email: &str, password: &str)
        -> Result<SignInOutcome, AuthError>;

    /// Start the Google OAuth flow. The session only exists once the
    /// provider calls back through [`IdentityProvider::complete_oauth`].
    async fn sign_in_with_google(&self, return_to: &str) -> Result<OAuthRedirect, AuthError>;

    async fn complete_oauth(&self, state: &str, email: &str) -> Result<OAuthCompletion, AuthError>;

    /// End a session. Unknown tokens are ignored.
    async fn sign_out(&self, token: &str) -> Result<(), AuthError>;
}
