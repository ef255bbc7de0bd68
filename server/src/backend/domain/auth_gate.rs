//! # Auth Gate
//!
//! Answers "who, if anyone, is signed in" for one client and performs the
//! sign-in and sign-out side effects against the identity provider.
//!
//! ```text
//! Unknown ──refresh──▶ Checking ──▶ Authenticated(user)
//!                          │                │  ▲
//!                          ▼      sign_out  ▼  │ sign_in
//!                    Unauthenticated ◀──────┘──┘
//! ```
//!
//! `Checking` is the only state in which the gate waits on the provider. A
//! provider that cannot be reached resolves the gate to `Unauthenticated`.

use std::sync::Arc;

use log::{info, warn};

use super::models::{Session, SessionUser};
use crate::backend::storage::{AuthError, IdentityProvider, OAuthRedirect, SignInOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unknown,
    Checking,
    Authenticated(SessionUser),
    Unauthenticated,
}

impl AuthState {
    /// Whether the gate has settled on an answer
    pub fn is_resolved(&self) -> bool {
        matches!(
            self,
            AuthState::Authenticated(_) | AuthState::Unauthenticated
        )
    }

    pub fn user(&self) -> Option<&SessionUser> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

pub struct AuthGate {
    provider: Arc<dyn IdentityProvider>,
    token: Option<String>,
    state: AuthState,
}

impl AuthGate {
    /// A gate for a client presenting `token` (if any). Starts `Unknown`.
    pub fn new(provider: Arc<dyn IdentityProvider>, token: Option<String>) -> Self {
        Self {
            provider,
            token,
            state: AuthState::Unknown,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// The session token to hand back to the client
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Enter `Checking`. Called on mount and on explicit refresh.
    pub fn begin_check(&mut self) {
        self.state = AuthState::Checking;
    }

    /// Settle a check with the provider's answer. Transport failures settle
    /// to `Unauthenticated` and are handed back to the caller.
    pub fn complete_check(
        &mut self,
        result: Result<Option<Session>, AuthError>,
    ) -> Result<(), AuthError> {
        match result {
            Ok(Some(session)) => {
                self.state = AuthState::Authenticated(session.user);
                Ok(())
            }
            Ok(None) => {
                self.token = None;
                self.state = AuthState::Unauthenticated;
                Ok(())
            }
            Err(err) => {
                warn!(
                    "Session check failed, treating client as signed out: {}",
                    err
                );
                self.state = AuthState::Unauthenticated;
                Err(err)
            }
        }
    }

    /// Ask the provider for the current session
    pub async fn refresh(&mut self) -> Result<&AuthState, AuthError> {
        self.begin_check();
        let result = match self.token.as_deref() {
            Some(token) => self.provider.get_session(token).await,
            None => Ok(None),
        };
        self.complete_check(result)?;
        Ok(&self.state)
    }

    /// Sign in with email and password.
    ///
    /// A rejection is returned as a value and leaves the state untouched.
    pub async fn sign_in_with_email(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<SignInOutcome, AuthError> {
        let outcome = self.provider.sign_in_with_email(email, password).await?;
        self.accept(&outcome);
        Ok(outcome)
    }

    pub async fn sign_up_with_email(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<SignInOutcome, AuthError> {
        let outcome = self.provider.sign_up_with_email(email, password).await?;
        self.accept(&outcome);
        Ok(outcome)
    }

    /// Start the Google flow. The state does not change here; the session
    /// shows up on a later `refresh`.
    pub async fn sign_in_with_google(&self, return_to: &str) -> Result<OAuthRedirect, AuthError> {
        self.provider.sign_in_with_google(return_to).await
    }

    /// Sign out. Local state is cleared even when the provider is
    /// unreachable.
    pub async fn sign_out(&mut self) -> Result<(), AuthError> {
        let result = match self.token.take() {
            Some(token) => self.provider.sign_out(&token).await,
            None => Ok(()),
        };
        self.state = AuthState::Unauthenticated;
        result
    }

    fn accept(&mut self, outcome: &SignInOutcome) {
        if let SignInOutcome::SignedIn(session) = outcome {
            info!("Gate authenticated user {}", session.user.id);
            self.token = Some(session.token.clone());
            self.state = AuthState::Authenticated(session.user.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::{AuthRejection, InMemoryIdentityProvider};

    fn provider() -> Arc<InMemoryIdentityProvider> {
        Arc::new(
            InMemoryIdentityProvider::new(
                "https://accounts.example.com/o/oauth2/auth",
                "http://localhost:3000/api/auth/google/callback",
            )
            .with_hash_cost(4),
        )
    }

    #[tokio::test]
    async fn test_gate_without_token_resolves_unauthenticated() {
        let mut gate = AuthGate::new(provider(), None);
        assert_eq!(gate.state(), &AuthState::Unknown);

        let state = gate.refresh().await.unwrap();
        assert_eq!(state, &AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_begin_check_enters_checking() {
        let mut gate = AuthGate::new(provider(), Some("token".to_string()));
        gate.begin_check();
        assert_eq!(gate.state(), &AuthState::Checking);
        assert!(!gate.state().is_resolved());
    }

    #[tokio::test]
    async fn test_unregistered_sign_in_keeps_session_absent() {
        let mut gate = AuthGate::new(provider(), None);
        gate.refresh().await.unwrap();

        let outcome = gate
            .sign_in_with_email("stranger@example.com", "password123")
            .await
            .unwrap();
        assert_eq!(
            outcome,
            SignInOutcome::Rejected(AuthRejection::InvalidCredentials)
        );

        assert_eq!(gate.refresh().await.unwrap(), &AuthState::Unauthenticated);
        assert!(gate.token().is_none());
    }

    #[tokio::test]
    async fn test_sign_up_sign_out_sign_in_cycle() {
        let provider = provider();
        let mut gate = AuthGate::new(provider.clone(), None);

        gate.sign_up_with_email("owner@example.com", "correct horse")
            .await
            .unwrap();
        let user = gate.state().user().cloned().expect("signed in after sign-up");
        assert_eq!(user.email, "owner@example.com");

        // A second gate presenting the same token sees the same user
        let mut other = AuthGate::new(provider.clone(), gate.token().map(str::to_string));
        assert_eq!(
            other.refresh().await.unwrap(),
            &AuthState::Authenticated(user.clone())
        );

        gate.sign_out().await.unwrap();
        assert_eq!(gate.state(), &AuthState::Unauthenticated);
        assert_eq!(other.refresh().await.unwrap(), &AuthState::Unauthenticated);

        gate.sign_in_with_email("owner@example.com", "correct horse")
            .await
            .unwrap();
        assert_eq!(gate.state(), &AuthState::Authenticated(user));
    }

    #[tokio::test]
    async fn test_transport_failure_fails_safe() {
        let provider = provider();
        let mut gate = AuthGate::new(provider.clone(), None);
        gate.sign_up_with_email("owner@example.com", "correct horse")
            .await
            .unwrap();

        provider.set_online(false);
        let err = gate.refresh().await.unwrap_err();
        assert!(matches!(err, AuthError::Transport(_)));
        assert_eq!(gate.state(), &AuthState::Unauthenticated);

        // Signing out while offline still clears the local state
        assert!(gate.sign_out().await.is_err());
        assert!(gate.token().is_none());
        assert_eq!(gate.state(), &AuthState::Unauthenticated);
    }
}
