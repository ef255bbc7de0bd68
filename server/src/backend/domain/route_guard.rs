//! # Route Guard
//!
//! Decorates any [`Screen`] with the "must be signed in" precondition.
//!
//! While the gate is still checking, the guard shows a placeholder. A signed
//! out client is sent to the login screen with the requested path in
//! `callbackUrl`, so it can come back after signing in. The wrapped screen
//! only renders once the gate says `Authenticated`.

use log::warn;

use super::auth_gate::{AuthGate, AuthState};
use super::models::SessionUser;

pub const LOGIN_PATH: &str = "/auth/login";
pub const CALLBACK_PARAM: &str = "callbackUrl";

/// Anything that can be rendered for a signed-in user
pub trait Screen {
    type Output;

    fn render(&self, user: &SessionUser) -> Self::Output;
}

impl<F, T> Screen for F
where
    F: Fn(&SessionUser) -> T,
{
    type Output = T;

    fn render(&self, user: &SessionUser) -> T {
        self(user)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome<T> {
    /// Auth state not known yet; show a loading placeholder
    Placeholder,
    /// Navigate to this location instead of rendering
    Redirect(String),
    Render(T),
}

pub struct RouteGuard;

impl RouteGuard {
    pub fn wrap<S: Screen>(screen: S) -> Guarded<S> {
        Guarded { screen }
    }

    /// Login location that returns to `requested_path` afterwards
    pub fn login_redirect(requested_path: &str) -> String {
        format!(
            "{}?{}={}",
            LOGIN_PATH,
            CALLBACK_PARAM,
            urlencoding::encode(requested_path)
        )
    }

    /// Only same-origin absolute paths are allowed as post-login targets.
    /// Anything else becomes `/`.
    pub fn sanitize_callback(callback: Option<&str>) -> String {
        match callback {
            Some(path)
                if path.starts_with('/')
                    && !path.starts_with("//")
                    && !path.contains('\\')
                    && !path.chars().any(char::is_control) =>
            {
                path.to_string()
            }
            _ => "/".to_string(),
        }
    }
}

/// A screen behind the guard
pub struct Guarded<S> {
    screen: S,
}

impl<S: Screen> Guarded<S> {
    /// Decide what to show for the current auth state
    pub fn resolve(&self, state: &AuthState, requested_path: &str) -> GuardOutcome<S::Output> {
        match state {
            AuthState::Unknown | AuthState::Checking => GuardOutcome::Placeholder,
            AuthState::Unauthenticated => {
                GuardOutcome::Redirect(RouteGuard::login_redirect(requested_path))
            }
            AuthState::Authenticated(user) => GuardOutcome::Render(self.screen.render(user)),
        }
    }

    /// Drive the gate to a settled state, then resolve.
    ///
    /// If the gate cannot settle, the client goes to the plain login screen
    /// instead of waiting forever.
    pub async fn resolve_with(
        &self,
        gate: &mut AuthGate,
        requested_path: &str,
    ) -> GuardOutcome<S::Output> {
        if !gate.state().is_resolved() {
            if let Err(err) = gate.refresh().await {
                warn!(
                    "Guard for {} could not check session: {}",
                    requested_path, err
                );
                return GuardOutcome::Redirect(LOGIN_PATH.to_string());
            }
        }
        self.resolve(gate.state(), requested_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::InMemoryIdentityProvider;
    use std::cell::Cell;
    use std::sync::Arc;

    fn user() -> SessionUser {
        SessionUser {
            id: "u1".to_string(),
            email: "owner@example.com".to_string(),
        }
    }

    #[test]
    fn test_guard_follows_gate_transitions() {
        let renders = Cell::new(0);
        let guarded = RouteGuard::wrap(|user: &SessionUser| {
            renders.set(renders.get() + 1);
            format!("cat page for {}", user.email)
        });

        assert_eq!(
            guarded.resolve(&AuthState::Checking, "/cats/1"),
            GuardOutcome::Placeholder
        );
        assert_eq!(renders.get(), 0);

        assert_eq!(
            guarded.resolve(&AuthState::Unauthenticated, "/cats/1"),
            GuardOutcome::Redirect("/auth/login?callbackUrl=%2Fcats%2F1".to_string())
        );
        assert_eq!(renders.get(), 0);

        assert_eq!(
            guarded.resolve(&AuthState::Authenticated(user()), "/cats/1"),
            GuardOutcome::Render("cat page for owner@example.com".to_string())
        );
        assert_eq!(renders.get(), 1);
    }

    #[test]
    fn test_unknown_state_shows_placeholder() {
        let guarded = RouteGuard::wrap(|_: &SessionUser| ());
        assert_eq!(
            guarded.resolve(&AuthState::Unknown, "/profile"),
            GuardOutcome::Placeholder
        );
    }

    #[test]
    fn test_login_redirect_encodes_query() {
        assert_eq!(
            RouteGuard::login_redirect("/cats/1/edit?tab=weights"),
            "/auth/login?callbackUrl=%2Fcats%2F1%2Fedit%3Ftab%3Dweights"
        );
    }

    #[test]
    fn test_sanitize_callback() {
        assert_eq!(RouteGuard::sanitize_callback(Some("/cats/1")), "/cats/1");
        assert_eq!(RouteGuard::sanitize_callback(None), "/");
        assert_eq!(
            RouteGuard::sanitize_callback(Some("https://evil.example")),
            "/"
        );
        assert_eq!(RouteGuard::sanitize_callback(Some("//evil.example")), "/");
        assert_eq!(RouteGuard::sanitize_callback(Some("/\\evil.example")), "/");
    }

    #[tokio::test]
    async fn test_resolve_with_unreachable_provider_goes_to_plain_login() {
        let provider = Arc::new(
            InMemoryIdentityProvider::new("https://accounts.example.com", "http://localhost/cb")
                .with_hash_cost(4),
        );
        provider.set_online(false);

        let mut gate = AuthGate::new(provider, Some("stale-token".to_string()));
        let guarded = RouteGuard::wrap(|_: &SessionUser| "secret");

        assert_eq!(
            guarded.resolve_with(&mut gate, "/cats/1").await,
            GuardOutcome::Redirect(LOGIN_PATH.to_string())
        );
        assert_eq!(gate.state(), &AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_resolve_with_authenticated_gate_renders() {
        let provider = Arc::new(
            InMemoryIdentityProvider::new("https://accounts.example.com", "http://localhost/cb")
                .with_hash_cost(4),
        );
        let mut gate = AuthGate::new(provider, None);
        gate.sign_up_with_email("owner@example.com", "correct horse")
            .await
            .unwrap();

        let guarded = RouteGuard::wrap(|user: &SessionUser| user.email.clone());
        assert_eq!(
            guarded.resolve_with(&mut gate, "/cats/1").await,
            GuardOutcome::Render("owner@example.com".to_string())
        );
    }
}
