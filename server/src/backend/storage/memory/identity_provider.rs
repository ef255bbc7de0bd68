//! In-memory stand-in for the hosted identity provider.
//!
//! Accounts, sessions and pending OAuth requests live in one lock-guarded
//! map set. Passwords are bcrypt-hashed on the blocking pool. The provider
//! can be switched "offline" to exercise transport failure handling.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::sync::{OnceCell, RwLock};
use tokio::time::Instant;

use crate::backend::domain::models::{Session, SessionUser};
use crate::backend::storage::traits::{
    AuthError, AuthRejection, IdentityProvider, OAuthCompletion, OAuthRedirect, SignInOutcome,
};

pub const MIN_PASSWORD_LENGTH: usize = 8;
/// How long a session stays valid after sign-in
pub const SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
/// How long a started OAuth sign-in may wait for its callback
pub const OAUTH_STATE_TTL: Duration = Duration::from_secs(10 * 60);

const OAUTH_CLIENT_ID: &str = "cat-health-tracker";
const OAUTH_SCOPES: &str = "openid email";

struct Account {
    user: SessionUser,
    /// `None` for accounts that only ever signed in through OAuth
    password_hash: Option<String>,
}

#[derive(Default)]
struct ProviderState {
    /// Keyed by normalised email
    accounts: HashMap<String, Account>,
    /// Keyed by session token
    sessions: HashMap<String, StoredSession>,
    /// Keyed by OAuth state nonce
    pending_oauth: HashMap<String, PendingOAuth>,
}

struct StoredSession {
    user: SessionUser,
    created: Instant,
}

struct PendingOAuth {
    return_to: String,
    created: Instant,
}

impl ProviderState {
    fn prune_expired(&mut self) {
        let sessions = self.sessions.len();
        let pending = self.pending_oauth.len();
        self.sessions
            .retain(|_, session| session.created.elapsed() < SESSION_TTL);
        self.pending_oauth
            .retain(|_, pending| pending.created.elapsed() < OAUTH_STATE_TTL);
        let (sessions, pending) = (
            sessions - self.sessions.len(),
            pending - self.pending_oauth.len(),
        );
        if sessions + pending > 0 {
            debug!(
                "Pruned {} expired sessions and {} abandoned OAuth requests",
                sessions, pending
            );
        }
    }
}

#[derive(Clone)]
pub struct InMemoryIdentityProvider {
    state: Arc<RwLock<ProviderState>>,
    online: Arc<AtomicBool>,
    authorize_url: String,
    redirect_uri: String,
    hash_cost: u32,
    /// Checked against when the email is unknown, so both paths cost a
    /// bcrypt verification
    dummy_hash: Arc<OnceCell<String>>,
}

impl InMemoryIdentityProvider {
    /// `authorize_url` is where OAuth sign-ins are sent, `redirect_uri` is the
    /// callback the provider returns the browser to.
    pub fn new(authorize_url: &str, redirect_uri: &str) -> Self {
        Self {
            state: Arc::new(RwLock::new(ProviderState::default())),
            online: Arc::new(AtomicBool::new(true)),
            authorize_url: authorize_url.to_string(),
            redirect_uri: redirect_uri.to_string(),
            hash_cost: bcrypt::DEFAULT_COST,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Override the bcrypt cost. Low costs are only meant for tests.
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Simulate the provider becoming unreachable (or reachable again)
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Register an account without opening a session
    pub async fn register_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Result<SessionUser, AuthRejection>, AuthError> {
        self.ensure_online()?;
        let email = normalize_email(email);
        if let Err(rejection) = validate_credentials(&email, password) {
            return Ok(Err(rejection));
        }
        if self.state.read().await.accounts.contains_key(&email) {
            return Ok(Err(AuthRejection::EmailTaken));
        }

        let password_hash = hash_password(password, self.hash_cost).await?;

        let mut state = self.state.write().await;
        // Re-check under the write lock, another sign-up may have won the race
        if state.accounts.contains_key(&email) {
            return Ok(Err(AuthRejection::EmailTaken));
        }
        let user = SessionUser {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.clone(),
        };
        state.accounts.insert(
            email,
            Account {
                user: user.clone(),
                password_hash: Some(password_hash),
            },
        );
        info!("Registered account {}", user.id);
        Ok(Ok(user))
    }

    fn ensure_online(&self) -> Result<(), AuthError> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AuthError::Transport(
                "identity provider is offline".to_string(),
            ))
        }
    }

    async fn open_session(&self, user: SessionUser) -> Session {
        let session = Session {
            token: Session::generate_token(),
            user,
        };
        let mut state = self.state.write().await;
        state.prune_expired();
        state.sessions.insert(
            session.token.clone(),
            StoredSession {
                user: session.user.clone(),
                created: Instant::now(),
            },
        );
        session
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<(), AuthRejection> {
    if !is_valid_email(email) {
        return Err(AuthRejection::InvalidEmail);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthRejection::WeakPassword(MIN_PASSWORD_LENGTH));
    }
    Ok(())
}

async fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AuthError::Transport(e.to_string()))?
        .map_err(|e| AuthError::Transport(e.to_string()))
}

async fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AuthError::Transport(e.to_string()))?
        .map_err(|e| AuthError::Transport(e.to_string()))
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn get_session(&self, token: &str) -> Result<Option<Session>, AuthError> {
        self.ensure_online()?;
        let state = self.state.read().await;
        Ok(state
            .sessions
            .get(token)
            .filter(|session| session.created.elapsed() < SESSION_TTL)
            .map(|session| Session {
                token: token.to_string(),
                user: session.user.clone(),
            }))
    }

    async fn sign_in_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignInOutcome, AuthError> {
        self.ensure_online()?;
        let email = normalize_email(email);

        let account = {
            let state = self.state.read().await;
            state
                .accounts
                .get(&email)
                .and_then(|a| a.password_hash.clone().map(|hash| (a.user.clone(), hash)))
        };

        let Some((user, hash)) = account else {
            // Same bcrypt work as a wrong password
            let dummy_hash = self
                .dummy_hash
                .get_or_try_init(|| hash_password("not-a-real-password", self.hash_cost))
                .await?;
            verify_password(password, dummy_hash).await?;
            warn!("Sign-in rejected: no password account for the given email");
            return Ok(SignInOutcome::Rejected(AuthRejection::InvalidCredentials));
        };

        if !verify_password(password, &hash).await? {
            warn!("Sign-in rejected for user {}: wrong password", user.id);
            return Ok(SignInOutcome::Rejected(AuthRejection::InvalidCredentials));
        }

        info!("User {} signed in with email", user.id);
        Ok(SignInOutcome::SignedIn(self.open_session(user).await))
    }

    async fn sign_up_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignInOutcome, AuthError> {
        match self.register_account(email, password).await? {
            Ok(user) => Ok(SignInOutcome::SignedIn(self.open_session(user).await)),
            Err(rejection) => Ok(SignInOutcome::Rejected(rejection)),
        }
    }

    async fn sign_in_with_google(&self, return_to: &str) -> Result<OAuthRedirect, AuthError> {
        self.ensure_online()?;
        let state = uuid::Uuid::new_v4().to_string();
        {
            let mut provider_state = self.state.write().await;
            provider_state.prune_expired();
            provider_state.pending_oauth.insert(
                state.clone(),
                PendingOAuth {
                    return_to: return_to.to_string(),
                    created: Instant::now(),
                },
            );
        }

        let authorize_url = format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            self.authorize_url,
            urlencoding::encode(OAUTH_CLIENT_ID),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(OAUTH_SCOPES),
            urlencoding::encode(&state),
        );
        Ok(OAuthRedirect {
            authorize_url,
            state,
        })
    }

    async fn complete_oauth(&self, state: &str, email: &str) -> Result<OAuthCompletion, AuthError> {
        self.ensure_online()?;
        let pending = self.state.write().await.pending_oauth.remove(state);
        let Some(PendingOAuth { return_to, .. }) =
            pending.filter(|pending| pending.created.elapsed() < OAUTH_STATE_TTL)
        else {
            warn!("OAuth callback with unknown or expired state");
            return Ok(OAuthCompletion {
                outcome: SignInOutcome::Rejected(AuthRejection::UnknownOAuthState),
                return_to: "/".to_string(),
            });
        };

        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Ok(OAuthCompletion {
                outcome: SignInOutcome::Rejected(AuthRejection::InvalidEmail),
                return_to,
            });
        }

        let user = {
            let mut provider_state = self.state.write().await;
            provider_state
                .accounts
                .entry(email.clone())
                .or_insert_with(|| Account {
                    user: SessionUser {
                        id: uuid::Uuid::new_v4().to_string(),
                        email,
                    },
                    password_hash: None,
                })
                .user
                .clone()
        };

        info!("User {} signed in with Google", user.id);
        Ok(OAuthCompletion {
            outcome: SignInOutcome::SignedIn(self.open_session(user).await),
            return_to,
        })
    }

    async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        self.ensure_online()?;
        if let Some(session) = self.state.write().await.sessions.remove(token) {
            info!("User {} signed out", session.user.id);
        }
        Ok(())
    }
}
