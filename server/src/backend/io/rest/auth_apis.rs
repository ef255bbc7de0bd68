//! # REST API for Authentication
//!
//! Sign-in, sign-up, Google OAuth, sign-out and session lookup. None of these
//! routes are guarded. A successful sign-in sets the session cookie and
//! tells the client where to go next, taken from `callbackUrl`.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Redirect},
};
use log::{info, warn};
use serde::Deserialize;
use shared::{SignInRequest, SignUpRequest};

use super::error::ApiError;
use super::mappers::SessionMapper;
use super::session_cookie::{cleared_session_cookie, session_cookie, session_token};
use crate::backend::domain::{AuthGate, RouteGuard};
use crate::backend::storage::SignInOutcome;
use crate::backend::AppState;

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
    pub state: String,
    /// The address the provider vouched for
    pub email: String,
}

pub async fn login(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
    Json(request): Json<SignInRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("POST /api/auth/login for {}", request.email);

    let mut gate = AuthGate::new(state.identity.clone(), None);
    let outcome = gate
        .sign_in_with_email(&request.email, &request.password)
        .await?;
    match outcome {
        SignInOutcome::SignedIn(session) => {
            let redirect_to = RouteGuard::sanitize_callback(query.callback_url.as_deref());
            Ok((
                [(header::SET_COOKIE, session_cookie(&session.token))],
                Json(SessionMapper::to_session_response(
                    session.user,
                    Some(redirect_to),
                )),
            ))
        }
        SignInOutcome::Rejected(rejection) => Err(rejection.into()),
    }
}

pub async fn signup(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
    Json(request): Json<SignUpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("POST /api/auth/signup for {}", request.email);

    let mut gate = AuthGate::new(state.identity.clone(), None);
    let outcome = gate
        .sign_up_with_email(&request.email, &request.password)
        .await?;
    match outcome {
        SignInOutcome::SignedIn(session) => {
            let redirect_to = RouteGuard::sanitize_callback(query.callback_url.as_deref());
            Ok((
                StatusCode::CREATED,
                [(header::SET_COOKIE, session_cookie(&session.token))],
                Json(SessionMapper::to_session_response(
                    session.user,
                    Some(redirect_to),
                )),
            ))
        }
        SignInOutcome::Rejected(rejection) => Err(rejection.into()),
    }
}

/// Send the browser to the provider's consent screen
pub async fn google_sign_in(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<impl IntoResponse, ApiError> {
    info!("GET /api/auth/google - callback: {:?}", query.callback_url);

    let return_to = RouteGuard::sanitize_callback(query.callback_url.as_deref());
    let gate = AuthGate::new(state.identity.clone(), None);
    let redirect = gate.sign_in_with_google(&return_to).await?;
    Ok(Redirect::to(&redirect.authorize_url))
}

/// The provider returns here once the user has consented
pub async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<OAuthCallbackQuery>,
) -> Result<impl IntoResponse, ApiError> {
    info!("GET /api/auth/google/callback");

    let completion = state
        .identity
        .complete_oauth(&query.state, &query.email)
        .await?;
    match completion.outcome {
        SignInOutcome::SignedIn(session) => {
            info!("OAuth sign-in for user {} complete", session.user.id);
            Ok((
                [(header::SET_COOKIE, session_cookie(&session.token))],
                Redirect::to(&completion.return_to),
            ))
        }
        SignInOutcome::Rejected(rejection) => Err(rejection.into()),
    }
}

/// Sign out. The cookie is cleared even if the provider cannot be reached.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    info!("POST /api/auth/logout");

    let mut gate = AuthGate::new(state.identity.clone(), session_token(&headers));
    if let Err(e) = gate.sign_out().await {
        warn!("Provider sign-out failed, clearing cookie anyway: {}", e);
    }
    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, cleared_session_cookie())],
    )
}

/// The signed-in user, or 401
pub async fn get_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    info!("GET /api/auth/session");

    let mut gate = AuthGate::new(state.identity.clone(), session_token(&headers));
    let user = gate.refresh().await?.user().cloned();
    match user {
        Some(user) => Ok(Json(SessionMapper::to_session_response(user, None))),
        None => Err(ApiError::Unauthenticated),
    }
}
