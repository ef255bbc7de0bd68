//! Middleware that puts the route guard in front of private routes.
//!
//! A signed-in request continues with its [`SessionUser`] in the request
//! extensions. Anything else is answered with a redirect to the login page.

use axum::{
    extract::{OriginalUri, Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use log::info;

use super::session_cookie::{cleared_session_cookie, session_token};
use crate::backend::domain::models::SessionUser;
use crate::backend::domain::route_guard::LOGIN_PATH;
use crate::backend::domain::{AuthGate, GuardOutcome, RouteGuard};
use crate::backend::AppState;

pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    // Nested routers see a stripped uri; the callback needs the full one
    let uri = request
        .extensions()
        .get::<OriginalUri>()
        .map(|original| original.0.clone())
        .unwrap_or_else(|| request.uri().clone());
    let requested_path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    let presented_token = session_token(request.headers());
    let had_token = presented_token.is_some();
    let mut gate = AuthGate::new(state.identity.clone(), presented_token);
    let guarded = RouteGuard::wrap(|user: &SessionUser| user.clone());

    let outcome = guarded.resolve_with(&mut gate, &requested_path).await;
    match outcome {
        GuardOutcome::Render(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        GuardOutcome::Redirect(location) => {
            info!(
                "Unauthenticated request for {}, redirecting to {}",
                requested_path, location
            );
            let redirect = Redirect::to(&location);
            if had_token && gate.token().is_none() {
                // The presented session is gone; drop the stale cookie too
                ([(header::SET_COOKIE, cleared_session_cookie())], redirect).into_response()
            } else {
                redirect.into_response()
            }
        }
        // resolve_with always settles the gate first
        GuardOutcome::Placeholder => Redirect::to(LOGIN_PATH).into_response(),
    }
}
