use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use log::{error, warn};
use shared::{ErrorResponse, FieldError};

use crate::backend::domain::DomainError;
use crate::backend::storage::{AuthError, AuthRejection, StoreError};

/// Everything a handler can fail with, mapped to a status and an
/// [`ErrorResponse`] body
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Rejected(#[from] AuthRejection),
    #[error("Not signed in")]
    Unauthenticated,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(DomainError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Domain(DomainError::NotFound(_))
            | ApiError::Domain(DomainError::Storage(StoreError::CatNotFound(_))) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Domain(DomainError::Storage(StoreError::Unavailable(_)))
            | ApiError::Auth(AuthError::Transport(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Rejected(rejection) => match rejection {
                AuthRejection::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthRejection::EmailTaken => StatusCode::CONFLICT,
                AuthRejection::WeakPassword(_) | AuthRejection::InvalidEmail => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                AuthRejection::UnknownOAuthState => StatusCode::BAD_REQUEST,
            },
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
        }
    }

    fn field_errors(&self) -> Vec<FieldError> {
        match self {
            ApiError::Domain(DomainError::Validation(errors)) => errors.clone(),
            ApiError::Rejected(rejection) => {
                vec![FieldError::new(rejection.field(), &rejection.to_string())]
            }
            _ => Vec::new(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected ({}): {}", status.as_u16(), self);
        }

        let body = ErrorResponse {
            error: self.to_string(),
            field_errors: self.field_errors(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let validation = ApiError::from(DomainError::invalid_field("name", "Name is required"));
        assert_eq!(validation.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(validation.field_errors()[0].field, "name");

        assert_eq!(
            ApiError::from(DomainError::NotFound("Cat 9".to_string())).status(),
            StatusCode::NOT_FOUND
        );
        let outage = StoreError::Unavailable("down".to_string());
        assert_eq!(
            ApiError::from(DomainError::Storage(outage)).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(AuthRejection::EmailTaken).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(ApiError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_rejection_carries_its_field() {
        let errors = ApiError::from(AuthRejection::InvalidCredentials).field_errors();
        assert_eq!(
            errors,
            vec![FieldError::new("password", "Invalid email or password")]
        );
    }
}
