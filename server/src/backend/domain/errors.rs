use shared::FieldError;

use crate::backend::storage::StoreError;

/// Errors surfaced by the domain services
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("Validation failed: {}", describe_fields(.0))]
    Validation(Vec<FieldError>),
    #[error("{0} not found")]
    NotFound(String),
    #[error(transparent)]
    Storage(StoreError),
}

impl DomainError {
    pub fn invalid_field(field: &str, message: &str) -> Self {
        DomainError::Validation(vec![FieldError::new(field, message)])
    }
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::CatNotFound(id) => DomainError::NotFound(format!("Cat {}", id)),
            other => DomainError::Storage(other),
        }
    }
}

fn describe_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}
