/// The identity behind an authenticated session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
}

/// An authenticated session issued by the identity provider.
///
/// The token is what the client presents on later requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
}

impl Session {
    pub fn generate_token() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}
