use shared::{SessionResponse, SessionUser as SessionUserDto};

use crate::backend::domain::models::SessionUser;

pub struct SessionMapper;

impl SessionMapper {
    pub fn to_dto(domain: SessionUser) -> SessionUserDto {
        SessionUserDto {
            id: domain.id,
            email: domain.email,
        }
    }

    pub fn to_session_response(user: SessionUser, redirect_to: Option<String>) -> SessionResponse {
        SessionResponse {
            user: Self::to_dto(user),
            redirect_to,
        }
    }
}
