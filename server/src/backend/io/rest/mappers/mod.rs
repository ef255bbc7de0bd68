//! Translation between the shared wire types and the domain models.

pub mod cat_mapper;
pub mod session_mapper;

pub use cat_mapper::CatMapper;
pub use session_mapper::SessionMapper;
