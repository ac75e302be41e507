//! Request and response DTOs for the REST API.

pub mod session_dto;

pub use session_dto::SessionListResponse;
