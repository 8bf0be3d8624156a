pub mod auth_dto;
pub mod content_dto;
pub mod deck_dto;
pub mod upload_dto;
