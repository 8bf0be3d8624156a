pub mod content_service;
pub mod deck_service;
pub mod extraction_service;
pub mod image_set_service;
pub mod import_service;
pub mod seed_service;
pub mod user_service;
