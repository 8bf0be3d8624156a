pub mod image_set;
pub mod prompt;
pub mod user;
