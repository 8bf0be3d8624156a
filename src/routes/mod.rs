pub mod auth;
pub mod content;
pub mod deck;
pub mod health;
pub mod upload;
