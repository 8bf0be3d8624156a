pub mod crypto;
pub mod sampling;
pub mod time;
pub mod validation;
