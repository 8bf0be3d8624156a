use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use subtle::ConstantTimeEq;

/// Outcome of checking a submitted password against a stored credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordCheck {
    Rejected,
    Accepted,
    /// Matched a legacy plaintext credential; the caller must store a fresh hash.
    AcceptedNeedsRehash,
}

pub fn hash_password(plain: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2.hash_password(plain.as_bytes(), &salt)?.to_string();
    Ok(password_hash)
}

pub fn verify_password(plain: &str, hashed: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hashed)?;
    let ok = Argon2::default()
        .verify_password(plain.as_bytes(), &parsed_hash)
        .is_ok();
    Ok(ok)
}

pub fn is_password_hash(stored: &str) -> bool {
    stored.starts_with("$argon2")
}

pub fn check_password(plain: &str, stored: &str) -> PasswordCheck {
    if is_password_hash(stored) {
        return match verify_password(plain, stored) {
            Ok(true) => PasswordCheck::Accepted,
            Ok(false) => PasswordCheck::Rejected,
            Err(e) => {
                tracing::warn!(error = %e, "stored password hash could not be parsed");
                PasswordCheck::Rejected
            }
        };
    }

    if bool::from(plain.as_bytes().ct_eq(stored.as_bytes())) {
        PasswordCheck::AcceptedNeedsRehash
    } else {
        PasswordCheck::Rejected
    }
}
