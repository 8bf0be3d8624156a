use base64::{engine::general_purpose::STANDARD, Engine as _};
use sqlx::SqlitePool;

use crate::config::AdminSeed;
use crate::error::{Error, Result};
use crate::models::user::User;
use crate::utils::crypto::{check_password, hash_password, PasswordCheck};
use crate::utils::time::{ist_now, now};

#[derive(Clone)]
pub struct UserService {
    pool: SqlitePool,
}

/// Account fields accepted when creating a user.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub is_admin: bool,
}

impl UserService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password, is_admin, last_login, created_at
            FROM users
            WHERE email = ? COLLATE NOCASE
            "#,
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password, is_admin, last_login, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username.trim())
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Email first, username as a fallback.
    pub async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>> {
        match self.find_by_email(identifier).await? {
            Some(user) => Ok(Some(user)),
            None => self.find_by_username(identifier).await,
        }
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User> {
        self.create(NewUser {
            username,
            email,
            password,
            is_admin: false,
        })
        .await
    }

    pub async fn create(&self, new_user: NewUser<'_>) -> Result<User> {
        if self.find_by_email(new_user.email).await?.is_some() {
            return Err(Error::BadRequest("Email already in use".to_string()));
        }
        if self.find_by_username(new_user.username).await?.is_some() {
            return Err(Error::BadRequest("Username already in use".to_string()));
        }

        let hashed = hash_password(new_user.password)
            .map_err(|e| Error::Internal(format!("Password hashing failed: {}", e)))?;

        self.insert(new_user.username, new_user.email, &hashed, new_user.is_admin, None)
            .await
    }

    /// Stores a credential exactly as given, for records imported from the legacy store.
    pub async fn import(
        &self,
        username: &str,
        email: &str,
        stored_password: &str,
        is_admin: bool,
        last_login: Option<chrono::DateTime<chrono::FixedOffset>>,
    ) -> Result<Option<User>> {
        if self.find_by_email(email).await?.is_some()
            || self.find_by_username(username).await?.is_some()
        {
            return Ok(None);
        }
        self.insert(username, email, stored_password, is_admin, last_login)
            .await
            .map(Some)
    }

    async fn insert(
        &self,
        username: &str,
        email: &str,
        password: &str,
        is_admin: bool,
        last_login: Option<chrono::DateTime<chrono::FixedOffset>>,
    ) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password, is_admin, last_login, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, username, email, password, is_admin, last_login, created_at
            "#,
        )
        .bind(username.trim())
        .bind(email.trim())
        .bind(password)
        .bind(is_admin)
        .bind(last_login)
        .bind(now())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(user_id = user.id, username = %user.username, is_admin, "user created");
        Ok(user)
    }

    /// Verifies `password` for the given account and records the login.
    ///
    /// A legacy plaintext credential that matches is replaced by an argon2 hash.
    pub async fn verify_and_touch(&self, user: User, password: &str) -> Result<Option<User>> {
        match check_password(password, &user.password) {
            PasswordCheck::Rejected => Ok(None),
            PasswordCheck::Accepted => self.touch_last_login(user.id).await.map(Some),
            PasswordCheck::AcceptedNeedsRehash => {
                self.rehash(user.id, password).await?;
                self.touch_last_login(user.id).await.map(Some)
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let Some(user) = self.find_by_email(email).await? else {
            return Err(Error::Unauthorized("You need to register first".to_string()));
        };
        self.verify_and_touch(user, password)
            .await?
            .ok_or_else(|| Error::Unauthorized("Invalid credentials".to_string()))
    }

    /// Resolves a `Basic` authorization header to an admin account.
    pub async fn authorize(&self, header: Option<&str>) -> Result<User> {
        let Some((identifier, password)) = header.and_then(decode_basic) else {
            return Err(Error::Unauthorized("Unauthorized".to_string()));
        };

        let denied = || Error::Unauthorized("Invalid credentials or not an admin".to_string());

        let Some(user) = self.find_by_identifier(&identifier).await? else {
            tracing::warn!(identifier = %identifier, "authorization for unknown account");
            return Err(denied());
        };
        if !user.is_admin {
            tracing::warn!(user_id = user.id, "authorization for non-admin account");
            return Err(denied());
        }

        match self.verify_and_touch(user, &password).await? {
            Some(user) => Ok(user),
            None => {
                tracing::warn!(identifier = %identifier, "authorization with wrong password");
                Err(denied())
            }
        }
    }

    async fn rehash(&self, user_id: i64, password: &str) -> Result<()> {
        let hashed = hash_password(password)
            .map_err(|e| Error::Internal(format!("Password hashing failed: {}", e)))?;
        sqlx::query("UPDATE users SET password = ? WHERE id = ?")
            .bind(hashed)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        tracing::info!(user_id, "legacy plaintext credential upgraded to argon2");
        Ok(())
    }

    async fn touch_last_login(&self, user_id: i64) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET last_login = ?
            WHERE id = ?
            RETURNING id, username, email, password, is_admin, last_login, created_at
            "#,
        )
        .bind(ist_now())
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    /// Creates the configured admin account unless an admin already exists.
    pub async fn ensure_bootstrap_admin(&self, seed: &AdminSeed) -> Result<()> {
        let admins: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE is_admin = TRUE")
            .fetch_one(&self.pool)
            .await?;
        if admins > 0 {
            return Ok(());
        }

        self.create(NewUser {
            username: &seed.username,
            email: &seed.email,
            password: &seed.password,
            is_admin: true,
        })
        .await?;
        tracing::info!(username = %seed.username, "bootstrap admin account created");
        Ok(())
    }
}

/// Splits `Basic base64(identifier:password)`; the password may itself contain colons.
pub fn decode_basic(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?.trim();
    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (identifier, password) = decoded.split_once(':')?;
    if identifier.is_empty() {
        return None;
    }
    Some((identifier.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::pool::{create_pool, run_migrations};

    async fn service() -> UserService {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        UserService::new(pool)
    }

    fn basic(identifier: &str, password: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{}:{}", identifier, password)))
    }

    #[test]
    fn decodes_basic_credentials() {
        assert_eq!(
            decode_basic(&basic("admin@nik.in", "pa:ss")),
            Some(("admin@nik.in".to_string(), "pa:ss".to_string()))
        );
        assert_eq!(decode_basic("Bearer abc"), None);
        assert_eq!(decode_basic("Basic !!!"), None);
        assert_eq!(decode_basic(&basic("", "x")), None);
    }

    #[tokio::test]
    async fn authorize_by_email_or_username() {
        let svc = service().await;
        svc.create(NewUser {
            username: "admin",
            email: "Admin@Example.com",
            password: "hunter2",
            is_admin: true,
        })
        .await
        .unwrap();

        let by_email = svc
            .authorize(Some(&basic("admin@example.com", "hunter2")))
            .await
            .unwrap();
        assert_eq!(by_email.username, "admin");
        assert!(by_email.last_login.is_some());
        assert_eq!(
            by_email.last_login.unwrap().offset().local_minus_utc(),
            19_800
        );

        svc.authorize(Some(&basic("admin", "hunter2"))).await.unwrap();
        assert!(matches!(
            svc.authorize(Some(&basic("admin", "wrong"))).await,
            Err(Error::Unauthorized(_))
        ));
        assert!(matches!(svc.authorize(None).await, Err(Error::Unauthorized(_))));
    }

    #[tokio::test]
    async fn non_admins_are_not_authorized() {
        let svc = service().await;
        svc.register("cadet", "cadet@example.com", "pw").await.unwrap();
        assert!(matches!(
            svc.authorize(Some(&basic("cadet", "pw"))).await,
            Err(Error::Unauthorized(_))
        ));
        svc.login("CADET@example.com", "pw").await.unwrap();
    }

    #[tokio::test]
    async fn legacy_plaintext_is_rehashed_once() {
        let svc = service().await;
        svc.import("admin", "admin@example.com", "Nikadmin26@", true, None)
            .await
            .unwrap()
            .unwrap();

        svc.authorize(Some(&basic("admin@example.com", "Nikadmin26@")))
            .await
            .unwrap();
        let stored = svc.find_by_username("admin").await.unwrap().unwrap();
        assert!(stored.password.starts_with("$argon2"));

        svc.login("admin@example.com", "Nikadmin26@").await.unwrap();
    }

    #[tokio::test]
    async fn bootstrap_admin_is_created_once() {
        let svc = service().await;
        let seed = AdminSeed {
            username: "admin".into(),
            email: "admin@example.com".into(),
            password: "pw".into(),
        };
        svc.ensure_bootstrap_admin(&seed).await.unwrap();
        svc.ensure_bootstrap_admin(&seed).await.unwrap();
        let admins: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&svc.pool)
            .await
            .unwrap();
        assert_eq!(admins, 1);
    }
}
