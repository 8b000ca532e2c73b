//! # User Repository
//!
//! Registration and credential checks. A user's id is the tenant id of
//! everything they create, so this is the one repository that is not
//! tenant-scoped.
//!
//! Passwords are stored as Argon2 PHC strings.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;
use vanledger_core::validation::{validate_password, validate_phone, validate_user_name};
use vanledger_core::{CoreError, User};

use crate::error::{DbError, DbResult};

/// Repository for user accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Registers a new user.
    ///
    /// ## Errors
    /// - `ValidationError` for a bad name, phone or short password
    /// - [`CoreError::DuplicatePhone`] if the phone is taken
    pub async fn register(&self, name: &str, phone: &str, password: &str) -> DbResult<User> {
        let name = name.trim();
        let phone = phone.trim();
        validate_user_name(name)?;
        validate_phone(phone)?;
        validate_password(password)?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            phone: phone.to_string(),
            password_hash: hash_password(password)?,
            created_at: Utc::now(),
        };

        debug!(id = %user.id, "Registering user");

        let inserted = sqlx::query(
            r#"
            INSERT INTO users (id, name, phone, password_hash, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await;

        match inserted.map_err(DbError::from) {
            Ok(_) => {}
            Err(DbError::UniqueViolation { .. }) => {
                return Err(CoreError::DuplicatePhone {
                    phone: user.phone,
                }
                .into())
            }
            Err(e) => return Err(e),
        }

        info!(id = %user.id, "User registered");
        Ok(user)
    }

    /// Returns the user if `password` matches the one stored for `phone`.
    ///
    /// Unknown phone and wrong password both yield `Ok(None)`.
    pub async fn authenticate(&self, phone: &str, password: &str) -> DbResult<Option<User>> {
        let user = self.find_by_phone(phone.trim()).await?;
        Ok(user.filter(|u| verify_password(password, &u.password_hash)))
    }

    /// Gets a user by id.
    pub async fn get(&self, id: &str) -> DbResult<User> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, phone, password_hash, created_at FROM users WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("User", id))
    }

    pub async fn find_by_phone(&self, phone: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, phone, password_hash, created_at FROM users WHERE phone = ?1",
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

// =============================================================================
// Password Hashing
// =============================================================================

/// Hash a password for storage.
pub fn hash_password(password: &str) -> DbResult<String> {
    // A v4 UUID is 16 random bytes, the recommended salt length
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| DbError::Internal(format!("Failed to build salt: {}", e)))?;

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbError::Internal(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Verify a password against its hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
