//! User repository for credential store operations.

use chrono::Utc;
use cuid2::CuidConstructor;
use once_cell::sync::Lazy;
use sqlx::{Row, SqlitePool};

use crate::entities::user::User;
use crate::types::{errors::UserError, UserResult};

static CUID: Lazy<CuidConstructor> = Lazy::new(CuidConstructor::new);

fn new_public_id() -> String {
    CUID.create_id()
}

/// Repository for credential records. Uniqueness of `username` is enforced
/// by the store constraint, not here, so retried inserts cannot
/// double-register an identity.
#[derive(Clone, Debug)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new credential record and return it.
    pub async fn create(&self, username: &str, password_hash: &str) -> UserResult<User> {
        let now = Utc::now().to_rfc3339();
        let public_id = new_public_id();

        let result = sqlx::query(
            "INSERT INTO users (public_id, username, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(username)
        .bind(password_hash)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE constraint failed") {
                UserError::DuplicateUsername
            } else {
                UserError::StoreUnavailable(e.to_string())
            }
        })?;

        Ok(User {
            id: result.last_insert_rowid(),
            public_id,
            username: username.to_owned(),
            password_hash: password_hash.to_owned(),
            created_at: now,
        })
    }

    /// Look up a credential record by its exact (case-sensitive) username.
    pub async fn find_by_username(&self, username: &str) -> UserResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, public_id, username, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::StoreUnavailable(e.to_string()))?;

        if let Some(row) = row {
            let user = User {
                id: row.get("id"),
                public_id: row.get("public_id"),
                username: row.get("username"),
                password_hash: row.get("password_hash"),
                created_at: row.get("created_at"),
            };
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }
}
