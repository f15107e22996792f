use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use escriba_database::{User, UserError, UserRepository};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

/// Registration and login against the credential store. Stateless between
/// calls: no sessions or tokens are minted, credentials are re-validated on
/// every login.
#[derive(Clone, Debug)]
pub struct Authenticator {
    users: UserRepository,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("username and password are required")]
    MissingCredentials,
    #[error("username already exists")]
    UsernameTaken,
    #[error("user not found")]
    UserNotFound,
    #[error("invalid credentials")]
    BadCredentials,
    #[error("credential store unavailable: {0}")]
    Store(String),
    #[error("password hashing failed: {0}")]
    PasswordHash(#[from] argon2::password_hash::Error),
}

impl Authenticator {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user. Both fields must be non-empty after trimming;
    /// the stored username is the trimmed one.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let username = username.trim();
        let password = password.trim();

        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(username, &password_hash)
            .await
            .map_err(|e| match e {
                UserError::DuplicateUsername => AuthError::UsernameTaken,
                UserError::StoreUnavailable(detail) => AuthError::Store(detail),
            })?;

        info!(user = %user.public_id, username, "registered user");
        Ok(user)
    }

    /// Validate a username/password pair and return the matching record.
    /// An unknown username and a wrong password fail differently on purpose;
    /// see DESIGN.md before collapsing the two.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .users
            .find_by_username(username)
            .await
            .map_err(|e| match e {
                UserError::StoreUnavailable(detail) => AuthError::Store(detail),
                other => AuthError::Store(other.to_string()),
            })?;

        let Some(user) = user else {
            return Err(AuthError::UserNotFound);
        };

        if !verify_password(password, &user.password_hash)? {
            return Err(AuthError::BadCredentials);
        }

        info!(user = %user.public_id, "login succeeded");
        Ok(user)
    }
}

/// Hash a password with Argon2 and a fresh per-call salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash string. A mismatch is
/// `Ok(false)`; an unparsable stored hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
