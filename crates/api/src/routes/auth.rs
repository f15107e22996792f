//! Registration and login endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::error;

use escriba_auth::AuthError;

use crate::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub username: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let user = state
        .authenticator()
        .register(&payload.username, &payload.password)
        .await
        .map_err(register_error)?;

    Ok(Json(RegisterResponse {
        message: "Usuario registrado con éxito".to_string(),
        user_id: user.public_id,
    }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .authenticator()
        .login(&payload.username, &payload.password)
        .await
        .map_err(login_error)?;

    Ok(Json(LoginResponse {
        message: "Login correcto".to_string(),
        username: user.username,
    }))
}

// Validation and auth-domain failures surface verbatim; store and hashing
// failures are logged with detail and surfaced generically.

fn register_error(err: AuthError) -> ApiError {
    match err {
        AuthError::MissingCredentials => {
            ApiError::bad_request("Por favor ingresa usuario y contraseña.")
        }
        AuthError::UsernameTaken => {
            ApiError::bad_request("El nombre de usuario ya existe. Elige otro.")
        }
        other => {
            error!(error = ?other, "registration failed");
            ApiError::internal_server_error("Error interno del servidor al registrar.")
        }
    }
}

fn login_error(err: AuthError) -> ApiError {
    match err {
        AuthError::UserNotFound => ApiError::bad_request("Usuario no encontrado."),
        AuthError::BadCredentials => ApiError::bad_request("Contraseña incorrecta."),
        AuthError::MissingCredentials => {
            ApiError::bad_request("Por favor ingresa usuario y contraseña.")
        }
        other => {
            error!(error = ?other, "login failed");
            ApiError::internal_server_error("Error interno del servidor al iniciar sesión.")
        }
    }
}
