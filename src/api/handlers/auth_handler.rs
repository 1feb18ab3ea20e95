//! Authentication handlers.

use axum::{extract::State, routing::post, Router};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Account, AccountResponse, Role};
use crate::errors::AppResult;
use crate::services::Registration;
use crate::types::{ApiResponse, Created};

/// Account registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    #[schema(example = "mithai", min_length = 3)]
    pub username: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(email(message = "Please provide a valid email"))]
    #[schema(example = "mithai@example.com")]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[schema(example = "Gulab-Jamun-42", min_length = 6)]
    pub password: String,
    /// Defaults to `user`
    pub role: Option<Role>,
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(email(message = "Please provide a valid email"))]
    #[schema(example = "mithai@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "Gulab-Jamun-42")]
    pub password: String,
}

/// Surrounding whitespace is not part of an address
fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_string())
}

/// Account plus a freshly issued session token
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub account: AccountResponse,
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

fn session(state: &AppState, account: Account) -> AppResult<AuthResponse> {
    let issued = state.tokens.issue(&account)?;
    Ok(AuthResponse {
        account: AccountResponse::from(account),
        token: issued.token,
        token_type: issued.token_type,
        expires_in: issued.expires_in,
    })
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account registered", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email or username already taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<AuthResponse>> {
    let account = state
        .credentials
        .register(Registration {
            username: payload.username,
            email: payload.email,
            password: payload.password,
            role: payload.role,
        })
        .await?;

    Ok(Created(ApiResponse::success(
        "Account registered successfully",
        session(&state, account)?,
    )))
}

/// Login and get a session token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<ApiResponse<AuthResponse>> {
    let account = state
        .credentials
        .verify(&payload.email, &payload.password)
        .await?;

    tracing::info!(account_id = %account.id, "Login successful");
    Ok(ApiResponse::success(
        "Login successful",
        session(&state, account)?,
    ))
}
