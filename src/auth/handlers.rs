use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::auth::{
    dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest, UpdateProfileRequest},
    extractors::{AuthUser, CurrentUser},
    jwt::JwtKeys,
    password::{hash_password, verify_password},
    repo::User,
};
use crate::error::ApiError;
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(register))
        .route("/auth/login", post(login))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/users/profile", get(get_profile).put(update_profile))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Falsy-fallback: empty strings count as "not supplied", matching the
/// original API. A client cannot clear a text field through an update.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    payload.email = normalize_email(&payload.email);

    if payload.name.trim().is_empty() || payload.email.is_empty() || payload.password.is_empty() {
        warn!("registration with missing fields");
        return Err(ApiError::Validation("Please enter all fields".into()));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::DuplicateEmail);
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, payload.name.trim(), &payload.email, &hash).await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            token,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = normalize_email(&payload.email);

    // Unknown email and wrong password fall through to the same outcome.
    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            ApiError::InvalidCredentials
        })?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        token,
    }))
}

#[instrument(skip(state, current))]
pub async fn get_profile(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<PublicUser>, ApiError> {
    // The hydrated record is best-effort; on a miss, ask the store directly
    // so an outage answers 500 and 404 stays reserved for an absent row.
    let user = match current.user {
        Some(u) => u,
        None => User::find_by_id(&state.db, current.id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".into()))?,
    };
    Ok(Json(PublicUser::from(user)))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    let name = non_empty(payload.name);
    let email = match non_empty(payload.email) {
        Some(e) => {
            let e = normalize_email(&e);
            if !is_valid_email(&e) {
                return Err(ApiError::Validation("Invalid email".into()));
            }
            Some(e)
        }
        None => None,
    };
    // A new password is re-hashed before it ever touches the store.
    let password_hash = match non_empty(payload.password) {
        Some(p) => Some(hash_password(&p)?),
        None => None,
    };

    let user = User::update_profile(
        &state.db,
        user_id,
        name.as_deref(),
        email.as_deref(),
        password_hash.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    info!(user_id = %user.id, "profile updated");
    Ok(Json(PublicUser::from(user)))
}
