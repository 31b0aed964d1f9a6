use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};

use chirpy_types::api::{CredentialsRequest, UserResponse};
use chirpy_types::error::CoreError;

use crate::error::ApiResult;
use crate::extract::{AppJson, AppPath};
use crate::middleware::AuthUser;
use crate::password::hash_password;
use crate::state::{AppState, run_blocking};

pub async fn create_user(
    State(state): State<AppState>,
    AppJson(req): AppJson<CredentialsRequest>,
) -> ApiResult<impl IntoResponse> {
    if req.password.is_empty() {
        return Err(CoreError::Validation("Password is empty".into()).into());
    }

    let user = run_blocking(move || {
        // skip the hash for an email that is already taken
        match state.db.get_user_by_email(&req.email) {
            Ok(_) => return Err(CoreError::AlreadyExists(format!("User {}", req.email))),
            Err(CoreError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }
        let hashed = hash_password(&req.password)?;
        state.db.create_user(&req.email, &hashed)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn get_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = run_blocking(move || state.db.get_users()).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn get_user(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<u64>,
) -> ApiResult<Json<UserResponse>> {
    let user = run_blocking(move || state.db.get_user(user_id)).await?;
    Ok(Json(user.into()))
}

/// Replace the caller's email and password.
pub async fn update_user(
    State(state): State<AppState>,
    caller: AuthUser,
    AppJson(req): AppJson<CredentialsRequest>,
) -> ApiResult<Json<UserResponse>> {
    if req.password.is_empty() {
        return Err(CoreError::Validation("Password is empty".into()).into());
    }

    let user = run_blocking(move || {
        let hashed = hash_password(&req.password)?;
        state.db.update_user(caller.user_id, &req.email, &hashed)
    })
    .await?;

    Ok(Json(user.into()))
}
