use axum::{Json, extract::State, http::HeaderMap, http::StatusCode};
use tracing::{info, warn};

use chirpy_types::api::{CredentialsRequest, LoginResponse, RefreshResponse};
use chirpy_types::error::CoreError;

use crate::error::ApiResult;
use crate::extract::AppJson;
use crate::jwt::issue_access_token;
use crate::middleware::extract_bearer_token;
use crate::password::verify_password;
use crate::sessions;
use crate::state::{AppState, run_blocking};

const BAD_CREDENTIALS: &str = "incorrect email or password";

pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<CredentialsRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let st = state.clone();
    let (user, token, refresh_token) = run_blocking(move || {
        let user = match st.db.get_user_by_email(&req.email) {
            Ok(user) => user,
            Err(CoreError::NotFound(_)) => {
                warn!("Login attempt for unknown email");
                return Err(CoreError::unauthorized(BAD_CREDENTIALS));
            }
            Err(e) => return Err(e),
        };

        verify_password(&req.password, &user.hashed_password).map_err(|e| match e {
            CoreError::Unauthorized(_) => {
                warn!("Wrong password for user {}", user.id);
                CoreError::unauthorized(BAD_CREDENTIALS)
            }
            other => other,
        })?;

        let token = issue_access_token(user.id, &st.jwt_secret, st.access_token_ttl)?;
        let refresh_token = sessions::create_session(&st.db, user.id)?;
        Ok((user, token, refresh_token))
    })
    .await?;

    info!("User {} logged in", user.id);
    Ok(Json(LoginResponse {
        id: user.id,
        email: user.email,
        is_promoted: user.is_promoted,
        token,
        refresh_token,
    }))
}

/// Exchange a bearer refresh token for a new access token.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<RefreshResponse>> {
    let refresh_token = extract_bearer_token(&headers)?.to_string();

    let st = state.clone();
    let user_id =
        run_blocking(move || sessions::resolve_refresh_token(&st.db, &refresh_token)).await?;

    let token = issue_access_token(user_id, &state.jwt_secret, state.access_token_ttl)?;
    Ok(Json(RefreshResponse { token }))
}

pub async fn revoke(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<StatusCode> {
    let refresh_token = extract_bearer_token(&headers)?.to_string();

    let st = state.clone();
    run_blocking(move || sessions::revoke_refresh_token(&st.db, &refresh_token)).await?;

    Ok(StatusCode::NO_CONTENT)
}
