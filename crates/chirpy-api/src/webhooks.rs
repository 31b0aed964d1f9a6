use axum::{body::Bytes, extract::State, http::HeaderMap, http::StatusCode};
use tracing::{info, warn};

use chirpy_types::api::{USER_UPGRADED_EVENT, WebhookRequest};
use chirpy_types::error::CoreError;

use crate::error::ApiResult;
use crate::middleware::extract_api_key;
use crate::state::{AppState, run_blocking};

/// Payment provider callback. Only `user.upgraded` has an effect; other
/// events are acknowledged and ignored.
///
/// The API key is checked before the body is decoded, so an unauthenticated
/// caller always gets 401 whatever it sends.
pub async fn polka_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<StatusCode> {
    let key = extract_api_key(&headers)?;
    if key != state.polka_key {
        warn!("Webhook called with a wrong API key");
        return Err(CoreError::unauthorized("invalid API key").into());
    }

    let req: WebhookRequest = serde_json::from_slice(&body)
        .map_err(|e| CoreError::Validation(format!("Invalid webhook payload: {}", e)))?;

    if req.event != USER_UPGRADED_EVENT {
        return Ok(StatusCode::NO_CONTENT);
    }

    let user_id = req.data.user_id;
    let st = state.clone();
    run_blocking(move || st.db.upgrade_user(user_id)).await?;

    info!("User {} upgraded", user_id);
    Ok(StatusCode::OK)
}
