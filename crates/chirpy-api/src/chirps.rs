use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};

use chirpy_db::queries::validate_chirp_body;
use chirpy_types::api::{ChirpResponse, CreateChirpRequest};

use crate::error::ApiResult;
use crate::extract::{AppJson, AppPath};
use crate::middleware::AuthUser;
use crate::state::{AppState, run_blocking};

const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];
const MASK: &str = "****";

/// Mask profane words. Words are split on single spaces, so punctuation
/// attached to a word ("fornax!") is left alone.
pub fn clean_body(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            if PROFANE_WORDS.contains(&word.to_lowercase().as_str()) {
                MASK
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub async fn create_chirp(
    State(state): State<AppState>,
    author: AuthUser,
    AppJson(req): AppJson<CreateChirpRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_chirp_body(&req.body)?;
    let body = clean_body(&req.body);

    let chirp = run_blocking(move || state.db.create_chirp(&body, author.user_id)).await?;

    Ok((StatusCode::CREATED, Json(ChirpResponse::from(chirp))))
}

pub async fn get_chirps(State(state): State<AppState>) -> ApiResult<Json<Vec<ChirpResponse>>> {
    let chirps = run_blocking(move || state.db.get_chirps()).await?;
    Ok(Json(chirps.into_iter().map(ChirpResponse::from).collect()))
}

pub async fn get_chirp(
    State(state): State<AppState>,
    AppPath(chirp_id): AppPath<u64>,
) -> ApiResult<Json<ChirpResponse>> {
    let chirp = run_blocking(move || state.db.get_chirp(chirp_id)).await?;
    Ok(Json(chirp.into()))
}

pub async fn delete_chirp(
    State(state): State<AppState>,
    caller: AuthUser,
    AppPath(chirp_id): AppPath<u64>,
) -> ApiResult<StatusCode> {
    run_blocking(move || state.db.delete_chirp(chirp_id, caller.user_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
