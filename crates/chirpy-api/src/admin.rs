use std::sync::atomic::Ordering;

use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse},
};

use crate::state::AppState;

pub async fn healthz() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        "OK",
    )
}

pub async fn metrics(State(state): State<AppState>) -> Html<String> {
    let hits = state.file_server_hits.load(Ordering::Relaxed);
    Html(format!(
        "<html><body><h1>Welcome, Chirpy Admin</h1><p>Chirpy has been visited {} times!</p></body></html>",
        hits
    ))
}

pub async fn reset_metrics(State(state): State<AppState>) -> String {
    state.file_server_hits.store(0, Ordering::Relaxed);
    "Hits reset to 0".to_string()
}
