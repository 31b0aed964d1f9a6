use std::path::Path;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::middleware::count_hits;
use crate::state::AppState;
use crate::{admin, auth, chirps, users, webhooks};

/// Build the full application: API routes, admin pages and the static file
/// server rooted at `file_root` under `/app`.
pub fn router(state: AppState, file_root: &Path) -> Router {
    let app_files: Router<AppState> = Router::new()
        .nest_service("/app", ServeDir::new(file_root))
        .layer(middleware::from_fn_with_state(state.clone(), count_hits));

    let api_routes: Router<AppState> = Router::new()
        .route("/api/healthz", get(admin::healthz))
        .route("/api/chirps", get(chirps::get_chirps).post(chirps::create_chirp))
        .route(
            "/api/chirps/{chirp_id}",
            get(chirps::get_chirp).delete(chirps::delete_chirp),
        )
        .route(
            "/api/users",
            get(users::get_users)
                .post(users::create_user)
                .put(users::update_user),
        )
        .route("/api/users/{user_id}", get(users::get_user))
        .route("/api/login", post(auth::login))
        .route("/api/refresh", post(auth::refresh))
        .route("/api/revoke", post(auth::revoke))
        .route("/api/polka/webhooks", post(webhooks::polka_webhook));

    let admin_routes: Router<AppState> = Router::new()
        .route("/admin/metrics", get(admin::metrics))
        .route("/admin/reset", get(admin::reset_metrics));

    Router::new()
        .merge(api_routes)
        .merge(admin_routes)
        .merge(app_files)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
