use std::path::Path;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    generate_handler, info_handler, ping_handler, redirect_handler, update_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    /// Builds the router. Unmatched paths are served from `static_dir` when given.
    pub fn router(state: AppState, static_dir: Option<&Path>) -> Router {
        let mut router = Router::new()
            .route("/ping", get(ping_handler))
            .route("/r/{id}", get(redirect_handler))
            .nest(
                "/api",
                Router::new()
                    .route("/generate", post(generate_handler))
                    .route("/update", post(update_handler))
                    .route("/info/{id}", get(info_handler)),
            );

        if let Some(dir) = static_dir {
            router = router.fallback_service(ServeDir::new(dir));
        }

        router
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
