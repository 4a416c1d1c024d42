use axum::middleware::from_fn_with_state;
use axum::routing::{post, put};
use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::handlers::probes::{healthz, livez};
use super::handlers::ui::home;
use super::middlewares::session;
use super::state::AppState;

pub fn build_routes(state: AppState) -> Router {
    Router::new()
        .route("/jobs", get(handlers::jobs::list).post(handlers::jobs::create))
        .route(
            "/jobs/{id}",
            put(handlers::jobs::update).delete(handlers::jobs::delete),
        )
        .route("/signup", post(handlers::auth::signup))
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route("/session", get(handlers::auth::current))
        .route("/board", get(handlers::ui::board))
        .route("/board/signup", post(handlers::ui::signup))
        .route("/board/login", post(handlers::ui::login))
        .route("/board/logout", post(handlers::ui::logout))
        .route("/board/jobs", post(handlers::ui::post_job))
        .route("/board/jobs/{id}/delete", post(handlers::ui::delete_job))
        .route("/board/jobs/{id}/apply", post(handlers::ui::apply))
        .layer(from_fn_with_state(state.clone(), session::identify))
        .route("/", get(home))
        .route("/healthz", get(healthz))
        .route("/livez", get(livez))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
