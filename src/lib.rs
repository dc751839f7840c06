pub mod auth;
pub mod collection;
pub mod config;
pub mod constraints;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod state;

#[cfg(test)]
pub mod testing;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{missing_route, protected, public};
use crate::middleware::{constraints_middleware, cors_middleware, session_middleware};
use crate::state::AppState;

/// Full HTTP surface: public routes, protected `/v1` resources, fallback and
/// the global CORS and tracing layers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(public::health_get))
        .route("/v1/auth", post(public::login_post))
        .merge(protected_routes(state.clone()))
        .fallback(missing_route)
        .layer(from_fn(cors_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Routes are registered with their full path so constraints match the
/// request path exactly. The session layer runs before the constraint layer.
fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{auth, categories, statements, users};

    Router::new()
        .route("/v1/auth/refresh", get(auth::refresh_get))
        .route("/v1/users", get(users::index).post(users::create))
        .route(
            "/v1/users/:uuid",
            get(users::show)
                .patch(users::update)
                .delete(users::destroy)
                .put(users::restore),
        )
        .route("/v1/categories", get(categories::index).post(categories::create))
        .route(
            "/v1/categories/:uuid",
            get(categories::show)
                .patch(categories::update)
                .delete(categories::destroy)
                .put(categories::restore),
        )
        .route("/v1/statements", get(statements::index).post(statements::create))
        .route(
            "/v1/statements/:uuid",
            get(statements::show)
                .patch(statements::update)
                .delete(statements::destroy)
                .put(statements::restore),
        )
        .layer(from_fn_with_state(state.clone(), constraints_middleware))
        .layer(from_fn_with_state(state, session_middleware))
}
