use axum::{
    routing::{get, post, put, delete},
    Router,
};
use crate::state::AppState;
use crate::handlers::shift;
use crate::middleware::auth::require_auth;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shifts", post(shift::create_shift))
        .route("/shifts", get(shift::list_shifts))
        .route("/shifts/{id}", get(shift::get_shift))
        .route("/shifts/{id}", put(shift::update_shift))
        .route("/shifts/{id}", delete(shift::delete_shift))
        .route_layer(axum::middleware::from_fn(require_auth))
}
