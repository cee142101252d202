use axum::{
    routing::{get, post, patch},
    Router,
};
use crate::state::AppState;
use crate::handlers::person;
use crate::middleware::auth::require_auth;

pub fn routes() -> Router<AppState> {
    Router::new()
        // No delete route: people are deactivated, never removed
        .route("/people", post(person::create_person))
        .route("/people", get(person::list_people))
        .route("/people/{id}/name", patch(person::rename_person))
        .route("/people/{id}/active", patch(person::set_person_active))
        .route_layer(axum::middleware::from_fn(require_auth))
}
