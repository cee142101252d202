use axum::{
    routing::{get, post, delete},
    Router,
};
use crate::state::AppState;
use crate::handlers::payroll;
use crate::middleware::auth::require_auth;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payroll", post(payroll::create_payroll_entry))
        .route("/payroll", get(payroll::list_payroll_entries))
        .route("/payroll/{id}", delete(payroll::delete_payroll_entry))
        .route_layer(axum::middleware::from_fn(require_auth))
}
