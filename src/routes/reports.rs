use axum::{routing::get, Router};
use crate::state::AppState;
use crate::handlers::report;
use crate::middleware::auth::require_auth;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/monthly", get(report::monthly_summary))
        .route("/reports/expenses/{key}", get(report::expense_detail))
        .route_layer(axum::middleware::from_fn(require_auth))
}
