pub mod payroll;
pub mod people;
pub mod reports;
pub mod shifts;
pub mod users;

use axum::Router;
use crate::state::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(shifts::routes())
        .merge(people::routes())
        .merge(payroll::routes())
        .merge(reports::routes())
        .merge(users::routes())
}
