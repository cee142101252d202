use serde::Serialize;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, FromRow, Serialize)]
pub struct Person {
    pub id: i64,
    pub display_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
