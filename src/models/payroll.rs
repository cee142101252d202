use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct PayrollRow {
    pub id: i64,
    pub entry_date: NaiveDate,
    pub person_id: i64,
    pub person_name: String,
    pub kind: String,
    pub amount: Decimal,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}
