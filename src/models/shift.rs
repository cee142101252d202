use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::FromRow;

use crate::reconciliation::{DepositEntry, ExpenseMap, VoucherEntry};

/// Full row of one persisted shift reconciliation. Raw entries live in JSONB
/// columns; the five totals are the snapshot computed at save time.
#[derive(Debug, FromRow)]
pub struct ShiftRow {
    pub id: i64,
    pub shift_date: NaiveDate,
    pub shift_segment: String,
    pub responsible_id: i64,
    // Display name copied at entry time; renaming a person never rewrites it.
    pub responsible_name: String,
    pub fuel_sales: Decimal,
    pub store_sales: Decimal,
    pub card_total: Decimal,
    pub vouchers: Json<Vec<VoucherEntry>>,
    pub expenses: Json<ExpenseMap>,
    pub deposits: Json<Vec<DepositEntry>>,
    pub total_revenue: Decimal,
    pub total_non_cash: Decimal,
    pub expected_cash: Decimal,
    pub actual_cash: Decimal,
    pub difference: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Slim row for the history listing.
#[derive(Debug, FromRow)]
pub struct ShiftSummaryRow {
    pub id: i64,
    pub shift_date: NaiveDate,
    pub shift_segment: String,
    pub responsible_name: String,
    pub total_revenue: Decimal,
    pub difference: Decimal,
}
