use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::models::payroll::PayrollRow;

/// Payment kinds of the payroll ledger: salary advances ("anticipo") and
/// bonuses ("aguinaldo").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayrollKind {
    Advance,
    Bonus,
}

impl PayrollKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayrollKind::Advance => "advance",
            PayrollKind::Bonus => "bonus",
        }
    }
}

// Request DTOs

#[derive(Deserialize)]
pub struct CreatePayrollRequest {
    pub entry_date: NaiveDate,
    pub person_id: i64,
    pub kind: PayrollKind,
    pub amount: Decimal,
    pub note: Option<String>,
}

// Response DTOs

#[derive(Serialize)]
pub struct PayrollEntryResponse {
    pub id: i64,
    pub entry_date: NaiveDate,
    pub person_id: i64,
    pub person_name: String,
    pub kind: String,
    pub amount: Decimal,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PayrollRow> for PayrollEntryResponse {
    fn from(row: PayrollRow) -> Self {
        PayrollEntryResponse {
            id: row.id,
            entry_date: row.entry_date,
            person_id: row.person_id,
            person_name: row.person_name,
            kind: row.kind,
            amount: row.amount,
            note: row.note,
            created_at: row.created_at,
        }
    }
}

/// Range listing plus the outflow total the payroll view shows.
#[derive(Serialize)]
pub struct PayrollListResponse {
    pub entries: Vec<PayrollEntryResponse>,
    pub total: Decimal,
}
