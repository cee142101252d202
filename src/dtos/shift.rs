use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::models::shift::{ShiftRow, ShiftSummaryRow};
use crate::reconciliation::{ShiftEntries, ShiftTotals};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftSegment {
    Morning,
    Afternoon,
    Night,
}

impl ShiftSegment {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftSegment::Morning => "morning",
            ShiftSegment::Afternoon => "afternoon",
            ShiftSegment::Night => "night",
        }
    }
}

// Request DTOs

/// Body for both create and overwrite. Raw entry fields sit at the top level,
/// exactly as the entry form ships them.
#[derive(Deserialize)]
pub struct SaveShiftRequest {
    pub shift_date: NaiveDate,
    pub shift_segment: ShiftSegment,
    // Gate enforced by the handler, not the calculator: a shift cannot be
    // saved without a responsible person.
    pub responsible_id: Option<i64>,
    #[serde(flatten)]
    pub entries: ShiftEntries,
}

// Response DTOs

#[derive(Serialize)]
pub struct ShiftResponse {
    pub id: i64,
    pub shift_date: NaiveDate,
    pub shift_segment: String,
    pub responsible_id: i64,
    pub responsible_name: String,
    #[serde(flatten)]
    pub entries: ShiftEntries,
    pub totals: ShiftTotals,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ShiftRow> for ShiftResponse {
    fn from(row: ShiftRow) -> Self {
        ShiftResponse {
            id: row.id,
            shift_date: row.shift_date,
            shift_segment: row.shift_segment,
            responsible_id: row.responsible_id,
            responsible_name: row.responsible_name,
            entries: ShiftEntries {
                fuel_sales: row.fuel_sales,
                store_sales: row.store_sales,
                card_total: row.card_total,
                vouchers: row.vouchers.0,
                expenses: row.expenses.0,
                deposits: row.deposits.0,
            },
            totals: ShiftTotals {
                total_revenue: row.total_revenue,
                total_non_cash: row.total_non_cash,
                expected_cash: row.expected_cash,
                actual_cash: row.actual_cash,
                difference: row.difference,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct ShiftSummary {
    pub id: i64,
    pub shift_date: NaiveDate,
    pub shift_segment: String,
    pub responsible_name: String,
    pub total_revenue: Decimal,
    pub difference: Decimal,
}

impl From<ShiftSummaryRow> for ShiftSummary {
    fn from(row: ShiftSummaryRow) -> Self {
        ShiftSummary {
            id: row.id,
            shift_date: row.shift_date,
            shift_segment: row.shift_segment,
            responsible_name: row.responsible_name,
            total_revenue: row.total_revenue,
            difference: row.difference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn segment_serializes_lowercase() {
        assert_eq!(serde_json::to_value(ShiftSegment::Morning).unwrap(), json!("morning"));
        assert_eq!(serde_json::to_value(ShiftSegment::Night).unwrap(), json!("night"));
        let parsed: ShiftSegment = serde_json::from_value(json!("afternoon")).unwrap();
        assert_eq!(parsed, ShiftSegment::Afternoon);
    }

    #[test]
    fn save_request_flattens_entry_fields() {
        let req: SaveShiftRequest = serde_json::from_value(json!({
            "shift_date": "2024-12-15",
            "shift_segment": "morning",
            "responsible_id": 3,
            "fuel_sales": 1000000,
            "store_sales": 200000,
            "card_total": 300000,
            "vouchers": [{ "amount": 50000, "reference": "ShellCard" }],
            "expenses": { "turnoExtra": 20000 },
            "deposits": [{ "amount": 830000, "reference": "Bolsa 1" }]
        }))
        .unwrap();

        assert_eq!(req.shift_segment, ShiftSegment::Morning);
        assert_eq!(req.responsible_id, Some(3));
        assert_eq!(req.entries.fuel_sales, dec!(1000000));
        assert_eq!(req.entries.deposits.len(), 1);
    }

    #[test]
    fn responsible_is_optional_at_parse_time() {
        let req: SaveShiftRequest = serde_json::from_value(json!({
            "shift_date": "2024-12-15",
            "shift_segment": "night"
        }))
        .unwrap();
        assert_eq!(req.responsible_id, None);
        assert_eq!(req.entries, ShiftEntries::default());
    }
}
