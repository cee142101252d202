use serde::Serialize;
use chrono::NaiveDate;
use rust_decimal::Decimal;

// Response DTOs for the monthly rollup views.

#[derive(Serialize)]
pub struct MonthlySummaryResponse {
    pub month: String,
    pub shift_count: i64,
    pub total_sales: Decimal,
    /// Accumulated cash difference across the month's shifts.
    pub total_difference: Decimal,
    /// Internal fuel consumption ("bencinaEnzo") total.
    pub internal_fuel_total: Decimal,
    /// Fuel dispensed without payment ("perrosMuertos"); tracked as a loss,
    /// never part of the cash reconciliation.
    pub fuel_loss_total: Decimal,
    /// Shifts that paid an extra-shift premium.
    pub extra_shift_count: i64,
}

#[derive(Serialize)]
pub struct ExpenseDetailResponse {
    pub key: String,
    pub month: String,
    pub total: Decimal,
    pub movements: Vec<ExpenseMovement>,
}

#[derive(Serialize)]
pub struct ExpenseMovement {
    pub shift_id: i64,
    pub shift_date: NaiveDate,
    pub shift_segment: String,
    pub responsible_name: String,
    pub amount: Decimal,
}
