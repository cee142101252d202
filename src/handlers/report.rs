use axum::{extract::State, Json};
use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;

use crate::state::AppState;
use crate::error::AppError;
use crate::dtos::report::{ExpenseDetailResponse, ExpenseMovement, MonthlySummaryResponse};
use crate::reconciliation::{EXPENSE_EXTRA_SHIFT, EXPENSE_FUEL_LOSS, EXPENSE_INTERNAL_FUEL};

const MONTHLY_SUMMARY_SQL: &str = r#"SELECT
        COUNT(*),
        COALESCE(SUM(total_revenue), 0),
        COALESCE(SUM(difference), 0),
        COALESCE(SUM(COALESCE((expenses->>$3)::numeric, 0)), 0),
        COALESCE(SUM(COALESCE((expenses->>$4)::numeric, 0)), 0),
        COUNT(*) FILTER (WHERE COALESCE((expenses->>$5)::numeric, 0) > 0)
    FROM shifts
    WHERE shift_date >= $1 AND shift_date <= $2"#;

const EXPENSE_DETAIL_SQL: &str = r#"SELECT
        id, shift_date, shift_segment, responsible_name,
        COALESCE((expenses->>$1)::numeric, 0)
    FROM shifts
    WHERE shift_date >= $2 AND shift_date <= $3
      AND COALESCE((expenses->>$1)::numeric, 0) > 0
    ORDER BY shift_date DESC, id DESC"#;

/// Month dashboard: the accumulated sales, cash difference, internal fuel
/// consumption, fuel losses and extra-shift count for one calendar month.
pub async fn monthly_summary(
    State(AppState { db_pool }): State<AppState>,
    axum::extract::Query(params): axum::extract::Query<std::collections::HashMap<String, String>>,
) -> Result<Json<MonthlySummaryResponse>, AppError> {
    let month = params
        .get("month")
        .ok_or_else(|| AppError::validation("month query parameter is required"))?;
    let (start, end) = month_bounds(month)?;

    let (shift_count, total_sales, total_difference, internal_fuel_total, fuel_loss_total, extra_shift_count) =
        sqlx::query_as::<_, (i64, Decimal, Decimal, Decimal, Decimal, i64)>(MONTHLY_SUMMARY_SQL)
            .bind(start)
            .bind(end)
            .bind(EXPENSE_INTERNAL_FUEL)
            .bind(EXPENSE_FUEL_LOSS)
            .bind(EXPENSE_EXTRA_SHIFT)
            .fetch_one(&db_pool)
            .await?;

    Ok(Json(MonthlySummaryResponse {
        month: month.clone(),
        shift_count,
        total_sales,
        total_difference,
        internal_fuel_total,
        fuel_loss_total,
        extra_shift_count,
    }))
}

/// Per-category drill-down: every shift of the month where the given expense
/// key was recorded above zero. Works for any key thanks to the open mapping.
pub async fn expense_detail(
    State(AppState { db_pool }): State<AppState>,
    axum::extract::Path(key): axum::extract::Path<String>,
    axum::extract::Query(params): axum::extract::Query<std::collections::HashMap<String, String>>,
) -> Result<Json<ExpenseDetailResponse>, AppError> {
    if key.trim().is_empty() {
        return Err(AppError::validation("Expense key is required"));
    }

    let month = params
        .get("month")
        .ok_or_else(|| AppError::validation("month query parameter is required"))?;
    let (start, end) = month_bounds(month)?;

    let rows = sqlx::query_as::<_, (i64, NaiveDate, String, String, Decimal)>(EXPENSE_DETAIL_SQL)
        .bind(&key)
        .bind(start)
        .bind(end)
        .fetch_all(&db_pool)
        .await?;

    let total: Decimal = rows.iter().map(|r| r.4).sum();
    let movements = rows
        .into_iter()
        .map(|(shift_id, shift_date, shift_segment, responsible_name, amount)| ExpenseMovement {
            shift_id,
            shift_date,
            shift_segment,
            responsible_name,
            amount,
        })
        .collect();

    Ok(Json(ExpenseDetailResponse {
        key,
        month: month.clone(),
        total,
        movements,
    }))
}

// "YYYY-MM" -> first and last day of that month.
fn month_bounds(month: &str) -> Result<(NaiveDate, NaiveDate), AppError> {
    let start = NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
        .map_err(|_| AppError::validation("month must be formatted as YYYY-MM"))?;

    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| AppError::validation("month is out of range"))?;

    debug_assert_eq!(start.month(), end.month());
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::month_bounds;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_bounds_covers_whole_month() {
        assert_eq!(month_bounds("2024-12").unwrap(), (date(2024, 12, 1), date(2024, 12, 31)));
        assert_eq!(month_bounds("2024-02").unwrap(), (date(2024, 2, 1), date(2024, 2, 29)));
        assert_eq!(month_bounds("2025-02").unwrap(), (date(2025, 2, 1), date(2025, 2, 28)));
    }

    #[test]
    fn month_bounds_rejects_garbage() {
        assert!(month_bounds("december").is_err());
        assert!(month_bounds("2024-13").is_err());
        assert!(month_bounds("").is_err());
    }
}
