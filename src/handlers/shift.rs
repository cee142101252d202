use axum::{extract::State, Json, Extension};
use axum::http::StatusCode;
use sqlx::PgPool;

use crate::state::AppState;
use crate::error::AppError;
use crate::dtos::shift::{SaveShiftRequest, ShiftResponse, ShiftSummary};
use crate::middleware::auth::AuthContext;
use crate::models::person::Person;
use crate::models::shift::{ShiftRow, ShiftSummaryRow};
use crate::reconciliation::compute_totals;

const INSERT_SHIFT_SQL: &str = r#"INSERT INTO shifts
    (shift_date, shift_segment, responsible_id, responsible_name,
     fuel_sales, store_sales, card_total, vouchers, expenses, deposits,
     total_revenue, total_non_cash, expected_cash, actual_cash, difference)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
    RETURNING *"#;

const UPDATE_SHIFT_SQL: &str = r#"UPDATE shifts SET
    shift_date = $2, shift_segment = $3, responsible_id = $4, responsible_name = $5,
    fuel_sales = $6, store_sales = $7, card_total = $8,
    vouchers = $9, expenses = $10, deposits = $11,
    total_revenue = $12, total_non_cash = $13, expected_cash = $14,
    actual_cash = $15, difference = $16, updated_at = now()
    WHERE id = $1
    RETURNING *"#;

pub async fn create_shift(
    State(AppState { db_pool }): State<AppState>,
    Json(req): Json<SaveShiftRequest>,
) -> Result<(StatusCode, Json<ShiftResponse>), AppError> {
    let person = resolve_responsible(&db_pool, req.responsible_id).await?;

    // Snapshot the derived totals at save time; the raw entries stay the
    // source of truth and the same arithmetic reruns on every overwrite.
    let totals = compute_totals(&req.entries);

    let row = sqlx::query_as::<_, ShiftRow>(INSERT_SHIFT_SQL)
        .bind(req.shift_date)
        .bind(req.shift_segment.as_str())
        .bind(person.id)
        .bind(&person.display_name)
        .bind(req.entries.fuel_sales)
        .bind(req.entries.store_sales)
        .bind(req.entries.card_total)
        .bind(sqlx::types::Json(&req.entries.vouchers))
        .bind(sqlx::types::Json(&req.entries.expenses))
        .bind(sqlx::types::Json(&req.entries.deposits))
        .bind(totals.total_revenue)
        .bind(totals.total_non_cash)
        .bind(totals.expected_cash)
        .bind(totals.actual_cash)
        .bind(totals.difference)
        .fetch_one(&db_pool)
        .await?;

    tracing::info!(
        shift_id = row.id,
        shift_date = %row.shift_date,
        difference = %row.difference,
        "Shift closed"
    );

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn update_shift(
    State(AppState { db_pool }): State<AppState>,
    axum::extract::Path(id): axum::extract::Path<i64>,
    Json(req): Json<SaveShiftRequest>,
) -> Result<Json<ShiftResponse>, AppError> {
    let person = resolve_responsible(&db_pool, req.responsible_id).await?;
    let totals = compute_totals(&req.entries);

    let row = sqlx::query_as::<_, ShiftRow>(UPDATE_SHIFT_SQL)
        .bind(id)
        .bind(req.shift_date)
        .bind(req.shift_segment.as_str())
        .bind(person.id)
        .bind(&person.display_name)
        .bind(req.entries.fuel_sales)
        .bind(req.entries.store_sales)
        .bind(req.entries.card_total)
        .bind(sqlx::types::Json(&req.entries.vouchers))
        .bind(sqlx::types::Json(&req.entries.expenses))
        .bind(sqlx::types::Json(&req.entries.deposits))
        .bind(totals.total_revenue)
        .bind(totals.total_non_cash)
        .bind(totals.expected_cash)
        .bind(totals.actual_cash)
        .bind(totals.difference)
        .fetch_optional(&db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Shift not found"))?;

    Ok(Json(row.into()))
}

pub async fn get_shift(
    State(AppState { db_pool }): State<AppState>,
    axum::extract::Path(id): axum::extract::Path<i64>,
) -> Result<Json<ShiftResponse>, AppError> {
    let row = sqlx::query_as::<_, ShiftRow>("SELECT * FROM shifts WHERE id = $1")
        .bind(id)
        .fetch_optional(&db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Shift not found"))?;

    Ok(Json(row.into()))
}

pub async fn list_shifts(
    State(AppState { db_pool }): State<AppState>,
    axum::extract::Query(params): axum::extract::Query<std::collections::HashMap<String, String>>,
) -> Result<Json<Vec<ShiftSummary>>, AppError> {
    let start_date = super::date_param(&params, "start_date")?;
    let end_date = super::date_param(&params, "end_date")?;
    let responsible = params.get("responsible").map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

    let mut query_str = String::from(
        r#"SELECT id, shift_date, shift_segment, responsible_name, total_revenue, difference
        FROM shifts
        WHERE 1=1"#,
    );

    let mut param_num = 0;
    if start_date.is_some() {
        param_num += 1;
        query_str.push_str(&format!(" AND shift_date >= ${}", param_num));
    }
    if end_date.is_some() {
        param_num += 1;
        query_str.push_str(&format!(" AND shift_date <= ${}", param_num));
    }
    if responsible.is_some() {
        param_num += 1;
        query_str.push_str(&format!(" AND responsible_name ILIKE ${}", param_num));
    }

    query_str.push_str(" ORDER BY shift_date DESC, id DESC");

    let mut query = sqlx::query_as::<_, ShiftSummaryRow>(&query_str);
    if let Some(d) = start_date {
        query = query.bind(d);
    }
    if let Some(d) = end_date {
        query = query.bind(d);
    }
    if let Some(name) = &responsible {
        query = query.bind(format!("%{name}%"));
    }

    let rows = query.fetch_all(&db_pool).await?;

    Ok(Json(rows.into_iter().map(ShiftSummary::from).collect()))
}

pub async fn delete_shift(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    axum::extract::Path(id): axum::extract::Path<i64>,
) -> Result<StatusCode, AppError> {
    if !auth.is_manager() {
        return Err(AppError::forbidden("Only managers can delete shifts"));
    }

    let result = sqlx::query("DELETE FROM shifts WHERE id = $1")
        .bind(id)
        .execute(&db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Shift not found"));
    }

    tracing::info!(shift_id = id, deleted_by = %auth.username, "Shift deleted");

    Ok(StatusCode::NO_CONTENT)
}

// The save gate: a shift record is never persisted without an existing,
// active responsible person. The display name is copied onto the record at
// entry time and later renames leave history untouched.
async fn resolve_responsible(
    db_pool: &PgPool,
    responsible_id: Option<i64>,
) -> Result<Person, AppError> {
    let id = responsible_id
        .ok_or_else(|| AppError::validation("A responsible person must be selected"))?;

    let person = sqlx::query_as::<_, Person>(
        "SELECT id, display_name, is_active, created_at FROM people WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Responsible person not found"))?;

    if !person.is_active {
        return Err(AppError::validation("Responsible person is not active"));
    }

    Ok(person)
}
