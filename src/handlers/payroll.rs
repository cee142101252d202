use axum::{extract::State, Json, Extension};
use axum::http::StatusCode;
use rust_decimal::Decimal;

use crate::state::AppState;
use crate::error::AppError;
use crate::dtos::payroll::{CreatePayrollRequest, PayrollEntryResponse, PayrollListResponse};
use crate::middleware::auth::AuthContext;
use crate::models::payroll::PayrollRow;

pub async fn create_payroll_entry(
    State(AppState { db_pool }): State<AppState>,
    Json(req): Json<CreatePayrollRequest>,
) -> Result<(StatusCode, Json<PayrollEntryResponse>), AppError> {
    if req.amount <= Decimal::ZERO {
        return Err(AppError::validation("Amount must be greater than 0"));
    }

    // Same denormalization as shifts: the name is copied at entry time.
    let person = sqlx::query_as::<_, (String, bool)>(
        "SELECT display_name, is_active FROM people WHERE id = $1",
    )
    .bind(req.person_id)
    .fetch_optional(&db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Person not found"))?;

    if !person.1 {
        return Err(AppError::validation("Person is not active"));
    }

    let row = sqlx::query_as::<_, PayrollRow>(
        r#"INSERT INTO payroll_entries (entry_date, person_id, person_name, kind, amount, note)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, entry_date, person_id, person_name, kind, amount, note, created_at"#,
    )
    .bind(req.entry_date)
    .bind(req.person_id)
    .bind(&person.0)
    .bind(req.kind.as_str())
    .bind(req.amount)
    .bind(&req.note)
    .fetch_one(&db_pool)
    .await?;

    tracing::info!(
        payroll_id = row.id,
        kind = %row.kind,
        amount = %row.amount,
        "Payroll entry recorded"
    );

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn list_payroll_entries(
    State(AppState { db_pool }): State<AppState>,
    axum::extract::Query(params): axum::extract::Query<std::collections::HashMap<String, String>>,
) -> Result<Json<PayrollListResponse>, AppError> {
    let start_date = super::date_param(&params, "start_date")?;
    let end_date = super::date_param(&params, "end_date")?;

    let mut query_str = String::from(
        r#"SELECT id, entry_date, person_id, person_name, kind, amount, note, created_at
        FROM payroll_entries
        WHERE 1=1"#,
    );

    let mut param_num = 0;
    if start_date.is_some() {
        param_num += 1;
        query_str.push_str(&format!(" AND entry_date >= ${}", param_num));
    }
    if end_date.is_some() {
        param_num += 1;
        query_str.push_str(&format!(" AND entry_date <= ${}", param_num));
    }

    query_str.push_str(" ORDER BY entry_date DESC, id DESC");

    let mut query = sqlx::query_as::<_, PayrollRow>(&query_str);
    if let Some(d) = start_date {
        query = query.bind(d);
    }
    if let Some(d) = end_date {
        query = query.bind(d);
    }

    let rows = query.fetch_all(&db_pool).await?;

    let total: Decimal = rows.iter().map(|r| r.amount).sum();
    let entries = rows.into_iter().map(PayrollEntryResponse::from).collect();

    Ok(Json(PayrollListResponse { entries, total }))
}

pub async fn delete_payroll_entry(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    axum::extract::Path(id): axum::extract::Path<i64>,
) -> Result<StatusCode, AppError> {
    if !auth.is_manager() {
        return Err(AppError::forbidden("Only managers can delete payroll entries"));
    }

    let result = sqlx::query("DELETE FROM payroll_entries WHERE id = $1")
        .bind(id)
        .execute(&db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Payroll entry not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}
