use axum::{extract::State, Json, Extension};
use axum::http::StatusCode;

use crate::state::AppState;
use crate::error::AppError;
use crate::dtos::person::{CreatePersonRequest, RenamePersonRequest, SetActiveRequest};
use crate::middleware::auth::AuthContext;
use crate::models::person::Person;

pub async fn create_person(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreatePersonRequest>,
) -> Result<(StatusCode, Json<Person>), AppError> {
    if !auth.is_manager() {
        return Err(AppError::forbidden("Only managers can manage the roster"));
    }

    let name = req.display_name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Display name is required"));
    }

    let person = sqlx::query_as::<_, Person>(
        r#"INSERT INTO people (display_name)
        VALUES ($1)
        RETURNING id, display_name, is_active, created_at"#,
    )
    .bind(name)
    .fetch_one(&db_pool)
    .await
    .map_err(|e| {
        if let Some(db) = e.as_database_error() {
            if db.code().as_deref() == Some("23505") {
                return AppError::conflict("A person with that name already exists");
            }
        }
        AppError::db(e)
    })?;

    Ok((StatusCode::CREATED, Json(person)))
}

pub async fn list_people(
    State(AppState { db_pool }): State<AppState>,
    axum::extract::Query(params): axum::extract::Query<std::collections::HashMap<String, String>>,
) -> Result<Json<Vec<Person>>, AppError> {
    let active_only = params
        .get("active_only")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);

    let query_str = if active_only {
        r#"SELECT id, display_name, is_active, created_at FROM people
        WHERE is_active ORDER BY display_name ASC"#
    } else {
        r#"SELECT id, display_name, is_active, created_at FROM people
        ORDER BY display_name ASC"#
    };

    let people = sqlx::query_as::<_, Person>(query_str)
        .fetch_all(&db_pool)
        .await?;

    Ok(Json(people))
}

// Renames in place. Shift records keep the display name that was copied when
// they were entered; history is deliberately not rewritten.
pub async fn rename_person(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    axum::extract::Path(id): axum::extract::Path<i64>,
    Json(req): Json<RenamePersonRequest>,
) -> Result<Json<Person>, AppError> {
    if !auth.is_manager() {
        return Err(AppError::forbidden("Only managers can manage the roster"));
    }

    let name = req.display_name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Display name is required"));
    }

    let person = sqlx::query_as::<_, Person>(
        r#"UPDATE people SET display_name = $2
        WHERE id = $1
        RETURNING id, display_name, is_active, created_at"#,
    )
    .bind(id)
    .bind(name)
    .fetch_optional(&db_pool)
    .await
    .map_err(|e| {
        if let Some(db) = e.as_database_error() {
            if db.code().as_deref() == Some("23505") {
                return AppError::conflict("A person with that name already exists");
            }
        }
        AppError::db(e)
    })?
    .ok_or_else(|| AppError::not_found("Person not found"))?;

    Ok(Json(person))
}

// No delete route exists: people are only ever deactivated so historical
// records keep a resolvable reference.
pub async fn set_person_active(
    State(AppState { db_pool }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    axum::extract::Path(id): axum::extract::Path<i64>,
    Json(req): Json<SetActiveRequest>,
) -> Result<Json<Person>, AppError> {
    if !auth.is_manager() {
        return Err(AppError::forbidden("Only managers can manage the roster"));
    }

    let person = sqlx::query_as::<_, Person>(
        r#"UPDATE people SET is_active = $2
        WHERE id = $1
        RETURNING id, display_name, is_active, created_at"#,
    )
    .bind(id)
    .bind(req.is_active)
    .fetch_optional(&db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Person not found"))?;

    Ok(Json(person))
}
