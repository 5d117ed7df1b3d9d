pub mod chat;
pub mod contact;
pub mod health;
pub mod service;
pub mod team;

use axum::http::Uri;
use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::state::AppState;

/// Connection for read-model queries, or 503 while running without a database.
fn db(state: &AppState) -> Result<&DatabaseConnection, AppError> {
    state
        .db
        .conn()
        .ok_or_else(|| AppError::ServiceUnavailable("The database is currently unavailable".into()))
}

/// Parses a label-typed query or path value, reporting bad input as a validation error.
fn parse_label<T>(value: Option<&str>) -> Result<Option<T>, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|e: T::Err| AppError::invalid(e.to_string())),
        None => Ok(None),
    }
}

pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Route {} not found", uri.path()))
}
