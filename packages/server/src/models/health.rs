use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    /// `connected` or `disconnected`.
    #[schema(example = "connected")]
    pub database: &'static str,
    /// `configured` or `not configured`.
    #[schema(example = "configured")]
    pub mailgun: &'static str,
    #[schema(example = "0.1.0")]
    pub version: &'static str,
}
