/// Health check endpoint
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected"
/// }
/// ```
///
/// A failing database ping turns the status into `"degraded"`; the endpoint
/// itself always answers 200.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use lms_shared::db::pool;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

impl HealthResponse {
    fn from_database(connected: bool) -> Self {
        let (status, database) = if connected {
            ("healthy", "connected")
        } else {
            ("degraded", "disconnected")
        };

        Self {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: database.to_string(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let connected = match pool::health_check(&state.db).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            false
        }
    };

    Ok(Json(HealthResponse::from_database(connected)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_status() {
        let up = HealthResponse::from_database(true);
        assert_eq!(up.status, "healthy");
        assert_eq!(up.database, "connected");

        let down = HealthResponse::from_database(false);
        assert_eq!(down.status, "degraded");
        assert_eq!(down.database, "disconnected");
    }
}
