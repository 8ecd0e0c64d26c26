// src/error.rs
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Failure of a dashboard operation, already phrased for the person at the controls.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("{0}")]
    Invalid(String),

    #[error("wallet is not connected")]
    NotConnected,

    #[error("another operation is still in progress")]
    Busy,

    #[error("Failed to {action}: {reason:#}")]
    Failed {
        action: &'static str,
        reason: anyhow::Error,
    },
}

impl DashboardError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    pub fn failed(action: &'static str, reason: anyhow::Error) -> Self {
        Self::Failed { action, reason }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Invalid(_) => StatusCode::BAD_REQUEST,
            Self::NotConnected | Self::Busy => StatusCode::CONFLICT,
            Self::Failed { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;
