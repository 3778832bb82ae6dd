use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::importer::ImportError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    MalformedPayload(String),

    #[error("No hanja content found for Day {day}")]
    SectionNotFound { day: u32, lines_scanned: usize },

    #[error("Day {0} has not been imported")]
    DayNotImported(u32),

    #[error("{0}")]
    InternalError(String),
}

impl From<ImportError> for AppError {
    fn from(e: ImportError) -> Self {
        match e {
            ImportError::UnknownDay(_) => AppError::MalformedPayload(e.to_string()),
            ImportError::NotFound { day, lines_scanned } => {
                AppError::SectionNotFound { day, lines_scanned }
            }
            ImportError::Storage(inner) => AppError::InternalError(format!("{:#}", inner)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            AppError::MalformedPayload(_) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            AppError::SectionNotFound { lines_scanned, .. } => (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": message,
                    "debug": { "linesScanned": lines_scanned },
                })),
            )
                .into_response(),
            AppError::DayNotImported(_) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            AppError::InternalError(_) => {
                error!("Request failed: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": message }))).into_response()
            }
        }
    }
}
