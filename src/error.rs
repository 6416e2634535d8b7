use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use crate::entries::dto::ValidationErrors;

#[derive(Debug, Error)]
pub enum EntryError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Food entry with id {0} not found")]
    NotFound(i32),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl From<ValidationErrors> for EntryError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl IntoResponse for EntryError {
    fn into_response(self) -> Response {
        match self {
            EntryError::Validation(fields) => {
                warn!(errors = %fields, "rejected invalid input");
                (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({
                        "error": "validation failed",
                        "fields": fields,
                    })),
                )
                    .into_response()
            }
            EntryError::NotFound(id) => {
                warn!(%id, "food entry not found");
                let msg = EntryError::NotFound(id).to_string();
                (StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": msg }))).into_response()
            }
            EntryError::Store(e) => {
                let msg = format!("{e:#}");
                error!(error = %msg, "store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({ "error": msg })),
                )
                    .into_response()
            }
        }
    }
}
