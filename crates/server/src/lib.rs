use axum::{
    Json, extract::multipart::MultipartError, http::StatusCode, response::IntoResponse,
};
use engine::EngineError;

use serde::Serialize;
pub use ocr::{Ocr, OcrError, TesseractOcr};
pub use server::{ServerOptions, router, run_with_listener};

mod expenses;
mod health;
mod ocr;
mod server;

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Ocr(OcrError),
    Multipart(MultipartError),
    InvalidInput(String),
    Processing(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::InvalidExpense(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Ocr(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ServerError::Multipart(err) => (err.status(), err.body_text()),
            ServerError::InvalidInput(err) => (StatusCode::BAD_REQUEST, err),
            ServerError::Processing(err) => (StatusCode::INTERNAL_SERVER_ERROR, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<MultipartError> for ServerError {
    fn from(value: MultipartError) -> Self {
        Self::Multipart(value)
    }
}

impl From<OcrError> for ServerError {
    fn from(value: OcrError) -> Self {
        Self::Ocr(value)
    }
}
