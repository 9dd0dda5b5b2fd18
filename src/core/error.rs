use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::shared::templates::{escape_markup, TemplateError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Template(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                "Terjadi gangguan pada basis data. Silakan coba lagi.".to_string()
            }
            AppError::Template(ref e) => {
                tracing::error!("Template error: {}", e);
                "Terjadi kesalahan pada server.".to_string()
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                "Terjadi kesalahan pada server.".to_string()
            }
            AppError::NotFound(msg) | AppError::Validation(msg) | AppError::BadRequest(msg) => msg,
        };

        (status, Html(error_page(status, &message))).into_response()
    }
}

// Rendered without the template engine so it still works when templates fail.
fn error_page(status: StatusCode, message: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"id\"><head><meta charset=\"utf-8\"><title>{code} - Kode Pos Indonesia</title></head>\
         <body><main><h1>{code}</h1><p>{message}</p><p><a href=\"/\">Kembali ke beranda</a></p></main></body></html>",
        code = status.as_u16(),
        message = escape_markup(message),
    )
}

pub type Result<T> = std::result::Result<T, AppError>;
