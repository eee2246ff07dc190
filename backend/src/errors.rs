use actix_web::{HttpResponse, ResponseError};
use common::requests::ValidationError;
use common::signature::SignatureError;
use log::error;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Validation(ValidationError),
    Signature(SignatureError),
    NotFound(String),
    /// Export requested for a document that carries no signature.
    NotSigned,
    /// Another export is still running.
    ExportBusy,
    Export(String),
    Store(String),
    /// A background task failed to complete.
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "{e}"),
            AppError::Signature(e) => write!(f, "{e}"),
            AppError::NotFound(what) => write!(f, "{what} not found"),
            AppError::NotSigned => write!(f, "Document has not been signed yet"),
            AppError::ExportBusy => write!(f, "A PDF export is already running"),
            AppError::Export(e) => write!(f, "PDF export failed: {e}"),
            AppError::Store(e) => write!(f, "Storage error: {e}"),
            AppError::Internal(e) => write!(f, "Internal error: {e}"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(_) | AppError::Signature(_) => {
                HttpResponse::BadRequest().body(self.to_string())
            }
            AppError::NotFound(_) => HttpResponse::NotFound().body(self.to_string()),
            AppError::NotSigned | AppError::ExportBusy => {
                HttpResponse::Conflict().body(self.to_string())
            }
            AppError::Export(_) => {
                error!("{self}");
                HttpResponse::InternalServerError().body("Fehler beim Erstellen der PDF-Datei")
            }
            AppError::Store(_) | AppError::Internal(_) => {
                error!("{self}");
                HttpResponse::InternalServerError().body("Internal Server Error")
            }
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e)
    }
}

impl From<SignatureError> for AppError {
    fn from(e: SignatureError) -> Self {
        AppError::Signature(e)
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Store(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Store(e.to_string())
    }
}

impl From<genpdf::error::Error> for AppError {
    fn from(e: genpdf::error::Error) -> Self {
        AppError::Export(e.to_string())
    }
}
