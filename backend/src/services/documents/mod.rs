//! # Document Service Module
//!
//! Routes under `/api/documents`: creation from a template, display,
//! signature capture and the export/mail collaborators.
//!
//! ## Sub-modules:
//! - `create` / `list` / `get`: document records.
//! - `render`: the document as shown to the signer, signature block included.
//! - `sign` / `strokes`: signature changes, either as a finished payload or
//!   as recorded pointer events replayed on a capture surface.
//! - `pdf`: single-flight PDF export of signed documents.
//! - `mail`: mail draft for a signed document.

mod create;
mod get;
mod list;
mod mail;
mod pdf;
mod render;
mod sign;
mod strokes;

use actix_web::web::{get, post, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/documents";

/// Configures and returns the Actix `Scope` for all document-related routes.
///
/// # Registered Routes:
///
/// *   **`GET /`** / **`POST /`**: list documents, or create one from
///     `{ templateId, fields, recipientEmail }`.
/// *   **`GET /{document_id}`**: the stored record.
/// *   **`GET /{document_id}/render`**: display HTML and status.
/// *   **`GET /{document_id}/mail`**: mail draft, `409` while unsigned.
/// *   **`GET /{document_id}/pdf`**: PDF download, `409` while unsigned or
///     while another export runs.
/// *   **`PUT /{document_id}/signature`**: `{ signature: string | null }`.
/// *   **`POST /{document_id}/signature/strokes`**: `{ rect, events }`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(create::process))
        .route("/{document_id}", get().to(get::process))
        .route("/{document_id}/render", get().to(render::process))
        .route("/{document_id}/mail", get().to(mail::process))
        .route("/{document_id}/pdf", get().to(pdf::process))
        .route("/{document_id}/signature", put().to(sign::process))
        .route("/{document_id}/signature/strokes", post().to(strokes::process))
}
