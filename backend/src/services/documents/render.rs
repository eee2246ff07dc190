use crate::errors::AppError;
use crate::presentation::render_document_html;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::document::DocumentStatus;
use common::signature::SignaturePayload;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Rendered<'a> {
    html: String,
    status: DocumentStatus,
    status_label: &'static str,
    signature: Option<&'a SignaturePayload>,
    has_signature_field: bool,
}

/// The document as shown to the signer.
pub async fn process(
    state: web::Data<AppState>,
    document_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let repository = state.repository.read().await;
    let document = repository
        .document(&document_id)
        .ok_or_else(|| AppError::NotFound(format!("Document {}", document_id)))?;

    let signature = document.signature.as_ref();
    Ok(HttpResponse::Ok().json(Rendered {
        html: render_document_html(document, signature),
        status: document.status,
        status_label: document.status.label(),
        signature,
        has_signature_field: document.has_signature_field(),
    }))
}
