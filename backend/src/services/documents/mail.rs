use crate::errors::AppError;
use crate::mail::{document_link, signed_document_mail, MailDraft};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde::Serialize;

#[derive(Serialize)]
struct MailResponse {
    draft: MailDraft,
    mailto: String,
    link: String,
}

/// Mail draft for sending a signed document on.
pub async fn process(
    state: web::Data<AppState>,
    document_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let repository = state.repository.read().await;
    let document = repository
        .document(&document_id)
        .ok_or_else(|| AppError::NotFound(format!("Document {}", document_id)))?;
    if !document.is_signed() {
        return Err(AppError::NotSigned);
    }

    let draft = signed_document_mail(document);
    Ok(HttpResponse::Ok().json(MailResponse {
        mailto: draft.mailto_link(),
        link: document_link(&state.config.public_url, &document.id),
        draft,
    }))
}
