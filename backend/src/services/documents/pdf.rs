use crate::errors::AppError;
use crate::export::pdf::export_document_pdf;
use crate::state::AppState;
use actix_files::NamedFile;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::web;

/// Exports a signed document as PDF and sends it as a download.
///
/// Only one export runs at a time; concurrent requests get `409`. The
/// document itself is never modified.
pub async fn process(
    state: web::Data<AppState>,
    document_id: web::Path<String>,
) -> Result<NamedFile, AppError> {
    let document = {
        let repository = state.repository.read().await;
        repository
            .document(&document_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Document {}", document_id)))?
    };
    if !document.is_signed() {
        return Err(AppError::NotSigned);
    }

    let ticket = state.export.try_begin()?;
    let config = state.config.clone();
    let exported = tokio::task::spawn_blocking(move || {
        let _ticket = ticket;
        export_document_pdf(&document, &config)
    })
    .await
    .map_err(|e| AppError::Export(e.to_string()))??;

    let file = NamedFile::open(&exported.path).map_err(|e| AppError::Export(e.to_string()))?;
    Ok(file.set_content_disposition(ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(exported.filename)],
    }))
}
