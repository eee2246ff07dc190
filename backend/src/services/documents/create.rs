use crate::errors::AppError;
use crate::mail::{creation_notice, document_link};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::document::Document;
use common::requests::CreateDocumentRequest;
use log::warn;
use serde::Serialize;

#[derive(Serialize)]
struct Created {
    document: Document,
    /// Link the recipient opens the document with.
    link: String,
    notice: String,
}

/// Instantiates a template for one recipient.
///
/// Every non-reserved field needs a non-blank value and the recipient must be
/// given; otherwise nothing is stored and `400` carries the message.
pub async fn process(
    state: web::Data<AppState>,
    payload: web::Json<CreateDocumentRequest>,
) -> Result<HttpResponse, AppError> {
    let document = {
        let mut repository = state.repository.write().await;
        match repository.create_document(&payload) {
            Ok(document) => document,
            Err(AppError::Validation(e)) => {
                warn!("Rejected document for template {}: {}", payload.template_id, e);
                return Err(AppError::Validation(e));
            }
            Err(e) => return Err(e),
        }
    };

    let link = document_link(&state.config.public_url, &document.id);
    let notice = creation_notice(&document, &link);
    Ok(HttpResponse::Created().json(Created {
        document,
        link,
        notice,
    }))
}
