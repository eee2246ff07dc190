use crate::errors::AppError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::SignatureRequest;

/// Reports a signature change directly.
///
/// A payload signs the document (again, if already signed). `null` stands for
/// a cleared surface and leaves the stored document as it is.
pub async fn process(
    state: web::Data<AppState>,
    document_id: web::Path<String>,
    payload: web::Json<SignatureRequest>,
) -> Result<HttpResponse, AppError> {
    let SignatureRequest { signature } = payload.into_inner();
    if let Some(signature) = &signature {
        signature.decode()?;
    }

    let mut repository = state.repository.write().await;
    let document = repository.apply_signature(&document_id, signature)?;
    Ok(HttpResponse::Ok().json(document))
}
