use crate::errors::AppError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

pub async fn process(
    state: web::Data<AppState>,
    document_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let repository = state.repository.read().await;
    let document = repository
        .document(&document_id)
        .ok_or_else(|| AppError::NotFound(format!("Document {}", document_id)))?;
    Ok(HttpResponse::Ok().json(document))
}
