use crate::errors::AppError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::SaveTemplateRequest;
use log::warn;

/// Creates a template or fully replaces an existing one.
///
/// Name and content are trimmed and must not be blank; `fields` is derived
/// from the saved content and returned with the stored record.
pub async fn process(
    state: web::Data<AppState>,
    payload: web::Json<SaveTemplateRequest>,
) -> Result<HttpResponse, AppError> {
    let mut repository = state.repository.write().await;
    match repository.save_template(&payload) {
        Ok(template) => Ok(HttpResponse::Ok().json(template)),
        Err(AppError::Validation(e)) => {
            warn!("Rejected template save: {}", e);
            Err(AppError::Validation(e))
        }
        Err(e) => Err(e),
    }
}
