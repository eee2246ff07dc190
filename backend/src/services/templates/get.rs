use crate::errors::AppError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

/// Returns a single template with its derived field list.
pub async fn process(
    state: web::Data<AppState>,
    template_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let repository = state.repository.read().await;
    let template = repository
        .template(&template_id)
        .ok_or_else(|| AppError::NotFound(format!("Template {}", template_id)))?;
    Ok(HttpResponse::Ok().json(template))
}
