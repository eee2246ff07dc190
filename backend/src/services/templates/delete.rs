use crate::errors::AppError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

/// Deletes a template. Documents created from it are not affected.
pub async fn process(
    state: web::Data<AppState>,
    template_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let mut repository = state.repository.write().await;
    repository.delete_template(&template_id)?;
    Ok(HttpResponse::NoContent().finish())
}
