use crate::errors::AppError;
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder};
use common::fields::SUGGESTED_FIELDS;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentForm<'a> {
    template_id: &'a str,
    template_name: &'a str,
    /// Fields the recipient form asks for; `DATUM` and `UNTERSCHRIFT` are
    /// filled automatically.
    visible_fields: Vec<&'a str>,
}

/// Input fields needed to create a document from a template.
pub async fn process(
    state: web::Data<AppState>,
    template_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let repository = state.repository.read().await;
    let template = repository
        .template(&template_id)
        .ok_or_else(|| AppError::NotFound(format!("Template {}", template_id)))?;

    Ok(HttpResponse::Ok().json(DocumentForm {
        template_id: &template.id,
        template_name: &template.name,
        visible_fields: template.visible_fields(),
    }))
}

/// Quick-insert fields offered by the editor.
pub async fn suggested_fields() -> impl Responder {
    HttpResponse::Ok().json(SUGGESTED_FIELDS)
}
