//! # View Service
//!
//! `GET /api/view` resolves the navigation state from query parameters and
//! describes what the current view shows. `?doc={id}` is the link handed out
//! to recipients; unknown ids fall back to the list.

use crate::presentation::render_document_html;
use crate::repository::Repository;
use crate::state::AppState;
use actix_web::web::{get, resource};
use actix_web::{web, HttpResponse, Resource, Responder};
use common::fields::SUGGESTED_FIELDS;
use common::view::View;
use serde::Deserialize;
use serde_json::{json, Value};

const API_PATH: &str = "/api/view";

#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    doc: Option<String>,
    /// Template id to edit.
    edit: Option<String>,
    /// Template id to create a document from.
    create: Option<String>,
    #[serde(default)]
    new: bool,
}

fn resolve(query: &ViewQuery, repository: &Repository) -> View {
    if query.doc.is_some() {
        return View::from_document_link(query.doc.as_deref(), repository.documents());
    }
    if let Some(id) = &query.create {
        return repository
            .template(id)
            .map(|t| View::CreateDocument(t.clone()))
            .unwrap_or(View::List);
    }
    if let Some(id) = &query.edit {
        return repository
            .template(id)
            .map(|t| View::EditTemplate(Some(t.clone())))
            .unwrap_or(View::List);
    }
    if query.new {
        return View::EditTemplate(None);
    }
    View::List
}

fn describe(view: &View, repository: &Repository) -> Value {
    match view {
        View::List => json!({
            "templates": repository.templates(),
            "documents": repository.documents(),
        }),
        View::EditTemplate(_) => json!({ "suggestedFields": SUGGESTED_FIELDS }),
        View::CreateDocument(template) => json!({ "visibleFields": template.visible_fields() }),
        View::ViewDocument(document) => json!({
            "html": render_document_html(document, document.signature.as_ref()),
            "statusLabel": document.status.label(),
        }),
    }
}

pub async fn process(state: web::Data<AppState>, query: web::Query<ViewQuery>) -> impl Responder {
    let repository = state.repository.read().await;
    let view = resolve(&query, &repository);
    let detail = describe(&view, &repository);
    HttpResponse::Ok().json(json!({
        "title": view.title(),
        "view": view,
        "detail": detail,
    }))
}

pub fn configure_routes() -> Resource {
    resource(API_PATH).route(get().to(process))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use common::requests::{CreateDocumentRequest, SaveTemplateRequest};
    use std::collections::BTreeMap;

    async fn seeded() -> (AppState, String, String) {
        let state = AppState::in_memory();
        let (template_id, document_id) = {
            let mut repository = state.repository.write().await;
            let template = repository
                .save_template(&SaveTemplateRequest {
                    id: None,
                    name: "Vertrag".into(),
                    content: "{Name}".into(),
                })
                .unwrap();
            let document = repository
                .create_document(&CreateDocumentRequest {
                    template_id: template.id.clone(),
                    fields: BTreeMap::from([("Name".to_string(), "Alice".to_string())]),
                    recipient_email: "a@b.de".into(),
                })
                .unwrap();
            (template.id, document.id)
        };
        (state, template_id, document_id)
    }

    #[actix_web::test]
    async fn document_link_opens_document_view() {
        let (state, _, document_id) = seeded().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(configure_routes()),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/view?doc={document_id}"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["view"]["type"], "view-document");
        assert_eq!(body["detail"]["html"], "Alice");
        assert_eq!(body["detail"]["statusLabel"], "Ausstehend");
    }

    #[actix_web::test]
    async fn unknown_link_falls_back_to_list() {
        let (state, _, _) = seeded().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(configure_routes()),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/view?doc=nope").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["view"]["type"], "list");
        assert_eq!(body["title"], "Vorlagen");
        assert_eq!(body["detail"]["templates"].as_array().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn template_views() {
        let (state, template_id, _) = seeded().await;
        let repository = state.repository.read().await;

        let create = ViewQuery {
            create: Some(template_id.clone()),
            ..Default::default()
        };
        let view = resolve(&create, &repository);
        assert_eq!(view.title(), "Dokument erstellen");
        assert_eq!(describe(&view, &repository)["visibleFields"], json!(["Name"]));

        let edit = ViewQuery {
            edit: Some(template_id),
            ..Default::default()
        };
        assert_eq!(resolve(&edit, &repository).title(), "Vorlage bearbeiten");

        let new = ViewQuery {
            new: true,
            ..Default::default()
        };
        assert_eq!(resolve(&new, &repository), View::EditTemplate(None));
    }
}
