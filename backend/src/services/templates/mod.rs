//! # Template Service Module
//!
//! Routes under `/api/templates`.
//!
//! ## Sub-modules:
//! - `list` / `get`: read templates with their derived field lists.
//! - `save`: create or fully replace a template; fields are re-extracted.
//! - `delete`: remove a template (documents keep their own copy).
//! - `form`: the input fields needed to create a document from a template.

mod delete;
mod form;
mod get;
mod list;
mod save;

use actix_web::web::{delete, get, post, scope};
use actix_web::Scope;

/// The base path for all template-related API endpoints.
const API_PATH: &str = "/api/templates";

/// Configures and returns the Actix `Scope` for all template-related routes.
///
/// # Registered Routes:
///
/// *   **`GET /`**: all templates in creation order.
/// *   **`POST /save`**: `{ id?, name, content }`. Without `id` a new template is
///     created, with `id` the stored one is replaced. Blank name or content is
///     rejected with `400`.
/// *   **`GET /suggested-fields`**: field names offered for quick insertion.
/// *   **`GET /{template_id}`**: one template, `404` if unknown.
/// *   **`DELETE /{template_id}`**: removes the template.
/// *   **`GET /{template_id}/form`**: the non-reserved fields a document needs.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("/save", post().to(save::process))
        .route("/suggested-fields", get().to(form::suggested_fields))
        .route("/{template_id}", get().to(get::process))
        .route("/{template_id}", delete().to(delete::process))
        .route("/{template_id}/form", get().to(form::process))
}
