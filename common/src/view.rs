//! Application views. Navigation only; no behavior hangs off a view beyond
//! choosing what to show.

use crate::model::document::Document;
use crate::model::template::Template;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum View {
    List,
    /// `None` when a new template is being written.
    EditTemplate(Option<Template>),
    CreateDocument(Template),
    ViewDocument(Document),
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::List => "Vorlagen",
            View::EditTemplate(Some(_)) => "Vorlage bearbeiten",
            View::EditTemplate(None) => "Neue Vorlage erstellen",
            View::CreateDocument(_) => "Dokument erstellen",
            View::ViewDocument(_) => "Dokument",
        }
    }

    /// Resolves a `?doc=<id>` link. Unknown ids fall back to the list.
    pub fn from_document_link(doc_id: Option<&str>, documents: &[Document]) -> View {
        doc_id
            .and_then(|id| documents.iter().find(|d| d.id == id))
            .map(|d| View::ViewDocument(d.clone()))
            .unwrap_or(View::List)
    }
}
