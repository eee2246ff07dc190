//! # Repository
//!
//! Owns the template and document collections in insertion order. Both are
//! loaded once from the snapshot store; every mutation writes the complete
//! affected collection back under its key.

use crate::errors::AppError;
use crate::store::{SnapshotStore, DOCUMENTS_KEY, TEMPLATES_KEY};
use chrono::Utc;
use common::model::document::Document;
use common::model::template::Template;
use common::requests::{CreateDocumentRequest, SaveTemplateRequest};
use common::signature::SignaturePayload;
use log::{debug, error, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

pub struct Repository {
    store: Box<dyn SnapshotStore>,
    templates: Vec<Template>,
    documents: Vec<Document>,
}

impl Repository {
    /// Loads both collections. Unreadable snapshots start out empty.
    pub fn open(store: Box<dyn SnapshotStore>) -> Result<Self, AppError> {
        let templates = load_collection(store.as_ref(), TEMPLATES_KEY)?;
        let documents = load_collection(store.as_ref(), DOCUMENTS_KEY)?;
        info!(
            "Loaded {} templates and {} documents",
            templates.len(),
            documents.len()
        );

        Ok(Self {
            store,
            templates,
            documents,
        })
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn template(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Creates a template, or fully replaces the one named by `request.id`.
    /// `fields` is always re-derived from the saved content.
    pub fn save_template(&mut self, request: &SaveTemplateRequest) -> Result<Template, AppError> {
        let (name, content) = request.validate()?;
        let now = Utc::now();
        let mut templates = self.templates.clone();

        let saved = match &request.id {
            Some(id) => {
                let template = templates
                    .iter_mut()
                    .find(|t| &t.id == id)
                    .ok_or_else(|| AppError::NotFound(format!("Template {id}")))?;
                template.replace(name, content, now);
                template.clone()
            }
            None => {
                let template = Template::new(Uuid::new_v4().to_string(), name, content, now);
                templates.push(template.clone());
                template
            }
        };

        self.templates = commit(self.store.as_ref(), TEMPLATES_KEY, templates)?;
        info!("Saved template {} ({} fields)", saved.id, saved.fields.len());
        Ok(saved)
    }

    /// Removes a template. Documents created from it keep their snapshot.
    pub fn delete_template(&mut self, id: &str) -> Result<Template, AppError> {
        let index = self
            .templates
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Template {id}")))?;
        let mut templates = self.templates.clone();
        let removed = templates.remove(index);

        self.templates = commit(self.store.as_ref(), TEMPLATES_KEY, templates)?;
        info!("Deleted template {}", removed.id);
        Ok(removed)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn document(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    /// Instantiates a template. Validation runs before anything is stored.
    pub fn create_document(
        &mut self,
        request: &CreateDocumentRequest,
    ) -> Result<Document, AppError> {
        let template = self
            .template(&request.template_id)
            .ok_or_else(|| AppError::NotFound(format!("Template {}", request.template_id)))?;
        request.validate(template)?;

        let document = Document::from_template(
            Uuid::new_v4().to_string(),
            template,
            request.fields.clone(),
            request.recipient_email.trim().to_string(),
            Utc::now(),
        );
        let mut documents = self.documents.clone();
        documents.push(document.clone());

        self.documents = commit(self.store.as_ref(), DOCUMENTS_KEY, documents)?;
        info!(
            "Created document {} from template {} for {}",
            document.id, document.template_id, document.recipient_email
        );
        Ok(document)
    }

    /// Applies a reported signature change. `None` leaves the stored
    /// document untouched and writes nothing.
    pub fn apply_signature(
        &mut self,
        id: &str,
        signature: Option<SignaturePayload>,
    ) -> Result<Document, AppError> {
        let index = self
            .documents
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Document {id}")))?;

        let Some(payload) = signature else {
            return Ok(self.documents[index].clone());
        };
        let mut documents = self.documents.clone();
        documents[index].sign(payload, Utc::now());
        let signed = documents[index].clone();

        self.documents = commit(self.store.as_ref(), DOCUMENTS_KEY, documents)?;
        info!("Document {} signed", signed.id);
        Ok(signed)
    }
}

/// Writes a candidate collection and hands it back only once it is stored,
/// so a failed write leaves the in-memory state as it was.
fn commit<T: Serialize>(
    store: &dyn SnapshotStore,
    key: &str,
    records: Vec<T>,
) -> Result<Vec<T>, AppError> {
    persist_collection(store, key, &records)?;
    Ok(records)
}

fn load_collection<T: DeserializeOwned>(
    store: &dyn SnapshotStore,
    key: &str,
) -> Result<Vec<T>, AppError> {
    let Some(raw) = store.load(key)? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str(&raw) {
        Ok(records) => Ok(records),
        Err(e) => {
            error!("Ignoring unreadable snapshot under {}: {}", key, e);
            Ok(Vec::new())
        }
    }
}

fn persist_collection<T: Serialize>(
    store: &dyn SnapshotStore,
    key: &str,
    records: &[T],
) -> Result<(), AppError> {
    let json = serde_json::to_string(records)?;
    store.save(key, &json)?;
    debug!("Persisted {} records under {}", records.len(), key);
    Ok(())
}
