//! Request payloads shared between the HTTP API and its clients, together
//! with the validation that has to pass before anything is stored.

use crate::fields::is_reserved;
use crate::model::template::Template;
use crate::signature::{PointerEvent, SignaturePayload, SurfaceRect};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Rejection of a request before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required template fields left blank, in template order.
    MissingFields(Vec<String>),
    MissingRecipient,
    MissingTemplateName,
    MissingTemplateContent,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingFields(fields) => {
                write!(f, "Bitte füllen Sie alle Felder aus: {}", fields.join(", "))
            }
            ValidationError::MissingRecipient => {
                write!(f, "Bitte geben Sie eine E-Mail-Adresse ein")
            }
            ValidationError::MissingTemplateName | ValidationError::MissingTemplateContent => {
                write!(f, "Bitte füllen Sie alle Felder aus")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Create (`id` absent) or fully replace (`id` present) a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveTemplateRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub content: String,
}

impl SaveTemplateRequest {
    /// Checks the draft and returns the trimmed name and content.
    pub fn validate(&self) -> Result<(String, String), ValidationError> {
        let name = self.name.trim();
        let content = self.content.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingTemplateName);
        }
        if content.is_empty() {
            return Err(ValidationError::MissingTemplateContent);
        }
        Ok((name.to_string(), content.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    pub template_id: String,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    pub recipient_email: String,
}

impl CreateDocumentRequest {
    /// Every non-reserved template field needs a non-blank value and the
    /// recipient must not be blank. Fields are checked first.
    pub fn validate(&self, template: &Template) -> Result<(), ValidationError> {
        let missing: Vec<String> = template
            .fields
            .iter()
            .filter(|f| !is_reserved(f))
            .filter(|f| {
                self.fields
                    .get(f.as_str())
                    .is_none_or(|v| v.trim().is_empty())
            })
            .cloned()
            .collect();

        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }
        if self.recipient_email.trim().is_empty() {
            return Err(ValidationError::MissingRecipient);
        }
        Ok(())
    }
}

/// Direct signature update; `null` stands for a cleared surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureRequest {
    #[serde(default)]
    pub signature: Option<SignaturePayload>,
}

/// Pointer events recorded on a capture surface of the given box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrokeRequest {
    pub rect: SurfaceRect,
    pub events: Vec<PointerEvent>,
}
