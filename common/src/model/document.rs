use crate::fields::SIGNATURE_TOKEN;
use crate::model::template::Template;
use crate::signature::SignaturePayload;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Signing status of a document.
///
/// `Completed` is part of the stored format but no transition leads to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Signed,
    Completed,
}

impl DocumentStatus {
    /// Label shown next to the document title.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentStatus::Signed => "Signiert",
            DocumentStatus::Pending | DocumentStatus::Completed => "Ausstehend",
        }
    }
}

/// A value-filled, recipient-bound copy of a template.
///
/// `content`, `template_id` and `template_name` are snapshots taken at
/// creation and never change afterwards, whatever happens to the template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub template_id: String,
    pub template_name: String,
    pub content: String,
    pub fields: BTreeMap<String, String>,
    pub recipient_email: String,
    pub status: DocumentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<SignaturePayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// Instantiates `template` into a pending document.
    pub fn from_template(
        id: String,
        template: &Template,
        fields: BTreeMap<String, String>,
        recipient_email: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            template_id: template.id.clone(),
            template_name: template.name.clone(),
            content: template.content.clone(),
            fields,
            recipient_email,
            status: DocumentStatus::Pending,
            signature: None,
            signed_at: None,
            created_at: now,
        }
    }

    /// `pending -> signed`. Signing again overwrites signature and time.
    pub fn sign(&mut self, signature: SignaturePayload, now: DateTime<Utc>) {
        self.signature = Some(signature);
        self.signed_at = Some(now);
        self.status = DocumentStatus::Signed;
    }

    /// Applies a reported signature change to the stored record.
    ///
    /// `None` (a cleared capture surface) leaves status, signature and
    /// `signed_at` as they are. Returns whether the record changed.
    pub fn apply_signature(
        &mut self,
        signature: Option<SignaturePayload>,
        now: DateTime<Utc>,
    ) -> bool {
        match signature {
            Some(payload) => {
                self.sign(payload, now);
                true
            }
            None => false,
        }
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    pub fn has_signature_field(&self) -> bool {
        self.content.contains(SIGNATURE_TOKEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn document() -> Document {
        let template = Template::new(
            "t1".into(),
            "Vertrag".into(),
            "Hallo {Name}\n{UNTERSCHRIFT}".into(),
            at(0),
        );
        let fields = BTreeMap::from([("Name".to_string(), "Alice".to_string())]);
        Document::from_template("d1".into(), &template, fields, "a@b.de".into(), at(5))
    }

    fn payload(tag: &str) -> SignaturePayload {
        SignaturePayload::from_data_url(format!("data:image/png;base64,{}", tag))
    }

    #[test]
    fn new_document_is_pending_snapshot() {
        let doc = document();
        assert_eq!(doc.status, DocumentStatus::Pending);
        assert_eq!(doc.template_name, "Vertrag");
        assert_eq!(doc.content, "Hallo {Name}\n{UNTERSCHRIFT}");
        assert!(doc.signature.is_none());
        assert!(doc.signed_at.is_none());
        assert!(doc.has_signature_field());
    }

    #[test]
    fn signing_sets_status_and_time() {
        let mut doc = document();
        doc.sign(payload("AAA"), at(100));

        assert_eq!(doc.status, DocumentStatus::Signed);
        assert_eq!(doc.signature, Some(payload("AAA")));
        assert_eq!(doc.signed_at, Some(at(100)));
    }

    #[test]
    fn signing_twice_overwrites() {
        let mut doc = document();
        doc.sign(payload("AAA"), at(100));
        doc.sign(payload("BBB"), at(200));

        assert_eq!(doc.status, DocumentStatus::Signed);
        assert_eq!(doc.signature, Some(payload("BBB")));
        assert_eq!(doc.signed_at, Some(at(200)));
    }

    #[test]
    fn clearing_keeps_the_last_signed_state() {
        let mut doc = document();
        assert!(doc.apply_signature(Some(payload("AAA")), at(100)));
        assert!(!doc.apply_signature(None, at(200)));

        assert_eq!(doc.status, DocumentStatus::Signed);
        assert_eq!(doc.signature, Some(payload("AAA")));
        assert_eq!(doc.signed_at, Some(at(100)));
    }

    #[test]
    fn clearing_a_pending_document_changes_nothing() {
        let mut doc = document();
        let before = doc.clone();
        assert!(!doc.apply_signature(None, at(50)));
        assert_eq!(doc, before);
    }

    #[test]
    fn status_uses_lowercase_wire_names() {
        assert_eq!(
            serde_json::to_string(&DocumentStatus::Pending).unwrap(),
            "\"pending\""
        );
        let parsed: DocumentStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, DocumentStatus::Completed);
    }

    #[test]
    fn unsigned_document_omits_signature_keys() {
        let json = serde_json::to_value(document()).unwrap();
        assert!(json.get("signature").is_none());
        assert!(json.get("signedAt").is_none());
        assert_eq!(json["recipientEmail"], "a@b.de");
    }
}
