//! Notification texts handed to the user's mail client. Nothing is sent from
//! here; the caller opens the `mailto:` link.

use common::model::document::Document;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailDraft {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl MailDraft {
    /// `mailto:` link with subject and body percent-encoded.
    pub fn mailto_link(&self) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            self.recipient,
            urlencoding::encode(&self.subject),
            urlencoding::encode(&self.body)
        )
    }
}

/// Mail accompanying a signed document.
pub fn signed_document_mail(document: &Document) -> MailDraft {
    MailDraft {
        recipient: document.recipient_email.clone(),
        subject: format!("Ihr signiertes Dokument: {}", document.template_name),
        body: format!(
            "Sehr geehrte Damen und Herren,\n\n\
             im Anhang finden Sie Ihr signiertes Dokument \"{}\".\n\n\
             Mit freundlichen Grüßen",
            document.template_name
        ),
    }
}

/// Link under which the recipient opens the document.
pub fn document_link(public_url: &str, document_id: &str) -> String {
    format!("{}/?doc={}", public_url.trim_end_matches('/'), document_id)
}

/// Notice shown after creating a document, in place of a real delivery.
pub fn creation_notice(document: &Document, link: &str) -> String {
    format!(
        "Dokument erstellt! Der Link wurde an {} gesendet:\n\n{}",
        document.recipient_email, link
    )
}
