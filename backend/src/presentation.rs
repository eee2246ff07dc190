//! Final rendering step for display: resolves the `{UNTERSCHRIFT}` block on
//! top of the field-substituted content.

use chrono::{Local, NaiveDate};
use common::fields::{format_date, render_fields_on, SIGNATURE_TOKEN};
use common::model::document::Document;
use common::signature::SignaturePayload;
use log::warn;

const SIGNATURE_PLACEHOLDER: &str = "<div style=\"margin: 20px 0; padding: 20px; border: 2px dashed #ccc; border-radius: 4px; text-align: center; color: #666;\">Unterschriftsfeld - Bitte signieren</div>";

/// Caption shown under an embedded signature.
pub fn signed_caption(date: NaiveDate) -> String {
    format!("Elektronisch signiert am {}", format_date(date))
}

fn signature_block(signature: &SignaturePayload, signed_on: NaiveDate) -> String {
    format!(
        "<div style=\"margin: 20px 0; padding: 10px; border: 1px solid #ccc; border-radius: 4px;\">\
         <img src=\"{}\" alt=\"Unterschrift\" style=\"max-width: 200px; height: auto;\" />\
         <div style=\"font-size: 12px; color: #666; margin-top: 5px;\">{}</div>\
         </div>",
        signature.as_str(),
        signed_caption(signed_on)
    )
}

/// Date printed in the signature caption: the signing day if known.
pub fn signed_on(document: &Document, today: NaiveDate) -> NaiveDate {
    document
        .signed_at
        .map(|at| at.with_timezone(&Local).date_naive())
        .unwrap_or(today)
}

/// Renders a document for display with today's date.
pub fn render_document_html(document: &Document, signature: Option<&SignaturePayload>) -> String {
    render_document_html_on(document, signature, Local::now().date_naive())
}

/// Field substitution, then the first `{UNTERSCHRIFT}` becomes either the
/// signature block or the "please sign" block, then newlines become `<br>`.
///
/// `signature` is the one currently shown, which may differ from the stored
/// one after the capture surface was cleared. A payload that is not a PNG
/// data URL is never embedded; the placeholder is shown instead.
pub fn render_document_html_on(
    document: &Document,
    signature: Option<&SignaturePayload>,
    today: NaiveDate,
) -> String {
    let mut html = render_fields_on(&document.content, &document.fields, today);

    if document.has_signature_field() {
        let block = match signature {
            Some(sig) if sig.image_bytes().is_ok() => {
                signature_block(sig, signed_on(document, today))
            }
            Some(_) => {
                warn!("Document {} holds an unusable signature payload", document.id);
                SIGNATURE_PLACEHOLDER.to_string()
            }
            None => SIGNATURE_PLACEHOLDER.to_string(),
        };
        html = html.replacen(SIGNATURE_TOKEN, &block, 1);
    }

    html.replace('\n', "<br>")
}
