use super::{PointerEvent, SignatureChange, SignatureError, SignaturePayload, SignatureSurface, SurfaceRect};
use crate::model::document::Document;

/// A capture surface bound to one document.
///
/// Keeps the signature currently shown for the document. A `Captured` change
/// updates the view and is handed back for committing; a `Cleared` change
/// only empties the view, the stored document is not touched.
pub struct SigningSession {
    document_id: String,
    surface: SignatureSurface,
    view: Option<SignaturePayload>,
}

impl SigningSession {
    /// Opens a session, drawing the document's stored signature first.
    pub fn open(document: &Document, width: u32, height: u32) -> Result<Self, SignatureError> {
        let mut surface = SignatureSurface::new(width, height)?;
        if let Some(existing) = &document.signature {
            surface.load(existing)?;
        }

        Ok(Self {
            document_id: document.id.clone(),
            surface,
            view: document.signature.clone(),
        })
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Signature currently shown, `None` after a clear.
    pub fn view(&self) -> Option<&SignaturePayload> {
        self.view.as_ref()
    }

    pub fn surface(&self) -> &SignatureSurface {
        &self.surface
    }

    /// Feeds one pointer event to the surface and returns the change it
    /// reported, if any. Non-finite positions are rejected.
    pub fn handle(
        &mut self,
        rect: &SurfaceRect,
        event: PointerEvent,
    ) -> Result<Option<SignatureChange>, SignatureError> {
        if let PointerEvent::Begin { client_x, client_y }
        | PointerEvent::Extend { client_x, client_y } = event
        {
            if !client_x.is_finite() || !client_y.is_finite() {
                return Err(SignatureError::OutOfRange(format!(
                    "pointer at ({client_x}, {client_y})"
                )));
            }
        }

        let change = match event {
            PointerEvent::Begin { client_x, client_y } => {
                let (x, y) = rect.to_local(client_x, client_y);
                self.surface.begin(x, y);
                None
            }
            PointerEvent::Extend { client_x, client_y } => {
                let (x, y) = rect.to_local(client_x, client_y);
                self.surface.extend(x, y);
                None
            }
            PointerEvent::End => self.surface.end()?,
            PointerEvent::Clear => Some(self.surface.clear()),
        };

        if let Some(change) = &change {
            self.view = change.clone().into_payload();
        }
        Ok(change)
    }

    /// Payload to commit for a reported change; `None` for a clear.
    pub fn commit_payload(change: &SignatureChange) -> Option<SignaturePayload> {
        change.clone().into_payload()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::document::DocumentStatus;
    use crate::model::template::Template;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    const RECT: SurfaceRect = SurfaceRect {
        left: 10.0,
        top: 20.0,
        width: 100.0,
        height: 50.0,
    };

    fn document() -> Document {
        let now = Utc.timestamp_opt(0, 0).unwrap();
        let template = Template::new("t".into(), "T".into(), "{UNTERSCHRIFT}".into(), now);
        Document::from_template("d".into(), &template, BTreeMap::new(), "x@y.de".into(), now)
    }

    fn stroke(session: &mut SigningSession) -> Option<SignatureChange> {
        session
            .handle(&RECT, PointerEvent::Begin { client_x: 20.0, client_y: 30.0 })
            .unwrap();
        session
            .handle(&RECT, PointerEvent::Extend { client_x: 60.0, client_y: 30.0 })
            .unwrap();
        session.handle(&RECT, PointerEvent::End).unwrap()
    }

    #[test]
    fn stroke_is_translated_and_captured() {
        let mut session = SigningSession::open(&document(), 100, 50).unwrap();
        let change = stroke(&mut session).unwrap();

        let payload = SigningSession::commit_payload(&change).unwrap();
        assert_eq!(session.view(), Some(&payload));
        // client (20, 30) minus origin (10, 20) -> local (10, 10) -> raster (20, 20)
        assert_eq!(session.surface().raster().get_pixel(20, 20)[3], 255);
    }

    #[test]
    fn clear_empties_the_view_but_commits_nothing() {
        let mut doc = document();
        let mut session = SigningSession::open(&doc, 100, 50).unwrap();
        let change = stroke(&mut session).unwrap();
        let now = Utc.timestamp_opt(10, 0).unwrap();
        doc.apply_signature(SigningSession::commit_payload(&change), now);

        let cleared = session.handle(&RECT, PointerEvent::Clear).unwrap().unwrap();
        assert_eq!(session.view(), None);
        assert!(!doc.apply_signature(SigningSession::commit_payload(&cleared), now));
        assert_eq!(doc.status, DocumentStatus::Signed);
        assert!(doc.signature.is_some());
    }

    #[test]
    fn open_loads_existing_signature() {
        let mut doc = document();
        let mut first = SigningSession::open(&doc, 100, 50).unwrap();
        let payload = SigningSession::commit_payload(&stroke(&mut first).unwrap()).unwrap();
        doc.sign(payload.clone(), Utc.timestamp_opt(1, 0).unwrap());

        let session = SigningSession::open(&doc, 100, 50).unwrap();
        assert_eq!(session.view(), Some(&payload));
        assert!(session.surface().has_content());
        assert_eq!(session.document_id(), "d");
    }

    #[test]
    fn end_without_begin_reports_nothing() {
        let mut session = SigningSession::open(&document(), 100, 50).unwrap();
        assert_eq!(session.handle(&RECT, PointerEvent::End).unwrap(), None);
        assert_eq!(session.view(), None);
    }

    #[test]
    fn non_finite_pointer_is_rejected() {
        let mut session = SigningSession::open(&document(), 100, 50).unwrap();
        let err = session
            .handle(&RECT, PointerEvent::Begin { client_x: f32::NAN, client_y: 0.0 })
            .unwrap_err();
        assert!(matches!(err, SignatureError::OutOfRange(_)));
    }

    #[test]
    fn oversized_box_cannot_be_opened() {
        assert!(matches!(
            SigningSession::open(&document(), u32::MAX, 50),
            Err(SignatureError::OutOfRange(_))
        ));
    }
}
