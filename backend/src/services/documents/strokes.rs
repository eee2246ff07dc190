use crate::errors::AppError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::document::Document;
use common::requests::StrokeRequest;
use common::signature::{
    PointerEvent, SignatureError, SignaturePayload, SigningSession, SurfaceRect,
};
use log::debug;
use serde::Serialize;

/// Most pointer events accepted in one request.
pub const MAX_EVENTS: usize = 10_000;

#[derive(Serialize)]
struct StrokeResponse {
    /// Signature now shown on the surface, `None` after a clear.
    signature: Option<SignaturePayload>,
    document: Document,
}

/// Outcome of replaying events on a detached surface.
struct Replay {
    /// Payloads of every finished stroke, in order.
    captured: Vec<SignaturePayload>,
    view: Option<SignaturePayload>,
}

fn replay(
    document: &Document,
    size: (u32, u32),
    rect: &SurfaceRect,
    events: Vec<PointerEvent>,
) -> Result<Replay, SignatureError> {
    let mut session = SigningSession::open(document, size.0, size.1)?;
    let mut captured = Vec::new();

    for event in events {
        if let Some(change) = session.handle(rect, event)? {
            captured.extend(SigningSession::commit_payload(&change));
        }
    }

    Ok(Replay {
        captured,
        view: session.view().cloned(),
    })
}

/// Replays recorded pointer events on a surface preloaded with the stored
/// signature. Every finished stroke is committed; a clear only empties the
/// surface.
///
/// Drawing and encoding run on the blocking pool against a copy of the
/// document; the repository is locked only to commit the results.
pub async fn process(
    state: web::Data<AppState>,
    document_id: web::Path<String>,
    payload: web::Json<StrokeRequest>,
) -> Result<HttpResponse, AppError> {
    let StrokeRequest { rect, events } = payload.into_inner();
    if events.len() > MAX_EVENTS {
        return Err(SignatureError::OutOfRange(format!(
            "{} pointer events, at most {} allowed",
            events.len(),
            MAX_EVENTS
        ))
        .into());
    }
    let size = rect.surface_size((state.config.surface_width, state.config.surface_height))?;

    let document = {
        let repository = state.repository.read().await;
        repository
            .document(&document_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Document {}", document_id)))?
    };

    debug!(
        "Replaying {} pointer events for document {} on a {}x{} surface",
        events.len(),
        document.id,
        size.0,
        size.1
    );
    let Replay { captured, view } =
        tokio::task::spawn_blocking(move || replay(&document, size, &rect, events))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;

    let mut repository = state.repository.write().await;
    for signature in captured {
        repository.apply_signature(&document_id, Some(signature))?;
    }
    let document = repository
        .document(&document_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Document {}", document_id)))?;

    Ok(HttpResponse::Ok().json(StrokeResponse {
        signature: view,
        document,
    }))
}
