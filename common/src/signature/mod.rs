//! # Signature Capture
//!
//! Turns freehand pointer input into a still-image payload.
//!
//! - `payload`: the `data:image/png;base64,...` string stored on a document and
//!   its conversion to and from raster images.
//! - `surface`: the drawing surface (strokes, clear, load of an existing image).
//! - `session`: a surface bound to one document, deciding which reported
//!   changes are committed to the stored record.

mod payload;
mod session;
mod surface;

pub use payload::{SignaturePayload, DATA_URL_PREFIX};
pub use session::SigningSession;
pub use surface::{
    PointerEvent, SignatureChange, SignatureSurface, SurfaceRect, MAX_SURFACE_SIZE, PIXEL_RATIO,
    STROKE_WIDTH,
};

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum SignatureError {
    /// The payload is not a base64 `data:` URL.
    InvalidDataUrl,
    /// The payload could not be decoded into an image.
    Decode(String),
    /// The surface could not be encoded as PNG.
    Encode(String),
    /// Surface size or pointer position outside the accepted range.
    OutOfRange(String),
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureError::InvalidDataUrl => write!(f, "Signature is not a base64 data URL"),
            SignatureError::Decode(e) => write!(f, "Signature could not be decoded: {e}"),
            SignatureError::Encode(e) => write!(f, "Signature could not be encoded: {e}"),
            SignatureError::OutOfRange(e) => write!(f, "Signature input out of range: {e}"),
        }
    }
}

impl std::error::Error for SignatureError {}
