use super::{SignatureError, SignaturePayload};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;
use serde::{Deserialize, Serialize};

/// Raster pixels per display pixel.
pub const PIXEL_RATIO: u32 = 2;

/// Largest accepted surface edge in display pixels.
pub const MAX_SURFACE_SIZE: u32 = 1024;

/// Stroke width in display pixels.
pub const STROKE_WIDTH: f32 = 2.0;

const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Distance between stamped discs along a segment, in raster pixels.
const STAMP_STEP: f32 = 0.5;

/// On-screen box of the surface, used to translate absolute pointer
/// coordinates into surface-local ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    /// Same translation for mouse and touch input: client position minus origin.
    pub fn to_local(&self, client_x: f32, client_y: f32) -> (f32, f32) {
        (client_x - self.left, client_y - self.top)
    }

    /// Surface size for this box, rounded to whole display pixels.
    ///
    /// A box narrower or lower than one pixel yields `fallback`. Non-finite
    /// values and edges above [`MAX_SURFACE_SIZE`] are rejected.
    pub fn surface_size(&self, fallback: (u32, u32)) -> Result<(u32, u32), SignatureError> {
        let values = [self.left, self.top, self.width, self.height];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SignatureError::OutOfRange(format!("{self:?}")));
        }
        if self.width < 1.0 || self.height < 1.0 {
            return Ok(fallback);
        }

        let max = MAX_SURFACE_SIZE as f32;
        if self.width > max || self.height > max {
            return Err(SignatureError::OutOfRange(format!(
                "{}x{} exceeds {}x{}",
                self.width, self.height, MAX_SURFACE_SIZE, MAX_SURFACE_SIZE
            )));
        }
        Ok((self.width.round() as u32, self.height.round() as u32))
    }
}

/// One pointer or touch event as delivered by the client.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PointerEvent {
    Begin {
        #[serde(rename = "clientX")]
        client_x: f32,
        #[serde(rename = "clientY")]
        client_y: f32,
    },
    Extend {
        #[serde(rename = "clientX")]
        client_x: f32,
        #[serde(rename = "clientY")]
        client_y: f32,
    },
    End,
    Clear,
}

/// What the surface reports to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum SignatureChange {
    /// A stroke finished; the payload holds the whole surface.
    Captured(SignaturePayload),
    /// The surface was erased; the signature is now empty.
    Cleared,
}

impl SignatureChange {
    pub fn into_payload(self) -> Option<SignaturePayload> {
        match self {
            SignatureChange::Captured(payload) => Some(payload),
            SignatureChange::Cleared => None,
        }
    }
}

/// Freehand drawing surface sized to a display box and rasterised at
/// [`PIXEL_RATIO`] times its size.
///
/// Strokes accumulate; only [`SignatureSurface::clear`] removes content.
pub struct SignatureSurface {
    width: u32,
    height: u32,
    raster: RgbaImage,
    last_point: Option<(f32, f32)>,
    has_content: bool,
}

impl SignatureSurface {
    /// Creates an empty, transparent surface for a `width` x `height` box.
    ///
    /// Both edges must lie in `1..=MAX_SURFACE_SIZE`.
    pub fn new(width: u32, height: u32) -> Result<Self, SignatureError> {
        let in_range = |edge: u32| (1..=MAX_SURFACE_SIZE).contains(&edge);
        let raster_size = width
            .checked_mul(PIXEL_RATIO)
            .zip(height.checked_mul(PIXEL_RATIO))
            .filter(|_| in_range(width) && in_range(height));
        let Some((raster_w, raster_h)) = raster_size else {
            return Err(SignatureError::OutOfRange(format!(
                "surface {width}x{height}"
            )));
        };

        Ok(Self {
            width,
            height,
            raster: RgbaImage::new(raster_w, raster_h),
            last_point: None,
            has_content: false,
        })
    }

    pub fn raster(&self) -> &RgbaImage {
        &self.raster
    }

    pub fn has_content(&self) -> bool {
        self.has_content
    }

    /// Starts a new stroke at surface-local `(x, y)`. Nothing is drawn yet.
    pub fn begin(&mut self, x: f32, y: f32) {
        self.last_point = Some(self.clamp(x, y));
    }

    /// Draws a segment from the last point to `(x, y)` on the active stroke.
    /// Ignored when no stroke is active.
    pub fn extend(&mut self, x: f32, y: f32) {
        let Some(from) = self.last_point else {
            return;
        };
        let to = self.clamp(x, y);
        self.draw_segment(from, to);
        self.last_point = Some(to);
    }

    /// Pins a point to the box, so a segment is never longer than its
    /// diagonal. Non-finite coordinates land on the origin.
    fn clamp(&self, x: f32, y: f32) -> (f32, f32) {
        let pin = |v: f32, max: u32| {
            if v.is_finite() {
                v.clamp(0.0, max as f32)
            } else {
                0.0
            }
        };
        (pin(x, self.width), pin(y, self.height))
    }

    /// Finishes the active stroke and reports the surface content.
    ///
    /// Returns `Ok(None)` without reporting anything if no stroke was active.
    pub fn end(&mut self) -> Result<Option<SignatureChange>, SignatureError> {
        if self.last_point.take().is_none() {
            return Ok(None);
        }
        self.has_content = true;
        let payload = self.snapshot()?;
        Ok(Some(SignatureChange::Captured(payload)))
    }

    /// Erases everything, including a stroke in progress.
    pub fn clear(&mut self) -> SignatureChange {
        let (w, h) = self.raster.dimensions();
        self.raster = RgbaImage::new(w, h);
        self.last_point = None;
        self.has_content = false;
        SignatureChange::Cleared
    }

    /// Replaces the surface content with a stored payload, scaled to fill
    /// the whole box. Later strokes are drawn on top of it.
    pub fn load(&mut self, payload: &SignaturePayload) -> Result<(), SignatureError> {
        let image = payload.decode()?.to_rgba8();
        let (w, h) = self.raster.dimensions();
        let scaled = imageops::resize(&image, w, h, FilterType::Lanczos3);

        self.raster = RgbaImage::new(w, h);
        imageops::overlay(&mut self.raster, &scaled, 0, 0);
        self.has_content = true;
        Ok(())
    }

    /// Current surface content as a payload.
    pub fn snapshot(&self) -> Result<SignaturePayload, SignatureError> {
        SignaturePayload::encode(&self.raster)
    }

    /// Round caps and joins come from stamping discs of the stroke width.
    fn draw_segment(&mut self, from: (f32, f32), to: (f32, f32)) {
        let ratio = PIXEL_RATIO as f32;
        let (x0, y0) = (from.0 * ratio, from.1 * ratio);
        let (x1, y1) = (to.0 * ratio, to.1 * ratio);
        let radius = (STROKE_WIDTH * ratio / 2.0).round() as i32;

        let length = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
        let steps = (length / STAMP_STEP).ceil().max(1.0) as u32;

        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let cx = (x0 + (x1 - x0) * t).round() as i32;
            let cy = (y0 + (y1 - y0) * t).round() as i32;
            draw_filled_circle_mut(&mut self.raster, (cx, cy), radius, INK);
        }
    }
}
