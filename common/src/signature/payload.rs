use super::SignatureError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::{load_from_memory, DynamicImage, RgbaImage};
use png::{BitDepth as PngBitDepth, ColorType as PngColorType, Encoder as PngEncoder};
use serde::{Deserialize, Serialize};

/// Prefix of every payload produced by the capture surface.
pub const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// A captured signature as a lossless image `data:` URL.
///
/// Stored verbatim; it is only parsed when an image is actually needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignaturePayload(String);

impl SignaturePayload {
    pub fn from_data_url(data_url: impl Into<String>) -> Self {
        Self(data_url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Encodes an RGBA raster as an 8-bit PNG data URL.
    pub fn encode(raster: &RgbaImage) -> Result<Self, SignatureError> {
        let (w, h) = raster.dimensions();
        let mut bytes = Vec::new();
        {
            let mut encoder = PngEncoder::new(&mut bytes, w, h);
            encoder.set_color(PngColorType::Rgba);
            encoder.set_depth(PngBitDepth::Eight);
            let mut writer = encoder
                .write_header()
                .map_err(|e| SignatureError::Encode(e.to_string()))?;
            writer
                .write_image_data(raster.as_raw())
                .map_err(|e| SignatureError::Encode(e.to_string()))?;
            writer
                .finish()
                .map_err(|e| SignatureError::Encode(e.to_string()))?;
        }

        Ok(Self(format!("{}{}", DATA_URL_PREFIX, BASE64.encode(bytes))))
    }

    /// Raw PNG bytes carried by the data URL.
    ///
    /// Only the exact [`DATA_URL_PREFIX`] header is accepted and the rest
    /// must be strict base64, so the payload never holds characters that
    /// need escaping in markup.
    pub fn image_bytes(&self) -> Result<Vec<u8>, SignatureError> {
        let data = self
            .0
            .strip_prefix(DATA_URL_PREFIX)
            .ok_or(SignatureError::InvalidDataUrl)?;

        BASE64
            .decode(data)
            .map_err(|e| SignatureError::Decode(e.to_string()))
    }

    pub fn decode(&self) -> Result<DynamicImage, SignatureError> {
        let bytes = self.image_bytes()?;
        load_from_memory(&bytes).map_err(|e| SignatureError::Decode(e.to_string()))
    }
}
