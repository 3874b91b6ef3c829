//! Client-side card image preprocessing.
//!
//! The extraction service expects JPEG input; anything else is re-encoded
//! before upload. Failure here aborts the submission before any network
//! call is made.

use crate::error::ConversionError;
use image::ImageFormat;
use image::codecs::jpeg::JpegEncoder;
use log::debug;
use std::io::Cursor;
use std::path::Path;

/// JPEG quality used for re-encoded uploads.
const JPEG_QUALITY: u8 = 90;

/// An image staged for upload to the extraction service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardImage {
    /// Original or rewritten file name sent in the multipart part.
    pub file_name: String,
    /// MIME type sent in the multipart part.
    pub mime: String,
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
}

/// Ensure the staged image is a JPEG, re-encoding when it is not.
///
/// JPEG input passes through untouched. Any other recognized format is
/// decoded, flattened to RGB, and re-encoded at quality 90. Unrecognized
/// or undecodable bytes are rejected.
pub fn prepare_card_image(image: CardImage) -> Result<CardImage, ConversionError> {
    let format = image::guess_format(&image.bytes)
        .map_err(|err| ConversionError::Unrecognized(err.to_string()))?;
    if format == ImageFormat::Jpeg {
        debug!("card image already JPEG (file={})", image.file_name);
        return Ok(CardImage {
            mime: "image/jpeg".to_string(),
            ..image
        });
    }

    debug!(
        "re-encoding card image (file={}, format={:?})",
        image.file_name, format
    );
    let decoded =
        image::load_from_memory(&image.bytes).map_err(|err| ConversionError::Decode(err.to_string()))?;
    let rgb = decoded.to_rgb8();
    let mut encoded = Cursor::new(Vec::new());
    let mut encoder = JpegEncoder::new_with_quality(&mut encoded, JPEG_QUALITY);
    encoder
        .encode_image(&rgb)
        .map_err(|err| ConversionError::Encode(err.to_string()))?;

    Ok(CardImage {
        file_name: jpeg_file_name(&image.file_name),
        mime: "image/jpeg".to_string(),
        bytes: encoded.into_inner(),
    })
}

/// Rewrite a file name with a `.jpg` extension.
fn jpeg_file_name(original: &str) -> String {
    match Path::new(original).file_stem().and_then(|stem| stem.to_str()) {
        Some(stem) if !stem.is_empty() => format!("{stem}.jpg"),
        _ => "card.jpg".to_string(),
    }
}
