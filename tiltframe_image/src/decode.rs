// Copyright 2026 the Tiltframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Encoded bytes to RGBA8 texture.

use std::io::Cursor;

use image::ImageError;
use image::io::Reader;
use tiltframe_core::error::DecodeError;
use tiltframe_core::material::Texture;

/// Largest accepted width or height, in pixels.
pub const MAX_DIMENSION: u32 = 8192;

/// Decodes `bytes` (PNG, JPEG, WebP, or BMP) into an RGBA8 texture.
///
/// Dimensions are read from the header first so oversized images are
/// rejected before any pixels are allocated.
pub fn decode_rgba8(bytes: &[u8]) -> Result<Texture, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let reader = Reader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::Malformed(e.to_string()))?;
    if reader.format().is_none() {
        return Err(DecodeError::Unsupported);
    }
    let (width, height) = reader.into_dimensions().map_err(map_error)?;
    check_dimensions(width, height)?;

    let rgba = image::load_from_memory(bytes).map_err(map_error)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    check_dimensions(width, height)?;
    Texture::from_rgba8(width, height, rgba.into_raw()).ok_or(DecodeError::Empty)
}

fn check_dimensions(width: u32, height: u32) -> Result<(), DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::Empty);
    }
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(DecodeError::TooLarge { width, height });
    }
    Ok(())
}

fn map_error(e: ImageError) -> DecodeError {
    match e {
        ImageError::Unsupported(_) => DecodeError::Unsupported,
        other => DecodeError::Malformed(other.to_string()),
    }
}
