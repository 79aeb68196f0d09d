// Copyright 2026 the Tiltframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Texture decode errors.
//!
//! Decoding is the only fallible step in a reconcile cycle. A failure aborts
//! that cycle's rebuild and leaves no visual; it never propagates past
//! [`SceneBinding::reconcile`](crate::binding::SceneBinding::reconcile).

use alloc::string::String;
use core::fmt;

/// Errors from turning a selected image into a [`Texture`](crate::material::Texture).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// The encoded format is not one the provider can read.
    Unsupported,
    /// The data is corrupt or truncated.
    Malformed(String),
    /// The image has no pixels.
    Empty,
    /// The image exceeds the provider's size limit.
    TooLarge {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => f.write_str("unsupported image format"),
            Self::Malformed(reason) => write!(f, "malformed image data: {reason}"),
            Self::Empty => f.write_str("image has no pixels"),
            Self::TooLarge { width, height } => {
                write!(f, "image too large to upload ({width}x{height})")
            }
        }
    }
}

impl core::error::Error for DecodeError {}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display_names_the_dimensions() {
        let e = DecodeError::TooLarge {
            width: 9000,
            height: 10,
        };
        assert_eq!(e.to_string(), "image too large to upload (9000x10)");
    }
}
