// Copyright 2026 the Tiltframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Image decoding and background picking for tiltframe overlays.
//!
//! - [`PickedImage`] implements [`ImageSource`](tiltframe_core::engine::ImageSource):
//!   each instance carries a fresh identity and decodes its encoded bytes into
//!   an RGBA8 [`Texture`](tiltframe_core::material::Texture) with the `image`
//!   crate.
//! - [`ImagePicker`] loads files on background threads and hands completed
//!   picks back to the reconcile thread through a channel. This is the only
//!   asynchronous step in the overlay pipeline.

mod decode;
mod picked;
mod picker;

pub use decode::{MAX_DIMENSION, decode_rgba8};
pub use picked::PickedImage;
pub use picker::{ImagePicker, PickResult};
