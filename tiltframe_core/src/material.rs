// Copyright 2026 the Tiltframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render resources attached to the visual node: texture, material, mesh.
//!
//! Opacity is carried on two channels at once, the tint alpha and the
//! transparent-blend scale. Engines differ in which one their shading path
//! honours, so the two are always written together and always hold the same
//! value.

use alloc::sync::Arc;
use core::fmt;

use kurbo::Size;

/// A decoded RGBA8 image ready for upload.
///
/// Pixel storage is shared, so cloning a texture (for example when a
/// material is patched and reassigned) does not copy pixels.
#[derive(Clone, PartialEq, Eq)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
}

impl Texture {
    /// Wraps tightly packed RGBA8 pixels.
    ///
    /// Returns `None` if `pixels` is not exactly `width * height * 4` bytes.
    #[must_use]
    pub fn from_rgba8(width: u32, height: u32, pixels: impl Into<Arc<[u8]>>) -> Option<Self> {
        let pixels = pixels.into();
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        (pixels.len() == expected).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 pixels, row-major.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns true if both textures share the same pixel allocation.
    #[must_use]
    pub fn same_storage(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// How a material's fragments combine with what is behind them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Blending {
    /// Fully opaque.
    Opaque,
    /// Alpha-blended, with every fragment's alpha multiplied by `opacity_scale`.
    Transparent {
        /// Multiplier in `[0, 1]`.
        opacity_scale: f32,
    },
}

/// Unlit textured material with a white tint.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Base color texture.
    pub texture: Texture,
    /// Alpha of the white tint multiplied over the texture.
    pub tint_alpha: f32,
    /// Blend mode.
    pub blending: Blending,
}

impl Material {
    /// Creates a transparent material with both opacity channels at `opacity`.
    #[must_use]
    pub fn with_opacity(texture: Texture, opacity: f32) -> Self {
        Self {
            texture,
            tint_alpha: opacity,
            blending: Blending::Transparent {
                opacity_scale: opacity,
            },
        }
    }

    /// Rewrites both opacity channels, keeping the texture.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.tint_alpha = opacity;
        self.blending = Blending::Transparent {
            opacity_scale: opacity,
        };
    }

    /// Returns the opacity if both channels agree, `None` otherwise.
    #[must_use]
    pub fn opacity(&self) -> Option<f32> {
        match self.blending {
            Blending::Transparent { opacity_scale } if opacity_scale == self.tint_alpha => {
                Some(opacity_scale)
            }
            _ => None,
        }
    }
}

/// Renderable geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mesh {
    /// A flat quad in the node's XY plane, facing +Z and centred on the
    /// origin. Upright on a horizontal anchor until tilted.
    Plane(Size),
}

impl Mesh {
    /// Creates a plane of the given width and height, in metres.
    #[must_use]
    pub const fn plane(width: f64, height: f64) -> Self {
        Self::Plane(Size::new(width, height))
    }

    /// Returns the footprint of the mesh.
    #[must_use]
    pub const fn size(&self) -> Size {
        match self {
            Self::Plane(size) => *size,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn texture() -> Texture {
        Texture::from_rgba8(2, 1, vec![255_u8; 8]).expect("2x1 texture")
    }

    #[test]
    fn rejects_mismatched_pixel_length() {
        assert!(Texture::from_rgba8(2, 2, vec![0_u8; 8]).is_none());
    }

    #[test]
    fn opacity_channels_move_together() {
        let mut m = Material::with_opacity(texture(), 0.25);
        assert_eq!(m.opacity(), Some(0.25));
        m.set_opacity(0.75);
        assert_eq!(m.tint_alpha, 0.75);
        assert_eq!(
            m.blending,
            Blending::Transparent {
                opacity_scale: 0.75
            }
        );
    }

    #[test]
    fn disagreeing_channels_have_no_opacity() {
        let mut m = Material::with_opacity(texture(), 0.5);
        m.tint_alpha = 0.4;
        assert_eq!(m.opacity(), None);
    }

    #[test]
    fn patched_material_keeps_texture_storage() {
        let t = texture();
        let mut m = Material::with_opacity(t.clone(), 1.0);
        m.set_opacity(0.1);
        assert!(m.texture.same_storage(&t), "texture should not be copied");
    }
}
