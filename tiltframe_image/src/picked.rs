// Copyright 2026 the Tiltframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selected images with a process-unique identity and a cached decode.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use tiltframe_core::engine::{ImageId, ImageSource};
use tiltframe_core::error::DecodeError;
use tiltframe_core::material::Texture;

use crate::decode::decode_rgba8;

static NEXT_IDENTITY: AtomicU64 = AtomicU64::new(1);

/// A selected image: encoded bytes plus a process-unique identity.
///
/// Every constructor call yields a new identity, so picking the same file
/// twice produces two distinct selections. Cloning keeps the identity.
///
/// A successful decode is cached and shared by clones. Failures are not
/// cached; each [`decode`](ImageSource::decode) call retries.
#[derive(Clone)]
pub struct PickedImage {
    identity: ImageId,
    source: Option<PathBuf>,
    bytes: Arc<[u8]>,
    texture: Arc<OnceLock<Texture>>,
}

impl fmt::Debug for PickedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PickedImage")
            .field("identity", &self.identity)
            .field("source", &self.source)
            .field("bytes", &self.bytes.len())
            .field("decoded", &self.texture.get().is_some())
            .finish()
    }
}

impl PickedImage {
    /// Wraps encoded image bytes.
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            identity: ImageId(NEXT_IDENTITY.fetch_add(1, Ordering::Relaxed)),
            source: None,
            bytes: bytes.into(),
            texture: Arc::default(),
        }
    }

    /// Reads an encoded image file. Decoding is deferred.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        Ok(Self {
            source: Some(path.to_path_buf()),
            ..Self::from_bytes(bytes)
        })
    }

    /// The file this image was read from, if any.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// The encoded bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Whether a decoded texture is cached.
    #[must_use]
    pub fn is_decoded(&self) -> bool {
        self.texture.get().is_some()
    }
}

impl ImageSource for PickedImage {
    fn identity(&self) -> ImageId {
        self.identity
    }

    fn decode(&self) -> Result<Texture, DecodeError> {
        if let Some(texture) = self.texture.get() {
            return Ok(texture.clone());
        }
        let texture = decode_rgba8(&self.bytes)?;
        Ok(self.texture.get_or_init(|| texture).clone())
    }
}
