// Copyright 2026 the Tiltframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the reconcile cycle.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! binding layer and transform reconciler call as they work. All method bodies
//! default to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies (one branch per call).

use crate::engine::ImageId;
use crate::error::DecodeError;
use crate::pose::Pose;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after a new tracked visual has been built.
#[derive(Clone, Copy, Debug)]
pub struct RebuildEvent {
    /// Identity previously bound, if any.
    pub previous: Option<ImageId>,
    /// Identity now bound.
    pub identity: ImageId,
    /// Opacity the material was built with.
    pub opacity: f32,
    /// Tilt applied to the tilt node.
    pub tilt_angle: f64,
    /// Whether the visual was built locked.
    pub locked: bool,
}

/// Emitted when the tracked visual is torn down because no image is selected.
#[derive(Clone, Copy, Debug)]
pub struct ClearEvent {
    /// Identity that was bound, if any.
    pub previous: Option<ImageId>,
}

/// Emitted after an incremental update of an existing visual.
#[derive(Clone, Copy, Debug)]
pub struct UpdateEvent {
    /// Identity of the visual that was updated.
    pub identity: ImageId,
    /// Opacity written to both material channels.
    pub opacity: f32,
    /// Tilt requested by the slider. Ignored while locked.
    pub tilt_angle: f64,
    /// Lock flag for this cycle.
    pub locked: bool,
}

/// Emitted when the selected image could not be decoded.
#[derive(Clone, Copy, Debug)]
pub struct DecodeFailureEvent<'a> {
    /// Identity of the image that failed.
    pub identity: ImageId,
    /// Why it failed.
    pub error: &'a DecodeError,
}

/// Emitted when a lock snapshot is taken from the tilt node.
#[derive(Clone, Copy, Debug)]
pub struct LockCapturedEvent {
    /// The captured tilt-node pose.
    pub pose: Pose,
}

/// Emitted when a lock snapshot is written back over the tilt node.
#[derive(Clone, Copy, Debug)]
pub struct LockRestoredEvent {
    /// The pose that was written.
    pub pose: Pose,
    /// Whether the tilt node had drifted from the snapshot.
    pub corrected: bool,
}

/// Emitted when gesture handles change enabled state.
#[derive(Clone, Copy, Debug)]
pub struct GestureGateEvent {
    /// New enabled state.
    pub enabled: bool,
    /// Number of handles whose state actually changed.
    pub changed: usize,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the reconcile cycle.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after a rebuild.
    fn on_rebuild(&mut self, e: &RebuildEvent) {
        _ = e;
    }

    /// Called after the tracked visual is cleared.
    fn on_clear(&mut self, e: &ClearEvent) {
        _ = e;
    }

    /// Called after an incremental update.
    fn on_update(&mut self, e: &UpdateEvent) {
        _ = e;
    }

    /// Called when decoding the selected image fails.
    fn on_decode_failure(&mut self, e: &DecodeFailureEvent<'_>) {
        _ = e;
    }

    /// Called when a lock snapshot is captured.
    fn on_lock_captured(&mut self, e: &LockCapturedEvent) {
        _ = e;
    }

    /// Called when a lock snapshot is restored.
    fn on_lock_restored(&mut self, e: &LockRestoredEvent) {
        _ = e;
    }

    /// Called when gesture handles are enabled or disabled.
    fn on_gestures_gated(&mut self, e: &GestureGateEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`RebuildEvent`].
    #[inline]
    pub fn rebuild(&mut self, e: &RebuildEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_rebuild(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ClearEvent`].
    #[inline]
    pub fn clear(&mut self, e: &ClearEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_clear(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`UpdateEvent`].
    #[inline]
    pub fn update(&mut self, e: &UpdateEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_update(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DecodeFailureEvent`].
    #[inline]
    pub fn decode_failure(&mut self, e: &DecodeFailureEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_decode_failure(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LockCapturedEvent`].
    #[inline]
    pub fn lock_captured(&mut self, e: &LockCapturedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_lock_captured(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LockRestoredEvent`].
    #[inline]
    pub fn lock_restored(&mut self, e: &LockRestoredEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_lock_restored(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`GestureGateEvent`].
    #[inline]
    pub fn gestures_gated(&mut self, e: &GestureGateEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_gestures_gated(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}
