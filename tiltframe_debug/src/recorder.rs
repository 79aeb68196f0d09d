// Copyright 2026 the Tiltframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and keeps an owned copy of every
//! event in arrival order, for assertions in tests and for
//! [`snapshot::events_json`](crate::snapshot::events_json).

use tiltframe_core::engine::ImageId;
use tiltframe_core::error::DecodeError;
use tiltframe_core::trace::{
    ClearEvent, DecodeFailureEvent, GestureGateEvent, LockCapturedEvent, LockRestoredEvent,
    RebuildEvent, TraceSink, UpdateEvent,
};

/// An owned trace event.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// See [`TraceSink::on_rebuild`].
    Rebuild(RebuildEvent),
    /// See [`TraceSink::on_clear`].
    Clear(ClearEvent),
    /// See [`TraceSink::on_update`].
    Update(UpdateEvent),
    /// See [`TraceSink::on_decode_failure`].
    DecodeFailure {
        /// Identity of the image that failed.
        identity: ImageId,
        /// Why it failed.
        error: DecodeError,
    },
    /// See [`TraceSink::on_lock_captured`].
    LockCaptured(LockCapturedEvent),
    /// See [`TraceSink::on_lock_restored`].
    LockRestored(LockRestoredEvent),
    /// See [`TraceSink::on_gestures_gated`].
    GesturesGated(GestureGateEvent),
}

impl RecordedEvent {
    /// Short name of the event kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rebuild(_) => "Rebuild",
            Self::Clear(_) => "Clear",
            Self::Update(_) => "Update",
            Self::DecodeFailure { .. } => "DecodeFailure",
            Self::LockCaptured(_) => "LockCaptured",
            Self::LockRestored(_) => "LockRestored",
            Self::GesturesGated(_) => "GesturesGated",
        }
    }
}

/// A [`TraceSink`] that records events in memory.
#[derive(Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the recorder and returns the recorded events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    /// Discards all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl TraceSink for RecorderSink {
    fn on_rebuild(&mut self, e: &RebuildEvent) {
        self.events.push(RecordedEvent::Rebuild(*e));
    }

    fn on_clear(&mut self, e: &ClearEvent) {
        self.events.push(RecordedEvent::Clear(*e));
    }

    fn on_update(&mut self, e: &UpdateEvent) {
        self.events.push(RecordedEvent::Update(*e));
    }

    fn on_decode_failure(&mut self, e: &DecodeFailureEvent<'_>) {
        self.events.push(RecordedEvent::DecodeFailure {
            identity: e.identity,
            error: e.error.clone(),
        });
    }

    fn on_lock_captured(&mut self, e: &LockCapturedEvent) {
        self.events.push(RecordedEvent::LockCaptured(*e));
    }

    fn on_lock_restored(&mut self, e: &LockRestoredEvent) {
        self.events.push(RecordedEvent::LockRestored(*e));
    }

    fn on_gestures_gated(&mut self, e: &GestureGateEvent) {
        self.events.push(RecordedEvent::GesturesGated(*e));
    }
}
