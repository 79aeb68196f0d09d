// Copyright 2026 the Tiltframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Angles are
//! printed in degrees.

use std::io::Write;

use tiltframe_core::engine::ImageId;
use tiltframe_core::pose::Pose;
use tiltframe_core::trace::{
    ClearEvent, DecodeFailureEvent, GestureGateEvent, LockCapturedEvent, LockRestoredEvent,
    RebuildEvent, TraceSink, UpdateEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    cycle: u64,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("cycle", &self.cycle)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer, cycle: 0 }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer, cycle: 0 }
    }

    /// Consumes the sink and returns the writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn next_cycle(&mut self) -> u64 {
        self.cycle += 1;
        self.cycle
    }
}

fn image(id: Option<ImageId>) -> String {
    id.map_or_else(|| "-".to_owned(), |id| id.0.to_string())
}

fn pose_summary(pose: &Pose) -> String {
    let [tx, ty, tz] = pose.translation;
    format!(
        "t=({tx:.3},{ty:.3},{tz:.3}) r={:.1}° s={:.2}",
        pose.rotation.angle().to_degrees(),
        pose.scale[0],
    )
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_rebuild(&mut self, e: &RebuildEvent) {
        let cycle = self.next_cycle();
        let _ = writeln!(
            self.writer,
            "[rebuild] cycle={cycle} image={} prev={} opacity={:.2} tilt={:.1}° locked={}",
            e.identity.0,
            image(e.previous),
            e.opacity,
            e.tilt_angle.to_degrees(),
            e.locked,
        );
    }

    fn on_clear(&mut self, e: &ClearEvent) {
        let cycle = self.next_cycle();
        let _ = writeln!(
            self.writer,
            "[clear] cycle={cycle} prev={}",
            image(e.previous),
        );
    }

    fn on_update(&mut self, e: &UpdateEvent) {
        let cycle = self.next_cycle();
        let _ = writeln!(
            self.writer,
            "[update] cycle={cycle} image={} opacity={:.2} tilt={:.1}° locked={}",
            e.identity.0,
            e.opacity,
            e.tilt_angle.to_degrees(),
            e.locked,
        );
    }

    fn on_decode_failure(&mut self, e: &DecodeFailureEvent<'_>) {
        let cycle = self.next_cycle();
        let _ = writeln!(
            self.writer,
            "[decode:FAILED] cycle={cycle} image={} error={}",
            e.identity.0, e.error,
        );
    }

    fn on_lock_captured(&mut self, e: &LockCapturedEvent) {
        let _ = writeln!(self.writer, "[lock:capture] {}", pose_summary(&e.pose));
    }

    fn on_lock_restored(&mut self, e: &LockRestoredEvent) {
        if e.corrected {
            let _ = writeln!(self.writer, "[lock:restore] {}", pose_summary(&e.pose));
        }
    }

    fn on_gestures_gated(&mut self, e: &GestureGateEvent) {
        let state = if e.enabled { "enabled" } else { "disabled" };
        let _ = writeln!(self.writer, "[gestures] {state} count={}", e.changed);
    }
}
