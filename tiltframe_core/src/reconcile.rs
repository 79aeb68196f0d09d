// Copyright 2026 the Tiltframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transform reconciliation for the tilt node.
//!
//! Two channels write poses under a tracked visual:
//!
//! - **Tilt**: the slider angle, written as a rotation about X on the tilt
//!   node. Only the rotation is replaced; translation and scale are read back
//!   and kept.
//! - **Manipulation**: pan, twist, and pinch from the engine's recognizers,
//!   written to the visual node (the tilt node's child). The reconciler never
//!   writes the visual node; it only enables or disables the recognizers.
//!
//! The lock flag drives a two-state machine:
//!
//! ```text
//!             locked = true
//!   UNLOCKED ───────────────▶ LOCKED
//!      ▲                         │
//!      └─────────────────────────┘
//!             locked = false
//! ```
//!
//! - **LOCKED**: every recognizer is disabled. The first locked cycle captures
//!   the tilt node's pose as the snapshot; later cycles write the snapshot back
//!   wholesale, so slider edits and engine nudges have no visible effect.
//! - **UNLOCKED**: every recognizer is enabled, the snapshot is dropped, and
//!   the slider angle is applied.
//!
//! Capture is lazy: it happens on the first cycle that observes the lock, not
//! at the toggle. Unlocking and relocking between cycles therefore recaptures
//! the current pose instead of restoring an older one.

use alloc::vec::Vec;

use crate::engine::Engine;
use crate::pose::{Pose, Rotation};
use crate::trace::{GestureGateEvent, LockCapturedEvent, LockRestoredEvent, Tracer};

/// Which reconciler state a cycle ran in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LockPhase {
    /// Gestures enabled, tilt follows the slider.
    Unlocked,
    /// Gestures disabled, tilt pinned to the snapshot.
    Locked,
}

impl LockPhase {
    /// Maps the UI lock flag to a phase.
    #[must_use]
    pub const fn from_flag(locked: bool) -> Self {
        if locked { Self::Locked } else { Self::Unlocked }
    }
}

/// The rotation the tilt node carries for a slider angle.
///
/// The slider tips the quad back, away from the viewer, so the angle is
/// negated about X.
#[must_use]
pub fn tilt_rotation(tilt_angle: f64) -> Rotation {
    Rotation::about_x(-tilt_angle)
}

/// Writes the tilt rotation to `node`, keeping its translation and scale.
pub fn apply_tilt<E: Engine>(engine: &mut E, node: E::Node, tilt_angle: f64) {
    let pose = engine.transform(node);
    engine.set_transform(node, pose.with_rotation(tilt_rotation(tilt_angle)));
}

/// Per-visual state for the tilt node and its gesture gating.
#[derive(Clone, Debug)]
pub struct TransformReconciler<N, G> {
    tilt: N,
    gestures: Vec<G>,
    snapshot: Option<Pose>,
}

impl<N: Copy, G: Copy> TransformReconciler<N, G> {
    /// Creates a reconciler for `tilt` with the recognizers installed on the
    /// visual node beneath it. No snapshot is held.
    #[must_use]
    pub fn new(tilt: N, gestures: Vec<G>) -> Self {
        Self {
            tilt,
            gestures,
            snapshot: None,
        }
    }

    /// The tilt node.
    #[must_use]
    pub fn tilt_node(&self) -> N {
        self.tilt
    }

    /// The gesture recognizers this reconciler gates.
    #[must_use]
    pub fn gesture_handles(&self) -> &[G] {
        &self.gestures
    }

    /// The lock snapshot, if one has been captured.
    #[must_use]
    pub fn locked_snapshot(&self) -> Option<Pose> {
        self.snapshot
    }

    /// Captures the tilt node's current pose as the lock snapshot.
    pub fn capture<E>(&mut self, engine: &E, tracer: &mut Tracer<'_>)
    where
        E: Engine<Node = N, GestureHandle = G>,
    {
        let pose = engine.transform(self.tilt);
        self.snapshot = Some(pose);
        tracer.lock_captured(&LockCapturedEvent { pose });
    }

    /// Enables or disables every recognizer.
    ///
    /// Handles already in the requested state are left untouched. A trace
    /// event is emitted only if at least one handle changed.
    pub fn gate_gestures<E>(&self, engine: &mut E, enabled: bool, tracer: &mut Tracer<'_>)
    where
        E: Engine<Node = N, GestureHandle = G>,
    {
        let mut changed = 0;
        for &handle in &self.gestures {
            if engine.gesture_enabled(handle) != enabled {
                engine.set_gesture_enabled(handle, enabled);
                changed += 1;
            }
        }
        if changed > 0 {
            tracer.gestures_gated(&GestureGateEvent { enabled, changed });
        }
    }

    /// Runs one reconcile cycle for the given slider angle and lock flag.
    pub fn reconcile<E>(
        &mut self,
        engine: &mut E,
        tilt_angle: f64,
        locked: bool,
        tracer: &mut Tracer<'_>,
    ) -> LockPhase
    where
        E: Engine<Node = N, GestureHandle = G>,
    {
        let phase = LockPhase::from_flag(locked);
        match phase {
            LockPhase::Locked => {
                self.gate_gestures(engine, false, tracer);
                match self.snapshot {
                    Some(pose) => {
                        let corrected = engine.transform(self.tilt) != pose;
                        engine.set_transform(self.tilt, pose);
                        tracer.lock_restored(&LockRestoredEvent { pose, corrected });
                    }
                    None => self.capture(engine, tracer),
                }
            }
            LockPhase::Unlocked => {
                self.gate_gestures(engine, true, tracer);
                self.snapshot = None;
                apply_tilt(engine, self.tilt, tilt_angle);
            }
        }
        phase
    }
}
