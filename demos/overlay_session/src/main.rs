// Copyright 2026 the Tiltframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted overlay session that exercises the whole reconcile pipeline.
//!
//! Picks an image on a background thread, then walks through the same edits a
//! user would make: opacity and tilt sliders, drag/twist/pinch gestures on the
//! quad, lock (with slider and gesture input that must be ignored), unlock,
//! re-pick, an undecodable pick, and deselection. Every cycle is traced to a
//! [`PrettyPrintSink`](tiltframe_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](tiltframe_debug::recorder::RecorderSink), evaluated, and
//! presented to a console presenter. The final state is written to
//! `overlay_session.json`.
//!
//! Pass a path to use your own image instead of the generated checkerboard.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use image::{ImageFormat, Rgba, RgbaImage};

use tiltframe_core::binding::{ReconcileOutcome, SceneBinding};
use tiltframe_core::engine::Presenter;
use tiltframe_core::gesture::Gesture;
use tiltframe_core::scene::{SceneChanges, SceneStore};
use tiltframe_core::state::{OverlayConfig, OverlayState};
use tiltframe_core::trace::{
    ClearEvent, DecodeFailureEvent, GestureGateEvent, LockCapturedEvent, LockRestoredEvent,
    RebuildEvent, TraceSink, Tracer, UpdateEvent,
};

use tiltframe_debug::pretty::PrettyPrintSink;
use tiltframe_debug::recorder::RecorderSink;
use tiltframe_image::{ImagePicker, PickResult, PickedImage};

const CHECKER_SIZE: u32 = 64;
const CHECKER_CELL: u32 = 8;

fn main() {
    let image_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(write_checkerboard);

    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut recorder = RecorderSink::new();

    let mut session = Session {
        scene: SceneStore::new(),
        binding: SceneBinding::new(OverlayConfig::tabletop()),
        presenter: ConsolePresenter::default(),
        state: OverlayState::new(),
    };

    // -- pick --------------------------------------------------------------
    let mut picker = ImagePicker::new();
    picker.request(&image_path);
    match picker.wait() {
        Some(PickResult::Picked(image)) => session.state.selected_image = Some(image),
        Some(PickResult::Failed { path, error }) => {
            eprintln!("could not read {}: {error}", path.display());
            return;
        }
        None => return,
    }
    println!(
        "controls visible={} lock button={:?}",
        session.state.controls_visible(),
        session.state.lock_label()
    );
    session.cycle(&mut pretty, &mut recorder);

    // -- sliders -----------------------------------------------------------
    session.state.opacity = 0.6;
    session.cycle(&mut pretty, &mut recorder);
    session.state.tilt_angle = 30_f64.to_radians();
    session.cycle(&mut pretty, &mut recorder);

    // -- gestures on the quad ----------------------------------------------
    session.gesture(Gesture::Pan {
        delta: [0.05, 0.0, -0.1],
    });
    session.gesture(Gesture::Twist { radians: 0.4 });
    session.gesture(Gesture::Pinch { factor: 1.5 });
    session.cycle(&mut pretty, &mut recorder);

    // -- lock --------------------------------------------------------------
    session.state.toggle_lock();
    println!(
        "lock button={:?} tilt slider enabled={}",
        session.state.lock_label(),
        session.state.tilt_control_enabled()
    );
    session.cycle(&mut pretty, &mut recorder);
    session.state.tilt_angle = 80_f64.to_radians();
    session.cycle(&mut pretty, &mut recorder);
    session.gesture(Gesture::Pan {
        delta: [1.0, 0.0, 0.0],
    });

    // -- unlock ------------------------------------------------------------
    session.state.toggle_lock();
    session.cycle(&mut pretty, &mut recorder);

    // -- re-pick the same file: new identity, fresh visual -----------------
    picker.request(&image_path);
    if let Some(image) = picker.wait().and_then(PickResult::into_image) {
        session.state.selected_image = Some(image);
    }
    session.cycle(&mut pretty, &mut recorder);

    // -- undecodable selection ---------------------------------------------
    session.state.selected_image = Some(PickedImage::from_bytes(&b"not an image"[..]));
    session.cycle(&mut pretty, &mut recorder);

    // -- decodable again, then deselect ------------------------------------
    picker.request(&image_path);
    if let Some(image) = picker.wait().and_then(PickResult::into_image) {
        session.state.selected_image = Some(image);
    }
    session.cycle(&mut pretty, &mut recorder);

    // -- export snapshot (before deselecting, so there is something to see) -
    let path = "overlay_session.json";
    let file = File::create(path).expect("failed to create overlay_session.json");
    let mut writer = BufWriter::new(file);
    tiltframe_debug::snapshot::export(
        &session.scene,
        &session.binding,
        recorder.events(),
        &mut writer,
    )
    .expect("failed to write snapshot");

    session.state.selected_image = None;
    session.cycle(&mut pretty, &mut recorder);

    println!(
        "Wrote {path} ({} events, {} nodes presented)",
        recorder.events().len(),
        session.presenter.live
    );
}

struct Session {
    scene: SceneStore,
    binding: SceneBinding<SceneStore>,
    presenter: ConsolePresenter,
    state: OverlayState<PickedImage>,
}

impl Session {
    /// Reconcile, evaluate, present.
    fn cycle(&mut self, pretty: &mut PrettyPrintSink, recorder: &mut RecorderSink) {
        let mut sink = Fanout(pretty, recorder);
        let outcome = self
            .binding
            .reconcile(&mut self.scene, &self.state, &mut Tracer::new(&mut sink));
        if let ReconcileOutcome::DecodeFailed(error) = &outcome {
            println!("  no overlay this cycle: {error}");
        }
        let changes = self.scene.evaluate();
        self.presenter.apply(&self.scene, &changes);
    }

    fn gesture(&mut self, gesture: Gesture) {
        let Some(visual) = self.binding.tracked().map(|t| t.visual()) else {
            return;
        };
        let accepted = self.scene.apply_gesture(visual, gesture);
        println!("  gesture {gesture:?} accepted={accepted}");
    }
}

/// Prints a one-line summary of each change set.
#[derive(Debug, Default)]
struct ConsolePresenter {
    live: usize,
}

impl Presenter for ConsolePresenter {
    fn apply(&mut self, scene: &SceneStore, changes: &SceneChanges) {
        self.live = self.live + changes.added.len() - changes.removed.len();
        if changes.is_empty() {
            return;
        }
        let opacity = changes
            .materials
            .iter()
            .find_map(|&idx| scene.material_at(idx))
            .and_then(|m| m.opacity());
        println!(
            "  present +{} -{} transforms={} materials={} opacity={opacity:?} live={}",
            changes.added.len(),
            changes.removed.len(),
            changes.transforms.len(),
            changes.materials.len(),
            self.live,
        );
    }
}

/// Forwards every event to two sinks.
struct Fanout<'a>(&'a mut dyn TraceSink, &'a mut dyn TraceSink);

impl TraceSink for Fanout<'_> {
    fn on_rebuild(&mut self, e: &RebuildEvent) {
        self.0.on_rebuild(e);
        self.1.on_rebuild(e);
    }

    fn on_clear(&mut self, e: &ClearEvent) {
        self.0.on_clear(e);
        self.1.on_clear(e);
    }

    fn on_update(&mut self, e: &UpdateEvent) {
        self.0.on_update(e);
        self.1.on_update(e);
    }

    fn on_decode_failure(&mut self, e: &DecodeFailureEvent<'_>) {
        self.0.on_decode_failure(e);
        self.1.on_decode_failure(e);
    }

    fn on_lock_captured(&mut self, e: &LockCapturedEvent) {
        self.0.on_lock_captured(e);
        self.1.on_lock_captured(e);
    }

    fn on_lock_restored(&mut self, e: &LockRestoredEvent) {
        self.0.on_lock_restored(e);
        self.1.on_lock_restored(e);
    }

    fn on_gestures_gated(&mut self, e: &GestureGateEvent) {
        self.0.on_gestures_gated(e);
        self.1.on_gestures_gated(e);
    }
}

/// Writes a black-and-white checkerboard PNG to the temp dir.
fn write_checkerboard() -> PathBuf {
    let img = RgbaImage::from_fn(CHECKER_SIZE, CHECKER_SIZE, |x, y| {
        if (x / CHECKER_CELL + y / CHECKER_CELL) % 2 == 0 {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    });
    let path = std::env::temp_dir().join("tiltframe-checkerboard.png");
    img.save_with_format(&path, ImageFormat::Png)
        .expect("failed to write checkerboard");
    path
}
