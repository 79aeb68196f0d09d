// Copyright 2026 the Tiltframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene binding: keeps one tracked visual in step with [`OverlayState`].
//!
//! [`SceneBinding::reconcile`] is the single entry point the UI layer calls
//! whenever the selection, a slider, or the lock flag changes. Each call takes
//! one of two paths, chosen by [`decide`] from the bound and selected image
//! identities:
//!
//! - **Rebuild**: tear down every anchor, then (if an image is selected)
//!   decode it and build `anchor → tilt → visual` from scratch with fresh
//!   gesture recognizers. Manipulation applied to a previous image does not
//!   carry over.
//! - **Update**: patch both opacity channels of the visual's material, then
//!   hand the tilt node to the [`TransformReconciler`].
//!
//! Rebuild is safe to run from any state: it always starts by removing every
//! anchor, so a failed decode leaves an empty scene rather than a stale one.

use crate::engine::{Engine, ImageId, ImageSource};
use crate::error::DecodeError;
use crate::material::Material;
use crate::pose::Pose;
use crate::reconcile::{self, LockPhase, TransformReconciler};
use crate::state::{OverlayConfig, OverlayState};
use crate::trace::{ClearEvent, DecodeFailureEvent, RebuildEvent, Tracer, UpdateEvent};

/// Which path a reconcile cycle takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BindAction {
    /// Discard the current visual and build from the selection.
    Rebuild,
    /// Patch the current visual in place.
    Update,
}

/// Chooses between rebuild and update.
///
/// Updates happen only when a visual is bound and the selection has the same
/// identity. Everything else, including deselection, is a rebuild.
#[must_use]
pub fn decide(bound: Option<ImageId>, selected: Option<ImageId>) -> BindAction {
    match (bound, selected) {
        (Some(b), Some(s)) if b == s => BindAction::Update,
        _ => BindAction::Rebuild,
    }
}

/// What a reconcile cycle did.
#[derive(Clone, Debug, PartialEq)]
pub enum ReconcileOutcome {
    /// No image is selected; the scene holds no visual.
    Cleared,
    /// A new visual was built for the selection.
    Rebuilt,
    /// The existing visual was patched.
    Updated(LockPhase),
    /// The selection could not be decoded; the scene holds no visual.
    DecodeFailed(DecodeError),
}

/// The one live visual and the nodes it owns.
///
/// The anchor owns the tilt node, which owns the visual node. Dropping the
/// binding's `TrackedVisual` does not remove the nodes; the next rebuild does.
#[derive(Clone, Debug)]
pub struct TrackedVisual<N, G> {
    identity: ImageId,
    anchor: N,
    visual: N,
    transform: TransformReconciler<N, G>,
}

impl<N: Copy, G: Copy> TrackedVisual<N, G> {
    /// Identity of the bound image.
    #[must_use]
    pub fn identity(&self) -> ImageId {
        self.identity
    }

    /// The anchor node.
    #[must_use]
    pub fn anchor(&self) -> N {
        self.anchor
    }

    /// The tilt node, child of the anchor.
    #[must_use]
    pub fn tilt(&self) -> N {
        self.transform.tilt_node()
    }

    /// The visual node, child of the tilt node and gesture target.
    #[must_use]
    pub fn visual(&self) -> N {
        self.visual
    }

    /// Installed gesture recognizers.
    #[must_use]
    pub fn gesture_handles(&self) -> &[G] {
        self.transform.gesture_handles()
    }

    /// Saved tilt-node pose while locked.
    #[must_use]
    pub fn locked_snapshot(&self) -> Option<Pose> {
        self.transform.locked_snapshot()
    }
}

/// Binds an [`Engine`] scene to overlay state.
#[derive(Debug)]
pub struct SceneBinding<E: Engine> {
    config: OverlayConfig,
    tracked: Option<TrackedVisual<E::Node, E::GestureHandle>>,
}

impl<E: Engine> Default for SceneBinding<E> {
    fn default() -> Self {
        Self::new(OverlayConfig::default())
    }
}

impl<E: Engine> SceneBinding<E> {
    /// Creates an empty binding.
    #[must_use]
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            config,
            tracked: None,
        }
    }

    /// The binding's configuration.
    #[must_use]
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// The live visual, if any.
    #[must_use]
    pub fn tracked(&self) -> Option<&TrackedVisual<E::Node, E::GestureHandle>> {
        self.tracked.as_ref()
    }

    /// Identity of the bound image, if any.
    #[must_use]
    pub fn bound_identity(&self) -> Option<ImageId> {
        self.tracked.as_ref().map(|t| t.identity)
    }

    /// Brings `engine` in line with `state`.
    ///
    /// Slider values are clamped into the configured ranges first. Decode
    /// failures are reported in the outcome and never leave a partial visual.
    pub fn reconcile<I: ImageSource>(
        &mut self,
        engine: &mut E,
        state: &OverlayState<I>,
        tracer: &mut Tracer<'_>,
    ) -> ReconcileOutcome {
        let opacity = self.config.clamp_opacity(state.opacity);
        let tilt_angle = self.config.clamp_tilt(state.tilt_angle);
        let selected = state.selected_image.as_ref();
        let action = decide(
            self.bound_identity(),
            selected.map(|image| image.identity()),
        );

        if action == BindAction::Update
            && let Some(tracked) = self.tracked.as_mut()
        {
            return update(engine, tracked, opacity, tilt_angle, state.locked, tracer);
        }

        let previous = self.bound_identity();
        engine.remove_all_anchors();
        self.tracked = None;
        let Some(image) = selected else {
            tracer.clear(&ClearEvent { previous });
            return ReconcileOutcome::Cleared;
        };
        let identity = image.identity();
        match self.build(engine, image, opacity, tilt_angle, state.locked, tracer) {
            Ok(tracked) => {
                self.tracked = Some(tracked);
                tracer.rebuild(&RebuildEvent {
                    previous,
                    identity,
                    opacity,
                    tilt_angle,
                    locked: state.locked,
                });
                ReconcileOutcome::Rebuilt
            }
            Err(error) => {
                tracer.decode_failure(&DecodeFailureEvent {
                    identity,
                    error: &error,
                });
                ReconcileOutcome::DecodeFailed(error)
            }
        }
    }

    fn build<I: ImageSource>(
        &self,
        engine: &mut E,
        image: &I,
        opacity: f32,
        tilt_angle: f64,
        locked: bool,
        tracer: &mut Tracer<'_>,
    ) -> Result<TrackedVisual<E::Node, E::GestureHandle>, DecodeError> {
        let texture = image.decode()?;
        let material = Material::with_opacity(texture, opacity);
        let visual = engine.create_model(self.config.mesh(), material);

        let tilt = engine.create_node();
        reconcile::apply_tilt(engine, tilt, tilt_angle);
        engine.attach_child(tilt, visual);

        let anchor = engine.create_anchor(self.config.surface);
        engine.attach_child(anchor, tilt);

        engine.generate_collision(visual);
        let gestures = engine.install_gestures(self.config.gestures, visual);

        let mut transform = TransformReconciler::new(tilt, gestures);
        if locked {
            transform.capture(engine, tracer);
        }
        transform.gate_gestures(engine, !locked, tracer);

        Ok(TrackedVisual {
            identity: image.identity(),
            anchor,
            visual,
            transform,
        })
    }
}

fn update<E: Engine>(
    engine: &mut E,
    tracked: &mut TrackedVisual<E::Node, E::GestureHandle>,
    opacity: f32,
    tilt_angle: f64,
    locked: bool,
    tracer: &mut Tracer<'_>,
) -> ReconcileOutcome {
    if let Some(mut material) = engine.material(tracked.visual).cloned() {
        material.set_opacity(opacity);
        engine.set_material(tracked.visual, material);
    }
    let phase = tracked
        .transform
        .reconcile(engine, tilt_angle, locked, tracer);
    tracer.update(&UpdateEvent {
        identity: tracked.identity,
        opacity,
        tilt_angle,
        locked,
    });
    ReconcileOutcome::Updated(phase)
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use alloc::vec;

    use super::*;
    use crate::gesture::Gesture;
    use crate::material::{Blending, Texture};
    use crate::scene::{NodeId, NodeKind, SceneStore};

    const EPS: f64 = 1e-9;

    #[derive(Clone, Debug)]
    struct TestImage {
        id: u64,
        decodable: bool,
    }

    impl TestImage {
        fn ok(id: u64) -> Self {
            Self {
                id,
                decodable: true,
            }
        }

        fn broken(id: u64) -> Self {
            Self {
                id,
                decodable: false,
            }
        }
    }

    impl ImageSource for TestImage {
        fn identity(&self) -> ImageId {
            ImageId(self.id)
        }

        fn decode(&self) -> Result<Texture, DecodeError> {
            if !self.decodable {
                return Err(DecodeError::Malformed("truncated".into()));
            }
            Texture::from_rgba8(2, 2, vec![255_u8; 16]).ok_or(DecodeError::Empty)
        }
    }

    fn selected(image: TestImage) -> OverlayState<TestImage> {
        OverlayState {
            selected_image: Some(image),
            ..OverlayState::new()
        }
    }

    fn cycle(
        binding: &mut SceneBinding<SceneStore>,
        scene: &mut SceneStore,
        state: &OverlayState<TestImage>,
    ) -> ReconcileOutcome {
        let outcome = binding.reconcile(scene, state, &mut Tracer::none());
        let _ = scene.evaluate();
        outcome
    }

    fn visual(binding: &SceneBinding<SceneStore>) -> NodeId {
        binding.tracked().map(TrackedVisual::visual).unwrap()
    }

    fn tilt(binding: &SceneBinding<SceneStore>) -> NodeId {
        binding.tracked().map(TrackedVisual::tilt).unwrap()
    }

    fn model_count(scene: &SceneStore) -> usize {
        scene
            .traversal_order()
            .iter()
            .filter(|&&idx| scene.kind_at(idx) == NodeKind::Model)
            .count()
    }

    #[test]
    fn decide_matches_identity() {
        let (a, b) = (Some(ImageId(1)), Some(ImageId(2)));
        assert_eq!(decide(None, a), BindAction::Rebuild);
        assert_eq!(decide(a, a), BindAction::Update);
        assert_eq!(decide(a, b), BindAction::Rebuild);
        assert_eq!(decide(a, None), BindAction::Rebuild);
        assert_eq!(decide(None, None), BindAction::Rebuild);
    }

    #[test]
    fn rebuild_builds_anchor_tilt_visual() {
        let mut scene = SceneStore::new();
        let mut binding = SceneBinding::default();
        let state = OverlayState {
            opacity: 0.4,
            tilt_angle: 0.5,
            ..selected(TestImage::ok(1))
        };
        assert_eq!(
            cycle(&mut binding, &mut scene, &state),
            ReconcileOutcome::Rebuilt
        );

        let tracked = binding.tracked().unwrap();
        assert_eq!(tracked.identity(), ImageId(1));
        assert_eq!(scene.parent(tracked.tilt()), Some(tracked.anchor()));
        assert_eq!(scene.parent(tracked.visual()), Some(tracked.tilt()));
        assert_eq!(
            scene.kind(tracked.anchor()),
            NodeKind::Anchor(binding.config().surface)
        );
        assert!(scene.has_collision(tracked.visual()));
        assert_eq!(tracked.gesture_handles().len(), 3);
        assert!(tracked.locked_snapshot().is_none());

        let tilt_pose = scene.transform(tracked.tilt());
        assert!(tilt_pose.approx_eq(
            &Pose::IDENTITY.with_rotation(reconcile::tilt_rotation(0.5)),
            EPS
        ));
        let material = scene.material(tracked.visual()).unwrap();
        assert_eq!(material.tint_alpha, 0.4);
        assert_eq!(
            material.blending,
            Blending::Transparent { opacity_scale: 0.4 }
        );
    }

    #[test]
    fn at_most_one_visual_across_cycles() {
        let mut scene = SceneStore::new();
        let mut binding = SceneBinding::default();
        let states = [
            selected(TestImage::ok(1)),
            selected(TestImage::ok(1)),
            selected(TestImage::ok(2)),
            selected(TestImage::broken(3)),
            selected(TestImage::ok(4)),
            OverlayState::new(),
            selected(TestImage::ok(5)),
        ];
        for state in &states {
            let _ = cycle(&mut binding, &mut scene, state);
            assert!(scene.anchors().len() <= 1);
            assert!(model_count(&scene) <= 1);
            assert_eq!(scene.anchors().len(), usize::from(binding.tracked().is_some()));
        }
    }

    #[test]
    fn new_identity_rebuilds_and_drops_manipulation() {
        let mut scene = SceneStore::new();
        let mut binding = SceneBinding::default();
        let _ = cycle(&mut binding, &mut scene, &selected(TestImage::ok(1)));
        let old_visual = visual(&binding);
        let old_handles = binding.tracked().unwrap().gesture_handles().to_vec();
        assert!(scene.apply_gesture(
            old_visual,
            Gesture::Pan {
                delta: [0.3, 0.0, 0.0]
            }
        ));

        // Same identity: no rebuild.
        assert!(matches!(
            cycle(&mut binding, &mut scene, &selected(TestImage::ok(1))),
            ReconcileOutcome::Updated(_)
        ));
        assert_eq!(visual(&binding), old_visual);

        assert_eq!(
            cycle(&mut binding, &mut scene, &selected(TestImage::ok(2))),
            ReconcileOutcome::Rebuilt
        );
        assert!(!scene.is_alive(old_visual));
        assert!(old_handles.iter().all(|&h| !scene.is_recognizer_alive(h)));
        assert_eq!(scene.transform(visual(&binding)), Pose::IDENTITY);
        assert_eq!(scene.recognizer_count(), 3);
    }

    #[test]
    fn same_content_different_identity_rebuilds() {
        let mut scene = SceneStore::new();
        let mut binding = SceneBinding::default();
        let shared = Arc::new(TestImage::ok(9));
        let state = OverlayState {
            selected_image: Some(Arc::clone(&shared)),
            ..OverlayState::new()
        };
        assert_eq!(
            binding.reconcile(&mut scene, &state, &mut Tracer::none()),
            ReconcileOutcome::Rebuilt
        );
        assert!(matches!(
            binding.reconcile(&mut scene, &state, &mut Tracer::none()),
            ReconcileOutcome::Updated(LockPhase::Unlocked)
        ));

        let copy = OverlayState {
            selected_image: Some(Arc::new(TestImage::ok(10))),
            ..OverlayState::new()
        };
        assert_eq!(
            binding.reconcile(&mut scene, &copy, &mut Tracer::none()),
            ReconcileOutcome::Rebuilt
        );
    }

    #[test]
    fn repeated_opacity_update_is_idempotent() {
        let mut scene = SceneStore::new();
        let mut binding = SceneBinding::default();
        let _ = cycle(&mut binding, &mut scene, &selected(TestImage::ok(1)));

        let state = OverlayState {
            opacity: 0.25,
            ..selected(TestImage::ok(1))
        };
        let _ = cycle(&mut binding, &mut scene, &state);
        let first = scene.material(visual(&binding)).cloned().unwrap();
        let _ = cycle(&mut binding, &mut scene, &state);
        let second = scene.material(visual(&binding)).cloned().unwrap();

        assert_eq!(first, second);
        assert_eq!(second.opacity(), Some(0.25));
        assert!(
            first.texture.same_storage(&second.texture),
            "update must not re-decode"
        );
    }

    #[test]
    fn opacity_update_marks_only_the_visual() {
        let mut scene = SceneStore::new();
        let mut binding = SceneBinding::default();
        let _ = cycle(&mut binding, &mut scene, &selected(TestImage::ok(1)));

        let state = OverlayState {
            opacity: 0.5,
            ..selected(TestImage::ok(1))
        };
        let _ = binding.reconcile(&mut scene, &state, &mut Tracer::none());
        let changes = scene.evaluate();
        assert_eq!(changes.materials, [visual(&binding).index()]);
        assert!(changes.added.is_empty());
    }

    #[test]
    fn lock_freezes_tilt_until_unlock() {
        let mut scene = SceneStore::new();
        let mut binding = SceneBinding::default();
        let mut state = OverlayState {
            tilt_angle: 0.3,
            ..selected(TestImage::ok(1))
        };
        let _ = cycle(&mut binding, &mut scene, &state);
        let t0 = scene.transform(tilt(&binding));

        state.toggle_lock();
        for angle in [0.8, 1.2, 0.0] {
            state.tilt_angle = angle;
            assert_eq!(
                cycle(&mut binding, &mut scene, &state),
                ReconcileOutcome::Updated(LockPhase::Locked)
            );
            assert_eq!(scene.transform(tilt(&binding)), t0);
        }

        state.toggle_lock();
        state.tilt_angle = 1.0;
        let _ = cycle(&mut binding, &mut scene, &state);
        let tracked = binding.tracked().unwrap();
        assert!(
            scene
                .transform(tracked.tilt())
                .rotation
                .approx_eq(reconcile::tilt_rotation(1.0), EPS)
        );
        assert!(
            tracked
                .gesture_handles()
                .iter()
                .all(|&h| scene.gesture_enabled(h))
        );
    }

    #[test]
    fn rebuild_while_locked_captures_and_gates() {
        let mut scene = SceneStore::new();
        let mut binding = SceneBinding::default();
        let state = OverlayState {
            tilt_angle: 0.6,
            locked: true,
            ..selected(TestImage::ok(1))
        };
        let _ = cycle(&mut binding, &mut scene, &state);

        let tracked = binding.tracked().unwrap();
        assert_eq!(
            tracked.locked_snapshot(),
            Some(scene.transform(tracked.tilt()))
        );
        assert!(
            tracked
                .gesture_handles()
                .iter()
                .all(|&h| !scene.gesture_enabled(h))
        );
        assert!(!scene.apply_gesture(tracked.visual(), Gesture::Twist { radians: 0.4 }));
    }

    #[test]
    fn gesture_handles_follow_lock_toggles() {
        let mut scene = SceneStore::new();
        let mut binding = SceneBinding::default();
        let mut state = selected(TestImage::ok(1));
        let _ = cycle(&mut binding, &mut scene, &state);

        for locked in [true, false, true, false] {
            state.locked = locked;
            let _ = cycle(&mut binding, &mut scene, &state);
            let tracked = binding.tracked().unwrap();
            for &h in tracked.gesture_handles() {
                assert_eq!(scene.gesture_enabled(h), !locked);
            }
            assert_eq!(tracked.locked_snapshot().is_some(), locked);
        }
    }

    #[test]
    fn decode_failure_leaves_no_visual_and_recovers() {
        let mut scene = SceneStore::new();
        let mut binding = SceneBinding::default();
        let _ = cycle(&mut binding, &mut scene, &selected(TestImage::ok(1)));

        let outcome = cycle(&mut binding, &mut scene, &selected(TestImage::broken(2)));
        assert!(matches!(
            outcome,
            ReconcileOutcome::DecodeFailed(DecodeError::Malformed(_))
        ));
        assert!(binding.tracked().is_none());
        assert!(scene.anchors().is_empty());
        assert_eq!(scene.node_count(), 0);
        assert_eq!(scene.recognizer_count(), 0);

        // Still selected and still broken: retried, still nothing.
        let outcome = cycle(&mut binding, &mut scene, &selected(TestImage::broken(2)));
        assert!(matches!(outcome, ReconcileOutcome::DecodeFailed(_)));
        assert_eq!(scene.node_count(), 0);

        assert_eq!(
            cycle(&mut binding, &mut scene, &selected(TestImage::ok(3))),
            ReconcileOutcome::Rebuilt
        );
        assert_eq!(binding.bound_identity(), Some(ImageId(3)));
    }

    #[test]
    fn deselect_clears_everything() {
        let mut scene = SceneStore::new();
        let mut binding = SceneBinding::default();
        let _ = cycle(
            &mut binding,
            &mut scene,
            &OverlayState {
                locked: true,
                ..selected(TestImage::ok(1))
            },
        );

        assert_eq!(
            cycle(&mut binding, &mut scene, &OverlayState::new()),
            ReconcileOutcome::Cleared
        );
        assert!(binding.tracked().is_none());
        assert_eq!(binding.bound_identity(), None);
        assert_eq!(scene.node_count(), 0);
        assert_eq!(scene.recognizer_count(), 0);

        // Clearing an already empty binding is harmless.
        assert_eq!(
            cycle(&mut binding, &mut scene, &OverlayState::new()),
            ReconcileOutcome::Cleared
        );
    }

    #[test]
    fn out_of_range_sliders_are_clamped() {
        let mut scene = SceneStore::new();
        let mut binding = SceneBinding::default();
        let state = OverlayState {
            opacity: 3.0,
            tilt_angle: -1.0,
            ..selected(TestImage::ok(1))
        };
        let _ = cycle(&mut binding, &mut scene, &state);
        let tracked = binding.tracked().unwrap();
        assert_eq!(scene.material(tracked.visual()).unwrap().opacity(), Some(1.0));
        assert!(
            scene
                .transform(tracked.tilt())
                .rotation
                .approx_eq(reconcile::tilt_rotation(0.0), EPS)
        );
    }

    #[test]
    fn rebuild_removes_only_anchor_subtrees() {
        let mut scene = SceneStore::new();
        let mut binding = SceneBinding::default();
        let loose = scene.create_node();
        let _ = cycle(&mut binding, &mut scene, &selected(TestImage::ok(1)));
        assert!(scene.is_alive(loose), "only anchors are removed");
    }

    #[test]
    fn inverted_tilt_range_pins_instead_of_panicking() {
        let mut scene = SceneStore::new();
        let mut binding = SceneBinding::new(OverlayConfig {
            tilt_range: 1.0..=0.5,
            ..OverlayConfig::tabletop()
        });
        let state = OverlayState {
            tilt_angle: 0.8,
            ..selected(TestImage::ok(1))
        };
        assert_eq!(cycle(&mut binding, &mut scene, &state), ReconcileOutcome::Rebuilt);
        assert!(
            scene
                .transform(tilt(&binding))
                .rotation
                .approx_eq(reconcile::tilt_rotation(0.5), EPS)
        );
    }

    #[cfg(feature = "trace")]
    #[test]
    fn reconcile_emits_lock_and_failure_events() {
        use alloc::vec::Vec;

        use crate::trace::{GestureGateEvent, LockCapturedEvent, LockRestoredEvent, TraceSink};

        #[derive(Debug, PartialEq)]
        enum Seen {
            Rebuild(ImageId),
            Update,
            Captured,
            Restored { corrected: bool },
            Gated { enabled: bool, changed: usize },
            DecodeFailed(ImageId),
        }

        #[derive(Default)]
        struct Log(Vec<Seen>);

        impl TraceSink for Log {
            fn on_rebuild(&mut self, e: &RebuildEvent) {
                self.0.push(Seen::Rebuild(e.identity));
            }

            fn on_update(&mut self, _e: &UpdateEvent) {
                self.0.push(Seen::Update);
            }

            fn on_decode_failure(&mut self, e: &DecodeFailureEvent<'_>) {
                self.0.push(Seen::DecodeFailed(e.identity));
            }

            fn on_lock_captured(&mut self, _e: &LockCapturedEvent) {
                self.0.push(Seen::Captured);
            }

            fn on_lock_restored(&mut self, e: &LockRestoredEvent) {
                self.0.push(Seen::Restored {
                    corrected: e.corrected,
                });
            }

            fn on_gestures_gated(&mut self, e: &GestureGateEvent) {
                self.0.push(Seen::Gated {
                    enabled: e.enabled,
                    changed: e.changed,
                });
            }
        }

        let mut scene = SceneStore::new();
        let mut binding = SceneBinding::default();
        let mut log = Log::default();
        let mut state = selected(TestImage::ok(1));
        let mut step = |binding: &mut SceneBinding<SceneStore>,
                        scene: &mut SceneStore,
                        state: &OverlayState<TestImage>|
         -> Vec<Seen> {
            let _ = binding.reconcile(scene, state, &mut Tracer::new(&mut log));
            let _ = scene.evaluate();
            core::mem::take(&mut log.0)
        };

        // Recognizers are installed enabled, so an unlocked rebuild gates nothing.
        assert_eq!(
            step(&mut binding, &mut scene, &state),
            [Seen::Rebuild(ImageId(1))]
        );

        state.locked = true;
        assert_eq!(
            step(&mut binding, &mut scene, &state),
            [
                Seen::Gated {
                    enabled: false,
                    changed: 3
                },
                Seen::Captured,
                Seen::Update,
            ]
        );

        let t = tilt(&binding);
        let drifted = Pose {
            translation: [0.0, 0.02, 0.0],
            ..scene.transform(t)
        };
        scene.set_transform(t, drifted);
        assert_eq!(
            step(&mut binding, &mut scene, &state),
            [Seen::Restored { corrected: true }, Seen::Update],
            "already-disabled handles are not gated again"
        );
        assert_eq!(
            step(&mut binding, &mut scene, &state),
            [Seen::Restored { corrected: false }, Seen::Update]
        );

        state.locked = false;
        assert_eq!(
            step(&mut binding, &mut scene, &state),
            [
                Seen::Gated {
                    enabled: true,
                    changed: 3
                },
                Seen::Update,
            ]
        );

        state.selected_image = Some(TestImage::broken(2));
        assert_eq!(
            step(&mut binding, &mut scene, &state),
            [Seen::DecodeFailed(ImageId(2))]
        );
        assert!(binding.tracked().is_none(), "failed decode binds nothing");
    }
}
