// Copyright 2026 the Tiltframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene binding and transform reconciliation for a tracked image overlay.
//!
//! `tiltframe_core` keeps one user-selected image, drawn on a quad, anchored
//! to a detected real-world surface. Sliders control its opacity and tilt, the
//! engine's gestures move, twist, and scale it, and a lock flag freezes its
//! pose. It is `no_std` compatible (with `alloc`) and talks to the 3D engine
//! only through the [`Engine`](engine::Engine) trait.
//!
//! # Architecture
//!
//! ```text
//!   UI layer (OverlayState)
//!       │
//!       ▼
//!   SceneBinding::reconcile() ── decide() ──┬── Rebuild: decode, build
//!                                           │   anchor → tilt → visual
//!                                           │
//!                                           └── Update: patch opacity,
//!                                                   │
//!                                                   ▼
//!                                   TransformReconciler (tilt node, lock)
//!       │
//!       ▼
//!   Engine (SceneStore) ──► SceneStore::evaluate() ──► Presenter::apply()
//! ```
//!
//! **[`binding`]**: the scene binding layer. Owns at most one
//! [`TrackedVisual`](binding::TrackedVisual) and chooses rebuild or update by
//! image identity.
//!
//! **[`reconcile`]**: the transform reconciler. Applies the tilt slider to the
//! tilt node, gates gesture recognizers, and holds the lock snapshot.
//!
//! **[`engine`]**: the [`Engine`](engine::Engine),
//! [`ImageSource`](engine::ImageSource), and [`Presenter`](engine::Presenter)
//! seams.
//!
//! **[`scene`]**: struct-of-arrays reference scene with generational handles,
//! gesture recognizers, and dirty-tracked evaluation.
//!
//! **[`dirty`]**: dirty-tracking channels via `understory_dirty`.
//!
//! **[`state`]**: UI-owned [`OverlayState`](state::OverlayState) and the fixed
//! [`OverlayConfig`](state::OverlayConfig).
//!
//! **[`pose`]**, **[`transform`]**, **[`material`]**, **[`gesture`]**: value
//! types.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! reconcile instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod binding;
pub mod dirty;
pub mod engine;
pub mod error;
pub mod gesture;
pub mod material;
pub mod pose;
pub mod reconcile;
pub mod scene;
pub mod state;
pub mod trace;
pub mod transform;
