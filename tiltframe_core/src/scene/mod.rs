// Copyright 2026 the Tiltframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory reference scene.
//!
//! [`SceneStore`] is a small scene graph that implements
//! [`Engine`](crate::engine::Engine). Hosts without a native 3D engine use it
//! directly and mirror it through a [`Presenter`](crate::engine::Presenter);
//! tests use it as the engine the binding layer drives.
//!
//! Each node has:
//!
//! - An identity ([`NodeId`]): a generational handle that becomes stale when
//!   the node is destroyed.
//! - Topology: parent, first-child, and sibling links forming an ordered tree.
//! - **Local properties** set by the caller: [`kind`](NodeKind),
//!   [`pose`](SceneStore::set_pose), [`material`](SceneStore::set_material),
//!   [`mesh`](SceneStore::set_mesh), and [`collision`](SceneStore::set_collision).
//! - **Computed properties** produced by [`evaluate`](SceneStore::evaluate):
//!   `world_transform`, the product of ancestor pose matrices.
//!
//! Gesture recognizers ([`GestureId`]) live in the same store and are
//! released together with the node they target.

mod engine;
mod evaluate;
mod gestures;
mod id;
mod store;
mod traverse;

pub use evaluate::SceneChanges;
pub use id::{GestureId, INVALID, NodeId};
pub use store::{NodeKind, SceneStore};
pub use traverse::{Children, Descendants};
