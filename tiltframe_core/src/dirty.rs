// Copyright 2026 the Tiltframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The reference scene uses multi-channel dirty tracking (via
//! [`understory_dirty`]) so presenters only touch what changed.
//!
//! - **Propagating**: [`TRANSFORM`] uses
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) with dependency edges from
//!   child to parent. Re-tilting the tilt node marks the visual node under it,
//!   since world transforms are inherited.
//!
//! - **Local-only**: [`MATERIAL`] is marked with the default policy. Opacity
//!   patches touch exactly one node.
//!
//! - **Structural**: [`TOPOLOGY`] is marked on create/destroy/attach and
//!   triggers a traversal-order rebuild during evaluation.
//!
//! Callers never query dirty state directly; each
//! [`SceneStore::evaluate`](crate::scene::SceneStore::evaluate) drains all
//! channels into [`SceneChanges`](crate::scene::SceneChanges).

use understory_dirty::Channel;

/// Local pose changed; requires world transform recomputation for descendants.
pub const TRANSFORM: Channel = Channel::new(0);

/// Material changed; no propagation needed.
pub const MATERIAL: Channel = Channel::new(1);

/// Tree topology changed; triggers traversal order rebuild.
pub const TOPOLOGY: Channel = Channel::new(2);
