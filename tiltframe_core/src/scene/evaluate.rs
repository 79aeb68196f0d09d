// Copyright 2026 the Tiltframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene evaluation and change tracking.
//!
//! Evaluation drains each dirty channel in turn:
//!
//! 1. **TRANSFORM**: recompute `world_transform` as
//!    `parent_world * local_pose.to_matrix()`, parents before children.
//! 2. **MATERIAL**: collect only; presenters read the current material.
//! 3. **TOPOLOGY**: consume; the traversal order was already rebuilt.
//!
//! [`SceneChanges`] lists raw slot indices so presenters can use the
//! `*_at()` accessors without generation checks.

use alloc::vec::Vec;

use super::id::INVALID;
use super::store::SceneStore;
use crate::dirty;
use crate::transform::Transform3d;

/// The set of changes produced by a single [`SceneStore::evaluate`] call.
#[derive(Clone, Debug, Default)]
pub struct SceneChanges {
    /// Nodes whose world transform was recomputed.
    pub transforms: Vec<u32>,
    /// Nodes whose material or mesh changed.
    pub materials: Vec<u32>,
    /// Nodes created since the last evaluate.
    pub added: Vec<u32>,
    /// Nodes destroyed since the last evaluate.
    pub removed: Vec<u32>,
    /// Whether the tree topology changed (traversal order was rebuilt).
    pub topology_changed: bool,
}

impl SceneChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.transforms.clear();
        self.materials.clear();
        self.added.clear();
        self.removed.clear();
        self.topology_changed = false;
    }

    /// Returns true if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
            && self.materials.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
            && !self.topology_changed
    }
}

impl SceneStore {
    /// Evaluates the scene, recomputing dirty world transforms and returning
    /// the set of changes.
    pub fn evaluate(&mut self) -> SceneChanges {
        let mut changes = SceneChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer.
    pub fn evaluate_into(&mut self, changes: &mut SceneChanges) {
        changes.clear();

        if self.traversal_dirty {
            self.rebuild_traversal_order();
            changes.topology_changed = true;
            self.traversal_dirty = false;
        }

        let dirty_transforms: Vec<u32> = self
            .dirty
            .drain(dirty::TRANSFORM)
            .affected()
            .deterministic()
            .run()
            .filter(|idx| !self.free_list.contains(idx))
            .collect();
        for &idx in &dirty_transforms {
            let parent_idx = self.parent[idx as usize];
            let parent_world = if parent_idx != INVALID {
                self.world_transform[parent_idx as usize]
            } else {
                Transform3d::IDENTITY
            };
            self.world_transform[idx as usize] =
                parent_world * self.local_pose[idx as usize].to_matrix();
        }
        changes.transforms = dirty_transforms;

        changes.materials = self
            .dirty
            .drain(dirty::MATERIAL)
            .deterministic()
            .run()
            .filter(|idx| !self.free_list.contains(idx))
            .collect();

        let _: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();

        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
    }

    /// Returns the current traversal order (depth-first pre-order).
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn traversal_order(&self) -> &[u32] {
        &self.traversal_order
    }

    fn rebuild_traversal_order(&mut self) {
        let roots = self.roots();
        let order: Vec<u32> = roots
            .into_iter()
            .flat_map(|root| self.descendants(root))
            .map(|id| id.index())
            .collect();
        self.traversal_order = order;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{Pose, Rotation};
    use crate::scene::NodeKind;

    const EPS: f64 = 1e-9;

    #[test]
    fn evaluate_composes_parent_and_child_poses() {
        let mut store = SceneStore::new();
        let tilt = store.create(NodeKind::Group);
        let visual = store.create(NodeKind::Model);
        store.add_child(tilt, visual);

        let tilt_pose = Pose::IDENTITY.with_rotation(Rotation::about_x(-0.5));
        let visual_pose = Pose {
            translation: [0.0, 0.0, 0.2],
            ..Pose::IDENTITY
        };
        store.set_pose(tilt, tilt_pose);
        store.set_pose(visual, visual_pose);
        let _ = store.evaluate();

        let expected = tilt_pose.to_matrix() * visual_pose.to_matrix();
        assert!(
            store.world_transform(visual).approx_eq(&expected, EPS),
            "child world should be parent * child"
        );
    }

    #[test]
    fn parent_change_propagates_to_child() {
        let mut store = SceneStore::new();
        let tilt = store.create(NodeKind::Group);
        let visual = store.create(NodeKind::Model);
        store.add_child(tilt, visual);
        let _ = store.evaluate();

        store.set_pose(tilt, Pose::IDENTITY.with_rotation(Rotation::about_x(0.3)));
        let changes = store.evaluate();
        assert!(changes.transforms.contains(&tilt.index()));
        assert!(
            changes.transforms.contains(&visual.index()),
            "descendant should be recomputed"
        );
    }

    #[test]
    fn lifecycle_lists_are_reported_once() {
        let mut store = SceneStore::new();
        let a = store.create(NodeKind::Group);
        let changes = store.evaluate();
        assert_eq!(changes.added, [a.index()]);
        assert!(changes.topology_changed);

        store.destroy(a);
        let changes = store.evaluate();
        assert_eq!(changes.removed, [a.index()]);
        assert!(changes.transforms.is_empty(), "freed slots are filtered");

        assert!(store.evaluate().is_empty());
    }

    #[test]
    fn traversal_order_is_pre_order() {
        let mut store = SceneStore::new();
        let root = store.create(NodeKind::Group);
        let child = store.create(NodeKind::Group);
        let grandchild = store.create(NodeKind::Model);
        store.add_child(root, child);
        store.add_child(child, grandchild);
        let _ = store.evaluate();
        assert_eq!(
            store.traversal_order(),
            [root.index(), child.index(), grandchild.index()]
        );
    }
}
