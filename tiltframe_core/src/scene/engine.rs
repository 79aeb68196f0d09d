// Copyright 2026 the Tiltframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`Engine`] implementation for the reference scene.

use alloc::vec::Vec;

use super::id::{GestureId, NodeId};
use super::store::{NodeKind, SceneStore};
use crate::engine::{Engine, SurfaceKind};
use crate::gesture::GestureClasses;
use crate::material::{Material, Mesh};
use crate::pose::Pose;

impl Engine for SceneStore {
    type Node = NodeId;
    type GestureHandle = GestureId;

    fn create_anchor(&mut self, surface: SurfaceKind) -> NodeId {
        self.create(NodeKind::Anchor(surface))
    }

    fn create_node(&mut self) -> NodeId {
        self.create(NodeKind::Group)
    }

    fn create_model(&mut self, mesh: Mesh, material: Material) -> NodeId {
        let id = self.create(NodeKind::Model);
        self.set_mesh(id, Some(mesh));
        self.set_material(id, Some(material));
        id
    }

    fn attach_child(&mut self, parent: NodeId, child: NodeId) {
        self.add_child(parent, child);
    }

    fn transform(&self, node: NodeId) -> Pose {
        self.local_pose(node)
    }

    fn set_transform(&mut self, node: NodeId, pose: Pose) {
        self.set_pose(node, pose);
    }

    fn material(&self, node: NodeId) -> Option<&Material> {
        Self::material(self, node)
    }

    fn set_material(&mut self, node: NodeId, material: Material) {
        Self::set_material(self, node, Some(material));
    }

    fn generate_collision(&mut self, node: NodeId) {
        self.set_collision(node, true);
    }

    fn install_gestures(&mut self, classes: GestureClasses, node: NodeId) -> Vec<GestureId> {
        self.install_recognizers(classes, node)
    }

    fn set_gesture_enabled(&mut self, handle: GestureId, enabled: bool) {
        self.set_recognizer_enabled(handle, enabled);
    }

    fn gesture_enabled(&self, handle: GestureId) -> bool {
        self.recognizer_enabled(handle)
    }

    fn remove_all_anchors(&mut self) {
        for anchor in self.anchors() {
            self.destroy_subtree(anchor);
        }
    }
}
