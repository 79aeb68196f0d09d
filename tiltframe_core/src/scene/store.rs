// Copyright 2026 the Tiltframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation, topology, and property management.

use alloc::vec::Vec;

use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::gestures::Recognizers;
use super::id::{INVALID, NodeId};
use super::traverse::{Children, Descendants};
use crate::dirty;
use crate::engine::SurfaceKind;
use crate::material::{Material, Mesh};
use crate::pose::Pose;
use crate::transform::Transform3d;

/// What a node is for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Root whose pose is driven by surface tracking.
    Anchor(SurfaceKind),
    /// Grouping node with a pose and children only.
    #[default]
    Group,
    /// Renderable node carrying a mesh and material.
    Model,
}

/// Struct-of-arrays storage for all scene nodes.
///
/// Nodes are addressed by [`NodeId`] handles. Internally, each node occupies
/// a slot in parallel arrays. Destroyed nodes are recycled via a free list,
/// and generation counters prevent stale handle access.
#[derive(Debug)]
pub struct SceneStore {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Local properties (set by callers) --
    pub(crate) kind: Vec<NodeKind>,
    pub(crate) local_pose: Vec<Pose>,
    pub(crate) material: Vec<Option<Material>>,
    pub(crate) mesh: Vec<Option<Mesh>>,
    pub(crate) collision: Vec<bool>,

    // -- Computed properties (written by evaluate) --
    pub(crate) world_transform: Vec<Transform3d>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Traversal cache --
    pub(crate) traversal_order: Vec<u32>,
    pub(crate) traversal_dirty: bool,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,

    // -- Input --
    pub(crate) recognizers: Recognizers,
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneStore {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            kind: Vec::new(),
            local_pose: Vec::new(),
            material: Vec::new(),
            mesh: Vec::new(),
            collision: Vec::new(),
            world_transform: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            traversal_order: Vec::new(),
            traversal_dirty: true,
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
            recognizers: Recognizers::default(),
        }
    }

    // -- Allocation API --

    /// Creates a detached node of the given kind and returns its handle.
    ///
    /// The node starts with an identity pose, no material, no mesh, and no
    /// collision.
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        let idx = if let Some(idx) = self.free_list.pop() {
            let i = idx as usize;
            self.generation[i] += 1;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.kind[i] = kind;
            self.local_pose[i] = Pose::IDENTITY;
            self.material[i] = None;
            self.mesh[i] = None;
            self.collision[i] = false;
            self.world_transform[i] = Transform3d::IDENTITY;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.kind.push(kind);
            self.local_pose.push(Pose::IDENTITY);
            self.material.push(None);
            self.mesh.push(None);
            self.collision.push(false);
            self.world_transform.push(Transform3d::IDENTITY);
            self.generation.push(0);
            idx
        };

        self.traversal_dirty = true;
        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
        self.dirty.mark_with(idx, dirty::TRANSFORM, &EagerPolicy);

        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a childless node, freeing its slot and releasing every
    /// recognizer that targets it.
    ///
    /// # Panics
    ///
    /// Panics if the node has children (destroy them first, or use
    /// [`destroy_subtree`](Self::destroy_subtree)) or if the handle is stale.
    pub fn destroy(&mut self, id: NodeId) {
        self.validate(id);
        let idx = id.idx;
        assert!(
            self.first_child[idx as usize] == INVALID,
            "cannot destroy node with children"
        );

        if self.parent[idx as usize] != INVALID {
            self.unlink_from_parent(idx);
        }

        self.recognizers.release_targeting(id);
        self.material[idx as usize] = None;
        self.dirty.remove_key(idx);

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;

        self.free_list.push(idx);
        self.traversal_dirty = true;
        self.pending_removed.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
    }

    /// Destroys `id` and all of its descendants, children first.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn destroy_subtree(&mut self, id: NodeId) {
        self.validate(id);
        let mut order: Vec<NodeId> = self.descendants(id).collect();
        // Pre-order reversed puts every child ahead of its parent.
        order.reverse();
        for node in order {
            self.destroy(node);
        }
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    /// Returns the number of live nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    // -- Topology API --

    /// Adds `child` as the last child of `parent`.
    ///
    /// Marks `child`'s subtree TRANSFORM-dirty so world transforms are
    /// recomputed under the new ancestry.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, or if `child` already has a parent.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.validate(parent);
        self.validate(child);
        let p = parent.idx;
        let c = child.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        assert!(p != c, "node cannot be its own child");

        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }

        // Child depends on parent for TRANSFORM.
        let _ = self.dirty.add_dependency(c, p, dirty::TRANSFORM);

        self.dirty.mark_with(c, dirty::TRANSFORM, &EagerPolicy);
        self.traversal_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Returns the parent of a node, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        (p != INVALID).then(|| NodeId {
            idx: p,
            generation: self.generation[p as usize],
        })
    }

    /// Returns an iterator over the direct children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns an iterator over `id` and every node below it, in pre-order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        self.validate(id);
        Descendants::new(self, id.idx)
    }

    /// Returns the live root nodes (those with no parent).
    #[must_use]
    pub fn roots(&self) -> Vec<NodeId> {
        (0..self.len)
            .filter(|&idx| self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx))
            .map(|idx| NodeId {
                idx,
                generation: self.generation[idx as usize],
            })
            .collect()
    }

    /// Returns the live anchors, in slot order.
    #[must_use]
    pub fn anchors(&self) -> Vec<NodeId> {
        self.roots()
            .into_iter()
            .filter(|id| matches!(self.kind[id.idx as usize], NodeKind::Anchor(_)))
            .collect()
    }

    // -- Property getters (read-only, no dirty marking) --

    /// Returns the kind of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.validate(id);
        self.kind[id.idx as usize]
    }

    /// Returns the local pose of a node.
    #[must_use]
    pub fn local_pose(&self, id: NodeId) -> Pose {
        self.validate(id);
        self.local_pose[id.idx as usize]
    }

    /// Returns the material of a node.
    #[must_use]
    pub fn material(&self, id: NodeId) -> Option<&Material> {
        self.validate(id);
        self.material[id.idx as usize].as_ref()
    }

    /// Returns the mesh of a node.
    #[must_use]
    pub fn mesh(&self, id: NodeId) -> Option<Mesh> {
        self.validate(id);
        self.mesh[id.idx as usize]
    }

    /// Returns whether gestures can hit this node.
    #[must_use]
    pub fn has_collision(&self, id: NodeId) -> bool {
        self.validate(id);
        self.collision[id.idx as usize]
    }

    /// Returns the computed world transform of a node.
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn world_transform(&self, id: NodeId) -> Transform3d {
        self.validate(id);
        self.world_transform[id.idx as usize]
    }

    // -- Mutation API (auto-marks dirty) --

    /// Sets the local pose of a node.
    ///
    /// Marks the TRANSFORM channel dirty with eager propagation to descendants.
    pub fn set_pose(&mut self, id: NodeId, pose: Pose) {
        self.validate(id);
        self.local_pose[id.idx as usize] = pose;
        self.dirty.mark_with(id.idx, dirty::TRANSFORM, &EagerPolicy);
    }

    /// Sets the material of a node.
    pub fn set_material(&mut self, id: NodeId, material: Option<Material>) {
        self.validate(id);
        self.material[id.idx as usize] = material;
        self.dirty.mark(id.idx, dirty::MATERIAL);
    }

    /// Sets the mesh of a node.
    pub fn set_mesh(&mut self, id: NodeId, mesh: Option<Mesh>) {
        self.validate(id);
        self.mesh[id.idx as usize] = mesh;
        self.dirty.mark(id.idx, dirty::MATERIAL);
    }

    /// Sets whether gestures can hit this node.
    pub fn set_collision(&mut self, id: NodeId, collision: bool) {
        self.validate(id);
        self.collision[id.idx as usize] = collision;
    }

    // -- Raw-index accessors for presenters --
    //
    // These accept raw slot indices (as found in `SceneChanges`) rather than
    // `NodeId` handles, skipping generation validation.

    /// Returns the computed world transform at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn world_transform_at(&self, idx: u32) -> Transform3d {
        self.check_slot(idx);
        self.world_transform[idx as usize]
    }

    /// Returns the material at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn material_at(&self, idx: u32) -> Option<&Material> {
        self.check_slot(idx);
        self.material[idx as usize].as_ref()
    }

    /// Returns the kind at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn kind_at(&self, idx: u32) -> NodeKind {
        self.check_slot(idx);
        self.kind[idx as usize]
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    fn check_slot(&self, idx: u32) {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
    }

    /// Removes `idx` from its parent's child list without touching dirty state.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::pose::Rotation;

    #[test]
    fn create_and_destroy() {
        let mut store = SceneStore::new();
        let id = store.create(NodeKind::Group);
        assert!(store.is_alive(id));
        assert_eq!(store.node_count(), 1);
        store.destroy(id);
        assert!(!store.is_alive(id));
        assert_eq!(store.node_count(), 0);
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut store = SceneStore::new();
        let id1 = store.create(NodeKind::Group);
        store.destroy(id1);
        let id2 = store.create(NodeKind::Model);
        assert!(!store.is_alive(id1));
        assert!(store.is_alive(id2));
        assert_eq!(id1.idx, id2.idx);
        assert_ne!(id1.generation, id2.generation);
    }

    #[test]
    fn reused_slot_starts_clean() {
        let mut store = SceneStore::new();
        let id1 = store.create(NodeKind::Model);
        store.set_collision(id1, true);
        store.set_pose(id1, Pose::IDENTITY.with_rotation(Rotation::about_x(1.0)));
        store.destroy(id1);
        let id2 = store.create(NodeKind::Group);
        assert!(!store.has_collision(id2));
        assert_eq!(store.local_pose(id2), Pose::IDENTITY);
        assert_eq!(store.kind(id2), NodeKind::Group);
    }

    #[test]
    fn add_child_and_query() {
        let mut store = SceneStore::new();
        let parent = store.create(NodeKind::Group);
        let a = store.create(NodeKind::Group);
        let b = store.create(NodeKind::Model);
        store.add_child(parent, a);
        store.add_child(parent, b);

        assert_eq!(store.parent(a), Some(parent));
        let kids: Vec<_> = store.children(parent).collect();
        assert_eq!(kids, vec![a, b]);
    }

    #[test]
    fn destroy_subtree_frees_every_descendant() {
        let mut store = SceneStore::new();
        let anchor = store.create(NodeKind::Anchor(SurfaceKind::Horizontal));
        let tilt = store.create(NodeKind::Group);
        let visual = store.create(NodeKind::Model);
        let other = store.create(NodeKind::Group);
        store.add_child(anchor, tilt);
        store.add_child(tilt, visual);

        store.destroy_subtree(anchor);
        assert!(!store.is_alive(anchor));
        assert!(!store.is_alive(tilt));
        assert!(!store.is_alive(visual));
        assert!(store.is_alive(other));
        assert_eq!(store.node_count(), 1);
    }

    #[test]
    fn anchors_lists_only_anchor_roots() {
        let mut store = SceneStore::new();
        let anchor = store.create(NodeKind::Anchor(SurfaceKind::Vertical));
        let loose = store.create(NodeKind::Group);
        assert_eq!(store.anchors(), vec![anchor]);
        assert!(store.roots().contains(&loose));
    }

    #[test]
    #[should_panic(expected = "cannot destroy node with children")]
    fn destroy_with_children_panics() {
        let mut store = SceneStore::new();
        let parent = store.create(NodeKind::Group);
        let child = store.create(NodeKind::Group);
        store.add_child(parent, child);
        store.destroy(parent);
    }

    #[test]
    #[should_panic(expected = "stale NodeId")]
    fn destroyed_handle_panics_on_set_pose() {
        let mut store = SceneStore::new();
        let id = store.create(NodeKind::Group);
        store.destroy(id);
        store.set_pose(id, Pose::IDENTITY);
    }

    #[test]
    #[should_panic(expected = "child already has a parent")]
    fn double_attach_panics() {
        let mut store = SceneStore::new();
        let a = store.create(NodeKind::Group);
        let b = store.create(NodeKind::Group);
        let child = store.create(NodeKind::Group);
        store.add_child(a, child);
        store.add_child(b, child);
    }

    #[test]
    fn set_material_marks_dirty() {
        use crate::material::Texture;

        let mut store = SceneStore::new();
        let id = store.create(NodeKind::Model);
        let _ = store.evaluate();

        let texture = Texture::from_rgba8(1, 1, vec![0_u8; 4]).expect("1x1 texture");
        store.set_material(id, Some(Material::with_opacity(texture, 0.5)));
        let changes = store.evaluate();
        assert!(
            changes.materials.contains(&id.idx),
            "material channel should contain the node"
        );
    }
}
