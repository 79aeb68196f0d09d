// Copyright 2026 the Tiltframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use alloc::vec;
use alloc::vec::Vec;

use super::id::{INVALID, NodeId};
use super::store::SceneStore;

/// An iterator over the direct children of a node.
///
/// Created by [`SceneStore::children`].
#[derive(Debug)]
pub struct Children<'a> {
    store: &'a SceneStore,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(store: &'a SceneStore, first: u32) -> Self {
        Self {
            store,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.store.next_sibling[idx as usize];
        Some(NodeId {
            idx,
            generation: self.store.generation[idx as usize],
        })
    }
}

/// A pre-order iterator over a node and everything below it.
///
/// Created by [`SceneStore::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    store: &'a SceneStore,
    stack: Vec<u32>,
}

impl<'a> Descendants<'a> {
    pub(crate) fn new(store: &'a SceneStore, root: u32) -> Self {
        Self {
            store,
            stack: vec![root],
        }
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let idx = self.stack.pop()?;
        // Push children last-to-first so the first child is visited next.
        let mark = self.stack.len();
        let mut child = self.store.first_child[idx as usize];
        while child != INVALID {
            self.stack.push(child);
            child = self.store.next_sibling[child as usize];
        }
        self.stack[mark..].reverse();
        Some(NodeId {
            idx,
            generation: self.store.generation[idx as usize],
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::scene::{NodeKind, SceneStore};

    use super::*;

    #[test]
    fn descendants_visit_in_pre_order() {
        let mut store = SceneStore::new();
        let root = store.create(NodeKind::Group);
        let a = store.create(NodeKind::Group);
        let a1 = store.create(NodeKind::Model);
        let b = store.create(NodeKind::Group);
        store.add_child(root, a);
        store.add_child(a, a1);
        store.add_child(root, b);

        let order: Vec<_> = store.descendants(root).collect();
        assert_eq!(order, [root, a, a1, b]);
    }

    #[test]
    fn leaf_descendants_is_itself() {
        let mut store = SceneStore::new();
        let leaf = store.create(NodeKind::Model);
        assert_eq!(store.descendants(leaf).count(), 1);
    }
}
