// Copyright 2026 the Tiltframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture recognizers and manipulation input routing.
//!
//! A recognizer belongs to the store, targets one node, and handles one
//! [`GestureClass`]. Input reaches a node only through an enabled recognizer
//! of the matching class, and only if the node has collision. The manipulation
//! is written to the **target's own local pose**; nothing above it in the tree
//! is touched.

use alloc::vec::Vec;

use super::id::{GestureId, NodeId};
use super::store::SceneStore;
use crate::gesture::{Gesture, GestureClass, GestureClasses};
use crate::pose::Rotation;

#[derive(Clone, Copy, Debug)]
struct Recognizer {
    class: GestureClass,
    target: NodeId,
    enabled: bool,
}

#[derive(Clone, Copy, Debug, Default)]
struct Slot {
    generation: u32,
    live: Option<Recognizer>,
}

/// Recognizer table with slot reuse.
#[derive(Clone, Debug, Default)]
pub(crate) struct Recognizers {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl Recognizers {
    fn insert(&mut self, recognizer: Recognizer) -> GestureId {
        let idx = if let Some(idx) = self.free.pop() {
            idx
        } else {
            self.slots.push(Slot::default());
            #[expect(
                clippy::cast_possible_truncation,
                reason = "recognizer count never approaches u32::MAX"
            )]
            let idx = (self.slots.len() - 1) as u32;
            idx
        };
        let slot = &mut self.slots[idx as usize];
        slot.live = Some(recognizer);
        GestureId {
            idx,
            generation: slot.generation,
        }
    }

    fn get(&self, id: GestureId) -> Option<&Recognizer> {
        self.slots
            .get(id.idx as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.live.as_ref())
    }

    fn get_mut(&mut self, id: GestureId) -> Option<&mut Recognizer> {
        self.slots
            .get_mut(id.idx as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.live.as_mut())
    }

    /// Releases every recognizer whose target is `node`.
    pub(crate) fn release_targeting(&mut self, node: NodeId) {
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.live.is_some_and(|r| r.target == node) {
                slot.live = None;
                slot.generation += 1;
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "slot indices were issued as u32"
                )]
                self.free.push(idx as u32);
            }
        }
    }

    fn live(&self) -> impl Iterator<Item = &Recognizer> {
        self.slots.iter().filter_map(|slot| slot.live.as_ref())
    }
}

impl SceneStore {
    /// Installs one enabled recognizer per class in `classes` on `target`.
    ///
    /// # Panics
    ///
    /// Panics if `target` is stale.
    pub fn install_recognizers(
        &mut self,
        classes: GestureClasses,
        target: NodeId,
    ) -> Vec<GestureId> {
        self.validate(target);
        classes
            .iter()
            .map(|class| {
                self.recognizers.insert(Recognizer {
                    class,
                    target,
                    enabled: true,
                })
            })
            .collect()
    }

    /// Enables or disables a recognizer.
    ///
    /// # Panics
    ///
    /// Panics if the handle has been released.
    pub fn set_recognizer_enabled(&mut self, id: GestureId, enabled: bool) {
        let Some(r) = self.recognizers.get_mut(id) else {
            panic!("stale GestureId: {id:?}");
        };
        r.enabled = enabled;
    }

    /// Returns whether a recognizer is enabled.
    ///
    /// # Panics
    ///
    /// Panics if the handle has been released.
    #[must_use]
    pub fn recognizer_enabled(&self, id: GestureId) -> bool {
        let Some(r) = self.recognizers.get(id) else {
            panic!("stale GestureId: {id:?}");
        };
        r.enabled
    }

    /// Returns whether the handle refers to an installed recognizer.
    #[must_use]
    pub fn is_recognizer_alive(&self, id: GestureId) -> bool {
        self.recognizers.get(id).is_some()
    }

    /// Returns the number of installed recognizers.
    #[must_use]
    pub fn recognizer_count(&self) -> usize {
        self.recognizers.live().count()
    }

    /// Delivers one step of manipulation input aimed at `target`.
    ///
    /// Returns `true` if an enabled recognizer of the matching class accepted
    /// it and `target`'s local pose was updated. Input aimed at a node without
    /// collision, or with only disabled recognizers, is rejected.
    ///
    /// # Panics
    ///
    /// Panics if `target` is stale.
    pub fn apply_gesture(&mut self, target: NodeId, gesture: Gesture) -> bool {
        self.validate(target);
        if !self.collision[target.idx as usize] {
            return false;
        }
        let class = gesture.class();
        let accepted = self
            .recognizers
            .live()
            .any(|r| r.enabled && r.class == class && r.target == target);
        if !accepted {
            return false;
        }

        let mut pose = self.local_pose[target.idx as usize];
        match gesture {
            Gesture::Pan { delta } => {
                for (t, d) in pose.translation.iter_mut().zip(delta) {
                    *t += d;
                }
            }
            Gesture::Twist { radians } => {
                pose.rotation =
                    (Rotation::from_axis_angle(Rotation::Y_AXIS, radians) * pose.rotation)
                        .normalized();
            }
            Gesture::Pinch { factor } => {
                if !(factor.is_finite() && factor > 0.0) {
                    return false;
                }
                for s in &mut pose.scale {
                    *s *= factor;
                }
            }
        }
        self.set_pose(target, pose);
        true
    }
}
