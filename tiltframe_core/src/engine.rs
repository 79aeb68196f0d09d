// Copyright 2026 the Tiltframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator contracts at the edge of the core.
//!
//! The core never talks to a renderer, tracker, or image codec directly. It
//! consumes three seams:
//!
//! - **[`Engine`]**: scene-graph primitives (anchors, nodes, models,
//!   transforms, materials, collision, gesture recognizers). The in-memory
//!   [`SceneStore`] implements it; a platform engine provides its own.
//!
//! - **[`ImageSource`]**: the selected image: an identity handle and a
//!   fallible decode into a [`Texture`].
//!
//! - **[`Presenter`]**: applies evaluated [`SceneChanges`] from a
//!   [`SceneStore`] to a platform-native tree, so frame loops and test doubles
//!   can be written once.
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! fn on_state_change(state: &OverlayState<PickedImage>) {
//!     // Bind: rebuild or patch the tracked visual for this state
//!     let outcome = binding.reconcile(&mut scene, state, &mut tracer);
//!
//!     // Evaluate: drain dirty channels, recompute world transforms
//!     let changes = scene.evaluate();
//!
//!     // Present: push incremental changes to the native tree
//!     presenter.apply(&scene, &changes);
//! }
//! ```
//!
//! [`SceneStore`]: crate::scene::SceneStore
//! [`SceneChanges`]: crate::scene::SceneChanges

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::error::DecodeError;
use crate::gesture::GestureClasses;
use crate::material::{Material, Mesh, Texture};
use crate::pose::Pose;
use crate::scene::{SceneChanges, SceneStore};

/// Which kind of detected real-world surface an anchor tracks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    /// A floor or table top.
    #[default]
    Horizontal,
    /// A wall.
    Vertical,
}

/// Scene-graph primitives the binding layer builds with.
///
/// Node and gesture handles are engine-defined and cheap to copy. Every
/// operation is treated as infallible; engines are expected to panic on
/// handles they did not issue.
pub trait Engine {
    /// Handle to a scene node.
    type Node: Copy + Eq + fmt::Debug;
    /// Handle to an installed gesture recognizer.
    type GestureHandle: Copy + Eq + fmt::Debug;

    /// Creates a root node whose pose follows a detected surface.
    fn create_anchor(&mut self, surface: SurfaceKind) -> Self::Node;

    /// Creates an empty grouping node.
    fn create_node(&mut self) -> Self::Node;

    /// Creates a renderable node from a mesh and material.
    fn create_model(&mut self, mesh: Mesh, material: Material) -> Self::Node;

    /// Adds `child` as the last child of `parent`.
    fn attach_child(&mut self, parent: Self::Node, child: Self::Node);

    /// Returns the local pose of `node`.
    fn transform(&self, node: Self::Node) -> Pose;

    /// Replaces the local pose of `node`.
    fn set_transform(&mut self, node: Self::Node, pose: Pose);

    /// Returns the material of a model node.
    fn material(&self, node: Self::Node) -> Option<&Material>;

    /// Replaces the material of a model node.
    fn set_material(&mut self, node: Self::Node, material: Material);

    /// Makes `node` a hit target for gesture recognizers.
    fn generate_collision(&mut self, node: Self::Node);

    /// Installs one recognizer per class in `classes`, all targeting `node`.
    /// Recognizers start enabled.
    fn install_gestures(
        &mut self,
        classes: GestureClasses,
        node: Self::Node,
    ) -> Vec<Self::GestureHandle>;

    /// Enables or disables a recognizer. Disabled recognizers reject input.
    fn set_gesture_enabled(&mut self, handle: Self::GestureHandle, enabled: bool);

    /// Returns whether a recognizer is enabled.
    fn gesture_enabled(&self, handle: Self::GestureHandle) -> bool;

    /// Destroys every anchor, its subtree, and every recognizer targeting a
    /// destroyed node.
    fn remove_all_anchors(&mut self);
}

/// An opaque image identity.
///
/// Two handles compare equal only if they came from the same selection;
/// identical pixel content does not make two images the same.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageId(pub u64);

impl fmt::Debug for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageId({})", self.0)
    }
}

/// A user-selected image.
pub trait ImageSource {
    /// Returns the identity of this selection.
    fn identity(&self) -> ImageId;

    /// Decodes the image into an uploadable texture.
    fn decode(&self) -> Result<Texture, DecodeError>;
}

impl<T: ImageSource + ?Sized> ImageSource for &T {
    fn identity(&self) -> ImageId {
        (**self).identity()
    }

    fn decode(&self) -> Result<Texture, DecodeError> {
        (**self).decode()
    }
}

impl<T: ImageSource + ?Sized> ImageSource for Arc<T> {
    fn identity(&self) -> ImageId {
        (**self).identity()
    }

    fn decode(&self) -> Result<Texture, DecodeError> {
        (**self).decode()
    }
}

/// Applies evaluated scene changes to a platform-native presentation tree.
pub trait Presenter {
    /// Applies the given [`SceneChanges`] to the backing tree, reading current
    /// property values from `scene` as needed.
    fn apply(&mut self, scene: &SceneStore, changes: &SceneChanges);
}
