// Copyright 2026 the Tiltframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON snapshots of the reference scene and the bound visual.
//!
//! [`scene_json`] walks a [`SceneStore`] from its roots in pre-order and
//! describes every live node. [`binding_json`] names the nodes a
//! [`SceneBinding`] tracks. [`export`] writes both, plus optional recorded
//! events, as one pretty-printed JSON object.

use std::io::{self, Write};

use serde_json::{Value, json};

use tiltframe_core::binding::SceneBinding;
use tiltframe_core::engine::SurfaceKind;
use tiltframe_core::material::{Blending, Material};
use tiltframe_core::pose::Pose;
use tiltframe_core::scene::{NodeId, NodeKind, SceneStore};

use crate::recorder::RecordedEvent;

/// Describes every live node in `scene`, parents before children.
#[must_use]
pub fn scene_json(scene: &SceneStore) -> Value {
    let nodes: Vec<Value> = scene
        .roots()
        .into_iter()
        .flat_map(|root| scene.descendants(root))
        .map(|id| node_json(scene, id))
        .collect();
    json!({
        "node_count": scene.node_count(),
        "recognizer_count": scene.recognizer_count(),
        "nodes": nodes,
    })
}

/// Describes the visual tracked by `binding`, or `null` if none is bound.
#[must_use]
pub fn binding_json(binding: &SceneBinding<SceneStore>, scene: &SceneStore) -> Value {
    let Some(tracked) = binding.tracked() else {
        return Value::Null;
    };
    let gestures: Vec<Value> = tracked
        .gesture_handles()
        .iter()
        .map(|&h| {
            json!({
                "index": h.index(),
                "enabled": scene.is_recognizer_alive(h) && scene.recognizer_enabled(h),
            })
        })
        .collect();
    json!({
        "identity": tracked.identity().0,
        "anchor": tracked.anchor().index(),
        "tilt": tracked.tilt().index(),
        "visual": tracked.visual().index(),
        "locked_snapshot": tracked.locked_snapshot().as_ref().map(pose_json),
        "gestures": gestures,
    })
}

/// Describes recorded trace events in order.
#[must_use]
pub fn events_json(events: &[RecordedEvent]) -> Value {
    Value::Array(events.iter().map(event_json).collect())
}

/// Writes a combined snapshot of `scene`, `binding`, and `events` to `writer`.
pub fn export(
    scene: &SceneStore,
    binding: &SceneBinding<SceneStore>,
    events: &[RecordedEvent],
    writer: &mut dyn Write,
) -> io::Result<()> {
    let doc = json!({
        "scene": scene_json(scene),
        "binding": binding_json(binding, scene),
        "events": events_json(events),
    });
    serde_json::to_writer_pretty(writer, &doc)?;
    Ok(())
}

fn node_json(scene: &SceneStore, id: NodeId) -> Value {
    let kind = match scene.kind(id) {
        NodeKind::Anchor(SurfaceKind::Horizontal) => "anchor:horizontal",
        NodeKind::Anchor(SurfaceKind::Vertical) => "anchor:vertical",
        NodeKind::Group => "group",
        NodeKind::Model => "model",
    };
    json!({
        "index": id.index(),
        "generation": id.generation(),
        "kind": kind,
        "parent": scene.parent(id).map(NodeId::index),
        "pose": pose_json(&scene.local_pose(id)),
        "world": scene.world_transform(id).cols,
        "material": scene.material(id).map(material_json),
        "mesh": scene.mesh(id).map(|m| {
            let size = m.size();
            [size.width, size.height]
        }),
        "collision": scene.has_collision(id),
    })
}

fn pose_json(pose: &Pose) -> Value {
    let r = pose.rotation;
    json!({
        "translation": pose.translation,
        "rotation": [r.x, r.y, r.z, r.w],
        "scale": pose.scale,
    })
}

fn material_json(material: &Material) -> Value {
    let blending = match material.blending {
        Blending::Opaque => json!("opaque"),
        Blending::Transparent { opacity_scale } => json!({ "transparent": opacity_scale }),
    };
    json!({
        "texture": [material.texture.width(), material.texture.height()],
        "tint_alpha": material.tint_alpha,
        "blending": blending,
    })
}

fn event_json(event: &RecordedEvent) -> Value {
    let args = match event {
        RecordedEvent::Rebuild(e) => json!({
            "identity": e.identity.0,
            "previous": e.previous.map(|id| id.0),
            "opacity": e.opacity,
            "tilt_angle": e.tilt_angle,
            "locked": e.locked,
        }),
        RecordedEvent::Clear(e) => json!({ "previous": e.previous.map(|id| id.0) }),
        RecordedEvent::Update(e) => json!({
            "identity": e.identity.0,
            "opacity": e.opacity,
            "tilt_angle": e.tilt_angle,
            "locked": e.locked,
        }),
        RecordedEvent::DecodeFailure { identity, error } => json!({
            "identity": identity.0,
            "error": error.to_string(),
        }),
        RecordedEvent::LockCaptured(e) => json!({ "pose": pose_json(&e.pose) }),
        RecordedEvent::LockRestored(e) => json!({
            "pose": pose_json(&e.pose),
            "corrected": e.corrected,
        }),
        RecordedEvent::GesturesGated(e) => json!({
            "enabled": e.enabled,
            "changed": e.changed,
        }),
    };
    json!({ "name": event.name(), "args": args })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiltframe_core::engine::{ImageId, ImageSource};
    use tiltframe_core::error::DecodeError;
    use tiltframe_core::material::Texture;
    use tiltframe_core::state::OverlayState;
    use tiltframe_core::trace::Tracer;

    use crate::recorder::RecorderSink;

    struct Checker;

    impl ImageSource for Checker {
        fn identity(&self) -> ImageId {
            ImageId(42)
        }

        fn decode(&self) -> Result<Texture, DecodeError> {
            Texture::from_rgba8(2, 1, vec![255_u8; 8]).ok_or(DecodeError::Empty)
        }
    }

    fn bound_scene(locked: bool, rec: &mut RecorderSink) -> (SceneStore, SceneBinding<SceneStore>) {
        let mut scene = SceneStore::new();
        let mut binding = SceneBinding::default();
        let state = OverlayState {
            selected_image: Some(Checker),
            opacity: 0.5,
            locked,
            ..OverlayState::new()
        };
        let _ = binding.reconcile(&mut scene, &state, &mut Tracer::new(rec));
        let _ = scene.evaluate();
        (scene, binding)
    }

    #[test]
    fn scene_json_lists_hierarchy_in_pre_order() {
        let mut rec = RecorderSink::new();
        let (scene, _) = bound_scene(false, &mut rec);
        let v = scene_json(&scene);
        assert_eq!(v["node_count"], 3);
        assert_eq!(v["recognizer_count"], 3);
        let nodes = v["nodes"].as_array().unwrap();
        let kinds: Vec<&str> = nodes.iter().map(|n| n["kind"].as_str().unwrap()).collect();
        assert_eq!(kinds, ["anchor:horizontal", "group", "model"]);
        assert_eq!(nodes[2]["parent"], nodes[1]["index"]);
        assert_eq!(nodes[2]["material"]["tint_alpha"], 0.5);
        assert_eq!(nodes[2]["material"]["blending"]["transparent"], 0.5);
        assert_eq!(nodes[2]["collision"], true);
    }

    #[test]
    fn binding_json_reports_lock_state() {
        let mut rec = RecorderSink::new();
        let (scene, binding) = bound_scene(true, &mut rec);
        let v = binding_json(&binding, &scene);
        assert_eq!(v["identity"], 42);
        assert!(v["locked_snapshot"].is_object());
        let gestures = v["gestures"].as_array().unwrap();
        assert_eq!(gestures.len(), 3);
        assert!(gestures.iter().all(|g| g["enabled"] == false));
    }

    #[test]
    fn empty_binding_is_null() {
        let scene = SceneStore::new();
        let binding = SceneBinding::<SceneStore>::default();
        assert!(binding_json(&binding, &scene).is_null());
    }

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        let (scene, binding) = bound_scene(false, &mut rec);
        let mut out = Vec::new();
        export(&scene, &binding, rec.events(), &mut out).unwrap();
        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["events"][0]["name"], "Rebuild");
        assert_eq!(parsed["events"][0]["args"]["identity"], 42);
        assert_eq!(parsed["binding"]["visual"], parsed["scene"]["nodes"][2]["index"]);
    }
}
