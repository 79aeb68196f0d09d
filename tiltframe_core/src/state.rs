// Copyright 2026 the Tiltframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Control state owned by the UI layer and overlay configuration.
//!
//! The UI owns [`OverlayState`] and hands a reference to
//! [`SceneBinding::reconcile`](crate::binding::SceneBinding::reconcile)
//! whenever any field changes. [`OverlayConfig`] is fixed for the lifetime of a
//! binding.

use core::f64::consts::FRAC_PI_2;
use core::ops::RangeInclusive;

use kurbo::Size;

use crate::engine::SurfaceKind;
use crate::gesture::GestureClasses;
use crate::material::Mesh;

/// Slider and flag values, plus the current selection.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayState<I> {
    /// The selected image, if any.
    pub selected_image: Option<I>,
    /// Overlay opacity in `[0, 1]`.
    pub opacity: f32,
    /// Tilt about the X axis in radians, in the config's tilt range.
    pub tilt_angle: f64,
    /// Whether the overlay's pose is frozen.
    pub locked: bool,
}

impl<I> Default for OverlayState<I> {
    fn default() -> Self {
        Self {
            selected_image: None,
            opacity: 1.0,
            tilt_angle: 0.0,
            locked: false,
        }
    }
}

impl<I> OverlayState<I> {
    /// Creates the initial state: fully opaque, upright, unlocked, no image.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state with `opacity` and `tilt_angle` clamped into range.
    ///
    /// NaN values clamp to the bottom of their range.
    #[must_use]
    pub fn clamped(mut self, config: &OverlayConfig) -> Self {
        self.opacity = config.clamp_opacity(self.opacity);
        self.tilt_angle = config.clamp_tilt(self.tilt_angle);
        self
    }

    /// Flips the lock flag.
    pub fn toggle_lock(&mut self) {
        self.locked = !self.locked;
    }

    /// Whether the opacity/tilt/lock panel should be shown.
    #[must_use]
    pub fn controls_visible(&self) -> bool {
        self.selected_image.is_some()
    }

    /// Whether the tilt slider accepts input. Tilt edits are frozen out while
    /// locked.
    #[must_use]
    pub fn tilt_control_enabled(&self) -> bool {
        !self.locked
    }

    /// Label for the lock button.
    #[must_use]
    pub fn lock_label(&self) -> &'static str {
        if self.locked { "Locked" } else { "Lock" }
    }
}

/// Fixed parameters of an overlay binding.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayConfig {
    /// Size of the image quad, in metres.
    pub plane_size: Size,
    /// Surface the anchor attaches to.
    pub surface: SurfaceKind,
    /// Manipulation gestures installed on the visual node.
    pub gestures: GestureClasses,
    /// Allowed tilt angles, in radians.
    pub tilt_range: RangeInclusive<f64>,
}

impl OverlayConfig {
    /// A 30 cm quad standing on a table or floor, with every gesture.
    #[must_use]
    pub const fn tabletop() -> Self {
        Self {
            plane_size: Size::new(0.3, 0.3),
            surface: SurfaceKind::Horizontal,
            gestures: GestureClasses::ALL,
            tilt_range: 0.0..=FRAC_PI_2,
        }
    }

    /// A 30 cm quad hung on a wall, with every gesture.
    #[must_use]
    pub const fn wall() -> Self {
        Self {
            surface: SurfaceKind::Vertical,
            ..Self::tabletop()
        }
    }

    /// Pins an opacity slider value into `[0, 1]`. NaN maps to `0`.
    #[must_use]
    pub fn clamp_opacity(&self, opacity: f32) -> f32 {
        if opacity.is_nan() {
            0.0
        } else {
            opacity.clamp(0.0, 1.0)
        }
    }

    /// Pins a tilt slider value into [`tilt_range`](Self::tilt_range). NaN
    /// maps to the start of the range.
    ///
    /// An inverted range (`start > end`) pins every value to `end`.
    #[must_use]
    pub fn clamp_tilt(&self, tilt_angle: f64) -> f64 {
        let (lo, hi) = (*self.tilt_range.start(), *self.tilt_range.end());
        if tilt_angle.is_nan() {
            lo
        } else {
            tilt_angle.max(lo).min(hi)
        }
    }

    /// The quad mesh for this configuration.
    #[must_use]
    pub const fn mesh(&self) -> Mesh {
        Mesh::Plane(self.plane_size)
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self::tabletop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_matches_controls() {
        let state = OverlayState::<()>::new();
        assert_eq!(state.opacity, 1.0);
        assert_eq!(state.tilt_angle, 0.0);
        assert!(!state.locked);
        assert!(!state.controls_visible());
    }

    #[test]
    fn clamped_pins_sliders_into_range() {
        let config = OverlayConfig::default();
        let state = OverlayState::<()> {
            opacity: 1.7,
            tilt_angle: 4.0,
            ..OverlayState::new()
        }
        .clamped(&config);
        assert_eq!(state.opacity, 1.0);
        assert_eq!(state.tilt_angle, FRAC_PI_2);

        let state = OverlayState::<()> {
            opacity: f32::NAN,
            tilt_angle: f64::NAN,
            ..OverlayState::new()
        }
        .clamped(&config);
        assert_eq!(state.opacity, 0.0);
        assert_eq!(state.tilt_angle, 0.0);
    }

    #[test]
    fn inverted_tilt_range_does_not_panic() {
        let config = OverlayConfig {
            tilt_range: FRAC_PI_2..=0.0,
            ..OverlayConfig::tabletop()
        };
        assert_eq!(config.clamp_tilt(1.0), 0.0);
        assert_eq!(config.clamp_tilt(-1.0), 0.0);
        assert_eq!(config.clamp_tilt(f64::NAN), FRAC_PI_2);

        let config = OverlayConfig {
            tilt_range: f64::NAN..=f64::NAN,
            ..OverlayConfig::tabletop()
        };
        assert_eq!(config.clamp_tilt(0.5), 0.5);
    }

    #[test]
    fn lock_toggles_label_and_tilt_control() {
        let mut state = OverlayState::<()>::new();
        assert_eq!(state.lock_label(), "Lock");
        assert!(state.tilt_control_enabled());
        state.toggle_lock();
        assert_eq!(state.lock_label(), "Locked");
        assert!(!state.tilt_control_enabled());
    }

    #[test]
    fn wall_preset_only_changes_surface() {
        let wall = OverlayConfig::wall();
        let table = OverlayConfig::tabletop();
        assert_eq!(wall.surface, SurfaceKind::Vertical);
        assert_eq!(wall.plane_size, table.plane_size);
        assert_eq!(wall.mesh(), Mesh::plane(0.3, 0.3));
    }
}
