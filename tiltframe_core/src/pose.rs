// Copyright 2026 the Tiltframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node poses: translation, rotation, and scale.
//!
//! A [`Pose`] is what an engine calls a node's local "transform". The tilt
//! path only ever replaces [`Pose::rotation`]; gestures write all three fields
//! of the node they are installed on.

use core::ops::Mul;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::transform::Transform3d;

/// A unit quaternion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotation {
    /// Vector part, X.
    pub x: f64,
    /// Vector part, Y.
    pub y: f64,
    /// Vector part, Z.
    pub z: f64,
    /// Scalar part.
    pub w: f64,
}

impl Rotation {
    /// The identity rotation.
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// The X axis.
    pub const X_AXIS: [f64; 3] = [1.0, 0.0, 0.0];

    /// The Y axis (up, for a horizontal anchor).
    pub const Y_AXIS: [f64; 3] = [0.0, 1.0, 0.0];

    /// Creates a rotation of `radians` about `axis`.
    ///
    /// The axis is normalized; a zero axis yields the identity.
    #[must_use]
    pub fn from_axis_angle(axis: [f64; 3], radians: f64) -> Self {
        let len = (axis[0] * axis[0] + axis[1] * axis[1] + axis[2] * axis[2]).sqrt();
        if len == 0.0 || !len.is_finite() {
            return Self::IDENTITY;
        }
        let half = radians * 0.5;
        let s = half.sin() / len;
        Self {
            x: axis[0] * s,
            y: axis[1] * s,
            z: axis[2] * s,
            w: half.cos(),
        }
    }

    /// Creates a rotation of `radians` about the X axis.
    #[must_use]
    pub fn about_x(radians: f64) -> Self {
        Self::from_axis_angle(Self::X_AXIS, radians)
    }

    /// Returns the rotation angle in `[0, 2π]`.
    #[must_use]
    pub fn angle(self) -> f64 {
        let v = (self.x * self.x + self.y * self.y + self.z * self.z).sqrt();
        2.0 * v.atan2(self.w)
    }

    /// Returns the inverse rotation.
    #[must_use]
    pub const fn conjugate(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: self.w,
        }
    }

    /// Rotates a vector.
    #[must_use]
    pub fn rotate(self, v: [f64; 3]) -> [f64; 3] {
        let p = Self {
            x: v[0],
            y: v[1],
            z: v[2],
            w: 0.0,
        };
        let r = self * p * self.conjugate();
        [r.x, r.y, r.z]
    }

    /// Returns this rotation rescaled to unit length.
    #[must_use]
    pub fn normalized(self) -> Self {
        let n = (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt();
        if n == 0.0 || !n.is_finite() {
            return Self::IDENTITY;
        }
        Self {
            x: self.x / n,
            y: self.y / n,
            z: self.z / n,
            w: self.w / n,
        }
    }

    /// Returns true if both quaternions describe the same rotation within
    /// `eps` per component (`q` and `-q` are the same rotation).
    #[must_use]
    pub fn approx_eq(self, other: Self, eps: f64) -> bool {
        let close = |a: Self, b: Self| {
            (a.x - b.x).abs() <= eps
                && (a.y - b.y).abs() <= eps
                && (a.z - b.z).abs() <= eps
                && (a.w - b.w).abs() <= eps
        };
        let neg = Self {
            x: -other.x,
            y: -other.y,
            z: -other.z,
            w: -other.w,
        };
        close(self, other) || close(self, neg)
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Rotation {
    type Output = Self;

    /// Hamilton product: `self * rhs` applies `rhs` first.
    fn mul(self, rhs: Self) -> Self {
        let (a, b) = (self, rhs);
        Self {
            w: a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
            x: a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            y: a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            z: a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
        }
    }
}

/// Translation, rotation, and scale of a node relative to its parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// Offset from the parent origin, in metres.
    pub translation: [f64; 3],
    /// Orientation relative to the parent.
    pub rotation: Rotation,
    /// Per-axis scale factor.
    pub scale: [f64; 3],
}

impl Pose {
    /// The identity pose.
    pub const IDENTITY: Self = Self {
        translation: [0.0; 3],
        rotation: Rotation::IDENTITY,
        scale: [1.0; 3],
    };

    /// Returns a copy with `rotation` replaced and the other fields kept.
    #[must_use]
    pub const fn with_rotation(self, rotation: Rotation) -> Self {
        Self { rotation, ..self }
    }

    /// Returns the matrix `T * R * S`.
    #[must_use]
    pub fn to_matrix(&self) -> Transform3d {
        let [tx, ty, tz] = self.translation;
        let [sx, sy, sz] = self.scale;
        Transform3d::from_translation(tx, ty, tz)
            * Transform3d::from_rotation(self.rotation)
            * Transform3d::from_scale(sx, sy, sz)
    }

    /// Returns true if every field is within `eps` of `other`'s.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        let near = |a: [f64; 3], b: [f64; 3]| a.iter().zip(b).all(|(x, y)| (x - y).abs() <= eps);
        near(self.translation, other.translation)
            && near(self.scale, other.scale)
            && self.rotation.approx_eq(other.rotation, eps)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}
