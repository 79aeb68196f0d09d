// Copyright 2026 the Tiltframe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Direct-manipulation gesture classes and input.

/// A kind of manipulation recognizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureClass {
    /// One-finger drag; moves the target across the anchor plane.
    Translation,
    /// Two-finger twist; spins the target about its up axis.
    Rotation,
    /// Pinch; scales the target uniformly.
    Scale,
}

impl GestureClass {
    const fn bit(self) -> u8 {
        match self {
            Self::Translation => 1 << 0,
            Self::Rotation => 1 << 1,
            Self::Scale => 1 << 2,
        }
    }
}

/// A set of [`GestureClass`]es.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GestureClasses(u8);

impl GestureClasses {
    /// No gestures.
    pub const NONE: Self = Self(0);

    /// Translation, rotation, and scale.
    pub const ALL: Self = Self(0b111);

    /// Returns the set with `class` added.
    #[must_use]
    pub const fn with(self, class: GestureClass) -> Self {
        Self(self.0 | class.bit())
    }

    /// Returns true if `class` is in the set.
    #[must_use]
    pub const fn contains(self, class: GestureClass) -> bool {
        self.0 & class.bit() != 0
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates over the classes in the set, in declaration order.
    pub fn iter(self) -> impl Iterator<Item = GestureClass> {
        [
            GestureClass::Translation,
            GestureClass::Rotation,
            GestureClass::Scale,
        ]
        .into_iter()
        .filter(move |c| self.contains(*c))
    }
}

impl From<GestureClass> for GestureClasses {
    fn from(class: GestureClass) -> Self {
        Self::NONE.with(class)
    }
}

/// One step of manipulation input, as delivered by an engine's recognizers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    /// Move by `delta` metres in the target's parent space.
    Pan {
        /// Translation delta.
        delta: [f64; 3],
    },
    /// Spin by `radians` about the target's up axis.
    Twist {
        /// Rotation delta.
        radians: f64,
    },
    /// Scale uniformly by `factor`.
    Pinch {
        /// Multiplicative scale delta; must be positive.
        factor: f64,
    },
}

impl Gesture {
    /// Returns the recognizer class that produces this input.
    #[must_use]
    pub const fn class(&self) -> GestureClass {
        match self {
            Self::Pan { .. } => GestureClass::Translation,
            Self::Twist { .. } => GestureClass::Rotation,
            Self::Pinch { .. } => GestureClass::Scale,
        }
    }
}
