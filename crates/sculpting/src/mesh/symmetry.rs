//! Mirror symmetry flags and the passes they produce.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Mirror axes enabled on a mesh (X = 1, Y = 2, Z = 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SymmetryFlags(u8);

impl SymmetryFlags {
    pub const NONE: Self = Self(0);
    pub const X: Self = Self(1);
    pub const Y: Self = Self(2);
    pub const Z: Self = Self(4);

    /// Build flags from raw bits; bits above Z are dropped.
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & 0b111)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Whether the mirror combination `pass` is evaluated for these flags.
    ///
    /// Pass 0 is the identity and always valid. Other passes must only use
    /// enabled axes, and the XZ and YZ configurations skip the mixed
    /// passes that would duplicate work.
    pub fn is_pass_valid(self, pass: u8) -> bool {
        let symm = self.0;
        pass == 0
            || (symm & pass != 0
                && (symm != 5 || pass != 3)
                && (symm != 6 || (pass != 3 && pass != 5)))
    }

    /// Valid mirror passes, identity first.
    pub fn passes(self) -> impl Iterator<Item = u8> {
        (0..=self.0).filter(move |&pass| self.is_pass_valid(pass))
    }
}

/// Mirror a point through the axes set in `pass`.
pub fn flip(point: Vec3, pass: u8) -> Vec3 {
    let mut flipped = point;
    if pass & 1 != 0 {
        flipped.x = -flipped.x;
    }
    if pass & 2 != 0 {
        flipped.y = -flipped.y;
    }
    if pass & 4 != 0 {
        flipped.z = -flipped.z;
    }
    flipped
}
