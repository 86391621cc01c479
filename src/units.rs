//! Length units used throughout layout.
//!
//! All geometry is ultimately expressed in [`Pt`] (PDF points, 1/72 of an inch).
//! [`In`] and [`Mm`] exist for convenience and convert losslessly into points.

use derive_more::{Add, AddAssign, Deref, Display, From, Into, Sub, SubAssign, Sum};
use std::ops::{Div, Mul};

/// A length in PDF points (1/72 of an inch)
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Sum,
    Deref,
    Display,
    From,
    Into,
)]
pub struct Pt(pub f32);

/// A length in inches
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Display, From)]
pub struct In(pub f32);

/// A length in millimetres
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Display, From)]
pub struct Mm(pub f32);

impl From<In> for Pt {
    fn from(value: In) -> Self {
        Pt(value.0 * 72.0)
    }
}

impl From<Mm> for Pt {
    fn from(value: Mm) -> Self {
        Pt(value.0 * 72.0 / 25.4)
    }
}

impl Mul<f32> for Pt {
    type Output = Pt;

    fn mul(self, rhs: f32) -> Self::Output {
        Pt(self.0 * rhs)
    }
}

impl Mul<Pt> for f32 {
    type Output = Pt;

    fn mul(self, rhs: Pt) -> Self::Output {
        Pt(self * rhs.0)
    }
}

impl Div<f32> for Pt {
    type Output = Pt;

    fn div(self, rhs: f32) -> Self::Output {
        Pt(self.0 / rhs)
    }
}

impl Pt {
    /// The smaller of two lengths
    pub fn min(self, other: Pt) -> Pt {
        Pt(self.0.min(other.0))
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}
