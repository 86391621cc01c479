//! 2D transformation matrices for positioning images on a page.

use crate::rect::Rect;
use crate::units::*;
use std::io::Write;

/// An affine transformation matrix in PDF user space, where (0,0) is the
/// bottom-left of the page.
///
/// The matrix is represented as [a, b, c, d, e, f] corresponding to:
/// ```text
/// | a  b  0 |
/// | c  d  0 |
/// | e  f  1 |
/// ```
///
/// Images are painted into the unit square, so the transform used to place an
/// image is always "scale to size, then rotate, then move into place":
///
/// ```
/// use pdf_flow::{Transform, Pt};
///
/// let t = Transform::scale(150.0, 30.0)
///     .then(Transform::rotate(std::f32::consts::FRAC_PI_4))
///     .with_translate(Pt(72.0), Pt(72.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Identity transform (no transformation)
    pub fn identity() -> Self {
        Transform {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Create a translation transform
    pub fn translate(x: Pt, y: Pt) -> Self {
        Transform {
            e: *x,
            f: *y,
            ..Self::identity()
        }
    }

    /// Create a scaling transform
    pub fn scale(sx: f32, sy: f32) -> Self {
        Transform {
            a: sx,
            d: sy,
            ..Self::identity()
        }
    }

    /// Create a counter-clockwise rotation transform (angle in radians)
    pub fn rotate(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Transform {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// The transform mapping the unit square onto `rect`
    pub fn fit(rect: &Rect) -> Self {
        Transform::scale(*rect.width(), *rect.height()).with_translate(rect.x1, rect.y1)
    }

    /// Combine this transform with another; `self` is applied first
    pub fn then(self, other: Transform) -> Self {
        Transform {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Add a translation to this transform
    pub fn with_translate(self, x: Pt, y: Pt) -> Self {
        self.then(Transform::translate(x, y))
    }

    /// Where the point (x, y) lands under this transform
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Write the `cm` operator concatenating this transform onto the current matrix
    #[allow(clippy::write_with_newline)]
    pub(crate) fn write_cm<W: Write>(&self, content: &mut W) -> std::io::Result<()> {
        write!(
            content,
            "{} {} {} {} {} {} cm\n",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }
}
