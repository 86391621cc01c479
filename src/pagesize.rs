//! Named paper formats.
//!
//! All named sizes are provided in portrait orientation, in whole points, except
//! for [`PageSize::UsLedger`] which is landscape by definition. Use the
//! [`PageOrientation`] trait to flip a resolved `(width, height)` pair.
//!
//! # Example
//!
//! ```
//! use pdf_flow::pagesize::{PageOrientation, PageSize};
//! use pdf_flow::Pt;
//!
//! let (width, height) = PageSize::UsLetter.dimensions();
//! assert_eq!((width, height), (Pt(612.0), Pt(792.0)));
//!
//! let landscape = PageSize::A4.dimensions().landscape();
//! assert_eq!(landscape, (Pt(842.0), Pt(595.0)));
//! ```

use crate::units::*;

/// A page format. Named variants carry the usual dimensions of that format;
/// [`PageSize::Custom`] allows anything else.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub enum PageSize {
    A0,
    A1,
    A2,
    A3,
    #[default]
    A4,
    B0,
    B1,
    B2,
    B3,
    B4,
    C0,
    C1,
    C2,
    C3,
    C4,
    UsLetter,
    UsLegal,
    UsLedger,
    /// An arbitrary (width, height)
    Custom(Pt, Pt),
}

impl PageSize {
    /// The (width, height) of the format, in points
    pub fn dimensions(self) -> (Pt, Pt) {
        let (w, h) = match self {
            PageSize::A0 => (2384.0, 3370.0),
            PageSize::A1 => (1684.0, 2384.0),
            PageSize::A2 => (1190.0, 1684.0),
            PageSize::A3 => (842.0, 1190.0),
            PageSize::A4 => (595.0, 842.0),
            PageSize::B0 => (2835.0, 4008.0),
            PageSize::B1 => (2004.0, 2835.0),
            PageSize::B2 => (1417.0, 2004.0),
            PageSize::B3 => (1001.0, 1417.0),
            PageSize::B4 => (709.0, 1001.0),
            PageSize::C0 => (2599.0, 3676.0),
            PageSize::C1 => (1837.0, 2599.0),
            PageSize::C2 => (1297.0, 1837.0),
            PageSize::C3 => (918.0, 1297.0),
            PageSize::C4 => (649.0, 918.0),
            PageSize::UsLetter => (612.0, 792.0),
            PageSize::UsLegal => (612.0, 1008.0),
            PageSize::UsLedger => (1224.0, 792.0),
            PageSize::Custom(w, h) => return (w, h),
        };
        (Pt(w), Pt(h))
    }

    pub fn width(self) -> Pt {
        self.dimensions().0
    }

    pub fn height(self) -> Pt {
        self.dimensions().1
    }
}

/// Convert page sizes between portrait and landscape orientations.
pub trait PageOrientation {
    /// Returns the size in portrait orientation (width ≤ height).
    fn portrait(self) -> Self;
    /// Returns the size in landscape orientation (width ≥ height).
    fn landscape(self) -> Self;
}

impl PageOrientation for (Pt, Pt) {
    fn portrait(self) -> Self {
        if self.0 <= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }

    fn landscape(self) -> Self {
        if self.0 >= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }
}
