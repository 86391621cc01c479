//! Page geometry and text measurement.
//!
//! [`ContentArea`](crate::layout::ContentArea) resolves a page size and
//! [`Margins`](crate::layout::Margins) into the box elements flow through, and
//! [`TextMeasure`](crate::layout::TextMeasure) wraps paragraphs into
//! [`TextBlock`](crate::layout::TextBlock)s that know their height before they
//! are drawn.
//!
//! # Example
//!
//! ```
//! use pdf_flow::layout::{ContentArea, Margins};
//! use pdf_flow::pagesize::PageSize;
//! use pdf_flow::Pt;
//!
//! let area = ContentArea::resolve(PageSize::UsLetter, &Margins::all(Pt(50.0))).unwrap();
//! assert_eq!(area.content_width, Pt(512.0));
//! assert_eq!(area.bottom, Pt(742.0));
//! ```

mod margins;
mod text;

pub use margins::*;
pub use text::*;
