//! Flow paragraphs, images and rules down fixed-size pages, breaking onto new
//! pages as they fill up, and write the result out as a PDF.
//!
//! ```no_run
//! use pdf_flow::layout::Margins;
//! use pdf_flow::pagesize::PageSize;
//! use pdf_flow::{Font, Paginator, PaginatorConfig, Paragraph, Pt, Rule};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PaginatorConfig {
//!     page_size: PageSize::UsLetter,
//!     margins: Margins::all(Pt(50.0)),
//!     ..PaginatorConfig::default()
//! };
//! let mut paginator = Paginator::create(config, "report.pdf")?;
//! let font = paginator.add_font(Font::load(std::fs::read("Roboto-Regular.ttf")?)?);
//!
//! paginator.place(&Paragraph::new("Quarterly report", font).with_size(Pt(24.0)).into())?;
//! paginator.place(&Rule::new(Pt(2.0)).into())?;
//! let pages = paginator.generate()?;
//! println!("wrote {pages} pages");
//! # Ok(())
//! # }
//! ```

mod colour;
pub use colour::*;

mod content;

mod decoration;
pub use decoration::*;

mod document;
pub use document::*;

mod element;
pub use element::*;

mod error;
pub use error::*;

mod font;
pub use font::*;

mod image;
pub use self::image::*;

mod info;
pub use info::*;

/// Page geometry and text measurement
pub mod layout;

mod page;
pub use page::*;

/// Standard paper sizes
pub mod pagesize;

mod paginator;
pub use paginator::*;

mod rect;
pub use rect::*;

pub(crate) mod refs;

mod transform;
pub use transform::*;

mod units;
pub use units::*;

/// Re-export PDF-writer functionality, mostly for custom [pdf_writer::Content] generation
pub use pdf_writer;
