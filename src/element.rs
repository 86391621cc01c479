//! The content that can be flowed onto pages.
//!
//! Elements are plain values: build them, hand them to
//! [`Paginator::place`](crate::Paginator::place), and reuse them as often as
//! you like. The paginator never modifies them.

use crate::colour::{colours, Colour};
use crate::image::ImageHandle;
use crate::layout::Align;
use crate::units::Pt;

/// Anything that can be placed on a page
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Paragraph(Paragraph),
    Image(ImageBlock),
    Line(Rule),
}

impl Element {
    /// A short name for the kind of element, used in logs and errors
    pub fn kind(&self) -> &'static str {
        match self {
            Element::Paragraph(_) => "paragraph",
            Element::Image(_) => "image",
            Element::Line(_) => "line",
        }
    }
}

impl From<Paragraph> for Element {
    fn from(paragraph: Paragraph) -> Self {
        Element::Paragraph(paragraph)
    }
}

impl From<ImageBlock> for Element {
    fn from(image: ImageBlock) -> Self {
        Element::Image(image)
    }
}

impl From<Rule> for Element {
    fn from(rule: Rule) -> Self {
        Element::Line(rule)
    }
}

/// A block of text, wrapped to the width of the content area
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: String,
    /// Index of a font registered with the document
    pub font: usize,
    pub size: Pt,
    pub align: Align,
    pub colour: Colour,
}

impl Paragraph {
    /// 11pt black text, aligned to the start of the line
    pub fn new<S: ToString>(text: S, font: usize) -> Paragraph {
        Paragraph {
            text: text.to_string(),
            font,
            size: Pt(11.0),
            align: Align::Start,
            colour: colours::BLACK,
        }
    }

    pub fn with_size<D: Into<Pt>>(mut self, size: D) -> Self {
        self.size = size.into();
        self
    }

    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn with_colour(mut self, colour: Colour) -> Self {
        self.colour = colour;
        self
    }
}

/// An image, drawn at a given size. Its height is also the vertical space it
/// reserves on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlock {
    pub image: ImageHandle,
    pub width: Pt,
    pub height: Pt,
    pub align: Align,
    /// 0 is invisible, 100 fully opaque; larger values count as 100
    pub opacity: u8,
}

impl ImageBlock {
    /// The image at its natural size, centred and fully opaque
    pub fn new(image: ImageHandle) -> ImageBlock {
        ImageBlock {
            image,
            width: image.natural_width(),
            height: image.natural_height(),
            align: Align::Center,
            opacity: 100,
        }
    }

    pub fn with_size<D: Into<Pt>>(mut self, width: D, height: D) -> Self {
        self.width = width.into();
        self.height = height.into();
        self
    }

    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Set the opacity as a percentage
    pub fn with_opacity(mut self, percent: u8) -> Self {
        self.opacity = percent;
        self
    }

    /// The opacity converted to an alpha byte
    pub fn alpha(&self) -> u8 {
        let percent = self.opacity.min(100) as f32;
        (percent / 100.0 * u8::MAX as f32) as u8
    }
}

/// A horizontal rule spanning the content area. Its stroke width is also the
/// vertical space it reserves.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub width: Pt,
    pub colour: Colour,
}

impl Default for Rule {
    fn default() -> Self {
        Rule {
            width: Pt(1.0),
            colour: colours::BLACK,
        }
    }
}

impl Rule {
    pub fn new<D: Into<Pt>>(width: D) -> Rule {
        Rule {
            width: width.into(),
            ..Rule::default()
        }
    }

    pub fn with_colour(mut self, colour: Colour) -> Self {
        self.colour = colour;
        self
    }
}
