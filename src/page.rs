use crate::colour::Colour;
use crate::content::render_contents;
use crate::font::Font;
use crate::image::Image;
use crate::layout::Margins;
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::transform::Transform;
use crate::units::*;
use crate::PDFError;
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Name, Pdf};
use std::collections::BTreeSet;

/// A font selection: which font in the document, at what size
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct SpanFont {
    pub index: usize,
    pub size: Pt,
}

/// A run of text drawn on a single baseline
#[derive(Clone, PartialEq, Debug)]
pub struct SpanLayout {
    pub text: String,
    pub font: SpanFont,
    pub colour: Colour,
    /// Start of the baseline, in PDF coordinates
    pub coords: (Pt, Pt),
}

/// An image painted through a transform mapping the unit square onto the page
#[derive(Clone, PartialEq, Debug)]
pub struct ImageLayout {
    pub image: Id<Image>,
    pub transform: Transform,
    /// 255 is fully opaque
    pub alpha: u8,
}

/// A straight stroked line, in PDF coordinates
#[derive(Clone, PartialEq, Debug)]
pub struct LineLayout {
    pub from: (Pt, Pt),
    pub to: (Pt, Pt),
    pub width: Pt,
    pub colour: Colour,
}

/// A filled rectangle
#[derive(Clone, PartialEq, Debug)]
pub struct FillLayout {
    pub rect: Rect,
    pub colour: Colour,
}

/// Everything that can be drawn on a page. Each item is rendered in its own
/// saved graphics state, so colours, line widths, transforms and opacity set by
/// one item never apply to the next.
#[derive(Clone, PartialEq, Debug)]
pub enum PageContents {
    Fill(FillLayout),
    Text(Vec<SpanLayout>),
    Image(ImageLayout),
    Line(LineLayout),
}

/// A single page: its size, where content is expected to go, and what has
/// been drawn on it so far
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// The size of the page
    pub media_box: Rect,
    /// Where content can live, i.e. within the margins
    pub content_box: Rect,
    /// Drawn items, in painting order
    pub contents: Vec<PageContents>,
}

impl Page {
    pub fn new(size: (Pt, Pt), margins: Option<Margins>) -> Page {
        let (width, height) = size;
        let margins = margins.unwrap_or_else(Margins::empty);
        Page {
            media_box: Rect {
                x1: Pt(0.0),
                y1: Pt(0.0),
                x2: width,
                y2: height,
            },
            content_box: Rect {
                x1: margins.left,
                y1: margins.bottom,
                x2: width - margins.right,
                y2: height - margins.top,
            },
            contents: Vec::default(),
        }
    }

    pub fn width(&self) -> Pt {
        self.media_box.width()
    }

    pub fn height(&self) -> Pt {
        self.media_box.height()
    }

    /// Paint the whole page with a single colour
    pub fn fill_background(&mut self, colour: Colour) {
        self.contents.push(PageContents::Fill(FillLayout {
            rect: self.media_box,
            colour,
        }));
    }

    pub fn add_span(&mut self, span: SpanLayout) {
        self.contents.push(PageContents::Text(vec![span]));
    }

    /// Add several spans that share a single graphics state
    pub fn add_spans(&mut self, spans: Vec<SpanLayout>) {
        if !spans.is_empty() {
            self.contents.push(PageContents::Text(spans));
        }
    }

    pub fn add_image(&mut self, image: ImageLayout) {
        self.contents.push(PageContents::Image(image));
    }

    pub fn add_line(&mut self, line: LineLayout) {
        self.contents.push(PageContents::Line(line));
    }

    /// The translucent alpha values used on this page
    pub(crate) fn opacities(&self) -> BTreeSet<u8> {
        self.contents
            .iter()
            .filter_map(|c| match c {
                PageContents::Image(image) if image.alpha < u8::MAX => Some(image.alpha),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn write(
        &self,
        refs: &mut ObjectReferences,
        page_index: usize,
        fonts: &[Font],
        images: &Arena<Image>,
        writer: &mut Pdf,
    ) -> Result<(), PDFError> {
        let rendered = render_contents(&self.contents, fonts)?;

        let id = refs
            .get(RefType::Page(page_index))
            .ok_or(PDFError::PageMissing(page_index))?;
        let parent = refs
            .get(RefType::PageTree)
            .ok_or(PDFError::PageMissing(page_index))?;
        let content_id = refs.gen(RefType::ContentForPage(page_index));

        let mut page = writer.page(id);
        page.media_box(self.media_box.into());
        page.art_box(self.content_box.into());
        page.parent(parent);

        let mut resources = page.resources();
        let mut resource_fonts = resources.fonts();
        for i in 0..fonts.len() {
            if let Some(font_ref) = refs.get(RefType::Font(i)) {
                resource_fonts.pair(Name(format!("F{i}").as_bytes()), font_ref);
            }
        }
        resource_fonts.finish();

        let mut resource_xobjects = resources.x_objects();
        for (id, _) in images.iter() {
            if let Some(image_ref) = refs.get(RefType::Image(id.index())) {
                resource_xobjects.pair(Name(format!("I{}", id.index()).as_bytes()), image_ref);
            }
        }
        resource_xobjects.finish();

        let mut resource_states = resources.ext_g_states();
        for alpha in self.opacities() {
            if let Some(state_ref) = refs.get(RefType::Opacity(alpha)) {
                resource_states.pair(Name(format!("A{alpha}").as_bytes()), state_ref);
            }
        }
        resource_states.finish();
        resources.finish();

        page.contents(content_id);
        page.finish();

        writer.stream(content_id, rendered.as_slice());
        Ok(())
    }
}
