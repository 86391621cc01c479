//! The placement engine: flows elements down the page and breaks onto new
//! pages when they no longer fit.

use crate::colour::{colours, Colour};
use crate::decoration::Decorations;
use crate::document::{Document, PageSink};
use crate::element::{Element, ImageBlock, Paragraph, Rule};
use crate::error::{ConfigError, PDFError, PaginationError};
use crate::font::Font;
use crate::image::{Image, ImageHandle};
use crate::info::Info;
use crate::layout::{Align, ContentArea, Margins, NaturalWrap, TextMeasure};
use crate::page::{ImageLayout, LineLayout, Page, SpanFont};
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::transform::Transform;
use crate::units::Pt;
use log::{debug, info, trace};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Everything that stays fixed for the lifetime of a [`Paginator`]
pub struct PaginatorConfig {
    pub page_size: PageSize,
    pub margins: Margins,
    /// Painted over the whole of every page before anything else
    pub background: Colour,
    /// Drawn large, rotated and faint on every page
    pub watermark: Option<Image>,
    /// Drawn small in the bottom-right corner of every page
    pub sign: Option<Image>,
    /// Vertical gap added after every element
    pub spacing: Pt,
    pub info: Option<Info>,
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        PaginatorConfig {
            page_size: PageSize::A4,
            margins: Margins::empty(),
            background: colours::WHITE,
            watermark: None,
            sign: None,
            spacing: Pt(5.0),
            info: None,
        }
    }
}

/// Places elements one after another down the content area of a page, opening
/// a new page whenever the next element would run past the bottom margin.
/// Elements are never split across pages.
///
/// A paginator is single use: [`Paginator::generate`] consumes it, so it can't
/// be written out twice.
///
/// ```compile_fail
/// use pdf_flow::{Paginator, PaginatorConfig};
///
/// let mut out = Vec::new();
/// let paginator = Paginator::new(PaginatorConfig::default(), &mut out).unwrap();
/// paginator.generate().unwrap();
/// paginator.generate().unwrap();
/// ```
pub struct Paginator<W: Write, S: PageSink = Document, M: TextMeasure = NaturalWrap> {
    sink: S,
    measurer: M,
    output: W,
    area: ContentArea,
    margins: Margins,
    background: Colour,
    decorations: Decorations,
    spacing: Pt,
    page: Page,
    page_count: usize,
    offset_y: Pt,
    poisoned: bool,
}

impl Paginator<BufWriter<File>> {
    /// Create a paginator that writes the finished PDF to the file at `path`.
    /// The file is created (or truncated) immediately.
    pub fn create<P: AsRef<Path>>(
        config: PaginatorConfig,
        path: P,
    ) -> Result<Self, PaginationError> {
        let file = File::create(path)?;
        Paginator::new(config, BufWriter::new(file))
    }
}

impl<W: Write> Paginator<W> {
    /// Create a paginator that builds a PDF [`Document`] and writes it to
    /// `output` when generated
    pub fn new(config: PaginatorConfig, output: W) -> Result<Self, PaginationError> {
        Paginator::with_parts(config, Document::new(), NaturalWrap, output)
    }
}

impl<W: Write, S: PageSink, M: TextMeasure> Paginator<W, S, M> {
    /// Create a paginator from its collaborators. The configuration is
    /// validated, decoration images are registered with the sink and the first
    /// page is opened.
    pub fn with_parts(
        config: PaginatorConfig,
        mut sink: S,
        measurer: M,
        output: W,
    ) -> Result<Self, PaginationError> {
        let PaginatorConfig {
            page_size,
            margins,
            background,
            watermark,
            sign,
            spacing,
            info,
        } = config;

        let area = ContentArea::resolve(page_size, &margins)?;
        if !spacing.is_finite() || spacing < Pt(0.0) {
            return Err(ConfigError::InvalidSpacing(*spacing).into());
        }

        if let Some(info) = info {
            sink.set_info(info);
        }
        let decorations = Decorations {
            watermark: watermark.map(|image| sink.add_image(image)),
            sign: sign.map(|image| sink.add_image(image)),
        };

        let mut paginator = Paginator {
            sink,
            measurer,
            output,
            area,
            margins,
            background,
            decorations,
            spacing,
            page: Page::new(area.page_size(), None),
            page_count: 0,
            offset_y: area.origin_y,
            poisoned: false,
        };
        paginator.open_page()?;
        Ok(paginator)
    }

    /// Register a font, returning the index paragraphs refer to it by
    pub fn add_font(&mut self, font: Font) -> usize {
        self.sink.add_font(font)
    }

    /// Register an image so it can be placed with an [`ImageBlock`]
    pub fn add_image(&mut self, image: Image) -> ImageHandle {
        self.sink.add_image(image)
    }

    /// Number of pages opened so far, including the current one
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Where the next element will start, measured from the top-left corner
    /// of the page
    pub fn cursor(&self) -> (Pt, Pt) {
        (self.area.origin_x, self.offset_y)
    }

    pub fn content_area(&self) -> &ContentArea {
        &self.area
    }

    /// Place a single element below the previous one, moving to a new page
    /// first if it doesn't fit on the current one.
    ///
    /// Any error leaves the paginator unusable; later calls return
    /// [`PaginationError::Poisoned`].
    pub fn place(&mut self, element: &Element) -> Result<(), PaginationError> {
        if self.poisoned {
            return Err(PaginationError::Poisoned);
        }
        trace!(
            "placing {} at y={} on page {}",
            element.kind(),
            self.offset_y,
            self.page_count
        );

        let placed = match element {
            Element::Paragraph(paragraph) => self.place_paragraph(paragraph),
            Element::Image(image) => self.place_image(image),
            Element::Line(rule) => self.place_rule(rule),
        };
        if placed.is_err() {
            self.poisoned = true;
        }
        placed
    }

    /// Place each element in turn, exactly as repeated calls to
    /// [`Paginator::place`] would. Stops at the first error.
    pub fn place_all<'e, I>(&mut self, elements: I) -> Result<(), PaginationError>
    where
        I: IntoIterator<Item = &'e Element>,
    {
        elements
            .into_iter()
            .try_for_each(|element| self.place(element))
    }

    /// Finish the current page and write the whole document to the output,
    /// returning the number of pages written
    pub fn generate(self) -> Result<usize, PaginationError> {
        let Paginator {
            mut sink,
            output,
            page,
            page_count,
            poisoned,
            ..
        } = self;
        if poisoned {
            return Err(PaginationError::Poisoned);
        }

        debug!("closing page {page_count}");
        sink.finish_page(page);
        sink.write(output).map_err(PaginationError::Serialization)?;
        info!("generated document with {page_count} pages");
        Ok(page_count)
    }

    fn place_paragraph(&mut self, paragraph: &Paragraph) -> Result<(), PaginationError> {
        let font = SpanFont {
            index: paragraph.font,
            size: paragraph.size,
        };
        let block = self
            .measurer
            .measure(
                self.sink.fonts(),
                &paragraph.text,
                font,
                self.area.content_width,
            )
            .map_err(drawing_failed("paragraph"))?;
        let height = checked_length("paragraph height", block.height)
            .map_err(drawing_failed("paragraph"))?;

        self.ensure_room(self.spacing + height)?;
        block.draw(
            &mut self.page,
            (self.area.origin_x, self.offset_y),
            paragraph.align,
            paragraph.colour,
        );
        self.offset_y += self.spacing + height;
        Ok(())
    }

    fn place_image(&mut self, image: &ImageBlock) -> Result<(), PaginationError> {
        let width =
            checked_length("image width", image.width).map_err(drawing_failed("image"))?;
        let footprint =
            checked_length("image height", image.height).map_err(drawing_failed("image"))?;

        // the spacing isn't part of an image's footprint, only of its advance
        self.ensure_room(footprint)?;

        // oversized images are shrunk to fit, but still reserve their full height
        let width = width.min(self.area.content_width);
        let height = footprint.min(self.area.content_height);
        let x = match image.align {
            Align::Start => self.area.origin_x,
            Align::Center => self.area.page_width / 2.0 - width / 2.0,
            Align::End => self.area.end - width,
        };
        let rect = Rect::from_top_left(x, self.offset_y, width, height, self.area.page_height);
        self.page.add_image(ImageLayout {
            image: image.image.id,
            transform: Transform::fit(&rect),
            alpha: image.alpha(),
        });
        self.offset_y += footprint + self.spacing;
        Ok(())
    }

    fn place_rule(&mut self, rule: &Rule) -> Result<(), PaginationError> {
        let footprint =
            checked_length("line width", rule.width).map_err(drawing_failed("line"))?;
        self.ensure_room(self.spacing + footprint)?;

        let y = self.area.page_height - self.offset_y;
        self.page.add_line(LineLayout {
            from: (self.area.origin_x, y),
            to: (self.area.end, y),
            width: rule.width,
            colour: rule.colour,
        });
        self.offset_y += self.spacing + footprint;
        Ok(())
    }

    /// Move to a new page if `footprint` doesn't fit below the cursor
    fn ensure_room(&mut self, footprint: Pt) -> Result<(), PaginationError> {
        if self.offset_y + footprint > self.area.bottom {
            debug!(
                "page {} is full ({} + {} > {})",
                self.page_count, self.offset_y, footprint, self.area.bottom
            );
            self.break_page()?;
        }
        Ok(())
    }

    fn break_page(&mut self) -> Result<(), PaginationError> {
        let finished = std::mem::replace(&mut self.page, Page::new(self.area.page_size(), None));
        debug!("closing page {}", self.page_count);
        self.sink.finish_page(finished);
        self.open_page()
    }

    fn open_page(&mut self) -> Result<(), PaginationError> {
        let number = self.page_count + 1;
        let mut page = self
            .sink
            .start_page(number, self.area.page_size(), &self.margins)
            .map_err(|source| PaginationError::PageCreation {
                page: number,
                source,
            })?;
        page.fill_background(self.background);
        self.decorations.apply(&mut page, &self.area);

        self.page = page;
        self.page_count = number;
        self.offset_y = self.area.origin_y;
        debug!("opened page {number}");
        Ok(())
    }
}

/// Sizes that would throw the cursor off: negative, infinite or NaN
fn checked_length(what: &'static str, value: Pt) -> Result<Pt, PDFError> {
    if value.is_finite() && value >= Pt(0.0) {
        Ok(value)
    } else {
        Err(PDFError::InvalidDimension {
            what,
            value: *value,
        })
    }
}

fn drawing_failed(kind: &'static str) -> impl Fn(PDFError) -> PaginationError {
    move |source| PaginationError::ElementDrawing { kind, source }
}
