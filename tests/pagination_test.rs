//! Integration tests for page breaking and cursor bookkeeping.

use image::{DynamicImage, RgbaImage};
use pdf_flow::layout::{Margins, TextBlock, TextLine, TextMeasure};
use pdf_flow::pagesize::PageSize;
use pdf_flow::{
    Document, Element, Font, Image, ImageBlock, ImageHandle, PDFError, Page, PageContents,
    PageSink, PaginationError, Paginator, PaginatorConfig, Paragraph, Pt, Rule, SpanFont,
};
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

/// Measures paragraphs whose text is their own height, e.g. "400" is 400pt tall.
/// The block is a single line so it can be found on the page afterwards.
struct FixedHeight;

impl TextMeasure for FixedHeight {
    fn measure(
        &self,
        _fonts: &[Font],
        text: &str,
        font: SpanFont,
        max_width: Pt,
    ) -> Result<TextBlock, PDFError> {
        let height = Pt(text.parse().unwrap_or(0.0));
        Ok(TextBlock {
            font,
            lines: vec![TextLine {
                text: text.to_string(),
                width: Pt(10.0),
            }],
            ascent: Pt(0.0),
            line_height: height,
            max_width,
            height,
        })
    }
}

/// Keeps finished pages where the test can see them, and can refuse to
/// start pages from a given page number onwards.
#[derive(Default)]
struct Recorder {
    inner: Document,
    finished: Rc<RefCell<Vec<Page>>>,
    written: Rc<RefCell<bool>>,
    refuse_from: Option<usize>,
}

impl PageSink for Recorder {
    fn start_page(
        &mut self,
        page_number: usize,
        size: (Pt, Pt),
        margins: &Margins,
    ) -> Result<Page, PDFError> {
        match self.refuse_from {
            Some(from) if page_number >= from => Err(PDFError::PageRefused(page_number)),
            _ => self.inner.start_page(page_number, size, margins),
        }
    }

    fn finish_page(&mut self, page: Page) {
        self.finished.borrow_mut().push(page);
    }

    fn add_font(&mut self, font: Font) -> usize {
        self.inner.add_font(font)
    }

    fn add_image(&mut self, image: Image) -> ImageHandle {
        self.inner.add_image(image)
    }

    fn fonts(&self) -> &[Font] {
        self.inner.fonts()
    }

    fn write<W: Write>(self, _w: W) -> Result<(), PDFError> {
        *self.written.borrow_mut() = true;
        Ok(())
    }
}

type TestPaginator = Paginator<Vec<u8>, Recorder, FixedHeight>;

fn letter() -> PaginatorConfig {
    PaginatorConfig {
        page_size: PageSize::UsLetter,
        margins: Margins::all(Pt(50.0)),
        ..PaginatorConfig::default()
    }
}

fn paginator(config: PaginatorConfig) -> (TestPaginator, Rc<RefCell<Vec<Page>>>) {
    let recorder = Recorder::default();
    let finished = recorder.finished.clone();
    let paginator = Paginator::with_parts(config, recorder, FixedHeight, Vec::new())
        .expect("valid configuration");
    (paginator, finished)
}

fn paragraph(height: u32) -> Element {
    Paragraph::new(height, 0).into()
}

fn raster(width: u32, height: u32) -> Image {
    Image::new_raster(DynamicImage::ImageRgba8(RgbaImage::new(width, height)))
}

fn text_origins(page: &Page) -> Vec<(Pt, Pt)> {
    page.contents
        .iter()
        .filter_map(|c| match c {
            PageContents::Text(spans) => Some(spans[0].coords),
            _ => None,
        })
        .collect()
}

#[test]
fn test_single_paragraph_fits_on_one_page() {
    let (mut p, finished) = paginator(letter());
    p.place(&paragraph(600)).unwrap();

    assert_eq!(p.page_count(), 1);
    assert_eq!(p.cursor(), (Pt(50.0), Pt(655.0)));
    assert_eq!(p.generate().unwrap(), 1);
    assert_eq!(finished.borrow().len(), 1);
}

#[test]
fn test_paragraph_filling_the_page_exactly_still_fits() {
    let (mut p, finished) = paginator(letter());
    // 50 + 5 + 687 lands right on the bottom margin
    p.place(&paragraph(687)).unwrap();
    assert_eq!(p.page_count(), 1);
    assert_eq!(p.cursor().1, Pt(742.0));

    p.place(&Rule::new(Pt(0.0)).into()).unwrap();
    assert_eq!(p.page_count(), 2);
    assert_eq!(p.generate().unwrap(), 2);
    assert_eq!(text_origins(&finished.borrow()[0]), vec![(Pt(50.0), Pt(742.0))]);
}

#[test]
fn test_rule_filling_the_page_exactly_still_fits() {
    let (mut p, _) = paginator(letter());
    p.place(&paragraph(600)).unwrap();
    // 655 + 5 + 82 == 742
    p.place(&Rule::new(Pt(82.0)).into()).unwrap();
    assert_eq!(p.page_count(), 1);
    assert_eq!(p.cursor().1, Pt(742.0));
}

#[test]
fn test_overflowing_paragraph_moves_to_a_new_page() {
    let (mut p, finished) = paginator(letter());
    p.place(&paragraph(400)).unwrap();
    assert_eq!(p.cursor().1, Pt(455.0));

    p.place(&paragraph(400)).unwrap();
    assert_eq!(p.page_count(), 2);
    assert_eq!(p.cursor().1, Pt(455.0));
    assert_eq!(p.generate().unwrap(), 2);

    let pages = finished.borrow();
    assert_eq!(pages.len(), 2);
    // both paragraphs start at the top of their own page
    assert_eq!(text_origins(&pages[0]), vec![(Pt(50.0), Pt(742.0))]);
    assert_eq!(text_origins(&pages[1]), vec![(Pt(50.0), Pt(742.0))]);
}

#[test]
fn test_oversized_image_is_clamped_without_looping() {
    let (mut p, finished) = paginator(letter());
    let handle = p.add_image(raster(4, 4));
    let tall = ImageBlock::new(handle).with_size(Pt(100.0), Pt(1000.0));

    p.place(&tall.clone().into()).unwrap();
    assert_eq!(p.page_count(), 2);
    // drawn shrunk, but the cursor moves past the whole declared height
    assert_eq!(p.cursor().1, Pt(1055.0));
    p.place(&tall.into()).unwrap();
    assert_eq!(p.page_count(), 3);
    p.generate().unwrap();

    let pages = finished.borrow();
    // the first page was already too short for the image and stays blank
    assert_eq!(pages[0].contents.len(), 1);
    for page in &pages[1..] {
        match page.contents.last() {
            Some(PageContents::Image(layout)) => {
                assert_eq!(layout.transform.d, 692.0);
                assert_eq!(layout.transform.f, 50.0);
            }
            other => panic!("expected an image, got {other:?}"),
        }
    }
}

#[test]
fn test_page_count_grows_by_one_per_overflow() {
    let (mut p, _) = paginator(letter());
    let mut previous = p.page_count();
    let mut breaks = 0;
    for _ in 0..100 {
        let before = p.cursor().1;
        p.place(&Rule::new(Pt(30.0)).into()).unwrap();
        let count = p.page_count();
        assert!(count == previous || count == previous + 1);
        if count > previous {
            breaks += 1;
            assert!(before + Pt(35.0) > Pt(742.0));
            assert_eq!(p.cursor().1, Pt(50.0 + 35.0));
        }
        assert!(p.cursor().1 <= Pt(742.0));
        previous = count;
    }
    // 19 rules of 35pt fit in each 692pt content area
    assert_eq!(breaks, 5);
    assert_eq!(p.page_count(), 6);
}

#[test]
fn test_place_all_matches_repeated_place() {
    let elements: Vec<Element> = [300, 250, 500, 120, 700, 10]
        .into_iter()
        .map(paragraph)
        .chain(std::iter::once(Rule::new(Pt(4.0)).into()))
        .collect();

    let (mut one_by_one, by_place) = paginator(letter());
    for element in &elements {
        one_by_one.place(element).unwrap();
    }
    let (mut batched, by_place_all) = paginator(letter());
    batched.place_all(&elements).unwrap();

    assert_eq!(one_by_one.cursor(), batched.cursor());
    assert_eq!(one_by_one.generate().unwrap(), batched.generate().unwrap());
    assert_eq!(*by_place.borrow(), *by_place_all.borrow());
}

#[test]
fn test_decorations_appear_on_every_page() {
    let config = PaginatorConfig {
        watermark: Some(raster(200, 100)),
        sign: Some(raster(300, 60)),
        ..letter()
    };
    let (mut p, finished) = paginator(config);
    for _ in 0..3 {
        p.place(&paragraph(500)).unwrap();
    }
    assert_eq!(p.generate().unwrap(), 3);

    let pages = finished.borrow();
    let overlays: Vec<_> = pages
        .iter()
        .map(|page| match &page.contents[..3] {
            [PageContents::Fill(_), PageContents::Image(watermark), PageContents::Image(sign)] => {
                (watermark.clone(), sign.clone())
            }
            other => panic!("unexpected page start {other:?}"),
        })
        .collect();
    assert_eq!(overlays[0].0.alpha, 65);
    assert_eq!(overlays[0].1.alpha, 255);
    assert!(overlays.iter().all(|o| *o == overlays[0]));
}

#[test]
fn test_refused_page_is_a_page_creation_error() {
    let recorder = Recorder {
        refuse_from: Some(2),
        ..Recorder::default()
    };
    let mut p = Paginator::with_parts(letter(), recorder, FixedHeight, Vec::new()).unwrap();
    p.place(&paragraph(600)).unwrap();

    let err = p.place(&paragraph(600)).unwrap_err();
    assert!(matches!(
        err,
        PaginationError::PageCreation {
            page: 2,
            source: PDFError::PageRefused(2)
        }
    ));
    assert!(matches!(
        p.place(&paragraph(1)),
        Err(PaginationError::Poisoned)
    ));
}

#[test]
fn test_first_page_must_be_created() {
    let recorder = Recorder {
        refuse_from: Some(1),
        ..Recorder::default()
    };
    let result = Paginator::with_parts(letter(), recorder, FixedHeight, Vec::new());
    assert!(matches!(
        result,
        Err(PaginationError::PageCreation { page: 1, .. })
    ));
}

#[test]
fn test_invalid_margins_fail_construction() {
    let config = PaginatorConfig {
        margins: Margins::symmetric(Pt(400.0), Pt(0.0)),
        ..letter()
    };
    let result = Paginator::with_parts(config, Recorder::default(), FixedHeight, Vec::new());
    assert!(matches!(result, Err(PaginationError::Configuration(_))));
}

#[test]
fn test_spacing_setting_is_honoured() {
    let config = PaginatorConfig {
        spacing: Pt(20.0),
        ..letter()
    };
    let (mut p, _) = paginator(config);
    p.place(&paragraph(100)).unwrap();
    assert_eq!(p.cursor().1, Pt(170.0));
}

#[test]
fn test_generate_writes_through_the_sink() {
    let recorder = Recorder::default();
    let written = recorder.written.clone();
    let p = Paginator::with_parts(letter(), recorder, FixedHeight, Vec::new()).unwrap();
    assert!(!*written.borrow());
    assert_eq!(p.generate().unwrap(), 1);
    assert!(*written.borrow());
}

#[test]
fn test_unusable_rule_width_stops_placement() {
    let (mut p, _) = paginator(letter());
    let err = p.place(&Rule::new(Pt(f32::NAN)).into()).unwrap_err();
    assert!(matches!(
        err,
        PaginationError::ElementDrawing {
            kind: "line",
            source: PDFError::InvalidDimension { .. }
        }
    ));
    assert_eq!(p.cursor(), (Pt(50.0), Pt(50.0)));

    for _ in 0..100 {
        assert!(matches!(
            p.place(&Rule::new(Pt(30.0)).into()),
            Err(PaginationError::Poisoned)
        ));
    }
    assert_eq!(p.page_count(), 1);
}

#[test]
fn test_negative_image_height_is_an_element_error() {
    let (mut p, _) = paginator(letter());
    let handle = p.add_image(raster(4, 4));
    let block = ImageBlock::new(handle).with_size(Pt(10.0), Pt(-1.0));
    assert!(matches!(
        p.place(&block.into()),
        Err(PaginationError::ElementDrawing { kind: "image", .. })
    ));
}
