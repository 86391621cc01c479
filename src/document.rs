use crate::{
    font::Font,
    image::{Image, ImageHandle},
    info::Info,
    layout::Margins,
    page::Page,
    refs::{ObjectReferences, RefType},
    PDFError, Pt,
};
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Pdf, Ref};
use std::collections::BTreeSet;
use std::io::Write;

/// Where finished pages go. A sink hands out blank pages, takes them back once
/// they are drawn, stores the fonts and images pages refer to, and finally
/// serializes everything.
///
/// [`Document`] is the sink that produces a PDF; other implementations can wrap
/// or replace it (to record pages, or to refuse them).
pub trait PageSink {
    /// Provide a blank page of the given size. `page_number` is 1-based.
    fn start_page(
        &mut self,
        page_number: usize,
        size: (Pt, Pt),
        margins: &Margins,
    ) -> Result<Page, PDFError>;

    /// Accept a finished page. Finished pages are never modified again and
    /// keep the order in which they were finished.
    fn finish_page(&mut self, page: Page);

    /// Register a font, returning the index pages use to refer to it
    fn add_font(&mut self, font: Font) -> usize;

    /// Register an image, returning a handle pages use to refer to it
    fn add_image(&mut self, image: Image) -> ImageHandle;

    /// The fonts registered so far, by index
    fn fonts(&self) -> &[Font];

    /// Attach document metadata. Sinks that don't write metadata ignore it.
    fn set_info(&mut self, _info: Info) {}

    /// Serialize every finished page, in order, into `w`
    fn write<W: Write>(self, w: W) -> Result<(), PDFError>
    where
        Self: Sized;
}

#[derive(Default)]
/// A document is the main object that stores all the contents of the PDF
/// then renders it out with a call to [Document::write]
pub struct Document {
    pub info: Option<Info>,
    pub pages: Arena<Page>,
    pub page_order: Vec<Id<Page>>,
    pub fonts: Vec<Font>,
    pub images: Arena<Image>,
}

impl Document {
    pub fn new() -> Document {
        Document::default()
    }

    /// Sets information about the document. If not provided, no information block will be
    /// written to the PDF
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    /// Add a page to the end of the document, returning its id
    pub fn add_page(&mut self, page: Page) -> Id<Page> {
        let id = self.pages.alloc(page);
        self.page_order.push(id);
        id
    }

    /// Write the entire document to the writer. The document is rendered in memory
    /// first and then written out in one go.
    pub fn write<W: Write>(self, mut w: W) -> Result<(), PDFError> {
        let Document {
            info,
            pages,
            page_order,
            fonts,
            images,
        } = self;

        let mut refs = ObjectReferences::new();
        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = info {
            info.write(&mut refs, &mut writer);
        }

        // page refs are keyed by position in the document, not by arena index
        let page_refs: Vec<Ref> = (0..page_order.len())
            .map(|i| refs.gen(RefType::Page(i)))
            .collect();
        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs);

        for (i, font) in fonts.iter().enumerate() {
            font.write(&mut refs, i, &mut writer);
        }

        for (id, image) in images.iter() {
            image.write(&mut refs, id.index(), &mut writer);
        }

        // one shared graphics state per distinct opacity
        let opacities: BTreeSet<u8> = pages.iter().flat_map(|(_, p)| p.opacities()).collect();
        for alpha in opacities {
            let state_id = refs.gen(RefType::Opacity(alpha));
            let alpha = alpha as f32 / u8::MAX as f32;
            writer
                .ext_graphics(state_id)
                .non_stroking_alpha(alpha)
                .stroking_alpha(alpha);
        }

        for (page_index, id) in page_order.iter().enumerate() {
            let page = pages
                .get(*id)
                .ok_or(PDFError::PageMissing(page_index))?;
            page.write(&mut refs, page_index, &fonts, &images, &mut writer)?;
        }

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        catalog.finish();

        w.write_all(writer.finish().as_slice())?;
        w.flush().map_err(Into::into)
    }
}

impl PageSink for Document {
    fn start_page(
        &mut self,
        _page_number: usize,
        size: (Pt, Pt),
        margins: &Margins,
    ) -> Result<Page, PDFError> {
        Ok(Page::new(size, Some(margins.clone())))
    }

    fn finish_page(&mut self, page: Page) {
        self.add_page(page);
    }

    fn add_font(&mut self, font: Font) -> usize {
        self.fonts.push(font);
        self.fonts.len() - 1
    }

    fn add_image(&mut self, image: Image) -> ImageHandle {
        let (width, height) = (image.width as u32, image.height as u32);
        let id = self.images.alloc(image);
        ImageHandle { id, width, height }
    }

    fn fonts(&self) -> &[Font] {
        &self.fonts
    }

    fn set_info(&mut self, info: Info) {
        Document::set_info(self, info);
    }

    fn write<W: Write>(self, w: W) -> Result<(), PDFError> {
        Document::write(self, w)
    }
}
