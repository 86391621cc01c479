//! Builds a multi-page report from paragraphs, images and rules.
//!
//! ```text
//! cargo run --example report -- path/to/font.ttf [path/to/image.png]
//! ```

use pdf_flow::layout::{Align, Margins};
use pdf_flow::pagesize::PageSize;
use pdf_flow::{
    colours, Colour, Element, Font, Image, ImageBlock, Info, Paginator, PaginatorConfig,
    Paragraph, Pt, Rule,
};
use std::path::{Path, PathBuf};

/// Pick `name.pdf` in `dir`, or `name(1).pdf`, `name(2).pdf`, ... if it already exists
fn unused_path(dir: &Path, name: &str) -> PathBuf {
    let mut path = dir.join(format!("{name}.pdf"));
    let mut count = 1;
    while path.exists() {
        path = dir.join(format!("{name}({count}).pdf"));
        count += 1;
    }
    path
}

fn main() {
    let mut args = std::env::args().skip(1);
    let font_path = args.next().expect("usage: report <font.ttf> [image]");
    let image_path = args.next();

    let font = Font::load(std::fs::read(font_path).expect("can read font")).expect("can load font");
    let config = PaginatorConfig {
        page_size: PageSize::UsLetter,
        margins: Margins::all(Pt(50.0)),
        background: Colour::from_packed_rgb(0xBB86FC),
        watermark: image_path
            .as_ref()
            .map(|path| Image::new_from_disk(path).expect("can load watermark")),
        info: Some(
            Info::new()
                .title("Pagination Demo")
                .subject("Development Test / Example"),
        ),
        ..PaginatorConfig::default()
    };

    let path = unused_path(Path::new("."), "report");
    let mut pdf = Paginator::create(config, &path).expect("can create report");
    let font = pdf.add_font(font);

    let short = Element::from(Paragraph::new("This is a short text 1", font));
    let long = Element::from(
        Paragraph::new(
            "This is a long text 1 good night  hello world nice to meet you all, good bay ",
            font,
        )
        .with_colour(colours::WHITE),
    );
    let line = Element::from(Rule::default());

    let mut elements = vec![short, long.clone()];
    if let Some(path) = &image_path {
        let image = pdf.add_image(Image::new_from_disk(path).expect("can load image"));
        elements.push(ImageBlock::new(image).into());
        elements.push(
            ImageBlock::new(image)
                .with_size(Pt(100.0), Pt(100.0))
                .with_opacity(25)
                .into(),
        );
    }
    elements.extend(std::iter::repeat(long.clone()).take(3));
    elements.push(line.clone());
    elements.extend(std::iter::repeat(long).take(15));
    elements.push(
        Paragraph::new(lipsum::lipsum(120), font)
            .with_size(Pt(9.0))
            .with_align(Align::End)
            .into(),
    );
    elements.extend(std::iter::repeat(line).take(65));

    pdf.place_all(&elements).expect("can place elements");
    let pages = pdf.generate().expect("can write report");
    println!("wrote {} ({pages} pages)", path.display());
}
