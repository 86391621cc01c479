//! Rendering of recorded page contents into a PDF content stream.

use crate::colour::Colour;
use crate::font::Font;
use crate::page::{PageContents, SpanFont, SpanLayout};
use crate::PDFError;
use std::io::Write;

/// Renders page contents to a PDF content stream, converting each high-level
/// item into low-level PDF operators wrapped in its own `q`/`Q` pair.
#[allow(clippy::write_with_newline)]
pub(crate) fn render_contents(
    contents: &[PageContents],
    fonts: &[Font],
) -> Result<Vec<u8>, PDFError> {
    let mut content: Vec<u8> = Vec::default();

    for page_content in contents.iter() {
        match page_content {
            PageContents::Fill(fill) => {
                write!(&mut content, "q\n")?;
                fill.colour.write_fill(&mut content)?;
                write!(
                    &mut content,
                    "{} {} {} {} re\nf\n",
                    fill.rect.x1,
                    fill.rect.y1,
                    fill.rect.width(),
                    fill.rect.height()
                )?;
                write!(&mut content, "Q\n")?;
            }
            PageContents::Text(spans) => {
                render_text_spans(&mut content, spans, fonts)?;
            }
            PageContents::Image(image) => {
                write!(&mut content, "q\n")?;
                if image.alpha < u8::MAX {
                    write!(&mut content, "/A{} gs\n", image.alpha)?;
                }
                image.transform.write_cm(&mut content)?;
                write!(&mut content, "/I{} Do\n", image.image.index())?;
                write!(&mut content, "Q\n")?;
            }
            PageContents::Line(line) => {
                write!(&mut content, "q\n")?;
                write!(&mut content, "{} w\n", line.width)?;
                line.colour.write_stroke(&mut content)?;
                write!(
                    &mut content,
                    "{} {} m\n{} {} l\nS\n",
                    line.from.0, line.from.1, line.to.0, line.to.1
                )?;
                write!(&mut content, "Q\n")?;
            }
        }
    }

    Ok(content)
}

#[allow(clippy::write_with_newline)]
fn render_text_spans(
    content: &mut Vec<u8>,
    spans: &[SpanLayout],
    fonts: &[Font],
) -> Result<(), PDFError> {
    let Some(first) = spans.first() else {
        return Ok(());
    };

    write!(content, "q\n")?;

    let mut current_font: SpanFont = first.font;
    let mut current_colour: Colour = first.colour;
    write!(content, "/F{} {} Tf\n", current_font.index, current_font.size)?;
    current_colour.write_fill(content)?;

    for span in spans.iter() {
        if span.font != current_font {
            current_font = span.font;
            write!(content, "/F{} {} Tf\n", current_font.index, current_font.size)?;
        }
        if span.colour != current_colour {
            current_colour = span.colour;
            current_colour.write_fill(content)?;
        }

        let font = fonts
            .get(current_font.index)
            .ok_or(PDFError::FontMissing(current_font.index))?;

        write!(content, "BT\n")?;
        write!(content, "{} {} Td\n", span.coords.0, span.coords.1)?;
        write!(content, "<")?;
        for ch in span.text.chars() {
            write!(content, "{:04x}", font.glyph_or_fallback(ch))?;
        }
        write!(content, "> Tj\n")?;
        write!(content, "ET\n")?;
    }

    write!(content, "Q\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::colours;
    use crate::page::{LineLayout, Page};
    use crate::units::Pt;

    #[test]
    fn lines_are_stroked_in_their_own_state() {
        let mut page = Page::new((Pt(100.0), Pt(100.0)), None);
        page.add_line(LineLayout {
            from: (Pt(10.0), Pt(90.0)),
            to: (Pt(90.0), Pt(90.0)),
            width: Pt(2.0),
            colour: colours::BLACK,
        });
        let rendered = render_contents(&page.contents, &[]).unwrap();
        assert_eq!(
            String::from_utf8(rendered).unwrap(),
            "q\n2 w\n0 G\n10 90 m\n90 90 l\nS\nQ\n"
        );
    }

    #[test]
    fn background_is_a_filled_rectangle() {
        let mut page = Page::new((Pt(100.0), Pt(50.0)), None);
        page.fill_background(colours::WHITE);
        let rendered = render_contents(&page.contents, &[]).unwrap();
        assert_eq!(
            String::from_utf8(rendered).unwrap(),
            "q\n1 g\n0 0 100 50 re\nf\nQ\n"
        );
    }

    #[test]
    fn text_with_unknown_font_is_an_error() {
        let mut page = Page::new((Pt(100.0), Pt(100.0)), None);
        page.add_span(SpanLayout {
            text: "hi".into(),
            font: SpanFont {
                index: 3,
                size: Pt(11.0),
            },
            colour: colours::BLACK,
            coords: (Pt(0.0), Pt(0.0)),
        });
        assert!(matches!(
            render_contents(&page.contents, &[]),
            Err(PDFError::FontMissing(3))
        ));
    }
}
