use crate::colour::Colour;
use crate::font::Font;
use crate::page::{Page, SpanFont, SpanLayout};
use crate::units::Pt;
use crate::PDFError;

const TABSIZE: usize = 4;

/// Horizontal placement of content narrower than the content area
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Align {
    /// Flush with the left edge of the content area
    #[default]
    Start,
    Center,
    /// Flush with the right edge of the content area
    End,
}

/// A single wrapped line and its measured width
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub width: Pt,
}

/// A paragraph that has been wrapped to a maximum width. Its height is known
/// before anything is drawn, which is what pagination decisions are made on.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub font: SpanFont,
    pub lines: Vec<TextLine>,
    /// Distance from the top of a line to its baseline
    pub ascent: Pt,
    /// Distance between consecutive baselines
    pub line_height: Pt,
    /// The width the block was wrapped to; alignment is relative to it
    pub max_width: Pt,
    /// Total vertical extent of the block
    pub height: Pt,
}

impl TextBlock {
    /// A block that only reserves vertical space and draws nothing
    pub fn blank(font: SpanFont, max_width: Pt, height: Pt) -> TextBlock {
        TextBlock {
            font,
            lines: Vec::new(),
            ascent: Pt(0.0),
            line_height: height,
            max_width,
            height,
        }
    }

    /// Draw the block with its top-left corner at `origin`, where `origin.1` is
    /// measured downwards from the top of the page
    pub fn draw(&self, page: &mut Page, origin: (Pt, Pt), align: Align, colour: Colour) {
        let page_height = page.height();
        let spans = self
            .lines
            .iter()
            .enumerate()
            .filter(|(_, line)| !line.text.is_empty())
            .map(|(i, line)| {
                let dx = match align {
                    Align::Start => Pt(0.0),
                    Align::Center => (self.max_width - line.width) / 2.0,
                    Align::End => self.max_width - line.width,
                };
                let baseline = origin.1 + self.ascent + self.line_height * i as f32;
                SpanLayout {
                    text: line.text.clone(),
                    font: self.font,
                    colour,
                    coords: (origin.0 + dx, page_height - baseline),
                }
            })
            .collect();
        page.add_spans(spans);
    }
}

/// Wraps text into a [`TextBlock`]. The block's height is authoritative: the
/// paginator reserves exactly that much space for it.
pub trait TextMeasure {
    fn measure(
        &self,
        fonts: &[Font],
        text: &str,
        font: SpanFont,
        max_width: Pt,
    ) -> Result<TextBlock, PDFError>;
}

/// Word-aware wrapping using the font's own advances.
///
/// Lines break after whitespace where possible, keeping words intact; a word
/// wider than the whole line is broken between characters instead. Explicit
/// newlines always start a new line, tabs count as four spaces, and whitespace
/// at the end of a wrapped line (or the start of the next one) is dropped.
#[derive(Debug, Default, Copy, Clone)]
pub struct NaturalWrap;

impl TextMeasure for NaturalWrap {
    fn measure(
        &self,
        fonts: &[Font],
        text: &str,
        font: SpanFont,
        max_width: Pt,
    ) -> Result<TextBlock, PDFError> {
        let face = fonts
            .get(font.index)
            .ok_or(PDFError::FontMissing(font.index))?;
        let metrics = face.metrics(font.size);
        let lines = wrap_lines(text, max_width, |ch| face.advance(ch, font.size));
        let line_height = metrics.line_height();
        Ok(TextBlock {
            font,
            height: line_height * lines.len() as f32,
            lines,
            ascent: metrics.ascent,
            line_height,
            max_width,
        })
    }
}

/// Break `text` into lines no wider than `max_width`, given the advance of each character
pub fn wrap_lines<F: Fn(char) -> Pt>(text: &str, max_width: Pt, advance: F) -> Vec<TextLine> {
    let text = text
        .replace('\t', &" ".repeat(TABSIZE))
        .replace("\r\n", "\n")
        .replace('\r', "\n");

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        wrap_paragraph(paragraph, max_width, &advance, &mut lines);
    }
    lines
}

fn wrap_paragraph<F: Fn(char) -> Pt>(
    paragraph: &str,
    max_width: Pt,
    advance: &F,
    lines: &mut Vec<TextLine>,
) {
    let mut current = String::new();
    let mut width = Pt(0.0);
    // byte offset just past the most recent whitespace in `current`
    let mut last_break: Option<usize> = None;
    let mut wrapped = false;

    for ch in paragraph.chars() {
        // indentation is kept, but wrapped lines don't start with whitespace
        if wrapped && current.is_empty() && ch.is_whitespace() {
            continue;
        }

        let adv = advance(ch);
        while !ch.is_whitespace() && !current.is_empty() && width + adv > max_width {
            wrapped = true;
            match last_break.take() {
                Some(at) => {
                    let rest = current.split_off(at);
                    lines.push(finish_line(&current, advance));
                    current = rest;
                    width = current.chars().map(advance).sum();
                }
                None => {
                    lines.push(finish_line(&current, advance));
                    current.clear();
                    width = Pt(0.0);
                }
            }
        }

        current.push(ch);
        width += adv;
        if ch.is_whitespace() {
            last_break = Some(current.len());
        }
    }

    lines.push(finish_line(&current, advance));
}

fn finish_line<F: Fn(char) -> Pt>(text: &str, advance: &F) -> TextLine {
    let text = text.trim_end();
    TextLine {
        text: text.to_string(),
        width: text.chars().map(advance).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::colours;
    use crate::page::PageContents;

    fn mono(_: char) -> Pt {
        Pt(10.0)
    }

    fn texts(lines: &[TextLine]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn short_text_is_a_single_line() {
        let lines = wrap_lines("hello", Pt(100.0), mono);
        assert_eq!(
            lines,
            vec![TextLine {
                text: "hello".into(),
                width: Pt(50.0)
            }]
        );
    }

    #[test]
    fn breaks_between_words() {
        let lines = wrap_lines("aaa bbb ccc", Pt(75.0), mono);
        assert_eq!(texts(&lines), vec!["aaa bbb", "ccc"]);
        assert_eq!(lines[0].width, Pt(70.0));
    }

    #[test]
    fn long_words_break_between_characters() {
        let lines = wrap_lines("abcdefghij", Pt(40.0), mono);
        assert_eq!(texts(&lines), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn long_word_after_a_short_one() {
        let lines = wrap_lines("ab cdefghij", Pt(40.0), mono);
        assert_eq!(texts(&lines), vec!["ab", "cdef", "ghij"]);
    }

    #[test]
    fn newlines_and_tabs() {
        let lines = wrap_lines("one\r\n\ttwo\n\nthree", Pt(1000.0), mono);
        assert_eq!(texts(&lines), vec!["one", "    two", "", "three"]);
    }

    #[test]
    fn wrapped_lines_drop_leading_whitespace() {
        let lines = wrap_lines("aaaa    bbbb", Pt(40.0), mono);
        assert_eq!(texts(&lines), vec!["aaaa", "bbbb"]);
    }

    #[test]
    fn empty_text_still_occupies_a_line() {
        assert_eq!(texts(&wrap_lines("", Pt(10.0), mono)), vec![""]);
    }

    #[test]
    fn measuring_without_the_font_fails() {
        let font = SpanFont {
            index: 0,
            size: Pt(11.0),
        };
        assert!(matches!(
            NaturalWrap.measure(&[], "text", font, Pt(100.0)),
            Err(PDFError::FontMissing(0))
        ));
    }

    #[test]
    fn alignment_shifts_each_line() {
        let font = SpanFont {
            index: 0,
            size: Pt(10.0),
        };
        let block = TextBlock {
            font,
            lines: wrap_lines("aa\naaaa", Pt(100.0), mono),
            ascent: Pt(8.0),
            line_height: Pt(12.0),
            max_width: Pt(100.0),
            height: Pt(24.0),
        };

        let origin_x = |align| {
            let mut page = Page::new((Pt(200.0), Pt(300.0)), None);
            block.draw(&mut page, (Pt(50.0), Pt(50.0)), align, colours::BLACK);
            match &page.contents[0] {
                PageContents::Text(spans) => spans.iter().map(|s| s.coords).collect::<Vec<_>>(),
                other => panic!("expected text, got {other:?}"),
            }
        };

        assert_eq!(
            origin_x(Align::Start),
            vec![(Pt(50.0), Pt(242.0)), (Pt(50.0), Pt(230.0))]
        );
        assert_eq!(
            origin_x(Align::Center),
            vec![(Pt(90.0), Pt(242.0)), (Pt(80.0), Pt(230.0))]
        );
        assert_eq!(
            origin_x(Align::End),
            vec![(Pt(130.0), Pt(242.0)), (Pt(110.0), Pt(230.0))]
        );
    }

    #[test]
    fn blank_blocks_draw_nothing() {
        let font = SpanFont {
            index: 0,
            size: Pt(10.0),
        };
        let mut page = Page::new((Pt(200.0), Pt(300.0)), None);
        TextBlock::blank(font, Pt(100.0), Pt(400.0)).draw(
            &mut page,
            (Pt(0.0), Pt(0.0)),
            Align::Start,
            colours::BLACK,
        );
        assert!(page.contents.is_empty());
    }
}
