use crate::refs::{ObjectReferences, RefType};
use crate::{PDFError, Pt};
use owned_ttf_parser::{AsFaceRef, Face, GlyphId, OwnedFace};
use pdf_writer::{
    types::{CidFontType, FontFlags, SystemInfo},
    Filter, Finish, Name, Pdf, Ref, Str,
};
use std::collections::BTreeMap;

/// A parsed TrueType / OpenType font. Fonts are embedded in their entirety in
/// the generated PDF, so large fonts will noticeably increase the output size.
///
/// Fonts are stored by the document and referred to everywhere else by their
/// _index_, as returned by [`PageSink::add_font`](crate::PageSink::add_font).
pub struct Font {
    pub face: OwnedFace,
}

/// Vertical metrics of a font at a given size
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineMetrics {
    /// Distance from the top of a line to its baseline
    pub ascent: Pt,
    /// Distance from the baseline to the bottom of a line (usually negative)
    pub descent: Pt,
    /// Extra space between lines
    pub leading: Pt,
}

impl LineMetrics {
    /// How far apart two consecutive baselines are
    pub fn line_height(&self) -> Pt {
        self.leading + self.ascent - self.descent
    }
}

impl Font {
    /// Load a font from raw bytes, returning an error if the font could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, PDFError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(Font { face })
    }

    fn face(&self) -> &Face<'_> {
        self.face.as_face_ref()
    }

    fn scaling(&self, size: Pt) -> f32 {
        *size / self.face().units_per_em() as f32
    }

    fn lookup_name(&self, name_id: u16) -> Option<String> {
        self.face()
            .names()
            .into_iter()
            .find(|name| name.name_id == name_id && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    /// The full name of the font, if it declares one
    pub fn name(&self) -> Option<String> {
        self.lookup_name(owned_ttf_parser::name_id::FULL_NAME)
    }

    /// The family name of the font, if it declares one
    pub fn family(&self) -> Option<String> {
        self.lookup_name(owned_ttf_parser::name_id::FAMILY)
    }

    pub fn metrics(&self, size: Pt) -> LineMetrics {
        let scaling = self.scaling(size);
        LineMetrics {
            ascent: Pt(self.face().ascender() as f32 * scaling),
            descent: Pt(self.face().descender() as f32 * scaling),
            leading: Pt(self.face().line_gap() as f32 * scaling),
        }
    }

    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.face().glyph_index(ch).map(|i| i.0)
    }

    /// The glyph drawn for `ch`: its own glyph, else U+FFFD, else `?`, else
    /// the font's `.notdef` glyph
    pub fn glyph_or_fallback(&self, ch: char) -> u16 {
        self.glyph_id(ch)
            .or_else(|| self.glyph_id('\u{FFFD}'))
            .or_else(|| self.glyph_id('?'))
            .unwrap_or(0)
    }

    /// The horizontal advance of `ch` at the given size
    pub fn advance(&self, ch: char, size: Pt) -> Pt {
        let gid = GlyphId(self.glyph_or_fallback(ch));
        Pt(self.face().glyph_hor_advance(gid).unwrap_or_default() as f32 * self.scaling(size))
    }

    /// Every glyph reachable from a unicode codepoint, with the first codepoint mapping to it
    fn unicode_glyphs(&self) -> BTreeMap<u16, char> {
        let mut map = BTreeMap::new();
        let Some(cmap) = self.face().tables().cmap else {
            return map;
        };
        for subtable in cmap.subtables.into_iter().filter(|t| t.is_unicode()) {
            subtable.codepoints(|codepoint| {
                let glyph = subtable.glyph_index(codepoint).filter(|g| g.0 > 0);
                if let (Some(glyph), Ok(ch)) = (glyph, char::try_from(codepoint)) {
                    map.entry(glyph.0).or_insert(ch);
                }
            });
        }
        map
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) {
        let glyphs = self.unicode_glyphs();
        let font_id = refs.gen(RefType::Font(font_index));
        let descriptor_id = self.write_descriptor(refs, font_index, &glyphs, writer);
        let cid_font_id = self.write_cid_font(refs, font_index, descriptor_id, &glyphs, writer);
        let to_unicode_id = self.write_to_unicode(refs, font_index, &glyphs, writer);

        let mut font = writer.type0_font(font_id);
        font.base_font(Name(format!("F{font_index}").as_bytes()));
        font.encoding_predefined(Name(b"Identity-H"));
        font.descendant_font(cid_font_id);
        font.to_unicode(to_unicode_id);
    }

    fn write_cid_font(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        descriptor_id: Ref,
        glyphs: &BTreeMap<u16, char>,
        writer: &mut Pdf,
    ) -> Ref {
        let id = refs.gen(RefType::CidFont(font_index));
        // glyph space is 1000 units per em in PDF
        let scaling = 1000.0 / self.face().units_per_em() as f32;

        let mut cid_font = writer.cid_font(id);
        cid_font.subtype(CidFontType::Type2);
        cid_font.base_font(Name(format!("F{font_index}").as_bytes()));
        cid_font.system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        });
        cid_font.font_descriptor(descriptor_id);
        cid_font.default_width(1000.0);
        cid_font.cid_to_gid_map_predefined(Name(b"Identity"));

        // write the widths as runs of consecutive glyph ids
        let mut widths = cid_font.widths();
        let mut run: Option<(u16, Vec<f32>)> = None;
        for &gid in glyphs.keys() {
            let width = self
                .face()
                .glyph_hor_advance(GlyphId(gid))
                .unwrap_or_default() as f32
                * scaling;
            let extends_run = matches!(
                &run,
                Some((start, run_widths)) if *start as usize + run_widths.len() == gid as usize
            );
            if extends_run {
                if let Some((_, run_widths)) = run.as_mut() {
                    run_widths.push(width);
                }
            } else if let Some((start, run_widths)) = run.replace((gid, vec![width])) {
                widths.consecutive(start, run_widths);
            }
        }
        if let Some((start, run_widths)) = run {
            widths.consecutive(start, run_widths);
        }
        widths.finish();

        id
    }

    fn write_descriptor(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        glyphs: &BTreeMap<u16, char>,
        writer: &mut Pdf,
    ) -> Ref {
        let data_id = refs.gen(RefType::FontData(font_index));
        writer
            .stream(data_id, self.face.as_slice())
            .pair(Name(b"Length1"), self.face.as_slice().len() as i32);

        let face = self.face();
        let scaling = 1000.0 / face.units_per_em() as f32;
        let advances: Vec<f32> = glyphs
            .keys()
            .filter_map(|&gid| face.glyph_hor_advance(GlyphId(gid)))
            .map(|adv| adv as f32 * scaling)
            .collect();
        let max_width = advances.iter().copied().fold(0.0, f32::max);
        let avg_width = if advances.is_empty() {
            0.0
        } else {
            advances.iter().sum::<f32>() / advances.len() as f32
        };
        let bbox = face.global_bounding_box();

        let id = refs.gen(RefType::FontDescriptor(font_index));
        let mut descriptor = writer.font_descriptor(id);
        let name = self.name().unwrap_or_else(|| format!("F{font_index}"));
        descriptor.name(Name(name.replace(' ', "").as_bytes()));
        if let Some(family) = self.family() {
            descriptor.family(Str(family.as_bytes()));
        }
        descriptor.weight(face.weight().to_number());

        let mut flags = FontFlags::NON_SYMBOLIC;
        if face.is_monospaced() {
            flags.insert(FontFlags::FIXED_PITCH);
        }
        if face.is_italic() {
            flags.insert(FontFlags::ITALIC);
        }
        descriptor.flags(flags);

        descriptor.bbox(pdf_writer::Rect {
            x1: bbox.x_min as f32 * scaling,
            y1: bbox.y_min as f32 * scaling,
            x2: bbox.x_max as f32 * scaling,
            y2: bbox.y_max as f32 * scaling,
        });
        // the exact angle isn't needed for embedded fonts; viewers only use it for substitution
        descriptor.italic_angle(if face.is_italic() { -12.0 } else { 0.0 });
        descriptor.ascent(face.ascender() as f32 * scaling);
        descriptor.descent(face.descender() as f32 * scaling);
        descriptor.leading(face.line_gap() as f32 * scaling);
        let cap_height = face
            .capital_height()
            .map(|h| h as f32 * scaling)
            .unwrap_or(face.ascender() as f32 * scaling);
        descriptor.cap_height(cap_height);
        descriptor.x_height(
            face.x_height()
                .map(|h| h as f32 * scaling)
                .unwrap_or(cap_height),
        );
        // TrueType carries no stem width; 80 is the common stand-in
        descriptor.stem_v(80.0);
        descriptor.avg_width(avg_width);
        descriptor.max_width(max_width);
        descriptor.missing_width(max_width);
        descriptor.font_file2(data_id);

        id
    }

    fn write_to_unicode(
        &self,
        refs: &mut ObjectReferences,
        font_index: usize,
        glyphs: &BTreeMap<u16, char>,
        writer: &mut Pdf,
    ) -> Ref {
        let id = refs.gen(RefType::ToUnicode(font_index));

        let mut cmap = String::from(
            "/CIDInit /ProcSet findresource begin\n\
             12 dict begin\n\
             begincmap\n\
             /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
             /CMapName /Adobe-Identity-UCS def\n\
             /CMapType 2 def\n\
             1 begincodespacerange\n\
             <0000> <FFFF>\n\
             endcodespacerange\n",
        );

        // bfchar blocks hold at most 100 entries
        let entries: Vec<(u16, char)> = glyphs.iter().map(|(&gid, &ch)| (gid, ch)).collect();
        for block in entries.chunks(100) {
            cmap.push_str(&format!("{} beginbfchar\n", block.len()));
            for &(gid, ch) in block {
                let mut utf16 = [0u16; 2];
                let units: String = ch
                    .encode_utf16(&mut utf16)
                    .iter()
                    .map(|unit| format!("{unit:04x}"))
                    .collect();
                cmap.push_str(&format!("<{gid:04x}> <{units}>\n"));
            }
            cmap.push_str("endbfchar\n");
        }
        cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");

        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(
            cmap.as_bytes(),
            miniz_oxide::deflate::CompressionLevel::DefaultLevel as u8,
        );
        writer
            .stream(id, compressed.as_slice())
            .filter(Filter::FlateDecode);

        id
    }
}
