//! Minimal flowing-text layout on top of `printpdf`.
//!
//! [`TextDocument`] keeps a vertical cursor, wraps text to the usable page
//! width and starts a new page when the cursor reaches the bottom margin. Only
//! the PDF base-14 fonts are used, so no font files are needed at runtime.

use image::{DynamicImage, RgbImage};
use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Point, Pt, RawImage, RawImageData,
    RawImageFormat, TextItem, XObjectTransform,
};
use tracing::debug;

use crate::config::RenderConfig;

const LINE_SPACING: f32 = 1.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
    Italic,
    Mono,
}

impl Font {
    fn builtin(self) -> BuiltinFont {
        match self {
            Font::Regular => BuiltinFont::Helvetica,
            Font::Bold => BuiltinFont::HelveticaBold,
            Font::Italic => BuiltinFont::HelveticaOblique,
            Font::Mono => BuiltinFont::Courier,
        }
    }

    // Average glyph advance as a fraction of the font size.
    fn width_factor(self) -> f32 {
        match self {
            Font::Mono => 0.6,
            Font::Bold => 0.56,
            Font::Regular | Font::Italic => 0.52,
        }
    }
}

pub struct TextDocument {
    doc: PdfDocument,
    pages: Vec<PdfPage>,
    ops: Vec<Op>,
    page_width: f32,
    page_height: f32,
    margin: f32,
    font_size: f32,
    cursor_y: f32,
    has_content: bool,
}

impl TextDocument {
    pub fn new(title: &str, render: &RenderConfig) -> Self {
        let (page_width, page_height) = render.page_size.dimensions_pt();
        let margin = render.margin_pt();
        Self {
            doc: PdfDocument::new(title),
            pages: Vec::new(),
            ops: Vec::new(),
            page_width,
            page_height,
            margin,
            font_size: render.font_size,
            cursor_y: page_height - margin,
            has_content: false,
        }
    }

    /// True once any visible text or image has been placed.
    pub fn has_content(&self) -> bool {
        self.has_content
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn page_count(&self) -> usize {
        self.pages.len() + 1
    }

    /// Bold heading; level 1 is the largest.
    pub fn heading(&mut self, text: &str, level: u8) {
        let scale = match level {
            1 => 1.6,
            2 => 1.4,
            3 => 1.2,
            _ => 1.05,
        };
        let size = self.font_size * scale;
        self.spacer(size * 0.3);
        self.flow(text, Font::Bold, size, 0.0);
        self.spacer(size * 0.2);
    }

    /// Word-wrapped body text.
    pub fn paragraph(&mut self, text: &str) {
        self.flow(text, Font::Regular, self.font_size, 0.0);
    }

    /// Word-wrapped text in `font`, indented by `indent` points.
    pub fn styled(&mut self, text: &str, font: Font, indent: f32) {
        self.flow(text, font, self.font_size, indent);
    }

    /// Monospace text; whitespace is kept and long lines are split by character.
    pub fn code_line(&mut self, text: &str) {
        let size = self.font_size * 0.9;
        let max = self.max_chars(Font::Mono, size, 0.0);
        let text = sanitize(text);
        if text.is_empty() {
            self.emit("", Font::Mono, size, 0.0);
            return;
        }
        for chunk in chunk_chars(&text, max) {
            self.emit(&chunk, Font::Mono, size, 0.0);
        }
    }

    pub fn spacer(&mut self, height: f32) {
        self.cursor_y -= height;
    }

    /// Ends the current page; the next element starts at the top of a new one.
    pub fn page_break(&mut self) {
        let ops = std::mem::take(&mut self.ops);
        self.pages.push(PdfPage::new(
            Mm(pt_to_mm(self.page_width)),
            Mm(pt_to_mm(self.page_height)),
            ops,
        ));
        self.cursor_y = self.page_height - self.margin;
    }

    /// Places `image` at the cursor, shrunk (never enlarged) to fit the usable area.
    pub fn image(&mut self, image: &DynamicImage) {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            return;
        }
        let usable_width = self.page_width - 2.0 * self.margin;
        let usable_height = self.page_height - 2.0 * self.margin;
        let scale = (usable_width / width as f32)
            .min(usable_height / height as f32)
            .min(1.0);
        let draw_height = height as f32 * scale;
        if self.cursor_y - draw_height < self.margin {
            self.page_break();
        }
        self.cursor_y -= draw_height;

        let id = self.doc.add_image(&raw_image(rgb));
        self.ops.push(Op::UseXobject {
            id,
            transform: XObjectTransform {
                translate_x: Some(Pt(self.margin)),
                translate_y: Some(Pt(self.cursor_y)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(72.0),
                ..Default::default()
            },
        });
        self.has_content = true;
    }

    /// Serializes the document.
    pub fn finish(mut self) -> Vec<u8> {
        if !self.ops.is_empty() || self.pages.is_empty() {
            self.page_break();
        }
        let pages = std::mem::take(&mut self.pages);
        let mut warnings = Vec::new();
        let bytes = self
            .doc
            .with_pages(pages)
            .save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            debug!(count = warnings.len(), "PDF writer reported warnings");
        }
        bytes
    }

    fn flow(&mut self, text: &str, font: Font, size: f32, indent: f32) {
        let max = self.max_chars(font, size, indent);
        for line in wrap(&sanitize(text), max) {
            self.emit(&line, font, size, indent);
        }
    }

    fn max_chars(&self, font: Font, size: f32, indent: f32) -> usize {
        let usable = self.page_width - 2.0 * self.margin - indent;
        ((usable / (size * font.width_factor())).floor() as usize).max(1)
    }

    fn emit(&mut self, text: &str, font: Font, size: f32, indent: f32) {
        let line_height = size * LINE_SPACING;
        if self.cursor_y - line_height < self.margin {
            self.page_break();
        }
        self.cursor_y -= line_height;
        if text.is_empty() {
            return;
        }
        let builtin = font.builtin();
        self.ops.extend([
            Op::StartTextSection,
            Op::SetTextCursor {
                pos: Point {
                    x: Pt(self.margin + indent),
                    y: Pt(self.cursor_y),
                },
            },
            Op::SetFontSizeBuiltinFont {
                size: Pt(size),
                font: builtin,
            },
            Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(text.to_string())],
                font: builtin,
            },
            Op::EndTextSection,
        ]);
        self.has_content = true;
    }
}

/// Wraps an 8-bit RGB buffer for embedding.
pub(crate) fn raw_image(rgb: RgbImage) -> RawImage {
    let (width, height) = rgb.dimensions();
    RawImage {
        pixels: RawImageData::U8(rgb.into_raw()),
        width: width as usize,
        height: height as usize,
        data_format: RawImageFormat::RGB8,
        tag: Vec::new(),
    }
}

pub(crate) fn pt_to_mm(pt: f32) -> f32 {
    pt * 25.4 / 72.0
}

/// Greedy word wrap to at most `max_chars` characters per line. Words longer
/// than a line are split.
pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word = word;
        let mut word_len = word.chars().count();
        while word_len > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let split = word
                .char_indices()
                .nth(max_chars)
                .map(|(i, _)| i)
                .unwrap_or(word.len());
            lines.push(word[..split].to_string());
            word = &word[split..];
            word_len -= max_chars;
        }
        if word_len == 0 {
            continue;
        }
        if current_len > 0 && current_len + 1 + word_len > max_chars {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}

/// Cuts `text` to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn chunk_chars(text: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_chars.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn sanitize(text: &str) -> String {
    text.replace('\t', "    ")
        .chars()
        .filter(|c| !c.is_control())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_respects_width() {
        let lines = wrap("the quick brown fox jumps over the lazy dog", 10);
        assert_eq!(
            lines,
            vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]
        );
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
    }

    #[test]
    fn wrap_splits_overlong_words() {
        let lines = wrap("abcdefghij xy", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij", "xy"]);
    }

    #[test]
    fn wrap_of_blank_text_is_empty() {
        assert!(wrap("   ", 20).is_empty());
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo");
    }

    #[test]
    fn sanitize_expands_tabs_and_drops_controls() {
        assert_eq!(sanitize("a\tb\u{7}c"), "a    bc");
    }

    #[test]
    fn long_text_flows_onto_more_pages() {
        let mut doc = TextDocument::new("t", &RenderConfig::default());
        for i in 0..200 {
            doc.paragraph(&format!("line {i}"));
        }
        assert!(doc.page_count() > 1);
        let bytes = doc.finish();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn empty_document_still_renders_a_page() {
        let doc = TextDocument::new("empty", &RenderConfig::default());
        assert!(!doc.has_content());
        assert!(doc.finish().starts_with(b"%PDF"));
    }
}
