//! Markdown, rendered block by block with `pulldown-cmark`.

use std::fs;
use std::path::Path;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::config::RenderConfig;
use crate::convert::display_name;
use crate::error::ConvertError;
use crate::layout::{Font, TextDocument};

const LIST_INDENT: f32 = 14.0;

pub fn markdown_to_pdf(path: &Path, render: &RenderConfig) -> Result<Vec<u8>, ConvertError> {
    let source = fs::read_to_string(path)?;
    let name = display_name(path);
    let mut doc = TextDocument::new(&name, render);
    render_markdown(&source, &mut doc);
    if !doc.has_content() {
        doc.paragraph(&format!("Converted from: {name}"));
    }
    Ok(doc.finish())
}

/// Appends the rendered `source` to `doc`.
pub(crate) fn render_markdown(source: &str, doc: &mut TextDocument) {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let mut writer = BlockWriter::new(doc);
    for event in Parser::new_ext(source, options) {
        writer.handle(event);
    }
    writer.flush();
}

struct BlockWriter<'a> {
    doc: &'a mut TextDocument,
    text: String,
    heading: Option<u8>,
    in_code_block: bool,
    list_depth: usize,
    bullet_pending: bool,
}

impl<'a> BlockWriter<'a> {
    fn new(doc: &'a mut TextDocument) -> Self {
        Self {
            doc,
            text: String::new(),
            heading: None,
            in_code_block: false,
            list_depth: 0,
            bullet_pending: false,
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                self.flush();
                self.heading = Some(heading_rank(level));
            }
            Event::End(TagEnd::Heading(_)) => self.flush(),
            Event::Start(Tag::Paragraph) => self.flush(),
            Event::End(TagEnd::Paragraph) => {
                self.flush();
                if self.list_depth == 0 {
                    let gap = self.doc.font_size() * 0.5;
                    self.doc.spacer(gap);
                }
            }
            Event::Start(Tag::List(_)) => {
                self.flush();
                self.list_depth += 1;
            }
            Event::End(TagEnd::List(_)) => {
                self.flush();
                self.list_depth = self.list_depth.saturating_sub(1);
                if self.list_depth == 0 {
                    let gap = self.doc.font_size() * 0.5;
                    self.doc.spacer(gap);
                }
            }
            Event::Start(Tag::Item) => {
                self.flush();
                self.bullet_pending = true;
            }
            Event::End(TagEnd::Item) => self.flush(),
            Event::Start(Tag::CodeBlock(_)) => {
                self.flush();
                self.in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                for line in self.text.lines() {
                    self.doc.code_line(line);
                }
                self.text.clear();
                self.in_code_block = false;
                let gap = self.doc.font_size() * 0.5;
                self.doc.spacer(gap);
            }
            Event::End(TagEnd::TableCell) => self.text.push_str(" | "),
            Event::End(TagEnd::TableHead) | Event::End(TagEnd::TableRow) => {
                let row = self.text.trim_end().trim_end_matches('|').trim_end().to_string();
                self.text.clear();
                self.doc.styled(&row, Font::Regular, 0.0);
            }
            Event::End(TagEnd::Table) => {
                let gap = self.doc.font_size() * 0.5;
                self.doc.spacer(gap);
            }
            Event::Text(text) | Event::Code(text) => self.text.push_str(&text),
            Event::SoftBreak => {
                if self.in_code_block {
                    self.text.push('\n');
                } else {
                    self.text.push(' ');
                }
            }
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.flush();
                self.doc.styled(&"_".repeat(40), Font::Regular, 0.0);
            }
            _ => {}
        }
    }

    fn flush(&mut self) {
        if self.in_code_block {
            return;
        }
        let text = self.text.trim().to_string();
        self.text.clear();
        if let Some(level) = self.heading.take() {
            if !text.is_empty() {
                self.doc.heading(&text, level);
            }
            return;
        }
        if text.is_empty() {
            return;
        }
        if self.list_depth > 0 {
            let indent = LIST_INDENT * self.list_depth as f32;
            let line = if std::mem::take(&mut self.bullet_pending) {
                format!("- {text}")
            } else {
                text
            };
            self.doc.styled(&line, Font::Regular, indent);
        } else {
            self.doc.paragraph(&text);
        }
    }
}

fn heading_rank(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
