//! PowerPoint decks. Slide text is pulled straight out of the slide XML parts.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use zip::ZipArchive;

use crate::config::RenderConfig;
use crate::convert::display_name;
use crate::error::ConvertError;
use crate::layout::{truncate_chars, Font, TextDocument};

const DRAWING_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const SLIDE_PREFIX: &str = "ppt/slides/slide";

/// A title page, then one page (or more, if it overflows) per slide.
pub fn presentation_to_pdf(path: &Path, render: &RenderConfig) -> Result<Vec<u8>, ConvertError> {
    let slides = read_slides(path)?;
    let name = display_name(path);
    let mut doc = TextDocument::new(&name, render);

    doc.paragraph(&format!("PowerPoint: {name}"));
    for (index, lines) in slides.iter().enumerate() {
        doc.page_break();
        doc.styled(&format!("Slide {}", index + 1), Font::Bold, 0.0);
        doc.spacer(doc.font_size() * 0.5);
        for line in lines {
            doc.paragraph(&truncate_chars(line, render.max_line_chars));
        }
    }
    Ok(doc.finish())
}

/// Text lines of every slide, in slide order.
pub fn read_slides(path: &Path) -> Result<Vec<Vec<String>>, ConvertError> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file).map_err(|e| ConvertError::parse("PPTX", e))?;

    let mut slide_parts: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    slide_parts.sort();

    let mut slides = Vec::with_capacity(slide_parts.len());
    for (_, part) in slide_parts {
        let mut xml = String::new();
        archive
            .by_name(&part)
            .map_err(|e| ConvertError::parse("PPTX", e))?
            .read_to_string(&mut xml)?;
        slides.push(slide_lines(&xml)?);
    }
    Ok(slides)
}

// `ppt/slides/slide12.xml` → 12. Relationship parts live under `_rels/` and don't match.
fn slide_number(part: &str) -> Option<u32> {
    part.strip_prefix(SLIDE_PREFIX)?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

fn slide_lines(xml: &str) -> Result<Vec<String>, ConvertError> {
    let doc = roxmltree::Document::parse(xml).map_err(|e| ConvertError::parse("PPTX slide", e))?;
    let lines = doc
        .descendants()
        .filter(|node| node.has_tag_name((DRAWING_NS, "p")))
        .map(|para| {
            para.descendants()
                .filter(|node| node.has_tag_name((DRAWING_NS, "t")))
                .filter_map(|node| node.text())
                .collect::<String>()
        })
        .filter(|line| !line.trim().is_empty())
        .collect();
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slide_numbers_parse_numerically() {
        assert_eq!(slide_number("ppt/slides/slide1.xml"), Some(1));
        assert_eq!(slide_number("ppt/slides/slide12.xml"), Some(12));
        assert_eq!(slide_number("ppt/slides/_rels/slide1.xml.rels"), None);
        assert_eq!(slide_number("ppt/slideLayouts/slideLayout1.xml"), None);
    }

    #[test]
    fn extracts_paragraph_text() {
        let xml = r#"<p:sld xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">
  <p:cSld><p:spTree><p:sp><p:txBody>
    <a:p><a:r><a:t>Hello </a:t></a:r><a:r><a:t>world</a:t></a:r></a:p>
    <a:p></a:p>
    <a:p><a:r><a:t>Second line</a:t></a:r></a:p>
  </p:txBody></p:sp></p:spTree></p:cSld>
</p:sld>"#;
        assert_eq!(
            slide_lines(xml).unwrap(),
            vec!["Hello world".to_string(), "Second line".to_string()]
        );
    }
}
