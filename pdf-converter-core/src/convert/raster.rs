//! Raster images to a single-page PDF.

use std::path::Path;

use printpdf::{Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Pt, XObjectTransform};

use crate::config::RenderConfig;
use crate::convert::display_name;
use crate::error::ConvertError;
use crate::layout::{pt_to_mm, raw_image};

/// Decodes `path`, flattens it to RGB and embeds it on a page sized to the
/// image at `render.image_dpi`.
pub fn image_to_pdf(path: &Path, render: &RenderConfig) -> Result<Vec<u8>, ConvertError> {
    let decoded = image::open(path).map_err(|e| ConvertError::Decode(e.to_string()))?;
    let rgb = decoded.to_rgb8();
    let (width_px, height_px) = rgb.dimensions();
    if width_px == 0 || height_px == 0 {
        return Err(ConvertError::Decode("image has no pixels".into()));
    }

    let dpi = if render.image_dpi > 0.0 { render.image_dpi } else { 100.0 };
    let width_pt = width_px as f32 * 72.0 / dpi;
    let height_pt = height_px as f32 * 72.0 / dpi;

    let mut doc = PdfDocument::new(&display_name(path));
    let id = doc.add_image(&raw_image(rgb));
    let page = PdfPage::new(
        Mm(pt_to_mm(width_pt)),
        Mm(pt_to_mm(height_pt)),
        vec![Op::UseXobject {
            id,
            transform: XObjectTransform {
                translate_x: Some(Pt(0.0)),
                translate_y: Some(Pt(0.0)),
                dpi: Some(dpi),
                ..Default::default()
            },
        }],
    );

    let mut warnings = Vec::new();
    Ok(doc
        .with_pages(vec![page])
        .save(&PdfSaveOptions::default(), &mut warnings))
}
