use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ConfigError;

/// Paper size used for every generated text page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

impl PageSize {
    /// Width and height in points.
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
        }
    }
}

/// Rendering limits and page geometry shared by all converters.
///
/// Defaults reproduce the behaviour of earlier releases: A4 pages, spreadsheets
/// truncated to 50 rows by 10 columns, long lines cut at 80 characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub page_size: PageSize,
    pub font_size: f32,
    pub margin_mm: f32,
    pub image_dpi: f32,
    pub max_rows: usize,
    pub max_columns: usize,
    pub max_line_chars: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            font_size: 11.0,
            margin_mm: 20.0,
            image_dpi: 100.0,
            max_rows: 50,
            max_columns: 10,
            max_line_chars: 80,
        }
    }
}

impl RenderConfig {
    pub fn margin_pt(&self) -> f32 {
        self.margin_mm * 72.0 / 25.4
    }

    /// Rejects values that would put text off the page or leave no usable width.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("font_size", self.font_size),
            ("image_dpi", self.image_dpi),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if self.margin_mm.is_nan() || self.margin_mm < 0.0 {
            return Err(ConfigError::Negative {
                field: "margin_mm",
                value: self.margin_mm,
            });
        }
        let (width_pt, height_pt) = self.page_size.dimensions_pt();
        let usable_pt = width_pt.min(height_pt) - 2.0 * self.margin_pt();
        if usable_pt < self.font_size * 2.0 {
            return Err(ConfigError::MarginTooLarge {
                margin_mm: self.margin_mm,
                width_mm: width_pt * 25.4 / 72.0,
            });
        }
        for (field, value) in [
            ("max_rows", self.max_rows),
            ("max_columns", self.max_columns),
            ("max_line_chars", self.max_line_chars),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroLimit(field));
            }
        }
        Ok(())
    }

    pub fn trace_loaded(&self) {
        info!(
            page_size = ?self.page_size,
            max_rows = self.max_rows,
            max_columns = self.max_columns,
            "Loaded render config"
        );
        debug!(?self, "Render config loaded (full debug)");
    }
}
