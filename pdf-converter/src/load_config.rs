/// `load_config` module: loads the optional YAML file that overrides rendering limits.
///
/// This module is the only place where user-supplied YAML is parsed and mapped
/// to the typed [`RenderConfig`] used by the converters.
///
/// # Responsibilities
/// - Decide which config file applies (`--config` flag, else the
///   `PDF_CONVERTER_CONFIG` environment variable, else none)
/// - Parse it into type-safe structs, rejecting unknown keys and unusable values
/// - Produce error messages that name the offending file
///
/// # Errors
/// All errors use `anyhow::Error` and are surfaced at the CLI boundary.
///
/// Accepted schema:
///
/// ```yaml
/// render:
///   page_size: a4
///   font_size: 11.0
///   margin_mm: 20.0
///   image_dpi: 100.0
///   max_rows: 50
///   max_columns: 10
///   max_line_chars: 80
/// ```
use anyhow::Result;
use pdf_converter_core::RenderConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Environment variable consulted when `--config` is not given.
pub const CONFIG_ENV_VAR: &str = "PDF_CONVERTER_CONFIG";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    #[serde(default)]
    pub render: RenderConfig,
}

/// The flag wins over the environment; an empty variable counts as unset.
pub fn resolve_config_path(flag: Option<PathBuf>) -> Option<PathBuf> {
    flag.or_else(|| {
        std::env::var_os(CONFIG_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    })
}

/// Loads and parses a YAML config file. An empty file yields the defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    if config_content.trim().is_empty() {
        info!(config_path = ?path_ref, "Config file is empty, using defaults");
        return Ok(CliConfig::default());
    }

    match serde_yaml::from_str::<CliConfig>(&config_content) {
        Ok(config) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            if let Err(e) = config.render.validate() {
                error!(error = %e, config_path = ?path_ref, "Invalid render config");
                return Err(anyhow::anyhow!(
                    "Invalid render config in {:?}: {e}",
                    path_ref
                ));
            }
            config.render.trace_loaded();
            Ok(config)
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            Err(anyhow::anyhow!(
                "Failed to parse config YAML {:?}: {e}",
                path_ref
            ))
        }
    }
}

/// Resolves the config path and loads it, falling back to defaults when there is none.
pub fn load_render_config(flag: Option<PathBuf>) -> Result<RenderConfig> {
    match resolve_config_path(flag) {
        Some(path) => Ok(load_config(path)?.render),
        None => Ok(RenderConfig::default()),
    }
}
