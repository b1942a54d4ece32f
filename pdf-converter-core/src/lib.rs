#![doc = "pdf-converter-core: core logic library for pdf-converter."]

//! This crate holds everything that is not terminal glue: the data model, the
//! extension classifier, the directory scanner, the output naming policy, the
//! per-format converters and the run pipeline that ties them together.
//!
//! # Usage
//! Build a [`contract::ConversionJob`], hand it to [`pipeline::prepare`] and run
//! the resulting plan with [`pipeline::execute`] (or [`combine::combine_files`]
//! for a single merged PDF).

pub mod classify;
pub mod combine;
pub mod config;
pub mod contract;
pub mod convert;
pub mod error;
pub mod layout;
pub mod naming;
pub mod pipeline;
pub mod scan;

pub use config::RenderConfig;
pub use contract::{
    Category, ConversionJob, ConversionResult, ConversionStatus, Converter, FileEntry,
    PlannedConversion, RunSummary, StructureMode,
};
pub use convert::DefaultConverter;
pub use error::{ConfigError, ConvertError, RunError};
