pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::{
    etl::EtlEngine,
    pipeline::CsvPipeline,
    preprocess::{preprocess, Preprocessed, Preprocessor},
};
pub use crate::domain::model::{Cell, Column, PreprocessReport, Table};
pub use crate::domain::schema::{ColumnRole, Schema};
pub use crate::utils::error::{EtlError, Result};
