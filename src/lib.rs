pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use crate::config::{cli::LocalStorage, toml_config::TallyConfig};
pub use crate::core::{etl::EtlEngine, filter_pipeline::FilterPipeline, pipeline::TallyPipeline};
pub use utils::error::{Result, TallyError};
