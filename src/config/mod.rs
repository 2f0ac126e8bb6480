pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::{ExtractionMode, ReportFormat};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::logger::LogFormat;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use toml_config::TallyConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "survey-tally")]
#[command(about = "Rank cave survey participants by the leg length they explored and surveyed")]
pub struct CliConfig {
    /// TMLU survey files to read, in order
    pub paths: Vec<String>,

    /// How names are pulled out of EX text
    #[arg(long, value_enum)]
    pub mode: Option<ExtractionMode>,

    /// Report format
    #[arg(long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the config file if any, then lets command-line values win.
    pub fn into_config(self) -> Result<TallyConfig> {
        let mut config = TallyConfig::load(self.config.as_deref())?;

        if !self.paths.is_empty() {
            config.input.files = self.paths;
        }
        if let Some(mode) = self.mode {
            config.extract.mode = mode;
        }
        if let Some(format) = self.format {
            config.report.format = format;
        }
        if let Some(output) = self.output {
            config.report.output = Some(output);
        }

        Ok(config)
    }
}
