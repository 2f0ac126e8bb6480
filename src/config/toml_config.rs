use crate::core::ConfigProvider;
use crate::domain::model::{ExtractionMode, ReportFormat};
use crate::utils::error::{Result, TallyError};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_required_field, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_FILTER_FILE: &str = "survey.tmlu";

/// Settings shared by both binaries. Every section is optional in the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TallyConfig {
    pub input: InputConfig,
    pub extract: ExtractConfig,
    pub report: ReportConfig,
    pub filter: FilterConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub mode: ExtractionMode,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub format: ReportFormat,
    pub output: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub file: String,
    pub needle: Option<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            file: DEFAULT_FILTER_FILE.to_string(),
            needle: None,
        }
    }
}

impl TallyConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| TallyError::ConfigError {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Loads `path` when given, defaults otherwise.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path);
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Needle for the substring-filter run; absent or empty is an error.
    pub fn require_needle(&self) -> Result<&str> {
        let needle = validate_required_field("filter.needle", &self.filter.needle)?;
        validate_non_empty_string("filter.needle", needle)?;
        Ok(needle)
    }
}

impl Validate for TallyConfig {
    // Input paths are checked per file while extracting, so one bad entry
    // only skips that file.
    fn validate(&self) -> Result<()> {
        if let Some(output) = &self.report.output {
            validate_path("report.output", output)?;
        }
        validate_path("filter.file", &self.filter.file)?;
        if let Some(needle) = &self.filter.needle {
            validate_non_empty_string("filter.needle", needle)?;
        }
        Ok(())
    }
}

impl ConfigProvider for TallyConfig {
    fn input_files(&self) -> &[String] {
        &self.input.files
    }

    fn extraction_mode(&self) -> ExtractionMode {
        self.extract.mode
    }

    fn report_format(&self) -> ReportFormat {
        self.report.format
    }

    fn output_path(&self) -> Option<&str> {
        self.report.output.as_deref()
    }

    fn filter_file(&self) -> &str {
        &self.filter.file
    }

    fn filter_needle(&self) -> Option<&str> {
        self.filter.needle.as_deref()
    }
}
