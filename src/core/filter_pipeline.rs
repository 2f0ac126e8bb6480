use crate::core::pipeline::read_legs;
use crate::core::{report, survey};
use crate::core::{ConfigProvider, LegRecord, Pipeline, Storage};
use crate::domain::model::FilterSummary;
use crate::utils::error::{Result, TallyError};
use regex::Regex;

/// Matches `EX` text whose explorer span contains a literal needle.
/// The span may cross line breaks.
#[derive(Debug, Clone)]
pub struct ExplorerMatcher {
    pattern: Regex,
}

impl ExplorerMatcher {
    pub fn new(needle: &str) -> Result<Self> {
        let pattern = Regex::new(&format!(
            "(?s)<Explorer>.*?{}.*?</Explorer>",
            regex::escape(needle)
        ))?;
        Ok(Self { pattern })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Sums every `LG` of the legs credited to one explorer, in a single file.
pub struct FilterPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    matcher: ExplorerMatcher,
}

impl<S: Storage, C: ConfigProvider> FilterPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let needle = config
            .filter_needle()
            .ok_or_else(|| TallyError::MissingConfigError {
                field: "filter.needle".to_string(),
            })?;
        let matcher = ExplorerMatcher::new(needle)?;
        Ok(Self {
            storage,
            config,
            matcher,
        })
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for FilterPipeline<S, C> {
    type Summary = FilterSummary;

    async fn extract(&self) -> Result<Vec<LegRecord>> {
        let path = self.config.filter_file();
        match read_legs(&self.storage, path).await {
            Ok(legs) => Ok(legs),
            Err(e) if e.is_recoverable() => {
                tracing::warn!("{}", e);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    async fn transform(&self, legs: Vec<LegRecord>) -> Result<FilterSummary> {
        let mut summary = FilterSummary::default();

        for leg in legs {
            if !self.matcher.is_match(&leg.text) {
                continue;
            }
            tracing::debug!("Matched leg with {} length fields", leg.lengths.len());

            for raw in &leg.lengths {
                match survey::parse_length(&leg.source, raw) {
                    Ok(length) => summary.total += length,
                    Err(e) => tracing::warn!("{}", e),
                }
            }
            summary.matched_legs.push(leg.text);
        }

        Ok(summary)
    }

    async fn load(&self, summary: FilterSummary) -> Result<String> {
        let rendered = report::render_filter(&summary);

        if let Some(output) = self.config.output_path() {
            self.storage.write_file(output, rendered.as_bytes()).await?;
            tracing::info!("Summary written to {}", output);
        }

        Ok(rendered)
    }
}
