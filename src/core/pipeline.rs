use crate::core::names::NameParser;
use crate::core::{report, survey};
use crate::core::{ConfigProvider, LegRecord, Pipeline, Storage};
use crate::domain::model::{Role, Tally};
use crate::utils::error::{Result, TallyError};
use crate::utils::validation::validate_path;

/// Per-participant length tally over every configured input file.
pub struct TallyPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    parser: NameParser,
}

impl<S: Storage, C: ConfigProvider> TallyPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let parser = NameParser::new(config.extraction_mode())?;
        tracing::debug!("Name extraction mode: {:?}", parser.mode());
        Ok(Self {
            storage,
            config,
            parser,
        })
    }
}

/// Reads and parses one file. Every failure comes back as `FileLoad`.
pub async fn read_legs<S: Storage>(storage: &S, path: &str) -> Result<Vec<LegRecord>> {
    validate_path("input.files", path).map_err(|e| TallyError::file_load(path, e))?;

    let bytes = storage.read_file(path).await.map_err(|e| match e {
        TallyError::IoError(io) => TallyError::file_load(path, io),
        other => TallyError::file_load(path, other),
    })?;
    survey::load_legs(path, &bytes)
}

/// Credits one leg's length to every named explorer and surveyor.
///
/// Legs without names or without an `LG` sibling add nothing. An unparsable
/// length is returned as an error and nothing is added for either role.
pub fn tally_leg(parser: &NameParser, tally: &mut Tally, leg: &LegRecord) -> Result<()> {
    let credited: Vec<(Role, Vec<String>)> = Role::ALL
        .into_iter()
        .map(|role| (role, parser.names(&leg.text, role)))
        .filter(|(_, names)| !names.is_empty())
        .collect();
    if credited.is_empty() {
        return Ok(());
    }

    let Some(raw) = leg.length_text() else {
        return Ok(());
    };
    let length = survey::parse_length(&leg.source, raw)?;

    for (role, names) in credited {
        let totals = tally.totals_mut(role);
        for name in names {
            totals.add(&name, length);
        }
    }
    Ok(())
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for TallyPipeline<S, C> {
    type Summary = Tally;

    async fn extract(&self) -> Result<Vec<LegRecord>> {
        let mut legs = Vec::new();

        // Files are read in argument order; a bad file is logged and skipped
        for path in self.config.input_files() {
            tracing::debug!("Loading survey file: {}", path);
            match read_legs(&self.storage, path).await {
                Ok(found) => {
                    tracing::debug!("Found {} legs in {}", found.len(), path);
                    legs.extend(found);
                }
                Err(e) if e.is_recoverable() => tracing::warn!("{}", e),
                Err(e) => return Err(e),
            }
        }

        Ok(legs)
    }

    async fn transform(&self, legs: Vec<LegRecord>) -> Result<Tally> {
        let mut tally = Tally::new();

        // Unparsable lengths drop that leg only
        for leg in &legs {
            if let Err(e) = tally_leg(&self.parser, &mut tally, leg) {
                if !e.is_recoverable() {
                    return Err(e);
                }
                tracing::warn!("{}", e);
            }
        }

        tracing::debug!(
            "Tallied {} explorers and {} surveyors",
            tally.explorers.len(),
            tally.surveyors.len()
        );
        Ok(tally)
    }

    async fn load(&self, tally: Tally) -> Result<String> {
        let rendered = report::render(&tally.report(), self.config.report_format())?;

        // Write the output file when one is configured
        if let Some(output) = self.config.output_path() {
            self.storage.write_file(output, rendered.as_bytes()).await?;
            tracing::info!("Report written to {}", output);
        }

        Ok(rendered)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::toml_config::TallyConfig;
    use crate::domain::model::{ExtractionMode, ReportFormat};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    pub(crate) struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        pub(crate) async fn with_files(files: &[(&str, &str)]) -> Self {
            let storage = Self::default();
            {
                let mut map = storage.files.lock().await;
                for (path, content) in files {
                    map.insert(path.to_string(), content.as_bytes().to_vec());
                }
            }
            storage
        }

        pub(crate) async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                TallyError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    pub(crate) fn survey_xml(legs: &[(&str, &[&str])]) -> String {
        let mut xml = String::from("<?xml version=\"1.0\"?>\n<CaveFile><Data>\n");
        for (ex, lengths) in legs {
            xml.push_str("<SRVD>");
            xml.push_str(&format!("<EX><![CDATA[{}]]></EX>", ex));
            for lg in *lengths {
                xml.push_str(&format!("<LG>{}</LG>", lg));
            }
            xml.push_str("</SRVD>\n");
        }
        xml.push_str("</Data></CaveFile>\n");
        xml
    }

    fn config(files: &[&str]) -> TallyConfig {
        let mut config = TallyConfig::default();
        config.input.files = files.iter().map(|f| f.to_string()).collect();
        config
    }

    async fn run_tally(storage: MockStorage, config: TallyConfig) -> Tally {
        let pipeline = TallyPipeline::new(storage, config).unwrap();
        let legs = pipeline.extract().await.unwrap();
        pipeline.transform(legs).await.unwrap()
    }

    #[tokio::test]
    async fn test_single_leg_credits_every_participant() {
        let xml = survey_xml(&[(
            "<Explorer>Alice, Bob</Explorer><Surveyor>Carol</Surveyor>",
            &["150.5"],
        )]);
        let storage = MockStorage::with_files(&[("cave.tmlu", &xml)]).await;

        let tally = run_tally(storage, config(&["cave.tmlu"])).await;

        assert_eq!(tally.explorers.get("Alice"), Some(150.5));
        assert_eq!(tally.explorers.get("Bob"), Some(150.5));
        assert_eq!(tally.surveyors.get("Carol"), Some(150.5));
        assert_eq!(tally.explorers.get("Carol"), None);
    }

    #[tokio::test]
    async fn test_totals_accumulate_across_files() {
        let first = survey_xml(&[("<Explorer>Alice</Explorer>", &["10"])]);
        let second = survey_xml(&[("<Explorer>Alice</Explorer><Surveyor>Alice</Surveyor>", &["2.5"])]);
        let storage =
            MockStorage::with_files(&[("a.tmlu", &first), ("b.tmlu", &second)]).await;

        let tally = run_tally(storage, config(&["a.tmlu", "b.tmlu"])).await;

        assert_eq!(tally.explorers.get("Alice"), Some(12.5));
        assert_eq!(tally.surveyors.get("Alice"), Some(2.5));
    }

    #[tokio::test]
    async fn test_malformed_length_skips_only_that_leg() {
        let xml = survey_xml(&[
            ("<Explorer>Alice</Explorer><Surveyor>Bob</Surveyor>", &["abc"]),
            ("<Explorer>Alice</Explorer><Surveyor>Bob</Surveyor>", &["4.0"]),
        ]);
        let storage = MockStorage::with_files(&[("cave.tmlu", &xml)]).await;

        let tally = run_tally(storage, config(&["cave.tmlu"])).await;

        assert_eq!(tally.explorers.get("Alice"), Some(4.0));
        assert_eq!(tally.surveyors.get("Bob"), Some(4.0));
    }

    #[tokio::test]
    async fn test_leg_without_length_contributes_nothing() {
        let xml = survey_xml(&[("<Explorer>Alice</Explorer>", &[])]);
        let storage = MockStorage::with_files(&[("cave.tmlu", &xml)]).await;

        let tally = run_tally(storage, config(&["cave.tmlu"])).await;

        assert!(tally.explorers.is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_and_malformed_files_are_skipped() {
        let good = survey_xml(&[("<Explorer>Alice</Explorer>", &["7"])]);
        let storage = MockStorage::with_files(&[
            ("broken.tmlu", "<CaveFile><SRVD>"),
            ("good.tmlu", &good),
        ])
        .await;

        let tally = run_tally(
            storage,
            config(&["missing.tmlu", "broken.tmlu", "good.tmlu"]),
        )
        .await;

        assert_eq!(tally.explorers.get("Alice"), Some(7.0));
        assert_eq!(tally.explorers.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_path_is_skipped_like_an_unreadable_file() {
        let good = survey_xml(&[("<Explorer>Bob</Explorer>", &["2"])]);
        let storage = MockStorage::with_files(&[("good.tmlu", good.as_str())]).await;

        let err = read_legs(&storage, "").await.unwrap_err();
        assert!(matches!(err, TallyError::FileLoad { .. }));

        let tally = run_tally(storage, config(&["", "good.tmlu"])).await;
        assert_eq!(tally.explorers.get("Bob"), Some(2.0));
    }

    #[tokio::test]
    async fn test_repeated_name_on_one_leg_counts_twice() {
        let xml = survey_xml(&[("<Explorer>Alice, Alice,</Explorer>", &["3"])]);
        let storage = MockStorage::with_files(&[("cave.tmlu", &xml)]).await;

        let tally = run_tally(storage, config(&["cave.tmlu"])).await;

        assert_eq!(tally.explorers.get("Alice"), Some(6.0));
        assert_eq!(tally.explorers.get(""), Some(3.0));
    }

    #[tokio::test]
    async fn test_first_occurrence_mode_is_selectable() {
        let xml = survey_xml(&[(
            "<Explorer>Alice</Explorer> <Explorer>Bob</Explorer>",
            &["5"],
        )]);
        let storage = MockStorage::with_files(&[("cave.tmlu", &xml)]).await;
        let mut cfg = config(&["cave.tmlu"]);
        cfg.extract.mode = ExtractionMode::FirstOccurrence;

        let tally = run_tally(storage, cfg).await;

        assert_eq!(tally.explorers.get("Alice"), Some(5.0));
        assert_eq!(tally.explorers.get("Bob"), None);
    }

    #[test]
    fn test_tally_leg_reports_length_error() {
        let parser = NameParser::new(ExtractionMode::Pattern).unwrap();
        let mut tally = Tally::new();
        let leg = LegRecord {
            source: "cave.tmlu".to_string(),
            text: "<Explorer>Alice</Explorer>".to_string(),
            lengths: vec!["12,5".to_string()],
        };

        let err = tally_leg(&parser, &mut tally, &leg).unwrap_err();

        assert!(matches!(err, TallyError::LengthParse { .. }));
        assert!(tally.explorers.is_empty());
    }

    #[tokio::test]
    async fn test_load_renders_and_writes_output() {
        let xml = survey_xml(&[("<Explorer>Alice</Explorer>", &["1.25"])]);
        let storage = MockStorage::with_files(&[("cave.tmlu", &xml)]).await;
        let mut cfg = config(&["cave.tmlu"]);
        cfg.report.format = ReportFormat::Csv;
        cfg.report.output = Some("report.csv".to_string());

        let pipeline = TallyPipeline::new(storage.clone(), cfg).unwrap();
        let legs = pipeline.extract().await.unwrap();
        let tally = pipeline.transform(legs).await.unwrap();
        let rendered = pipeline.load(tally).await.unwrap();

        assert!(rendered.contains("explorer,Alice,1.250000"));
        let written = storage.get_file("report.csv").await.unwrap();
        assert_eq!(String::from_utf8(written).unwrap(), rendered);
    }
}
