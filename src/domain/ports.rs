use crate::domain::model::{ExtractionMode, LegRecord, ReportFormat};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_files(&self) -> &[String];
    fn extraction_mode(&self) -> ExtractionMode;
    fn report_format(&self) -> ReportFormat;
    fn output_path(&self) -> Option<&str>;
    fn filter_file(&self) -> &str;
    fn filter_needle(&self) -> Option<&str>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    type Summary: Send;

    async fn extract(&self) -> Result<Vec<LegRecord>>;
    async fn transform(&self, legs: Vec<LegRecord>) -> Result<Self::Summary>;
    async fn load(&self, summary: Self::Summary) -> Result<String>;
}
