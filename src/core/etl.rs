use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Runs extract, transform and load once; returns the rendered output.
    pub async fn run(&self) -> Result<String> {
        tracing::info!("Extracting survey legs...");
        let legs = self.pipeline.extract().await?;
        tracing::info!("Extracted {} legs", legs.len());

        tracing::info!("Aggregating lengths...");
        let summary = self.pipeline.transform(legs).await?;

        tracing::info!("Rendering report...");
        self.pipeline.load(summary).await
    }
}
