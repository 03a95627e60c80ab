use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct MenuEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> MenuEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting menu export");

        tracing::info!("Fetching menu snapshot...");
        let snapshot = self.pipeline.extract().await?;

        tracing::info!("Building menu view...");
        let export = self.pipeline.transform(snapshot).await?;

        tracing::info!("Writing export bundle...");
        let output_path = self.pipeline.load(export).await?;

        tracing::info!(
            "Export saved to {} in {:?}",
            output_path,
            started.elapsed()
        );
        Ok(output_path)
    }
}
