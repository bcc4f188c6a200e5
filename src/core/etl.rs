use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Extract, transform and load once. Returns where the main artifact was written.
    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting HHI comparison run");

        tracing::info!("Extracting records...");
        let records = self.pipeline.extract().await?;
        self.monitor.log_stage("extract", records.records.len());

        tracing::info!("Computing concentration indices...");
        let report = self.pipeline.transform(records).await?;
        self.monitor.log_stage("transform", report.comparison.len());

        tracing::info!("Writing results...");
        let output_path = self.pipeline.load(report).await?;
        self.monitor.log_stage("load", 1);
        self.monitor.log_final_stats();

        tracing::info!("Output saved to: {}", output_path);
        Ok(output_path)
    }
}
