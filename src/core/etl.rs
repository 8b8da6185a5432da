use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use chrono::Utc;

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

    pub async fn run(&self) -> Result<String> {
        let started_at = Utc::now();
        tracing::info!("Starting ETL process at {}", started_at.to_rfc3339());
        self.monitor.log_stats("Start");

        // Extract
        let tables = self.pipeline.extract().await?;
        self.monitor.log_stats("Extract");

        // Transform
        let result = self.pipeline.transform(tables).await?;
        let stats = result.stats;
        self.monitor.log_stats("Transform");

        // Load
        let output_path = self.pipeline.load(result).await?;
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        let elapsed = Utc::now() - started_at;
        tracing::info!(
            "ETL finished in {} ms: {} routes read, {} with distance, {} dropped",
            elapsed.num_milliseconds(),
            stats.routes_read,
            stats.matched,
            stats.dropped
        );

        Ok(output_path)
    }
}
