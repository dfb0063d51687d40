use crate::core::Pipeline;
use crate::domain::model::LoadReport;
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

    pub async fn run(&self) -> Result<LoadReport> {
        tracing::info!("🚀 Starting SMS extraction...");

        // Extract
        let raw_messages = self.pipeline.extract().await?;
        tracing::info!("📥 Read {} messages from source", raw_messages.len());
        self.monitor.log_stats("Extract");

        // Transform
        let result = self.pipeline.transform(raw_messages).await?;
        tracing::info!(
            "🔄 Classified {} transactions, {} non-transactions",
            result.transactions.len(),
            result.non_transactions.len()
        );
        self.monitor.log_stats("Transform");

        // Load
        let report = self.pipeline.load(result).await?;
        tracing::info!(
            "💾 Wrote {} files to {}",
            report.files.len(),
            report.output_dir
        );
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(report)
    }
}
