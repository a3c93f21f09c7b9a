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

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting preprocessing run");

        tracing::info!("Extracting raw table...");
        let table = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} rows x {} columns",
            table.row_count(),
            table.column_count()
        );
        self.monitor.log_stats("Extract");

        tracing::info!("Transforming table...");
        let result = self.pipeline.transform(table).await?;
        let report = &result.report;
        tracing::info!(
            "Transformed {} rows: {} -> {} columns, dropped {:?}, filled {} cells, zeroed {} charges, encoded {} categorical columns",
            report.rows,
            report.columns_in,
            report.columns_out,
            report.dropped_columns,
            report.filled_cells,
            report.coerced_to_zero,
            report.encoded.len()
        );
        self.monitor.log_stats("Transform");

        tracing::info!("Loading outputs...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
