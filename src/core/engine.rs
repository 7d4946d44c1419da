use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::PhaseMonitor;
use std::time::Instant;

/// Drives a pipeline through load, simulate and write.
pub struct SimulationEngine<P: Pipeline> {
    pipeline: P,
    monitor_enabled: bool,
}

impl<P: Pipeline> SimulationEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            monitor_enabled: false,
        }
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor_enabled,
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<String> {
        let mut monitor = PhaseMonitor::new(self.monitor_enabled);
        tracing::info!("Starting election simulation...");

        // Extract
        let started = Instant::now();
        tracing::info!("Loading sources...");
        let inputs = self.pipeline.extract().await?;
        tracing::info!(
            "Loaded {} parties and {} regions",
            inputs.roster.len(),
            inputs.regions.len()
        );
        monitor.record("Sources loaded", started);

        // Transform
        let started = Instant::now();
        tracing::info!("Running elections...");
        let report = self.pipeline.transform(inputs).await?;
        tracing::info!(
            "Completed {} run(s) with seed {}: {} seats across {} districts",
            report.runs,
            report.seed,
            report.totals.seats,
            report.totals.districts
        );
        if let Some(government) = &report.government {
            tracing::info!(
                "🏛  {} holds {} of {} seats",
                government.name,
                government.seats,
                government.total_seats
            );
        }
        monitor.record("Elections simulated", started);

        // Load
        let started = Instant::now();
        tracing::info!("Writing report...");
        let output_path = self.pipeline.load(report).await?;
        tracing::info!("Output saved to: {}", output_path);
        monitor.record("Report written", started);

        monitor.log_summary();
        Ok(output_path)
    }
}
