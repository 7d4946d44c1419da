use crate::core::report::{build_report, render_districts, render_json, render_standings, OutputFormat};
use crate::core::simulation::Simulation;
use crate::core::sources::SourceLoader;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::SimulationInputs;
use crate::domain::report::ElectionReport;
use crate::utils::error::{Result, SimError};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const REPORT_FILE: &str = "report.json";
pub const STANDINGS_FILE: &str = "standings";
pub const DISTRICTS_FILE: &str = "districts";

/// Sources in, election report out, files written through `Storage`.
pub struct ElectionPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    loader: SourceLoader,
}

impl<S: Storage, C: ConfigProvider> ElectionPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            loader: SourceLoader::new(),
        }
    }

    /// Seed from the configuration, or a fresh one that ends up in the report.
    fn resolve_seed(&self) -> u64 {
        match self.config.seed() {
            Some(seed) => seed,
            None => {
                let seed = rand::random::<u64>();
                tracing::info!("No seed configured, drew {}", seed);
                seed
            }
        }
    }
}

/// Named output files for the requested formats, in request order.
/// Repeated format names are written once.
pub fn output_files(report: &ElectionReport, formats: &[String]) -> Result<Vec<(String, Vec<u8>)>> {
    let mut seen = Vec::new();
    let mut files = Vec::new();

    for name in formats {
        let format = OutputFormat::from_name(name)?;
        if seen.contains(&format) {
            continue;
        }
        seen.push(format);

        match format {
            OutputFormat::Json => files.push((REPORT_FILE.to_string(), render_json(report)?)),
            OutputFormat::Csv | OutputFormat::Tsv => {
                let ext = format.extension();
                files.push((
                    format!("{}.{}", STANDINGS_FILE, ext),
                    render_standings(report, format)?,
                ));
                files.push((
                    format!("{}.{}", DISTRICTS_FILE, ext),
                    render_districts(report, format)?,
                ));
            }
        }
    }
    Ok(files)
}

/// Bundle files into an in-memory ZIP archive.
pub fn zip_files(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, data) in files {
        zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
        zip.write_all(data)?;
    }
    Ok(zip.finish()?.into_inner())
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ElectionPipeline<S, C> {
    async fn extract(&self) -> Result<SimulationInputs> {
        let inputs = self.loader.load_inputs(&self.config).await;
        tracing::debug!(
            "Inputs: {} parties, {} officeholders, {} prefecture profiles, {} regions",
            inputs.roster.len(),
            inputs.officeholders.len(),
            inputs.demographics.len(),
            inputs.regions.len()
        );
        Ok(inputs)
    }

    async fn transform(&self, inputs: SimulationInputs) -> Result<ElectionReport> {
        let runs = self.config.runs();
        if runs == 0 {
            return Err(SimError::SimulationError {
                message: "at least one run is required".to_string(),
            });
        }

        let mut simulation = Simulation::new(inputs, self.resolve_seed());
        let results: Vec<_> = (0..runs).map(|_| simulation.run_once()).collect();
        Ok(build_report(&simulation, &results))
    }

    async fn load(&self, report: ElectionReport) -> Result<String> {
        let files = output_files(&report, self.config.output_formats())?;

        if let Some(archive) = self.config.archive_name() {
            tracing::debug!("Creating ZIP file with {} files", files.len());
            let zip_data = zip_files(&files)?;
            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.storage.write_file(archive, &zip_data).await?;
            return Ok(self.storage.location(archive));
        }

        for (name, data) in &files {
            tracing::debug!("Writing {} ({} bytes)", name, data.len());
            self.storage.write_file(name, data).await?;
        }
        Ok(self.config.output_path().to_string())
    }
}
