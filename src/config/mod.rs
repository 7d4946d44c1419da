pub mod cli;
pub mod toml_config;

use crate::utils::error::Result;
use crate::utils::validation::{is_remote_location, validate_file_extension, validate_location};

#[cfg(feature = "cli")]
use crate::core::{ConfigProvider, OutputFormat};
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_one_of, validate_path, validate_positive_number, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_ARCHIVE_NAME: &str = "election_output.zip";

/// Checks each configured source location; local demographic files must be JSON or CSV.
pub fn validate_sources(
    parties: Option<&str>,
    officeholders: Option<&str>,
    demographics: Option<&str>,
    regions: Option<&str>,
) -> Result<()> {
    for (field, location) in [
        ("sources.parties", parties),
        ("sources.officeholders", officeholders),
        ("sources.demographics", demographics),
        ("sources.regions", regions),
    ] {
        if let Some(location) = location {
            validate_location(field, location)?;
        }
    }

    if let Some(location) = demographics.filter(|l| !is_remote_location(l)) {
        validate_file_extension("sources.demographics", location, &["json", "csv"])?;
    }
    Ok(())
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "senkyo-sim")]
#[command(about = "Seeded simulator of single-member district elections and coalition building")]
pub struct CliConfig {
    #[arg(long, help = "Party roster JSON (path or http(s) URL)")]
    pub parties: Option<String>,

    #[arg(long, help = "Officeholder names, one per line")]
    pub officeholders: Option<String>,

    #[arg(long, help = "Prefecture demographics (JSON or CSV)")]
    pub demographics: Option<String>,

    #[arg(long, help = "Region seat table (TOML or JSON)")]
    pub regions: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value = "1")]
    pub runs: usize,

    #[arg(long, value_delimiter = ',', default_value = "json")]
    pub formats: Vec<String>,

    #[arg(long, help = "Bundle outputs into election_output.zip")]
    pub compress: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log phase timings and resource usage")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn party_roster(&self) -> Option<&str> {
        self.parties.as_deref()
    }

    fn officeholders(&self) -> Option<&str> {
        self.officeholders.as_deref()
    }

    fn demographics(&self) -> Option<&str> {
        self.demographics.as_deref()
    }

    fn region_table(&self) -> Option<&str> {
        self.regions.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn archive_name(&self) -> Option<&str> {
        self.compress.then_some(DEFAULT_ARCHIVE_NAME)
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn runs(&self) -> usize {
        self.runs
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("output_path", &self.output_path)?;
        validate_positive_number("runs", self.runs, 1)?;
        validate_one_of("formats", &self.formats, &OutputFormat::NAMES)?;
        validate_sources(
            self.parties.as_deref(),
            self.officeholders.as_deref(),
            self.demographics.as_deref(),
            self.regions.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sources() {
        assert!(validate_sources(None, None, None, None).is_ok());
        assert!(validate_sources(
            Some("data/parties.json"),
            Some("https://example.com/officeholders.txt"),
            Some("data/prefectures.csv"),
            Some("data/regions.toml"),
        )
        .is_ok());
        assert!(validate_sources(None, None, Some("data/prefectures.xlsx"), None).is_err());
        assert!(validate_sources(None, None, Some("https://example.com/pref"), None).is_ok());
        assert!(validate_sources(Some("https://"), None, None, None).is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_defaults() {
        let config = CliConfig::parse_from(["senkyo-sim"]);
        assert_eq!(config.output_path, "./output");
        assert_eq!(config.runs, 1);
        assert_eq!(config.formats, vec!["json".to_string()]);
        assert_eq!(config.archive_name(), None);
        assert!(config.validate().is_ok());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_flags() {
        let config = CliConfig::parse_from([
            "senkyo-sim",
            "--parties",
            "data/parties.json",
            "--seed",
            "7",
            "--runs",
            "3",
            "--formats",
            "json,csv,tsv",
            "--compress",
        ]);
        assert_eq!(config.party_roster(), Some("data/parties.json"));
        assert_eq!(config.seed(), Some(7));
        assert_eq!(config.output_formats().len(), 3);
        assert_eq!(config.archive_name(), Some(DEFAULT_ARCHIVE_NAME));
        assert!(config.validate().is_ok());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_validation_failures() {
        let config = CliConfig::parse_from(["senkyo-sim", "--runs", "0"]);
        assert!(config.validate().is_err());
        let config = CliConfig::parse_from(["senkyo-sim", "--formats", "json,xml"]);
        assert!(config.validate().is_err());
    }
}
