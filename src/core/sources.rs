//! Loading of the four external inputs. Every loader fails open: a missing,
//! unreachable or malformed source is logged and replaced by its default.

use crate::core::universe::{default_region_table, fallback_roster};
use crate::domain::model::{PartyRecord, SimulationInputs};
use crate::domain::ports::ConfigProvider;
use crate::domain::region::{DemographicTable, PrefectureProfile, RegionSeats};
use crate::utils::error::{Result, SimError};
use crate::utils::validation::{is_remote_location, validate_non_empty_string, validate_range};
use reqwest::Client;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};

const ROSTER: &str = "party roster";
const OFFICEHOLDERS: &str = "officeholder list";
const DEMOGRAPHICS: &str = "demographic table";
const REGIONS: &str = "region table";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Csv,
}

impl DataFormat {
    /// By extension when there is one, otherwise by the first non-blank character.
    pub fn detect(location: &str, content: &str) -> Self {
        let lower = location.to_ascii_lowercase();
        if lower.ends_with(".csv") {
            return DataFormat::Csv;
        }
        if lower.ends_with(".json") {
            return DataFormat::Json;
        }
        match content.trim_start().chars().next() {
            Some('[') | Some('{') => DataFormat::Json,
            _ => DataFormat::Csv,
        }
    }
}

fn malformed(source_name: &str, message: impl Into<String>) -> SimError {
    SimError::MalformedSourceError {
        source_name: source_name.to_string(),
        message: message.into(),
    }
}

pub fn parse_party_roster(content: &str) -> Result<Vec<PartyRecord>> {
    let records: Vec<PartyRecord> =
        serde_json::from_str(content).map_err(|e| malformed(ROSTER, e.to_string()))?;
    if records.is_empty() {
        return Err(malformed(ROSTER, "roster lists no parties"));
    }
    for (index, record) in records.iter().enumerate() {
        validate_non_empty_string(&format!("parties[{}].name", index), &record.name)
            .and_then(|_| {
                validate_range(
                    &format!("parties[{}].popularity", index),
                    record.popularity,
                    0,
                    100,
                )
            })
            .map_err(|e| malformed(ROSTER, e.to_string()))?;
    }
    Ok(records)
}

/// One name per line; blank lines and `#` comments are skipped.
pub fn parse_officeholders(content: &str) -> HashSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Deserialize)]
struct ProfileFields {
    income: u32,
    primary: f64,
    secondary: f64,
    tertiary: f64,
    elderly: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DemographicsDocument {
    List(Vec<PrefectureProfile>),
    ByName(BTreeMap<String, ProfileFields>),
}

pub fn parse_demographics(content: &str, format: DataFormat) -> Result<Vec<PrefectureProfile>> {
    let profiles = match format {
        DataFormat::Json => {
            let document: DemographicsDocument =
                serde_json::from_str(content).map_err(|e| malformed(DEMOGRAPHICS, e.to_string()))?;
            match document {
                DemographicsDocument::List(profiles) => profiles,
                DemographicsDocument::ByName(by_name) => by_name
                    .into_iter()
                    .map(|(name, f)| PrefectureProfile {
                        name,
                        income: f.income,
                        primary: f.primary,
                        secondary: f.secondary,
                        tertiary: f.tertiary,
                        elderly: f.elderly,
                    })
                    .collect(),
            }
        }
        DataFormat::Csv => {
            let mut reader = csv::ReaderBuilder::new()
                .trim(csv::Trim::All)
                .from_reader(content.as_bytes());
            reader
                .deserialize::<PrefectureProfile>()
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| malformed(DEMOGRAPHICS, e.to_string()))?
        }
    };

    for profile in &profiles {
        for (field, value) in [
            ("primary", profile.primary),
            ("secondary", profile.secondary),
            ("tertiary", profile.tertiary),
            ("elderly", profile.elderly),
        ] {
            validate_range(&format!("{}.{}", profile.name, field), value, 0.0, 100.0)
                .map_err(|e| malformed(DEMOGRAPHICS, e.to_string()))?;
        }
    }
    Ok(profiles)
}

#[derive(Debug, Deserialize)]
struct RegionTableDocument {
    regions: Vec<RegionSeats>,
}

/// TOML `[[regions]]` tables, or a JSON array of `{name, seats}`.
pub fn parse_region_table(content: &str) -> Result<Vec<RegionSeats>> {
    let regions = match toml::from_str::<RegionTableDocument>(content) {
        Ok(document) => document.regions,
        Err(toml_error) => serde_json::from_str::<Vec<RegionSeats>>(content).map_err(|_| {
            malformed(REGIONS, format!("neither TOML nor JSON: {}", toml_error))
        })?,
    };
    if regions.is_empty() {
        return Err(malformed(REGIONS, "table lists no regions"));
    }
    Ok(regions)
}

pub struct SourceLoader {
    client: Client,
}

impl SourceLoader {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Raw text of a source, over HTTP for http(s) locations, from disk otherwise.
    pub async fn fetch_text(&self, source_name: &str, location: &str) -> Result<String> {
        if is_remote_location(location) {
            tracing::debug!("Fetching {} from {}", source_name, location);
            let response = self.client.get(location).send().await?;
            if !response.status().is_success() {
                return Err(SimError::SourceError {
                    source_name: source_name.to_string(),
                    message: format!("{} returned {}", location, response.status()),
                });
            }
            Ok(response.text().await?)
        } else {
            tracing::debug!("Reading {} from {}", source_name, location);
            tokio::fs::read_to_string(location)
                .await
                .map_err(|e| SimError::SourceError {
                    source_name: source_name.to_string(),
                    message: format!("{}: {}", location, e),
                })
        }
    }

    pub async fn load_inputs<C: ConfigProvider>(&self, config: &C) -> SimulationInputs {
        SimulationInputs {
            roster: self.load_party_roster(config.party_roster()).await,
            officeholders: self.load_officeholders(config.officeholders()).await,
            demographics: self.load_demographics(config.demographics()).await,
            regions: self.load_region_table(config.region_table()).await,
        }
    }

    pub async fn load_party_roster(&self, location: Option<&str>) -> Vec<PartyRecord> {
        let Some(location) = location else {
            tracing::info!("No {} configured, using the built-in two-party roster", ROSTER);
            return fallback_roster();
        };

        let loaded = match self.fetch_text(ROSTER, location).await {
            Ok(content) => parse_party_roster(&content),
            Err(e) => Err(e),
        };
        match loaded {
            Ok(records) => {
                tracing::info!("Loaded {} parties from {}", records.len(), location);
                records
            }
            Err(e) => {
                tracing::warn!("{}; using the built-in two-party roster", e);
                fallback_roster()
            }
        }
    }

    pub async fn load_officeholders(&self, location: Option<&str>) -> HashSet<String> {
        let Some(location) = location else {
            return HashSet::new();
        };
        match self.fetch_text(OFFICEHOLDERS, location).await {
            Ok(content) => {
                let names = parse_officeholders(&content);
                tracing::debug!("Loaded {} officeholder names", names.len());
                names
            }
            Err(e) => {
                tracing::debug!("{}; no names excluded", e);
                HashSet::new()
            }
        }
    }

    pub async fn load_demographics(&self, location: Option<&str>) -> DemographicTable {
        let Some(location) = location else {
            tracing::info!("No {} configured, every district uses national averages", DEMOGRAPHICS);
            return DemographicTable::empty();
        };

        let loaded = match self.fetch_text(DEMOGRAPHICS, location).await {
            Ok(content) => parse_demographics(&content, DataFormat::detect(location, &content)),
            Err(e) => Err(e),
        };
        match loaded {
            Ok(profiles) => {
                tracing::info!("Loaded {} prefecture profiles from {}", profiles.len(), location);
                DemographicTable::new(profiles)
            }
            Err(e) => {
                tracing::warn!("{}; every district uses national averages", e);
                DemographicTable::empty()
            }
        }
    }

    pub async fn load_region_table(&self, location: Option<&str>) -> Vec<RegionSeats> {
        let Some(location) = location else {
            return default_region_table();
        };

        let loaded = match self.fetch_text(REGIONS, location).await {
            Ok(content) => parse_region_table(&content),
            Err(e) => Err(e),
        };
        match loaded {
            Ok(regions) => {
                tracing::info!("Loaded {} regions from {}", regions.len(), location);
                regions
            }
            Err(e) => {
                tracing::warn!("{}; using the built-in 47-prefecture table", e);
                default_region_table()
            }
        }
    }
}

impl Default for SourceLoader {
    fn default() -> Self {
        Self::new()
    }
}
