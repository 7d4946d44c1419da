use crate::config::{validate_sources, DEFAULT_ARCHIVE_NAME};
use crate::core::{ConfigProvider, OutputFormat};
use crate::utils::error::{Result, SimError};
use crate::utils::validation::{validate_one_of, validate_path, validate_positive_number, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub simulation: SimulationSection,
    #[serde(default)]
    pub sources: SourcesSection,
    pub output: OutputSection,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSection {
    pub name: String,
    pub description: Option<String>,
    pub seed: Option<u64>,
    pub runs: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcesSection {
    pub parties: Option<String>,
    pub officeholders: Option<String>,
    pub demographics: Option<String>,
    pub regions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    pub path: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    #[serde(default = "default_archive_name")]
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

fn default_formats() -> Vec<String> {
    vec!["json".to_string()]
}

fn default_archive_name() -> String {
    DEFAULT_ARCHIVE_NAME.to_string()
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SimError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SimError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_URL})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| SimError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Command-line values win over the file.
    pub fn apply_overrides(&mut self, seed: Option<u64>, runs: Option<usize>, monitor: bool) {
        if seed.is_some() {
            self.simulation.seed = seed;
        }
        if runs.is_some() {
            self.simulation.runs = runs;
        }
        if monitor {
            self.monitoring = Some(MonitoringConfig { enabled: true });
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("output.path", &self.output.path)?;
        validate_positive_number("simulation.runs", self.runs(), 1)?;
        validate_one_of("output.formats", &self.output.formats, &OutputFormat::NAMES)?;
        if let Some(compression) = self.output.compression.as_ref().filter(|c| c.enabled) {
            validate_path("output.compression.filename", &compression.filename)?;
        }
        validate_sources(
            self.sources.parties.as_deref(),
            self.sources.officeholders.as_deref(),
            self.sources.demographics.as_deref(),
            self.sources.regions.as_deref(),
        )
    }

    pub fn name(&self) -> &str {
        &self.simulation.name
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn party_roster(&self) -> Option<&str> {
        self.sources.parties.as_deref()
    }

    fn officeholders(&self) -> Option<&str> {
        self.sources.officeholders.as_deref()
    }

    fn demographics(&self) -> Option<&str> {
        self.sources.demographics.as_deref()
    }

    fn region_table(&self) -> Option<&str> {
        self.sources.regions.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn archive_name(&self) -> Option<&str> {
        self.output
            .compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.filename.as_str())
    }

    fn seed(&self) -> Option<u64> {
        self.simulation.seed
    }

    fn runs(&self) -> usize {
        self.simulation.runs.unwrap_or(1)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
