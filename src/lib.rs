pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig};

pub use crate::core::{engine::SimulationEngine, pipeline::ElectionPipeline, Simulation};
pub use crate::utils::error::{Result, SimError};
