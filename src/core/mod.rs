pub mod aggregate;
pub mod coalition;
pub mod engine;
pub mod pipeline;
pub mod report;
pub mod simulation;
pub mod sources;
pub mod universe;
pub mod voting;

pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
pub use report::{build_report, OutputFormat};
pub use simulation::{RunResult, Simulation};
