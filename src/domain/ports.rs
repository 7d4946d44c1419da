use crate::domain::model::SimulationInputs;
use crate::domain::report::ElectionReport;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Where a relative path ends up, for reporting back to the user.
    fn location(&self, path: &str) -> String;
}

/// Settings an election pipeline needs, independent of where they came from.
pub trait ConfigProvider: Send + Sync {
    fn party_roster(&self) -> Option<&str>;
    fn officeholders(&self) -> Option<&str>;
    fn demographics(&self) -> Option<&str>;
    fn region_table(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    /// Archive name when outputs are bundled into a ZIP, `None` for loose files.
    fn archive_name(&self) -> Option<&str>;
    fn seed(&self) -> Option<u64>;
    fn runs(&self) -> usize;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<SimulationInputs>;
    async fn transform(&self, inputs: SimulationInputs) -> Result<ElectionReport>;
    async fn load(&self, report: ElectionReport) -> Result<String>;
}
