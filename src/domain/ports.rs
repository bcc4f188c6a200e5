use crate::domain::model::{AnalysisReport, ColumnMapping, RecordSet};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn cutoff(&self) -> Result<NaiveDate>;
    fn digits(&self) -> usize;
    fn columns(&self) -> ColumnMapping;
    fn delimiter(&self) -> u8;
    /// Extra chrono formats tried after RFC 3339; empty means the built-in list.
    fn date_formats(&self) -> &[String];
    fn output_formats(&self) -> &[String];
    fn compress(&self) -> bool;
    fn top_changes(&self) -> usize;
    fn top_improved(&self) -> usize;

    fn comparison_filename(&self) -> String {
        format!("cambio_hhi_dominios_{}digitos.csv", self.digits())
    }

    fn bundle_filename(&self) -> String {
        "hhi_output.zip".to_string()
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RecordSet>;
    async fn transform(&self, data: RecordSet) -> Result<AnalysisReport>;
    async fn load(&self, report: AnalysisReport) -> Result<String>;
}
