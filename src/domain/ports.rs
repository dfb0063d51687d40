use crate::domain::model::{ExtractionResult, LoadReport, RawMessage};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    /// 本機 XML 路徑或 http(s) URL
    fn source(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn currency(&self) -> &str;
    fn compress(&self) -> bool;

    fn transactions_filename(&self) -> &str {
        "transactions.json"
    }

    fn non_transactions_filename(&self) -> &str {
        "non_transactions.json"
    }

    fn archive_filename(&self) -> &str {
        "momo_output.zip"
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<RawMessage>>;
    async fn transform(&self, data: Vec<RawMessage>) -> Result<ExtractionResult>;
    async fn load(&self, result: ExtractionResult) -> Result<LoadReport>;
}
