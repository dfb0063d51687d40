use crate::core::pipeline::ExtractionPipeline;
use crate::core::source::{parse_sms_export, SourceLocation};
use crate::core::{
    ConfigProvider, ExtractionResult, LoadReport, Pipeline, RawMessage, RunSummary, Storage,
    TransactionRecord,
};
use crate::utils::error::{EtlError, Result};
use reqwest::Client;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const SUMMARY_FILENAME: &str = "summary.json";
pub const TRANSACTIONS_CSV_FILENAME: &str = "transactions.csv";

/// 讀取 SMS 匯出檔 → 分類擷取 → 寫出 JSON / CSV / ZIP
pub struct SmsPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) client: Client,
    pub(crate) extraction: ExtractionPipeline,
}

impl<S: Storage, C: ConfigProvider> SmsPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let extraction = ExtractionPipeline::new(config.currency())?;
        Ok(Self {
            storage,
            config,
            client: Client::new(),
            extraction,
        })
    }

    fn transactions_csv(transactions: &[TransactionRecord]) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for record in transactions {
            writer.serialize(record)?;
        }
        writer.into_inner().map_err(|e| EtlError::ProcessingError {
            message: format!("Failed to finish CSV output: {}", e),
        })
    }

    fn zip_bundle(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        for (name, data) in files {
            zip.start_file(name.as_str(), SimpleFileOptions::default())?;
            zip.write_all(data)?;
        }
        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SmsPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<RawMessage>> {
        let location = SourceLocation::parse(self.config.source())?;
        let xml = location.fetch(&self.client).await?;
        tracing::debug!("Loaded {} bytes of SMS export", xml.len());

        let messages = parse_sms_export(&xml)?;
        if messages.is_empty() {
            tracing::warn!("Source document contains no <sms> elements");
        }
        Ok(messages)
    }

    async fn transform(&self, data: Vec<RawMessage>) -> Result<ExtractionResult> {
        let result = self.extraction.run(data);
        if result.unclassified_direction > 0 {
            tracing::warn!(
                "⚠️  {} transactions had no direction keyword and were recorded as Payment",
                result.unclassified_direction
            );
        }
        Ok(result)
    }

    async fn load(&self, result: ExtractionResult) -> Result<LoadReport> {
        let summary = RunSummary::from_result(&result, self.extraction.currency());

        let mut outputs: Vec<(String, Vec<u8>)> = vec![
            (
                self.config.transactions_filename().to_string(),
                serde_json::to_vec_pretty(&result.transactions)?,
            ),
            (
                self.config.non_transactions_filename().to_string(),
                serde_json::to_vec_pretty(&result.non_transactions)?,
            ),
        ];

        if self.config.output_formats().iter().any(|f| f == "csv") {
            outputs.push((
                TRANSACTIONS_CSV_FILENAME.to_string(),
                Self::transactions_csv(&result.transactions)?,
            ));
        }

        outputs.push((
            SUMMARY_FILENAME.to_string(),
            serde_json::to_vec_pretty(&summary)?,
        ));

        for (name, data) in &outputs {
            tracing::debug!("Writing {} ({} bytes)", name, data.len());
            self.storage.write_file(name, data).await?;
        }

        let mut files: Vec<String> = outputs.iter().map(|(name, _)| name.clone()).collect();

        if self.config.compress() {
            let archive = Self::zip_bundle(&outputs)?;
            let archive_name = self.config.archive_filename().to_string();
            tracing::debug!("Writing ZIP bundle {} ({} bytes)", archive_name, archive.len());
            self.storage.write_file(&archive_name, &archive).await?;
            files.push(archive_name);
        }

        tracing::info!(
            "Saved: {} transactions, {} non-transactions",
            summary.transactions,
            summary.non_transactions
        );

        Ok(LoadReport {
            output_dir: self.config.output_path().to_string(),
            files,
            summary,
        })
    }
}
