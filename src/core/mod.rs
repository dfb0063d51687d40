pub mod builder;
pub mod classifier;
pub mod etl;
pub mod extractor;
pub mod lookup;
pub mod pipeline;
pub mod source;
pub mod sms_pipeline;

pub use crate::domain::model::{
    ExtractionResult, LoadReport, NonTransactionRecord, RawMessage, RunSummary,
    TransactionRecord, TransactionType,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
