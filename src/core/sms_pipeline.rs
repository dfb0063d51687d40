pub use crate::app::pipelines::sms_pipeline::{
    SmsPipeline, SUMMARY_FILENAME, TRANSACTIONS_CSV_FILENAME,
};
