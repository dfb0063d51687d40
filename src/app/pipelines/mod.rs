pub mod sms_pipeline;
