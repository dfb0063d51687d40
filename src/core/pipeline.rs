use crate::core::builder::{build_skip, build_transaction};
use crate::core::classifier::{Classification, MessageClassifier};
use crate::core::extractor::{Direction, FieldExtractor};
use crate::core::source::parse_sms_export;
use crate::domain::model::{ExtractionResult, RawMessage};
use crate::utils::error::Result;

/// classifier → extractor → builder，單執行緒一次走完整個訊息序列
#[derive(Debug, Clone)]
pub struct ExtractionPipeline {
    classifier: MessageClassifier,
    extractor: FieldExtractor,
}

impl ExtractionPipeline {
    pub fn new(currency: &str) -> Result<Self> {
        Ok(Self {
            classifier: MessageClassifier::new(currency),
            extractor: FieldExtractor::new(currency)?,
        })
    }

    pub fn currency(&self) -> &str {
        self.classifier.marker()
    }

    pub fn run(&self, messages: Vec<RawMessage>) -> ExtractionResult {
        let mut result = ExtractionResult::default();

        for message in messages {
            match self.classifier.classify(&message.body) {
                Classification::Transaction => {
                    let extracted = self.extractor.extract(&message.body);
                    if extracted.direction == Direction::Unclassified {
                        result.unclassified_direction += 1;
                        tracing::warn!(
                            "Message #{} has a currency marker but no direction keyword, recorded as Payment",
                            message.index
                        );
                    }

                    let record =
                        build_transaction(&message, extracted, result.transactions.len());
                    tracing::debug!(
                        "#{} -> {} {:?} {} {}",
                        message.index,
                        record.id,
                        record.kind,
                        record.amount,
                        record.currency
                    );
                    result.transactions.push(record);
                }
                Classification::NonTransaction => {
                    result.non_transactions.push(build_skip(message));
                }
            }
        }

        result
    }

    /// 整份文件無法解析時記錄一次錯誤並回傳兩個空集合，不做部分復原
    pub fn process_export(&self, xml: &[u8]) -> ExtractionResult {
        match parse_sms_export(xml) {
            Ok(messages) => self.run(messages),
            Err(e) => {
                tracing::error!("❌ Error parsing SMS export: {}", e);
                ExtractionResult::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::TransactionType;

    fn message(index: usize, body: &str) -> RawMessage {
        RawMessage {
            index,
            address: Some("M-Money".to_string()),
            date: Some(format!("{} May 2024 4:30:58 PM", index + 1)),
            body: body.to_string(),
        }
    }

    fn sample_messages() -> Vec<RawMessage> {
        vec![
            message(0, "You have received 2000 RWF from Jane Smith (*********013)."),
            message(1, "Your one-time code is 4421"),
            message(2, "TxId: 73214484437. Your payment of 1,000 RWF to Jane Smith 12845 has been completed."),
            message(3, ""),
            message(4, "Your balance is 12,000 RWF."),
        ]
    }

    #[test]
    fn test_partition_is_total_and_ordered() {
        let pipeline = ExtractionPipeline::new("RWF").unwrap();
        let input = sample_messages();
        let input_len = input.len();

        let result = pipeline.run(input);

        assert_eq!(result.total_messages(), input_len);
        assert_eq!(result.transactions.len(), 3);
        assert_eq!(result.non_transactions.len(), 2);
        assert_eq!(result.non_transactions[0].index, 1);
        assert_eq!(result.non_transactions[1].index, 3);
        assert_eq!(result.transactions[1].transaction_id, "73214484437");
    }

    #[test]
    fn test_ids_are_dense_and_independent_of_index() {
        let pipeline = ExtractionPipeline::new("RWF").unwrap();
        let result = pipeline.run(sample_messages());

        let ids: Vec<&str> = result.transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["TXN001", "TXN002", "TXN003"]);
        assert_eq!(result.transactions[2].date.as_deref(), Some("5 May 2024 4:30:58 PM"));
    }

    #[test]
    fn test_unclassified_direction_is_counted() {
        let pipeline = ExtractionPipeline::new("RWF").unwrap();
        let result = pipeline.run(sample_messages());

        assert_eq!(result.unclassified_direction, 1);
        assert_eq!(result.transactions[2].kind, TransactionType::Payment);
        assert_eq!(result.transactions[2].sender, "System/Bank");
    }

    #[test]
    fn test_empty_input() {
        let pipeline = ExtractionPipeline::new("RWF").unwrap();
        let result = pipeline.run(Vec::new());
        assert!(result.is_empty());
    }

    #[test]
    fn test_malformed_export_yields_empty_result() {
        let pipeline = ExtractionPipeline::new("RWF").unwrap();
        let result = pipeline.process_export(b"<smses><sms body='You have received 5 RWF'>");
        assert!(result.transactions.is_empty());
        assert!(result.non_transactions.is_empty());
    }

    #[test]
    fn test_process_export() {
        let pipeline = ExtractionPipeline::new("RWF").unwrap();
        let xml = br#"<smses>
            <sms address="M-Money" readable_date="10 May 2024" body="You have received 5,000 RWF from Jane Doe (*** 123) on your account." />
            <sms address="MTN" readable_date="11 May 2024" body="Welcome to MTN" />
        </smses>"#;

        let result = pipeline.process_export(xml);

        assert_eq!(result.transactions.len(), 1);
        assert_eq!(result.transactions[0].amount, 5000.0);
        assert_eq!(result.transactions[0].sender, "Jane Doe");
        assert_eq!(result.non_transactions[0].index, 1);
    }
}
