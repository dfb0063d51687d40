use crate::core::extractor::ExtractedFields;
use crate::domain::model::{NonTransactionRecord, RawMessage, TransactionRecord};

pub const SYSTEM_ID_PREFIX: &str = "TXN";

/// `TXN` + 三位數補零的流水號，超過 999 時自然加寬
pub fn system_id(ordinal: usize) -> String {
    format!("{}{:03}", SYSTEM_ID_PREFIX, ordinal)
}

/// `sequence_number` 是本次執行已建立的交易筆數，id 從 TXN001 開始
pub fn build_transaction(
    raw: &RawMessage,
    extracted: ExtractedFields,
    sequence_number: usize,
) -> TransactionRecord {
    TransactionRecord {
        id: system_id(sequence_number + 1),
        transaction_id: extracted.transaction_id,
        sender: extracted.sender,
        receiver: extracted.receiver,
        amount: extracted.amount,
        currency: extracted.currency,
        date: raw.date.clone(),
        kind: extracted.direction.transaction_type(),
        body: raw.body.clone(),
    }
}

pub fn build_skip(raw: RawMessage) -> NonTransactionRecord {
    NonTransactionRecord {
        index: raw.index,
        address: raw.address,
        date: raw.date,
        body: raw.body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extractor::Direction;
    use crate::domain::model::TransactionType;

    fn raw(index: usize, body: &str) -> RawMessage {
        RawMessage {
            index,
            address: Some("M-Money".to_string()),
            date: Some("10 May 2024 4:30:58 PM".to_string()),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_system_id_padding() {
        assert_eq!(system_id(1), "TXN001");
        assert_eq!(system_id(42), "TXN042");
        assert_eq!(system_id(999), "TXN999");
        assert_eq!(system_id(1000), "TXN1000");
    }

    #[test]
    fn test_build_transaction_copies_positional_metadata() {
        let message = raw(7, "You have received 100 RWF");
        let extracted = ExtractedFields {
            transaction_id: "N/A".to_string(),
            amount: 100.0,
            currency: "RWF".to_string(),
            sender: "MoMo Service".to_string(),
            receiver: "User".to_string(),
            direction: Direction::Incoming,
        };

        let record = build_transaction(&message, extracted, 0);

        assert_eq!(record.id, "TXN001");
        assert_eq!(record.date.as_deref(), Some("10 May 2024 4:30:58 PM"));
        assert_eq!(record.body, "You have received 100 RWF");
        assert_eq!(record.kind, TransactionType::Income);
    }

    #[test]
    fn test_build_skip_keeps_index() {
        let record = build_skip(raw(3, "Your code is 1234"));
        assert_eq!(record.index, 3);
        assert_eq!(record.address.as_deref(), Some("M-Money"));
        assert_eq!(record.body, "Your code is 1234");
    }
}
