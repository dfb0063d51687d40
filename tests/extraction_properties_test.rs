use momo_etl::core::extractor::FieldExtractor;
use momo_etl::core::lookup::{compare_lookups, lookup_indexed, lookup_linear, LookupIndex};
use momo_etl::core::{RawMessage, TransactionType};
use momo_etl::ExtractionPipeline;

const BODIES: &[&str] = &[
    "You have received 5,000 RWF from Jane Doe (*** 123). TxId: 987654",
    "Your payment of 1,200 RWF to Acme Shop 4455 has been completed.",
    "Y'ello, your bundle has been activated.",
    "A bank deposit of 40000 RWF has been added to your mobile money account.",
    "",
    "rwf in lower case is not a transaction",
    "*165*S*10000 RWF transferred to Samuel Carter (250791666666)",
    "A transaction of RWF by Data Bundle MTN was successfully completed.",
    "Dial *182# for more services.",
];

fn messages() -> Vec<RawMessage> {
    BODIES
        .iter()
        .enumerate()
        .map(|(index, body)| RawMessage {
            index,
            address: Some("M-Money".to_string()),
            date: None,
            body: body.to_string(),
        })
        .collect()
}

#[test]
fn test_every_message_lands_in_exactly_one_collection() {
    let pipeline = ExtractionPipeline::new("RWF").unwrap();

    let result = pipeline.run(messages());

    assert_eq!(result.total_messages(), BODIES.len());
    for transaction in &result.transactions {
        assert!(transaction.body.contains("RWF"));
    }
    for skipped in &result.non_transactions {
        assert!(!skipped.body.contains("RWF"));
        assert_eq!(skipped.body, BODIES[skipped.index]);
    }
}

#[test]
fn test_ids_are_dense_and_ordered() {
    let pipeline = ExtractionPipeline::new("RWF").unwrap();

    let result = pipeline.run(messages());

    for (position, transaction) in result.transactions.iter().enumerate() {
        assert_eq!(transaction.id, format!("TXN{:03}", position + 1));
    }
}

#[test]
fn test_extraction_fallbacks() {
    let pipeline = ExtractionPipeline::new("RWF").unwrap();

    let result = pipeline.run(messages());
    let missing_amount = result
        .transactions
        .iter()
        .find(|t| t.body.starts_with("A transaction of RWF"))
        .unwrap();

    assert_eq!(missing_amount.amount, 0.0);
    assert_eq!(missing_amount.transaction_id, "N/A");
    assert_eq!(missing_amount.kind, TransactionType::Payment);
    assert_eq!(missing_amount.sender, "System/Bank");
    assert_eq!(missing_amount.receiver, "User");
    assert_eq!(result.unclassified_direction, 1);

    for transaction in &result.transactions {
        assert!(transaction.amount >= 0.0);
        assert_eq!(transaction.currency, "RWF");
    }
}

#[test]
fn test_incoming_with_masked_number() {
    let extractor = FieldExtractor::new("RWF").unwrap();

    let fields = extractor.extract(BODIES[0]);

    assert_eq!(fields.amount, 5000.0);
    assert_eq!(fields.transaction_id, "987654");
    assert_eq!(fields.sender, "Jane Doe");
    assert_eq!(fields.receiver, "User");
    assert_eq!(fields.direction.transaction_type(), TransactionType::Income);
}

#[test]
fn test_outgoing_payment_receiver() {
    let extractor = FieldExtractor::new("RWF").unwrap();

    let fields = extractor.extract(BODIES[1]);

    assert_eq!(fields.amount, 1200.0);
    assert_eq!(fields.sender, "User");
    assert_eq!(fields.receiver, "Acme");
    assert_eq!(fields.direction.transaction_type(), TransactionType::Payment);
}

#[test]
fn test_other_currency_marker() {
    let pipeline = ExtractionPipeline::new("UGX").unwrap();

    let result = pipeline.run(vec![RawMessage {
        index: 0,
        address: None,
        date: None,
        body: "You have received 7,500 UGX from Bob Stone (*** 9).".to_string(),
    }]);

    assert_eq!(result.transactions.len(), 1);
    assert_eq!(result.transactions[0].currency, "UGX");
    assert_eq!(result.transactions[0].amount, 7500.0);
    assert_eq!(result.transactions[0].sender, "Bob Stone");
}

#[test]
fn test_lookup_strategies_agree() {
    let pipeline = ExtractionPipeline::new("RWF").unwrap();
    let transactions = pipeline.run(messages()).transactions;
    let index = LookupIndex::build(&transactions);

    for id in ["TXN001", "TXN003", "TXN006", "TXN999", "", "txn001"] {
        assert_eq!(
            lookup_linear(&transactions, id),
            lookup_indexed(&index, id),
            "id {}",
            id
        );
    }

    let comparison = compare_lookups(&transactions, 21);
    assert_eq!(comparison.mismatches, 0);
}

#[test]
fn test_malformed_export_yields_empty_result() {
    let pipeline = ExtractionPipeline::new("RWF").unwrap();

    let result = pipeline.process_export(b"<smses><sms body=\"1 RWF\">");

    assert!(result.is_empty());
    assert_eq!(result.unclassified_direction, 0);
}
