use crate::domain::model::TransactionType;
use crate::utils::error::{EtlError, Result};
use regex::Regex;

pub const NO_EXTERNAL_ID: &str = "N/A";
pub const DEFAULT_SENDER: &str = "System/Bank";
pub const DEFAULT_RECEIVER: &str = "User";
/// 帳戶持有人本身
pub const ACCOUNT_HOLDER: &str = "User";
pub const UNKNOWN_SENDER: &str = "MoMo Service";
pub const UNKNOWN_RECIPIENT: &str = "Unknown Recipient";

const INCOMING_KEYWORDS: [&str; 2] = ["received", "deposit"];
const OUTGOING_KEYWORDS: [&str; 2] = ["transferred", "payment"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ExternalId,
    Amount,
    Sender,
    Receiver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Incoming,
    Outgoing,
    /// 有幣別標記卻沒有任何方向關鍵字，沿用 Payment 分類
    Unclassified,
}

impl Direction {
    pub fn detect(body: &str) -> Self {
        let lower = body.to_lowercase();
        if INCOMING_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            Direction::Incoming
        } else if OUTGOING_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            Direction::Outgoing
        } else {
            Direction::Unclassified
        }
    }

    pub fn transaction_type(self) -> TransactionType {
        match self {
            Direction::Incoming => TransactionType::Income,
            Direction::Outgoing | Direction::Unclassified => TransactionType::Payment,
        }
    }
}

/// 一條擷取規則：欄位、樣式、要取的 capture group
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    pub field: Field,
    pub pattern: Regex,
    pub group: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFields {
    pub transaction_id: String,
    pub amount: f64,
    pub currency: String,
    pub sender: String,
    pub receiver: String,
    pub direction: Direction,
}

/// 依序套用規則表，同一欄位第一條命中的規則勝出，全部落空就用預設值
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    currency: String,
    rules: Vec<ExtractionRule>,
}

impl FieldExtractor {
    pub fn new(currency: &str) -> Result<Self> {
        let specs = [
            (Field::ExternalId, r"(?:TxId:|Transaction Id:)\s*(\d+)".to_string()),
            (
                Field::Amount,
                format!(r"([\d,.]+)\s*{}", regex::escape(currency)),
            ),
            // 對方名稱後面緊接遮罩號碼，例如 "from Jane Doe (*** 123)"
            (Field::Sender, r"from\s+([A-Za-z\s]{3,25}?)\s*\(".to_string()),
            (Field::Sender, r"from\s+([A-Za-z\s]{3,25}?)[\s(]".to_string()),
            (Field::Receiver, r"to\s+([A-Za-z\s]{3,25}?)[\s\d]".to_string()),
        ];

        let rules = specs
            .into_iter()
            .map(|(field, pattern)| {
                Regex::new(&pattern)
                    .map(|pattern| ExtractionRule {
                        field,
                        pattern,
                        group: 1,
                    })
                    .map_err(|e| EtlError::ConfigError {
                        message: format!("Invalid extraction pattern for {:?}: {}", field, e),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            currency: currency.to_string(),
            rules,
        })
    }

    pub fn rules(&self) -> &[ExtractionRule] {
        &self.rules
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn first_capture<'b>(&self, field: Field, body: &'b str) -> Option<&'b str> {
        self.rules
            .iter()
            .filter(|rule| rule.field == field)
            .find_map(|rule| {
                rule.pattern
                    .captures(body)
                    .and_then(|caps| caps.get(rule.group))
                    .map(|m| m.as_str().trim())
                    .filter(|value| !value.is_empty())
            })
    }

    pub fn extract(&self, body: &str) -> ExtractedFields {
        let transaction_id = self
            .first_capture(Field::ExternalId, body)
            .unwrap_or(NO_EXTERNAL_ID)
            .to_string();

        let amount = self
            .first_capture(Field::Amount, body)
            .and_then(parse_amount)
            .unwrap_or(0.0);

        let direction = Direction::detect(body);
        let (sender, receiver) = match direction {
            Direction::Incoming => (
                self.first_capture(Field::Sender, body)
                    .unwrap_or(UNKNOWN_SENDER)
                    .to_string(),
                DEFAULT_RECEIVER.to_string(),
            ),
            Direction::Outgoing => (
                ACCOUNT_HOLDER.to_string(),
                self.first_capture(Field::Receiver, body)
                    .unwrap_or(UNKNOWN_RECIPIENT)
                    .to_string(),
            ),
            Direction::Unclassified => (DEFAULT_SENDER.to_string(), DEFAULT_RECEIVER.to_string()),
        };

        ExtractedFields {
            transaction_id,
            amount,
            currency: self.currency.clone(),
            sender,
            receiver,
            direction,
        }
    }
}

/// 去掉千分位逗號後解析，解析失敗交由呼叫端套用 0.0
fn parse_amount(token: &str) -> Option<f64> {
    token
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> FieldExtractor {
        FieldExtractor::new("RWF").unwrap()
    }

    #[test]
    fn test_incoming_with_masked_number() {
        let fields = extractor().extract(
            "You have received 5,000 RWF from Jane Doe (*** 123) on your mobile money account at 2024-05-10 16:30:51.",
        );

        assert_eq!(fields.amount, 5000.0);
        assert_eq!(fields.direction, Direction::Incoming);
        assert_eq!(fields.direction.transaction_type(), TransactionType::Income);
        assert_eq!(fields.sender, "Jane Doe");
        assert_eq!(fields.receiver, DEFAULT_RECEIVER);
        assert_eq!(fields.currency, "RWF");
    }

    #[test]
    fn test_outgoing_payment_with_external_id() {
        let fields = extractor().extract(
            "TxId: 73214484437. Your payment of 1,000 RWF to Jane Smith 12845 has been completed at 2024-05-10 16:31:39. Your new balance: 1,000 RWF. Fee was 0 RWF.",
        );

        assert_eq!(fields.transaction_id, "73214484437");
        assert_eq!(fields.amount, 1000.0);
        assert_eq!(fields.direction, Direction::Outgoing);
        assert_eq!(fields.sender, ACCOUNT_HOLDER);
        // 收款方名稱在第一個空白或數字處截斷
        assert_eq!(fields.receiver, "Jane");
    }

    #[test]
    fn test_transferred_to_named_recipient() {
        let fields = extractor().extract(
            "*165*S*10000 RWF transferred to Samuel Carter (250791666666) from 36521838 at 2024-05-11 20:34:47 .",
        );

        assert_eq!(fields.amount, 10000.0);
        assert_eq!(fields.receiver, "Samuel");
        assert_eq!(fields.direction.transaction_type(), TransactionType::Payment);
    }

    #[test]
    fn test_transaction_id_label_variant() {
        let fields = extractor().extract(
            "A bank deposit of 40000 RWF has been added to your account. Financial Transaction Id:   76662021700.",
        );
        assert_eq!(fields.transaction_id, "76662021700");
        assert_eq!(fields.direction, Direction::Incoming);
        assert_eq!(fields.sender, UNKNOWN_SENDER);
    }

    #[test]
    fn test_external_id_fallback() {
        let fields = extractor().extract("You have received 200 RWF from Alex Doe (*** 9)");
        assert_eq!(fields.transaction_id, NO_EXTERNAL_ID);
    }

    #[test]
    fn test_amount_fallbacks() {
        let ex = extractor();
        assert_eq!(ex.extract("RWF transaction with no numeric token").amount, 0.0);
        // 只有標點的 token 無法解析
        assert_eq!(ex.extract("Fee . RWF charged").amount, 0.0);
        assert_eq!(ex.extract("Paid 1.2.3 RWF").amount, 0.0);
    }

    #[test]
    fn test_amount_with_decimals_and_separators() {
        let ex = extractor();
        assert_eq!(ex.extract("payment of 1,234,567.50 RWF").amount, 1_234_567.5);
        assert_eq!(ex.extract("payment of 300RWF").amount, 300.0);
    }

    #[test]
    fn test_incoming_keywords_checked_first() {
        let fields = extractor().extract("Payment received: 700 RWF from Bob Kay (*** 1)");
        assert_eq!(fields.direction, Direction::Incoming);
        assert_eq!(fields.sender, "Bob Kay");
    }

    #[test]
    fn test_outgoing_without_recipient() {
        let fields = extractor().extract("Your payment of 2,000 RWF has been completed.");
        assert_eq!(fields.receiver, UNKNOWN_RECIPIENT);
        assert_eq!(fields.sender, ACCOUNT_HOLDER);
    }

    #[test]
    fn test_unclassified_direction_falls_through_to_payment() {
        let fields = extractor().extract("Your balance is 12,000 RWF.");
        assert_eq!(fields.direction, Direction::Unclassified);
        assert_eq!(fields.sender, DEFAULT_SENDER);
        assert_eq!(fields.receiver, DEFAULT_RECEIVER);
        assert_eq!(fields.direction.transaction_type(), TransactionType::Payment);
    }

    #[test]
    fn test_generic_sender_rule_when_no_masked_number() {
        let ex = extractor();
        assert_eq!(
            ex.first_capture(Field::Sender, "received 100 RWF from Agent Eric today"),
            Some("Agent")
        );
    }

    #[test]
    fn test_rule_table_order() {
        let ex = extractor();
        let fields: Vec<Field> = ex.rules().iter().map(|rule| rule.field).collect();
        assert_eq!(
            fields,
            vec![
                Field::ExternalId,
                Field::Amount,
                Field::Sender,
                Field::Sender,
                Field::Receiver,
            ]
        );
    }

    #[test]
    fn test_receiver_stops_at_first_whitespace() {
        let fields = extractor().extract(
            "Your payment of 500 RWF to MTN Cash Power with token 123 has been completed",
        );
        assert_eq!(fields.receiver, "MTN");
        assert_eq!(fields.sender, ACCOUNT_HOLDER);
    }

    #[test]
    fn test_currency_marker_is_escaped() {
        let ex = FieldExtractor::new("R.F").unwrap();
        assert_eq!(ex.extract("paid 50 RWF").amount, 0.0);
        assert_eq!(ex.extract("paid 50 R.F").amount, 50.0);
    }
}
