use serde::{Deserialize, Serialize};

/// 預設的交易標記（盧安達法郎）
pub const DEFAULT_CURRENCY: &str = "RWF";

/// SMS 匯出檔中的一則訊息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    pub index: usize,
    pub address: Option<String>,
    /// `readable_date` 屬性，原樣保留不解析
    pub date: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    Income,
    Payment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub transaction_id: String,
    pub sender: String,
    pub receiver: String,
    pub amount: f64,
    pub currency: String,
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonTransactionRecord {
    pub index: usize,
    pub address: Option<String>,
    pub date: Option<String>,
    pub body: String,
}

/// 一次 pipeline 執行的兩個輸出集合
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionResult {
    pub transactions: Vec<TransactionRecord>,
    pub non_transactions: Vec<NonTransactionRecord>,
    /// 含幣別標記但找不到方向關鍵字的交易數
    pub unclassified_direction: usize,
}

impl ExtractionResult {
    pub fn total_messages(&self) -> usize {
        self.transactions.len() + self.non_transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_messages() == 0
    }
}

/// load 階段寫出的檔案與摘要
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub output_dir: String,
    pub files: Vec<String>,
    pub summary: RunSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub currency: String,
    pub total_messages: usize,
    pub transactions: usize,
    pub non_transactions: usize,
    pub unclassified_direction: usize,
    pub total_income: f64,
    pub total_payments: f64,
}

impl RunSummary {
    pub fn from_result(result: &ExtractionResult, currency: &str) -> Self {
        let sum_of = |kind: TransactionType| -> f64 {
            result
                .transactions
                .iter()
                .filter(|txn| txn.kind == kind)
                .map(|txn| txn.amount)
                .sum()
        };

        Self {
            generated_at: chrono::Utc::now(),
            currency: currency.to_string(),
            total_messages: result.total_messages(),
            transactions: result.transactions.len(),
            non_transactions: result.non_transactions.len(),
            unclassified_direction: result.unclassified_direction,
            total_income: sum_of(TransactionType::Income),
            total_payments: sum_of(TransactionType::Payment),
        }
    }
}
