#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Transaction,
    NonTransaction,
}

/// 只要內文出現幣別標記就視為金融交易，不檢查金額或關鍵字
#[derive(Debug, Clone)]
pub struct MessageClassifier {
    marker: String,
}

impl MessageClassifier {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn classify(&self, body: &str) -> Classification {
        if body.contains(self.marker.as_str()) {
            Classification::Transaction
        } else {
            Classification::NonTransaction
        }
    }
}
