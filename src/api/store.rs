use crate::core::builder::system_id;
use crate::core::Storage;
use crate::utils::error::{EtlError, Result};
use indexmap::IndexMap;
use serde_json::{Map, Value};

pub type StoredRecord = Map<String, Value>;

/// 記憶體中的交易集合。以 id 為鍵、保留插入順序，
/// 所有修改都經過這裡的方法，列表與索引不會不同步。
#[derive(Debug, Clone, Default)]
pub struct TransactionStore {
    records: IndexMap<String, StoredRecord>,
}

impl TransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 沒有 `id` 字串欄位的項目會被略過
    pub fn from_records(records: Vec<Value>) -> Self {
        let mut store = Self::new();
        for (position, value) in records.into_iter().enumerate() {
            let Value::Object(record) = value else {
                tracing::warn!("Skipping entry #{}: not a JSON object", position);
                continue;
            };
            let Some(id) = record.get("id").and_then(Value::as_str).map(str::to_string) else {
                tracing::warn!("Skipping entry #{}: missing string id", position);
                continue;
            };
            if store.records.insert(id.clone(), record).is_some() {
                tracing::warn!("Duplicate id {} in data file, keeping the later entry", id);
            }
        }
        store
    }

    pub fn from_json(data: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(data)?;
        match value {
            Value::Array(records) => Ok(Self::from_records(records)),
            _ => Err(EtlError::ValidationError {
                message: "transaction data file must contain a JSON array".to_string(),
            }),
        }
    }

    /// 檔案不存在時從空集合開始
    pub async fn load<S: Storage>(storage: &S, path: &str) -> Result<Self> {
        match storage.read_file(path).await {
            Ok(data) => Self::from_json(&data),
            Err(EtlError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("Data file {} not found, starting with an empty store", path);
                Ok(Self::new())
            }
            Err(e) => Err(e),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn all(&self) -> Vec<StoredRecord> {
        self.records.values().cloned().collect()
    }

    pub fn get(&self, id: &str) -> Option<&StoredRecord> {
        self.records.get(id)
    }

    /// 指派新的系統 id 後存入，body 內原有的 `id` 會被覆蓋
    pub fn insert(&mut self, mut fields: StoredRecord) -> StoredRecord {
        let id = self.next_id();
        fields.insert("id".to_string(), Value::String(id.clone()));
        self.records.insert(id, fields.clone());
        fields
    }

    /// 淺層合併，`id` 欄位不可被修改
    pub fn merge(&mut self, id: &str, fields: StoredRecord) -> Option<StoredRecord> {
        let record = self.records.get_mut(id)?;
        for (key, value) in fields {
            if key != "id" {
                record.insert(key, value);
            }
        }
        Some(record.clone())
    }

    pub fn remove(&mut self, id: &str) -> Option<StoredRecord> {
        self.records.shift_remove(id)
    }

    pub fn to_json_pretty(&self) -> Result<Vec<u8>> {
        let records: Vec<&StoredRecord> = self.records.values().collect();
        Ok(serde_json::to_vec_pretty(&records)?)
    }

    /// count+1；刪除後若該 id 仍被占用就往後找
    fn next_id(&self) -> String {
        let mut ordinal = self.records.len() + 1;
        loop {
            let candidate = system_id(ordinal);
            if !self.records.contains_key(&candidate) {
                return candidate;
            }
            ordinal += 1;
        }
    }
}

/// `TXN` 後接至少一位數字
pub fn is_system_id(id: &str) -> bool {
    id.strip_prefix("TXN")
        .map(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or(false)
}
