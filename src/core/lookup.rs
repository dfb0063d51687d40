use crate::domain::model::TransactionRecord;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// 原本搜尋腳本預設查詢的筆數
pub const DEFAULT_PROBES: usize = 21;

/// 以系統 id 為鍵的雜湊索引，借用交易集合而不複製
#[derive(Debug, Default)]
pub struct LookupIndex<'a> {
    by_id: HashMap<&'a str, &'a TransactionRecord>,
}

impl<'a> LookupIndex<'a> {
    pub fn build(transactions: &'a [TransactionRecord]) -> Self {
        let mut by_id = HashMap::with_capacity(transactions.len());
        for record in transactions {
            // 重複 id 時保留第一筆，和線性搜尋的結果一致
            by_id.entry(record.id.as_str()).or_insert(record);
        }
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&'a TransactionRecord> {
        self.by_id.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

pub fn lookup_linear<'a>(
    transactions: &'a [TransactionRecord],
    id: &str,
) -> Option<&'a TransactionRecord> {
    transactions.iter().find(|record| record.id == id)
}

pub fn lookup_indexed<'a>(index: &LookupIndex<'a>, id: &str) -> Option<&'a TransactionRecord> {
    index.get(id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStrategy {
    Linear,
    Indexed,
}

#[derive(Debug, Clone)]
pub struct LookupComparison {
    pub probes: usize,
    pub linear_total: Duration,
    pub indexed_total: Duration,
    pub index_build: Duration,
    /// 兩種策略結果不一致的查詢數，正常情況應為 0
    pub mismatches: usize,
}

impl LookupComparison {
    pub fn faster(&self) -> LookupStrategy {
        if self.linear_total > self.indexed_total {
            LookupStrategy::Indexed
        } else {
            LookupStrategy::Linear
        }
    }

    pub fn linear_micros(&self) -> f64 {
        self.linear_total.as_secs_f64() * 1_000_000.0
    }

    pub fn indexed_micros(&self) -> f64 {
        self.indexed_total.as_secs_f64() * 1_000_000.0
    }
}

/// 以前 `probes` 筆交易的 id 分別計時兩種查詢方式
pub fn compare_lookups(transactions: &[TransactionRecord], probes: usize) -> LookupComparison {
    let targets: Vec<&str> = transactions
        .iter()
        .take(probes)
        .map(|record| record.id.as_str())
        .collect();

    let mut linear_results = Vec::with_capacity(targets.len());
    let mut linear_total = Duration::ZERO;
    for id in &targets {
        let start = Instant::now();
        let found = lookup_linear(transactions, id);
        linear_total += start.elapsed();
        linear_results.push(found);
    }

    let build_start = Instant::now();
    let index = LookupIndex::build(transactions);
    let index_build = build_start.elapsed();

    let mut indexed_total = Duration::ZERO;
    let mut mismatches = 0;
    for (id, linear) in targets.iter().zip(&linear_results) {
        let start = Instant::now();
        let found = lookup_indexed(&index, id);
        indexed_total += start.elapsed();

        if found != *linear {
            mismatches += 1;
        }
    }

    tracing::debug!(
        "Compared {} lookups: linear {:?}, indexed {:?} (+{:?} build)",
        targets.len(),
        linear_total,
        indexed_total,
        index_build
    );

    LookupComparison {
        probes: targets.len(),
        linear_total,
        indexed_total,
        index_build,
        mismatches,
    }
}
