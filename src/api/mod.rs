// Record Store API：以 HTTP 提供 pipeline 輸出的交易 CRUD

pub mod routes;
pub mod store;

pub use routes::{router, AppState, Persistence, SharedState};
pub use store::{StoredRecord, TransactionStore};
