use crate::api::store::{is_system_id, StoredRecord, TransactionStore};
use crate::config::cli::LocalStorage;
use crate::core::Storage;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

/// 修改後寫回資料檔的設定，未設定時變更只存在於本次行程
#[derive(Debug, Clone)]
pub struct Persistence {
    pub storage: LocalStorage,
    pub filename: String,
}

pub struct AppState {
    store: RwLock<TransactionStore>,
    persistence: Option<Persistence>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(store: TransactionStore, persistence: Option<Persistence>) -> SharedState {
        Arc::new(Self {
            store: RwLock::new(store),
            persistence,
        })
    }

    /// 需在持有寫入鎖時呼叫，確保寫檔順序與修改順序一致。
    /// 修改先套用在副本上，寫檔成功後才換入，失敗時記憶體內容不變
    async fn persist(&self, store: &TransactionStore) -> Result<(), ApiError> {
        let Some(persistence) = &self.persistence else {
            return Ok(());
        };

        let data = store
            .to_json_pretty()
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        persistence
            .storage
            .write_file(&persistence.filename, &data)
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        tracing::debug!("Persisted {} records to {}", store.len(), persistence.filename);
        Ok(())
    }
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions)
                .post(create_transaction)
                .fallback(invalid_endpoint),
        )
        .route(
            "/transactions/:id",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction)
                .fallback(invalid_endpoint),
        )
        .fallback(invalid_endpoint)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn list_transactions(State(state): State<SharedState>) -> Json<Vec<StoredRecord>> {
    let store = state.store.read().await;
    Json(store.all())
}

async fn get_transaction(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<StoredRecord>, ApiError> {
    check_id(&id)?;
    let store = state.store.read().await;
    store.get(&id).cloned().map(Json).ok_or(ApiError::NotFound)
}

async fn create_transaction(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<(StatusCode, Json<StoredRecord>), ApiError> {
    let fields = parse_object(&body)?;

    let mut store = state.store.write().await;
    let mut next = store.clone();
    let record = next.insert(fields);
    state.persist(&next).await?;
    *store = next;

    tracing::info!(
        "Created transaction {}",
        record
            .get("id")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
    );
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update_transaction(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<StoredRecord>, ApiError> {
    check_id(&id)?;
    let fields = parse_object(&body)?;

    let mut store = state.store.write().await;
    let mut next = store.clone();
    let record = next.merge(&id, fields).ok_or(ApiError::NotFound)?;
    state.persist(&next).await?;
    *store = next;

    tracing::info!("Updated transaction {}", id);
    Ok(Json(record))
}

async fn delete_transaction(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    check_id(&id)?;

    let mut store = state.store.write().await;
    let mut next = store.clone();
    next.remove(&id).ok_or(ApiError::NotFound)?;
    state.persist(&next).await?;
    *store = next;

    tracing::info!("Deleted transaction {}", id);
    Ok(Json(json!({ "message": "Transaction deleted" })))
}

async fn invalid_endpoint() -> ApiError {
    ApiError::InvalidEndpoint
}

fn check_id(id: &str) -> Result<(), ApiError> {
    if is_system_id(id) {
        Ok(())
    } else {
        Err(ApiError::InvalidEndpoint)
    }
}

fn parse_object(body: &[u8]) -> Result<StoredRecord, ApiError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) | Err(_) => Err(ApiError::InvalidJson),
    }
}

#[derive(Debug)]
pub enum ApiError {
    NotFound,
    InvalidJson,
    InvalidEndpoint,
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Transaction not found".to_string()),
            ApiError::InvalidJson => (StatusCode::BAD_REQUEST, "Invalid JSON body".to_string()),
            ApiError::InvalidEndpoint => (StatusCode::NOT_FOUND, "Invalid endpoint".to_string()),
            ApiError::Internal(msg) => {
                tracing::error!("❌ Store API failure: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
