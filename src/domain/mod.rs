// Domain layer: 核心資料模型與 ports，不依賴具體的儲存或來源實作

pub mod model;
pub mod ports;
