//! 健康检查

use axum::Json;
use serde_json::{Value, json};

/// 存活探针：服务进程正常即返回 ok
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "rule-service"
    }))
}
