//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射

use axum::{
    Router, middleware,
    routing::{get, post},
};
use eligibility_shared::observability::middleware as obs_middleware;

use crate::handlers;

/// 规则相关路由
pub fn rule_routes() -> Router {
    Router::new()
        .route("/create-rule", post(handlers::rule::create_rule))
        .route("/combine-rules", post(handlers::rule::combine_rules))
        .route("/evaluate-rule", post(handlers::rule::evaluate_rule))
}

/// 构建完整应用路由（含可观测性中间件）
pub fn app() -> Router {
    Router::new()
        .nest("/api/rules", rule_routes())
        .route("/health", get(handlers::health::health_check))
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
}
