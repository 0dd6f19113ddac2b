//! 资格规则 HTTP 服务
//!
//! 规则引擎的外部协作层，提供无状态 REST API：
//!
//! - `POST /api/rules/create-rule`：解析规则字符串为语法树
//! - `POST /api/rules/combine-rules`：按 AND/OR 合并多条规则
//! - `POST /api/rules/evaluate-rule`：对记录求值
//!
//! ## 模块结构
//!
//! - `dto`: 请求和响应的数据传输对象
//! - `error`: 错误类型定义及 HTTP 映射
//! - `handlers`: HTTP 请求处理器
//! - `routes`: 路由配置
//!
//! 规则的持久化不在本服务范围内，语法树以 `{ nodeType, value, left, right }`
//! 结构在请求和响应中传递。

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;

pub use error::{Result, ServiceError};
