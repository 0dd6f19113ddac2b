//! 规则服务 DTO 模块
//!
//! 包含所有请求和响应的数据传输对象

pub mod request;
pub mod response;

pub use request::{
    CombineRulesRequest, CreateRuleRequest, EvaluateQuery, EvaluateRuleRequest, MAX_BODY_NESTING,
    RuleInput, decode_body,
};
pub use response::{ApiResponse, CombineRulesResponse, CreateRuleResponse, EvaluateRuleResponse};
