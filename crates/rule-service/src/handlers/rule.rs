//! 规则 API 处理器
//!
//! 创建（解析）、合并、求值三个无状态端点，直接调用规则引擎。
//! 请求体以原始字节接收，经 [`decode_body`] 做深度受限的 JSON 解码。

use axum::{Json, body::Bytes, extract::Query, http::StatusCode};
use rule_engine::{AstNode, Connective, Evaluator, Record, RuleError, combine, parse};
use tracing::{debug, info};
use validator::Validate;

use crate::{
    dto::{
        ApiResponse, CombineRulesRequest, CombineRulesResponse, CreateRuleRequest,
        CreateRuleResponse, EvaluateQuery, EvaluateRuleRequest, EvaluateRuleResponse, RuleInput,
        decode_body,
    },
    error::Result,
};

/// 解析规则字符串
///
/// POST /api/rules/create-rule
pub async fn create_rule(
    body: Bytes,
) -> Result<(StatusCode, Json<ApiResponse<CreateRuleResponse>>)> {
    let req: CreateRuleRequest = decode_body(&body)?;
    req.validate()?;

    let ast = parse(&req.rule_string)?;
    let fields: Vec<String> = ast.fields().into_iter().map(String::from).collect();

    info!(
        depth = ast.depth(),
        operands = ast.operand_count(),
        fields = ?fields,
        "规则解析成功"
    );

    let response = CreateRuleResponse {
        rule_string: req.rule_string,
        ast,
        fields,
    };
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(response, "规则创建成功")),
    ))
}

/// 合并多条规则
///
/// POST /api/rules/combine-rules
pub async fn combine_rules(body: Bytes) -> Result<Json<ApiResponse<CombineRulesResponse>>> {
    let req: CombineRulesRequest = decode_body(&body)?;
    req.validate()?;

    let connective: Connective = req.operator.parse()?;
    let rule_count = req.rules.len();

    let trees = req
        .rules
        .into_iter()
        .map(RuleInput::into_ast)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let combined_ast = combine(&trees, connective)?;

    info!(
        rules = rule_count,
        %connective,
        depth = combined_ast.depth(),
        "规则合并成功"
    );

    Ok(Json(ApiResponse::with_message(
        CombineRulesResponse { combined_ast },
        "规则合并成功",
    )))
}

/// 对记录求值
///
/// POST /api/rules/evaluate-rule?trace=true
pub async fn evaluate_rule(
    Query(query): Query<EvaluateQuery>,
    body: Bytes,
) -> Result<Json<ApiResponse<EvaluateRuleResponse>>> {
    let req: EvaluateRuleRequest = decode_body(&body)?;
    let ast = AstNode::from_value(req.ast)?;
    let record = Record::from_value(req.data).map_err(RuleError::from)?;

    let evaluator = if query.trace {
        Evaluator::new().with_trace()
    } else {
        Evaluator::new()
    };
    let report = evaluator.evaluate_with_report(&ast, &record)?;

    debug!(matched = report.matched, fields = record.len(), "规则求值完成");

    Ok(Json(ApiResponse::success(EvaluateRuleResponse {
        result: report.matched,
        evaluation_trace: query.trace.then_some(report.evaluation_trace),
    })))
}
