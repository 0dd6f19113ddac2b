//! 语法树求值
//!
//! 递归遍历语法树，叶子条件对照记录求值，内部节点按 AND/OR 合并。
//! 逻辑节点总是对左右子树都求值，不做短路，结果与求值顺序无关。

use crate::ast::AstNode;
use crate::error::{Result, RuleError};
use crate::models::{EvaluationReport, FieldValue, Record};
use crate::operators::Comparator;

/// 对记录求值
pub fn evaluate(node: &AstNode, record: &Record) -> Result<bool> {
    Evaluator::new().evaluate(node, record)
}

/// 语法树求值器
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    /// 是否记录详细评估追踪
    trace_enabled: bool,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 启用评估追踪
    pub fn with_trace(mut self) -> Self {
        self.trace_enabled = true;
        self
    }

    pub fn evaluate(&self, node: &AstNode, record: &Record) -> Result<bool> {
        let mut trace = Vec::new();
        self.evaluate_node(node, record, &mut trace)
    }

    /// 求值并返回追踪信息
    pub fn evaluate_with_report(
        &self,
        node: &AstNode,
        record: &Record,
    ) -> Result<EvaluationReport> {
        let mut evaluation_trace = Vec::new();
        let matched = self.evaluate_node(node, record, &mut evaluation_trace)?;
        Ok(EvaluationReport {
            matched,
            evaluation_trace,
        })
    }

    fn evaluate_node(
        &self,
        node: &AstNode,
        record: &Record,
        trace: &mut Vec<String>,
    ) -> Result<bool> {
        match node {
            AstNode::Operand { condition } => {
                let matched = ConditionEvaluator::evaluate(condition, record)?;
                if self.trace_enabled {
                    trace.push(format!(
                        "{} => {}",
                        condition,
                        if matched { "MATCHED" } else { "NOT_MATCHED" }
                    ));
                }
                Ok(matched)
            }
            AstNode::Operator {
                connective,
                left,
                right,
            } => {
                let left_matched = self.evaluate_node(left, record, trace)?;
                let right_matched = self.evaluate_node(right, record, trace)?;
                let matched = connective.apply(left_matched, right_matched);
                if self.trace_enabled {
                    trace.push(format!(
                        "{} {} {} => {}",
                        left_matched, connective, right_matched, matched
                    ));
                }
                Ok(matched)
            }
        }
    }
}

/// 单个条件求值器
///
/// 条件按单个空格切分为恰好三段：`<字段> <比较符> <值>`。
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    pub fn evaluate(condition: &str, record: &Record) -> Result<bool> {
        let tokens: Vec<&str> = condition.split(' ').collect();
        let &[field, comparator, literal] = tokens.as_slice() else {
            return Err(RuleError::MalformedCondition(format!(
                "期望 `<字段> <比较符> <值>` 三段, 实际 {} 段: {:?}",
                tokens.len(),
                condition
            )));
        };
        let comparator: Comparator = comparator.parse()?;

        match comparator {
            Comparator::Gt => Self::compare(field, literal, record, |a, b| a > b),
            Comparator::Lt => Self::compare(field, literal, record, |a, b| a < b),
            Comparator::Eq => Self::text_eq(field, literal, record),
        }
    }

    /// 数值比较
    fn compare<F>(field: &str, literal: &str, record: &Record, cmp: F) -> Result<bool>
    where
        F: Fn(f64, f64) -> bool,
    {
        let expected = literal
            .parse::<f64>()
            .ok()
            .filter(|n| !n.is_nan())
            .ok_or_else(|| RuleError::InvalidLiteral(format!("{} (字段 {})", literal, field)))?;

        let value = Self::lookup(field, record)?;
        let actual = value.as_f64().ok_or_else(|| Self::mismatch(field, "number", value))?;

        Ok(cmp(actual, expected))
    }

    /// 字符串相等，字面量首尾各去掉一层引号
    fn text_eq(field: &str, literal: &str, record: &Record) -> Result<bool> {
        let expected = strip_quotes(literal);

        let value = Self::lookup(field, record)?;
        let actual = value.as_str().ok_or_else(|| Self::mismatch(field, "string", value))?;

        Ok(actual == expected)
    }

    fn lookup<'a>(field: &str, record: &'a Record) -> Result<&'a FieldValue> {
        record
            .get(field)
            .ok_or_else(|| RuleError::FieldNotFound(field.to_string()))
    }

    fn mismatch(field: &str, expected: &str, actual: &FieldValue) -> RuleError {
        RuleError::TypeMismatch {
            field: field.to_string(),
            expected: expected.to_string(),
            actual: actual.type_name().to_string(),
        }
    }
}

fn strip_quotes(literal: &str) -> &str {
    let is_quote = |c: char| c == '\'' || c == '"';
    let s = literal.strip_prefix(is_quote).unwrap_or(literal);
    s.strip_suffix(is_quote).unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn employee() -> Record {
        Record::new()
            .with("age", 35)
            .with("department", "Sales")
            .with("salary", 60000)
            .with("experience", 3)
    }

    #[test]
    fn test_numeric_comparisons() {
        assert!(evaluate(&parse("age > 30").unwrap(), &Record::new().with("age", 35)).unwrap());
        assert!(!evaluate(&parse("age > 30").unwrap(), &Record::new().with("age", 20)).unwrap());
        assert!(evaluate(&parse("age < 40.5").unwrap(), &employee()).unwrap());
        assert!(!evaluate(&parse("age > 35").unwrap(), &employee()).unwrap());
    }

    #[test]
    fn test_string_equality() {
        let record = Record::new().with("name", "Bob");
        assert!(evaluate(&parse("name = 'Bob'").unwrap(), &record).unwrap());
        assert!(evaluate(&parse("name = \"Bob\"").unwrap(), &record).unwrap());
        assert!(evaluate(&parse("name = Bob").unwrap(), &record).unwrap());
        assert!(!evaluate(&parse("name = 'Alice'").unwrap(), &record).unwrap());
    }

    #[test]
    fn test_strip_single_quote_layer() {
        assert_eq!(strip_quotes("'Sales'"), "Sales");
        assert_eq!(strip_quotes("\"Sales\""), "Sales");
        assert_eq!(strip_quotes("''x''"), "'x'");
        assert_eq!(strip_quotes("Sales"), "Sales");
    }

    #[test]
    fn test_and_or_combination() {
        let ast = parse("(age > 30 AND department = 'Sales') OR salary > 100000").unwrap();
        assert!(evaluate(&ast, &employee()).unwrap());

        let record = employee().with("department", "HR");
        assert!(!evaluate(&ast, &record).unwrap());
    }

    #[test]
    fn test_unsupported_comparator() {
        let err = evaluate(&parse("x >= 1").unwrap(), &Record::new().with("x", 2)).unwrap_err();
        assert!(matches!(err, RuleError::UnsupportedOperator(ref op) if op == ">="));
    }

    #[test]
    fn test_malformed_condition() {
        let record = employee();
        for condition in ["age>30", "age  > 30", "department = Sales Team", "age"] {
            let err = evaluate(&AstNode::operand(condition), &record).unwrap_err();
            assert!(
                matches!(err, RuleError::MalformedCondition(_)),
                "Failed for: {}",
                condition
            );
        }
    }

    #[test]
    fn test_missing_field() {
        let err = evaluate(&parse("bonus > 10").unwrap(), &employee()).unwrap_err();
        assert!(matches!(err, RuleError::FieldNotFound(ref f) if f == "bonus"));

        let err = evaluate(&parse("team = 'x'").unwrap(), &employee()).unwrap_err();
        assert!(matches!(err, RuleError::FieldNotFound(_)));
    }

    #[test]
    fn test_type_mismatch() {
        let err = evaluate(&parse("department > 3").unwrap(), &employee()).unwrap_err();
        assert!(matches!(err, RuleError::TypeMismatch { ref expected, .. } if expected == "number"));

        let err = evaluate(&parse("age = 35").unwrap(), &employee()).unwrap_err();
        assert!(matches!(err, RuleError::TypeMismatch { ref actual, .. } if actual == "number"));
    }

    #[test]
    fn test_invalid_numeric_literal() {
        let err = evaluate(&parse("age > thirty").unwrap(), &employee()).unwrap_err();
        assert!(matches!(err, RuleError::InvalidLiteral(_)));

        let err = evaluate(&parse("age > NaN").unwrap(), &employee()).unwrap_err();
        assert!(matches!(err, RuleError::InvalidLiteral(_)));
    }

    #[test]
    fn test_no_short_circuit() {
        // 左侧已决定结果，右侧的错误仍然会暴露
        let ast = parse("age < 18 AND bonus > 10").unwrap();
        assert!(matches!(
            evaluate(&ast, &employee()),
            Err(RuleError::FieldNotFound(_))
        ));

        let ast = parse("age > 18 OR x >= 1").unwrap();
        assert!(matches!(
            evaluate(&ast, &employee()),
            Err(RuleError::UnsupportedOperator(_))
        ));
    }

    #[test]
    fn test_trace_records_every_node() {
        let ast = parse("age < 18 AND department = 'Sales'").unwrap();
        let report = Evaluator::new()
            .with_trace()
            .evaluate_with_report(&ast, &employee())
            .unwrap();

        assert!(!report.matched);
        assert_eq!(
            report.evaluation_trace,
            vec![
                "age < 18 => NOT_MATCHED".to_string(),
                "department = 'Sales' => MATCHED".to_string(),
                "false AND true => false".to_string(),
            ]
        );
    }

    #[test]
    fn test_trace_disabled_by_default() {
        let report = Evaluator::new()
            .evaluate_with_report(&parse("age > 30").unwrap(), &employee())
            .unwrap();
        assert!(report.matched);
        assert!(report.evaluation_trace.is_empty());
    }
}
