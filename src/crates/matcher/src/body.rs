use crate::compiled::{BodySelector, CompiledBodyCondition, CompiledBodyMatcher};
use crate::operator;
use jsonpath_rust::JsonPathQuery;
use sxd_document::parser;
use sxd_xpath::{Context, Factory, Value as XPathValue};

/// Evaluates a full `requestBody` matcher against the raw request body.
/// `allOf` requires every leaf to match; `anyOf` requires at least one.
pub fn evaluate_body_matcher(matcher: &CompiledBodyMatcher, body: &[u8]) -> bool {
    match matcher {
        CompiledBodyMatcher::AllOf(conds) => conds.iter().all(|c| evaluate_condition(c, body)),
        CompiledBodyMatcher::AnyOf(conds) => conds.iter().any(|c| evaluate_condition(c, body)),
        CompiledBodyMatcher::Single(cond) => evaluate_condition(cond, body),
    }
}

fn evaluate_condition(cond: &CompiledBodyCondition, body: &[u8]) -> bool {
    let extracted = match &cond.selector {
        BodySelector::JsonPath(expr) => extract_jsonpath(body, expr),
        BodySelector::XPath(expr) => extract_xpath(body, expr),
        BodySelector::Raw => std::str::from_utf8(body).ok().map(str::to_string),
    };
    operator::evaluate(&cond.condition, extracted.as_deref())
}

/// A malformed body is simply a non-match (spec.md §4.1 "a malformed body
/// for a JSONPath/XPath predicate is simply a non-match").
pub(crate) fn extract_jsonpath(body: &[u8], expr: &str) -> Option<String> {
    let parsed: serde_json::Value = serde_json::from_slice(body).ok()?;
    let found = parsed.path(expr).ok()?;
    let first = found.as_array().and_then(|a| a.first())?;
    Some(json_value_to_string(first))
}

fn json_value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub(crate) fn extract_xpath(body: &[u8], expr: &str) -> Option<String> {
    let text = std::str::from_utf8(body).ok()?;
    let package = parser::parse(text).ok()?;
    let document = package.as_document();
    let factory = Factory::new();
    let xpath = factory.build(expr).ok()??;
    let context = Context::new();
    let value = xpath.evaluate(&context, document.root()).ok()?;
    Some(xpath_value_to_string(&value))
}

fn xpath_value_to_string(value: &XPathValue<'_>) -> String {
    match value {
        XPathValue::Boolean(b) => b.to_string(),
        XPathValue::Number(n) => n.to_string(),
        XPathValue::String(s) => s.clone(),
        XPathValue::Nodeset(nodes) => nodes
            .document_order_first()
            .map(|n| n.string_value())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiled::{compile_condition, BodySelector, CompiledBodyCondition};
    use imposter_base::model::{MatchCondition, MatchOperator};

    fn json_cond(path: &str, value: &str) -> CompiledBodyCondition {
        CompiledBodyCondition {
            selector: BodySelector::JsonPath(path.to_string()),
            condition: compile_condition(&MatchCondition {
                value: Some(value.to_string()),
                operator: MatchOperator::EqualTo,
            })
            .unwrap(),
        }
    }

    #[test]
    fn jsonpath_equal_to_matches_nested_field() {
        let cond = json_cond("$.user.name", "Ada");
        let body = br#"{"user":{"name":"Ada"}}"#;
        assert!(evaluate_condition(&cond, body));
    }

    #[test]
    fn jsonpath_mismatch_is_a_non_match() {
        let cond = json_cond("$.user.name", "Ada");
        let body = br#"{"user":{"name":"Bob"}}"#;
        assert!(!evaluate_condition(&cond, body));
    }

    #[test]
    fn malformed_json_body_is_a_non_match_not_an_error() {
        let cond = json_cond("$.user.name", "Ada");
        let body = b"not json";
        assert!(!evaluate_condition(&cond, body));
    }

    #[test]
    fn raw_string_condition_matches_whole_body() {
        let raw_cond = CompiledBodyCondition {
            selector: BodySelector::Raw,
            condition: compile_condition(&MatchCondition {
                value: Some("hello".to_string()),
                operator: MatchOperator::Contains,
            })
            .unwrap(),
        };
        assert!(evaluate_condition(&raw_cond, b"say hello world"));
    }
}
