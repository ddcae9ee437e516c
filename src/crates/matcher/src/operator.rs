use crate::compiled::CompiledCondition;
use imposter_base::model::MatchOperator;

/// Evaluates one compiled condition against an optional actual value,
/// extracted from whichever request field the caller is testing (a missing
/// header, query param etc. is represented as `None`).
pub fn evaluate(cond: &CompiledCondition, actual: Option<&str>) -> bool {
    match cond.operator {
        MatchOperator::EqualTo => matches_value(cond, actual),
        MatchOperator::NotEqualTo => !matches_value(cond, actual),
        MatchOperator::Contains => {
            actual.is_some_and(|a| cond.value.as_deref().is_some_and(|v| a.contains(v)))
        }
        MatchOperator::NotContains => {
            !actual.is_some_and(|a| cond.value.as_deref().is_some_and(|v| a.contains(v)))
        }
        MatchOperator::Matches => actual.is_some_and(|a| {
            cond.regex
                .as_ref()
                .is_some_and(|re| re.is_match(a))
        }),
        MatchOperator::NotMatches => !actual.is_some_and(|a| {
            cond.regex
                .as_ref()
                .is_some_and(|re| re.is_match(a))
        }),
        MatchOperator::Exists => actual.is_some(),
        MatchOperator::NotExists => actual.is_none(),
    }
}

fn matches_value(cond: &CompiledCondition, actual: Option<&str>) -> bool {
    match (actual, cond.value.as_deref()) {
        (Some(a), Some(v)) => a == v,
        _ => false,
    }
}
