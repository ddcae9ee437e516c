use imposter_base::model::{BodyMatchCondition, BodyMatcher, MatchCondition, MatchOperator, RequestMatcher};
use imposter_errors::matcher::MatchError;
use regex::Regex;
use std::collections::HashMap;

/// A [`MatchCondition`] with its regex pre-compiled, per spec.md §3
/// invariant "a resource's compiled matcher is immutable after load; regex
/// objects are compiled once".
#[derive(Debug, Clone)]
pub struct CompiledCondition {
    pub operator: MatchOperator,
    pub value: Option<String>,
    pub regex: Option<Regex>,
}

pub fn compile_condition(cond: &MatchCondition) -> Result<CompiledCondition, MatchError> {
    let regex = match cond.operator {
        MatchOperator::Matches | MatchOperator::NotMatches => {
            let pattern = cond
                .value
                .as_deref()
                .ok_or_else(|| MatchError::BadRegex("missing pattern".to_string()))?;
            Some(Regex::new(pattern).map_err(|e| MatchError::BadRegex(e.to_string()))?)
        }
        _ => None,
    };
    Ok(CompiledCondition {
        operator: cond.operator,
        value: cond.value.clone(),
        regex,
    })
}

#[derive(Debug, Clone)]
pub enum BodySelector {
    JsonPath(String),
    XPath(String),
    Raw,
}

#[derive(Debug, Clone)]
pub struct CompiledBodyCondition {
    pub selector: BodySelector,
    pub condition: CompiledCondition,
}

fn compile_body_condition(cond: &BodyMatchCondition) -> Result<CompiledBodyCondition, MatchError> {
    let selector = match (&cond.json_path, &cond.xpath) {
        (Some(jp), _) => BodySelector::JsonPath(jp.clone()),
        (None, Some(xp)) => BodySelector::XPath(xp.clone()),
        (None, None) => BodySelector::Raw,
    };
    Ok(CompiledBodyCondition {
        selector,
        condition: compile_condition(&cond.condition)?,
    })
}

#[derive(Debug, Clone)]
pub enum CompiledBodyMatcher {
    AllOf(Vec<CompiledBodyCondition>),
    AnyOf(Vec<CompiledBodyCondition>),
    Single(CompiledBodyCondition),
}

fn compile_body_matcher(matcher: &BodyMatcher) -> Result<CompiledBodyMatcher, MatchError> {
    Ok(match matcher {
        BodyMatcher::AllOf { all_of } => CompiledBodyMatcher::AllOf(
            all_of
                .iter()
                .map(compile_body_condition)
                .collect::<Result<_, _>>()?,
        ),
        BodyMatcher::AnyOf { any_of } => CompiledBodyMatcher::AnyOf(
            any_of
                .iter()
                .map(compile_body_condition)
                .collect::<Result<_, _>>()?,
        ),
        BodyMatcher::Single(cond) => CompiledBodyMatcher::Single(compile_body_condition(cond)?),
    })
}

/// `/`-split path segment of a declared resource path.
#[derive(Debug, Clone)]
pub enum PathSegment {
    Literal(String),
    Param(String),
    /// Trailing `*`: matches every remaining request segment as a whole.
    Wildcard,
}

#[derive(Debug, Clone)]
pub struct CompiledRequestMatcher {
    pub method: String,
    pub segments: Vec<PathSegment>,
    pub has_wildcard: bool,
    pub path_params: HashMap<String, CompiledCondition>,
    pub query_params: HashMap<String, CompiledCondition>,
    pub request_headers: HashMap<String, CompiledCondition>,
    pub form_params: HashMap<String, CompiledCondition>,
    pub request_body: Option<CompiledBodyMatcher>,
    pub log_template: Option<String>,
}

pub fn compile(matcher: &RequestMatcher) -> Result<CompiledRequestMatcher, MatchError> {
    let trimmed = matcher.path.trim_matches('/');
    let mut segments = Vec::new();
    let mut has_wildcard = false;
    if !trimmed.is_empty() {
        for (i, raw) in trimmed.split('/').enumerate() {
            if raw == "*" && i == trimmed.split('/').count() - 1 {
                has_wildcard = true;
                segments.push(PathSegment::Wildcard);
            } else if let Some(name) = raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                segments.push(PathSegment::Param(name.to_string()));
            } else {
                segments.push(PathSegment::Literal(raw.to_string()));
            }
        }
    }

    let compile_map = |map: &HashMap<String, MatchCondition>| -> Result<HashMap<String, CompiledCondition>, MatchError> {
        map.iter()
            .map(|(k, v)| Ok((k.clone(), compile_condition(v)?)))
            .collect()
    };

    Ok(CompiledRequestMatcher {
        method: matcher.method.to_ascii_uppercase(),
        segments,
        has_wildcard,
        path_params: compile_map(&matcher.path_params)?,
        query_params: compile_map(&matcher.query_params)?,
        request_headers: compile_map(&matcher.request_headers)?,
        form_params: compile_map(&matcher.form_params)?,
        request_body: matcher.request_body.as_ref().map(compile_body_matcher).transpose()?,
        log_template: matcher.log_template.clone(),
    })
}
