use crate::body;
use crate::compiled::{CompiledRequestMatcher, PathSegment};
use crate::operator;
use imposter_base::Exchange;
use std::collections::HashMap;

/// Result of scoring one candidate against one exchange: the satisfied
/// predicate count plus the tie-break inputs from spec.md §4.1.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub score: u32,
    pub has_wildcard: bool,
    pub bound_path_params: u32,
    pub path_param_values: HashMap<String, String>,
}

/// Scores `matcher` against `exchange`. Returns `None` the moment any
/// declared predicate fails — spec.md §4.1 "If any predicate fails, the
/// candidate is rejected outright".
pub fn evaluate(matcher: &CompiledRequestMatcher, exchange: &Exchange) -> Option<MatchOutcome> {
    if matcher.method != exchange.request.method.to_ascii_uppercase() {
        return None;
    }

    let mut score = 0u32;
    let mut bound_path_params = 0u32;
    let mut path_param_values = HashMap::new();

    let request_segments: Vec<&str> = exchange
        .request
        .path
        .trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    if matcher.has_wildcard {
        let prefix_len = matcher.segments.len() - 1;
        if request_segments.len() < prefix_len {
            return None;
        }
        for (seg, req_seg) in matcher.segments.iter().take(prefix_len).zip(request_segments.iter())
        {
            match_segment(
                seg,
                req_seg,
                matcher,
                &mut score,
                &mut bound_path_params,
                &mut path_param_values,
            )?;
        }
    } else {
        if matcher.segments.len() != request_segments.len() {
            return None;
        }
        for (seg, req_seg) in matcher.segments.iter().zip(request_segments.iter()) {
            match_segment(
                seg,
                req_seg,
                matcher,
                &mut score,
                &mut bound_path_params,
                &mut path_param_values,
            )?;
        }
    }

    for (name, cond) in &matcher.query_params {
        let actual = exchange.request.query.first(name);
        if !operator::evaluate(cond, actual) {
            return None;
        }
        score += 1;
    }

    for (name, cond) in &matcher.request_headers {
        let actual = exchange.request.headers.first(name);
        if !operator::evaluate(cond, actual) {
            return None;
        }
        score += 1;
    }

    if !matcher.form_params.is_empty() {
        if !exchange.request.is_form() {
            return None;
        }
        let form = exchange.request.form_params();
        for (name, cond) in &matcher.form_params {
            let actual = form.get(name).map(String::as_str);
            if !operator::evaluate(cond, actual) {
                return None;
            }
            score += 1;
        }
    }

    if let Some(body_matcher) = &matcher.request_body {
        if !body::evaluate_body_matcher(body_matcher, &exchange.request.body) {
            return None;
        }
        score += 1;
    }

    Some(MatchOutcome {
        score,
        has_wildcard: matcher.has_wildcard,
        bound_path_params,
        path_param_values,
    })
}

fn match_segment(
    segment: &PathSegment,
    req_segment: &str,
    matcher: &CompiledRequestMatcher,
    score: &mut u32,
    bound_path_params: &mut u32,
    path_param_values: &mut HashMap<String, String>,
) -> Option<()> {
    match segment {
        PathSegment::Literal(lit) => {
            if lit != req_segment {
                return None;
            }
        }
        PathSegment::Param(name) => {
            path_param_values.insert(name.clone(), req_segment.to_string());
            if let Some(cond) = matcher.path_params.get(name) {
                if !operator::evaluate(cond, Some(req_segment)) {
                    return None;
                }
                *score += 1;
                *bound_path_params += 1;
            }
        }
        PathSegment::Wildcard => {}
    }
    Some(())
}
