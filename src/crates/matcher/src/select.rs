use crate::compiled::CompiledRequestMatcher;
use crate::eval::{self, MatchOutcome};
use imposter_base::{Exchange, RequestStore};

/// Anything scoreable by the matcher: a resource or an interceptor.
pub trait Candidate {
    fn compiled(&self) -> &CompiledRequestMatcher;
    fn scope_key(&self) -> Option<&str>;
    /// Global order across files in lexicographic filename order, per
    /// spec.md §4.1 tie-break rule (v).
    fn declaration_order(&self) -> u64;
}

struct Scored<'a, C> {
    candidate: &'a C,
    outcome: MatchOutcome,
}

/// Applies spec.md §4.1's tie-breaking rules (i)-(v) to the candidates that
/// matched at all, returning the unique winner together with its match
/// outcome so the caller can bind `path_param_values` onto the exchange.
pub fn select_best<'a, C: Candidate>(
    candidates: &'a [C],
    exchange: &Exchange,
    request_store: &RequestStore,
) -> Option<(&'a C, MatchOutcome)> {
    let mut scored: Vec<Scored<'a, C>> = candidates
        .iter()
        .filter_map(|c| eval::evaluate(c.compiled(), exchange).map(|outcome| Scored {
            candidate: c,
            outcome,
        }))
        .collect();

    if scored.is_empty() {
        return None;
    }
    if scored.len() == 1 {
        let winner = scored.remove(0);
        return Some((winner.candidate, winner.outcome));
    }

    // (i) strictly higher score wins
    let max_score = scored.iter().map(|s| s.outcome.score).max().unwrap();
    scored.retain(|s| s.outcome.score == max_score);
    if scored.len() == 1 {
        let winner = scored.remove(0);
        return Some((winner.candidate, winner.outcome));
    }

    // (ii) non-wildcard beats wildcard
    if scored.iter().any(|s| !s.outcome.has_wildcard) {
        scored.retain(|s| !s.outcome.has_wildcard);
    }
    if scored.len() == 1 {
        let winner = scored.remove(0);
        return Some((winner.candidate, winner.outcome));
    }

    // (iii) more bound path params wins
    let max_bound = scored
        .iter()
        .map(|s| s.outcome.bound_path_params)
        .max()
        .unwrap();
    scored.retain(|s| s.outcome.bound_path_params == max_bound);
    if scored.len() == 1 {
        let winner = scored.remove(0);
        return Some((winner.candidate, winner.outcome));
    }

    scored.sort_by_key(|s| s.candidate.declaration_order());

    // (iv) scopeKey: first with a matching (truthy) request-store value wins
    if let Some(idx) = scored.iter().position(|s| {
        s.candidate
            .scope_key()
            .and_then(|key| request_store.get(key))
            .map(is_truthy)
            .unwrap_or(false)
    }) {
        let winner = scored.remove(idx);
        return Some((winner.candidate, winner.outcome));
    }

    // (v) otherwise declaration order; a remaining tie logs a warning
    tracing::warn!(
        candidates = scored.len(),
        "multiple resources tied after every tie-break rule; choosing the first by declaration order"
    );
    let winner = scored.remove(0);
    Some((winner.candidate, winner.outcome))
}

fn is_truthy(value: &serde_json::Value) -> bool {
    !matches!(value, serde_json::Value::Null | serde_json::Value::Bool(false))
}
