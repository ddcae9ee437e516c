use crate::resolver::{resolve, TemplateContext};

/// Expands every `${expr}` occurrence in `input` against `ctx`. A string
/// containing no `${` is returned unchanged (spec.md §8 "Template
/// idempotence for literal inputs").
///
/// `expr` is a dotted path with an optional `:-default` suffix. Unresolved
/// expressions with no default expand to the empty string and log at DEBUG
/// (spec.md §4.3).
pub fn render(input: &str, ctx: &TemplateContext<'_>) -> String {
    if !input.contains("${") {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let expr = &after[..end];
                out.push_str(&evaluate_one(expr, ctx));
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

fn evaluate_one(expr: &str, ctx: &TemplateContext<'_>) -> String {
    let (path, default) = match expr.split_once(":-") {
        Some((p, d)) => (p, Some(d)),
        None => (expr, None),
    };

    match resolve(path, ctx) {
        Some(value) => value,
        None => match default {
            Some(d) => d.to_string(),
            None => {
                tracing::debug!(expr = path, "unresolved template expression");
                String::new()
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::rng::FixedRng;
    use crate::system_info::SystemInfo;
    use chrono::TimeZone;
    use imposter_base::{Exchange, Request};
    use imposter_store::StoreRegistry;

    fn fixture() -> (Exchange, StoreRegistry, SystemInfo, FixedClock, FixedRng) {
        let mut exchange = Exchange::new(Request::new("GET", "/items/42"));
        exchange
            .request
            .path_params
            .insert("id".to_string(), "42".to_string());
        (
            exchange,
            StoreRegistry::new(),
            SystemInfo::new(8080, None, "0.1.0"),
            FixedClock(chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            FixedRng::default(),
        )
    }

    #[test]
    fn literal_string_is_unchanged() {
        let (exchange, stores, system, clock, rng) = fixture();
        let ctx = TemplateContext {
            exchange: &exchange,
            stores: &stores,
            system: &system,
            clock: &clock,
            rng: &rng,
        };
        assert_eq!(render("plain text", &ctx), "plain text");
    }

    #[test]
    fn expands_known_expression() {
        let (exchange, stores, system, clock, rng) = fixture();
        let ctx = TemplateContext {
            exchange: &exchange,
            stores: &stores,
            system: &system,
            clock: &clock,
            rng: &rng,
        };
        assert_eq!(
            render("item-${context.request.pathParams.id}", &ctx),
            "item-42"
        );
    }

    #[test]
    fn unresolved_expression_uses_default() {
        let (exchange, stores, system, clock, rng) = fixture();
        let ctx = TemplateContext {
            exchange: &exchange,
            stores: &stores,
            system: &system,
            clock: &clock,
            rng: &rng,
        };
        assert_eq!(
            render("${stores.missing.key:-fallback}", &ctx),
            "fallback"
        );
    }

    #[test]
    fn unresolved_expression_without_default_is_empty() {
        let (exchange, stores, system, clock, rng) = fixture();
        let ctx = TemplateContext {
            exchange: &exchange,
            stores: &stores,
            system: &system,
            clock: &clock,
            rng: &rng,
        };
        assert_eq!(render("x${nonsense.path}y", &ctx), "xy");
    }
}
