use imposter_base::model::{CaptureSpec, Interceptor, Resource, ResponseSpec};
use imposter_errors::matcher::MatchError;
use imposter_matcher::{compile, Candidate, CompiledRequestMatcher, PathSegment};
use std::collections::HashMap;

/// A loaded [`Resource`] with its matcher pre-compiled, per spec.md §3
/// invariant "a resource's compiled matcher is immutable after load". The
/// matcher is compiled against the effective path (`basePath` + declared
/// path, spec.md §3) so it matches the raw, unstripped request path the
/// dispatcher hands it.
pub struct ResourceEntry {
    pub compiled: CompiledRequestMatcher,
    pub response: ResponseSpec,
    pub capture: HashMap<String, CaptureSpec>,
    declaration_order: u64,
}

impl ResourceEntry {
    pub fn compile(
        resource: &Resource,
        effective_path: &str,
        declaration_order: u64,
    ) -> Result<Self, MatchError> {
        let mut matcher = resource.matcher.clone();
        matcher.path = effective_path.to_string();
        Ok(Self {
            compiled: compile(&matcher)?,
            response: resource.response.clone(),
            capture: resource.capture.clone(),
            declaration_order,
        })
    }

    /// Reconstructs the effective route path from the compiled segments, for
    /// display in the 404 catalogue — the compiled matcher doesn't retain
    /// the original raw path string.
    pub fn effective_path(&self) -> String {
        let rendered: Vec<String> = self
            .compiled
            .segments
            .iter()
            .map(|segment| match segment {
                PathSegment::Literal(lit) => lit.clone(),
                PathSegment::Param(name) => format!("{{{name}}}"),
                PathSegment::Wildcard => "*".to_string(),
            })
            .collect();
        format!("/{}", rendered.join("/"))
    }

    pub fn method(&self) -> &str {
        &self.compiled.method
    }
}

impl Candidate for ResourceEntry {
    fn compiled(&self) -> &CompiledRequestMatcher {
        &self.compiled
    }

    fn scope_key(&self) -> Option<&str> {
        self.response.scope_key.as_deref()
    }

    fn declaration_order(&self) -> u64 {
        self.declaration_order
    }
}

/// A loaded [`Interceptor`]. Interceptors don't compete via `select_best` —
/// the runner walks them in declaration order instead (spec.md §4.2).
pub struct InterceptorEntry {
    pub compiled: CompiledRequestMatcher,
    pub response: Option<ResponseSpec>,
    pub capture: HashMap<String, CaptureSpec>,
    pub continue_on_match: bool,
}

impl InterceptorEntry {
    pub fn compile(interceptor: &Interceptor, effective_path: &str) -> Result<Self, MatchError> {
        let mut matcher = interceptor.matcher.clone();
        matcher.path = effective_path.to_string();
        Ok(Self {
            compiled: compile(&matcher)?,
            response: interceptor.response.clone(),
            capture: interceptor.capture.clone(),
            continue_on_match: interceptor.continue_,
        })
    }
}
