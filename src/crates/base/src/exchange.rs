use crate::request::Request;
use crate::request_store::RequestStore;
use crate::response_state::ResponseState;

/// Per-request, single-owner object carrying the request view, the mutable
/// response state, and the request-scoped store. Lifetime = one request.
///
/// Never shared across scheduling units: handlers may spawn background work
/// but must not mutate `response` after the adapter has begun writing.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub request: Request,
    pub response: ResponseState,
    pub store: RequestStore,
}

impl Exchange {
    pub fn new(request: Request) -> Self {
        Self {
            request,
            response: ResponseState::new(),
            store: RequestStore::new(),
        }
    }
}
