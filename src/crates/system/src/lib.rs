pub mod catalogue;
pub mod cors;
pub mod status;
pub mod store_api;

use imposter_base::{Request, ResponseState};
use imposter_store::StoreRegistry;

/// The built-in `/system/*` handler: tries the status endpoint, then the
/// store API. Returns `None` if `request.path` isn't under `/system/`.
pub fn handle_system_request(request: &Request, stores: &StoreRegistry, version: &str) -> Option<ResponseState> {
    if !request.path.starts_with("/system/") {
        return None;
    }
    status::handle(request, version).or_else(|| store_api::handle(request, stores))
}
