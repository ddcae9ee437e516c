pub mod container;
pub mod entry;
pub mod handle;
pub mod interceptors;

pub use container::{PluginContainer, PluginHandle};
pub use entry::{InterceptorEntry, ResourceEntry};
pub use handle::{handle_request, HandleOutcome};
pub use interceptors::{run_interceptors, InterceptorOutcome};
