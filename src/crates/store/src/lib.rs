pub mod registry;
pub mod store;

pub use registry::StoreRegistry;
pub use store::Store;
