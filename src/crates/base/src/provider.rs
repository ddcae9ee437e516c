use crate::context::ImposterContext;
use async_trait::async_trait;
use imposter_errors::ImposterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderScope {
    Singleton,
    Transient,
}

pub type DefaultProviderError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[async_trait]
pub trait Provider: Send + Sync + Sized + 'static {
    async fn provide(ctx: &ImposterContext) -> Result<Self, ImposterError>;
}
