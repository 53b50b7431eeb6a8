//! Service trait interfaces for domain services.
//!
//! Each trait has a `Noop` implementation that returns empty/default
//! responses, allowing hosts to run standalone before domain crates are
//! wired in.

use {async_trait::async_trait, banter_providers::ConfiguredProvider};

/// Error type returned by service methods.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{message}")]
    Message { message: String },
    #[error("{0}")]
    Serde(#[from] serde_json::Error),
}

impl ServiceError {
    #[must_use]
    pub fn message(message: impl std::fmt::Display) -> Self {
        Self::Message {
            message: message.to_string(),
        }
    }
}

impl From<String> for ServiceError {
    fn from(value: String) -> Self {
        Self::message(value)
    }
}

impl From<&str> for ServiceError {
    fn from(value: &str) -> Self {
        Self::message(value)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

// ── Configured providers ───────────────────────────────────────────────────

/// Read-only query for the detection endpoint: which local providers have
/// environment-supplied connection details. Implementations must return one
/// entry per local provider, in local-provider order, even on internal
/// failure (degrading entries to unconfigured rather than erroring).
#[async_trait]
pub trait ConfiguredProviderService: Send + Sync {
    async fn list_configured(&self) -> ServiceResult<Vec<ConfiguredProvider>>;
}

pub struct NoopConfiguredProviderService;

#[async_trait]
impl ConfiguredProviderService for NoopConfiguredProviderService {
    async fn list_configured(&self) -> ServiceResult<Vec<ConfiguredProvider>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_service_returns_empty_report() {
        let report = NoopConfiguredProviderService
            .list_configured()
            .await
            .unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn service_error_from_str() {
        let err: ServiceError = "detection endpoint unreachable".into();
        assert_eq!(err.to_string(), "detection endpoint unreachable");
    }
}
