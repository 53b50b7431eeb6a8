//! Reqwest-backed client for the detection endpoint.

use {
    async_trait::async_trait,
    banter_providers::{ConfiguredProvider, ProviderRegistry, unconfigured_report},
    banter_service_traits::{ConfiguredProviderService, ServiceResult},
    tracing::warn,
};

use crate::error::{Error, Result};

/// Queries `GET {base_url}/api/providers/configured`. Transport, status, and
/// parse failures all degrade to a full all-unconfigured report: the caller
/// always receives one entry per local provider and never an error.
pub struct HttpConfiguredProviderClient {
    base_url: String,
    client: reqwest::Client,
    local_names: Vec<String>,
}

impl HttpConfiguredProviderClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>, registry: &ProviderRegistry) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
            local_names: registry.local_provider_names(),
        }
    }

    async fn fetch(&self) -> Result<Vec<ConfiguredProvider>> {
        let url = format!(
            "{}/api/providers/configured",
            self.base_url.trim_end_matches('/')
        );
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Error::message(format!(
                "detection endpoint returned HTTP {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ConfiguredProviderService for HttpConfiguredProviderClient {
    async fn list_configured(&self) -> ServiceResult<Vec<ConfiguredProvider>> {
        match self.fetch().await {
            Ok(report) => Ok(report),
            Err(error) => {
                warn!(
                    base_url = %self.base_url,
                    error = %error,
                    "configured-provider query failed, treating all providers as unconfigured"
                );
                Ok(unconfigured_report(&self.local_names))
            },
        }
    }
}
