//! Per-provider configuration detection.
//!
//! For each local provider, decides whether an environment source supplies a
//! usable base URL or API token. The pass is infallible: a provider with no
//! registry descriptor, or any value failing validation, is reported
//! unconfigured rather than erroring, so callers always receive a full
//! well-formed report.

use {
    banter_providers::{ConfiguredProvider, ProviderRegistry},
    tracing::debug,
};

use crate::env_stack::EnvStack;

/// Minimum credential length; anything at or below this is treated as a
/// truncated or placeholder value.
const MIN_API_TOKEN_LEN: usize = 10;

fn is_placeholder(value: &str) -> bool {
    value.contains("your_") || value.contains("_here")
}

fn qualifies_as_base_url(value: &str) -> bool {
    !value.is_empty() && !is_placeholder(value) && value.starts_with("http")
}

fn qualifies_as_api_token(value: &str) -> bool {
    !value.is_empty() && !is_placeholder(value) && value.len() > MIN_API_TOKEN_LEN
}

/// Produce one report entry per local provider, in input order.
///
/// The base-URL key is checked first; if it does not qualify, the API-token
/// key (when declared) is checked next. The first non-empty value found in
/// the source stack is the only candidate for each key: a placeholder in a
/// higher-precedence source is not papered over by a later one.
pub fn detect_configured_providers(
    registry: &ProviderRegistry,
    local_names: &[String],
    env: &EnvStack,
) -> Vec<ConfiguredProvider> {
    local_names
        .iter()
        .map(|name| detect_one(registry, name, env))
        .collect()
}

fn detect_one(registry: &ProviderRegistry, name: &str, env: &EnvStack) -> ConfiguredProvider {
    let Some(descriptor) = registry.get(name) else {
        debug!(provider = %name, "no registry descriptor, reporting unconfigured");
        return ConfiguredProvider::unconfigured(name);
    };

    if let Some(key) = descriptor.base_url_key
        && env.lookup(key).is_some_and(|v| qualifies_as_base_url(&v))
    {
        return ConfiguredProvider::environment(name);
    }

    if let Some(key) = descriptor.api_token_key
        && env.lookup(key).is_some_and(|v| qualifies_as_api_token(&v))
    {
        return ConfiguredProvider::environment(name);
    }

    ConfiguredProvider::unconfigured(name)
}
