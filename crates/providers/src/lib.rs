//! Provider registry: capability descriptors and the detection report types.
//!
//! Providers fall into two disjoint classes. Local providers (self-hosted,
//! URL-configurable runtimes such as Ollama) start disabled and are subject
//! to the auto-enable pass; cloud providers start enabled and are exempt.

use serde::{Deserialize, Serialize};

/// Known provider definition: which environment keys would configure it and
/// whether it belongs to the local (self-hosted) class.
#[derive(Debug, Clone)]
pub struct ProviderDescriptor {
    pub name: &'static str,
    pub display_name: &'static str,
    /// Env key that would supply a base URL (local runtimes).
    pub base_url_key: Option<&'static str>,
    /// Env key that would supply an API token.
    pub api_token_key: Option<&'static str>,
    /// Default base URL, for display and for probing local runtimes.
    pub default_base_url: Option<&'static str>,
    /// Whether this provider is in the local (self-hosted) class.
    pub local: bool,
}

/// Build the known providers list.
pub fn known_providers() -> Vec<ProviderDescriptor> {
    vec![
        ProviderDescriptor {
            name: "ollama",
            display_name: "Ollama",
            base_url_key: Some("OLLAMA_API_BASE_URL"),
            api_token_key: None,
            default_base_url: Some("http://localhost:11434"),
            local: true,
        },
        ProviderDescriptor {
            name: "lmstudio",
            display_name: "LM Studio",
            base_url_key: Some("LMSTUDIO_API_BASE_URL"),
            api_token_key: None,
            default_base_url: Some("http://localhost:1234"),
            local: true,
        },
        ProviderDescriptor {
            name: "openai-like",
            display_name: "OpenAI-compatible",
            base_url_key: Some("OPENAI_LIKE_API_BASE_URL"),
            api_token_key: Some("OPENAI_LIKE_API_KEY"),
            default_base_url: None,
            local: true,
        },
        ProviderDescriptor {
            name: "openai",
            display_name: "OpenAI",
            base_url_key: None,
            api_token_key: Some("OPENAI_API_KEY"),
            default_base_url: Some("https://api.openai.com/v1"),
            local: false,
        },
        ProviderDescriptor {
            name: "anthropic",
            display_name: "Anthropic",
            base_url_key: None,
            api_token_key: Some("ANTHROPIC_API_KEY"),
            default_base_url: Some("https://api.anthropic.com"),
            local: false,
        },
        ProviderDescriptor {
            name: "gemini",
            display_name: "Google Gemini",
            base_url_key: None,
            api_token_key: Some("GEMINI_API_KEY"),
            default_base_url: Some("https://generativelanguage.googleapis.com/v1beta"),
            local: false,
        },
        ProviderDescriptor {
            name: "groq",
            display_name: "Groq",
            base_url_key: None,
            api_token_key: Some("GROQ_API_KEY"),
            default_base_url: Some("https://api.groq.com/openai/v1"),
            local: false,
        },
        ProviderDescriptor {
            name: "mistral",
            display_name: "Mistral",
            base_url_key: None,
            api_token_key: Some("MISTRAL_API_KEY"),
            default_base_url: Some("https://api.mistral.ai/v1"),
            local: false,
        },
        ProviderDescriptor {
            name: "deepseek",
            display_name: "DeepSeek",
            base_url_key: None,
            api_token_key: Some("DEEPSEEK_API_KEY"),
            default_base_url: Some("https://api.deepseek.com"),
            local: false,
        },
        ProviderDescriptor {
            name: "xai",
            display_name: "xAI (Grok)",
            base_url_key: None,
            api_token_key: Some("XAI_API_KEY"),
            default_base_url: Some("https://api.x.ai/v1"),
            local: false,
        },
        ProviderDescriptor {
            name: "openrouter",
            display_name: "OpenRouter",
            base_url_key: None,
            api_token_key: Some("OPENROUTER_API_KEY"),
            default_base_url: Some("https://openrouter.ai/api/v1"),
            local: false,
        },
    ]
}

/// Lookup surface over the known providers.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: Vec<ProviderDescriptor>,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self {
            providers: known_providers(),
        }
    }
}

impl ProviderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &ProviderDescriptor> {
        self.providers.iter()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ProviderDescriptor> {
        self.providers.iter().find(|p| p.name == name)
    }

    #[must_use]
    pub fn is_known(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[must_use]
    pub fn is_local(&self, name: &str) -> bool {
        self.get(name).is_some_and(|p| p.local)
    }

    /// Names of the local providers, in registry order.
    #[must_use]
    pub fn local_provider_names(&self) -> Vec<String> {
        self.providers
            .iter()
            .filter(|p| p.local)
            .map(|p| p.name.to_string())
            .collect()
    }
}

/// How a provider's connection details were supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigMethod {
    Environment,
    None,
}

/// Detection report entry for one local provider. Produced fresh on each
/// detection call and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguredProvider {
    pub name: String,
    pub is_configured: bool,
    pub config_method: ConfigMethod,
}

impl ConfiguredProvider {
    #[must_use]
    pub fn environment(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_configured: true,
            config_method: ConfigMethod::Environment,
        }
    }

    #[must_use]
    pub fn unconfigured(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_configured: false,
            config_method: ConfigMethod::None,
        }
    }
}

/// Well-formed all-unconfigured report, used wherever detection fails and a
/// full list must still be returned.
#[must_use]
pub fn unconfigured_report(local_names: &[String]) -> Vec<ConfiguredProvider> {
    local_names
        .iter()
        .map(ConfiguredProvider::unconfigured)
        .collect()
}
