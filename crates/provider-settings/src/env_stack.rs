//! Ordered environment-source probing.
//!
//! The detector resolves a variable against an explicit ordered list of
//! lookup functions, stopping at the first source that yields a non-empty
//! value. The standard stack is request-scoped values, then the process
//! environment, then the static `[env]` overrides from the config file.
//! Each source can be swapped out independently in tests.

use std::collections::HashMap;

pub type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

pub struct EnvStack {
    sources: Vec<EnvLookup>,
}

impl EnvStack {
    /// Standard precedence: request-scoped map, process environment, config
    /// `[env]` overrides.
    #[must_use]
    pub fn new(
        request_env: HashMap<String, String>,
        config_overrides: HashMap<String, String>,
    ) -> Self {
        Self::from_sources(vec![
            Box::new(move |key| request_env.get(key).cloned()),
            Box::new(|key| std::env::var(key).ok()),
            Box::new(move |key| config_overrides.get(key).cloned()),
        ])
    }

    #[must_use]
    pub fn from_sources(sources: Vec<EnvLookup>) -> Self {
        Self { sources }
    }

    /// First non-empty value for `key` across the sources, trimmed.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.sources.iter().find_map(|source| {
            source(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        })
    }
}

impl std::fmt::Debug for EnvStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvStack")
            .field("sources", &self.sources.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_source(pairs: &[(&str, &str)]) -> EnvLookup {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Box::new(move |key| map.get(key).cloned())
    }

    #[test]
    fn earlier_sources_win() {
        let stack = EnvStack::from_sources(vec![
            map_source(&[("KEY", "first")]),
            map_source(&[("KEY", "second")]),
        ]);
        assert_eq!(stack.lookup("KEY").as_deref(), Some("first"));
    }

    #[test]
    fn blank_values_fall_through() {
        let stack = EnvStack::from_sources(vec![
            map_source(&[("KEY", "   ")]),
            map_source(&[("KEY", "second")]),
        ]);
        assert_eq!(stack.lookup("KEY").as_deref(), Some("second"));
    }

    #[test]
    fn values_are_trimmed() {
        let stack = EnvStack::from_sources(vec![map_source(&[("KEY", "  value  ")])]);
        assert_eq!(stack.lookup("KEY").as_deref(), Some("value"));
    }

    #[test]
    fn missing_key_is_none() {
        let stack = EnvStack::from_sources(vec![map_source(&[("OTHER", "x")])]);
        assert_eq!(stack.lookup("KEY"), None);
    }
}
