//! Matcher configuration.

/// Construction-time settings for a [`MapMatcher`](super::MapMatcher).
///
/// Linked matchers inherit the configuration of the matcher that created them.
///
/// # Examples
///
/// ```
/// use u_matcher::MatcherConfig;
///
/// let config = MatcherConfig::default()
///     .with_anonymous_prefix("anon-")
///     .with_auto_priority(-10);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherConfig {
    /// Prefix for names synthesized when a rule is keyed on an
    /// unregistered function.
    pub anonymous_prefix: String,

    /// Priority given to classifiers registered implicitly by a rule.
    pub auto_priority: i32,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            anonymous_prefix: "#".to_string(),
            auto_priority: 0,
        }
    }
}

impl MatcherConfig {
    pub fn with_anonymous_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.anonymous_prefix = prefix.into();
        self
    }

    pub fn with_auto_priority(mut self, priority: i32) -> Self {
        self.auto_priority = priority;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.anonymous_prefix.is_empty() {
            return Err("anonymous_prefix must not be empty".into());
        }
        Ok(())
    }
}
