//! Tunable analyzer settings.
//!
//! The complexity weights, feature thresholds and core-resource keywords are
//! heuristics, not product rules. Every field has a default, so a config file
//! only needs to name what it overrides:
//!
//! ```json
//! { "core_keywords": ["tenant", "user"], "thresholds": { "context_relationships": 10 } }
//! ```

use serde::{Deserialize, Deserializer, Serialize};

/// Default resource-name keywords that mark a resource as core.
pub const DEFAULT_CORE_KEYWORDS: &[&str] = &["user", "account", "organization", "project", "product"];

/// Weights and cut-offs for the per-endpoint complexity score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplexityWeights {
    /// One point per this many parameters (floored).
    pub parameters_per_point: u32,
    /// Extra point when a JSON body schema has more properties than this.
    pub large_body_properties: usize,
    /// Extra point when more response entries than this are declared.
    pub many_responses: usize,
    /// Endpoints scoring above this count as tool candidates.
    pub tool_threshold: u32,
}

impl Default for ComplexityWeights {
    fn default() -> Self {
        Self {
            parameters_per_point: 3,
            large_body_properties: 5,
            many_responses: 3,
            tool_threshold: 2,
        }
    }
}

/// Aggregate counts above which a feature is activated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureThresholds {
    pub sampling_workflows: usize,
    pub context_relationships: usize,
    pub error_intelligence_patterns: usize,
}

impl Default for FeatureThresholds {
    fn default() -> Self {
        Self {
            sampling_workflows: 2,
            context_relationships: 3,
            error_intelligence_patterns: 5,
        }
    }
}

/// Analyzer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Lowercase keywords; a resource whose name contains one is core.
    #[serde(deserialize_with = "lowercase_keywords")]
    pub core_keywords: Vec<String>,
    pub complexity: ComplexityWeights,
    pub thresholds: FeatureThresholds,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            core_keywords: DEFAULT_CORE_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            complexity: ComplexityWeights::default(),
            thresholds: FeatureThresholds::default(),
        }
    }
}

fn lowercase_keywords<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let keywords = Vec::<String>::deserialize(deserializer)?;
    Ok(keywords.into_iter().map(|k| k.to_lowercase()).collect())
}

impl AnalyzerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the core keyword list. Keywords are normalized to lowercase.
    pub fn core_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.core_keywords = keywords
            .into_iter()
            .map(|k| k.into().to_lowercase())
            .collect();
        self
    }

    pub fn complexity(mut self, weights: ComplexityWeights) -> Self {
        self.complexity = weights;
        self
    }

    pub fn thresholds(mut self, thresholds: FeatureThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: AnalyzerConfig =
            serde_json::from_value(json!({ "thresholds": { "context_relationships": 10 } }))
                .unwrap();
        assert_eq!(config.thresholds.context_relationships, 10);
        assert_eq!(config.thresholds.sampling_workflows, 2);
        assert_eq!(config.complexity, ComplexityWeights::default());
        assert_eq!(config.core_keywords.len(), DEFAULT_CORE_KEYWORDS.len());
    }

    #[test]
    fn core_keywords_are_lowercased() {
        let config = AnalyzerConfig::new().core_keywords(["Tenant", "USER"]);
        assert_eq!(config.core_keywords, vec!["tenant", "user"]);
    }

    #[test]
    fn deserialized_core_keywords_are_lowercased() {
        let config: AnalyzerConfig =
            serde_json::from_value(json!({ "core_keywords": ["Widget", "TENANT"] })).unwrap();
        assert_eq!(config.core_keywords, vec!["widget", "tenant"]);
    }
}
