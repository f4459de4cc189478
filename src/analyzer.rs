//! Analysis pipeline.
//!
//! document -> scanner -> {relationships, workflows, error patterns}
//! -> capabilities -> feature decisions -> [`AnalysisModel`].

use serde_json::Value;
use tracing::{debug, info};

use crate::capabilities::{decide_features, evaluate_capabilities, AnalysisCounts};
use crate::config::AnalyzerConfig;
use crate::document::ApiDocument;
use crate::error::AnalyzeError;
use crate::error_patterns::classify_error_patterns;
use crate::relationships::{extract_relationships, extract_resources};
use crate::scanner::{has_tools, scan_endpoints};
use crate::types::{AnalysisContext, AnalysisModel, ContextFlags, FeatureFlags};
use crate::workflows::detect_workflows;

/// Environment name that forces strict validation.
pub const PRODUCTION_ENVIRONMENT: &str = "production";

/// Runs the analysis pipeline with a fixed configuration.
///
/// Holds no mutable state; one analyzer can serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze a parsed document.
    ///
    /// # Errors
    ///
    /// Returns `AnalyzeError::InvalidDocument` if the document is not an
    /// object or lacks a `paths` object. Nothing else fails.
    pub fn analyze(&self, document: &Value) -> Result<AnalysisModel, AnalyzeError> {
        let doc = ApiDocument::new(document)?;
        let config = &self.config;

        let endpoints = scan_endpoints(&doc, &config.complexity);
        let resources = extract_resources(&doc, &config.core_keywords);
        let relationships = extract_relationships(&doc, &resources);
        let workflows = detect_workflows(&doc, &endpoints);
        let error_patterns = classify_error_patterns(&doc, &endpoints);

        let capabilities = evaluate_capabilities(&doc, &endpoints);
        debug!(?capabilities, "evaluated capabilities");

        let counts = AnalysisCounts {
            workflows: workflows.len(),
            relationships: relationships.len(),
            error_patterns: error_patterns.len(),
        };
        let decision = decide_features(counts, &capabilities, &config.thresholds);

        let features = FeatureFlags {
            has_tools: has_tools(&endpoints, &config.complexity),
            has_resources: !resources.is_empty() || endpoints.iter().any(|e| e.is_resource),
            has_prompts: !workflows.is_empty(),
            requires_sampling: decision.requires_sampling,
            requires_context_management: decision.requires_context_management,
            requires_error_intelligence: decision.requires_error_intelligence,
        };

        info!(
            endpoints = endpoints.len(),
            resources = resources.len(),
            relationships = relationships.len(),
            workflows = workflows.len(),
            error_patterns = error_patterns.len(),
            "analysis complete"
        );

        Ok(AnalysisModel {
            endpoints,
            resources,
            relationships,
            workflows,
            error_patterns,
            capabilities,
            features,
            context: ContextFlags::default(),
        })
    }

    /// Analyze again and overlay flags derived from `context`.
    ///
    /// Always builds a fresh model; models returned earlier are untouched.
    pub fn analyze_with_context(
        &self,
        document: &Value,
        context: &AnalysisContext,
    ) -> Result<AnalysisModel, AnalyzeError> {
        let mut model = self.analyze(document)?;
        let overlay = context_flags(context);
        if overlay.requires_strict_validation {
            model.context.requires_strict_validation = true;
        }
        if overlay.has_test_mode {
            model.context.has_test_mode = true;
        }
        debug!(context = ?model.context, "applied context overlay");
        Ok(model)
    }
}

/// Flags implied by a context snapshot.
pub fn context_flags(context: &AnalysisContext) -> ContextFlags {
    ContextFlags {
        requires_strict_validation: context.environment.as_deref() == Some(PRODUCTION_ENVIRONMENT),
        has_test_mode: context
            .roots
            .iter()
            .filter_map(|root| root.name.as_deref())
            .any(|name| name.to_lowercase().contains("test")),
    }
}

/// Analyze with the default configuration.
pub fn analyze(document: &Value) -> Result<AnalysisModel, AnalyzeError> {
    Analyzer::default().analyze(document)
}

/// Context-aware analysis with the default configuration.
pub fn analyze_with_context(
    document: &Value,
    context: &AnalysisContext,
) -> Result<AnalysisModel, AnalyzeError> {
    Analyzer::default().analyze_with_context(document, context)
}
