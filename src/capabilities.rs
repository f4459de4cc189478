//! Document-wide capability flags and the feature decisions built on them.

use serde_json::Value;

use crate::config::FeatureThresholds;
use crate::document::ApiDocument;
use crate::predicates::{is_batch_path, is_rate_limit_header, is_webhook_path};
use crate::scanner::responses;
use crate::types::{CapabilityFlags, Endpoint};
use crate::workflows::has_pagination_params;

/// Evaluate every capability flag. Flags without evidence stay false.
pub fn evaluate_capabilities(doc: &ApiDocument<'_>, endpoints: &[Endpoint]) -> CapabilityFlags {
    let paths = doc.paths();

    CapabilityFlags {
        has_pagination: has_pagination_params(doc, endpoints),
        has_batch_operations: paths.keys().any(|p| is_batch_path(p)),
        has_webhooks: doc.declares_webhooks() || paths.keys().any(|p| is_webhook_path(p)),
        has_async_operations: endpoints.iter().any(declares_accepted),
        has_authentication: doc.security_scheme_count() > 0,
        has_rate_limiting: endpoints
            .iter()
            .any(|e| declares_rate_limit_header(doc, &e.operation)),
    }
}

/// Aggregate counts fed to [`decide_features`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisCounts {
    pub workflows: usize,
    pub relationships: usize,
    pub error_patterns: usize,
}

/// Higher-order activation flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureDecision {
    pub requires_sampling: bool,
    pub requires_context_management: bool,
    pub requires_error_intelligence: bool,
}

/// Decide which optional runtime features the model calls for.
///
/// These are advisory; the analyzer does not act on them.
pub fn decide_features(
    counts: AnalysisCounts,
    capabilities: &CapabilityFlags,
    thresholds: &FeatureThresholds,
) -> FeatureDecision {
    FeatureDecision {
        requires_sampling: counts.workflows > thresholds.sampling_workflows
            || capabilities.has_async_operations,
        requires_context_management: counts.relationships > thresholds.context_relationships,
        requires_error_intelligence: counts.error_patterns > thresholds.error_intelligence_patterns,
    }
}

fn declares_accepted(endpoint: &Endpoint) -> bool {
    responses(&endpoint.operation).is_some_and(|r| r.contains_key("202"))
}

fn declares_rate_limit_header(doc: &ApiDocument<'_>, operation: &Value) -> bool {
    responses(operation)
        .into_iter()
        .flat_map(|r| r.values())
        .filter_map(|response| doc.deref(response))
        .filter_map(|response| response.get("headers").and_then(Value::as_object))
        .any(|headers| headers.keys().any(|h| is_rate_limit_header(h)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ComplexityWeights;
    use crate::scanner::scan_endpoints;
    use serde_json::json;

    fn evaluate(doc: &Value) -> CapabilityFlags {
        let api = ApiDocument::new(doc).unwrap();
        let endpoints = scan_endpoints(&api, &ComplexityWeights::default());
        evaluate_capabilities(&api, &endpoints)
    }

    #[test]
    fn empty_document_has_no_capabilities() {
        assert_eq!(evaluate(&json!({ "paths": {} })), CapabilityFlags::default());
    }

    #[test]
    fn batch_and_webhook_paths() {
        let caps = evaluate(&json!({
            "paths": {
                "/orders/bulk": { "post": { "responses": {} } },
                "/webhooks/stripe": { "post": { "responses": {} } }
            }
        }));
        assert!(caps.has_batch_operations);
        assert!(caps.has_webhooks);
        assert!(!caps.has_pagination);
    }

    #[test]
    fn webhooks_section() {
        let caps = evaluate(&json!({
            "paths": {},
            "webhooks": { "newPet": { "post": { "responses": {} } } }
        }));
        assert!(caps.has_webhooks);

        let caps = evaluate(&json!({ "paths": {}, "webhooks": {} }));
        assert!(caps.has_webhooks);

        let caps = evaluate(&json!({ "paths": {}, "webhooks": [] }));
        assert!(!caps.has_webhooks);
    }

    #[test]
    fn accepted_response_means_async() {
        let caps = evaluate(&json!({
            "paths": { "/jobs": { "post": { "responses": { "202": { "description": "Queued" } } } } }
        }));
        assert!(caps.has_async_operations);
    }

    #[test]
    fn security_schemes_mean_authentication() {
        let caps = evaluate(&json!({
            "paths": {},
            "components": {
                "securitySchemes": { "bearer": { "type": "http", "scheme": "bearer" } }
            }
        }));
        assert!(caps.has_authentication);
    }

    #[test]
    fn rate_limit_headers_either_spelling() {
        for header in ["X-RateLimit-Limit", "RateLimit-Limit"] {
            let caps = evaluate(&json!({
                "paths": {
                    "/x": {
                        "get": {
                            "responses": { "200": { "headers": { header: { "schema": {} } } } }
                        }
                    }
                }
            }));
            assert!(caps.has_rate_limiting, "{header}");
        }
    }

    #[test]
    fn feature_thresholds_are_strict() {
        let thresholds = FeatureThresholds::default();
        let caps = CapabilityFlags::default();

        let at = AnalysisCounts {
            workflows: 2,
            relationships: 3,
            error_patterns: 5,
        };
        assert_eq!(decide_features(at, &caps, &thresholds), FeatureDecision::default());

        let above = AnalysisCounts {
            workflows: 3,
            relationships: 4,
            error_patterns: 6,
        };
        let decision = decide_features(above, &caps, &thresholds);
        assert!(decision.requires_sampling);
        assert!(decision.requires_context_management);
        assert!(decision.requires_error_intelligence);
    }

    #[test]
    fn async_operations_require_sampling() {
        let caps = CapabilityFlags {
            has_async_operations: true,
            ..CapabilityFlags::default()
        };
        let decision = decide_features(
            AnalysisCounts::default(),
            &caps,
            &FeatureThresholds::default(),
        );
        assert!(decision.requires_sampling);
    }
}
