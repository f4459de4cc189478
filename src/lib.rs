//! API Description Analyzer
//!
//! Derives a typed [`AnalysisModel`] from a parsed API description document
//! (OpenAPI style: `paths`, `components.schemas`, `components.securitySchemes`,
//! `webhooks`). The model lists the operations, how resources relate, which
//! multi-step usage patterns the endpoints imply, and which optional runtime
//! features a host should activate.
//!
//! Analysis is a pure, synchronous transformation: no network I/O and no
//! state kept between calls.
//!
//! # Example
//!
//! ```
//! use apispec_analyzer::{analyze, WorkflowType};
//! use serde_json::json;
//!
//! let document = json!({
//!     "openapi": "3.1.0",
//!     "paths": {
//!         "/widgets": {
//!             "get": { "summary": "List widgets", "responses": { "200": {} } },
//!             "post": { "summary": "Create a widget", "responses": { "201": {} } }
//!         },
//!         "/widgets/{id}": {
//!             "get": { "responses": { "200": {} } },
//!             "put": { "responses": { "200": {} } },
//!             "delete": { "responses": { "204": {}, "429": {} } }
//!         }
//!     }
//! });
//!
//! let model = analyze(&document).unwrap();
//!
//! assert_eq!(model.endpoints.len(), 5);
//! assert_eq!(model.workflows[0].name, "widgets_crud");
//! assert_eq!(model.workflows[0].workflow_type, WorkflowType::Crud);
//! assert!(model.error_patterns[0].recoverable);
//! assert!(model.features.has_tools);
//! ```
//!
//! # Pipeline
//!
//! | Stage | Produces |
//! |-------|----------|
//! | scanner | endpoints, classified action/resource, complexity score |
//! | relationships | resources and typed relationships from `$ref` properties |
//! | workflows | CRUD, authentication, pagination and file upload patterns |
//! | error patterns | 4xx/5xx responses, tagged recoverable or not |
//! | capabilities | document-wide flags and feature decisions |
//!
//! [`analyze_with_context`] reruns the pipeline and overlays flags taken
//! from the host's environment and workspace roots.

mod analyzer;
mod capabilities;
mod config;
mod document;
mod error;
mod error_patterns;
mod loader;
pub mod predicates;
mod relationships;
mod scanner;
mod types;
mod workflows;

pub use analyzer::{analyze, analyze_with_context, context_flags, Analyzer, PRODUCTION_ENVIRONMENT};
pub use capabilities::{decide_features, evaluate_capabilities, AnalysisCounts, FeatureDecision};
pub use config::{AnalyzerConfig, ComplexityWeights, FeatureThresholds, DEFAULT_CORE_KEYWORDS};
pub use document::{ref_target_name, ApiDocument};
pub use error::{AnalyzeError, LoadError};
pub use error_patterns::classify_error_patterns;
pub use loader::{
    is_url, load_config, load_context, load_document, load_document_auto, load_document_str,
};
pub use relationships::{
    extract_relationships, extract_resources, infer_relationship_type, related_resources,
};
pub use scanner::{classify_action, classify_resource, complexity_score, has_tools, is_operation, scan_endpoints};
pub use types::{
    AnalysisContext, AnalysisModel, CapabilityFlags, ContextFlags, Endpoint, ErrorPattern,
    FeatureFlags, HttpMethod, Relationship, RelationshipType, Resource, Root, WorkflowPattern,
    WorkflowStep, WorkflowType, RECOGNIZED_METHODS,
};
pub use workflows::{crud_workflow, detect_crud, detect_workflows, resource_segment, CRUD_METHODS};

#[cfg(feature = "remote")]
pub use loader::load_document_url;
