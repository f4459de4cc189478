//! Core types of the analysis model.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP methods recognized as operations.
pub const RECOGNIZED_METHODS: &[HttpMethod] = &[
    HttpMethod::Get,
    HttpMethod::Post,
    HttpMethod::Put,
    HttpMethod::Delete,
    HttpMethod::Patch,
];

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// HTTP method of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// Parse a method key from a path item, ignoring case.
    ///
    /// Returns `None` for anything outside the recognized verb set
    /// (`head`, `options`, `parameters`, `servers`, ...).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "delete" => Some(HttpMethod::Delete),
            "patch" => Some(HttpMethod::Patch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// True for methods that change server state.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single path + method operation found in the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Endpoint {
    pub path: String,
    pub method: HttpMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Raw operation descriptor, kept for downstream generators.
    pub operation: Value,
    pub is_action: bool,
    pub is_resource: bool,
    /// Always at least 1.
    pub complexity: u32,
    /// First declared tag, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Endpoint {
    /// `"<METHOD> <path>"`, the key used by error patterns and workflow steps.
    pub fn signature(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// A named schema definition exposed as a resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    pub name: String,
    /// Pointer to the schema definition (e.g. `#/components/schemas/User`).
    pub schema_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_core: bool,
    /// Names of directly referenced resources, in first-seen order.
    pub related: Vec<String>,
}

/// Kind of link between two resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    HasOne,
    HasMany,
    BelongsTo,
    ManyToMany,
    /// No property could be tied to the target; not a guess.
    Unknown,
}

/// Directed edge of the resource graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relationship {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub relationship_type: RelationshipType,
    /// Join resource for `many_to_many` links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub through: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowType {
    Crud,
    Auth,
    Pagination,
    Multipart,
    Async,
    Custom,
}

impl WorkflowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowType::Crud => "crud",
            WorkflowType::Auth => "auth",
            WorkflowType::Pagination => "pagination",
            WorkflowType::Multipart => "multipart",
            WorkflowType::Async => "async",
            WorkflowType::Custom => "custom",
        }
    }
}

/// One step of a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowStep {
    pub action: String,
    /// `"<METHOD> <path>"` when the step maps onto a concrete endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A recognized multi-call usage pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowPattern {
    /// Unique within a model.
    pub name: String,
    #[serde(rename = "type")]
    pub workflow_type: WorkflowType,
    pub description: String,
    /// Never empty.
    pub steps: Vec<WorkflowStep>,
}

/// A declared 4xx/5xx response of an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPattern {
    pub status_code: String,
    /// `"<METHOD> <path>"` of the declaring endpoint.
    pub endpoint: String,
    pub description: String,
    pub recoverable: bool,
}

/// Document-wide structural features. Absence of evidence is `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CapabilityFlags {
    pub has_pagination: bool,
    pub has_batch_operations: bool,
    pub has_webhooks: bool,
    pub has_async_operations: bool,
    pub has_authentication: bool,
    pub has_rate_limiting: bool,
}

/// Which generators have input and which optional runtime features to advertise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeatureFlags {
    pub has_tools: bool,
    pub has_resources: bool,
    pub has_prompts: bool,
    pub requires_sampling: bool,
    pub requires_context_management: bool,
    pub requires_error_intelligence: bool,
}

/// Flags derived from an [`AnalysisContext`]. Both false on plain analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContextFlags {
    pub requires_strict_validation: bool,
    pub has_test_mode: bool,
}

/// Aggregate analysis result.
///
/// Exposes no mutating API; re-analysis always produces a new value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisModel {
    pub endpoints: Vec<Endpoint>,
    pub resources: Vec<Resource>,
    pub relationships: Vec<Relationship>,
    pub workflows: Vec<WorkflowPattern>,
    pub error_patterns: Vec<ErrorPattern>,
    pub capabilities: CapabilityFlags,
    pub features: FeatureFlags,
    pub context: ContextFlags,
}

impl AnalysisModel {
    /// Look up a workflow by name.
    pub fn workflow(&self, name: &str) -> Option<&WorkflowPattern> {
        self.workflows.iter().find(|w| w.name == name)
    }

    /// Look up a resource by schema name.
    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.name == name)
    }
}

/// A workspace root reported by the hosting runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Root {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// External snapshot consulted by context-aware re-analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(default)]
    pub roots: Vec<Root>,
}

impl AnalysisContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn root(mut self, uri: impl Into<String>, name: Option<&str>) -> Self {
        self.roots.push(Root {
            uri: uri.into(),
            name: name.map(String::from),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn http_method_parse_ignores_case() {
        assert_eq!(HttpMethod::parse("get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::parse("PATCH"), Some(HttpMethod::Patch));
        assert_eq!(HttpMethod::parse("Delete"), Some(HttpMethod::Delete));
    }

    #[test]
    fn recognized_methods_round_trip_display() {
        for method in RECOGNIZED_METHODS {
            assert_eq!(HttpMethod::parse(method.as_str()), Some(*method));
        }
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn http_method_parse_rejects_other_keys() {
        assert_eq!(HttpMethod::parse("head"), None);
        assert_eq!(HttpMethod::parse("options"), None);
        assert_eq!(HttpMethod::parse("parameters"), None);
        assert_eq!(HttpMethod::parse(""), None);
    }

    #[test]
    fn relationship_serializes_type_tag() {
        let rel = Relationship {
            from: "Order".into(),
            to: "User".into(),
            relationship_type: RelationshipType::BelongsTo,
            through: None,
        };
        assert_eq!(
            serde_json::to_value(&rel).unwrap(),
            json!({ "from": "Order", "to": "User", "type": "belongs_to" })
        );
    }

    #[test]
    fn context_deserializes_without_environment() {
        let ctx: AnalysisContext =
            serde_json::from_value(json!({ "roots": [{ "uri": "file:///srv" }] })).unwrap();
        assert_eq!(ctx.environment, None);
        assert_eq!(ctx.roots.len(), 1);
        assert_eq!(ctx.roots[0].name, None);
    }
}
