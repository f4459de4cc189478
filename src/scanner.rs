//! Path/operation scanning - turns path items into classified endpoints.

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::config::ComplexityWeights;
use crate::document::ApiDocument;
use crate::predicates::{summary_suggests_action, summary_suggests_side_effect};
use crate::types::{Endpoint, HttpMethod};

/// Walk every path and method and build the endpoint list.
///
/// Only entries keyed by a recognized method that look like operations
/// (see [`is_operation`]) are kept. Order follows the document.
pub fn scan_endpoints(doc: &ApiDocument<'_>, weights: &ComplexityWeights) -> Vec<Endpoint> {
    let mut endpoints = Vec::new();

    for (path, item) in doc.paths() {
        let Some(item) = item.as_object() else {
            trace!(path = %path, "skipping non-object path item");
            continue;
        };

        for (key, entry) in item {
            let Some(method) = HttpMethod::parse(key) else {
                continue;
            };
            if !is_operation(entry) {
                trace!(path = %path, method = %method, "skipping entry without summary, description or responses");
                continue;
            }
            endpoints.push(build_endpoint(doc, path, method, entry, weights));
        }
    }

    debug!(count = endpoints.len(), "scanned endpoints");
    endpoints
}

/// An entry is an operation if it has a summary, a description, or responses.
pub fn is_operation(entry: &Value) -> bool {
    entry.as_object().is_some_and(|op| {
        op.contains_key("summary") || op.contains_key("description") || op.contains_key("responses")
    })
}

/// Mutating method, or a summary that reads like one.
pub fn classify_action(method: HttpMethod, summary: Option<&str>) -> bool {
    method.is_mutating() || summary.is_some_and(summary_suggests_action)
}

/// GET without side-effect wording in the summary.
pub fn classify_resource(method: HttpMethod, summary: Option<&str>) -> bool {
    method == HttpMethod::Get && !summary.is_some_and(summary_suggests_side_effect)
}

/// Score how involved an operation is to call. Never below 1.
pub fn complexity_score(
    doc: &ApiDocument<'_>,
    operation: &Value,
    weights: &ComplexityWeights,
) -> u32 {
    let mut score = 1;

    let param_count = operation
        .get("parameters")
        .and_then(Value::as_array)
        .map(Vec::len)
        .unwrap_or(0) as u32;
    if weights.parameters_per_point > 0 {
        score += param_count / weights.parameters_per_point;
    }

    if let Some(body) = operation.get("requestBody") {
        score += 1;
        let property_count = json_body_schema(doc, body)
            .and_then(|schema| schema.get("properties"))
            .and_then(Value::as_object)
            .map(Map::len)
            .unwrap_or(0);
        if property_count > weights.large_body_properties {
            score += 1;
        }
    }

    if response_count(operation) > weights.many_responses {
        score += 1;
    }

    score
}

/// Names of the parameters declared directly on `operation`, following local `$ref`s.
///
/// Path-item parameters are not merged in; complexity counts only the
/// operation's own list. Callers that want shared parameters pass the path
/// item itself.
pub(crate) fn parameter_names<'a>(
    doc: &ApiDocument<'a>,
    operation: &'a Value,
) -> impl Iterator<Item = &'a str> + 'a {
    let doc = *doc;
    operation
        .get("parameters")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(move |param| doc.deref(param))
        .filter_map(|param| param.get("name").and_then(Value::as_str))
}

/// Media types declared by the operation's request body.
pub(crate) fn request_media_types<'a>(
    doc: &ApiDocument<'a>,
    operation: &'a Value,
) -> impl Iterator<Item = &'a String> + 'a {
    operation
        .get("requestBody")
        .and_then(|body| doc.deref(body))
        .and_then(|body| body.get("content"))
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|content| content.keys())
}

/// Declared responses keyed by status code.
pub(crate) fn responses(operation: &Value) -> Option<&Map<String, Value>> {
    operation.get("responses").and_then(Value::as_object)
}

fn response_count(operation: &Value) -> usize {
    responses(operation).map(Map::len).unwrap_or(0)
}

fn json_body_schema<'a>(doc: &ApiDocument<'a>, body: &'a Value) -> Option<&'a Value> {
    let content = doc.deref(body)?.get("content")?.as_object()?;
    let schema = content
        .iter()
        .find(|(media_type, _)| is_json_media_type(media_type))
        .and_then(|(_, media)| media.get("schema"))?;
    doc.deref(schema)
}

fn is_json_media_type(media_type: &str) -> bool {
    let media_type = media_type.to_lowercase();
    media_type.starts_with("application/json") || media_type.ends_with("+json")
}

fn build_endpoint(
    doc: &ApiDocument<'_>,
    path: &str,
    method: HttpMethod,
    operation: &Value,
    weights: &ComplexityWeights,
) -> Endpoint {
    let text = |key: &str| operation.get(key).and_then(Value::as_str).map(String::from);
    let summary = text("summary");

    let tags: Vec<String> = operation
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(|t| t.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default();

    Endpoint {
        path: path.to_string(),
        method,
        operation_id: text("operationId"),
        description: text("description"),
        operation: operation.clone(),
        is_action: classify_action(method, summary.as_deref()),
        is_resource: classify_resource(method, summary.as_deref()),
        complexity: complexity_score(doc, operation, weights),
        category: tags.first().cloned(),
        tags,
        summary,
    }
}

/// Any endpoint is action-like or complex enough to be worth a tool.
pub fn has_tools(endpoints: &[Endpoint], weights: &ComplexityWeights) -> bool {
    endpoints
        .iter()
        .any(|e| e.is_action || e.complexity > weights.tool_threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scan(doc: &Value) -> Vec<Endpoint> {
        let api = ApiDocument::new(doc).unwrap();
        scan_endpoints(&api, &ComplexityWeights::default())
    }

    fn score(doc: &Value, operation: &Value) -> u32 {
        let api = ApiDocument::new(doc).unwrap();
        complexity_score(&api, operation, &ComplexityWeights::default())
    }

    #[test]
    fn skips_unrecognized_methods_and_shared_blocks() {
        let doc = json!({
            "paths": {
                "/items": {
                    "parameters": [{ "name": "tenant", "in": "header" }],
                    "head": { "responses": { "200": {} } },
                    "get": { "responses": { "200": {} } },
                    "POST": { "summary": "Add item" }
                }
            }
        });
        let endpoints = scan(&doc);
        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[0].method, HttpMethod::Get);
        assert_eq!(endpoints[1].method, HttpMethod::Post);
    }

    #[test]
    fn skips_entries_that_are_not_operations() {
        let doc = json!({
            "paths": {
                "/items": {
                    "get": { "operationId": "listItems" },
                    "delete": { "description": "Remove all" }
                }
            }
        });
        let endpoints = scan(&doc);
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].method, HttpMethod::Delete);
    }

    #[test]
    fn mutating_methods_are_actions() {
        for method in ["post", "put", "patch", "delete"] {
            let doc = json!({ "paths": { "/x": { method: { "responses": {} } } } });
            assert!(scan(&doc)[0].is_action, "{method} should be an action");
        }
    }

    #[test]
    fn get_with_action_summary_is_action_and_resource() {
        let doc = json!({
            "paths": { "/x": { "get": { "summary": "Update cache and return it" } } }
        });
        let endpoint = &scan(&doc)[0];
        assert!(endpoint.is_action);
        assert!(endpoint.is_resource);
    }

    #[test]
    fn get_with_side_effect_summary_is_not_resource() {
        let doc = json!({
            "paths": { "/jobs/run": { "get": { "summary": "Trigger the nightly job" } } }
        });
        let endpoint = &scan(&doc)[0];
        assert!(!endpoint.is_resource);
        assert!(!endpoint.is_action);
    }

    #[test]
    fn copies_descriptor_fields() {
        let doc = json!({
            "paths": {
                "/pets": {
                    "get": {
                        "operationId": "listPets",
                        "summary": "List pets",
                        "tags": ["pets", "public"],
                        "responses": { "200": {} }
                    }
                }
            }
        });
        let endpoint = &scan(&doc)[0];
        assert_eq!(endpoint.operation_id.as_deref(), Some("listPets"));
        assert_eq!(endpoint.category.as_deref(), Some("pets"));
        assert_eq!(endpoint.tags, vec!["pets", "public"]);
        assert_eq!(endpoint.signature(), "GET /pets");
    }

    #[test]
    fn complexity_base_is_one() {
        let doc = json!({ "paths": {} });
        assert_eq!(score(&doc, &json!({ "responses": { "200": {} } })), 1);
    }

    #[test]
    fn complexity_counts_parameters_in_threes() {
        let doc = json!({ "paths": {} });
        let params = |n: usize| -> Value {
            json!({ "parameters": (0..n).map(|i| json!({ "name": format!("p{i}") })).collect::<Vec<_>>() })
        };
        assert_eq!(score(&doc, &params(2)), 1);
        assert_eq!(score(&doc, &params(3)), 2);
        assert_eq!(score(&doc, &params(7)), 3);
    }

    #[test]
    fn complexity_request_body_and_large_schema() {
        let doc = json!({ "paths": {} });
        let small = json!({
            "requestBody": {
                "content": { "application/json": { "schema": { "properties": { "a": {} } } } }
            }
        });
        assert_eq!(score(&doc, &small), 2);

        let large = json!({
            "requestBody": {
                "content": {
                    "application/json": {
                        "schema": {
                            "properties": { "a": {}, "b": {}, "c": {}, "d": {}, "e": {}, "f": {} }
                        }
                    }
                }
            }
        });
        assert_eq!(score(&doc, &large), 3);
    }

    #[test]
    fn complexity_follows_body_schema_reference() {
        let doc = json!({
            "paths": {},
            "components": {
                "schemas": {
                    "Big": {
                        "properties": { "a": {}, "b": {}, "c": {}, "d": {}, "e": {}, "f": {} }
                    }
                }
            }
        });
        let op = json!({
            "requestBody": {
                "content": {
                    "application/json": { "schema": { "$ref": "#/components/schemas/Big" } }
                }
            }
        });
        assert_eq!(score(&doc, &op), 3);
    }

    #[test]
    fn many_responses_add_exactly_one() {
        let doc = json!({ "paths": {} });
        let three = json!({ "responses": { "200": {}, "400": {}, "404": {} } });
        let four = json!({ "responses": { "200": {}, "400": {}, "404": {}, "500": {} } });
        assert_eq!(score(&doc, &four), score(&doc, &three) + 1);
    }

    #[test]
    fn parameter_names_follow_references() {
        let doc = json!({
            "paths": {},
            "components": { "parameters": { "Cursor": { "name": "cursor", "in": "query" } } }
        });
        let api = ApiDocument::new(&doc).unwrap();
        let op = json!({
            "parameters": [
                { "name": "q", "in": "query" },
                { "$ref": "#/components/parameters/Cursor" },
                { "$ref": "#/components/parameters/Missing" }
            ]
        });
        let names: Vec<&str> = parameter_names(&api, &op).collect();
        assert_eq!(names, vec!["q", "cursor"]);
    }

    #[test]
    fn has_tools_on_action_or_complexity() {
        let doc = json!({
            "paths": { "/x": { "get": { "responses": { "200": {} } } } }
        });
        let mut endpoints = scan(&doc);
        let weights = ComplexityWeights::default();
        assert!(!has_tools(&endpoints, &weights));

        endpoints[0].complexity = 3;
        assert!(has_tools(&endpoints, &weights));
    }
}
