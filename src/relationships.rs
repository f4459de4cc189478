//! Resource relationship extraction from named schemas.
//!
//! Only direct properties are inspected (one hop). Nested objects and
//! composition keywords are not followed, so cyclic schemas need no guard.

use serde_json::Value;
use tracing::{debug, trace};

use crate::document::{ref_target_name, ApiDocument};
use crate::predicates::is_core_resource_name;
use crate::types::{Relationship, RelationshipType, Resource};

/// Build one resource per named schema, in document order.
pub fn extract_resources(doc: &ApiDocument<'_>, core_keywords: &[String]) -> Vec<Resource> {
    let resources: Vec<Resource> = doc
        .schemas()
        .map(|(name, schema)| Resource {
            name: name.clone(),
            schema_ref: format!("#/components/schemas/{}", escape_pointer_segment(name)),
            description: schema
                .get("description")
                .and_then(Value::as_str)
                .map(String::from),
            is_core: is_core_resource_name(name, core_keywords),
            related: related_resources(doc, name, schema),
        })
        .collect();

    debug!(count = resources.len(), "extracted resources");
    resources
}

/// Typed edges for every resource's related list.
pub fn extract_relationships(doc: &ApiDocument<'_>, resources: &[Resource]) -> Vec<Relationship> {
    let mut relationships = Vec::new();

    for resource in resources {
        let Some(schema) = doc.schema(&resource.name) else {
            continue;
        };
        for target in &resource.related {
            relationships.push(Relationship {
                from: resource.name.clone(),
                to: target.clone(),
                relationship_type: infer_relationship_type(schema, target),
                through: None,
            });
        }
    }

    debug!(count = relationships.len(), "extracted relationships");
    relationships
}

/// Names of schemas directly referenced by `schema`'s properties.
///
/// Self references, duplicates and targets outside the schema set are
/// dropped. Order follows the properties.
pub fn related_resources(doc: &ApiDocument<'_>, name: &str, schema: &Value) -> Vec<String> {
    let mut related: Vec<String> = Vec::new();

    for (_, prop) in properties(schema) {
        let Some(pointer) = property_reference(prop) else {
            continue;
        };
        let Some(target) = ref_target_name(pointer) else {
            trace!(schema = %name, pointer = %pointer, "skipping malformed reference");
            continue;
        };
        if target == name || related.contains(&target) {
            continue;
        }
        if !doc.has_schema(&target) {
            trace!(schema = %name, target = %target, "skipping reference to unknown schema");
            continue;
        }
        related.push(target);
    }

    related
}

/// Infer how `schema` relates to the schema named `target`.
///
/// Uses the name of the first property that references `target`:
/// `*Id`/`*_id` is `belongs_to`, `*s`/`*List` is `has_many`, anything else
/// `has_one`. Without such a property the answer is `unknown`.
pub fn infer_relationship_type(schema: &Value, target: &str) -> RelationshipType {
    let property = properties(schema).find(|(_, prop)| {
        property_reference(prop)
            .and_then(ref_target_name)
            .is_some_and(|name| name == target)
    });

    match property {
        Some((prop_name, _)) if prop_name.ends_with("Id") || prop_name.ends_with("_id") => {
            RelationshipType::BelongsTo
        }
        Some((prop_name, _)) if prop_name.ends_with('s') || prop_name.ends_with("List") => {
            RelationshipType::HasMany
        }
        Some(_) => RelationshipType::HasOne,
        None => RelationshipType::Unknown,
    }
}

fn properties(schema: &Value) -> impl Iterator<Item = (&String, &Value)> {
    schema
        .get("properties")
        .and_then(Value::as_object)
        .into_iter()
        .flatten()
}

/// Pointer of a direct `$ref` property, or of an array property's `items`.
fn property_reference(prop: &Value) -> Option<&str> {
    if let Some(pointer) = prop.get("$ref").and_then(Value::as_str) {
        return Some(pointer);
    }
    if prop.get("type").and_then(Value::as_str) == Some("array") {
        return prop
            .get("items")
            .and_then(|items| items.get("$ref"))
            .and_then(Value::as_str);
    }
    None
}

fn escape_pointer_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}
