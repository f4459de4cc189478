//! Read-only view over an API description document.
//!
//! The analyzer never fails on missing sections. Everything except `paths`
//! is optional and a section of the wrong JSON type reads as empty.

use serde_json::{Map, Value};
use tracing::trace;

use crate::error::AnalyzeError;
use crate::types::json_type_name;

/// Borrowed, validated document.
#[derive(Debug, Clone, Copy)]
pub struct ApiDocument<'a> {
    root: &'a Map<String, Value>,
    paths: &'a Map<String, Value>,
}

impl<'a> ApiDocument<'a> {
    /// Check the top-level shape of `document`.
    ///
    /// # Errors
    ///
    /// Returns `AnalyzeError::InvalidDocument` if the document is not an
    /// object or has no `paths` object.
    pub fn new(document: &'a Value) -> Result<Self, AnalyzeError> {
        let root = document
            .as_object()
            .ok_or_else(|| AnalyzeError::InvalidDocument {
                message: format!("expected object, got {}", json_type_name(document)),
            })?;

        let paths = match root.get("paths") {
            Some(Value::Object(paths)) => paths,
            Some(other) => {
                return Err(AnalyzeError::InvalidDocument {
                    message: format!("paths must be an object, got {}", json_type_name(other)),
                })
            }
            None => {
                return Err(AnalyzeError::InvalidDocument {
                    message: "missing paths section".to_string(),
                })
            }
        };

        Ok(Self { root, paths })
    }

    /// Path items keyed by path template, in document order.
    pub fn paths(&self) -> &'a Map<String, Value> {
        self.paths
    }

    /// Named schemas from `components.schemas`, in document order.
    pub fn schemas(&self) -> impl Iterator<Item = (&'a String, &'a Value)> + 'a {
        self.component_section("schemas").into_iter().flatten()
    }

    pub fn schema(&self, name: &str) -> Option<&'a Value> {
        self.component_section("schemas")?.get(name)
    }

    pub fn has_schema(&self, name: &str) -> bool {
        self.schema(name).is_some()
    }

    pub fn security_scheme_count(&self) -> usize {
        self.component_section("securitySchemes")
            .map(Map::len)
            .unwrap_or(0)
    }

    /// True when a top-level `webhooks` object is declared, even an empty one.
    pub fn declares_webhooks(&self) -> bool {
        self.root.get("webhooks").is_some_and(Value::is_object)
    }

    /// Follow a local `$ref` one hop.
    ///
    /// Values without `$ref` are returned as-is. External or unresolvable
    /// references yield `None`.
    pub fn deref(&self, value: &'a Value) -> Option<&'a Value> {
        match value.get("$ref") {
            None => Some(value),
            Some(Value::String(pointer)) => {
                let target = self.navigate(pointer);
                if target.is_none() {
                    trace!(pointer = %pointer, "unresolvable reference");
                }
                target
            }
            Some(_) => None,
        }
    }

    fn navigate(&self, pointer: &str) -> Option<&'a Value> {
        let path = pointer.strip_prefix("#/")?;
        let mut parts = path.split('/').map(unescape_pointer_segment);
        let first = parts.next()?;
        let mut current = self.root.get(&first)?;
        for key in parts {
            current = current.get(&key)?;
        }
        Some(current)
    }

    fn component_section(&self, name: &str) -> Option<&'a Map<String, Value>> {
        self.root.get("components")?.get(name)?.as_object()
    }
}

/// Name a reference pointer targets: its final segment, unescaped.
///
/// `#/components/schemas/User` -> `User`. Returns `None` for pointers with an
/// empty final segment.
pub fn ref_target_name(pointer: &str) -> Option<String> {
    let segment = pointer.rsplit('/').next()?;
    if segment.is_empty() || segment == "#" {
        return None;
    }
    Some(unescape_pointer_segment(segment))
}

// JSON Pointer encoding (~1 = /, ~0 = ~)
fn unescape_pointer_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}
