//! Classification of declared error responses.

use serde_json::Value;
use tracing::debug;

use crate::document::ApiDocument;
use crate::predicates::{is_error_status, is_recoverable_error};
use crate::scanner::responses;
use crate::types::{Endpoint, ErrorPattern};

/// One pattern per declared 4xx/5xx response, in endpoint then response order.
///
/// Response `$ref`s are followed one hop to read the description; an
/// unresolvable or missing description is empty.
pub fn classify_error_patterns(doc: &ApiDocument<'_>, endpoints: &[Endpoint]) -> Vec<ErrorPattern> {
    let mut patterns = Vec::new();

    for endpoint in endpoints {
        let Some(declared) = responses(&endpoint.operation) else {
            continue;
        };
        for (status_code, response) in declared {
            if !is_error_status(status_code) {
                continue;
            }
            let description = doc
                .deref(response)
                .and_then(|r| r.get("description"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            patterns.push(ErrorPattern {
                recoverable: is_recoverable_error(status_code, &description),
                status_code: status_code.clone(),
                endpoint: endpoint.signature(),
                description,
            });
        }
    }

    debug!(count = patterns.len(), "classified error patterns");
    patterns
}
