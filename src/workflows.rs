//! Workflow pattern detection.
//!
//! Patterns are emitted from fixed skeleton tables. Only the CRUD skeleton
//! is parameterized, by the resource segment it was detected for.

use std::collections::BTreeSet;

use tracing::debug;

use crate::document::ApiDocument;
use crate::predicates::{is_auth_path, is_multipart_media_type, is_pagination_param};
use crate::scanner::{parameter_names, request_media_types};
use crate::types::{Endpoint, HttpMethod, WorkflowPattern, WorkflowStep, WorkflowType};

/// Methods a resource group must cover to count as CRUD.
pub const CRUD_METHODS: &[HttpMethod] = &[
    HttpMethod::Get,
    HttpMethod::Post,
    HttpMethod::Put,
    HttpMethod::Delete,
];

struct StepTemplate {
    action: &'static str,
    description: &'static str,
}

struct CrudStepTemplate {
    action: &'static str,
    method: HttpMethod,
    /// Appended to `/<resource>`.
    suffix: &'static str,
    description: &'static str,
}

const CRUD_STEPS: &[CrudStepTemplate] = &[
    CrudStepTemplate {
        action: "list",
        method: HttpMethod::Get,
        suffix: "",
        description: "List existing items",
    },
    CrudStepTemplate {
        action: "create",
        method: HttpMethod::Post,
        suffix: "",
        description: "Create a new item",
    },
    CrudStepTemplate {
        action: "read",
        method: HttpMethod::Get,
        suffix: "/{id}",
        description: "Fetch a single item by id",
    },
    CrudStepTemplate {
        action: "update",
        method: HttpMethod::Put,
        suffix: "/{id}",
        description: "Replace an existing item",
    },
    CrudStepTemplate {
        action: "delete",
        method: HttpMethod::Delete,
        suffix: "/{id}",
        description: "Remove an item",
    },
];

const AUTH_STEPS: &[StepTemplate] = &[
    StepTemplate {
        action: "authenticate",
        description: "Exchange credentials for a token",
    },
    StepTemplate {
        action: "validate",
        description: "Check that the token is accepted",
    },
    StepTemplate {
        action: "authorize",
        description: "Call protected endpoints with the token",
    },
    StepTemplate {
        action: "refresh",
        description: "Renew the token before it expires",
    },
];

const PAGINATION_STEPS: &[StepTemplate] = &[
    StepTemplate {
        action: "initial_request",
        description: "Request the first page",
    },
    StepTemplate {
        action: "check_more",
        description: "Inspect the response for a next page",
    },
    StepTemplate {
        action: "fetch_next",
        description: "Request the next page using page, offset or cursor",
    },
    StepTemplate {
        action: "aggregate",
        description: "Combine all pages into one result",
    },
];

const UPLOAD_STEPS: &[StepTemplate] = &[
    StepTemplate {
        action: "prepare",
        description: "Collect the file and its metadata",
    },
    StepTemplate {
        action: "validate",
        description: "Check size and media type limits",
    },
    StepTemplate {
        action: "upload",
        description: "Send the multipart request",
    },
    StepTemplate {
        action: "verify",
        description: "Confirm the stored file",
    },
];

/// Detect all workflow patterns.
///
/// Order: CRUD workflows by first appearance of their resource, then
/// authentication, pagination and file upload. Each of the last three is
/// emitted at most once.
pub fn detect_workflows(doc: &ApiDocument<'_>, endpoints: &[Endpoint]) -> Vec<WorkflowPattern> {
    let mut workflows = detect_crud(endpoints);

    if has_auth_endpoints(endpoints) {
        workflows.push(static_workflow(
            "authentication",
            WorkflowType::Auth,
            "Obtain and maintain API credentials",
            AUTH_STEPS,
        ));
    }
    if has_pagination_params(doc, endpoints) {
        workflows.push(static_workflow(
            "pagination",
            WorkflowType::Pagination,
            "Walk through a paginated collection",
            PAGINATION_STEPS,
        ));
    }
    if has_multipart_uploads(doc, endpoints) {
        workflows.push(static_workflow(
            "file_upload",
            WorkflowType::Multipart,
            "Upload a file with a multipart request",
            UPLOAD_STEPS,
        ));
    }

    debug!(count = workflows.len(), "detected workflows");
    workflows
}

/// One `<resource>_crud` workflow per first path segment whose endpoints
/// cover GET, POST, PUT and DELETE.
pub fn detect_crud(endpoints: &[Endpoint]) -> Vec<WorkflowPattern> {
    let mut groups: Vec<(&str, BTreeSet<HttpMethod>)> = Vec::new();

    for endpoint in endpoints {
        let Some(resource) = resource_segment(&endpoint.path) else {
            continue;
        };
        match groups.iter_mut().find(|(name, _)| *name == resource) {
            Some((_, methods)) => {
                methods.insert(endpoint.method);
            }
            None => groups.push((resource, BTreeSet::from([endpoint.method]))),
        }
    }

    groups
        .into_iter()
        .filter(|(_, methods)| CRUD_METHODS.iter().all(|m| methods.contains(m)))
        .map(|(resource, _)| crud_workflow(resource))
        .collect()
}

/// Build the CRUD skeleton for `resource`.
pub fn crud_workflow(resource: &str) -> WorkflowPattern {
    WorkflowPattern {
        name: format!("{}_crud", resource),
        workflow_type: WorkflowType::Crud,
        description: format!("Manage the lifecycle of {}", resource),
        steps: CRUD_STEPS
            .iter()
            .map(|t| WorkflowStep {
                action: t.action.to_string(),
                endpoint: Some(format!("{} /{}{}", t.method, resource, t.suffix)),
                description: Some(t.description.to_string()),
            })
            .collect(),
    }
}

/// First segment after the leading slash; `None` for `/`.
pub fn resource_segment(path: &str) -> Option<&str> {
    path.trim_start_matches('/')
        .split('/')
        .next()
        .filter(|segment| !segment.is_empty())
}

pub fn has_auth_endpoints(endpoints: &[Endpoint]) -> bool {
    endpoints.iter().any(|e| is_auth_path(&e.path))
}

/// Operation parameters and those shared on the enclosing path item both count.
pub fn has_pagination_params(doc: &ApiDocument<'_>, endpoints: &[Endpoint]) -> bool {
    endpoints.iter().any(|e| {
        let shared = doc.paths().get(&e.path);
        parameter_names(doc, &e.operation)
            .chain(shared.into_iter().flat_map(|item| parameter_names(doc, item)))
            .any(is_pagination_param)
    })
}

pub fn has_multipart_uploads(doc: &ApiDocument<'_>, endpoints: &[Endpoint]) -> bool {
    endpoints.iter().any(|e| {
        request_media_types(doc, &e.operation).any(|media_type| is_multipart_media_type(media_type))
    })
}

fn static_workflow(
    name: &str,
    workflow_type: WorkflowType,
    description: &str,
    steps: &[StepTemplate],
) -> WorkflowPattern {
    WorkflowPattern {
        name: name.to_string(),
        workflow_type,
        description: description.to_string(),
        steps: steps
            .iter()
            .map(|t| WorkflowStep {
                action: t.action.to_string(),
                endpoint: None,
                description: Some(t.description.to_string()),
            })
            .collect(),
    }
}
