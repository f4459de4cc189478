//! Keyword heuristics used by the analysis pipeline.
//!
//! Each heuristic is its own function so it can be tested and swapped on its
//! own. All text matching is case-insensitive.

/// Summary words that mark an operation as state-changing.
pub const ACTION_KEYWORDS: &[&str] = &["create", "update", "delete"];

/// Summary words that mark a GET as having side effects.
pub const SIDE_EFFECT_KEYWORDS: &[&str] = &["trigger", "send", "execute"];

/// Path fragments that indicate an authentication flow.
pub const AUTH_PATH_KEYWORDS: &[&str] = &["auth", "login", "token"];

/// Path fragments that indicate batch endpoints.
pub const BATCH_PATH_KEYWORDS: &[&str] = &["batch", "bulk"];

/// Parameter names that indicate paginated listing.
pub const PAGINATION_PARAMS: &[&str] = &["page", "limit", "offset", "cursor"];

/// Conventional rate-limit header spellings.
pub const RATE_LIMIT_HEADERS: &[&str] = &["x-ratelimit-limit", "ratelimit-limit"];

/// Status codes a client can recover from by waiting and retrying.
pub const RECOVERABLE_STATUS_CODES: &[&str] = &["429", "503", "504"];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    let haystack = haystack.to_lowercase();
    needles.iter().any(|n| haystack.contains(n))
}

/// Summary mentions create, update or delete.
pub fn summary_suggests_action(summary: &str) -> bool {
    contains_any(summary, ACTION_KEYWORDS)
}

/// Summary mentions trigger, send or execute.
pub fn summary_suggests_side_effect(summary: &str) -> bool {
    contains_any(summary, SIDE_EFFECT_KEYWORDS)
}

pub fn is_auth_path(path: &str) -> bool {
    contains_any(path, AUTH_PATH_KEYWORDS)
}

pub fn is_batch_path(path: &str) -> bool {
    contains_any(path, BATCH_PATH_KEYWORDS)
}

pub fn is_webhook_path(path: &str) -> bool {
    contains_any(path, &["webhook"])
}

/// Exact (case-insensitive) match against the pagination parameter names.
pub fn is_pagination_param(name: &str) -> bool {
    let name = name.to_lowercase();
    PAGINATION_PARAMS.contains(&name.as_str())
}

pub fn is_multipart_media_type(media_type: &str) -> bool {
    media_type.to_lowercase().starts_with("multipart/")
}

pub fn is_rate_limit_header(name: &str) -> bool {
    let name = name.to_lowercase();
    RATE_LIMIT_HEADERS.contains(&name.as_str())
}

/// Status code starts with 4 or 5 (`404`, `500`, `4XX`, ...).
pub fn is_error_status(code: &str) -> bool {
    code.starts_with('4') || code.starts_with('5')
}

/// 429/503/504, or a description that mentions retrying.
pub fn is_recoverable_error(code: &str, description: &str) -> bool {
    RECOVERABLE_STATUS_CODES.contains(&code) || description.to_lowercase().contains("retry")
}

/// Resource name contains one of `keywords` (expected lowercase).
pub fn is_core_resource_name(name: &str, keywords: &[String]) -> bool {
    let name = name.to_lowercase();
    keywords.iter().any(|k| name.contains(k.as_str()))
}
