//! Document loading from files, strings, and HTTP URLs.
//!
//! Loading is kept apart from analysis: the analyzer only ever sees a parsed
//! `serde_json::Value`.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::AnalyzerConfig;
use crate::error::LoadError;
use crate::types::AnalysisContext;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Load an API description document from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or `LoadError::InvalidJson` if the file isn't valid JSON.
pub fn load_document(path: &Path) -> Result<Value, LoadError> {
    load_json_file(path)
}

/// Load a document from a JSON string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't valid JSON.
pub fn load_document_str(content: &str) -> Result<Value, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
}

/// Load a context snapshot (`{ "environment": ..., "roots": [...] }`).
pub fn load_context(path: &Path) -> Result<AnalysisContext, LoadError> {
    load_json_file(path)
}

/// Load analyzer settings. Omitted fields keep their defaults.
pub fn load_config(path: &Path) -> Result<AnalyzerConfig, LoadError> {
    load_json_file(path)
}

fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    debug!(path = %path.display(), "reading file");
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| LoadError::InvalidJson { source })
}

/// Load a document from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `LoadError::NetworkError` if the request fails or the response
/// body isn't valid JSON.
#[cfg(feature = "remote")]
pub fn load_document_url(url: &str) -> Result<Value, LoadError> {
    let network_error = |source: reqwest::Error| LoadError::NetworkError {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(network_error)?;

    debug!(url = %url, "fetching document");
    client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.json())
        .map_err(network_error)
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Load a document from a file path or URL.
///
/// URL loading requires the `remote` feature.
pub fn load_document_auto(source: &str) -> Result<Value, LoadError> {
    if is_url(source) {
        #[cfg(feature = "remote")]
        {
            load_document_url(source)
        }
        #[cfg(not(feature = "remote"))]
        {
            Err(LoadError::FileNotFound {
                path: std::path::PathBuf::from(source),
            })
        }
    } else {
        load_document(Path::new(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeatureThresholds;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn load_document_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"openapi": "3.1.0", "paths": {{}}}}"#).unwrap();

        let doc = load_document(file.path()).unwrap();
        assert_eq!(doc["openapi"], "3.1.0");
    }

    #[test]
    fn load_document_file_not_found() {
        let result = load_document(Path::new("/nonexistent/openapi.json"));
        assert!(matches!(result, Err(LoadError::FileNotFound { .. })));
    }

    #[test]
    fn load_document_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "openapi: 3.1.0").unwrap();

        let result = load_document(file.path());
        assert!(matches!(result, Err(LoadError::InvalidJson { .. })));
    }

    #[test]
    fn load_document_str_invalid() {
        let result = load_document_str("not json");
        assert!(matches!(result, Err(LoadError::InvalidJson { .. })));
    }

    #[test]
    fn load_context_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"environment": "production", "roots": [{{"uri": "file:///a", "name": "test suite"}}]}}"#
        )
        .unwrap();

        let ctx = load_context(file.path()).unwrap();
        assert_eq!(ctx.environment.as_deref(), Some("production"));
        assert_eq!(ctx.roots[0].name.as_deref(), Some("test suite"));
    }

    #[test]
    fn load_config_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"core_keywords": ["tenant"]}}"#).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.core_keywords, vec!["tenant"]);
        assert_eq!(config.thresholds, FeatureThresholds::default());
    }

    #[test]
    fn load_config_mixed_case_keywords_match() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"core_keywords": ["Widget"]}}"#).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.core_keywords, vec!["widget"]);

        let doc = serde_json::json!({
            "paths": {},
            "components": { "schemas": { "Widget": { "type": "object" } } }
        });
        let model = crate::Analyzer::new(config).analyze(&doc).unwrap();
        assert!(model.resource("Widget").unwrap().is_core);
    }

    #[test]
    fn is_url_detection() {
        assert!(is_url("https://example.com/openapi.json"));
        assert!(is_url("http://example.com/openapi.json"));
        assert!(!is_url("/path/to/openapi.json"));
        assert!(!is_url("openapi.json"));
    }

    #[test]
    fn load_document_auto_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"paths": {{"/a": {{}}}}}}"#).unwrap();

        let doc = load_document_auto(file.path().to_str().unwrap()).unwrap();
        assert!(doc["paths"].get("/a").is_some());
    }

    #[cfg(feature = "remote")]
    mod remote {
        use super::*;

        #[test]
        fn load_document_url_from_local_server() {
            let mut server = mockito::Server::new();
            let mock = server
                .mock("GET", "/openapi.json")
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(r#"{"openapi": "3.0.3", "paths": {}}"#)
                .create();

            let doc = load_document_url(&format!("{}/openapi.json", server.url())).unwrap();
            assert_eq!(doc["openapi"], "3.0.3");
            mock.assert();
        }

        #[test]
        fn load_document_url_404() {
            let mut server = mockito::Server::new();
            let _mock = server.mock("GET", "/missing.json").with_status(404).create();

            let result = load_document_url(&format!("{}/missing.json", server.url()));
            assert!(matches!(result, Err(LoadError::NetworkError { .. })));
        }
    }
}
