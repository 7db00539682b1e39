//! Read-only JSON API client used by the API-facing steps
//!
//! Pre-bound to a base URL with a default `Accept: application/json` header.
//! The suite only ever fetches resources; the last response's status and
//! parsed body are kept on the scenario state for assertion steps.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::config::SuiteConfig;
use crate::error::{E2eError, E2eResult};

/// The most recent API call, as seen by assertion steps.
#[derive(Debug, Clone)]
pub struct ApiExchange {
    pub status: StatusCode,
    pub data: Value,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Binds the client to `API_BASE_URL`. Every request is bounded by the
    /// suite's per-test timeout.
    pub fn new(config: &SuiteConfig) -> E2eResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.test_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches a JSON resource by path. Non-2xx statuses are returned as an
    /// exchange too; the caller decides whether that fails the scenario.
    pub async fn get_json(&self, path: &str) -> E2eResult<ApiExchange> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!("GET {url}");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let data = if status.is_success() {
            response.json().await?
        } else {
            Value::Null
        };

        Ok(ApiExchange { status, data })
    }
}

/// Traverses a JSON value by a dotted path, e.g. `type.key`.
pub fn value_at_path<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(data, |v, key| v.get(key))
}

/// Equality assertion against a scalar at a dotted path. String values are
/// compared without surrounding quotes.
pub fn assert_path_eq(data: &Value, path: &str, expected: &str) -> E2eResult<()> {
    let actual = value_at_path(data, path)
        .ok_or_else(|| E2eError::assertion(format!("no value at path '{path}'")))?;

    let matches = match actual {
        Value::String(s) => s == expected,
        other => other.to_string() == expected,
    };

    if matches {
        Ok(())
    } else {
        Err(E2eError::assertion(format!(
            "value at '{path}' was {actual}, expected '{expected}'"
        )))
    }
}

/// Containment assertion: arrays must contain the expected string as an
/// element, strings must contain it as a substring.
pub fn assert_path_contains(data: &Value, path: &str, expected: &str) -> E2eResult<()> {
    let actual = value_at_path(data, path)
        .ok_or_else(|| E2eError::assertion(format!("no value at path '{path}'")))?;

    let contains = match actual {
        Value::Array(items) => items.iter().any(|item| match item {
            Value::String(s) => s == expected,
            other => other.to_string() == expected,
        }),
        Value::String(s) => s.contains(expected),
        other => {
            return Err(E2eError::assertion(format!(
                "value at '{path}' is neither array nor string: {other}"
            )))
        }
    };

    if contains {
        Ok(())
    } else {
        Err(E2eError::assertion(format!(
            "expected '{path}' to contain '{expected}', but got: {actual}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn author() -> Value {
        json!({
            "personal_name": "J. K. Rowling",
            "type": { "key": "/type/author" },
            "alternate_names": ["Joanne Rowling", "Robert Galbraith"],
            "revision": 7
        })
    }

    #[test]
    fn traverses_dotted_paths() {
        let data = author();
        assert_eq!(
            value_at_path(&data, "type.key"),
            Some(&Value::String("/type/author".into()))
        );
        assert!(value_at_path(&data, "type.missing").is_none());
        assert!(value_at_path(&data, "missing").is_none());
    }

    #[test]
    fn equality_compares_strings_and_scalars() {
        let data = author();
        assert!(assert_path_eq(&data, "personal_name", "J. K. Rowling").is_ok());
        assert!(assert_path_eq(&data, "revision", "7").is_ok());
        assert!(assert_path_eq(&data, "personal_name", "someone else").is_err());
    }

    #[test]
    fn missing_path_fails_with_descriptive_error() {
        let err = assert_path_eq(&author(), "nope.nothing", "x").unwrap_err();
        assert!(err.to_string().contains("nope.nothing"));
    }

    #[tokio::test]
    async fn requests_are_bounded_by_the_suite_timeout() {
        use std::time::Duration;

        // Accepts the connection at the TCP level but never answers.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let mut config = SuiteConfig::from_env();
        config.api_base_url = format!("http://{addr}");
        config.test_timeout = Duration::from_millis(200);

        let client = ApiClient::new(&config).unwrap();
        let err = client.get_json("/authors/OL1A.json").await.unwrap_err();
        assert!(matches!(err, E2eError::Http(_)), "expected HTTP error, got: {err}");
    }

    #[test]
    fn containment_supports_arrays_and_substrings() {
        let data = author();
        assert!(assert_path_contains(&data, "alternate_names", "Robert Galbraith").is_ok());
        assert!(assert_path_contains(&data, "alternate_names", "Unknown").is_err());
        assert!(assert_path_contains(&data, "personal_name", "Rowling").is_ok());
        assert!(assert_path_contains(&data, "revision", "7").is_err());
    }
}
