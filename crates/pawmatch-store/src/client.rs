// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for a PostgREST endpoint (the REST face of a Supabase project).
//!
//! Provides [`PostgrestClient`], which turns a [`StoreRequest`] into one HTTP
//! call and maps the response or error body back into store terms. Requests
//! are never retried; callers see the first failure.

use std::time::Duration;

use pawmatch_core::query::{Operation, StoreOutput, StoreRequest, Table};
use pawmatch_core::PawError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_RANGE};
use reqwest::{Method, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::encode::query_params;

/// Media type asking PostgREST for exactly one object instead of an array.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Error body returned by PostgREST and the database behind it.
#[derive(Debug, Deserialize)]
pub struct PostgrestErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

/// HTTP client for PostgREST communication.
#[derive(Debug, Clone)]
pub struct PostgrestClient {
    client: reqwest::Client,
    rest_url: String,
    timeout: Duration,
}

impl PostgrestClient {
    /// Creates a client for the project at `url`, authenticating with `api_key`.
    ///
    /// The key is sent both as `apikey` and as a bearer token.
    pub fn new(url: &str, api_key: &str, timeout: Duration) -> Result<Self, PawError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(api_key)
                .map_err(|e| PawError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert(
            "authorization",
            HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| PawError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| PawError::Store {
                message: format!("failed to build HTTP client: {e}"),
                code: None,
                details: None,
            })?;

        Ok(Self {
            client,
            rest_url: format!("{}/rest/v1", url.trim_end_matches('/')),
            timeout,
        })
    }

    /// Full URL for a table, with the request's filters encoded.
    fn table_url(&self, request: &StoreRequest) -> Result<Url, PawError> {
        let mut url = Url::parse(&format!("{}/{}", self.rest_url, request.table))
            .map_err(|e| PawError::Config(format!("invalid store URL: {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            if matches!(
                request.operation,
                Operation::Select | Operation::Insert(_) | Operation::Update(_)
            ) {
                pairs.append_pair("select", "*");
            }
            for (key, value) in query_params(&request.query) {
                pairs.append_pair(&key, &value);
            }
        }
        Ok(url)
    }

    /// Executes one request.
    pub async fn execute(&self, request: &StoreRequest) -> Result<StoreOutput, PawError> {
        let url = self.table_url(request)?;
        let single = request.query.single;

        let builder = match &request.operation {
            Operation::Select => self.client.get(url),
            Operation::Insert(body) => self
                .client
                .post(url)
                .header("prefer", "return=representation")
                .json(body),
            Operation::Update(patch) => self
                .client
                .patch(url)
                .header("prefer", "return=representation")
                .json(patch),
            Operation::Delete => self.client.delete(url).header("prefer", "return=minimal"),
            Operation::Count => self
                .client
                .request(Method::HEAD, url)
                .header("prefer", "count=exact"),
        };
        let builder = if single {
            builder.header(ACCEPT, SINGLE_OBJECT)
        } else {
            builder
        };

        let response = builder.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        debug!(table = %request.table, status = %status, single, "store response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = error_from_body(status, &body);
            warn!(table = %request.table, status = %status, error = %err, "store request rejected");
            return Err(err);
        }

        match &request.operation {
            Operation::Count => {
                let range = response
                    .headers()
                    .get(CONTENT_RANGE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                parse_content_range(&range)
                    .map(StoreOutput::Count)
                    .ok_or_else(|| {
                        PawError::store(format!("missing or invalid Content-Range `{range}`"), None)
                    })
            }
            Operation::Delete => Ok(StoreOutput::Empty),
            _ => {
                let body = response.text().await.map_err(|e| self.transport_error(e))?;
                let value: Value = serde_json::from_str(&body).map_err(|e| {
                    PawError::store(format!("failed to parse store response: {e}"), None)
                })?;
                Ok(StoreOutput::Rows(match value {
                    Value::Array(rows) => rows,
                    object => vec![object],
                }))
            }
        }
    }

    /// Cheap round trip used by health checks.
    pub async fn ping(&self, table: Table) -> Result<StatusCode, PawError> {
        let request = StoreRequest::new(
            table,
            Operation::Count,
            pawmatch_core::query::Query::new().limit(1),
        );
        let url = self.table_url(&request)?;
        let response = self
            .client
            .request(Method::HEAD, url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        Ok(response.status())
    }

    fn transport_error(&self, e: reqwest::Error) -> PawError {
        if e.is_timeout() {
            PawError::Timeout {
                duration: self.timeout,
            }
        } else {
            PawError::Store {
                message: format!("HTTP request failed: {e}"),
                code: None,
                details: None,
            }
        }
    }
}

/// Maps a non-success response body to a store error.
fn error_from_body(status: StatusCode, body: &str) -> PawError {
    match serde_json::from_str::<PostgrestErrorBody>(body) {
        Ok(parsed) => {
            let details = match (parsed.details, parsed.hint) {
                (Some(d), Some(h)) => Some(format!("{d} ({h})")),
                (d, h) => d.or(h),
            };
            PawError::Store {
                message: parsed.message,
                code: parsed.code,
                details,
            }
        }
        Err(_) => PawError::Store {
            message: format!("store returned {status}: {body}"),
            code: Some(status.as_u16().to_string()),
            details: None,
        },
    }
}

/// Total from a `Content-Range` header such as `0-9/42` or `*/0`.
fn parse_content_range(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawmatch_core::query::Query;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> PostgrestClient {
        PostgrestClient::new(&server.uri(), "anon-key", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn content_range_total() {
        assert_eq!(parse_content_range("0-9/42"), Some(42));
        assert_eq!(parse_content_range("*/0"), Some(0));
        assert_eq!(parse_content_range("0-9/*"), None);
        assert_eq!(parse_content_range(""), None);
    }

    #[test]
    fn unparseable_error_body_keeps_status() {
        let err = error_from_body(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.code(), Some("502"));
        assert!(err.to_string().contains("upstream down"));
    }

    #[tokio::test]
    async fn select_sends_auth_headers_and_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/pets"))
            .and(header("apikey", "anon-key"))
            .and(header("authorization", "Bearer anon-key"))
            .and(query_param("status", "eq.available"))
            .and(query_param("order", "created_at.desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "p1"}])))
            .expect(1)
            .mount(&server)
            .await;

        let request = StoreRequest::new(
            Table::Pets,
            Operation::Select,
            Query::new()
                .eq("status", "available")
                .order_by("created_at", pawmatch_core::Direction::Desc),
        );
        let output = test_client(&server).execute(&request).await.unwrap();
        assert_eq!(output, StoreOutput::Rows(vec![json!({"id": "p1"})]));
    }

    #[tokio::test]
    async fn single_select_maps_406_to_no_rows() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/pets"))
            .and(header("accept", SINGLE_OBJECT))
            .respond_with(ResponseTemplate::new(406).set_body_json(json!({
                "code": "PGRST116",
                "message": "JSON object requested, multiple (or no) rows returned",
                "details": "The result contains 0 rows",
                "hint": null
            })))
            .mount(&server)
            .await;

        let request = StoreRequest::new(
            Table::Pets,
            Operation::Select,
            Query::new().eq("id", "missing").single(),
        );
        let err = test_client(&server).execute(&request).await.unwrap_err();
        assert!(err.is_no_rows());
    }

    #[tokio::test]
    async fn single_object_body_becomes_one_row() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/favorites"))
            .and(header("prefer", "return=representation"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"id": "f1", "pet_id": "p1"})),
            )
            .mount(&server)
            .await;

        let request = StoreRequest::new(
            Table::Favorites,
            Operation::Insert(json!({"user_id": "u", "pet_id": "p1"})),
            Query::new().single(),
        );
        let output = test_client(&server).execute(&request).await.unwrap();
        assert_eq!(
            output,
            StoreOutput::Rows(vec![json!({"id": "f1", "pet_id": "p1"})])
        );
    }

    #[tokio::test]
    async fn unique_violation_code_is_preserved() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/favorites"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "code": "23505",
                "message": "duplicate key value violates unique constraint",
                "details": "Key (user_id, pet_id) already exists.",
                "hint": null
            })))
            .mount(&server)
            .await;

        let request = StoreRequest::new(
            Table::Favorites,
            Operation::Insert(json!({"user_id": "u", "pet_id": "p1"})),
            Query::new().single(),
        );
        let err = test_client(&server).execute(&request).await.unwrap_err();
        assert_eq!(err.code(), Some("23505"));
    }

    #[tokio::test]
    async fn count_reads_content_range() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/rest/v1/applications"))
            .and(header("prefer", "count=exact"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-range", "*/7"))
            .mount(&server)
            .await;

        let request = StoreRequest::new(Table::Applications, Operation::Count, Query::new());
        let output = test_client(&server).execute(&request).await.unwrap();
        assert_eq!(output, StoreOutput::Count(7));
    }

    #[tokio::test]
    async fn delete_returns_empty() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/favorites"))
            .and(query_param("pet_id", "eq.p1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let request = StoreRequest::new(
            Table::Favorites,
            Operation::Delete,
            Query::new().eq("pet_id", "p1"),
        );
        let output = test_client(&server).execute(&request).await.unwrap();
        assert_eq!(output, StoreOutput::Empty);
    }

    #[tokio::test]
    async fn slow_response_is_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client =
            PostgrestClient::new(&server.uri(), "anon-key", Duration::from_millis(50)).unwrap();
        let request = StoreRequest::new(Table::Pets, Operation::Select, Query::new());
        let err = client.execute(&request).await.unwrap_err();
        assert!(matches!(err, PawError::Timeout { .. }), "got: {err}");
    }
}
