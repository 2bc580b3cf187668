//! Remote access to the Thingiverse API
//!
//! The archiver only talks to the network through the [`RemoteClient`] trait, so
//! the transport can be swapped (tests point [`HttpClient`] at a mock server).

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::utils::{discard_partial, partial_path, publish};
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// One page of a paginated listing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: usize,
    /// Entries requested per page
    pub per_page: usize,
}

/// Operations the archiver needs from the remote side
///
/// Every method fails with [`Error::Api`] for non-2xx responses and
/// [`Error::Network`] when no response arrived at all.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// GET an API path (e.g. `/things/11190`) and return the decoded JSON body
    async fn fetch_record(&self, path: &str) -> Result<Value>;

    /// GET an API path that returns a JSON array, optionally one page of it
    async fn fetch_list(&self, path: &str, page: Option<PageRequest>) -> Result<Vec<Value>>;

    /// Download `url` to `dest`, returning the number of bytes written
    ///
    /// The body is written to a temporary sibling and only moved to `dest`
    /// once complete, so a failed download never leaves a truncated file.
    /// `authenticated` controls whether the API token is sent along.
    async fn download(&self, url: &str, dest: &Path, authenticated: bool) -> Result<u64>;
}

/// [`RemoteClient`] backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpClient {
    /// Create a client from API settings
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            client,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, url: &str, authenticated: bool) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        match (&self.token, authenticated) {
            (Some(token), true) => request.bearer_auth(token),
            _ => request,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder, what: &str) -> Result<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.ok().filter(|b| !b.is_empty());
        Err(Error::Api {
            path: what.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl RemoteClient for HttpClient {
    async fn fetch_record(&self, path: &str) -> Result<Value> {
        tracing::debug!(path, "GET");
        let response = self.send(self.get(&self.api_url(path), true), path).await?;
        Ok(response.json::<Value>().await?)
    }

    async fn fetch_list(&self, path: &str, page: Option<PageRequest>) -> Result<Vec<Value>> {
        tracing::debug!(path, ?page, "GET list");
        let mut request = self.get(&self.api_url(path), true);
        if let Some(PageRequest { page, per_page }) = page {
            request = request.query(&[("page", page), ("per_page", per_page)]);
        }

        let response = self.send(request, path).await?;
        match response.json::<Value>().await? {
            Value::Array(items) => Ok(items),
            other => Err(Error::InvalidRecord {
                what: path.to_string(),
                reason: format!("expected a JSON array, got {}", json_kind(&other)),
            }),
        }
    }

    async fn download(&self, url: &str, dest: &Path, authenticated: bool) -> Result<u64> {
        tracing::debug!(url, dest = %dest.display(), "Downloading");
        let mut response = self.send(self.get(url, authenticated), url).await?;

        let temp = partial_path(dest);
        let mut file = tokio::fs::File::create(&temp)
            .await
            .map_err(|e| Error::filesystem(&temp, e))?;

        let mut written: u64 = 0;
        let streamed = async {
            while let Some(chunk) = response.chunk().await? {
                file.write_all(&chunk).await?;
                written += chunk.len() as u64;
            }
            file.flush().await?;
            file.sync_all().await?;
            Ok::<_, Error>(())
        }
        .await;
        drop(file);

        if let Err(e) = streamed {
            discard_partial(&temp).await;
            return Err(e);
        }

        publish(&temp, dest).await?;
        Ok(written)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, token: Option<&str>) -> HttpClient {
        HttpClient::new(&ApiConfig {
            base_url: format!("{}/", server.uri()),
            token: token.map(str::to_string),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn fetch_record_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/things/11190"))
            .and(header("Authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 11190})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("secret"));
        let value = client.fetch_record("/things/11190").await.unwrap();
        assert_eq!(value["id"], json!(11190));
    }

    #[tokio::test]
    async fn non_success_status_becomes_api_error_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/things/404"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Thing not found"))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("secret"));
        match client.fetch_record("/things/404").await.unwrap_err() {
            Error::Api { path, status, body } => {
                assert_eq!(path, "/things/404");
                assert_eq!(status, 404);
                assert_eq!(body.as_deref(), Some("Thing not found"));
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_list_passes_page_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/tbuser/things"))
            .and(query_param("page", "2"))
            .and(query_param("per_page", "30"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}, {"id": 2}])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("secret"));
        let items = client
            .fetch_list(
                "/users/tbuser/things",
                Some(PageRequest {
                    page: 2,
                    per_page: 30,
                }),
            )
            .await
            .unwrap();
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn fetch_list_rejects_non_array_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/things/1/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "nope"})))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let err = client.fetch_list("/things/1/files", None).await.unwrap_err();
        assert!(matches!(err, Error::InvalidRecord { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn download_writes_file_and_reports_size() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/1/download"))
            .and(header("Authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"solid cube".to_vec()))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("cube.stl");
        let client = client_for(&server, Some("secret"));

        let url = format!("{}/files/1/download", server.uri());
        let written = client.download(&url, &dest, true).await.unwrap();

        assert_eq!(written, 10);
        assert_eq!(std::fs::read(&dest).unwrap(), b"solid cube");
        assert!(!partial_path(&dest).exists());
    }

    #[tokio::test]
    async fn unauthenticated_download_omits_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cdn/cover.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg".to_vec()))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("cover.jpg");
        let client = client_for(&server, Some("secret"));

        let url = format!("{}/cdn/cover.jpg", server.uri());
        client.download(&url, &dest, false).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn failed_download_leaves_no_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/2/download"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("broken.stl");
        let client = client_for(&server, Some("secret"));

        let url = format!("{}/files/2/download", server.uri());
        let err = client.download(&url, &dest, true).await.unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert!(!dest.exists());
        assert!(!partial_path(&dest).exists());
    }
}
