use std::time::Duration;

use reqwest::multipart::{Form, Part};
use tracing::{debug, warn};

use crate::error::SubmissionError;
use crate::model::{AttachedFile, ResultSet};

const DEFAULT_BASE_URL: &str = "http://localhost:8001";
const SEARCH_PATH: &str = "/api/v1/search";

#[derive(Clone, Debug)]
pub struct SearchApiConfig {
    pub base_url: String,
    /// `None` lets a request wait until the API answers or the socket fails.
    pub timeout: Option<Duration>,
    pub max_error_body_bytes: usize,
}

impl SearchApiConfig {
    /// Optional:
    /// - `SEARCH_API_URL` (default: "http://localhost:8001")
    /// - `SEARCH_API_TIMEOUT_SECS` (default: no timeout)
    /// - `SEARCH_API_MAX_ERROR_BODY_BYTES` (default: 8192)
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("SEARCH_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout = std::env::var("SEARCH_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|&n| n > 0)
            .map(Duration::from_secs);

        let max_error_body_bytes = std::env::var("SEARCH_API_MAX_ERROR_BODY_BYTES")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(8 * 1024);

        Self {
            timeout,
            max_error_body_bytes,
            ..Self::for_base_url(&base_url)
        }
    }

    pub fn for_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: None,
            max_error_body_bytes: 8 * 1024,
        }
    }

    pub fn search_url(&self) -> String {
        format!("{}{SEARCH_PATH}", self.base_url)
    }
}

/// Client for the spreadsheet search API.
///
/// One POST per call: no retries, no cancellation.
#[derive(Clone)]
pub struct SearchApiClient {
    config: SearchApiConfig,
    http: reqwest::Client,
}

impl SearchApiClient {
    pub fn new(config: SearchApiConfig) -> Result<Self, SubmissionError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("formula-finder/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &SearchApiConfig {
        &self.config
    }

    /// Posts `query` and `file` as a multipart form and parses the reply.
    pub async fn search(&self, query: &str, file: &AttachedFile) -> Result<ResultSet, SubmissionError> {
        // A `Bytes` clone shares the upload buffer.
        let part = Part::stream_with_length(file.content.clone(), file.content.len() as u64)
            .file_name(file.name.clone())
            .mime_str(&file.media_type)?;
        let form = Form::new().text("query", query.to_string()).part("file", part);

        let mut request = self.http.post(self.config.search_url()).multipart(form);
        if let Some(timeout) = self.config.timeout {
            request = request.timeout(timeout);
        }

        debug!(
            url = %self.config.search_url(),
            file = %file.name,
            bytes = file.content.len(),
            "posting search"
        );
        let resp = request.send().await?;
        Self::parse_result_set(resp, self.config.max_error_body_bytes).await
    }

    async fn parse_result_set(
        resp: reqwest::Response,
        max_error_body_bytes: usize,
    ) -> Result<ResultSet, SubmissionError> {
        let status = resp.status();
        if !status.is_success() {
            let body = read_limited_text(resp, max_error_body_bytes).await;
            return Err(SubmissionError::Upstream { status, body });
        }

        let bytes = resp.bytes().await?;
        let set: ResultSet = serde_json::from_slice(&bytes)?;
        if let Some(error) = &set.error {
            warn!(error = %error, "search api reported an error");
        }
        Ok(set)
    }
}

async fn read_limited_text(resp: reqwest::Response, max_bytes: usize) -> String {
    match resp.bytes().await {
        Ok(b) => {
            let end = b.len().min(max_bytes);
            String::from_utf8_lossy(&b[..end]).to_string()
        }
        Err(e) => {
            warn!(error = %e, "failed to read search api error body");
            "<failed to read error body>".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::extract::Multipart;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    async fn spawn_api(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// Reflects the multipart fields back as a single result.
    async fn echo(mut multipart: Multipart) -> Json<Value> {
        let mut query = String::new();
        let mut file_name = String::new();
        let mut content_type = String::new();
        let mut content = String::new();
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "query" => query = field.text().await.unwrap(),
                "file" => {
                    file_name = field.file_name().unwrap_or_default().to_string();
                    content_type = field.content_type().unwrap_or_default().to_string();
                    content = String::from_utf8_lossy(&field.bytes().await.unwrap()).to_string();
                }
                _ => {}
            }
        }
        Json(json!({
            "size": 1,
            "results": [{
                "concept_name": query,
                "location": file_name,
                "explanation": content_type,
                "business_context": content,
                "relevance": 0.5
            }]
        }))
    }

    fn sample_file() -> AttachedFile {
        AttachedFile::new("forecast.csv", Some("text/csv"), b"Revenue,100".to_vec())
    }

    #[test]
    fn test_search_url_trims_trailing_slash() {
        let config = SearchApiConfig::for_base_url("http://localhost:8001/");
        assert_eq!(config.search_url(), "http://localhost:8001/api/v1/search");
        assert!(config.timeout.is_none());
    }

    #[tokio::test]
    async fn test_posts_multipart_query_and_file() {
        let base = spawn_api(Router::new().route("/api/v1/search", post(echo))).await;
        let client = SearchApiClient::new(SearchApiConfig::for_base_url(&base)).unwrap();

        let set = client.search("gross margin", &sample_file()).await.unwrap();
        assert_eq!(set.size, 1);

        let r = &set.results[0];
        assert_eq!(r.concept_name, "gross margin");
        assert_eq!(r.location, "forecast.csv");
        assert_eq!(r.explanation, "text/csv");
        assert_eq!(r.business_context, "Revenue,100");
    }

    #[tokio::test]
    async fn test_non_success_status_is_upstream_error() {
        let app = Router::new().route(
            "/api/v1/search",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "x".repeat(64)) }),
        );
        let base = spawn_api(app).await;
        let mut config = SearchApiConfig::for_base_url(&base);
        config.max_error_body_bytes = 10;
        let client = SearchApiClient::new(config).unwrap();

        let err = client.search("q", &sample_file()).await.unwrap_err();
        match err {
            SubmissionError::Upstream { status, body } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body.len(), 10);
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_json() {
        let app = Router::new().route("/api/v1/search", post(|| async { "<html>oops</html>" }));
        let base = spawn_api(app).await;
        let client = SearchApiClient::new(SearchApiConfig::for_base_url(&base)).unwrap();

        let err = client.search("q", &sample_file()).await.unwrap_err();
        assert!(matches!(err, SubmissionError::InvalidJson(_)));
        assert!(!err.is_unreachable());
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            SearchApiClient::new(SearchApiConfig::for_base_url(&format!("http://{addr}"))).unwrap();
        let err = client.search("q", &sample_file()).await.unwrap_err();
        assert!(matches!(err, SubmissionError::Transport(_)));
        assert!(err.is_unreachable());
    }
}
