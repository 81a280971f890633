//! Churn Service REST Client
//!
//! HTTP client for the churn service's REST API. Requests are made once;
//! failures are reported to the caller, never retried.

use super::{AuthToken, BackendError, BackendResult, ChatReply, ChurnBackend, HealthStatus, Prediction};
use crate::config::BackendConfig;
use crate::encoder::FeatureVector;
use crate::profile::CustomerProfile;
use crate::stats::DashboardData;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Churn service REST API client
pub struct HttpBackend {
    client: Client,
    config: BackendConfig,
}

impl HttpBackend {
    /// Create a new client with the given configuration
    pub fn new(config: BackendConfig) -> BackendResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Builder method: use a bearer token for predictions
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.config.token = Some(token.into());
        self
    }

    fn chat_url(&self, query: &str) -> String {
        format!(
            "{}?query={}",
            self.config.endpoint(&self.config.routes.chat),
            urlencoding::encode(query)
        )
    }

    fn customer_url(&self, customer_id: &str) -> String {
        let route = &self.config.routes.customer;
        let encoded = urlencoding::encode(customer_id);

        if route.contains("{id}") {
            self.config.endpoint(&route.replace("{id}", &encoded))
        } else {
            format!("{}?customer_id={}", self.config.endpoint(route), encoded)
        }
    }

    /// Send a request and decode a JSON body from a 2xx response
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> BackendResult<T> {
        let response = request.send().await.map_err(send_error)?;
        let status = response.status();
        let body = response.text().await.map_err(send_error)?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "Churn service response");

        serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ChurnBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn dashboard_data(&self) -> BackendResult<DashboardData> {
        let url = self.config.endpoint(&self.config.routes.dashboard);
        tracing::debug!(%url, "Fetching dashboard data");

        // failures come back as 200 with {"status": "error", "message": ...}
        let value: serde_json::Value = self.send_json(self.client.get(&url)).await?;
        if value.get("status").and_then(|s| s.as_str()) == Some("error") {
            let message = value
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown error")
                .to_string();
            return Err(BackendError::Api {
                status: StatusCode::OK.as_u16(),
                message,
            });
        }

        serde_json::from_value(value).map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn customer_profile(&self, customer_id: &str) -> BackendResult<CustomerProfile> {
        let url = self.customer_url(customer_id);
        tracing::debug!(%url, "Fetching customer profile");

        match self.send_json(self.client.get(&url)).await {
            Err(BackendError::Api { status: 404, .. }) => {
                Err(BackendError::NotFound(format!("customer {}", customer_id)))
            }
            other => other,
        }
    }

    async fn predict(&self, features: &FeatureVector) -> BackendResult<Prediction> {
        let url = self.config.endpoint(&self.config.routes.predict);
        tracing::debug!(%url, features = features.len(), "Requesting churn prediction");

        let mut request = self.client.post(&url).json(&PredictRequest { features });
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        self.send_json(request).await
    }

    async fn chat(&self, query: &str) -> BackendResult<ChatReply> {
        let url = self.chat_url(query);
        tracing::debug!(%url, "Sending chat query");

        self.send_json(self.client.get(&url)).await
    }

    async fn health(&self) -> BackendResult<HealthStatus> {
        let url = self.config.endpoint(&self.config.routes.health);
        self.send_json(self.client.get(&url)).await
    }

    async fn login(&self, email: &str, password: &str) -> BackendResult<AuthToken> {
        let url = self.config.endpoint(&self.config.routes.login);
        let form = [("username", email), ("password", password)];

        self.send_json(self.client.post(&url).form(&form)).await
    }

    async fn register(&self, email: &str, password: &str) -> BackendResult<String> {
        let url = self.config.endpoint(&self.config.routes.register);
        let body = RegisterRequest { email, password };

        let reply: MessageResponse = self.send_json(self.client.post(&url).json(&body)).await?;
        Ok(reply.message)
    }
}

fn send_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout
    } else if e.is_connect() {
        BackendError::Unavailable(e.to_string())
    } else {
        BackendError::Request(e)
    }
}

/// Map a non-2xx response, preferring FastAPI's `{"detail": ...}` message
fn status_error(status: StatusCode, body: &str) -> BackendError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.detail)
        .unwrap_or_else(|| body.trim().to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Unauthorized(message),
        _ => BackendError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

// ============================================
// Request/Response DTOs
// ============================================

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    features: &'a FeatureVector,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a loopback port; yields the raw request
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];

            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request).to_string();
                if let Some(end) = text.find("\r\n\r\n") {
                    let content_length = text[..end]
                        .lines()
                        .find_map(|l| {
                            let (k, v) = l.split_once(':')?;
                            k.eq_ignore_ascii_case("content-length")
                                .then(|| v.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= end + 4 + content_length || n == 0 {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            String::from_utf8_lossy(&request).to_string()
        });

        (format!("http://{}", addr), handle)
    }

    fn backend(url: String) -> HttpBackend {
        let config = BackendConfig {
            url,
            ..BackendConfig::default()
        };
        HttpBackend::new(config).unwrap()
    }

    #[test]
    fn test_chat_url_encodes_query() {
        let backend = backend("http://localhost:8000/".to_string());
        assert_eq!(
            backend.chat_url("what's my tenure & contract?"),
            "http://localhost:8000/chat?query=what%27s%20my%20tenure%20%26%20contract%3F"
        );
    }

    #[test]
    fn test_customer_url_query_and_template() {
        let mut backend = backend("http://localhost:8000".to_string());
        assert_eq!(
            backend.customer_url("7590-VHVEG"),
            "http://localhost:8000/customer-profile?customer_id=7590-VHVEG"
        );

        backend.config.routes.customer = "/customer/{id}".to_string();
        assert_eq!(
            backend.customer_url("a b/c"),
            "http://localhost:8000/customer/a%20b%2Fc"
        );
    }

    #[test]
    fn test_status_error_uses_detail() {
        let err = status_error(StatusCode::NOT_FOUND, r#"{"detail": "Customer not found"}"#);
        assert!(matches!(
            err,
            BackendError::Api { status: 404, ref message } if message == "Customer not found"
        ));

        let err = status_error(StatusCode::UNAUTHORIZED, r#"{"detail": "Not authenticated"}"#);
        assert!(matches!(err, BackendError::Unauthorized(ref m) if m == "Not authenticated"));

        let err = status_error(StatusCode::BAD_GATEWAY, "upstream down\n");
        assert!(matches!(err, BackendError::Api { status: 502, ref message } if message == "upstream down"));
    }

    #[tokio::test]
    async fn test_chat_round_trip() {
        let (url, server) = serve_once("200 OK", r#"{"response": "Tenure: 12 months, Contract: One year"}"#).await;

        let reply = backend(url).chat("my tenure").await.unwrap();
        assert_eq!(
            reply.response.as_deref(),
            Some("Tenure: 12 months, Contract: One year")
        );

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /chat?query=my%20tenure HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_predict_sends_features_and_token() {
        let (url, server) = serve_once("200 OK", r#"{"churn_prediction": 1}"#).await;

        let mut vector = FeatureVector::default();
        vector.push("tenure", 12.0);
        let prediction = backend(url)
            .with_token("user@example.com")
            .predict(&vector)
            .await
            .unwrap();
        assert!(prediction.churned());

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /predict HTTP/1.1"));
        assert!(request.to_lowercase().contains("authorization: bearer user@example.com"));
        assert!(request.ends_with(r#"{"features":{"tenure":12.0}}"#));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_api_error() {
        let (url, server) = serve_once("500 Internal Server Error", r#"{"detail": "Prediction error"}"#).await;

        let err = backend(url).predict(&FeatureVector::default()).await.unwrap_err();
        assert!(matches!(err, BackendError::Api { status: 500, .. }));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_json_maps_to_decode() {
        let (url, server) = serve_once("200 OK", "<html>oops</html>").await;

        let err = backend(url).chat("hello").await.unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_dashboard_error_envelope() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"status": "error", "message": "No valid customers found in the data."}"#,
        )
        .await;

        let err = backend(url).dashboard_data().await.unwrap_err();
        assert!(matches!(
            err,
            BackendError::Api { status: 200, ref message } if message == "No valid customers found in the data."
        ));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_customer_maps_to_not_found() {
        let (url, server) = serve_once("404 Not Found", r#"{"detail": "Customer not found"}"#).await;

        let err = backend(url).customer_profile("0000-NONE").await.unwrap_err();
        assert!(matches!(err, BackendError::NotFound(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_login_posts_form() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"access_token": "user@example.com", "token_type": "bearer"}"#,
        )
        .await;

        let token = backend(url).login("user@example.com", "s3cret").await.unwrap();
        assert_eq!(token.access_token, "user@example.com");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /token HTTP/1.1"));
        assert!(request.ends_with("username=user%40example.com&password=s3cret"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let err = backend(url).health().await.unwrap_err();
        assert!(err.is_connection(), "unexpected error: {:?}", err);
    }
}
