//! reqwest-backed transport

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use super::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use crate::Result;

/// Sends completion requests over HTTPS with reqwest
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with its own connection pool
    ///
    /// # Errors
    ///
    /// Returns error if the TLS backend can't be initialized
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("beacon-skill/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
        let response = self
            .client
            .post(&request.url)
            .bearer_auth(&request.bearer)
            .header(CONTENT_TYPE, "application/json")
            .timeout(request.timeout)
            .json(&request.body)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        let body = response.text().await.map_err(classify)?;

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().map(ToString::to_string),
            body,
        })
    }
}

fn classify(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() || e.is_request() {
        TransportError::Connect(e.to_string())
    } else {
        TransportError::Other(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        Json, Router,
        http::{HeaderMap, StatusCode, header},
        routing::post,
    };
    use serde_json::{Value, json};

    use super::*;

    /// Serve `router` on an ephemeral local port and return its completion URL
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{addr}/chat/completions")
    }

    fn request(url: String, timeout: Duration) -> HttpRequest {
        HttpRequest {
            url,
            bearer: "pplx-test".to_string(),
            body: json!({"model": "sonar-pro", "messages": [{"role": "user", "content": "hi"}]}),
            timeout,
        }
    }

    /// Echo the headers and body the server received
    async fn echo(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
        let get = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };
        Json(json!({
            "authorization": get(header::AUTHORIZATION),
            "content_type": get(header::CONTENT_TYPE),
            "body": body,
        }))
    }

    #[tokio::test]
    async fn test_sends_bearer_and_json_body() {
        let url = serve(Router::new().route("/chat/completions", post(echo))).await;

        let transport = ReqwestTransport::new().unwrap();
        let response = transport
            .post_json(request(url, Duration::from_secs(5)))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        let echoed: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(echoed["authorization"], "Bearer pplx-test");
        assert_eq!(echoed["content_type"], "application/json");
        assert_eq!(echoed["body"]["model"], "sonar-pro");
        assert_eq!(echoed["body"]["messages"][0]["content"], "hi");
    }

    #[tokio::test]
    async fn test_error_status_is_returned() {
        let url = serve(Router::new().route(
            "/chat/completions",
            post(|| async { (StatusCode::UNAUTHORIZED, "bad key") }),
        ))
        .await;

        let transport = ReqwestTransport::new().unwrap();
        let response = transport
            .post_json(request(url, Duration::from_secs(5)))
            .await
            .unwrap();

        assert_eq!(response.status, 401);
        assert_eq!(response.reason.as_deref(), Some("Unauthorized"));
        assert_eq!(response.body, "bad key");
    }

    #[tokio::test]
    async fn test_slow_server_is_timeout() {
        let url = serve(Router::new().route(
            "/chat/completions",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        ))
        .await;

        let transport = ReqwestTransport::new().unwrap();
        let result = transport
            .post_json(request(url, Duration::from_millis(100)))
            .await;

        assert!(matches!(result, Err(TransportError::Timeout)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_connect_error() {
        // Bind then drop to get a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let transport = ReqwestTransport::new().unwrap();
        let result = transport
            .post_json(HttpRequest {
                url: format!("http://127.0.0.1:{port}/chat/completions"),
                bearer: "test".to_string(),
                body: serde_json::json!({}),
                timeout: Duration::from_secs(2),
            })
            .await;

        assert!(matches!(
            result,
            Err(TransportError::Connect(_) | TransportError::Timeout)
        ));
    }
}
