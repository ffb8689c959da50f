//! reqwest-backed gateway implementing both endpoint ports

use async_trait::async_trait;
use empower_application::{
    ChatGateway, ClientConfig, GatewayError, ReviewAck, ReviewGateway,
};
use empower_domain::{FeedbackRecord, Message};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

const CHAT_PATH: &str = "/chat";
const REVIEW_PATH: &str = "/review";

/// Error bodies longer than this are cut before they reach logs.
const MAX_ERROR_BODY: usize = 512;

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: &'a [Message],
}

#[derive(Deserialize)]
struct ChatResponse {
    reply: String,
}

/// Gateway for the chat backend over HTTP
///
/// Request timeouts are enforced by the use cases, not the HTTP client.
pub struct HttpChatGateway {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpChatGateway {
    /// Create a gateway with a default HTTP client
    pub fn new(config: ClientConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("empower-chat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, config))
    }

    /// Create a gateway with an existing client
    pub fn with_client(client: reqwest::Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// POST `body` as JSON and return the response body text on 2xx.
    async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<String, GatewayError> {
        let url = self.config.endpoint(path);
        trace!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body: truncate(&text, MAX_ERROR_BODY),
            });
        }

        Ok(text)
    }
}

fn map_transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_connect() || e.is_request() {
        GatewayError::Connection(e.to_string())
    } else {
        GatewayError::Other(e.to_string())
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        text.to_string()
    } else {
        let mut end = max;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &text[..end])
    }
}

#[async_trait]
impl ChatGateway for HttpChatGateway {
    async fn send_chat(&self, messages: &[Message]) -> Result<String, GatewayError> {
        let body = self.post_json(CHAT_PATH, &ChatRequest { messages }).await?;

        let response: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            GatewayError::MalformedResponse(format!(
                "{}: {}",
                e,
                truncate(&body, MAX_ERROR_BODY)
            ))
        })?;

        Ok(response.reply)
    }
}

#[async_trait]
impl ReviewGateway for HttpChatGateway {
    async fn submit_review(&self, record: &FeedbackRecord) -> Result<ReviewAck, GatewayError> {
        let body = self.post_json(REVIEW_PATH, record).await?;

        // The ack has no contract beyond "2xx"; parse what we can.
        let ack = serde_json::from_str::<ReviewAck>(&body).unwrap_or_else(|e| {
            debug!(error = %e, "Unrecognized review acknowledgment");
            ReviewAck::default()
        });
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::post};
    use empower_domain::Rating;
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};

    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn gateway(base_url: &str) -> HttpChatGateway {
        HttpChatGateway::new(ClientConfig::new(base_url)).unwrap()
    }

    #[tokio::test]
    async fn test_send_chat_posts_full_transcript() {
        let seen: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
        let router = Router::new().route(
            "/chat",
            post({
                let seen = seen.clone();
                move |Json(body): Json<Value>| {
                    let seen = seen.clone();
                    async move {
                        *seen.lock().unwrap() = Some(body);
                        Json(json!({ "reply": "world" }))
                    }
                }
            }),
        );
        let base_url = spawn_server(router).await;

        let reply = gateway(&base_url)
            .send_chat(&[Message::user("hi"), Message::assistant("yo"), Message::user("hello")])
            .await
            .unwrap();

        assert_eq!(reply, "world");
        let body = seen.lock().unwrap().clone().unwrap();
        assert_eq!(
            body,
            json!({
                "messages": [
                    { "role": "user", "content": "hi" },
                    { "role": "assistant", "content": "yo" },
                    { "role": "user", "content": "hello" },
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let router = Router::new().route(
            "/chat",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model exploded") }),
        );
        let base_url = spawn_server(router).await;

        let err = gateway(&base_url)
            .send_chat(&[Message::user("hi")])
            .await
            .unwrap_err();

        match err {
            GatewayError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "model exploded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_an_error() {
        let router = Router::new()
            .route("/chat", post(|| async { Json(json!({ "answer": "wrong field" })) }));
        let base_url = spawn_server(router).await;

        let err = gateway(&base_url)
            .send_chat(&[Message::user("hi")])
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_connection_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = gateway(&format!("http://{}", addr))
            .send_chat(&[Message::user("hi")])
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::Connection(_)));
    }

    #[tokio::test]
    async fn test_submit_review_posts_record() {
        let seen: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
        let router = Router::new().route(
            "/review",
            post({
                let seen = seen.clone();
                move |Json(body): Json<Value>| {
                    let seen = seen.clone();
                    async move {
                        *seen.lock().unwrap() = Some(body);
                        Json(json!({ "status": "skipped", "reason": "self-review disabled" }))
                    }
                }
            }),
        );
        let base_url = spawn_server(router).await;

        let record = FeedbackRecord::new(Rating::Bad, vec![Message::user("hi")]);
        let ack = gateway(&base_url).submit_review(&record).await.unwrap();

        assert_eq!(ack.status.as_deref(), Some("skipped"));
        assert_eq!(ack.reason.as_deref(), Some("self-review disabled"));
        let body = seen.lock().unwrap().clone().unwrap();
        assert_eq!(body["rating"], "bad");
        assert_eq!(body["messages"][0]["content"], "hi");
    }

    #[tokio::test]
    async fn test_review_accepts_any_ack_body() {
        let router = Router::new().route("/review", post(|| async { "ok" }));
        let base_url = spawn_server(router).await;

        let record = FeedbackRecord::new(Rating::Good, vec![]);
        let ack = gateway(&base_url).submit_review(&record).await.unwrap();

        assert_eq!(ack, ReviewAck::default());
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééé", 3), "é...");
    }
}
