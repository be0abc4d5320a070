// src/alert/notifier.rs
use crate::domain::errors::{NotifyError, NotifyResult};
use async_trait::async_trait;
use hyper::client::HttpConnector;
use hyper::{Body, Client, Method, Request};
use hyper_tls::HttpsConnector;
use serde::Serialize;

pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Outbound notification channel
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> NotifyResult<()>;
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Telegram Bot API `sendMessage` client
pub struct TelegramNotifier {
    client: Client<HttpsConnector<HttpConnector>>,
    endpoint: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(endpoint: &str, token: &str, chat_id: &str) -> Self {
        Self {
            client: Client::builder().build::<_, Body>(HttpsConnector::new()),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token: token.to_string(),
            chat_id: chat_id.to_string(),
        }
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.endpoint, self.token)
    }

    fn build_request(&self, text: &str) -> NotifyResult<Request<Body>> {
        let payload = serde_json::to_vec(&SendMessage {
            chat_id: &self.chat_id,
            text,
        })?;

        Request::builder()
            .method(Method::POST)
            .uri(self.send_message_url())
            .header("content-type", "application/json")
            .body(Body::from(payload))
            .map_err(|e| NotifyError::Request(e.to_string()))
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> NotifyResult<()> {
        let request = self.build_request(text)?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| NotifyError::Request(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = hyper::body::to_bytes(response.into_body())
            .await
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default();

        Err(NotifyError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builds_send_message_request() {
        let notifier = TelegramNotifier::new("https://api.telegram.org/", "123:abc", "-1001");
        let request = notifier.build_request("BTCUSDT up 4.05%").unwrap();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(
            request.uri().to_string(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
        assert_eq!(
            request.headers()["content-type"].to_str().unwrap(),
            "application/json"
        );

        let body = hyper::body::to_bytes(request.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["chat_id"], "-1001");
        assert_eq!(json["text"], "BTCUSDT up 4.05%");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_request_error() {
        let notifier = TelegramNotifier::new("http://127.0.0.1:1", "token", "chat");
        let result = notifier.send("hello").await;
        assert!(matches!(result, Err(NotifyError::Request(_))));
    }
}
