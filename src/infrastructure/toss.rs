use crate::domain::entities::PaymentRequest;
use crate::domain::errors::PaymentError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::{header, Client};
use std::sync::Arc;
use tracing::debug;

const KEY_PREFIX: &str = "Basic ";
const CONFIRM_PATH: &str = "/v1/payments/confirm";

/// Client for the Toss Payments confirmation endpoint.
///
/// Holds only immutable configuration, so one instance can be shared across
/// request handlers. Each `pay` call is an independent attempt; nothing is
/// cached or retried here.
pub struct TossPayClient {
    base_url: String,
    secret_key: String,
    client: Arc<Client>,
}

impl TossPayClient {
    pub fn new(
        base_url: impl Into<String>,
        secret_key: impl Into<String>,
        client: Arc<Client>,
    ) -> Self {
        TossPayClient {
            base_url: base_url.into(),
            secret_key: secret_key.into(),
            client,
        }
    }

    /// Confirms a payment with the gateway.
    ///
    /// A 2xx answer completes silently; the gateway's success payload is
    /// discarded. A 4xx answer is classified from its body into
    /// [`PaymentError::Failure`] or [`PaymentError::Parse`]. A 5xx answer or
    /// a transport failure propagates as is.
    pub async fn pay(&self, request: &PaymentRequest) -> Result<(), PaymentError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, CONFIRM_PATH))
            .header(header::AUTHORIZATION, self.authorization())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() {
            let body = response.text().await?;
            return Err(classify_client_error(&body));
        }
        if status.is_server_error() {
            return Err(PaymentError::Gateway(status));
        }

        debug!(order_id = %request.order_id, "payment confirmed");
        Ok(())
    }

    // Recomputed on every call so a rotated key takes effect immediately.
    // Toss uses the secret key as the Basic-auth user with an empty password.
    fn authorization(&self) -> String {
        let encoded = BASE64.encode(format!("{}:", self.secret_key));
        format!("{}{}", KEY_PREFIX, encoded)
    }
}

/// Turns a 4xx response body into a typed error.
///
/// Only a JSON object carrying both `code` and `message` strings counts as a
/// gateway decline; anything else means the gateway answered in a shape this
/// client does not know, which must not be reported as a declined payment.
fn classify_client_error(body: &str) -> PaymentError {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => return PaymentError::Parse(e.to_string()),
    };

    let code = value.get("code").and_then(|v| v.as_str());
    let message = value.get("message").and_then(|v| v.as_str());
    match (code, message) {
        (Some(code), Some(message)) => PaymentError::Failure {
            code: code.to_string(),
            message: message.to_string(),
        },
        _ => PaymentError::Parse(format!("missing code or message field in: {}", body)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET_KEY: &str = "test_sk_abc123";

    fn payment_request() -> PaymentRequest {
        PaymentRequest {
            order_id: "orderId".to_string(),
            amount: 1000,
            payment_key: "paymentKey".to_string(),
        }
    }

    fn client_for(server: &mockito::ServerGuard) -> TossPayClient {
        TossPayClient::new(server.url(), SECRET_KEY, Arc::new(Client::new()))
    }

    fn expected_authorization() -> String {
        format!("Basic {}", BASE64.encode(format!("{}:", SECRET_KEY)))
    }

    #[tokio::test]
    async fn pay_returns_ok_on_success() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/v1/payments/confirm")
            .match_header("authorization", expected_authorization().as_str())
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "orderId": "orderId",
                "amount": 1000,
                "paymentKey": "paymentKey"
            })))
            .with_status(200)
            .create_async()
            .await;

        let result = client_for(&server).pay(&payment_request()).await;

        mock.assert_async().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn pay_discards_success_body() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/v1/payments/confirm")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"totally": ["unexpected", "payload"]}"#)
            .create_async()
            .await;

        let result = client_for(&server).pay(&payment_request()).await;

        mock.assert_async().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn pay_classifies_decline_body_as_failure() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/v1/payments/confirm")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"code":"NOT_FOUND_PAYMENT","message":"존재하지 않는 결제 입니다."}"#)
            .create_async()
            .await;

        let result = client_for(&server).pay(&payment_request()).await;

        mock.assert_async().await;
        match result {
            Err(PaymentError::Failure { code, message }) => {
                assert_eq!(code, "NOT_FOUND_PAYMENT");
                assert_eq!(message, "존재하지 않는 결제 입니다.");
            }
            other => panic!("expected Failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn pay_treats_missing_code_field_as_parse_error() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/v1/payments/confirm")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"NOT_FOUND_PAYMENT","message":"존재하지 않는 결제 입니다."}"#)
            .create_async()
            .await;

        let result = client_for(&server).pay(&payment_request()).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(PaymentError::Parse(_))));
    }

    #[tokio::test]
    async fn pay_treats_invalid_json_body_as_parse_error() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/v1/payments/confirm")
            .with_status(400)
            .with_body("not json at all")
            .create_async()
            .await;

        let result = client_for(&server).pay(&payment_request()).await;

        mock.assert_async().await;
        match result {
            Err(PaymentError::Parse(diagnostic)) => assert!(!diagnostic.is_empty()),
            other => panic!("expected Parse, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn pay_does_not_classify_server_error_bodies() {
        let mut server = mockito::Server::new_async().await;

        // A 5xx body is never inspected, even when it looks like a decline.
        let mock = server
            .mock("POST", "/v1/payments/confirm")
            .with_status(502)
            .with_header("content-type", "application/json")
            .with_body(r#"{"code":"NOT_FOUND_PAYMENT","message":"존재하지 않는 결제 입니다."}"#)
            .create_async()
            .await;

        let result = client_for(&server).pay(&payment_request()).await;

        mock.assert_async().await;
        match result {
            Err(PaymentError::Gateway(status)) => assert_eq!(status.as_u16(), 502),
            other => panic!("expected Gateway, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn pay_propagates_transport_failure() {
        // Nothing listens on this port.
        let client = TossPayClient::new(
            "http://127.0.0.1:1",
            SECRET_KEY,
            Arc::new(Client::new()),
        );

        let result = client.pay(&payment_request()).await;
        assert!(matches!(result, Err(PaymentError::Transport(_))));
    }

    #[test]
    fn authorization_encodes_key_with_empty_password() {
        let client = TossPayClient::new("http://localhost", SECRET_KEY, Arc::new(Client::new()));

        let header = client.authorization();
        let encoded = header.strip_prefix("Basic ").expect("Basic prefix");
        let decoded = BASE64.decode(encoded).expect("valid base64");
        assert_eq!(decoded, format!("{}:", SECRET_KEY).as_bytes());
    }

    #[test]
    fn authorization_is_deterministic() {
        let client = TossPayClient::new("http://localhost", SECRET_KEY, Arc::new(Client::new()));
        assert_eq!(client.authorization(), client.authorization());
    }
}
