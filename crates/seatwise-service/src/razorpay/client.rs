//! Razorpay API client implementation.

use std::time::Duration;

use reqwest::Client;

use super::types::{Order, RazorpayErrorResponse};
use crate::crypto::{constant_time_eq, hmac_sha256_hex};

/// Error type for Razorpay operations.
#[derive(Debug, thiserror::Error)]
pub enum RazorpayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Razorpay API returned an error.
    #[error("Razorpay API error: {code} - {description}")]
    Api {
        /// Error code.
        code: String,
        /// Error description.
        description: String,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid payment signature.
    #[error("Invalid payment signature")]
    InvalidSignature,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Razorpay API client.
///
/// Orders are created server-side with the key pair held by the backend;
/// the frontend checkout widget only ever sees the key id.
#[derive(Debug, Clone)]
pub struct RazorpayClient {
    client: Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

impl RazorpayClient {
    /// Razorpay API base URL.
    const BASE_URL: &'static str = "https://api.razorpay.com";

    /// Create a new Razorpay client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
    ) -> Result<Self, RazorpayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(RazorpayError::Http)?;

        Ok(Self {
            client,
            base_url: Self::BASE_URL.to_string(),
            key_id: key_id.into(),
            key_secret: key_secret.into(),
        })
    }

    /// Create a client against a different base URL (tests).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_base_url(
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, RazorpayError> {
        let mut client = Self::new(key_id, key_secret)?;
        client.base_url = base_url.into();
        Ok(client)
    }

    /// The public key id, for the frontend checkout widget.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Create an order for the given amount.
    pub async fn create_order(
        &self,
        amount_paise: u64,
        receipt: &str,
    ) -> Result<Order, RazorpayError> {
        let body = serde_json::json!({
            "amount": amount_paise,
            "currency": "INR",
            "receipt": receipt,
        });

        tracing::debug!(amount_paise, receipt, "Creating Razorpay order");

        let response = self
            .client
            .post(format!("{}/v1/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Verify a checkout payment signature.
    ///
    /// Razorpay signs `"{order_id}|{payment_id}"` with the key secret; the
    /// comparison is constant-time.
    ///
    /// # Errors
    ///
    /// Returns `RazorpayError::InvalidSignature` on mismatch.
    pub fn verify_payment_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), RazorpayError> {
        let payload = format!("{order_id}|{payment_id}");
        let expected = hmac_sha256_hex(&self.key_secret, &payload);

        if constant_time_eq(&expected, signature) {
            Ok(())
        } else {
            Err(RazorpayError::InvalidSignature)
        }
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, RazorpayError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let error_body: Result<RazorpayErrorResponse, _> = response.json().await;
        match error_body {
            Ok(err) => Err(RazorpayError::Api {
                code: err.error.code,
                description: err.error.description,
            }),
            Err(_) => Err(RazorpayError::Api {
                code: "unknown".to_string(),
                description: format!("HTTP {status}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_verification() {
        let client = RazorpayClient::new("rzp_test_key", "secret").unwrap();

        let valid = hmac_sha256_hex("secret", "order_abc|pay_xyz");
        assert!(client
            .verify_payment_signature("order_abc", "pay_xyz", &valid)
            .is_ok());

        assert!(matches!(
            client.verify_payment_signature("order_abc", "pay_xyz", "deadbeef"),
            Err(RazorpayError::InvalidSignature)
        ));

        // Signature for a different payment id must not verify.
        assert!(client
            .verify_payment_signature("order_abc", "pay_other", &valid)
            .is_err());
    }

    #[tokio::test]
    async fn create_order_against_mock() {
        use wiremock::matchers::{basic_auth, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/orders"))
            .and(basic_auth("rzp_test_key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "order_abc",
                "amount": 49_900,
                "currency": "INR",
                "receipt": "rcpt_1",
                "status": "created",
            })))
            .mount(&server)
            .await;

        let client =
            RazorpayClient::with_base_url("rzp_test_key", "secret", server.uri()).unwrap();
        let order = client.create_order(49_900, "rcpt_1").await.unwrap();

        assert_eq!(order.id, "order_abc");
        assert_eq!(order.amount, 49_900);
        assert_eq!(order.currency, "INR");
    }

    #[tokio::test]
    async fn api_errors_are_surfaced() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/orders"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {
                    "code": "BAD_REQUEST_ERROR",
                    "description": "amount must be at least 100",
                }
            })))
            .mount(&server)
            .await;

        let client =
            RazorpayClient::with_base_url("rzp_test_key", "secret", server.uri()).unwrap();
        let err = client.create_order(1, "rcpt_1").await.unwrap_err();

        assert!(matches!(err, RazorpayError::Api { code, .. } if code == "BAD_REQUEST_ERROR"));
    }
}
