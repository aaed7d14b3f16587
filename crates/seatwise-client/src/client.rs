//! Seatwise HTTP client implementation.

use reqwest::Client;
use std::time::Duration;

use crate::error::ClientError;
use crate::types::{
    ApiErrorResponse, BalanceResponse, CreateOrderRequest, CreateOrderResponse, PredictRequest,
    PredictResponse, VerifyPaymentRequest, VerifyPaymentResponse,
};

/// Seatwise API client.
///
/// Wraps the `/v1` HTTP surface with a session token. Every method targets
/// an authenticated endpoint and sends the token as a bearer header.
#[derive(Debug, Clone)]
pub struct SeatwiseClient {
    client: Client,
    base_url: String,
    token: String,
}

impl SeatwiseClient {
    /// Create a new seatwise client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the seatwise service (e.g., `"http://seatwise:8080"`)
    /// * `token` - Session token from the login endpoint
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_options(base_url, token, ClientOptions::default())
    }

    /// Create a new seatwise client with custom options.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn with_options(
        base_url: impl Into<String>,
        token: impl Into<String>,
        options: ClientOptions,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Get the current credit balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn balance(&self) -> Result<BalanceResponse, ClientError> {
        let url = format!("{}/v1/credits/balance", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("authorization", self.bearer())
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Run an eligibility prediction.
    ///
    /// Debits the prediction cost and returns the grouped results; a short
    /// balance comes back as [`ClientError::InsufficientCredits`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn predict(&self, request: PredictRequest) -> Result<PredictResponse, ClientError> {
        let url = format!("{}/v1/predictions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("authorization", self.bearer())
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Create a gateway order for a credit purchase.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn create_order(&self, credits: i64) -> Result<CreateOrderResponse, ClientError> {
        let url = format!("{}/v1/payments/order", self.base_url);
        let request = CreateOrderRequest { credits };

        let response = self
            .client
            .post(&url)
            .header("authorization", self.bearer())
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Verify a checkout payment and collect the purchased credits.
    ///
    /// A replayed checkout comes back as [`ClientError::Api`] with a 409
    /// status; the credits were already granted the first time.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn verify_payment(
        &self,
        order_id: impl Into<String>,
        payment_id: impl Into<String>,
        signature: impl Into<String>,
    ) -> Result<VerifyPaymentResponse, ClientError> {
        let url = format!("{}/v1/payments/verify", self.base_url);
        let request = VerifyPaymentRequest {
            order_id: order_id.into(),
            payment_id: payment_id.into(),
            signature: signature.into(),
        };

        let response = self
            .client
            .post(&url)
            .header("authorization", self.bearer())
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse the error envelope
        let error_body: Result<ApiErrorResponse, _> = response.json().await;

        match error_body {
            Ok(api_error) => {
                let code = api_error.error.code.as_str();
                let message = api_error.error.message;

                // Map specific error codes to typed errors
                match code {
                    "insufficient_credits" => {
                        let balance = api_error
                            .error
                            .details
                            .as_ref()
                            .and_then(|d| d.get("balance"))
                            .and_then(serde_json::Value::as_i64)
                            .unwrap_or(0);
                        let required = api_error
                            .error
                            .details
                            .as_ref()
                            .and_then(|d| d.get("required"))
                            .and_then(serde_json::Value::as_i64)
                            .unwrap_or(0);

                        Err(ClientError::InsufficientCredits { balance, required })
                    }
                    "duplicate_payment" => Err(ClientError::DuplicatePayment { message }),
                    "unauthorized" => Err(ClientError::Unauthorized { message }),
                    _ => Err(ClientError::Api {
                        code: code.to_string(),
                        message,
                        status: status.as_u16(),
                    }),
                }
            }
            Err(_) => Err(ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            }),
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seatwise_core::{Category, ExamType, Gender};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn client_creation() {
        let client = SeatwiseClient::new("http://localhost:8080", "token");
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = SeatwiseClient::new("http://localhost:8080/", "token");
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn client_options() {
        let options = ClientOptions {
            timeout_seconds: 5,
        };
        let client = SeatwiseClient::with_options("http://localhost:8080", "token", options);
        assert_eq!(client.token, "token");
    }

    #[tokio::test]
    async fn balance_sends_bearer_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/credits/balance"))
            .and(header("authorization", "Bearer session-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "credits": 15,
                "lifetime_recharged": 15,
                "lifetime_spent": 0,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = SeatwiseClient::new(server.uri(), "session-token");
        let balance = client.balance().await.unwrap();

        assert_eq!(balance.credits, 15);
        assert_eq!(balance.lifetime_spent, 0);
    }

    #[tokio::test]
    async fn predict_maps_short_balance_to_typed_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/predictions"))
            .respond_with(ResponseTemplate::new(402).set_body_json(serde_json::json!({
                "error": {
                    "code": "insufficient_credits",
                    "message": "Insufficient credits",
                    "details": { "balance": 5, "required": 10 },
                }
            })))
            .mount(&server)
            .await;

        let client = SeatwiseClient::new(server.uri(), "session-token");
        let err = client
            .predict(PredictRequest {
                rank: Some(12_000),
                percentile: None,
                category_rank: None,
                category: Category::General,
                gender: Gender::Female,
                home_state: "Kerala".to_string(),
                pwd: false,
                exam: ExamType::Main,
            })
            .await
            .unwrap_err();

        match err {
            ClientError::InsufficientCredits { balance, required } => {
                assert_eq!(balance, 5);
                assert_eq!(required, 10);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn verify_payment_returns_granted_balance() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/payments/verify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "balance": 65,
                "credits": 50,
            })))
            .mount(&server)
            .await;

        let client = SeatwiseClient::new(server.uri(), "session-token");
        let verified = client
            .verify_payment("order_1", "pay_1", "sig")
            .await
            .unwrap();

        assert_eq!(verified.balance, 65);
        assert_eq!(verified.credits, 50);
    }

    #[tokio::test]
    async fn unparseable_error_body_falls_back_to_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/credits/balance"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = SeatwiseClient::new(server.uri(), "session-token");
        let err = client.balance().await.unwrap_err();

        match err {
            ClientError::Api { code, status, .. } => {
                assert_eq!(code, "unknown");
                assert_eq!(status, 500);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
