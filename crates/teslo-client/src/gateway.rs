//! # Order Gateway
//!
//! The client's view of the order endpoints. [`checkout`](crate::checkout)
//! only talks to the [`OrderGateway`] trait, so tests swap in a fake.
//!
//! ## HTTP Mapping
//! ```text
//! submit_order     POST {base}/api/orders       body: OrderSubmission  → 201 Order
//! capture_payment  POST {base}/api/orders/pay   body: {orderId, transactionId} → 200 Order
//!
//! non-2xx  → { "code": "...", "message": "..." } → GatewayError::Rejected
//! no reply → GatewayError::Transport
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use tracing::debug;

use teslo_core::{Order, OrderSubmission};

use crate::error::GatewayError;

/// Body of `POST /api/orders/pay`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCapture {
    pub order_id: String,
    pub transaction_id: String,
}

/// Error body returned by the API server.
#[derive(Debug, Clone, Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Submits an order for server-side verification and storage.
    async fn submit_order(&self, submission: &OrderSubmission) -> Result<Order, GatewayError>;

    /// Records a captured payment against an unpaid order.
    async fn capture_payment(&self, capture: &PaymentCapture) -> Result<Order, GatewayError>;
}

/// reqwest-backed gateway to the Teslo API server.
#[derive(Clone)]
pub struct HttpGateway {
    inner: Arc<HttpGatewayInner>,
}

struct HttpGatewayInner {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    /// Creates a gateway, optionally signed in with a bearer token.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(base_url: impl Into<String>, token: Option<&str>) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();

        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| GatewayError::Transport(format!("Invalid token format: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(HttpGateway {
            inner: Arc::new(HttpGatewayInner {
                client,
                base_url: base_url.into().trim_end_matches('/').to_string(),
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        T: serde::de::DeserializeOwned,
        B: Serialize + Sync,
    {
        let url = format!("{}{}", self.inner.base_url, path);
        debug!(url = %url, "POST");

        let response = self.inner.client.post(&url).json(body).send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| GatewayError::Transport(format!("Failed to parse response: {e}")));
        }

        let status = status.as_u16();
        let text = response.text().await.unwrap_or_default();

        Err(match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => GatewayError::Rejected {
                status,
                code: body.code,
                message: body.message,
            },
            Err(_) => GatewayError::Rejected {
                status,
                code: format!("HTTP_{}", status),
                message: if text.is_empty() {
                    "Unknown error".to_string()
                } else {
                    text
                },
            },
        })
    }
}

#[async_trait]
impl OrderGateway for HttpGateway {
    async fn submit_order(&self, submission: &OrderSubmission) -> Result<Order, GatewayError> {
        self.post("/api/orders", submission).await
    }

    async fn capture_payment(&self, capture: &PaymentCapture) -> Result<Order, GatewayError> {
        self.post("/api/orders/pay", capture).await
    }
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use rust_decimal::Decimal;
    use serde_json::json;
    use teslo_core::ShippingAddress;

    /// Serves `router` on an ephemeral local port and returns its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn submission() -> OrderSubmission {
        OrderSubmission {
            order_items: Vec::new(),
            shipping_address: ShippingAddress {
                first_name: "Ana".to_string(),
                last_name: "Ruiz".to_string(),
                address: "Calle Mayor 1".to_string(),
                address2: None,
                zip_code: "28001".to_string(),
                city: "Madrid".to_string(),
                country: "ES".to_string(),
                phone: "600000000".to_string(),
            },
            number_of_items: 0,
            subtotal: Decimal::ZERO,
            tax: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }

    fn capture() -> PaymentCapture {
        PaymentCapture {
            order_id: "o-1".to_string(),
            transaction_id: "TX-1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_structured_error_body_becomes_rejection() {
        let router = Router::new().route(
            "/api/orders",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "code": "TOTAL_MISMATCH",
                        "message": "Total does not match with amount"
                    })),
                )
            }),
        );
        let gateway = HttpGateway::new(serve(router).await, Some("token")).unwrap();

        match gateway.submit_order(&submission()).await {
            Err(GatewayError::Rejected {
                status,
                code,
                message,
            }) => {
                assert_eq!(status, 400);
                assert_eq!(code, "TOTAL_MISMATCH");
                assert_eq!(message, "Total does not match with amount");
            }
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unstructured_error_body_gets_status_code() {
        let router = Router::new()
            .route(
                "/api/orders/pay",
                post(|| async { (StatusCode::BAD_GATEWAY, "upstream unavailable") }),
            )
            .route("/api/orders", post(|| async { StatusCode::SERVICE_UNAVAILABLE }));
        let gateway = HttpGateway::new(serve(router).await, None).unwrap();

        match gateway.capture_payment(&capture()).await {
            Err(GatewayError::Rejected {
                status,
                code,
                message,
            }) => {
                assert_eq!(status, 502);
                assert_eq!(code, "HTTP_502");
                assert_eq!(message, "upstream unavailable");
            }
            other => panic!("expected Rejected, got {:?}", other),
        }

        match gateway.submit_order(&submission()).await {
            Err(GatewayError::Rejected { code, message, .. }) => {
                assert_eq!(code, "HTTP_503");
                assert_eq!(message, "Unknown error");
            }
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreadable_success_body_is_transport_error() {
        let router = Router::new().route("/api/orders/pay", post(|| async { "not an order" }));
        let gateway = HttpGateway::new(serve(router).await, None).unwrap();

        let result = gateway.capture_payment(&capture()).await;
        assert!(matches!(result, Err(GatewayError::Transport(_))));
    }

    #[test]
    fn test_base_url_is_normalized() {
        let gateway = HttpGateway::new("http://localhost:3000/", Some("token")).unwrap();
        assert_eq!(gateway.base_url(), "http://localhost:3000");
    }

    #[test]
    fn test_payment_capture_wire_shape() {
        let body = serde_json::to_value(PaymentCapture {
            order_id: "o-1".to_string(),
            transaction_id: "TX-1".to_string(),
        })
        .unwrap();
        assert_eq!(body["orderId"], "o-1");
        assert_eq!(body["transactionId"], "TX-1");
    }
}
