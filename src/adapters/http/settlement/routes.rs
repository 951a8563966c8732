//! Axum router configuration for settlement endpoints.
//!
//! This module defines the route structure for the Paystack endpoints
//! and wires them to their corresponding handlers.

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{begin_checkout, handle_paystack_webhook, verify_redirect, SettlementAppState};

/// Create the settlement API router.
///
/// # Routes
///
/// ## Customer Endpoints
/// - `GET /verify` - Redirect-back from the payment page (always 302)
/// - `POST /checkout/:order_id` - Inline checkout parameters for an order
///
/// ## Webhook Endpoints (no auth, signature verified)
/// - `POST /webhook` - Signed Paystack events
///
/// Only checkout runs under `request_timeout`. The redirect is bounded by
/// the provider verify timeout, and neither settling path may be dropped
/// halfway through its side effects.
pub fn settlement_routes(request_timeout: Duration) -> Router<SettlementAppState> {
    let checkout = Router::new()
        .route("/checkout/:order_id", post(begin_checkout))
        .layer(TimeoutLayer::new(request_timeout));

    Router::new()
        .route("/verify", get(verify_redirect))
        .route("/webhook", post(handle_paystack_webhook))
        .merge(checkout)
}

/// Settlement routes mounted under `/paystack`.
pub fn settlement_router(request_timeout: Duration) -> Router<SettlementAppState> {
    Router::new().nest("/paystack", settlement_routes(request_timeout))
}

/// Complete application: routes, request tracing, state.
pub fn build_app(state: SettlementAppState, request_timeout: Duration) -> Router {
    settlement_router(request_timeout)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use rust_decimal_macros::dec;
    use tower::ServiceExt;

    use crate::adapters::memory::InMemoryOrderStore;
    use crate::adapters::paystack::MockPaymentProvider;
    use crate::config::{PaymentConfig, StorefrontConfig};
    use crate::domain::foundation::OrderId;
    use crate::domain::order::{Order, OrderStatus};
    use crate::domain::payment::{ProviderTransaction, SignatureVerifier};
    use crate::ports::OrderStore;

    const SECRET: &str = "sk_test_routes";
    const REF: &str = "42_1700000000";

    fn order_id() -> OrderId {
        OrderId::new(42).unwrap()
    }

    fn payment_config() -> PaymentConfig {
        PaymentConfig {
            test_mode: true,
            test_secret_key: Some(SECRET.to_string()),
            test_public_key: Some("pk_test_routes".to_string()),
            ..PaymentConfig::default()
        }
    }

    struct TestApp {
        app: Router,
        store: Arc<InMemoryOrderStore>,
        provider: MockPaymentProvider,
    }

    async fn test_app() -> TestApp {
        test_app_with_timeout(Duration::from_secs(5)).await
    }

    async fn test_app_with_timeout(request_timeout: Duration) -> TestApp {
        let store = Arc::new(
            InMemoryOrderStore::with_orders([
                Order::pending(order_id(), dec!(5000.00), "NGN").with_billing_email("ada@example.com")
            ])
            .await,
        );
        let provider = MockPaymentProvider::new();
        let state = SettlementAppState::new(
            store.clone(),
            Arc::new(provider.clone()),
            payment_config(),
            StorefrontConfig::default(),
        );
        TestApp {
            app: build_app(state, request_timeout),
            store,
            provider,
        }
    }

    fn location(response: &axum::response::Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    fn charge_body(reference: &str, amount: i64) -> Vec<u8> {
        format!(
            r#"{{"event":"charge.success","data":{{"reference":"{}","amount":{}}}}}"#,
            reference, amount
        )
        .into_bytes()
    }

    fn webhook_request(body: Vec<u8>, signature: Option<String>) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri("/paystack/webhook");
        if let Some(signature) = signature {
            builder = builder.header("x-paystack-signature", signature);
        }
        builder.body(Body::from(body)).unwrap()
    }

    // ══════════════════════════════════════════════════════════════
    // Redirect Route Tests
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn verify_redirects_to_order_received() {
        let t = test_app().await;
        t.provider
            .set_transaction(ProviderTransaction::successful(REF, 500_000));

        let response = t
            .app
            .oneshot(
                Request::builder()
                    .uri(format!("/paystack/verify?paystack_txnref={}", REF))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/checkout/order-received/42");
        let order = t.store.order(order_id()).await.unwrap();
        assert_eq!(order.status, OrderStatus::Processing);
    }

    #[tokio::test]
    async fn verify_without_reference_goes_to_cart() {
        let t = test_app().await;

        let response = t
            .app
            .oneshot(
                Request::builder()
                    .uri("/paystack/verify")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/cart");
        assert_eq!(t.provider.call_count(), 0);
    }

    #[tokio::test]
    async fn verify_accepts_provider_trxref_parameter() {
        let t = test_app().await;
        t.provider
            .set_transaction(ProviderTransaction::failed(REF, 500_000));

        let response = t
            .app
            .oneshot(
                Request::builder()
                    .uri(format!("/paystack/verify?trxref={}&reference={}", REF, REF))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(location(&response), "/checkout/order-received/42");
        let order = t.store.order(order_id()).await.unwrap();
        assert_eq!(order.status, OrderStatus::Failed);
    }

    #[tokio::test]
    async fn verify_with_repeated_reference_still_redirects() {
        let t = test_app().await;
        t.provider
            .set_transaction(ProviderTransaction::successful(REF, 500_000));

        let response = t
            .app
            .oneshot(
                Request::builder()
                    .uri(format!("/paystack/verify?reference={}&reference={}", REF, REF))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/checkout/order-received/42");
        let order = t.store.order(order_id()).await.unwrap();
        assert_eq!(order.status, OrderStatus::Processing);
    }

    #[tokio::test]
    async fn slow_provider_still_redirects_past_request_timeout() {
        let t = test_app_with_timeout(Duration::from_millis(50)).await;
        t.provider
            .set_transaction(ProviderTransaction::successful(REF, 500_000));
        t.provider.set_latency(Duration::from_millis(300));

        let response = t
            .app
            .oneshot(
                Request::builder()
                    .uri(format!("/paystack/verify?reference={}", REF))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/checkout/order-received/42");
        let order = t.store.order(order_id()).await.unwrap();
        assert_eq!(order.status, OrderStatus::Processing);
    }

    // ══════════════════════════════════════════════════════════════
    // Webhook Route Tests
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn signed_webhook_settles_order() {
        let t = test_app().await;
        t.store.record_pending_reference(order_id(), REF).await.unwrap();
        let body = charge_body(REF, 500_000);
        let signature = SignatureVerifier::new(SECRET).sign(&body);

        let response = t.app.oneshot(webhook_request(body, signature)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let order = t.store.order(order_id()).await.unwrap();
        assert_eq!(order.status, OrderStatus::Processing);
    }

    #[tokio::test]
    async fn unsigned_webhook_is_acknowledged_and_ignored() {
        let t = test_app().await;
        t.store.record_pending_reference(order_id(), REF).await.unwrap();

        let response = t
            .app
            .oneshot(webhook_request(charge_body(REF, 500_000), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
        assert_eq!(t.store.read_count().await, 0);
    }

    #[tokio::test]
    async fn forged_webhook_is_acknowledged_and_ignored() {
        let t = test_app().await;
        t.store.record_pending_reference(order_id(), REF).await.unwrap();

        let response = t
            .app
            .oneshot(webhook_request(
                charge_body(REF, 500_000),
                Some("00".repeat(64)),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(t.store.activity(order_id()).await.unwrap().is_untouched());
    }

    #[tokio::test]
    async fn webhook_store_failure_asks_for_redelivery() {
        let t = test_app().await;
        t.store.record_pending_reference(order_id(), REF).await.unwrap();
        t.store.set_fail_writes(true);
        let body = charge_body(REF, 500_000);
        let signature = SignatureVerifier::new(SECRET).sign(&body);

        let response = t.app.oneshot(webhook_request(body, signature)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn oversized_webhook_body_is_refused() {
        let t = test_app().await;
        t.store.record_pending_reference(order_id(), REF).await.unwrap();
        let body = vec![b' '; 70 * 1024];
        let signature = SignatureVerifier::new(SECRET).sign(&body);

        let response = t.app.oneshot(webhook_request(body, signature)).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(t.store.read_count().await, 0);
        assert!(t.store.activity(order_id()).await.unwrap().is_untouched());
    }

    #[tokio::test]
    async fn webhook_rejects_get() {
        let t = test_app().await;

        let response = t
            .app
            .oneshot(
                Request::builder()
                    .uri("/paystack/webhook")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    // ══════════════════════════════════════════════════════════════
    // Checkout Route Tests
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn checkout_returns_widget_parameters() {
        let t = test_app().await;

        let response = t
            .app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/paystack/checkout/42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["key"], "pk_test_routes");
        assert_eq!(json["amount"], 500_000);
        let reference = json["ref"].as_str().unwrap();
        assert!(reference.starts_with("42_"));

        let pending = t.store.get_pending_reference(order_id()).await.unwrap();
        assert_eq!(pending.as_deref(), Some(reference));
    }

    #[tokio::test]
    async fn checkout_for_unknown_order_is_not_found() {
        let t = test_app().await;

        let response = t
            .app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/paystack/checkout/7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn checkout_with_bad_order_id_is_bad_request() {
        let t = test_app().await;

        let response = t
            .app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/paystack/checkout/abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn checkout_for_paid_order_conflicts() {
        let t = test_app().await;
        t.store
            .insert(Order::pending(order_id(), dec!(5000.00), "NGN").with_status(OrderStatus::Processing))
            .await;

        let response = t
            .app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/paystack/checkout/42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
