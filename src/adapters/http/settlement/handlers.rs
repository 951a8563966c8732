//! HTTP handlers for settlement endpoints.
//!
//! These handlers connect Axum routes to application layer command handlers.

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Json, Path, Query, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::application::handlers::settlement::{
    BeginPaymentCommand, BeginPaymentHandler, HandleChargeWebhookCommand,
    HandleChargeWebhookHandler, OrderLocks, RedirectTarget, VerifyRedirectCommand,
    VerifyRedirectHandler,
};
use crate::config::{PaymentConfig, StorefrontConfig};
use crate::domain::foundation::OrderId;
use crate::domain::payment::{SettlementError, SignatureVerifier};
use crate::ports::{OrderStore, PaymentProvider};

use super::dto::{CheckoutResponse, ErrorResponse, VerifyQuery};

/// Webhook bodies larger than this are not Paystack events.
const MAX_WEBHOOK_BODY_BYTES: usize = 64 * 1024;

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// This struct is cloned for each request and contains Arc-wrapped dependencies
/// for efficient sharing across handlers.
#[derive(Clone)]
pub struct SettlementAppState {
    pub order_store: Arc<dyn OrderStore>,
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub verifier: SignatureVerifier,
    pub locks: Arc<OrderLocks>,
    pub payment: PaymentConfig,
    pub storefront: StorefrontConfig,
}

impl SettlementAppState {
    /// Builds state from configuration. The webhook secret is the active
    /// secret key.
    pub fn new(
        order_store: Arc<dyn OrderStore>,
        payment_provider: Arc<dyn PaymentProvider>,
        payment: PaymentConfig,
        storefront: StorefrontConfig,
    ) -> Self {
        let verifier = SignatureVerifier::new(payment.active_secret_key().unwrap_or_default());
        Self {
            order_store,
            payment_provider,
            verifier,
            locks: Arc::new(OrderLocks::new()),
            payment,
            storefront,
        }
    }

    /// Create handlers on demand from the shared state.
    pub fn verify_redirect_handler(&self) -> VerifyRedirectHandler {
        VerifyRedirectHandler::new(
            self.order_store.clone(),
            self.payment_provider.clone(),
            self.locks.clone(),
        )
    }

    pub fn webhook_handler(&self) -> HandleChargeWebhookHandler {
        HandleChargeWebhookHandler::new(
            self.order_store.clone(),
            self.verifier.clone(),
            self.locks.clone(),
        )
    }

    pub fn begin_payment_handler(&self) -> BeginPaymentHandler {
        BeginPaymentHandler::new(self.order_store.clone(), self.payment.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Redirect Handler
// ════════════════════════════════════════════════════════════════════════════════

/// GET /paystack/verify - Customer returns from the payment page.
///
/// Always answers with a 302, even when the query string is unreadable.
pub async fn verify_redirect(
    State(state): State<SettlementAppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(pairs)) => VerifyQuery::from_pairs(pairs),
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable redirect query");
            VerifyQuery::default()
        }
    };

    let handler = state.verify_redirect_handler();
    let cmd = VerifyRedirectCommand {
        reference: query.reference(),
    };

    let location = match handler.handle(cmd).await {
        RedirectTarget::OrderReturn(order_id) => state.storefront.return_url(order_id),
        RedirectTarget::Cart => state.storefront.cart_url.clone(),
    };

    found(&location)
}

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

// ════════════════════════════════════════════════════════════════════════════════
// Webhook Handler
// ════════════════════════════════════════════════════════════════════════════════

/// POST /paystack/webhook - Signed event from Paystack.
///
/// Every rejection is the same empty 200. Store failures answer 500 and
/// unreadable bodies 413, so Paystack redelivers.
pub async fn handle_paystack_webhook(
    State(state): State<SettlementAppState>,
    request: Request,
) -> StatusCode {
    let signature = request
        .headers()
        .get(state.payment.signature_header.as_str())
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let Some(signature) = signature else {
        tracing::warn!("Webhook without signature header");
        return StatusCode::OK;
    };

    let payload = match axum::body::to_bytes(request.into_body(), MAX_WEBHOOK_BODY_BYTES).await {
        Ok(bytes) => bytes.to_vec(),
        Err(e) => {
            tracing::error!(
                error = %e,
                limit = MAX_WEBHOOK_BODY_BYTES,
                "Webhook body unreadable or too large"
            );
            return StatusCode::PAYLOAD_TOO_LARGE;
        }
    };

    let handler = state.webhook_handler();
    let cmd = HandleChargeWebhookCommand {
        payload,
        signature: Some(signature),
    };

    match handler.handle(cmd).await {
        Ok(_) => StatusCode::OK,
        Err(e) => e.webhook_status_code(),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Checkout Handler
// ════════════════════════════════════════════════════════════════════════════════

/// POST /paystack/checkout/:order_id - Begin a payment attempt.
pub async fn begin_checkout(
    State(state): State<SettlementAppState>,
    Path(order_id): Path<String>,
) -> Result<Json<CheckoutResponse>, SettlementApiError> {
    let order_id: OrderId = order_id.parse().map_err(|_| SettlementApiError::InvalidOrderId)?;

    let handler = state.begin_payment_handler();
    let params = handler.handle(BeginPaymentCommand { order_id }).await?;

    Ok(Json(params.into()))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts settlement errors to HTTP responses.
pub enum SettlementApiError {
    InvalidOrderId,
    Settlement(SettlementError),
}

impl From<SettlementError> for SettlementApiError {
    fn from(err: SettlementError) -> Self {
        Self::Settlement(err)
    }
}

impl IntoResponse for SettlementApiError {
    fn into_response(self) -> Response {
        let err = match self {
            SettlementApiError::InvalidOrderId => {
                let body = ErrorResponse::new("INVALID_ORDER_ID", "Order id must be a positive integer");
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
            SettlementApiError::Settlement(err) => err,
        };

        let (status, error_code) = match &err {
            SettlementError::OrderNotFound(_) => (StatusCode::NOT_FOUND, "ORDER_NOT_FOUND"),
            SettlementError::AlreadySettled { .. } => (StatusCode::CONFLICT, "ORDER_ALREADY_PAID"),
            SettlementError::GatewayUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "GATEWAY_UNAVAILABLE")
            }
            SettlementError::CheckoutRejected(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "CHECKOUT_REJECTED")
            }
            SettlementError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            _ => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
        };

        // Store details stay in the logs.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %err, "Checkout failed");
            "Internal error".to_string()
        } else {
            err.to_string()
        };

        (status, Json(ErrorResponse::new(error_code, message))).into_response()
    }
}
