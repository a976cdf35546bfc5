//! Buyer validation, order construction and single-flight submission.
//!
//! A [`CheckoutSession`] belongs to one checkout page. Its in-flight flag is
//! raised before the payment request starts and lowered only when the
//! request fails, so at most one order-creation request is ever outstanding.
//! A successful submission leaves the flag raised: the buyer is sent to the
//! payment page and the session is finished.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};
use url::Url;

use crate::catalog::CatalogQuery;
use crate::config::PAYMENT_CREATE_ENDPOINT;
use crate::context::ShopContext;
use crate::error::{Result, ShopError};
use crate::models::{OrderPayload, PaymentRedirect, Product};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern is valid"));

pub const PAY_LABEL: &str = "Оплатить";
pub const PAY_PENDING_LABEL: &str = "Создание платежа...";

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Raw form input as typed by the buyer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutInput {
    pub nick: String,
    pub email: String,
    pub agree: bool,
}

impl CheckoutInput {
    pub fn new(nick: impl Into<String>, email: impl Into<String>, agree: bool) -> Self {
        Self {
            nick: nick.into(),
            email: email.into(),
            agree,
        }
    }
}

/// Per-field validity; each field's error indicator follows its own flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldValidity {
    pub nick: bool,
    pub email: bool,
    pub agree: bool,
}

impl FieldValidity {
    pub fn all_valid(&self) -> bool {
        self.nick && self.email && self.agree
    }
}

/// Check every field independently.
pub fn check_fields(input: &CheckoutInput) -> FieldValidity {
    FieldValidity {
        nick: input.nick.trim().chars().count() >= 2,
        email: EMAIL_RE.is_match(input.email.trim()),
        agree: input.agree,
    }
}

/// `true` iff nickname, email and consent are all valid.
pub fn validate(input: &CheckoutInput) -> bool {
    check_fields(input).all_valid()
}

// ---------------------------------------------------------------------------
// Order construction
// ---------------------------------------------------------------------------

pub fn order_id(nick: &str, timestamp_ms: i64) -> String {
    format!("order_{}_{}", timestamp_ms, nick)
}

/// Compose the order for `product` from validated buyer input.
pub fn build_order(product: &Product, input: &CheckoutInput, timestamp_ms: i64) -> Result<OrderPayload> {
    let amount = product.price.filter(|p| p.is_finite()).ok_or_else(|| {
        ShopError::InvalidArgument(format!("product '{}' has no price", product.id))
    })?;
    let nick = input.nick.trim().to_string();

    Ok(OrderPayload {
        order_id: order_id(&nick, timestamp_ms),
        description: format!("Покупка товара: {} (Ник: {})", product.title, nick),
        email: input.email.trim().to_string(),
        product_id: product.id.clone(),
        title: product.title.clone(),
        amount,
        nick,
    })
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// Product id carried by the checkout page query string (`?id=...`).
///
/// Empty values and the literal strings `undefined` / `null` count as absent.
pub fn product_id_from_query(query: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.into_owned())
        .filter(|id| !id.is_empty() && id != "undefined" && id != "null")
}

/// Link from a catalog page to the checkout page for `product_id`.
pub fn checkout_url(page_url: &str, product_id: &str) -> Result<Url> {
    let mut url = Url::parse(page_url)?.join("payment.html")?;
    url.query_pairs_mut().clear().append_pair("id", product_id);
    Ok(url)
}

/// Match a URL-supplied id against the catalog by string equality.
pub fn resolve_product<'p>(products: &'p [Product], id: &str) -> Option<&'p Product> {
    products.iter().find(|p| p.id == id)
}

// ---------------------------------------------------------------------------
// Payment gateways
// ---------------------------------------------------------------------------

/// What the payment integration produced.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    /// Navigate the buyer to the hosted payment page.
    Redirect(String),
    /// An embedded integration finished on its own; the value is its result.
    Completed(serde_json::Value),
}

/// Hands an order to a payment provider.
pub trait PaymentGateway: Send + Sync {
    fn pay(&self, order: &OrderPayload) -> Result<PaymentOutcome>;
}

/// `POST <base>/api/payment/create`; the answer must name a redirect URL.
pub struct HostedPaymentGateway {
    endpoint: String,
    client: Client,
}

impl HostedPaymentGateway {
    pub fn new(endpoint: impl Into<String>, client: Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }
}

impl PaymentGateway for HostedPaymentGateway {
    fn pay(&self, order: &OrderPayload) -> Result<PaymentOutcome> {
        let resp = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .json(order)
            .send()?;
        let status = resp.status();
        let raw = resp.text()?;
        if !status.is_success() {
            return Err(ShopError::Submission(format!(
                "order creation returned {}: {}",
                status.as_u16(),
                raw
            )));
        }

        let body: serde_json::Value = serde_json::from_str(&raw)
            .map_err(|_| ShopError::Submission(format!("unexpected response: {raw}")))?;
        PaymentRedirect::from_response(&body)
            .map(|redirect| PaymentOutcome::Redirect(redirect.url))
            .ok_or_else(|| ShopError::Submission(format!("unexpected response: {raw}")))
    }
}

// ---------------------------------------------------------------------------
// CheckoutSession
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// A submission is already in flight; nothing was sent.
    Ignored,
    Redirect(String),
    Completed(serde_json::Value),
}

/// Checkout state for one resolved product.
pub struct CheckoutSession {
    product: Product,
    gateway: Option<Arc<dyn PaymentGateway>>,
    in_flight: AtomicBool,
}

impl CheckoutSession {
    pub fn new(product: Product, gateway: Option<Arc<dyn PaymentGateway>>) -> Self {
        Self {
            product,
            gateway,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Submit is enabled when the input is valid and nothing is in flight.
    pub fn can_submit(&self, input: &CheckoutInput) -> bool {
        validate(input) && !self.is_submitting()
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_submitting() {
            PAY_PENDING_LABEL
        } else {
            PAY_LABEL
        }
    }

    /// Submit using the current time for the order id.
    pub fn submit(&self, input: &CheckoutInput) -> Result<SubmitOutcome> {
        self.submit_at(input, chrono::Utc::now().timestamp_millis())
    }

    /// Submit the order once.
    ///
    /// Returns [`SubmitOutcome::Ignored`] while another submission is in
    /// flight. On failure the flag is cleared and the error is returned so
    /// the buyer can retry.
    pub fn submit_at(&self, input: &CheckoutInput, timestamp_ms: i64) -> Result<SubmitOutcome> {
        if !validate(input) {
            return Err(ShopError::Validation("checkout form is incomplete".into()));
        }
        let Some(gateway) = self.gateway.as_ref() else {
            error!("payment integration missing");
            return Err(ShopError::IntegrationMissing(
                "Платежный модуль не загружен. Пожалуйста, обновите страницу.".into(),
            ));
        };

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!(product = %self.product.id, "submission already in flight, ignoring");
            return Ok(SubmitOutcome::Ignored);
        }

        let result = build_order(&self.product, input, timestamp_ms).and_then(|order| {
            info!(order_id = %order.order_id, product = %order.product_id, amount = order.amount, "submitting order");
            gateway.pay(&order)
        });

        match result {
            Ok(PaymentOutcome::Redirect(url)) => {
                info!(url = %url, "redirecting to payment page");
                Ok(SubmitOutcome::Redirect(url))
            }
            Ok(PaymentOutcome::Completed(value)) => Ok(SubmitOutcome::Completed(value)),
            Err(e) => {
                self.in_flight.store(false, Ordering::SeqCst);
                error!(error = %e, "order submission failed");
                Err(match e {
                    ShopError::Submission(msg) => ShopError::Submission(msg),
                    other => ShopError::Submission(other.to_string()),
                })
            }
        }
    }

    /// Lower the in-flight flag after an embedded integration completed.
    pub fn reset(&self) {
        self.in_flight.store(false, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// CheckoutQuery
// ---------------------------------------------------------------------------

/// Checkout interface bound to a [`ShopContext`].
pub struct CheckoutQuery<'a> {
    ctx: &'a ShopContext,
}

impl<'a> CheckoutQuery<'a> {
    pub fn new(ctx: &'a ShopContext) -> Self {
        Self { ctx }
    }

    /// The backend order-creation gateway.
    pub fn hosted_gateway(&self) -> HostedPaymentGateway {
        HostedPaymentGateway::new(
            self.ctx.config.endpoint(PAYMENT_CREATE_ENDPOINT),
            self.ctx.http.clone(),
        )
    }

    /// Resolve a product from a fresh catalog load.
    pub fn resolve(&self, product_id: &str) -> Result<Product> {
        CatalogQuery::new(self.ctx)
            .get(product_id)
            .ok_or_else(|| ShopError::NotFound(format!("product '{}'", product_id)))
    }

    /// Session for `product` submitting through the backend gateway.
    pub fn session(&self, product: Product) -> CheckoutSession {
        CheckoutSession::new(product, Some(Arc::new(self.hosted_gateway())))
    }
}
