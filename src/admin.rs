//! Administrative payment operations, invoked out of band (never from a page).

use reqwest::header::ACCEPT;
use tracing::{info, warn};

use crate::config::PAYMENT_CANCEL_ENDPOINT;
use crate::context::ShopContext;
use crate::error::{Result, ShopError};
use crate::models::{CancelRequest, CancelResponse};

pub struct AdminQuery<'a> {
    ctx: &'a ShopContext,
}

impl<'a> AdminQuery<'a> {
    pub fn new(ctx: &'a ShopContext) -> Self {
        Self { ctx }
    }

    /// Cancel or refund a payment via `POST <base>/api/payment/cancel`.
    pub fn cancel_payment(&self, request: &CancelRequest) -> Result<CancelResponse> {
        if request.payment_id.trim().is_empty() {
            return Err(ShopError::InvalidArgument("payment id is required".into()));
        }
        if !request.amount.is_finite() || request.amount <= 0.0 {
            return Err(ShopError::InvalidArgument(format!(
                "refund amount must be positive, got {}",
                request.amount
            )));
        }

        let url = self.ctx.config.endpoint(PAYMENT_CANCEL_ENDPOINT);
        let resp = self
            .ctx
            .http
            .post(&url)
            .header(ACCEPT, "application/json")
            .json(request)
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ShopError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let response: CancelResponse = serde_json::from_str(&resp.text()?)?;
        if response.success {
            info!(payment_id = %request.payment_id, status = ?response.status, "payment cancelled");
        } else {
            warn!(payment_id = %request.payment_id, message = ?response.message, "cancel rejected");
        }
        Ok(response)
    }
}
