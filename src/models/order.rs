use serde::{Deserialize, Serialize, Serializer};

// ---------------------------------------------------------------------------
// OrderPayload: Body of the order-creation request
// ---------------------------------------------------------------------------

/// Order submitted once per checkout attempt; never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub nick: String,
    pub email: String,
    pub product_id: String,
    pub title: String,
    #[serde(serialize_with = "serialize_amount")]
    pub amount: f64,
    pub order_id: String,
    pub description: String,
}

/// Whole ruble amounts go out as JSON integers (`500`, not `500.0`).
fn serialize_amount<S: Serializer>(amount: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if amount.fract() == 0.0 && amount.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*amount as i64)
    } else {
        serializer.serialize_f64(*amount)
    }
}

// ---------------------------------------------------------------------------
// PaymentRedirect: Hosted payment page returned by order creation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRedirect {
    pub url: String,
}

impl PaymentRedirect {
    /// Extract the redirect from an order-creation response.
    ///
    /// Accepts `url` or `paymentUrl`; any other shape yields `None`.
    pub fn from_response(body: &serde_json::Value) -> Option<Self> {
        ["url", "paymentUrl"]
            .iter()
            .filter_map(|key| body.get(*key).and_then(|v| v.as_str()))
            .find(|url| !url.trim().is_empty())
            .map(|url| PaymentRedirect {
                url: url.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Cancel / refund
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelItem {
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    pub payment_id: String,
    pub amount: f64,
    pub email: String,
    #[serde(default)]
    pub items: Vec<CancelItem>,
}

/// Refund outcome; the backend answers in either field casing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CancelResponse {
    #[serde(default, alias = "Success")]
    pub success: bool,
    #[serde(default, alias = "Status")]
    pub status: Option<String>,
    #[serde(default, alias = "Message")]
    pub message: Option<String>,
}
