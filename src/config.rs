use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, ShopError};

pub const DEFAULT_API_URL: &str = "https://localhost:7089";
pub const PRODUCTS_ENDPOINT: &str = "/shopitems";
pub const PAYMENT_CREATE_ENDPOINT: &str = "/api/payment/create";
pub const PAYMENT_CANCEL_ENDPOINT: &str = "/api/payment/cancel";

pub const REMOTE_SNAPSHOT_URL: &str =
    "https://raw.githubusercontent.com/constadry/ArcWeave/master/data/products.json";
pub const LOCAL_SNAPSHOT_PATH: &str = "data/products.json";

pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Categories hidden from every acquisition path unless overridden.
pub const DEFAULT_EXCLUDED_CATEGORIES: [&str; 2] = ["keys", "Кейсы"];

/// Subfilter key meaning "no subcategory restriction".
pub const ALL_SUBCATEGORIES: &str = "all";
/// Group label for subcategorized products that carry no subcategory.
pub const DEFAULT_SUBCATEGORY_LABEL: &str = "Другое";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A secondary catalog origin consulted after the primary endpoint fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// A static JSON snapshot served over HTTP.
    Remote(String),
    /// A static JSON snapshot on the local filesystem (`.gz` allowed).
    Local(PathBuf),
}

impl SourceSpec {
    pub fn describe(&self) -> String {
        match self {
            SourceSpec::Remote(url) => url.clone(),
            SourceSpec::Local(path) => path.display().to_string(),
        }
    }
}

/// Fallback order used when none is configured: remote snapshot, then local.
pub fn default_fallbacks() -> Vec<SourceSpec> {
    vec![
        SourceSpec::Remote(REMOTE_SNAPSHOT_URL.to_string()),
        SourceSpec::Local(PathBuf::from(LOCAL_SNAPSHOT_PATH)),
    ]
}

/// Messaging-bot credentials for the feedback and team-application forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_base: String,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            api_base: TELEGRAM_API_BASE.to_string(),
        }
    }

    pub fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            self.bot_token
        )
    }
}

/// Resolved settings shared by every query interface.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    pub api_url: String,
    pub fallbacks: Vec<SourceSpec>,
    pub excluded_categories: Vec<String>,
    pub timeout: Duration,
    pub telegram: Option<TelegramConfig>,
    /// Tab selection shows only the chosen category instead of every section.
    pub single_category_view: bool,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            fallbacks: default_fallbacks(),
            excluded_categories: DEFAULT_EXCLUDED_CATEGORIES
                .iter()
                .map(|c| c.to_string())
                .collect(),
            timeout: DEFAULT_TIMEOUT,
            telegram: None,
            single_category_view: false,
        }
    }
}

impl ShopConfig {
    /// Build a config from `SHOP_*` environment variables, defaulting the rest.
    ///
    /// `SHOP_REMOTE_SNAPSHOT` / `SHOP_LOCAL_SNAPSHOT` replace the matching
    /// default fallback; an empty value removes it. Telegram is configured
    /// only when both token and chat id are present.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("SHOP_API_URL").filter(|v| !v.trim().is_empty()) {
            config.api_url = url.trim().to_string();
        }

        let remote = lookup("SHOP_REMOTE_SNAPSHOT").unwrap_or_else(|| REMOTE_SNAPSHOT_URL.to_string());
        let local = lookup("SHOP_LOCAL_SNAPSHOT").unwrap_or_else(|| LOCAL_SNAPSHOT_PATH.to_string());
        config.fallbacks = Vec::new();
        if !remote.trim().is_empty() {
            config.fallbacks.push(SourceSpec::Remote(remote.trim().to_string()));
        }
        if !local.trim().is_empty() {
            config.fallbacks.push(SourceSpec::Local(PathBuf::from(local.trim())));
        }

        if let Some(secs) = lookup("SHOP_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ShopError::InvalidArgument(format!("SHOP_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        if let (Some(token), Some(chat_id)) =
            (lookup("SHOP_TELEGRAM_TOKEN"), lookup("SHOP_TELEGRAM_CHAT_ID"))
        {
            if !token.trim().is_empty() && !chat_id.trim().is_empty() {
                config.telegram = Some(TelegramConfig::new(token.trim(), chat_id.trim()));
            }
        }

        Ok(config)
    }

    /// Join an endpoint path onto the API base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url.trim_end_matches('/'), path)
    }

    pub fn is_excluded(&self, category: &str) -> bool {
        self.excluded_categories.iter().any(|c| c == category)
    }
}
