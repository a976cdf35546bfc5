//! Feedback and team-application forms delivered to a Telegram chat.
//!
//! Messages use Telegram's HTML parse mode, so every user-supplied field is
//! escaped before it is interpolated.

use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::TelegramConfig;
use crate::context::ShopContext;
use crate::error::{Result, ShopError};
use crate::format::escape_html;
use crate::models::{FeedbackReport, SendMessage, TeamApplication};

pub const MISSING_FIELDS_MESSAGE: &str = "Пожалуйста, заполните все поля";
pub const SENT_MESSAGE: &str = "✓ Ваше обращение успешно отправлено!";
pub const SEND_FAILED_MESSAGE: &str = "Ошибка при отправке. Попробуйте позже.";

fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

fn require_all(fields: &[&str]) -> Result<()> {
    if fields.iter().any(|f| f.is_empty()) {
        return Err(ShopError::Validation(MISSING_FIELDS_MESSAGE.into()));
    }
    Ok(())
}

impl FeedbackReport {
    /// Copy with every field trimmed.
    pub fn trimmed(&self) -> Self {
        Self {
            player_nick: trimmed(&self.player_nick),
            reason: trimmed(&self.reason),
            contact_method: trimmed(&self.contact_method),
            contact_info: trimmed(&self.contact_info),
            message: trimmed(&self.message),
        }
    }

    /// Every field is required.
    pub fn validate(&self) -> Result<()> {
        require_all(&[
            self.player_nick.as_str(),
            self.reason.as_str(),
            self.contact_method.as_str(),
            self.contact_info.as_str(),
            self.message.as_str(),
        ])
    }

    pub fn to_html(&self) -> String {
        format!(
            "🎮 <b>Новое обращение с сайта ElysianLink</b>\n\n\
             👤 <b>Игровой ник:</b> {}\n\
             📋 <b>Причина:</b> {}\n\
             💬 <b>Связь:</b> {} - {}\n\n\
             📝 <b>Сообщение:</b>\n{}",
            escape_html(&self.player_nick),
            escape_html(&self.reason),
            escape_html(&self.contact_method),
            escape_html(&self.contact_info),
            escape_html(&self.message),
        )
    }
}

impl TeamApplication {
    pub fn trimmed(&self) -> Self {
        Self {
            player_nick: trimmed(&self.player_nick),
            age: trimmed(&self.age),
            position: trimmed(&self.position),
            experience: trimmed(&self.experience),
            contact: trimmed(&self.contact),
            about: trimmed(&self.about),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_all(&[
            self.player_nick.as_str(),
            self.age.as_str(),
            self.position.as_str(),
            self.experience.as_str(),
            self.contact.as_str(),
            self.about.as_str(),
        ])
    }

    pub fn to_html(&self) -> String {
        format!(
            "🛡 <b>Новая заявка в команду ElysianLink</b>\n\n\
             👤 <b>Игровой ник:</b> {}\n\
             🎂 <b>Возраст:</b> {}\n\
             🧩 <b>Должность:</b> {}\n\
             📚 <b>Опыт:</b> {}\n\
             💬 <b>Связь:</b> {}\n\n\
             📝 <b>О себе:</b>\n{}",
            escape_html(&self.player_nick),
            escape_html(&self.age),
            escape_html(&self.position),
            escape_html(&self.experience),
            escape_html(&self.contact),
            escape_html(&self.about),
        )
    }
}

// ---------------------------------------------------------------------------
// NotifyQuery
// ---------------------------------------------------------------------------

/// Webhook interface bound to a [`ShopContext`].
pub struct NotifyQuery<'a> {
    ctx: &'a ShopContext,
}

impl<'a> NotifyQuery<'a> {
    pub fn new(ctx: &'a ShopContext) -> Self {
        Self { ctx }
    }

    fn telegram(&self) -> Result<&TelegramConfig> {
        self.ctx.config.telegram.as_ref().ok_or_else(|| {
            ShopError::InvalidArgument("Telegram bot token and chat id are not configured".into())
        })
    }

    /// Validate and forward a feedback report.
    pub fn send_feedback(&self, report: &FeedbackReport) -> Result<Value> {
        let report = report.trimmed();
        report.validate()?;
        self.send_html(report.to_html())
    }

    /// Validate and forward a team application.
    pub fn send_application(&self, application: &TeamApplication) -> Result<Value> {
        let application = application.trimmed();
        application.validate()?;
        self.send_html(application.to_html())
    }

    /// Post an already-escaped HTML message to the configured chat.
    ///
    /// A non-2xx answer surfaces Telegram's `description` when it has one.
    /// A 2xx answer whose body is not JSON yields `Value::Null`.
    pub fn send_html(&self, text: String) -> Result<Value> {
        let telegram = self.telegram()?;
        let body = SendMessage::html(telegram.chat_id.clone(), text);

        let resp = self
            .ctx
            .http
            .post(telegram.send_message_url())
            .json(&body)
            .send()?;
        let status = resp.status();
        let raw = resp.text()?;

        if !status.is_success() {
            let detail = serde_json::from_str::<Value>(&raw)
                .ok()
                .and_then(|v| v.get("description").and_then(|d| d.as_str()).map(str::to_string))
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            error!(status = status.as_u16(), detail = %detail, "telegram rejected message");
            return Err(ShopError::Webhook(format!("Telegram API error: {detail}")));
        }

        info!(chat_id = %telegram.chat_id, "message delivered to telegram");
        // delivered either way; an unreadable body only loses the echo
        Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
            debug!(error = %e, "telegram reply is not JSON");
            Value::Null
        }))
    }
}
