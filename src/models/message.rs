use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// FeedbackReport: "Report" form submitted to the messaging bot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackReport {
    pub player_nick: String,
    pub reason: String,
    pub contact_method: String,
    pub contact_info: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// TeamApplication: "Join the team" form
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamApplication {
    pub player_nick: String,
    pub age: String,
    pub position: String,
    pub experience: String,
    pub contact: String,
    pub about: String,
}

// ---------------------------------------------------------------------------
// SendMessage: Telegram Bot API request body
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendMessage {
    pub chat_id: String,
    pub text: String,
    pub parse_mode: &'static str,
}

impl SendMessage {
    pub fn html(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            text: text.into(),
            parse_mode: "HTML",
        }
    }
}
