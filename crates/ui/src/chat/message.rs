use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::config::InitialMessage;

/// Chat speaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

/// Message body: plain text, or pre-rendered markup with its trust flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    Text(String),
    /// Rendered verbatim only when `is_html` is set; otherwise escaped like text.
    Markup { html: String, is_html: bool },
}

impl MessageContent {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Markup { html, .. } => html.is_empty(),
        }
    }

    /// Raw body regardless of variant.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Markup { html, .. } => html,
        }
    }
}

/// One entry of the append-only message log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    pub content: MessageContent,
    pub timestamp: DateTime<Local>,
}

impl Message {
    /// Creates a message stamped with the current local time.
    pub fn new(sender: Sender, content: MessageContent) -> Self {
        Self {
            sender,
            content,
            timestamp: Local::now(),
        }
    }

    pub fn text(sender: Sender, text: impl Into<String>) -> Self {
        Self::new(sender, MessageContent::Text(text.into()))
    }

    pub fn markup(sender: Sender, html: impl Into<String>, is_html: bool) -> Self {
        Self::new(
            sender,
            MessageContent::Markup {
                html: html.into(),
                is_html,
            },
        )
    }

    /// Converts a configured initial message. Markup wins when both bodies are set;
    /// entries with neither yield `None`.
    pub fn from_initial(initial: &InitialMessage) -> Option<Self> {
        let content = match (&initial.html, &initial.text) {
            (Some(html), _) => MessageContent::Markup {
                html: html.clone(),
                is_html: initial.is_html,
            },
            (None, Some(text)) => MessageContent::Text(text.clone()),
            (None, None) => return None,
        };

        Some(Self {
            sender: initial.sender,
            content,
            timestamp: initial.timestamp.unwrap_or_else(Local::now),
        })
    }

    /// `HH:MM` in local time.
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn initial_message_prefers_markup_over_text() {
        let mut initial = InitialMessage::html(Sender::Bot, "<em>hi</em>", true);
        initial.text = Some("hi".to_string());

        let message = Message::from_initial(&initial).unwrap();

        assert_eq!(
            message.content,
            MessageContent::Markup {
                html: "<em>hi</em>".to_string(),
                is_html: true,
            }
        );
    }

    #[test]
    fn initial_message_without_body_is_dropped() {
        let initial = InitialMessage {
            text: None,
            html: None,
            is_html: false,
            sender: Sender::User,
            timestamp: None,
        };

        assert_eq!(Message::from_initial(&initial), None);
    }

    #[test]
    fn time_label_is_hours_and_minutes() {
        let mut message = Message::text(Sender::User, "hello");
        message.timestamp = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 42).unwrap();

        assert_eq!(message.time_label(), "07:05");
    }
}
