use std::future::Future;
use std::pin::Pin;

use snafu::Snafu;

use crate::chat::message::MessageContent;

/// Reply produced by a message handler for one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerReply {
    Text(String),
    Markup { html: String, is_html: bool },
}

impl HandlerReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn markup(html: impl Into<String>, is_html: bool) -> Self {
        Self::Markup {
            html: html.into(),
            is_html,
        }
    }

    /// Message body for the reply; empty replies produce no message.
    pub fn into_content(self) -> Option<MessageContent> {
        let content = match self {
            Self::Text(text) => MessageContent::Text(text),
            Self::Markup { html, is_html } => MessageContent::Markup { html, is_html },
        };
        (!content.is_empty()).then_some(content)
    }
}

impl From<String> for HandlerReply {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for HandlerReply {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum HandlerError {
    #[snafu(display("message handler failed on `{stage}`: {message}"))]
    Failed {
        stage: &'static str,
        message: String,
    },
}

impl HandlerError {
    pub fn failed(stage: &'static str, message: impl Into<String>) -> Self {
        Self::Failed {
            stage,
            message: message.into(),
        }
    }
}

pub type HandlerResult = Result<HandlerReply, HandlerError>;
/// Handlers run on the UI thread, so their futures need not be `Send`.
pub type HandlerFuture = Pin<Box<dyn Future<Output = HandlerResult> + 'static>>;

/// Caller-supplied responder invoked once per send cycle.
pub trait MessageHandler {
    fn handle(&self, text: String) -> HandlerFuture;
}

impl<F, Fut> MessageHandler for F
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = HandlerResult> + 'static,
{
    fn handle(&self, text: String) -> HandlerFuture {
        Box::pin(self(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_replies_carry_no_content() {
        assert_eq!(HandlerReply::text("").into_content(), None);
        assert_eq!(HandlerReply::markup("", true).into_content(), None);
        assert_eq!(
            HandlerReply::from("ok").into_content(),
            Some(MessageContent::Text("ok".to_string()))
        );
    }

    #[tokio::test]
    async fn closures_are_handlers() {
        let handler = |text: String| async move {
            Ok::<_, HandlerError>(HandlerReply::text(text.to_uppercase()))
        };

        let reply = handler.handle("hey".to_string()).await.unwrap();
        assert_eq!(reply, HandlerReply::text("HEY"));
    }
}
