use std::sync::Arc;

use chatdock_ui::chat::{HandlerError, HandlerFuture};
use chatdock_ui::{HandlerReply, MessageHandler, markdown_to_html};

use crate::chat::{ChatApi, QueryReply, SendOptions};

pub const UNRECOGNIZED_REPLY: &str =
    "I received your message but got an unexpected response format.";

/// Routes widget send cycles to the chat backend.
#[derive(Clone)]
pub struct ChatApiHandler {
    api: Arc<ChatApi>,
    options: SendOptions,
}

impl ChatApiHandler {
    pub fn new(api: Arc<ChatApi>) -> Self {
        Self {
            api,
            options: SendOptions::default(),
        }
    }

    /// Options attached to every send.
    pub fn with_options(mut self, options: SendOptions) -> Self {
        self.options = options;
        self
    }

    pub fn api(&self) -> &Arc<ChatApi> {
        &self.api
    }
}

impl From<QueryReply> for HandlerReply {
    fn from(reply: QueryReply) -> Self {
        match reply {
            QueryReply::Markdown(content) => HandlerReply::markup(markdown_to_html(&content), true),
            QueryReply::Plain(text) => HandlerReply::markup(text, false),
            QueryReply::Unrecognized(_) => HandlerReply::markup(UNRECOGNIZED_REPLY, false),
        }
    }
}

impl MessageHandler for ChatApiHandler {
    fn handle(&self, text: String) -> HandlerFuture {
        let api = Arc::clone(&self.api);
        let options = self.options.clone();
        Box::pin(async move {
            match api.send_message(&text, options).await {
                Ok(reply) => Ok(reply.into()),
                Err(error) => {
                    tracing::debug!(
                        session_id = %api.session_id(),
                        error = %error,
                        "chat API send failed"
                    );
                    Err(HandlerError::failed("chat-api-send", error.to_string()))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn replies_map_onto_handler_markup() {
        assert_eq!(
            HandlerReply::from(QueryReply::Markdown("*x*".to_string())),
            HandlerReply::markup("<p><em>x</em></p>\n", true)
        );
        assert_eq!(
            HandlerReply::from(QueryReply::Plain("<b>".to_string())),
            HandlerReply::markup("<b>", false)
        );
        assert_eq!(
            HandlerReply::from(QueryReply::Unrecognized(json!(null))),
            HandlerReply::markup(UNRECOGNIZED_REPLY, false)
        );
    }
}
