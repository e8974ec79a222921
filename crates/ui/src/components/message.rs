use crate::chat::message::{Message, MessageContent};
use crate::components::Component;
use crate::config::Avatars;
use crate::dom::{Element, ids};

/// Scrollable container the controller appends messages into.
pub struct MessageList;

impl Component for MessageList {
    fn render(&self) -> Element {
        Element::new("div").id(ids::MESSAGES).class("chatbot-messages")
    }
}

/// One message row: avatar, bubble and time.
pub struct MessageView<'a> {
    avatars: &'a Avatars,
}

impl<'a> MessageView<'a> {
    pub fn new(avatars: &'a Avatars) -> Self {
        Self { avatars }
    }

    pub fn render(&self, message: &Message) -> Element {
        let sender = message.sender.as_str();
        let bubble = Element::new("div").class("chatbot-message-bubble");
        let bubble = match &message.content {
            MessageContent::Markup {
                html,
                is_html: true,
            } => bubble.class("html-content").markup(html),
            MessageContent::Markup { html: text, .. } | MessageContent::Text(text) => {
                bubble.text(text)
            }
        };

        Element::new("div")
            .class("chatbot-message")
            .class(sender)
            .child(
                Element::new("div").class("chatbot-message-avatar").child(
                    Element::new("img")
                        .attr("src", self.avatars.for_sender(message.sender))
                        .attr("alt", sender),
                ),
            )
            .child(
                Element::new("div")
                    .class("chatbot-message-content")
                    .child(bubble)
                    .child(
                        Element::new("div")
                            .class("chatbot-message-time")
                            .text(message.time_label()),
                    ),
            )
    }
}
