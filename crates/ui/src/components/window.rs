use crate::components::{Component, Header, InputBox, MessageList};
use crate::config::WidgetConfig;
use crate::dom::{Element, ids};

/// Header, message list and input, stacked.
pub struct ChatWindow<'a> {
    config: &'a WidgetConfig,
}

impl<'a> ChatWindow<'a> {
    pub fn new(config: &'a WidgetConfig) -> Self {
        Self { config }
    }
}

impl Component for ChatWindow<'_> {
    fn render(&self) -> Element {
        Element::new("div")
            .id(ids::WINDOW)
            .class("chatbot-window")
            .child(Header::new(self.config).render())
            .child(MessageList.render())
            .child(InputBox::new(self.config).render())
    }
}
