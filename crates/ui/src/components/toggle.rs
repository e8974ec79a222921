use crate::components::{CHAT_ICON, Component};
use crate::config::{Layout, WidgetConfig};
use crate::dom::{Element, ids};

/// Floating launcher button of the bubble layout.
pub struct ChatToggle<'a> {
    config: &'a WidgetConfig,
}

impl<'a> ChatToggle<'a> {
    pub fn new(config: &'a WidgetConfig) -> Self {
        Self { config }
    }

    pub fn is_visible(&self) -> bool {
        self.config.layout == Layout::Bubble && self.config.show_toggle
    }
}

impl Component for ChatToggle<'_> {
    fn render(&self) -> Element {
        Element::new("button")
            .id(ids::TOGGLE)
            .class("chatbot-toggle")
            .attr("aria-label", "Open chat")
            .markup(CHAT_ICON)
    }
}
