use crate::components::{ChatToggle, ChatWindow, Component};
use crate::config::{Layout, WidgetConfig};
use crate::dom::{Element, ids};

/// Root container holding every layout-specific piece.
pub struct WidgetShell<'a> {
    config: &'a WidgetConfig,
}

impl<'a> WidgetShell<'a> {
    pub fn new(config: &'a WidgetConfig) -> Self {
        Self { config }
    }
}

impl Component for WidgetShell<'_> {
    fn render(&self) -> Element {
        let layout = self.config.layout;
        let mut root = Element::new("div")
            .id(ids::ROOT)
            .class("chatbot-widget")
            .class(format!("chatbot-layout-{layout}"));

        if layout == Layout::Modal {
            root = root.child(
                Element::new("div")
                    .id(ids::MODAL_BACKDROP)
                    .class("chatbot-modal-backdrop"),
            );
        }

        let toggle = ChatToggle::new(self.config);
        if toggle.is_visible() {
            root = root.child(toggle.render());
        }

        root.child(ChatWindow::new(self.config).render())
    }
}
