use crate::components::{Component, MINIMIZE_ICON};
use crate::config::{Layout, WidgetConfig};
use crate::dom::{Element, ids};

pub struct Header<'a> {
    config: &'a WidgetConfig,
}

impl<'a> Header<'a> {
    pub fn new(config: &'a WidgetConfig) -> Self {
        Self { config }
    }

    fn minimize_button(&self) -> Option<Element> {
        (self.config.layout != Layout::Inline).then(|| {
            Element::new("button")
                .id(ids::MINIMIZE)
                .class("chatbot-btn-minimize")
                .attr("aria-label", "Minimize chat")
                .markup(MINIMIZE_ICON)
        })
    }
}

impl Component for Header<'_> {
    fn render(&self) -> Element {
        let info = Element::new("div")
            .class("chatbot-header-info")
            .child(
                Element::new("div").class("chatbot-avatar").child(
                    Element::new("img")
                        .attr("src", &self.config.avatar.bot)
                        .attr("alt", "Bot"),
                ),
            )
            .child(
                Element::new("div")
                    .class("chatbot-header-text")
                    .child(Element::new("div").class("chatbot-name").text("Assistant"))
                    .child(Element::new("div").class("chatbot-status").text("Online")),
            );

        Element::new("div")
            .class("chatbot-header")
            .child(info)
            .child(
                Element::new("div")
                    .class("chatbot-header-actions")
                    .children(self.minimize_button()),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_header_has_no_minimize_button() {
        let config = WidgetConfig::default();
        assert!(Header::new(&config).render().find_by_id(ids::MINIMIZE).is_none());

        let config = WidgetConfig {
            layout: Layout::Embedded,
            ..WidgetConfig::default()
        };
        assert!(Header::new(&config).render().find_by_id(ids::MINIMIZE).is_some());
    }

    #[test]
    fn header_shows_bot_avatar() {
        let mut config = WidgetConfig::default();
        config.avatar.bot = "robot.png".to_string();

        let html = Header::new(&config).render().to_html();
        assert!(html.contains(r#"<img src="robot.png" alt="Bot">"#));
        assert!(html.contains("Assistant"));
    }
}
