use crate::components::{Component, SEND_ICON};
use crate::config::WidgetConfig;
use crate::dom::{Element, ids};

pub struct InputBox<'a> {
    config: &'a WidgetConfig,
}

impl<'a> InputBox<'a> {
    pub fn new(config: &'a WidgetConfig) -> Self {
        Self { config }
    }
}

impl Component for InputBox<'_> {
    fn render(&self) -> Element {
        let input = Element::new("input")
            .id(ids::INPUT)
            .class("chatbot-input")
            .attr("type", "text")
            .attr("placeholder", &self.config.placeholder);
        let send = Element::new("button")
            .id(ids::SEND)
            .class("chatbot-btn-send")
            .attr("aria-label", "Send message")
            .markup(SEND_ICON);

        Element::new("div").class("chatbot-input-container").child(
            Element::new("div")
                .class("chatbot-input-wrapper")
                .child(input)
                .child(send),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_attribute_escaped() {
        let config = WidgetConfig {
            placeholder: r#"Ask "anything""#.to_string(),
            ..WidgetConfig::default()
        };

        let input = InputBox::new(&config).render();
        let field = input.find_by_id(ids::INPUT).unwrap();

        assert_eq!(
            field.attributes.get("placeholder").map(String::as_str),
            Some(r#"Ask "anything""#)
        );
        assert!(input.to_html().contains("Ask &quot;anything&quot;"));
    }
}
