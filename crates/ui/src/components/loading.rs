use crate::config::Avatars;
use crate::dom::Element;

/// Typing animation shown while one send cycle awaits its reply.
pub struct LoadingIndicator<'a> {
    avatars: &'a Avatars,
}

impl<'a> LoadingIndicator<'a> {
    pub fn new(avatars: &'a Avatars) -> Self {
        Self { avatars }
    }

    /// Each in-flight cycle owns its own indicator, addressed by `id`.
    pub fn render(&self, id: &str) -> Element {
        let dots = Element::new("div")
            .class("chatbot-typing-indicator")
            .children((0..3).map(|_| Element::new("span")));

        Element::new("div")
            .id(id)
            .class("chatbot-message")
            .class("bot")
            .class("loading-indicator")
            .child(
                Element::new("div").class("chatbot-message-avatar").child(
                    Element::new("img")
                        .attr("src", &self.avatars.bot)
                        .attr("alt", "bot"),
                ),
            )
            .child(
                Element::new("div")
                    .class("chatbot-message-content")
                    .child(Element::new("div").class("chatbot-message-bubble").child(dots)),
            )
    }
}
