//! Host-independent markup fragments.
//!
//! Components build [`Element`] trees; hosts either serialize them with
//! [`Element::to_html`] or mirror them into a live document.

use indexmap::IndexMap;

/// Element ids shared by components, the controller and hosts.
pub mod ids {
    pub const ROOT: &str = "chatbot-root";
    pub const TOGGLE: &str = "chatbot-toggle";
    pub const WINDOW: &str = "chatbot-window";
    pub const MINIMIZE: &str = "chatbot-minimize";
    pub const MESSAGES: &str = "chatbot-messages";
    pub const INPUT: &str = "chatbot-input";
    pub const SEND: &str = "chatbot-send";
    pub const MODAL_BACKDROP: &str = "chatbot-modal-backdrop";
    pub const THEME_STYLE: &str = "chatbot-theme";
    pub const COMPONENT_STYLE: &str = "chatbot-styles";
    pub const CUSTOM_STYLE: &str = "chatbot-custom";

    const LOADING_PREFIX: &str = "chatbot-loading";

    /// Id of the loading indicator owned by one send cycle.
    pub fn loading(cycle: u64) -> String {
        format!("{LOADING_PREFIX}-{cycle}")
    }

    pub fn is_loading(id: &str) -> bool {
        id.starts_with(LOADING_PREFIX)
    }
}

/// Class that shows animated (bubble/modal) layouts.
pub const OPEN_CLASS: &str = "open";

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Escaped on output.
    Text(String),
    /// Trusted markup, emitted verbatim.
    Markup(String),
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl Node {
    pub fn write_html(&self, out: &mut String) {
        match self {
            Self::Element(element) => element.write_html(out),
            Self::Text(text) => out.push_str(&html_escape::encode_text(text)),
            Self::Markup(markup) => out.push_str(markup),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: IndexMap<String, String>,
    pub classes: Vec<String>,
    pub styles: IndexMap<String, String>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: IndexMap::new(),
            classes: Vec::new(),
            styles: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.add_class(class);
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn style(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_style(name, value);
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children
            .extend(children.into_iter().map(Node::Element));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn markup(mut self, markup: impl Into<String>) -> Self {
        self.children.push(Node::Markup(markup.into()));
        self
    }

    pub fn element_id(&self) -> Option<&str> {
        self.attributes.get("id").map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|existing| existing == class)
    }

    pub fn add_class(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !self.has_class(&class) {
            self.classes.push(class);
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|existing| existing != class);
    }

    pub fn set_style(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.styles.insert(name.into(), value.into());
    }

    pub fn style_value(&self, name: &str) -> Option<&str> {
        self.styles.get(name).map(String::as_str)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.element_id() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| match child {
            Node::Element(element) => element.find_by_id(id),
            Node::Text(_) | Node::Markup(_) => None,
        })
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.element_id() == Some(id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| match child {
            Node::Element(element) => element.find_by_id_mut(id),
            Node::Text(_) | Node::Markup(_) => None,
        })
    }

    /// Detaches the first descendant with `id`.
    pub fn remove_by_id(&mut self, id: &str) -> Option<Element> {
        let position = self.children.iter().position(
            |child| matches!(child, Node::Element(element) if element.element_id() == Some(id)),
        );
        if let Some(position) = position
            && let Node::Element(element) = self.children.remove(position)
        {
            return Some(element);
        }

        self.children.iter_mut().find_map(|child| match child {
            Node::Element(element) => element.remove_by_id(id),
            Node::Text(_) | Node::Markup(_) => None,
        })
    }

    /// Direct element children, skipping text and markup.
    pub fn element_children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            Node::Text(_) | Node::Markup(_) => None,
        })
    }

    /// Concatenated text and markup of the whole subtree, unescaped.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Element(element) => element.collect_text(out),
                Node::Text(text) | Node::Markup(text) => out.push_str(text),
            }
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.write_html(&mut out);
        }
        out
    }

    pub fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attributes {
            push_attribute(out, name, value);
        }
        if !self.classes.is_empty() {
            push_attribute(out, "class", &self.classes.join(" "));
        }
        if !self.styles.is_empty() {
            let declarations = self
                .styles
                .iter()
                .map(|(name, value)| format!("{name}: {value}"))
                .collect::<Vec<_>>()
                .join("; ");
            push_attribute(out, "style", &declarations);
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            return;
        }

        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&html_escape::encode_double_quoted_attribute(value));
    out.push('"');
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn serializes_attributes_classes_and_styles_in_order() {
        let element = Element::new("div")
            .id("box")
            .class("a")
            .class("b")
            .style("display", "none")
            .attr("title", "say \"hi\"")
            .text("1 < 2");

        assert_eq!(
            element.to_html(),
            r#"<div id="box" title="say &quot;hi&quot;" class="a b" style="display: none">1 &lt; 2</div>"#
        );
    }

    #[test]
    fn void_elements_have_no_closing_tag_and_markup_is_verbatim() {
        let element = Element::new("p")
            .child(Element::new("img").attr("src", "a.png"))
            .markup("<b>ok</b>");

        assert_eq!(element.to_html(), r#"<p><img src="a.png"><b>ok</b></p>"#);
    }

    #[test]
    fn finds_and_removes_nested_elements() {
        let mut root = Element::new("div").child(
            Element::new("section")
                .id("outer")
                .child(Element::new("span").id("inner").text("x")),
        );

        root.find_by_id_mut("inner").unwrap().add_class("hit");
        assert!(root.find_by_id("inner").unwrap().has_class("hit"));

        let removed = root.remove_by_id("inner").unwrap();
        assert_eq!(removed.text_content(), "x");
        assert!(root.find_by_id("inner").is_none());
        assert!(root.find_by_id("outer").is_some());
    }

    #[test]
    fn classes_are_deduplicated() {
        let mut element = Element::new("div").class("open");
        element.add_class("open");
        assert_eq!(element.classes, vec!["open".to_string()]);

        element.remove_class("open");
        assert!(!element.has_class("open"));
    }
}
