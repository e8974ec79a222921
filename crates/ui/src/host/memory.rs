use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use crate::config::MountTarget;
use crate::dom::{Element, Node};
use crate::host::{Host, Surface};
use crate::theme::{ManualAppearance, SystemAppearance};

const SHADOW_ROOT: &str = "shadow-root";
const VALUE: &str = "value";

/// In-memory page: `body` plus any selectors registered with [`VirtualHost::with_element`].
#[derive(Clone, Default)]
pub struct VirtualHost {
    selectors: BTreeSet<String>,
    appearance: ManualAppearance,
}

impl VirtualHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element(mut self, selector: impl Into<String>) -> Self {
        self.selectors.insert(selector.into());
        self
    }

    pub fn with_appearance(mut self, appearance: ManualAppearance) -> Self {
        self.appearance = appearance;
        self
    }

    /// Handle for driving system appearance changes.
    pub fn appearance_source(&self) -> &ManualAppearance {
        &self.appearance
    }
}

impl Host for VirtualHost {
    type Surface = VirtualSurface;

    fn attach(&self, target: &MountTarget) -> Option<VirtualSurface> {
        match target {
            MountTarget::Body => Some(VirtualSurface::default()),
            MountTarget::Selector(selector) if self.selectors.contains(selector) => {
                Some(VirtualSurface::default())
            }
            MountTarget::Selector(_) => None,
        }
    }

    fn appearance(&self) -> &dyn SystemAppearance {
        &self.appearance
    }
}

#[derive(Debug)]
struct VirtualTree {
    root: Element,
    scrolls: HashMap<String, usize>,
}

impl Default for VirtualTree {
    fn default() -> Self {
        Self {
            root: Element::new(SHADOW_ROOT),
            scrolls: HashMap::new(),
        }
    }
}

/// Shadow-root stand-in backed by a [`Element`] tree.
#[derive(Debug, Clone, Default)]
pub struct VirtualSurface {
    tree: Rc<RefCell<VirtualTree>>,
}

impl VirtualSurface {
    /// Snapshot of the element with `id`.
    pub fn find(&self, id: &str) -> Option<Element> {
        self.tree.borrow().root.find_by_id(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tree.borrow().root.find_by_id(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.borrow().root.children.is_empty()
    }

    /// How often `id` was scrolled to its bottom.
    pub fn scroll_count(&self, id: &str) -> usize {
        self.tree.borrow().scrolls.get(id).copied().unwrap_or_default()
    }

    /// Serialized contents of the subtree.
    pub fn to_html(&self) -> String {
        self.tree.borrow().root.inner_html()
    }

    fn with_element(&self, id: &str, update: impl FnOnce(&mut Element)) {
        let mut tree = self.tree.borrow_mut();
        match tree.root.find_by_id_mut(id) {
            Some(element) => update(element),
            None => tracing::trace!(id, "surface update on missing element"),
        }
    }
}

impl Surface for VirtualSurface {
    fn render(&self, nodes: Vec<Element>) {
        let mut tree = self.tree.borrow_mut();
        tree.root.children = nodes.into_iter().map(Node::Element).collect();
        tree.scrolls.clear();
    }

    fn set_stylesheet(&self, id: &str, css: &str) {
        let mut tree = self.tree.borrow_mut();
        match tree.root.find_by_id_mut(id) {
            Some(style) => style.children = vec![Node::Markup(css.to_string())],
            None => tree
                .root
                .children
                .push(Node::Element(Element::new("style").id(id).markup(css))),
        }
    }

    fn set_display(&self, id: &str, display: &str) {
        self.with_element(id, |element| element.set_style("display", display));
    }

    fn set_class(&self, id: &str, class: &str, enabled: bool) {
        self.with_element(id, |element| {
            if enabled {
                element.add_class(class);
            } else {
                element.remove_class(class);
            }
        });
    }

    fn append(&self, parent_id: &str, element: Element) {
        self.with_element(parent_id, |parent| {
            parent.children.push(Node::Element(element));
        });
    }

    fn remove(&self, id: &str) {
        self.tree.borrow_mut().root.remove_by_id(id);
    }

    fn scroll_to_bottom(&self, id: &str) {
        *self
            .tree
            .borrow_mut()
            .scrolls
            .entry(id.to_string())
            .or_default() += 1;
    }

    fn input_value(&self, id: &str) -> String {
        self.tree
            .borrow()
            .root
            .find_by_id(id)
            .and_then(|input| input.attributes.get(VALUE).cloned())
            .unwrap_or_default()
    }

    fn set_input_value(&self, id: &str, value: &str) {
        self.with_element(id, |input| {
            input.attributes.insert(VALUE.to_string(), value.to_string());
        });
    }

    fn clear(&self) {
        *self.tree.borrow_mut() = VirtualTree::default();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn body_always_resolves_and_unknown_selectors_do_not() {
        let host = VirtualHost::new().with_element("#chat");

        assert!(host.attach(&MountTarget::Body).is_some());
        assert!(host.attach(&MountTarget::Selector("#chat".to_string())).is_some());
        assert!(host.attach(&MountTarget::Selector("#missing".to_string())).is_none());
    }

    #[test]
    fn stylesheet_is_replaced_in_place() {
        let surface = VirtualSurface::default();
        surface.render(vec![Element::new("style").id("theme").markup("a {}")]);

        surface.set_stylesheet("theme", "b {}");
        surface.set_stylesheet("extra", "c {}");

        assert_eq!(
            surface.to_html(),
            r#"<style id="theme">b {}</style><style id="extra">c {}</style>"#
        );
    }

    #[test]
    fn input_value_round_trips_through_the_element() {
        let surface = VirtualSurface::default();
        surface.render(vec![Element::new("input").id("field")]);

        surface.set_input_value("field", "hello");
        assert_eq!(surface.input_value("field"), "hello");
        assert_eq!(surface.input_value("missing"), "");
    }

    #[test]
    fn clones_share_the_same_tree() {
        let surface = VirtualSurface::default();
        let other = surface.clone();
        surface.render(vec![Element::new("div").id("root")]);

        assert!(other.contains("root"));
        other.clear();
        assert!(surface.is_empty());
    }
}
