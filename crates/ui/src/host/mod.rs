//! Seam between the widget controller and the document it renders into.

mod memory;

pub use memory::{VirtualHost, VirtualSurface};

use crate::config::MountTarget;
use crate::dom::Element;
use crate::theme::SystemAppearance;

/// An isolated subtree the widget owns exclusively.
///
/// All operations address elements by id; operations on an unknown id are ignored.
/// Handles are cheap clones of the same subtree.
pub trait Surface: Clone + 'static {
    /// Replaces the whole subtree with `nodes`.
    fn render(&self, nodes: Vec<Element>);
    /// Replaces the text of the style element `id`, creating it when missing.
    fn set_stylesheet(&self, id: &str, css: &str);
    fn set_display(&self, id: &str, display: &str);
    fn set_class(&self, id: &str, class: &str, enabled: bool);
    fn append(&self, parent_id: &str, element: Element);
    fn remove(&self, id: &str);
    fn scroll_to_bottom(&self, id: &str);
    fn input_value(&self, id: &str) -> String;
    fn set_input_value(&self, id: &str, value: &str);
    /// Empties the subtree.
    fn clear(&self);
}

/// Page the widget mounts into.
pub trait Host {
    type Surface: Surface;

    /// Resolves `target` and opens an isolated subtree under it.
    fn attach(&self, target: &MountTarget) -> Option<Self::Surface>;

    fn appearance(&self) -> &dyn SystemAppearance;
}
