use chatdock_ui::MountTarget;
use chatdock_ui::dom::Element;
use chatdock_ui::theme::SystemAppearance;
use chatdock_ui::{Host, Surface};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement, HtmlInputElement, ShadowRoot, ShadowRootInit, ShadowRootMode};

use crate::appearance::MediaQueryAppearance;

/// Open shadow root the widget renders into.
#[derive(Clone)]
pub struct ShadowSurface {
    document: Document,
    root: ShadowRoot,
}

impl ShadowSurface {
    pub fn root(&self) -> &ShadowRoot {
        &self.root
    }

    fn element(&self, id: &str) -> Option<web_sys::Element> {
        self.root.get_element_by_id(id)
    }
}

fn report(operation: &'static str, id: &str, result: Result<(), JsValue>) {
    if let Err(error) = result {
        tracing::warn!(operation, id, error = ?error, "shadow DOM operation failed");
    }
}

impl Surface for ShadowSurface {
    fn render(&self, nodes: Vec<Element>) {
        let markup = nodes.iter().map(Element::to_html).collect::<String>();
        self.root.set_inner_html(&markup);
    }

    fn set_stylesheet(&self, id: &str, css: &str) {
        if let Some(style) = self.element(id) {
            style.set_text_content(Some(css));
            return;
        }

        let created = self.document.create_element("style").and_then(|style| {
            style.set_id(id);
            style.set_text_content(Some(css));
            self.root.append_child(&style).map(|_| ())
        });
        report("set-stylesheet", id, created);
    }

    fn set_display(&self, id: &str, display: &str) {
        if let Some(element) = self.element(id).and_then(|e| e.dyn_into::<HtmlElement>().ok()) {
            report(
                "set-display",
                id,
                element.style().set_property("display", display),
            );
        }
    }

    fn set_class(&self, id: &str, class: &str, enabled: bool) {
        if let Some(element) = self.element(id) {
            let toggled = element
                .class_list()
                .toggle_with_force(class, enabled)
                .map(|_| ());
            report("set-class", id, toggled);
        }
    }

    fn append(&self, parent_id: &str, element: Element) {
        if let Some(parent) = self.element(parent_id) {
            report(
                "append",
                parent_id,
                parent.insert_adjacent_html("beforeend", &element.to_html()),
            );
        }
    }

    fn remove(&self, id: &str) {
        if let Some(element) = self.element(id) {
            element.remove();
        }
    }

    fn scroll_to_bottom(&self, id: &str) {
        if let Some(element) = self.element(id) {
            element.set_scroll_top(element.scroll_height());
        }
    }

    fn input_value(&self, id: &str) -> String {
        self.element(id)
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .unwrap_or_default()
    }

    fn set_input_value(&self, id: &str, value: &str) {
        if let Some(input) = self.element(id).and_then(|e| e.dyn_into::<HtmlInputElement>().ok()) {
            input.set_value(value);
        }
    }

    fn clear(&self) {
        self.root.set_inner_html("");
    }
}

/// The page the module runs in. A caller-held element, when given, wins over the
/// configured target.
pub struct BrowserHost {
    document: Document,
    element: Option<web_sys::Element>,
    appearance: MediaQueryAppearance,
}

impl BrowserHost {
    pub fn new(document: Document, element: Option<web_sys::Element>) -> Self {
        Self {
            document,
            element,
            appearance: MediaQueryAppearance::new(),
        }
    }

    fn resolve(&self, target: &MountTarget) -> Option<web_sys::Element> {
        if let Some(element) = &self.element {
            return Some(element.clone());
        }
        match target {
            MountTarget::Body => self.document.body().map(Into::into),
            MountTarget::Selector(selector) => {
                self.document.query_selector(selector).ok().flatten()
            }
        }
    }
}

impl Host for BrowserHost {
    type Surface = ShadowSurface;

    fn attach(&self, target: &MountTarget) -> Option<ShadowSurface> {
        let parent = self.resolve(target)?;
        let container = self.document.create_element("div").ok()?;
        parent.append_child(&container).ok()?;

        let root = container
            .attach_shadow(&ShadowRootInit::new(ShadowRootMode::Open))
            .ok()?;
        Some(ShadowSurface {
            document: self.document.clone(),
            root,
        })
    }

    fn appearance(&self) -> &dyn SystemAppearance {
        &self.appearance
    }
}
