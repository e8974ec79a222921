//! Browser bindings: mounts the chat widget into a shadow root and exposes it to
//! JavaScript as `ChatbotWidget`.

mod appearance;
mod handler;
mod surface;

use std::cell::RefCell;
use std::rc::Rc;

use chatdock_ui::chat::SendCycle;
use chatdock_ui::dom::ids;
use chatdock_ui::{ChatWidget, UiEvent, WidgetHooks};
use js_sys::{Function, Object, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, KeyboardEvent};

pub use appearance::MediaQueryAppearance;
pub use handler::JsMessageHandler;
pub use surface::{BrowserHost, ShadowSurface};

type SharedWidget = Rc<RefCell<Option<ChatWidget<ShadowSurface>>>>;
type EventClosure = Closure<dyn FnMut(Event)>;

const HOOK_KEYS: [&str; 3] = ["onMessage", "onOpen", "onClose"];

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("chatdock module initialized");
}

#[wasm_bindgen(js_name = markdownToHtml)]
pub fn markdown_to_html(markdown: &str) -> String {
    chatdock_ui::markdown_to_html(markdown)
}

#[wasm_bindgen(js_name = formatText)]
pub fn format_text(text: &str) -> String {
    chatdock_ui::format_text(text)
}

#[wasm_bindgen(js_name = sanitizeHtml)]
pub fn sanitize_html(text: &str) -> String {
    chatdock_ui::sanitize_html(text)
}

/// Mounted widget handle. Calls made while the widget is busy or after `destroy`
/// are ignored.
#[wasm_bindgen]
pub struct ChatbotWidget {
    state: SharedWidget,
    listeners: Vec<(&'static str, EventClosure)>,
}

#[wasm_bindgen]
impl ChatbotWidget {
    /// Mounts a widget from a plain configuration object. `target` may be a
    /// selector or an element; `onMessage`, `onOpen` and `onClose` are callbacks.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<ChatbotWidget, JsError> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsError::new("no document available"))?;

        let element = if config.is_object() {
            Reflect::get(&config, &JsValue::from_str("target"))
                .ok()
                .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
        } else {
            None
        };
        let hooks = hooks_from(&config);
        let partial = plain_config(&config, element.is_some())?;

        let host = BrowserHost::new(document, element);
        let widget = ChatWidget::mount_partial(partial, hooks, &host)?;
        let root = widget.surface().root().clone();

        let state: SharedWidget = Rc::new(RefCell::new(Some(widget)));
        let listeners = vec![
            ("click", click_listener(&state)),
            ("keydown", keydown_listener(&state)),
        ];
        for (kind, listener) in &listeners {
            root.add_event_listener_with_callback(kind, listener.as_ref().unchecked_ref())
                .map_err(|_| JsError::new("failed to attach widget listeners"))?;
        }

        Ok(Self { state, listeners })
    }

    pub fn open(&self) {
        with_widget(&self.state, |widget| widget.open());
    }

    pub fn close(&self) {
        with_widget(&self.state, |widget| widget.close());
    }

    pub fn toggle(&self) {
        with_widget(&self.state, |widget| widget.toggle());
    }

    #[wasm_bindgen(js_name = isOpen)]
    pub fn is_open(&self) -> bool {
        self.state
            .try_borrow()
            .ok()
            .and_then(|guard| guard.as_ref().map(ChatWidget::is_open))
            .unwrap_or(false)
    }

    /// Resolved theme variables.
    #[wasm_bindgen(getter)]
    pub fn theme(&self) -> Result<JsValue, JsError> {
        let theme = self
            .state
            .try_borrow()
            .ok()
            .and_then(|guard| guard.as_ref().map(ChatWidget::theme));
        match theme {
            Some(theme) => Ok(serde_wasm_bindgen::to_value(&*theme)?),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Sends the current input. The promise resolves once the reply is shown.
    #[wasm_bindgen(js_name = sendMessage)]
    pub fn send_message(&self) -> js_sys::Promise {
        let state = Rc::clone(&self.state);
        wasm_bindgen_futures::future_to_promise(async move {
            let cycle = with_widget(&state, |widget| widget.submit()).flatten();
            if let Some(cycle) = cycle {
                settle(&state, cycle).await;
            }
            Ok(JsValue::UNDEFINED)
        })
    }

    pub fn destroy(&mut self) {
        let Ok(mut guard) = self.state.try_borrow_mut() else {
            tracing::warn!("destroy called while the widget is busy");
            return;
        };
        let Some(widget) = guard.take() else {
            return;
        };

        let root = widget.surface().root().clone();
        for (kind, listener) in self.listeners.drain(..) {
            if let Err(error) =
                root.remove_event_listener_with_callback(kind, listener.as_ref().unchecked_ref())
            {
                tracing::warn!(kind, error = ?error, "failed to detach widget listener");
            }
        }
        widget.destroy();
        root.host().remove();
    }
}

fn hooks_from(config: &JsValue) -> WidgetHooks {
    let hook = |key: &str| {
        Reflect::get(config, &JsValue::from_str(key))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok())
    };

    let mut hooks = WidgetHooks::new();
    if let Some(on_message) = hook("onMessage") {
        hooks = hooks.on_message(JsMessageHandler::new(on_message));
    }
    if let Some(on_open) = hook("onOpen") {
        hooks = hooks.on_open(move || call_hook("onOpen", &on_open));
    }
    if let Some(on_close) = hook("onClose") {
        hooks = hooks.on_close(move || call_hook("onClose", &on_close));
    }
    hooks
}

fn call_hook(name: &'static str, hook: &Function) {
    if let Err(error) = hook.call0(&JsValue::NULL) {
        tracing::warn!(hook = name, error = ?error, "widget hook threw");
    }
}

/// Callbacks and element targets stripped; dates serialize as ISO strings.
fn plain_config(config: &JsValue, drop_target: bool) -> Result<serde_json::Value, JsError> {
    if !config.is_object() {
        return Ok(serde_json::Value::Null);
    }

    let copy = Object::assign(&Object::new(), config.unchecked_ref());
    let stripped = HOOK_KEYS
        .iter()
        .copied()
        .chain(drop_target.then_some("target"));
    for key in stripped {
        Reflect::delete_property(&copy, &JsValue::from_str(key))
            .map_err(|_| JsError::new("failed to read widget config"))?;
    }

    let json = js_sys::JSON::stringify(&copy)
        .map_err(|_| JsError::new("widget config is not serializable"))?;
    Ok(serde_json::from_str(&String::from(json))?)
}

fn with_widget<T>(
    state: &SharedWidget,
    apply: impl FnOnce(&mut ChatWidget<ShadowSurface>) -> T,
) -> Option<T> {
    match state.try_borrow_mut() {
        Ok(mut guard) => guard.as_mut().map(apply),
        Err(_) => {
            tracing::warn!("widget is busy; call ignored");
            None
        }
    }
}

async fn settle(state: &SharedWidget, cycle: SendCycle) {
    let settled = cycle.settle().await;
    if with_widget(state, |widget| widget.finish(settled)).is_none() {
        tracing::debug!("reply arrived after the widget was destroyed");
    }
}

fn dispatch(state: &SharedWidget, event: UiEvent) {
    if let Some(cycle) = with_widget(state, |widget| widget.dispatch(event)).flatten() {
        let state = Rc::clone(state);
        spawn_local(async move { settle(&state, cycle).await });
    }
}

fn click_listener(state: &SharedWidget) -> EventClosure {
    let state = Rc::clone(state);
    Closure::new(move |event: Event| {
        let id = event
            .target()
            .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
            .and_then(|element| element.closest("[id]").ok().flatten())
            .map(|element| element.id());
        if let Some(event) = id.as_deref().and_then(UiEvent::from_click) {
            dispatch(&state, event);
        }
    })
}

fn keydown_listener(state: &SharedWidget) -> EventClosure {
    let state = Rc::clone(state);
    Closure::new(move |event: Event| {
        let from_input = event
            .target()
            .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
            .is_some_and(|element| element.id() == ids::INPUT);
        let Some(keyboard) = event.dyn_ref::<KeyboardEvent>().filter(|_| from_input) else {
            return;
        };

        let event = UiEvent::InputKeyPressed {
            key: keyboard.key(),
            shift: keyboard.shift_key(),
        };
        if event.submits() {
            keyboard.prevent_default();
        }
        dispatch(&state, event);
    })
}
