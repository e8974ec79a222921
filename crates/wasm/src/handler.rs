use chatdock_ui::chat::{HandlerError, HandlerFuture};
use chatdock_ui::{HandlerReply, MessageHandler};
use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

/// `onMessage` callback supplied from JavaScript. It may return a reply directly
/// or a promise of one.
pub struct JsMessageHandler {
    callback: Function,
}

impl JsMessageHandler {
    pub fn new(callback: Function) -> Self {
        Self { callback }
    }
}

fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|error| String::from(error.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Strings become text; objects with an `html` field become markup; anything else
/// falsy is an empty reply.
fn into_reply(value: JsValue) -> HandlerReply {
    if let Some(text) = value.as_string() {
        return HandlerReply::text(text);
    }

    if value.is_object() {
        let html = Reflect::get(&value, &JsValue::from_str("html"))
            .ok()
            .and_then(|html| html.as_string())
            .filter(|html| !html.is_empty());
        if let Some(html) = html {
            let is_html = Reflect::get(&value, &JsValue::from_str("isHtml"))
                .ok()
                .is_some_and(|flag| flag.is_truthy());
            return HandlerReply::markup(html, is_html);
        }
    }

    if value.is_truthy() {
        HandlerReply::text(describe(&value))
    } else {
        HandlerReply::text("")
    }
}

impl MessageHandler for JsMessageHandler {
    fn handle(&self, text: String) -> HandlerFuture {
        let returned = self
            .callback
            .call1(&JsValue::NULL, &JsValue::from_str(&text));
        Box::pin(async move {
            let value = returned
                .map_err(|error| HandlerError::failed("call-on-message", describe(&error)))?;
            let value = match value.dyn_into::<Promise>() {
                Ok(promise) => JsFuture::from(promise)
                    .await
                    .map_err(|error| HandlerError::failed("await-on-message", describe(&error)))?,
                Err(value) => value,
            };
            Ok(into_reply(value))
        })
    }
}
