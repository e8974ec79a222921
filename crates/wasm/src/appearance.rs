use chatdock_ui::theme::{
    Appearance, AppearanceListener, AppearanceSubscription, SystemAppearance,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{MediaQueryList, MediaQueryListEvent};

const PREFERS_DARK: &str = "(prefers-color-scheme: dark)";

/// `prefers-color-scheme` via `matchMedia`. Inert when the query is unavailable.
pub struct MediaQueryAppearance {
    query: Option<MediaQueryList>,
}

impl MediaQueryAppearance {
    pub fn new() -> Self {
        let query = web_sys::window()
            .and_then(|window| window.match_media(PREFERS_DARK).ok().flatten());
        if query.is_none() {
            tracing::debug!("matchMedia unavailable; system appearance is unknown");
        }
        Self { query }
    }
}

impl Default for MediaQueryAppearance {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemAppearance for MediaQueryAppearance {
    fn current(&self) -> Option<Appearance> {
        self.query
            .as_ref()
            .map(|query| Appearance::from_prefers_dark(query.matches()))
    }

    fn subscribe(&self, listener: AppearanceListener) -> AppearanceSubscription {
        let Some(query) = self.query.clone() else {
            return AppearanceSubscription::inert();
        };

        let callback =
            Closure::<dyn FnMut(MediaQueryListEvent)>::new(move |event: MediaQueryListEvent| {
                listener(Appearance::from_prefers_dark(event.matches()));
            });
        if let Err(error) =
            query.add_event_listener_with_callback("change", callback.as_ref().unchecked_ref())
        {
            tracing::warn!(error = ?error, "failed to follow system appearance");
            return AppearanceSubscription::inert();
        }

        AppearanceSubscription::new(move || {
            let callback_ref = callback.as_ref().unchecked_ref();
            if let Err(error) = query.remove_event_listener_with_callback("change", callback_ref) {
                tracing::warn!(error = ?error, "failed to stop following system appearance");
            }
            drop(callback);
        })
    }
}
