use std::collections::BTreeSet;
use std::rc::Rc;
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde_json::Value;
use snafu::{OptionExt, ResultExt};

use crate::chat::events::UiEvent;
use crate::chat::handler::{HandlerFuture, HandlerResult, MessageHandler};
use crate::chat::message::{Message, Sender};
use crate::components::{Component, LoadingIndicator, MessageView, WidgetShell};
use crate::config::{InitialMessage, Layout, WidgetConfig};
use crate::dom::{OPEN_CLASS, ids};
use crate::error::{ConfigSnafu, TargetNotFoundSnafu, WidgetResult};
use crate::host::{Host, Surface};
use crate::styles::{style_elements, theme_stylesheet};
use crate::theme::{AppearanceSubscription, ThemeMapping, ThemeName};

/// Bot message shown when the handler fails.
pub const FALLBACK_REPLY: &str = "Sorry, something went wrong. Please try again.";

/// Optional caller callbacks.
#[derive(Default)]
pub struct WidgetHooks {
    on_message: Option<Rc<dyn MessageHandler>>,
    on_open: Option<Box<dyn FnMut()>>,
    on_close: Option<Box<dyn FnMut()>>,
}

impl WidgetHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_message(mut self, handler: impl MessageHandler + 'static) -> Self {
        self.on_message = Some(Rc::new(handler));
        self
    }

    pub fn on_open(mut self, hook: impl FnMut() + 'static) -> Self {
        self.on_open = Some(Box::new(hook));
        self
    }

    pub fn on_close(mut self, hook: impl FnMut() + 'static) -> Self {
        self.on_close = Some(Box::new(hook));
        self
    }

    pub fn has_message_handler(&self) -> bool {
        self.on_message.is_some()
    }
}

#[derive(Debug, Default)]
struct WidgetState {
    is_open: bool,
    messages: Vec<Message>,
}

/// Handler call started by [`ChatWidget::submit`].
///
/// Await [`SendCycle::settle`] without holding the widget, then hand the result back
/// through [`ChatWidget::finish`].
#[must_use = "a send cycle does nothing until settled and finished"]
pub struct SendCycle {
    cycle: u64,
    reply: HandlerFuture,
}

impl SendCycle {
    pub fn id(&self) -> u64 {
        self.cycle
    }

    pub async fn settle(self) -> SettledCycle {
        SettledCycle {
            cycle: self.cycle,
            result: self.reply.await,
        }
    }
}

#[derive(Debug)]
pub struct SettledCycle {
    cycle: u64,
    result: HandlerResult,
}

/// Mounted chat widget: open/closed state, message log and the send cycle.
pub struct ChatWidget<S: Surface> {
    config: WidgetConfig,
    hooks: WidgetHooks,
    surface: S,
    theme: Arc<ArcSwap<ThemeMapping>>,
    state: WidgetState,
    next_cycle: u64,
    in_flight: BTreeSet<u64>,
    appearance: AppearanceSubscription,
}

impl<S: Surface> ChatWidget<S> {
    /// Merges `partial` over the defaults and mounts the result.
    pub fn mount_partial<H>(partial: Value, hooks: WidgetHooks, host: &H) -> WidgetResult<Self>
    where
        H: Host<Surface = S> + ?Sized,
    {
        let config = WidgetConfig::merge(partial, host.appearance().current()).context(
            ConfigSnafu {
                stage: "merge-widget-config",
            },
        )?;
        Self::mount(config, hooks, host)
    }

    /// Renders the widget into `config.target` on `host`.
    ///
    /// Fails when the target cannot be resolved. With the `auto` theme the widget
    /// follows the host's appearance until destroyed.
    pub fn mount<H>(mut config: WidgetConfig, hooks: WidgetHooks, host: &H) -> WidgetResult<Self>
    where
        H: Host<Surface = S> + ?Sized,
    {
        let surface = host
            .attach(&config.target)
            .context(TargetNotFoundSnafu {
                stage: "attach-surface",
                target: config.target.to_string(),
            })?;

        let system = host.appearance();
        if config.processed_theme.is_empty() || config.theme == ThemeName::Auto {
            config.refresh_theme(system.current());
        }

        let mut nodes = style_elements(&config);
        nodes.push(WidgetShell::new(&config).render());
        surface.render(nodes);

        let theme = Arc::new(ArcSwap::from_pointee(config.processed_theme.clone()));
        let appearance = if config.theme == ThemeName::Auto {
            let resolver = config.theme_resolver();
            let listener_surface = surface.clone();
            let listener_theme = Arc::clone(&theme);
            system.subscribe(Box::new(move |appearance| {
                let mapping = resolver.resolve(Some(appearance));
                listener_surface.set_stylesheet(ids::THEME_STYLE, &theme_stylesheet(&mapping));
                listener_theme.store(Arc::new(mapping));
                tracing::debug!(?appearance, "system appearance changed; theme re-resolved");
            }))
        } else {
            AppearanceSubscription::inert()
        };

        tracing::info!(
            layout = %config.layout,
            target = %config.target,
            theme = %config.theme,
            "chat widget mounted"
        );

        let auto_open = config.auto_open;
        let mut widget = Self {
            config,
            hooks,
            surface,
            theme,
            state: WidgetState::default(),
            next_cycle: 0,
            in_flight: BTreeSet::new(),
            appearance,
        };
        widget.add_welcome_messages();

        if auto_open {
            widget.open();
        }
        Ok(widget)
    }

    fn add_welcome_messages(&mut self) {
        if !self.config.initial_messages.is_empty() {
            let initial = self.config.initial_messages.clone();
            self.load_history(&initial);
        } else if self.config.show_greeting {
            let greeting = Message::text(Sender::Bot, self.config.greeting.clone());
            self.add_message(greeting);
        }
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Currently applied theme mapping.
    pub fn theme(&self) -> Arc<ThemeMapping> {
        self.theme.load_full()
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open
    }

    pub fn messages(&self) -> &[Message] {
        &self.state.messages
    }

    /// Send cycles started but not yet finished.
    pub fn pending_cycles(&self) -> usize {
        self.in_flight.len()
    }

    pub fn open(&mut self) {
        let layout = self.config.layout;
        if layout.is_in_flow() {
            self.surface.set_display(ids::WINDOW, "flex");
        } else {
            self.surface.set_class(ids::WINDOW, OPEN_CLASS, true);
            if layout == Layout::Modal {
                self.surface.set_class(ids::ROOT, OPEN_CLASS, true);
            }
        }

        self.state.is_open = true;
        tracing::debug!(%layout, "chat widget opened");
        if let Some(on_open) = self.hooks.on_open.as_mut() {
            on_open();
        }
    }

    /// Inline widgets cannot be dismissed; closing them does nothing.
    pub fn close(&mut self) {
        let layout = self.config.layout;
        if !layout.can_close() {
            tracing::debug!(%layout, "ignoring close on a layout that cannot be dismissed");
            return;
        }

        if layout.is_in_flow() {
            self.surface.set_display(ids::WINDOW, "none");
        } else {
            self.surface.set_class(ids::WINDOW, OPEN_CLASS, false);
            if layout == Layout::Modal {
                self.surface.set_class(ids::ROOT, OPEN_CLASS, false);
            }
        }

        self.state.is_open = false;
        tracing::debug!(%layout, "chat widget closed");
        if let Some(on_close) = self.hooks.on_close.as_mut() {
            on_close();
        }
    }

    pub fn toggle(&mut self) {
        if self.state.is_open {
            self.close();
        } else {
            self.open();
        }
    }

    /// Appends `message` to the log and the view.
    pub fn add_message(&mut self, message: Message) {
        let row = MessageView::new(&self.config.avatar).render(&message);
        self.surface.append(ids::MESSAGES, row);
        self.surface.scroll_to_bottom(ids::MESSAGES);
        self.state.messages.push(message);
    }

    /// Appends prior conversation in order, skipping entries without a body.
    pub fn load_history(&mut self, entries: &[InitialMessage]) {
        for entry in entries {
            match Message::from_initial(entry) {
                Some(message) => self.add_message(message),
                None => tracing::warn!(
                    sender = entry.sender.as_str(),
                    "dropping initial message without text or html"
                ),
            }
        }
    }

    /// Starts a send cycle from the current input.
    ///
    /// Returns `None` when the trimmed input is empty (nothing changes) or when no
    /// message handler is configured (the user message is still appended).
    pub fn submit(&mut self) -> Option<SendCycle> {
        let raw = self.surface.input_value(ids::INPUT);
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }
        let text = text.to_string();

        self.surface.set_input_value(ids::INPUT, "");
        self.add_message(Message::text(Sender::User, text.clone()));

        let handler = Rc::clone(self.hooks.on_message.as_ref()?);

        let cycle = self.next_cycle;
        self.next_cycle += 1;
        let indicator = LoadingIndicator::new(&self.config.avatar).render(&ids::loading(cycle));
        self.surface.append(ids::MESSAGES, indicator);
        self.surface.scroll_to_bottom(ids::MESSAGES);
        self.in_flight.insert(cycle);

        tracing::debug!(cycle, pending = self.in_flight.len(), "send cycle started");
        Some(SendCycle {
            cycle,
            reply: handler.handle(text),
        })
    }

    /// Completes a settled cycle: drops its loading indicator and appends the reply,
    /// or the fallback message when the handler failed.
    pub fn finish(&mut self, settled: SettledCycle) {
        let SettledCycle { cycle, result } = settled;
        self.surface.remove(&ids::loading(cycle));
        self.in_flight.remove(&cycle);

        match result {
            Ok(reply) => match reply.into_content() {
                Some(content) => self.add_message(Message::new(Sender::Bot, content)),
                None => tracing::debug!(cycle, "handler returned an empty reply"),
            },
            Err(error) => {
                tracing::debug!(cycle, %error, "message handler failed");
                self.add_message(Message::text(Sender::Bot, FALLBACK_REPLY));
            }
        }
    }

    /// Runs one full send cycle. Callers that must not hold the widget across the
    /// handler call use [`ChatWidget::submit`] and [`ChatWidget::finish`] instead.
    pub async fn send_message(&mut self) {
        if let Some(cycle) = self.submit() {
            let settled = cycle.settle().await;
            self.finish(settled);
        }
    }

    /// Applies a UI event. Submitting events may start a send cycle.
    pub fn dispatch(&mut self, event: UiEvent) -> Option<SendCycle> {
        match event {
            UiEvent::ToggleClicked => {
                self.toggle();
                None
            }
            UiEvent::MinimizeClicked | UiEvent::BackdropClicked => {
                self.close();
                None
            }
            submitting if submitting.submits() => self.submit(),
            UiEvent::SendClicked | UiEvent::InputKeyPressed { .. } => None,
        }
    }

    /// Tears the widget down: empties its subtree and stops following the system
    /// appearance.
    pub fn destroy(self) {
        self.surface.clear();
        self.appearance.detach();
        tracing::info!(
            layout = %self.config.layout,
            dropped_cycles = self.in_flight.len(),
            "chat widget destroyed"
        );
    }
}
