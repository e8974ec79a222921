/// UI events reported by hosts.
pub mod events;
/// Message-handler contract for the send cycle.
pub mod handler;
/// Message log entries.
pub mod message;
/// Widget controller.
pub mod widget;

pub use events::UiEvent;
pub use handler::{HandlerError, HandlerFuture, HandlerReply, HandlerResult, MessageHandler};
pub use message::{Message, MessageContent, Sender};
pub use widget::{ChatWidget, FALLBACK_REPLY, SendCycle, SettledCycle, WidgetHooks};
