//! Pure render components: configuration and message data in, markup out.

mod header;
mod input_box;
mod loading;
mod message;
mod shell;
mod toggle;
mod window;

pub use header::Header;
pub use input_box::InputBox;
pub use loading::LoadingIndicator;
pub use message::{MessageList, MessageView};
pub use shell::WidgetShell;
pub use toggle::ChatToggle;
pub use window::ChatWindow;

use crate::dom::Element;

/// A stateless view over captured configuration.
pub trait Component {
    fn render(&self) -> Element;
}

const MINIMIZE_ICON: &str = r#"<svg width="16" height="16" viewBox="0 0 24 24" fill="none"><path d="M5 12H19" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"/></svg>"#;

const SEND_ICON: &str = r#"<svg width="16" height="16" viewBox="0 0 24 24" fill="none"><path d="M22 2L11 13" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"/><path d="M22 2L15 22L11 13L2 9L22 2Z" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"/></svg>"#;

const CHAT_ICON: &str = r#"<svg width="24" height="24" viewBox="0 0 24 24" fill="none"><path d="M21 15a2 2 0 0 1-2 2H7l-4 4V5a2 2 0 0 1 2-2h14a2 2 0 0 1 2 2z" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"/></svg>"#;
