#![deny(unsafe_code)]

//! Embeddable chat widget core.
//!
//! Everything here is host-independent: configuration merging, theme resolution,
//! markup components and the widget controller. Hosts plug in through [`host::Host`].

/// Message log, send cycle and widget controller.
pub mod chat;
/// Pure render components.
pub mod components;
/// Widget configuration and layered loading.
pub mod config;
/// Markup fragment model.
pub mod dom;
pub mod error;
pub mod host;
/// Markdown and plain-text formatting.
pub mod markdown;
pub mod styles;
/// Presets, overrides and system appearance.
pub mod theme;

pub use chat::{ChatWidget, HandlerReply, Message, MessageHandler, Sender, UiEvent, WidgetHooks};
pub use config::{ConfigLoader, InitialMessage, Layout, MountTarget, Position, WidgetConfig};
pub use error::{ConfigError, WidgetError};
pub use host::{Host, Surface, VirtualHost, VirtualSurface};
pub use markdown::{format_text, markdown_to_html, sanitize_html};
pub use theme::{Appearance, ThemeMapping, ThemeName};
