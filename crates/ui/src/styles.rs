//! Style blocks injected into the widget's isolated subtree.

use crate::config::{Layout, WidgetConfig};
use crate::dom::{Element, ids};
use crate::theme::ThemeMapping;

const BASE: &str = r#"
.chatbot-widget {
  font-family: var(--font-family);
  font-size: var(--font-size);
  line-height: 1.5;
  color: var(--text-primary);
  box-sizing: border-box;
}

.chatbot-window {
  background: var(--bg-primary);
  border-radius: var(--radius);
  box-shadow: var(--shadow);
  display: none;
  flex-direction: column;
  overflow: hidden;
  border: 1px solid var(--border-color);
}

.chatbot-window.open {
  display: flex;
  animation: chatbot-slide-up 0.3s ease;
}

@keyframes chatbot-slide-up {
  from { opacity: 0; transform: translateY(20px); }
  to { opacity: 1; transform: translateY(0); }
}
"#;

const HEADER: &str = r#"
.chatbot-header {
  background: var(--header-bg, var(--bg-secondary));
  color: var(--header-text, var(--text-primary));
  padding: var(--header-padding, 16px);
  display: flex;
  align-items: center;
  justify-content: space-between;
  border-bottom: 1px solid var(--header-border, var(--border-color));
}

.chatbot-header-info { display: flex; align-items: center; gap: 12px; }

.chatbot-avatar {
  width: var(--header-avatar-size, 40px);
  height: var(--header-avatar-size, 40px);
  border-radius: 50%;
  overflow: hidden;
  background: var(--primary-color);
}

.chatbot-avatar img { width: 100%; height: 100%; object-fit: cover; }
.chatbot-name { font-weight: 600; }
.chatbot-status { font-size: 12px; color: var(--header-status, var(--text-muted)); }
.chatbot-header-actions { display: flex; gap: 8px; }

.chatbot-btn-minimize {
  background: none;
  border: none;
  color: var(--text-secondary);
  cursor: pointer;
  padding: 6px;
  border-radius: var(--radius-sm);
}

.chatbot-btn-minimize:hover { background: var(--bg-tertiary); color: var(--text-primary); }
"#;

const MESSAGES: &str = r#"
.chatbot-messages {
  flex: 1;
  padding: var(--message-spacing, 16px);
  overflow-y: auto;
  display: flex;
  flex-direction: column;
  gap: var(--message-spacing, 16px);
}

.chatbot-message { display: flex; gap: 8px; max-width: var(--message-max-width, 80%); }
.chatbot-message.user { align-self: flex-end; flex-direction: row-reverse; }

.chatbot-message-avatar {
  width: var(--message-avatar-size, 32px);
  height: var(--message-avatar-size, 32px);
  flex-shrink: 0;
  border-radius: 50%;
  overflow: hidden;
}

.chatbot-message-avatar img { width: 100%; height: 100%; object-fit: cover; }
.chatbot-message-content { display: flex; flex-direction: column; gap: 4px; }

.chatbot-message-bubble {
  padding: 10px 14px;
  border-radius: var(--message-radius, var(--radius-sm));
  word-wrap: break-word;
  white-space: pre-wrap;
}

.chatbot-message.bot .chatbot-message-bubble {
  background: var(--bot-bubble-bg, var(--bg-secondary));
  color: var(--bot-bubble-text, var(--text-primary));
}

.chatbot-message.user .chatbot-message-bubble {
  background: var(--user-bubble-bg, var(--primary-color));
  color: var(--user-bubble-text, white);
}

.chatbot-message-time { font-size: 11px; color: var(--message-timestamp, var(--text-muted)); }
.chatbot-message.user .chatbot-message-time { text-align: right; }

.chatbot-message-bubble.html-content { white-space: normal; }
.chatbot-message-bubble.html-content p { margin: 0 0 8px; }
.chatbot-message-bubble.html-content p:last-child { margin-bottom: 0; }
.chatbot-message-bubble.html-content ul,
.chatbot-message-bubble.html-content ol { margin: 8px 0; padding-left: 20px; }
.chatbot-message-bubble.html-content code {
  background: var(--bg-tertiary);
  padding: 2px 4px;
  border-radius: 4px;
  font-family: monospace;
}
.chatbot-message-bubble.html-content pre {
  background: var(--bg-tertiary);
  padding: 12px;
  border-radius: var(--radius-sm);
  overflow-x: auto;
}
.chatbot-message-bubble.html-content pre code { background: none; padding: 0; }
.chatbot-message-bubble.html-content h1 { font-size: 1.4em; margin: 8px 0; }
.chatbot-message-bubble.html-content h2 { font-size: 1.2em; margin: 8px 0; }
.chatbot-message-bubble.html-content h3 { font-size: 1.1em; margin: 8px 0; }
.chatbot-message-bubble.html-content a { color: var(--primary-color); }

.chatbot-typing-indicator { display: flex; gap: 4px; padding: 4px 0; }

.chatbot-typing-indicator span {
  width: 8px;
  height: 8px;
  border-radius: 50%;
  background: var(--text-secondary);
  animation: chatbot-typing-bounce 1.4s infinite ease-in-out both;
}

.chatbot-typing-indicator span:nth-child(1) { animation-delay: -0.32s; }
.chatbot-typing-indicator span:nth-child(2) { animation-delay: -0.16s; }

@keyframes chatbot-typing-bounce {
  0%, 80%, 100% { transform: scale(0.6); opacity: 0.5; }
  40% { transform: scale(1); opacity: 1; }
}
"#;

const INPUT: &str = r#"
.chatbot-input-container {
  padding: var(--input-padding, 16px);
  border-top: 1px solid var(--border-color);
  background: var(--bg-secondary);
}

.chatbot-input-wrapper { display: flex; gap: 8px; align-items: center; }

.chatbot-input {
  flex: 1;
  background: var(--input-bg, var(--bg-primary));
  border: 1px solid var(--input-border, var(--border-color));
  border-radius: var(--radius-sm);
  padding: 10px 14px;
  color: var(--input-text, var(--text-primary));
  font: inherit;
  outline: none;
}

.chatbot-input:focus { border-color: var(--primary-color); }
.chatbot-input::placeholder { color: var(--input-placeholder, var(--text-muted)); }

.chatbot-btn-send {
  background: var(--btn-send-bg, var(--primary-color));
  color: var(--btn-send-color, white);
  border: none;
  border-radius: var(--radius-sm);
  width: 40px;
  height: 40px;
  display: flex;
  align-items: center;
  justify-content: center;
  cursor: pointer;
}
"#;

/// `:host` block with one declaration per theme variable.
pub fn theme_stylesheet(theme: &ThemeMapping) -> String {
    format!(":host {{\n{}}}\n", theme.to_declarations())
}

fn layout_stylesheet(config: &WidgetConfig) -> String {
    let width = &config.width;
    let height = &config.height;
    match config.layout {
        Layout::Bubble => {
            let vertical = if config.position.is_bottom() {
                "bottom"
            } else {
                "top"
            };
            let horizontal = if config.position.is_right() {
                "right"
            } else {
                "left"
            };
            format!(
                r#"
.chatbot-layout-bubble {{ position: fixed; {vertical}: 20px; {horizontal}: 20px; z-index: 1000; }}
.chatbot-layout-bubble .chatbot-window {{
  position: absolute;
  {vertical}: 70px;
  {horizontal}: 0;
  width: 380px;
  height: 500px;
}}
.chatbot-toggle {{
  width: 56px;
  height: 56px;
  background: var(--primary-color);
  border: none;
  border-radius: 50%;
  display: flex;
  align-items: center;
  justify-content: center;
  color: white;
  cursor: pointer;
  box-shadow: var(--shadow);
  transition: transform 0.3s ease;
}}
.chatbot-toggle:hover {{ transform: scale(1.05); box-shadow: var(--shadow-hover); }}
@media (max-width: 480px) {{
  .chatbot-layout-bubble .chatbot-window {{ width: calc(100vw - 40px); height: 80vh; }}
}}
"#
            )
        }
        Layout::Inline => format!(
            r#"
.chatbot-layout-inline {{ position: relative; width: {width}; height: {height}; display: block; }}
.chatbot-layout-inline .chatbot-window {{ position: relative; width: 100%; height: 100%; display: flex !important; }}
"#
        ),
        Layout::Embedded => format!(
            r#"
.chatbot-layout-embedded {{ position: relative; width: {width}; height: {height}; }}
.chatbot-layout-embedded .chatbot-window {{ position: relative; width: 100%; height: 100%; display: flex; }}
"#
        ),
        Layout::Fullscreen => r#"
.chatbot-layout-fullscreen { position: fixed; inset: 0; z-index: 1000; width: 100vw; height: 100vh; }
.chatbot-layout-fullscreen .chatbot-window {
  position: relative;
  width: 100%;
  height: 100%;
  display: flex;
  border-radius: 0;
  border: none;
}
"#
        .to_string(),
        Layout::Modal => format!(
            r#"
.chatbot-layout-modal {{
  position: fixed;
  inset: 0;
  z-index: 9999;
  display: none;
  align-items: center;
  justify-content: center;
}}
.chatbot-layout-modal.open {{ display: flex; }}
.chatbot-modal-backdrop {{
  position: absolute;
  inset: 0;
  background: rgba(0, 0, 0, 0.5);
  backdrop-filter: blur(4px);
}}
.chatbot-layout-modal .chatbot-window {{
  position: relative;
  width: {width};
  height: {height};
  max-width: 95vw;
  max-height: 95vh;
  animation: chatbot-modal-in 0.3s ease-out;
}}
@keyframes chatbot-modal-in {{
  from {{ opacity: 0; transform: translateY(-20px) scale(0.95); }}
  to {{ opacity: 1; transform: translateY(0) scale(1); }}
}}
@media (max-width: 768px) {{
  .chatbot-layout-modal .chatbot-window {{ width: 95vw; height: 90vh; }}
}}
"#
        ),
    }
}

/// Base, layout, header, message and input rules for the configured layout.
pub fn component_stylesheet(config: &WidgetConfig) -> String {
    let layout = layout_stylesheet(config);
    [BASE, layout.as_str(), HEADER, MESSAGES, INPUT].concat()
}

/// Style elements in injection order; the custom block only when non-empty.
pub fn style_elements(config: &WidgetConfig) -> Vec<Element> {
    let mut elements = vec![
        Element::new("style")
            .id(ids::THEME_STYLE)
            .markup(theme_stylesheet(&config.processed_theme)),
        Element::new("style")
            .id(ids::COMPONENT_STYLE)
            .markup(component_stylesheet(config)),
    ];
    if !config.custom_styles.trim().is_empty() {
        elements.push(
            Element::new("style")
                .id(ids::CUSTOM_STYLE)
                .markup(config.custom_styles.clone()),
        );
    }
    elements
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::Position;

    #[test]
    fn theme_block_scopes_variables_to_host() {
        let theme = ThemeMapping::from_pairs([("--primary-color", "#123456")]);
        assert_eq!(
            theme_stylesheet(&theme),
            ":host {\n  --primary-color: #123456;\n}\n"
        );
    }

    #[test]
    fn bubble_position_picks_anchor_edges() {
        let config = WidgetConfig {
            layout: Layout::Bubble,
            position: Position::TopLeft,
            ..WidgetConfig::default()
        };

        let css = component_stylesheet(&config);
        assert!(css.contains("position: fixed; top: 20px; left: 20px;"));
    }

    #[test]
    fn in_flow_layouts_use_configured_dimensions() {
        let config = WidgetConfig {
            layout: Layout::Embedded,
            width: "320px".to_string(),
            height: "480px".to_string(),
            ..WidgetConfig::default()
        };

        assert!(component_stylesheet(&config).contains("width: 320px; height: 480px;"));
    }

    #[test]
    fn custom_block_only_when_provided() {
        let mut config = WidgetConfig::default();
        let ids_of = |config: &WidgetConfig| {
            style_elements(config)
                .iter()
                .filter_map(|element| element.element_id().map(str::to_string))
                .collect::<Vec<_>>()
        };

        assert_eq!(ids_of(&config), vec![ids::THEME_STYLE, ids::COMPONENT_STYLE]);

        config.custom_styles = ".chatbot-name { color: red; }".to_string();
        assert_eq!(
            ids_of(&config),
            vec![ids::THEME_STYLE, ids::COMPONENT_STYLE, ids::CUSTOM_STYLE]
        );
    }
}
