use super::Appearance;

pub const PRIMARY_COLOR: &str = "--primary-color";
pub const USER_BUBBLE_BG: &str = "--user-bubble-bg";
pub const SEND_BUTTON_BG: &str = "--btn-send-bg";

const LIGHT: &[(&str, &str)] = &[
    (PRIMARY_COLOR, "#3B82F6"),
    ("--secondary-color", "#6366F1"),
    ("--accent-color", "#8B5CF6"),
    ("--bg-primary", "#FFFFFF"),
    ("--bg-secondary", "#F9FAFB"),
    ("--bg-tertiary", "#F3F4F6"),
    ("--text-primary", "#1F2937"),
    ("--text-secondary", "#4B5563"),
    ("--text-muted", "#6B7280"),
    ("--border-color", "#E5E7EB"),
    ("--shadow-color", "rgba(0, 0, 0, 0.1)"),
    ("--shadow", "0 4px 12px rgba(0, 0, 0, 0.08)"),
    ("--shadow-hover", "0 8px 24px rgba(0, 0, 0, 0.12)"),
    ("--header-bg", "#F9FAFB"),
    ("--header-text", "#1F2937"),
    ("--bot-bubble-bg", "#F3F4F6"),
    ("--bot-bubble-text", "#1F2937"),
    (USER_BUBBLE_BG, "#3B82F6"),
    ("--user-bubble-text", "#FFFFFF"),
    ("--input-bg", "#FFFFFF"),
    ("--input-border", "#E5E7EB"),
    ("--input-text", "#1F2937"),
    ("--input-placeholder", "#9CA3AF"),
    (SEND_BUTTON_BG, "#3B82F6"),
    ("--btn-send-color", "#FFFFFF"),
    ("--radius", "12px"),
    ("--radius-sm", "8px"),
    (
        "--font-family",
        "-apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif",
    ),
    ("--font-size", "14px"),
];

const DARK: &[(&str, &str)] = &[
    (PRIMARY_COLOR, "#3B82F6"),
    ("--secondary-color", "#6366F1"),
    ("--accent-color", "#8B5CF6"),
    ("--bg-primary", "#1F2937"),
    ("--bg-secondary", "#374151"),
    ("--bg-tertiary", "#4B5563"),
    ("--text-primary", "#F9FAFB"),
    ("--text-secondary", "#D1D5DB"),
    ("--text-muted", "#9CA3AF"),
    ("--border-color", "#4B5563"),
    ("--shadow-color", "rgba(0, 0, 0, 0.3)"),
    ("--shadow", "0 10px 25px rgba(0, 0, 0, 0.3)"),
    ("--shadow-hover", "0 15px 35px rgba(0, 0, 0, 0.4)"),
    ("--header-bg", "#374151"),
    ("--header-text", "#F9FAFB"),
    ("--bot-bubble-bg", "#374151"),
    ("--bot-bubble-text", "#F9FAFB"),
    (USER_BUBBLE_BG, "#3B82F6"),
    ("--user-bubble-text", "#FFFFFF"),
    ("--input-bg", "#1F2937"),
    ("--input-border", "#4B5563"),
    ("--input-text", "#F9FAFB"),
    ("--input-placeholder", "#9CA3AF"),
    (SEND_BUTTON_BG, "#3B82F6"),
    ("--btn-send-color", "#FFFFFF"),
    ("--radius", "12px"),
    ("--radius-sm", "8px"),
    (
        "--font-family",
        "-apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif",
    ),
    ("--font-size", "14px"),
];

/// Complete variable set for one appearance.
pub fn preset(appearance: Appearance) -> &'static [(&'static str, &'static str)] {
    match appearance {
        Appearance::Light => LIGHT,
        Appearance::Dark => DARK,
    }
}
