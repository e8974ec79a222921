use std::fmt;
use std::path::Path;

use chrono::{DateTime, Local};
use figment::{
    Figment,
    providers::{Format, Json, Serialized},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use snafu::{ResultExt, ensure};

use crate::chat::message::Sender;
use crate::error::{ConfigResult, ExtractSnafu, MissingFileSnafu};
use crate::theme::{
    Appearance, ComponentStyles, ThemeMapping, ThemeName, ThemeOverrides, ThemeResolver,
    deserialize_lenient_string, deserialize_theme_name, serialize_theme_name,
};

/// Library default for the legacy `primaryColor` field.
pub const DEFAULT_PRIMARY_COLOR: &str = "#3B82F6";
pub const DEFAULT_WIDTH: &str = "100%";
pub const DEFAULT_HEIGHT: &str = "600px";
pub const DEFAULT_GREETING: &str = "Hi! How can I help you today?";
pub const DEFAULT_PLACEHOLDER: &str = "Write a message...";
pub const DEFAULT_BOT_AVATAR: &str = "assets/chat-bot.jpg";
pub const DEFAULT_USER_AVATAR: &str = "assets/user.jpg";

/// Placement variant of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Inline,
    Bubble,
    Embedded,
    Fullscreen,
    Modal,
}

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Bubble => "bubble",
            Self::Embedded => "embedded",
            Self::Fullscreen => "fullscreen",
            Self::Modal => "modal",
        }
    }

    /// Layouts that live in page flow and show or hide through `display`.
    pub fn is_in_flow(&self) -> bool {
        matches!(self, Self::Inline | Self::Embedded | Self::Fullscreen)
    }

    /// An inline widget can never be dismissed.
    pub fn can_close(&self) -> bool {
        !matches!(self, Self::Inline)
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Corner anchoring for the bubble layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

impl Position {
    pub fn is_bottom(&self) -> bool {
        matches!(self, Self::BottomRight | Self::BottomLeft)
    }

    pub fn is_right(&self) -> bool {
        matches!(self, Self::BottomRight | Self::TopRight)
    }
}

/// Where the widget mounts its isolated subtree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MountTarget {
    #[default]
    Body,
    Selector(String),
}

impl From<String> for MountTarget {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("body") {
            Self::Body
        } else {
            Self::Selector(trimmed.to_string())
        }
    }
}

impl From<MountTarget> for String {
    fn from(value: MountTarget) -> Self {
        value.to_string()
    }
}

impl fmt::Display for MountTarget {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Body => formatter.write_str("body"),
            Self::Selector(selector) => formatter.write_str(selector),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Avatars {
    pub bot: String,
    pub user: String,
}

impl Default for Avatars {
    fn default() -> Self {
        Self {
            bot: DEFAULT_BOT_AVATAR.to_string(),
            user: DEFAULT_USER_AVATAR.to_string(),
        }
    }
}

impl Avatars {
    pub fn for_sender(&self, sender: Sender) -> &str {
        match sender {
            Sender::Bot => &self.bot,
            Sender::User => &self.user,
        }
    }
}

/// One pre-seeded message. Entries without `text` or `html` are dropped at mount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default)]
    pub is_html: bool,
    pub sender: Sender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Local>>,
}

impl InitialMessage {
    pub fn text(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            html: None,
            is_html: false,
            sender,
            timestamp: None,
        }
    }

    pub fn html(sender: Sender, html: impl Into<String>, is_html: bool) -> Self {
        Self {
            text: None,
            html: Some(html.into()),
            is_html,
            sender,
            timestamp: None,
        }
    }
}

/// Complete widget configuration. Every documented option is always populated.
///
/// `processed_theme` is derived from the theme fields by [`WidgetConfig::refresh_theme`];
/// it is never read from caller input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetConfig {
    pub layout: Layout,
    pub target: MountTarget,
    #[serde(deserialize_with = "deserialize_lenient_string")]
    pub width: String,
    #[serde(deserialize_with = "deserialize_lenient_string")]
    pub height: String,
    pub position: Position,
    pub auto_open: bool,
    pub show_toggle: bool,
    pub show_greeting: bool,
    #[serde(
        serialize_with = "serialize_theme_name",
        deserialize_with = "deserialize_theme_name"
    )]
    pub theme: ThemeName,
    #[serde(deserialize_with = "deserialize_lenient_string")]
    pub primary_color: String,
    pub component_styles: ComponentStyles,
    pub theme_overrides: ThemeOverrides,
    #[serde(deserialize_with = "deserialize_lenient_string")]
    pub custom_styles: String,
    #[serde(deserialize_with = "deserialize_lenient_string")]
    pub greeting: String,
    #[serde(deserialize_with = "deserialize_lenient_string")]
    pub placeholder: String,
    pub initial_messages: Vec<InitialMessage>,
    pub avatar: Avatars,
    #[serde(skip)]
    pub processed_theme: ThemeMapping,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            target: MountTarget::default(),
            width: DEFAULT_WIDTH.to_string(),
            height: DEFAULT_HEIGHT.to_string(),
            position: Position::default(),
            auto_open: false,
            show_toggle: true,
            show_greeting: true,
            theme: ThemeName::default(),
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            component_styles: ComponentStyles::default(),
            theme_overrides: ThemeOverrides::default(),
            custom_styles: String::new(),
            greeting: DEFAULT_GREETING.to_string(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            initial_messages: Vec::new(),
            avatar: Avatars::default(),
            processed_theme: ThemeMapping::default(),
        }
    }
}

impl WidgetConfig {
    /// Merges a partial caller config over the defaults and resolves the theme.
    pub fn merge(partial: Value, system: Option<Appearance>) -> ConfigResult<Self> {
        ConfigLoader::new().merge_value(partial).load(system)
    }

    /// Theme overrides with the legacy `primary_color` field folded in.
    ///
    /// The legacy field only counts when it differs from the library default and no
    /// explicit override already names a primary color.
    pub fn effective_overrides(&self) -> ThemeOverrides {
        let mut overrides = self.theme_overrides.clone();
        if self.primary_color != DEFAULT_PRIMARY_COLOR && overrides.primary_color.is_none() {
            overrides.primary_color = Some(self.primary_color.clone());
        }
        overrides
    }

    pub fn theme_resolver(&self) -> ThemeResolver {
        ThemeResolver::new(
            self.theme,
            self.component_styles.clone(),
            self.effective_overrides(),
        )
    }

    pub fn refresh_theme(&mut self, system: Option<Appearance>) {
        self.processed_theme = self.theme_resolver().resolve(system);
    }
}

/// Layered figment builder: defaults, then each merged source in call order.
pub struct ConfigLoader {
    figment: Figment,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            figment: Figment::from(Serialized::defaults(WidgetConfig::default())),
        }
    }

    pub fn merge_file(self, path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        ensure!(
            path.exists(),
            MissingFileSnafu {
                stage: "merge-config-file",
                path: path.to_path_buf(),
            }
        );

        tracing::debug!(?path, "merging widget config file");
        Ok(Self {
            figment: self.figment.merge(Json::file(path)),
        })
    }

    /// Caller-supplied JSON; `null` entries count as absent. Anything but an object
    /// contributes nothing.
    pub fn merge_value(self, partial: Value) -> Self {
        if !partial.is_object() {
            if !partial.is_null() {
                tracing::warn!(kind = ?partial, "ignoring non-object widget config");
            }
            return self;
        }

        Self {
            figment: self
                .figment
                .merge(Serialized::defaults(strip_nulls(partial))),
        }
    }

    pub fn load(self, system: Option<Appearance>) -> ConfigResult<WidgetConfig> {
        let mut config = self.figment.extract::<WidgetConfig>().context(ExtractSnafu {
            stage: "extract-widget-config",
        })?;
        config.refresh_theme(system);
        Ok(config)
    }
}

fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(key, value)| (key, strip_nulls(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_nulls).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::theme::{PRIMARY_COLOR, USER_BUBBLE_BG};

    #[test]
    fn empty_input_yields_documented_defaults() {
        let config = WidgetConfig::merge(json!({}), None).unwrap();

        let mut expected = WidgetConfig::default();
        expected.refresh_theme(None);
        assert_eq!(config, expected);
        assert_eq!(config.processed_theme.get("--bg-primary"), Some("#1F2937"));
    }

    #[test]
    fn null_input_is_the_same_as_empty() {
        assert_eq!(
            WidgetConfig::merge(Value::Null, None).unwrap(),
            WidgetConfig::merge(json!({}), None).unwrap()
        );
    }

    #[test]
    fn scalar_values_are_accepted_for_text_options() {
        let config = WidgetConfig::merge(
            json!({
                "theme": 7,
                "greeting": 42,
                "placeholder": true,
                "customStyles": 1.5,
            }),
            None,
        )
        .unwrap();

        assert_eq!(config.theme, ThemeName::Dark);
        assert_eq!(config.greeting, "42");
        assert_eq!(config.placeholder, "true");
        assert_eq!(config.custom_styles, "1.5");
    }

    #[test]
    fn partial_input_keeps_defaults_for_omitted_keys() {
        let config = WidgetConfig::merge(
            json!({
                "layout": "bubble",
                "autoOpen": true,
                "avatar": { "bot": "bot.png" },
                "greeting": null,
                "onMessage": "ignored",
                "somethingElse": { "nested": 1 },
            }),
            None,
        )
        .unwrap();

        assert_eq!(config.layout, Layout::Bubble);
        assert!(config.auto_open);
        assert_eq!(config.avatar.bot, "bot.png");
        assert_eq!(config.avatar.user, DEFAULT_USER_AVATAR);
        assert_eq!(config.greeting, DEFAULT_GREETING);
        assert_eq!(config.placeholder, DEFAULT_PLACEHOLDER);
        assert_eq!(config.target, MountTarget::Body);
        assert!(!config.processed_theme.is_empty());
    }

    #[test]
    fn target_and_lenient_dimensions_are_parsed() {
        let config = WidgetConfig::merge(
            json!({ "target": "#chat", "width": 420, "theme": "neon" }),
            None,
        )
        .unwrap();

        assert_eq!(config.target, MountTarget::Selector("#chat".to_string()));
        assert_eq!(config.width, "420");
        assert_eq!(config.theme, ThemeName::Dark);
    }

    #[test]
    fn auto_theme_uses_the_system_preference() {
        let config = WidgetConfig::merge(json!({ "theme": "auto" }), Some(Appearance::Light))
            .unwrap();
        assert_eq!(config.processed_theme.get("--bg-primary"), Some("#FFFFFF"));

        let config = WidgetConfig::merge(json!({ "theme": "auto" }), None).unwrap();
        assert_eq!(config.processed_theme.get("--bg-primary"), Some("#1F2937"));
    }

    #[test]
    fn legacy_primary_color_folds_into_overrides() {
        let config = WidgetConfig::merge(json!({ "primaryColor": "#AA0000" }), None).unwrap();

        assert_eq!(config.processed_theme.get(PRIMARY_COLOR), Some("#AA0000"));
        assert_eq!(config.processed_theme.get(USER_BUBBLE_BG), Some("#AA0000"));
    }

    #[test]
    fn legacy_primary_color_never_clobbers_an_explicit_override() {
        let config = WidgetConfig::merge(
            json!({
                "primaryColor": "#AA0000",
                "themeOverrides": { "primaryColor": "#00AA00" },
            }),
            None,
        )
        .unwrap();

        assert_eq!(config.processed_theme.get(PRIMARY_COLOR), Some("#00AA00"));
    }

    #[test]
    fn legacy_default_primary_color_is_ignored() {
        let config = WidgetConfig {
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            ..WidgetConfig::default()
        };

        assert_eq!(config.effective_overrides(), ThemeOverrides::default());
    }

    #[test]
    fn unknown_layout_is_a_config_error() {
        let error = WidgetConfig::merge(json!({ "layout": "sidebar" }), None).unwrap_err();
        assert!(matches!(error, crate::error::ConfigError::Extract { .. }));
    }

    #[test]
    fn initial_messages_deserialize_from_camel_case() {
        let config = WidgetConfig::merge(
            json!({
                "initialMessages": [
                    { "text": "hello", "sender": "user" },
                    { "html": "<b>hi</b>", "isHtml": true, "sender": "bot" },
                ],
            }),
            None,
        )
        .unwrap();

        assert_eq!(
            config.initial_messages,
            vec![
                InitialMessage::text(Sender::User, "hello"),
                InitialMessage::html(Sender::Bot, "<b>hi</b>", true),
            ]
        );
    }

    #[test]
    fn missing_config_file_is_reported() {
        let error = ConfigLoader::new()
            .merge_file("/definitely/not/here/widget.json")
            .err()
            .unwrap();
        assert!(matches!(
            error,
            crate::error::ConfigError::MissingFile { .. }
        ));
    }
}
