use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

// Every style group shares the same shape: optional fields, each feeding exactly one
// style variable, carried verbatim without validation.
macro_rules! style_group {
    ($(#[$meta:meta])* $name:ident { $($field:ident => $var:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default, rename_all = "camelCase")]
        pub struct $name {
            $(
                #[serde(
                    skip_serializing_if = "Option::is_none",
                    deserialize_with = "deserialize_style_value"
                )]
                pub $field: Option<String>,
            )+
        }

        impl $name {
            /// Style variables for the fields that were explicitly set.
            pub fn css_vars(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
                [$(($var, self.$field.as_deref())),+]
                    .into_iter()
                    .filter_map(|(var, value)| value.map(|value| (var, value)))
            }
        }
    };
}

style_group!(
    /// Header overrides.
    HeaderStyles {
        background_color => "--header-bg",
        text_color => "--header-text",
        status_color => "--header-status",
        border_color => "--header-border",
        avatar_size => "--header-avatar-size",
        padding => "--header-padding",
    }
);

style_group!(
    /// Message list and bubble overrides.
    MessageStyles {
        bot_bubble_background => "--bot-bubble-bg",
        user_bubble_background => "--user-bubble-bg",
        bot_text_color => "--bot-bubble-text",
        user_text_color => "--user-bubble-text",
        timestamp_color => "--message-timestamp",
        spacing => "--message-spacing",
        max_width => "--message-max-width",
        border_radius => "--message-radius",
        avatar_size => "--message-avatar-size",
    }
);

style_group!(
    /// Input row overrides.
    InputStyles {
        background_color => "--input-bg",
        text_color => "--input-text",
        border_color => "--input-border",
        placeholder_color => "--input-placeholder",
        button_background => "--btn-send-bg",
        button_color => "--btn-send-color",
        padding => "--input-padding",
    }
);

style_group!(
    /// Overrides for the outer frame.
    LayoutStyles {
        border_radius => "--radius",
        shadow => "--shadow",
        spacing => "--spacing",
        font_family => "--font-family",
        font_size => "--font-size",
    }
);

/// Structured per-component overrides, applied on top of the preset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentStyles {
    pub header: HeaderStyles,
    pub messages: MessageStyles,
    pub input: InputStyles,
    pub layout: LayoutStyles,
}

impl ComponentStyles {
    pub fn css_vars(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.header
            .css_vars()
            .chain(self.messages.css_vars())
            .chain(self.input.css_vars())
            .chain(self.layout.css_vars())
    }
}

/// Flat top-level overrides. Highest priority layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeOverrides {
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_style_value"
    )]
    pub primary_color: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_style_value"
    )]
    pub secondary_color: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_style_value"
    )]
    pub accent_color: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_style_value"
    )]
    pub font_family: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_style_value"
    )]
    pub font_size: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_style_value"
    )]
    pub border_radius: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_style_value"
    )]
    pub shadow: Option<String>,
}

impl ThemeOverrides {
    /// Variables written directly by this layer. The `primary_color` cascade into
    /// derived variables is the resolver's job.
    pub fn css_vars(&self) -> Vec<(&'static str, &str)> {
        let mut vars = Vec::new();
        if let Some(value) = self.primary_color.as_deref() {
            vars.push(("--primary-color", value));
        }
        if let Some(value) = self.secondary_color.as_deref() {
            vars.push(("--secondary-color", value));
        }
        if let Some(value) = self.accent_color.as_deref() {
            vars.push(("--accent-color", value));
        }
        if let Some(value) = self.font_family.as_deref() {
            vars.push(("--font-family", value));
        }
        if let Some(value) = self.font_size.as_deref() {
            vars.push(("--font-size", value));
        }
        if let Some(value) = self.border_radius.as_deref() {
            vars.push(("--radius", value));
            vars.push(("--radius-sm", value));
        }
        if let Some(value) = self.shadow.as_deref() {
            vars.push(("--shadow", value));
        }
        vars
    }
}

struct StyleValueVisitor;

impl<'de> Visitor<'de> for StyleValueVisitor {
    type Value = Option<String>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a string, number or boolean style value")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(Some(value))
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(StyleValueVisitor)
    }
}

/// Accepts any scalar and keeps its text form; style values are never validated.
pub(crate) fn deserialize_style_value<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(StyleValueVisitor)
}

pub(crate) fn deserialize_lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_style_value(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn component_styles_only_emit_present_keys() {
        let styles: ComponentStyles = serde_json::from_value(json!({
            "header": { "backgroundColor": "#111111" },
            "messages": { "userBubbleBackground": "#222222", "spacing": 12 },
        }))
        .unwrap();

        assert_eq!(
            styles.css_vars().collect::<Vec<_>>(),
            vec![
                ("--header-bg", "#111111"),
                ("--user-bubble-bg", "#222222"),
                ("--message-spacing", "12"),
            ]
        );
    }

    #[test]
    fn border_radius_override_feeds_both_radius_variables() {
        let overrides = ThemeOverrides {
            border_radius: Some("4px".to_string()),
            ..ThemeOverrides::default()
        };

        assert_eq!(
            overrides.css_vars(),
            vec![("--radius", "4px"), ("--radius-sm", "4px")]
        );
    }

    #[test]
    fn non_string_values_keep_their_text_form() {
        let overrides: ThemeOverrides = serde_json::from_value(json!({
            "primaryColor": 255,
            "shadow": false,
        }))
        .unwrap();

        assert_eq!(overrides.primary_color.as_deref(), Some("255"));
        assert_eq!(overrides.shadow.as_deref(), Some("false"));
    }
}
