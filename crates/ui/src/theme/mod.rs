//! Theme resolution: preset → component overrides → flat overrides, flattened into
//! one mapping of style-variable names to values.

mod appearance;
mod overrides;
mod presets;

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserializer, Serialize, Serializer};

pub use appearance::{
    Appearance, AppearanceListener, AppearanceSubscription, ManualAppearance, NoAppearance,
    SystemAppearance,
};
pub use overrides::{
    ComponentStyles, HeaderStyles, InputStyles, LayoutStyles, MessageStyles, ThemeOverrides,
};
pub use presets::{PRIMARY_COLOR, SEND_BUTTON_BG, USER_BUBBLE_BG, preset};

pub(crate) use overrides::{deserialize_lenient_string, deserialize_style_value};

/// Named preset selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThemeName {
    Light,
    #[default]
    Dark,
    /// Follows the system preference, dark when it is unknown.
    Auto,
}

impl ThemeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Auto => "auto",
        }
    }

    /// Unrecognized names fall back to dark.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Self::Light,
            "dark" => Self::Dark,
            "auto" => Self::Auto,
            other => {
                tracing::warn!(theme = %other, "unrecognized theme name; using dark");
                Self::Dark
            }
        }
    }

    pub fn resolve(&self, system: Option<Appearance>) -> Appearance {
        match self {
            Self::Light => Appearance::Light,
            Self::Dark => Appearance::Dark,
            Self::Auto => system.unwrap_or(Appearance::Dark),
        }
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

pub(crate) fn serialize_theme_name<S>(value: &ThemeName, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(value.as_str())
}

pub(crate) fn deserialize_theme_name<'de, D>(deserializer: D) -> Result<ThemeName, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_style_value(deserializer)?
        .map(|value| ThemeName::parse(&value))
        .unwrap_or_default())
}

/// Flat, ordered mapping from style-variable name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ThemeMapping {
    vars: IndexMap<String, String>,
}

impl ThemeMapping {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut mapping = Self::default();
        for (name, value) in pairs {
            mapping.set(name, value);
        }
        mapping
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Renders `name: value;` declarations, one per line, in insertion order.
    pub fn to_declarations(&self) -> String {
        let mut out = String::new();
        for (name, value) in self.iter() {
            out.push_str("  ");
            out.push_str(name);
            out.push_str(": ");
            out.push_str(value);
            out.push_str(";\n");
        }
        out
    }
}

/// Owned inputs for resolving a theme, detached from the widget config so it can be
/// re-run whenever the system appearance changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeResolver {
    name: ThemeName,
    components: ComponentStyles,
    overrides: ThemeOverrides,
}

impl ThemeResolver {
    pub fn new(name: ThemeName, components: ComponentStyles, overrides: ThemeOverrides) -> Self {
        Self {
            name,
            components,
            overrides,
        }
    }

    pub fn name(&self) -> ThemeName {
        self.name
    }

    /// Layers preset, component overrides and flat overrides, last write wins.
    ///
    /// A flat `primary_color` also feeds the user bubble and send button backgrounds,
    /// except where an earlier override layer already set those explicitly.
    pub fn resolve(&self, system: Option<Appearance>) -> ThemeMapping {
        let appearance = self.name.resolve(system);
        let mut mapping = ThemeMapping::from_pairs(preset(appearance).iter().copied());
        let mut explicit = HashSet::new();

        for (name, value) in self.components.css_vars() {
            mapping.set(name, value);
            explicit.insert(name);
        }

        for (name, value) in self.overrides.css_vars() {
            mapping.set(name, value);
            explicit.insert(name);
        }

        if let Some(primary) = self.overrides.primary_color.as_deref() {
            for derived in [USER_BUBBLE_BG, SEND_BUTTON_BG] {
                if !explicit.contains(derived) {
                    mapping.set(derived, primary);
                }
            }
        }

        tracing::debug!(
            theme = %self.name,
            ?appearance,
            variable_count = mapping.len(),
            "resolved theme mapping"
        );
        mapping
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn resolver(components: ComponentStyles, overrides: ThemeOverrides) -> ThemeResolver {
        ThemeResolver::new(ThemeName::Light, components, overrides)
    }

    #[test]
    fn unknown_and_auto_names_default_to_dark() {
        assert_eq!(ThemeName::parse("solarized"), ThemeName::Dark);
        assert_eq!(ThemeName::parse(" Light "), ThemeName::Light);
        assert_eq!(ThemeName::Auto.resolve(None), Appearance::Dark);
        assert_eq!(
            ThemeName::Auto.resolve(Some(Appearance::Light)),
            Appearance::Light
        );
    }

    #[test]
    fn flat_override_beats_component_override_and_preset() {
        let components = ComponentStyles {
            layout: LayoutStyles {
                font_family: Some("Serif".to_string()),
                ..LayoutStyles::default()
            },
            ..ComponentStyles::default()
        };
        let overrides = ThemeOverrides {
            font_family: Some("Mono".to_string()),
            ..ThemeOverrides::default()
        };

        let mapping = resolver(components, overrides).resolve(None);

        assert_eq!(mapping.get("--font-family"), Some("Mono"));
    }

    #[test]
    fn component_override_beats_preset() {
        let components = ComponentStyles {
            header: HeaderStyles {
                background_color: Some("#101010".to_string()),
                ..HeaderStyles::default()
            },
            ..ComponentStyles::default()
        };

        let mapping = resolver(components, ThemeOverrides::default()).resolve(None);

        assert_eq!(mapping.get("--header-bg"), Some("#101010"));
        assert_eq!(mapping.get("--header-text"), Some("#1F2937"));
    }

    #[test]
    fn primary_color_cascades_into_derived_variables() {
        let overrides = ThemeOverrides {
            primary_color: Some("#FF0000".to_string()),
            ..ThemeOverrides::default()
        };

        let mapping = resolver(ComponentStyles::default(), overrides).resolve(None);

        assert_eq!(mapping.get(PRIMARY_COLOR), Some("#FF0000"));
        assert_eq!(mapping.get(USER_BUBBLE_BG), mapping.get(PRIMARY_COLOR));
        assert_eq!(mapping.get(SEND_BUTTON_BG), Some("#FF0000"));
    }

    #[test]
    fn explicit_bubble_background_survives_primary_cascade() {
        let components = ComponentStyles {
            messages: MessageStyles {
                user_bubble_background: Some("#00FF00".to_string()),
                ..MessageStyles::default()
            },
            ..ComponentStyles::default()
        };
        let overrides = ThemeOverrides {
            primary_color: Some("#FF0000".to_string()),
            ..ThemeOverrides::default()
        };

        let mapping = resolver(components, overrides).resolve(None);

        assert_eq!(mapping.get(USER_BUBBLE_BG), Some("#00FF00"));
        assert_eq!(mapping.get(SEND_BUTTON_BG), Some("#FF0000"));
        assert_eq!(mapping.get(PRIMARY_COLOR), Some("#FF0000"));
    }

    #[test]
    fn declarations_follow_preset_order() {
        let mapping = ThemeMapping::from_pairs([("--a", "1"), ("--b", "2")]);
        assert_eq!(mapping.to_declarations(), "  --a: 1;\n  --b: 2;\n");
    }
}
