// Display preferences persisted under `@hosanna_settings`.
//
// The stored object is merged over the defaults field by field, so values
// written by an older version (or a partial patch) never lose the rest.
use super::Library;
use crate::storage::{SETTINGS_KEY, write_json};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use strum::{EnumIter, IntoEnumIterator};

fn default_font_size() -> u8 {
    FontSize::Medium.points()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

/// The three font presets offered by the settings screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum FontSize {
    Small,
    Medium,
    Large,
}

impl FontSize {
    pub fn points(self) -> u8 {
        match self {
            FontSize::Small => 14,
            FontSize::Medium => 16,
            FontSize::Large => 18,
        }
    }

    pub fn from_points(points: u8) -> Option<Self> {
        FontSize::iter().find(|p| p.points() == points)
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "small" | "s" | "14" => Some(FontSize::Small),
            "medium" | "m" | "16" => Some(FontSize::Medium),
            "large" | "l" | "18" => Some(FontSize::Large),
            _ => None,
        }
    }

    pub fn i18n_key(self) -> &'static str {
        match self {
            FontSize::Small => "font_small",
            FontSize::Medium => "font_medium",
            FontSize::Large => "font_large",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_font_size")]
    pub font_size: u8,
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default)]
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            dark_mode: false,
            theme: Theme::Light,
        }
    }
}

impl Settings {
    pub fn font_preset(&self) -> Option<FontSize> {
        FontSize::from_points(self.font_size)
    }
}

/// Partial update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

impl SettingsPatch {
    pub fn font(size: FontSize) -> Self {
        Self {
            font_size: Some(size.points()),
            ..Default::default()
        }
    }

    /// Dark mode also switches the theme so both fields stay in step.
    pub fn dark_mode(on: bool) -> Self {
        Self {
            dark_mode: Some(on),
            theme: Some(if on { Theme::Dark } else { Theme::Light }),
            ..Default::default()
        }
    }
}

/// Overlays the fields of `overlay` onto `base` (shallow object merge).
fn merge_objects(base: &mut Value, overlay: Value) {
    if let (Value::Object(base), Value::Object(overlay)) = (base, overlay) {
        for (k, v) in overlay {
            base.insert(k, v);
        }
    }
}

fn merged_over_defaults(stored: Option<Value>) -> Settings {
    let mut merged = serde_json::to_value(Settings::default()).unwrap_or(Value::Null);
    if let Some(stored) = stored {
        merge_objects(&mut merged, stored);
    }
    match serde_json::from_value(merged) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("Stored settings are invalid, using defaults: {}", e);
            Settings::default()
        }
    }
}

impl Library {
    pub fn get_settings(&self) -> Result<Settings> {
        let stored = crate::storage::read_json::<Value>(self.store(), SETTINGS_KEY)?;
        Ok(merged_over_defaults(stored))
    }

    /// Applies `patch` over the current settings, persists and returns the result.
    pub fn update_settings(&self, patch: &SettingsPatch) -> Result<Settings> {
        let mut current = serde_json::to_value(self.get_settings()?)?;
        merge_objects(&mut current, serde_json::to_value(patch)?);
        let updated = merged_over_defaults(Some(current));
        write_json(self.store(), SETTINGS_KEY, &updated)?;
        Ok(updated)
    }

    pub fn reset_settings(&self) -> Result<Settings> {
        let defaults = Settings::default();
        write_json(self.store(), SETTINGS_KEY, &defaults)?;
        Ok(defaults)
    }
}
