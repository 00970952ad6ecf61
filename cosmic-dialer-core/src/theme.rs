//! Light and dark color palettes shared across screens

use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    #[default]
    Light,
    Dark,
}

impl ThemeVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeVariant::Light => "light",
            ThemeVariant::Dark => "dark",
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            ThemeVariant::Light => LIGHT,
            ThemeVariant::Dark => DARK,
        }
    }
}

/// Screen colors as CSS color strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub text: &'static str,
    pub primary: &'static str,
    pub accent: &'static str,
    pub secondary: &'static str,
    pub surface: &'static str,
    pub error: &'static str,
    pub transparent: &'static str,
}

pub const LIGHT: Palette = Palette {
    background: "#FFFFFF",
    text: "#333333",
    primary: "#6200EE",
    accent: "#03DAC6",
    secondary: "#018786",
    surface: "#F5F5F5",
    error: "#B00020",
    transparent: "rgba(0,0,0,0)",
};

pub const DARK: Palette = Palette {
    background: "#121212",
    text: "#E1E1E1",
    primary: "#BB86FC",
    accent: "#03DAC6",
    secondary: "#03DAC6",
    surface: "#1E1E1E",
    error: "#CF6679",
    transparent: "rgba(0,0,0,0)",
};

/// Shared handle to the current theme
#[derive(Debug, Clone, Default)]
pub struct ThemeStore {
    variant: Arc<RwLock<ThemeVariant>>,
}

impl ThemeStore {
    pub fn new(variant: ThemeVariant) -> Self {
        Self {
            variant: Arc::new(RwLock::new(variant)),
        }
    }

    pub fn variant(&self) -> ThemeVariant {
        *self
            .variant
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn theme(&self) -> Palette {
        self.variant().palette()
    }

    pub fn is_dark(&self) -> bool {
        self.variant() == ThemeVariant::Dark
    }

    /// Switch between light and dark, returning the new variant
    pub fn toggle(&self) -> ThemeVariant {
        let mut variant = self
            .variant
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *variant = match *variant {
            ThemeVariant::Light => ThemeVariant::Dark,
            ThemeVariant::Dark => ThemeVariant::Light,
        };
        debug!("Theme switched to {}", variant.as_str());
        *variant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_light() {
        let store = ThemeStore::default();
        assert!(!store.is_dark());
        assert_eq!(store.theme().background, "#FFFFFF");
    }

    #[test]
    fn test_toggle_is_shared_between_handles() {
        let store = ThemeStore::new(ThemeVariant::Light);
        let other = store.clone();

        assert_eq!(store.toggle(), ThemeVariant::Dark);
        assert!(other.is_dark());
        assert_eq!(other.theme().primary, "#BB86FC");

        other.toggle();
        assert!(!store.is_dark());
    }

    #[test]
    fn test_variant_from_config_string() {
        let variant: ThemeVariant = serde_json::from_str("\"dark\"").unwrap();
        assert_eq!(variant, ThemeVariant::Dark);
    }
}
