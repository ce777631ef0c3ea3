//! Theme
//!
//! Storefront colour settings, persisted under [`THEME_STORAGE_KEY`] and merged over the
//! defaults on load so a partial payload never leaves a colour unset.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::storage::Storage;

/// Storage slot holding the theme colours.
pub const THEME_STORAGE_KEY: &str = "theme-colors";

/// Theme colours as CSS colour strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeColors {
    /// Primary brand colour
    pub primary: String,

    /// Darker primary, for pressed states
    pub primary_dark: String,

    /// Secondary brand colour
    pub secondary: String,

    /// Accent colour
    pub accent: String,

    /// Page background
    pub background: String,

    /// Card and sheet surfaces
    pub surface: String,

    /// Error messages
    pub error: String,

    /// Success messages
    pub success: String,

    /// Warnings
    pub warning: String,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            primary: "#667eea".to_string(),
            primary_dark: "#5568d3".to_string(),
            secondary: "#764ba2".to_string(),
            accent: "#f093fb".to_string(),
            background: "#f9fafb".to_string(),
            surface: "#ffffff".to_string(),
            error: "#ef4444".to_string(),
            success: "#10b981".to_string(),
            warning: "#f59e0b".to_string(),
        }
    }
}

impl ThemeColors {
    /// CSS custom property names paired with their values.
    pub fn css_variables(&self) -> [(&'static str, &str); 9] {
        [
            ("--color-primary", self.primary.as_str()),
            ("--color-primary-dark", self.primary_dark.as_str()),
            ("--color-secondary", self.secondary.as_str()),
            ("--color-accent", self.accent.as_str()),
            ("--color-background", self.background.as_str()),
            ("--color-surface", self.surface.as_str()),
            ("--color-error", self.error.as_str()),
            ("--color-success", self.success.as_str()),
            ("--color-warning", self.warning.as_str()),
        ]
    }

    /// Overwrite every colour set in `patch`.
    pub fn apply(&mut self, patch: ThemePatch) {
        let ThemePatch {
            primary,
            primary_dark,
            secondary,
            accent,
            background,
            surface,
            error,
            success,
            warning,
        } = patch;

        let slots = [
            (&mut self.primary, primary),
            (&mut self.primary_dark, primary_dark),
            (&mut self.secondary, secondary),
            (&mut self.accent, accent),
            (&mut self.background, background),
            (&mut self.surface, surface),
            (&mut self.error, error),
            (&mut self.success, success),
            (&mut self.warning, warning),
        ];

        for (slot, value) in slots {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

/// A partial colour update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[expect(missing_docs, reason = "each field mirrors the ThemeColors field of the same name")]
pub struct ThemePatch {
    pub primary: Option<String>,
    pub primary_dark: Option<String>,
    pub secondary: Option<String>,
    pub accent: Option<String>,
    pub background: Option<String>,
    pub surface: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
    pub warning: Option<String>,
}

/// Owns the active theme and persists it after every change.
#[derive(Debug)]
pub struct ThemeStore<S: Storage> {
    colors: ThemeColors,
    storage: S,
}

impl<S: Storage> ThemeStore<S> {
    /// Open the theme, restoring saved colours over the defaults.
    pub fn open(storage: S) -> Self {
        let colors = match storage.get(THEME_STORAGE_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|error| {
                warn!(%error, "discarding persisted theme");
                ThemeColors::default()
            }),
            Ok(None) => ThemeColors::default(),
            Err(error) => {
                warn!(%error, "failed to read theme");
                ThemeColors::default()
            }
        };

        Self { colors, storage }
    }

    /// The active colours.
    pub fn colors(&self) -> &ThemeColors {
        &self.colors
    }

    /// Merge `patch` into the active colours.
    pub fn set_colors(&mut self, patch: ThemePatch) {
        self.colors.apply(patch);
        self.persist();
    }

    /// Restore the default colours.
    pub fn reset(&mut self) {
        self.colors = ThemeColors::default();
        self.persist();
    }

    /// Close the theme, returning the storage backend.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) {
        match serde_json::to_string(&self.colors) {
            Ok(payload) => {
                if let Err(error) = self.storage.set(THEME_STORAGE_KEY, &payload) {
                    warn!(%error, "failed to persist theme");
                }
            }
            Err(error) => warn!(%error, "failed to serialize theme"),
        }
    }
}
