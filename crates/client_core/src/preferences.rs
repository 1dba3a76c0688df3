//! Persisted view configuration (section visibility and abstract font size).

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shared::domain::{FontSize, SectionKey, ViewPreferences};
use storage::KeyValueStore;
use tracing::{debug, warn};

use crate::{config::ClientSettings, view::PresentationSurface};

/// Stored shape: `{"view":[local, voted, other], "fontsize":"font-size-medium"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredSettings {
    view: Vec<bool>,
    fontsize: String,
}

impl From<&ViewPreferences> for StoredSettings {
    fn from(prefs: &ViewPreferences) -> Self {
        Self {
            view: SectionKey::ALL
                .into_iter()
                .map(|section| prefs.is_section_visible(section))
                .collect(),
            fontsize: prefs.font_size.control_id().to_string(),
        }
    }
}

impl From<StoredSettings> for ViewPreferences {
    fn from(stored: StoredSettings) -> Self {
        let mut prefs = ViewPreferences::default();
        for (index, section) in SectionKey::ALL.into_iter().enumerate() {
            // A short array means the missing sections were never shown.
            prefs.set_section_visible(section, stored.view.get(index).copied().unwrap_or(false));
        }
        if let Some(size) = FontSize::from_control_id(&stored.fontsize) {
            prefs.font_size = size;
        }
        prefs
    }
}

pub fn encode_preferences(prefs: &ViewPreferences) -> Result<String> {
    serde_json::to_string(&StoredSettings::from(prefs)).context("failed to encode view preferences")
}

pub fn decode_preferences(raw: &str) -> Option<ViewPreferences> {
    serde_json::from_str::<StoredSettings>(raw)
        .map(ViewPreferences::from)
        .ok()
}

pub struct PreferenceStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
    ttl_days: u32,
}

impl PreferenceStore {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>, ttl_days: u32) -> Self {
        Self {
            store,
            key: key.into(),
            ttl_days,
        }
    }

    pub fn from_settings(store: Arc<dyn KeyValueStore>, settings: &ClientSettings) -> Self {
        Self::new(store, settings.preference_key.clone(), settings.preference_ttl_days)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Total overwrite of the stored record, refreshing its expiry.
    pub async fn save(&self, prefs: &ViewPreferences) -> Result<()> {
        let encoded = encode_preferences(prefs)?;
        self.store
            .set(&self.key, &encoded, self.ttl_days)
            .await
            .with_context(|| format!("failed to persist view preferences under '{}'", self.key))
    }

    /// `None` means "keep defaults": nothing stored, expired, unreadable or
    /// undecodable records all count as a miss.
    pub async fn load(&self) -> Option<ViewPreferences> {
        let raw = match self.store.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("preferences: no stored record key={}", self.key);
                return None;
            }
            Err(err) => {
                warn!("preferences: store read failed key={} err={err:#}", self.key);
                return None;
            }
        };

        let decoded = decode_preferences(&raw);
        if decoded.is_none() {
            warn!("preferences: ignoring undecodable record key={}", self.key);
        }
        decoded
    }

    /// Expands or collapses every section and applies the font size.
    pub fn apply(prefs: &ViewPreferences, surface: &mut dyn PresentationSurface) {
        for section in SectionKey::ALL {
            surface.set_section_expanded(section, prefs.is_section_visible(section));
        }
        surface.apply_font_size(prefs.font_size);
    }
}

#[cfg(test)]
#[path = "tests/preferences_tests.rs"]
mod tests;
