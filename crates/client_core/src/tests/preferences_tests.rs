use super::*;

use anyhow::anyhow;
use async_trait::async_trait;
use storage::MemoryStore;

use crate::{filter::FilterLabels, view::PaperControls};
use shared::{domain::PaperId, error::Notice};

#[derive(Default)]
struct SectionRecorder {
    sections: Vec<(SectionKey, bool)>,
    font: Option<FontSize>,
}

impl PresentationSurface for SectionRecorder {
    fn render_paper_controls(&mut self, _controls: &PaperControls) {}
    fn show_notice(&mut self, _notice: &Notice) {}
    fn show_papers(&mut self, _visible: &[PaperId]) {}
    fn set_match_count(&mut self, _count: usize, _original: usize) {}
    fn set_filter_labels(&mut self, _labels: FilterLabels) {}
    fn set_section_expanded(&mut self, section: SectionKey, expanded: bool) {
        self.sections.push((section, expanded));
    }
    fn apply_font_size(&mut self, size: FontSize) {
        self.font = Some(size);
    }
    fn toggle_abstract(&mut self, _paper_id: &PaperId) {}
}

struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(anyhow!("disk on fire"))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl_days: u32) -> Result<()> {
        Err(anyhow!("disk on fire"))
    }
}

fn sample_prefs() -> ViewPreferences {
    let mut prefs = ViewPreferences::default();
    prefs.set_section_visible(SectionKey::Voted, false);
    prefs.font_size = FontSize::Large;
    prefs
}

#[tokio::test]
async fn load_after_save_returns_same_preferences() {
    let store = PreferenceStore::new(Arc::new(MemoryStore::new()), "coffee_settings", 30);
    let prefs = sample_prefs();

    store.save(&prefs).await.expect("save");
    assert_eq!(store.load().await, Some(prefs));
}

#[tokio::test]
async fn missing_record_is_a_quiet_miss() {
    let store = PreferenceStore::new(Arc::new(MemoryStore::new()), "coffee_settings", 30);
    assert_eq!(store.load().await, None);
}

#[tokio::test]
async fn expired_record_is_a_miss() {
    let store = PreferenceStore::new(Arc::new(MemoryStore::new()), "coffee_settings", 0);
    store.save(&sample_prefs()).await.expect("save");
    assert_eq!(store.load().await, None);
}

#[tokio::test]
async fn store_errors_read_as_miss_but_surface_on_save() {
    let store = PreferenceStore::new(Arc::new(FailingStore), "coffee_settings", 30);
    assert_eq!(store.load().await, None);
    assert!(store.save(&sample_prefs()).await.is_err());
}

#[tokio::test]
async fn out_of_range_ttl_fails_the_save_without_panicking() {
    let store = PreferenceStore::new(Arc::new(MemoryStore::new()), "coffee_settings", u32::MAX);
    assert!(store.save(&sample_prefs()).await.is_err());
    assert_eq!(store.load().await, None);
}

#[tokio::test]
async fn undecodable_record_is_a_miss() {
    let backing = Arc::new(MemoryStore::new());
    backing
        .set("coffee_settings", "{not json", 30)
        .await
        .expect("set");
    let store = PreferenceStore::new(backing, "coffee_settings", 30);
    assert_eq!(store.load().await, None);
}

#[test]
fn encodes_legacy_cookie_shape() {
    let encoded = encode_preferences(&sample_prefs()).expect("encode");
    let value: serde_json::Value = serde_json::from_str(&encoded).expect("json");
    assert_eq!(
        value,
        serde_json::json!({ "view": [true, false, true], "fontsize": "font-size-large" })
    );
}

#[test]
fn decodes_short_view_array_and_unknown_font() {
    let prefs = decode_preferences(r#"{"view":[true],"fontsize":"font-size-huge"}"#)
        .expect("decodes");
    assert!(prefs.is_section_visible(SectionKey::Local));
    assert!(!prefs.is_section_visible(SectionKey::Voted));
    assert!(!prefs.is_section_visible(SectionKey::Other));
    assert_eq!(prefs.font_size, FontSize::Medium);
}

#[test]
fn apply_sets_every_section_and_font() {
    let mut surface = SectionRecorder::default();
    PreferenceStore::apply(&sample_prefs(), &mut surface);
    assert_eq!(
        surface.sections,
        vec![
            (SectionKey::Local, true),
            (SectionKey::Voted, false),
            (SectionKey::Other, true),
        ]
    );
    assert_eq!(surface.font, Some(FontSize::Large));
}

#[tokio::test]
async fn sqlite_backed_store_round_trips() {
    let backing = storage::Storage::new("sqlite::memory:").await.expect("db");
    let settings = ClientSettings::default();
    let store = PreferenceStore::from_settings(Arc::new(backing), &settings);
    assert_eq!(store.key(), "coffee_settings");

    store.save(&sample_prefs()).await.expect("save");
    assert_eq!(store.load().await, Some(sample_prefs()));
}
