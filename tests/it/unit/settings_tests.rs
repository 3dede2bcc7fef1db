//! Unit tests for persisted settings.

use funnel_deck::chart::StalePolicy;
use funnel_deck::data::ColorPolicy;
use funnel_deck::deck::NavigationPolicy;
use funnel_deck::settings::{FunnelSettings, SettingsError, default_settings_path};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_defaults() {
    let settings = FunnelSettings::default();

    assert_eq!(settings.vertical_breakpoint, 768.0);
    assert_eq!(settings.animation_duration_ms, 1000);
    assert_eq!((settings.default_width, settings.default_height), (600.0, 400.0));
    assert_eq!(settings.container_prefix, "funnel-");
    assert_eq!(settings.colors, ColorPolicy::Palette);
    assert_eq!(settings.navigation, NavigationPolicy::AlwaysReinit);
    assert_eq!(settings.stale_resolutions, StalePolicy::DiscardStale);
    assert_eq!(settings.source_layout().path_for("x", funnel_deck::types::SourceFormat::Csv), "data/csv/x.csv");
}

#[test]
fn test_save_and_load_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested/settings.json");

    let settings = FunnelSettings {
        data_root: PathBuf::from("/srv/deck"),
        vertical_breakpoint: 900.0,
        colors: ColorPolicy::Random { seed: Some(7) },
        navigation: NavigationPolicy::ReinitOnHorizontal,
        stale_resolutions: StalePolicy::LastWriteWins,
        ..Default::default()
    };
    settings.save(&path).unwrap();

    let loaded = FunnelSettings::load(&path).unwrap();
    assert_eq!(loaded, settings);

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"reinit_on_horizontal\""));
    assert!(raw.contains("\"last_write_wins\""));
}

#[test]
fn test_load_missing_file() {
    let dir = tempdir().unwrap();
    let result = FunnelSettings::load(&dir.path().join("absent.json"));
    assert!(matches!(result, Err(SettingsError::Io { .. })));
}

#[test]
fn test_load_invalid_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{"vertical_breakpoint": "wide"}"#).unwrap();

    assert!(matches!(FunnelSettings::load(&path), Err(SettingsError::Json { .. })));
}

#[test]
fn test_default_settings_path() {
    if let Some(path) = default_settings_path() {
        assert!(path.ends_with("funnel-deck/settings.json"));
    }
}
