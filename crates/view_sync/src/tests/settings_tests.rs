use std::collections::HashMap;

use super::*;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_match_the_four_up_viewer() {
    let settings = Settings::default();
    assert_eq!(settings.slice_views.len(), 3);
    assert_eq!(settings.foreground_opacity, 0.5);
    assert_eq!(settings.startup_layout, ViewLayout::FourUp);
    assert_eq!(settings.required_modules[1], "DICOMPatcher");
    assert_eq!(settings.auto_contour_suffix, " - AutoContour");
}

#[test]
fn file_values_override_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("viewer.toml");
    fs::write(
        &path,
        r#"
slice_views = ["Red", "Green"]
foreground_opacity = 0.3
startup_layout = "conventional"
required_modules = ["Data"]
"#,
    )
    .expect("write");

    let settings = load_settings(Some(&path)).expect("settings");

    assert_eq!(
        settings.slice_views,
        vec![SliceViewName::from("Red"), SliceViewName::from("Green")]
    );
    assert_eq!(settings.foreground_opacity, 0.3);
    assert_eq!(settings.startup_layout, ViewLayout::Conventional);
    assert_eq!(settings.required_modules, vec!["Data".to_string()]);
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = load_settings(Some(&dir.path().join("nope.toml"))).expect_err("missing");
    assert!(matches!(err, SettingsError::Read { .. }));
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("viewer.toml");
    fs::write(&path, "foreground_opacity = \"half\"").expect("write");
    let err = load_settings(Some(&path)).expect_err("malformed");
    assert!(matches!(err, SettingsError::Parse { .. }));
}

#[test]
fn env_overrides_apply_and_bad_values_are_ignored() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        env(&[
            ("VIEWER__SLICE_VIEWS", "Red, Yellow ,,Green,Compare1"),
            ("VIEWER__FOREGROUND_OPACITY", "lots"),
            ("VIEWER__LAYOUT", "tabbed"),
            ("VIEWER__REQUIRED_MODULES", "Data,SampleData"),
        ]),
    );
    assert_eq!(settings.slice_views.len(), 4);
    assert_eq!(settings.foreground_opacity, 0.5);
    assert_eq!(settings.startup_layout, ViewLayout::FourUp);
    assert_eq!(settings.required_modules, vec!["Data", "SampleData"]);
}

#[test]
fn opacity_is_clamped() {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings, env(&[("VIEWER__FOREGROUND_OPACITY", "1.7")]));
    assert_eq!(settings.foreground_opacity, 1.0);
}
