use super::{load_settings_from, parse_origins, Settings};

use std::{collections::HashMap, time::Duration};

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

#[test]
fn defaults_listen_on_port_5000_with_fixed_origins() {
    let settings = load_settings_from(None, env_of(&[]));
    assert_eq!(settings.port, 5000);
    assert_eq!(settings.bind_addr(), "0.0.0.0:5000");
    assert_eq!(
        settings.allowed_origins,
        Settings::default().allowed_origins
    );
    assert_eq!(settings.summarizer_timeout(), Some(Duration::from_secs(120)));
}

#[test]
fn port_env_overrides_default() {
    let settings = load_settings_from(None, env_of(&[("PORT", "8080")]));
    assert_eq!(settings.port, 8080);
}

#[test]
fn prefixed_env_beats_bare_env_and_file() {
    let file = r#"
        port = 7000
        summarizer_program = "python3"
    "#;
    let settings = load_settings_from(
        Some(file),
        env_of(&[("PORT", "8080"), ("APP__PORT", "9090")]),
    );
    assert_eq!(settings.port, 9090);
    assert_eq!(settings.summarizer_program, "python3");
}

#[test]
fn file_values_override_defaults() {
    let file = r#"
        allowed_origins = ["https://example.com", "http://localhost:8000"]
        summarizer_script = "server/inference.py"
        summarizer_timeout_secs = 0
    "#;
    let settings = load_settings_from(Some(file), env_of(&[]));
    assert_eq!(
        settings.allowed_origins,
        vec!["https://example.com", "http://localhost:8000"]
    );
    assert_eq!(settings.summarizer_script, "server/inference.py");
    assert_eq!(settings.summarizer_timeout(), None);
}

#[test]
fn invalid_port_keeps_previous_value() {
    let settings = load_settings_from(Some("port = \"abc\""), env_of(&[]));
    assert_eq!(settings.port, 5000);
}

#[test]
fn unparseable_file_is_ignored() {
    let settings = load_settings_from(Some("port = = 1"), env_of(&[("PORT", "6000")]));
    assert_eq!(settings.port, 6000);
}

#[test]
fn origins_are_normalised_and_invalid_ones_dropped() {
    assert_eq!(
        parse_origins("http://localhost:3000/, not a url , https://app.example.com"),
        vec!["http://localhost:3000", "https://app.example.com"]
    );
}

#[test]
fn script_path_is_passed_through_unresolved() {
    assert_eq!(Settings::default().summarizer_script, "inference.py");
    let settings = load_settings_from(
        None,
        env_of(&[("SUMMARIZER_SCRIPT", "/opt/summary/inference.py")]),
    );
    assert_eq!(settings.summarizer_script, "/opt/summary/inference.py");
}
