use std::collections::HashMap;
use std::path::PathBuf;

use fanta_dashboard::config::{Config, DEFAULT_ADMIN_PASSWORD, DEFAULT_BACKEND_URL};

fn config_from(pairs: &[(&str, &str)]) -> Config {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_point_at_local_backend() {
    let config = config_from(&[]);
    assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
    assert_eq!(config.api_root(), "http://localhost:8000/api");
    assert!(!config.demo);
    assert_eq!(config.demo_password, DEFAULT_ADMIN_PASSWORD);
    assert!(config.log_file.is_none());
}

#[test]
fn backend_url_is_trimmed() {
    let config = config_from(&[("BACKEND_URL", " https://lega.example.com/ ")]);
    assert_eq!(config.backend_url, "https://lega.example.com");
    assert_eq!(config.api_root(), "https://lega.example.com/api");

    let blank = config_from(&[("BACKEND_URL", "   ")]);
    assert_eq!(blank.backend_url, DEFAULT_BACKEND_URL);
}

#[test]
fn demo_flag_accepts_common_truthy_values() {
    for raw in ["1", "true", "TRUE", "yes", "on"] {
        assert!(config_from(&[("DASHBOARD_DEMO", raw)]).demo, "{raw}");
    }
    for raw in ["0", "false", "", "nope"] {
        assert!(!config_from(&[("DASHBOARD_DEMO", raw)]).demo, "{raw}");
    }
}

#[test]
fn log_file_and_password_overrides() {
    let config = config_from(&[
        ("DASHBOARD_LOG", "/tmp/fanta.log"),
        ("ADMIN_PASSWORD", "segreto"),
    ]);
    assert_eq!(config.log_file, Some(PathBuf::from("/tmp/fanta.log")));
    assert_eq!(config.demo_password, "segreto");
    assert!(!format!("{config:?}").contains("segreto"));
}
