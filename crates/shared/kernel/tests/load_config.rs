use std::fs;
use std::path::Path;
use vreg_kernel::config::{load_config, load_config_with_env};
use vreg_kernel::domain::config::AppConfig;

#[test]
fn file_values_override_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("server.toml");
    fs::write(
        &path,
        r#"
[server]
port = 9100

[policy]
open_weekdays = ["fri"]
free_hours = 3

[[policy.windows]]
start = "08:00"
end = "12:00"
"#,
    )
    .unwrap();

    let cfg: AppConfig = load_config(Some(&path)).unwrap();
    assert_eq!(cfg.server.port, 9100);
    assert_eq!(cfg.policy.windows.len(), 1);
    assert_eq!(cfg.policy.free_hours, Some(3));
    assert_eq!(cfg.registration.timeout_seconds, 10);
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config::<AppConfig>(Some(dir.path().join("absent.toml"))).unwrap_err();
    assert_eq!(err.kind(), "config");
    assert!(err.to_string().contains("Failed to build config"));
}

#[test]
fn malformed_section_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("server.toml");
    fs::write(&path, "[server]\nport = \"not a port\"\n").unwrap();

    let err = load_config::<AppConfig>(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("Failed to deserialize config"));
}

fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
}

#[test]
fn prefixed_variables_override_nested_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("server.toml");
    fs::write(&path, "[admin]\nsecret = \"from-file\"\n\n[registration]\ntimeout_seconds = 10\n")
        .unwrap();

    let cfg: AppConfig = load_config_with_env(
        Some(&path),
        vars(&[
            ("VREG__ADMIN__SECRET", "from-env"),
            ("VREG__REGISTRATION__TIMEOUT_SECONDS", "3"),
            ("VREG__POLICY__FREE_HOURS", "2"),
        ]),
    )
    .unwrap();

    assert_eq!(cfg.admin.secret, "from-env");
    assert_eq!(cfg.registration.timeout_seconds, 3);
    assert_eq!(cfg.policy.free_hours, Some(2));
    assert_eq!(cfg.server.port, 8501);
}

#[test]
fn unprefixed_variables_are_ignored() {
    let cfg: AppConfig = load_config_with_env(
        None::<&Path>,
        vars(&[("ADMIN__SECRET", "x"), ("VREG_ADMIN_SECRET", "y"), ("VREG_CONFIG", "z")]),
    )
    .unwrap();

    assert_eq!(cfg.admin.secret, "admin1234");
}

#[test]
fn invalid_override_is_a_deserialize_error() {
    let result: Result<AppConfig, _> =
        load_config_with_env(None::<&Path>, vars(&[("VREG__SERVER__PORT", "not-a-port")]));
    let err = result.unwrap_err();
    assert!(err.to_string().contains("Failed to deserialize config"));
}
