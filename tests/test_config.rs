use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use webserver::config::{Config, IoErrorPolicy};

#[test]
fn test_config_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.server.host, "0.0.0.0");
    assert_eq!(cfg.server.port, 1701);
    assert_eq!(cfg.files.root, PathBuf::from("."));
    assert_eq!(cfg.limits.max_header_bytes, 8192);
    assert_eq!(cfg.limits.read_timeout(), Duration::from_secs(30));
    assert_eq!(cfg.io_error_policy, IoErrorPolicy::CloseConnection);
}

#[test]
fn test_config_empty_yaml_is_default() {
    let cfg = Config::from_yaml_str("").unwrap();
    assert_eq!(cfg.server.port, 1701);
}

#[test]
fn test_config_partial_yaml_keeps_other_defaults() {
    let yaml = r#"
server:
  port: 8080
files:
  root: /srv/www
limits:
  write_timeout_ms: 500
io_error_policy: terminate
"#;
    let cfg = Config::from_yaml_str(yaml).unwrap();

    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.server.host, "0.0.0.0");
    assert_eq!(cfg.files.root, PathBuf::from("/srv/www"));
    assert_eq!(cfg.limits.write_timeout(), Duration::from_millis(500));
    assert_eq!(cfg.limits.file_chunk_size, 8192);
    assert_eq!(cfg.io_error_policy, IoErrorPolicy::Terminate);
}

#[test]
fn test_config_invalid_yaml() {
    assert!(Config::from_yaml_str("server: [1, 2").is_err());
    assert!(Config::from_yaml_str("io_error_policy: explode").is_err());
}

#[test]
fn test_config_env_overrides() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("WEBSERVER_HOST", "127.0.0.1"),
        ("WEBSERVER_PORT", "9000"),
        ("WEBSERVER_ROOT", "/tmp/site"),
    ]);

    let mut cfg = Config::default();
    cfg.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()))
        .unwrap();

    assert_eq!(cfg.server.host, "127.0.0.1");
    assert_eq!(cfg.server.port, 9000);
    assert_eq!(cfg.files.root, PathBuf::from("/tmp/site"));
}

#[test]
fn test_config_invalid_port_override() {
    let mut cfg = Config::default();
    let result = cfg.apply_env_overrides(|k| (k == "WEBSERVER_PORT").then(|| "http".to_string()));

    assert!(result.is_err());
}

#[test]
fn test_config_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("webserver.yaml");
    std::fs::write(&path, "server:\n  max_port_attempts: 3\n").unwrap();

    let cfg = Config::load(Some(&path)).unwrap();
    assert_eq!(cfg.server.max_port_attempts, 3);
}

#[test]
fn test_config_load_missing_file() {
    let path = PathBuf::from("/definitely/not/here.yaml");
    assert!(Config::load(Some(&path)).is_err());
}
