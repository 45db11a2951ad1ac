//! Configuration loading and CLI definitions.

mod cli;
mod defaults;
mod loader;
mod types;
mod validate;

pub use cli::{CliOverrides, apply_overrides};
pub use loader::{ConfigError, load_config, load_or_default};
pub use types::*;
pub use validate::validate_config;

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;

    fn write_tmp(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_tmp(
            &dir,
            "warden.toml",
            r#"
[store]
users_path = "/var/lib/warden/users.txt"
strict_persistence = true

[server]
listen = "0.0.0.0:8080"

[logging]
level = "debug"
"#,
        );
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.store.users_path, "/var/lib/warden/users.txt");
        assert_eq!(cfg.store.sessions_path, "sessions.txt");
        assert!(cfg.store.strict_persistence);
        assert_eq!(cfg.server.listen, "0.0.0.0:8080");
        assert_eq!(cfg.server.base_path, "/api/peoples");
        assert_eq!(cfg.logging.level.as_deref(), Some("debug"));
        validate_config(&cfg).unwrap();
    }

    #[test]
    fn load_jsonc_with_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_tmp(
            &dir,
            "warden.jsonc",
            r#"{
  // where users live
  "store": { "users_path": "u.txt", "sessions_path": "s.txt" },
  "metrics": { "listen": "127.0.0.1:9100" }
}"#,
        );
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.store.users_path, "u.txt");
        assert_eq!(cfg.metrics.listen.as_deref(), Some("127.0.0.1:9100"));
    }

    #[test]
    fn load_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_tmp(
            &dir,
            "warden.yaml",
            "server:\n  base_path: /people\nlogging:\n  format: json\n",
        );
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.server.base_path, "/people");
        assert_eq!(cfg.logging.format.as_deref(), Some("json"));
    }

    #[test]
    fn unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_tmp(&dir, "warden.ini", "x=1");
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::UnsupportedFormat)
        ));
    }

    #[test]
    fn explicit_missing_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(
            load_or_default(Some(&path)),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn overrides_apply() {
        let mut cfg = Config::default();
        let overrides = CliOverrides {
            users_path: Some("a.txt".into()),
            strict_persistence: Some(true),
            listen: Some("0.0.0.0:1".into()),
            log_format: Some("compact".into()),
            ..Default::default()
        };
        apply_overrides(&mut cfg, &overrides);
        assert_eq!(cfg.store.users_path, "a.txt");
        assert_eq!(cfg.store.sessions_path, "sessions.txt");
        assert!(cfg.store.strict_persistence);
        assert_eq!(cfg.server.listen, "0.0.0.0:1");
        assert_eq!(cfg.logging.format.as_deref(), Some("compact"));
    }

    #[test]
    fn strict_persistence_flag_without_value() {
        let overrides = CliOverrides::parse_from(["warden", "--strict-persistence"]);
        assert_eq!(overrides.strict_persistence, Some(true));
        let overrides = CliOverrides::parse_from(["warden", "--strict-persistence", "false"]);
        assert_eq!(overrides.strict_persistence, Some(false));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut cfg = Config::default();
        validate_config(&cfg).unwrap();

        cfg.store.sessions_path = cfg.store.users_path.clone();
        assert!(validate_config(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.server.listen = "not-an-addr".into();
        assert!(validate_config(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.server.base_path = "api/".into();
        assert!(validate_config(&cfg).is_err());
        cfg.server.base_path = "/api/".into();
        assert!(validate_config(&cfg).is_err());
        cfg.server.base_path = "/".into();
        validate_config(&cfg).unwrap();

        let mut cfg = Config::default();
        cfg.logging.format = Some("xml".into());
        assert!(validate_config(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.logging.output = Some("file".into());
        assert!(validate_config(&cfg).is_err());
    }
}
