//! Configuration layering and validation.

use std::num::NonZeroU32;
use tabula::TabulaConfig;
use tabula_database::DatabaseMode;

#[test]
fn test_bundled_defaults() -> anyhow::Result<()> {
    let config = TabulaConfig::from_toml("")?;

    assert_eq!(config.database.mode, DatabaseMode::Local);
    assert_eq!(config.database.local.path.to_string_lossy(), "tabula.db");
    assert_eq!(config.database.statement_timeout_ms, 30_000);
    assert_eq!(config.model.default_model, "gpt-35-turbo");
    assert_eq!(config.model.temperature, Some(0.0));
    assert_eq!(config.pipeline.max_attempts, NonZeroU32::new(3).expect("non-zero"));
    assert_eq!(config.pipeline.generation_timeout_secs, 90);
    assert_eq!(config.bind_addr()?.port(), 8080);
    Ok(())
}

#[test]
fn test_overrides_replace_individual_keys() -> anyhow::Result<()> {
    let config = TabulaConfig::from_toml(
        r#"
        [model]
        default_model = "gpt-4o-mini"
        max_tokens = 512

        [pipeline]
        max_attempts = 5

        [database.local]
        path = "/var/lib/tabula/sales.db"
        "#,
    )?;

    assert_eq!(config.model.default_model, "gpt-4o-mini");
    assert_eq!(config.model.max_tokens, Some(512));
    assert_eq!(config.model.base_url, "https://api.openai.com/v1");
    assert_eq!(config.pipeline.max_attempts.get(), 5);
    assert_eq!(config.pipeline.generation_timeout_secs, 90);
    assert_eq!(
        config.database.local.path.to_string_lossy(),
        "/var/lib/tabula/sales.db"
    );
    Ok(())
}

#[test]
fn test_unknown_mode_is_rejected() {
    let err = TabulaConfig::from_toml("[database]\nmode = \"sqlserver\"").unwrap_err();
    assert!(err.message.contains("parse"), "{err}");
    assert!(err.setting.is_none());
}

#[test]
fn test_zero_attempts_is_rejected() {
    assert!(TabulaConfig::from_toml("[pipeline]\nmax_attempts = 0").is_err());
}

#[test]
fn test_zero_generation_timeout_is_rejected() {
    let err = TabulaConfig::from_toml("[pipeline]\ngeneration_timeout_secs = 0").unwrap_err();
    assert_eq!(err.setting.as_deref(), Some("pipeline.generation_timeout_secs"));
}

#[test]
fn test_bad_bind_is_rejected() {
    let err = TabulaConfig::from_toml("[server]\nbind = \"not an address\"").unwrap_err();
    assert_eq!(err.setting.as_deref(), Some("server.bind"));
    assert!(err.message.contains("not an address"));
}

#[test]
fn test_networked_mode_requires_url() {
    for mode in ["mysql", "postgres"] {
        let err = TabulaConfig::from_toml(&format!("[database]\nmode = \"{mode}\"")).unwrap_err();
        // Without the backend compiled in, the mode itself is the bad setting.
        let setting = err.setting.clone().unwrap_or_default();
        assert!(setting.starts_with("database."), "{err}");
        assert!(err.to_string().contains(mode), "{err}");
    }
}

#[cfg(not(feature = "mysql"))]
#[test]
fn test_mode_without_compiled_backend_is_rejected() {
    let err = TabulaConfig::from_toml(
        "[database]\nmode = \"mysql\"\n[database.mysql]\nurl = \"mysql://u:p@localhost/db\"",
    )
    .unwrap_err();
    assert_eq!(err.setting.as_deref(), Some("database.mode"));
    assert!(err.message.contains("--features mysql"), "{err}");
}

#[test]
fn test_missing_explicit_file_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("nope.toml");
    assert!(TabulaConfig::load(Some(&missing)).is_err());
}

#[test]
fn test_explicit_file_is_layered() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "[pipeline]\nmax_attempts = 7\n")?;

    let config = TabulaConfig::load(Some(&path))?;
    assert_eq!(config.pipeline.max_attempts.get(), 7);
    Ok(())
}
