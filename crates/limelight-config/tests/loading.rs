//! Tests for layered configuration loading (defaults, limelight.toml, env).

use figment::Jail;
use limelight_config::{ConfigError, LimelightConfig};
use std::path::PathBuf;

#[test]
fn loads_defaults_without_config_file() {
    Jail::expect_with(|jail| {
        let config = LimelightConfig::load(jail.directory()).unwrap();
        assert_eq!(config.root, jail.directory());
        assert_eq!(config.environment, "development");
        assert!(config.gems.is_empty());
        Ok(())
    });
}

#[test]
fn reads_limelight_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "limelight.toml",
            r#"
environment = "production"
import_map = "config/custom_map.json"

[gems]
ui_kit = "vendor/ui_kit"
tools = "/opt/gems/tools"

[css]
module_suffixes = [".module.css", ".scoped.css"]
max_mixin_depth = 8
"#,
        )?;

        let config = LimelightConfig::load(jail.directory()).unwrap();
        let root = jail.directory();

        assert_eq!(config.environment, "production");
        assert_eq!(
            config.import_map,
            Some(root.join("config/custom_map.json"))
        );
        assert_eq!(config.gems["ui_kit"], root.join("vendor/ui_kit"));
        assert_eq!(config.gems["tools"], PathBuf::from("/opt/gems/tools"));
        assert!(config.css.is_module("a.scoped.css"));
        assert_eq!(config.css.max_mixin_depth, 8);
        Ok(())
    });
}

#[test]
fn environment_variables_override_file() {
    Jail::expect_with(|jail| {
        jail.create_file("limelight.toml", "environment = \"staging\"\n")?;
        jail.set_env("LIMELIGHT_ENVIRONMENT", "production");
        jail.set_env("LIMELIGHT_CSS__MAX_MIXIN_DEPTH", "4");

        let config = LimelightConfig::load(jail.directory()).unwrap();
        assert_eq!(config.environment, "production");
        assert_eq!(config.css.max_mixin_depth, 4);
        Ok(())
    });
}

#[test]
fn invalid_toml_is_an_extract_error() {
    Jail::expect_with(|jail| {
        jail.create_file("limelight.toml", "environment = [unclosed")?;

        let err = LimelightConfig::load(jail.directory()).unwrap_err();
        assert!(matches!(err, ConfigError::Extract(_)));
        Ok(())
    });
}

#[test]
fn invalid_gem_name_fails_validation() {
    Jail::expect_with(|jail| {
        jail.create_file("limelight.toml", "[gems]\n\"bad/name\" = \"/gems/x\"\n")?;

        let err = LimelightConfig::load(jail.directory()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGem { .. }));
        Ok(())
    });
}
