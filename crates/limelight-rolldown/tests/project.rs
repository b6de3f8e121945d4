//! End-to-end wiring: a project on disk, configured through limelight.toml.

#![allow(clippy::disallowed_methods)]

use std::fs;

use limelight_config::LimelightConfig;
use limelight_css::path_hash;
use limelight_rolldown::{LimelightPlugin, ResolutionKind};
use tempfile::TempDir;

fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (path, contents) in files {
        let path = dir.path().join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }
    dir
}

fn plugin(dir: &TempDir) -> LimelightPlugin {
    let config = LimelightConfig::load(dir.path()).unwrap();
    LimelightPlugin::from_config(&config).unwrap()
}

#[test]
fn resolves_through_configured_map_and_gems() {
    let dir = project(&[
        ("limelight.toml", "[gems]\nui = \"vendor/ui\"\n"),
        (
            "config/import_map.json",
            r#"{
                "imports": {
                    "ui/": "@rubygems/ui/lib/",
                    "analytics": "unbundle:/vendor/analytics.js"
                }
            }"#,
        ),
        ("vendor/ui/lib/button.js", "export default 1;"),
    ]);
    let plugin = plugin(&dir);
    let importer = dir.path().join("src/main.js");
    let importer = importer.to_str().unwrap();

    let button = plugin.resolve("ui/button.js", Some(importer)).unwrap().unwrap();
    assert_eq!(button.kind, ResolutionKind::RubyGem);
    assert_eq!(button.path, dir.path().join("vendor/ui/lib/button.js").display().to_string());
    assert!(!button.external);

    let analytics = plugin.resolve("analytics", Some(importer)).unwrap().unwrap();
    assert!(analytics.external);
    assert_eq!(analytics.path, dir.path().join("vendor/analytics.js").display().to_string());

    assert!(plugin.resolve("left-pad", Some(importer)).unwrap().is_none());
}

#[test]
fn transforms_css_with_configured_suffixes_and_mixins() {
    let dir = project(&[
        ("limelight.toml", "[css]\nmodule_suffixes = [\".scoped.css\"]\n"),
        ("styles/mixins.css", "@define-mixin title { .title { font-weight: bold; } }\n"),
        (
            "styles/card.scoped.css",
            ".card { @mixin title from url(./mixins.css); }\n:global(.page) { margin: 0; }\n",
        ),
    ]);
    let plugin = plugin(&dir).with_shared_mixins();

    let id = dir.path().join("styles/card.scoped.css");
    let code = plugin.load_css(id.to_str().unwrap()).unwrap().unwrap();

    let hash = path_hash("/styles/card.scoped.css");
    assert_eq!(
        code,
        format!(".card{hash} {{ .title{hash} {{ font-weight: bold; }} }}\n.page {{ margin: 0; }}\n")
    );
}

#[test]
fn broken_import_map_fails_plugin_construction() {
    let dir = project(&[("config/import_map.json", "{ not json")]);
    let config = LimelightConfig::load(dir.path()).unwrap();

    let err = LimelightPlugin::from_config(&config).unwrap_err();
    assert!(format!("{err:#}").contains("import_map.json"), "{err:#}");
}
