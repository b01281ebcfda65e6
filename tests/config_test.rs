//! Integration tests for configuration loading.

use std::fs;
use tempfile::tempdir;
use yansa::config::{load_config, load_config_or_default, Config};

#[test]
fn default_config_uses_bundled_rules() {
    let config = Config::default();
    assert!(config.rules.dir.is_none());
    assert_eq!(config.batch.threads, 0);

    let parser = config.build_parser();
    let result = parser.parse("Active Duty - Scene Title", None);
    assert_eq!(result.studio.as_deref(), Some("Active Duty"));
}

#[test]
fn explicit_path_wins_over_defaults() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("custom.toml");
    fs::write(&path, "[batch]\nthreads = 3\n").unwrap();

    let config = load_config_or_default(Some(&path)).unwrap();
    assert_eq!(config.batch.threads, 3);
}

#[test]
fn parser_section_reaches_parser() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("yansa.toml");
    fs::write(
        &path,
        r#"
[parser]
strip_extensions = false
decode_html_entities = false
"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    assert!(!config.parser.strip_extensions);
    assert!(!config.parser.decode_html_entities);

    let parser = config.build_parser();
    let result = parser.parse("Adam &amp; Bruno.mkv", None);
    assert!(result.cleaned.ends_with(".mkv"));
    assert!(result.cleaned.contains("&amp;"));
}

#[test]
fn rules_dir_is_used() {
    let temp = tempdir().unwrap();
    let rules_dir = temp.path().join("rules");
    fs::create_dir(&rules_dir).unwrap();
    fs::write(
        rules_dir.join("studios.json"),
        r#"[{"canonical_name": "Example Films", "aliases": ["examplefilms"]}]"#,
    )
    .unwrap();

    let path = temp.path().join("yansa.toml");
    fs::write(
        &path,
        format!("[rules]\ndir = {:?}\n", rules_dir.to_str().unwrap()),
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    let rules = config.load_rules();
    assert_eq!(rules.studios.len(), 1);
    // Missing tables fall back to empty ones.
    assert!(rules.studio_codes.is_empty());

    let result = config.build_parser().parse("ExampleFilms - Beach Day", None);
    assert_eq!(result.studio.as_deref(), Some("Example Films"));
    assert_eq!(result.title.as_deref(), Some("Beach Day"));
}

#[test]
fn invalid_value_type_is_rejected() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("yansa.toml");
    fs::write(&path, "[batch]\nthreads = \"many\"\n").unwrap();

    let err = load_config(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse config file"));
}
