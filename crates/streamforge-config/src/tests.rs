//! Tests for score director configuration.

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        environment_mode = "fast_assert"
        constraint_match_enabled = true

        [constraint_weights]
        "Unassigned shift" = "-1hard/0soft"
        "scheduling/Preference" = "0hard/-5soft"
    "#;

    let config = ScoreDirectorConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.environment_mode, EnvironmentMode::FastAssert);
    assert!(config.constraint_match_enabled);
    assert_eq!(config.constraint_weights.len(), 2);
    assert_eq!(
        config.constraint_weights.get("scheduling/Preference"),
        Some(&"0hard/-5soft".to_string())
    );
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        environment_mode: full_assert
        constraint_weights:
          Unassigned shift: "-1hard/0soft"
    "#;

    let config = ScoreDirectorConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.environment_mode, EnvironmentMode::FullAssert);
    assert!(!config.constraint_match_enabled);
    assert_eq!(config.constraint_weights.len(), 1);
}

#[test]
fn test_defaults_from_empty_document() {
    let config = ScoreDirectorConfig::from_toml_str("").unwrap();
    assert_eq!(config, ScoreDirectorConfig::default());
    assert_eq!(config.environment_mode, EnvironmentMode::NonReproducible);
}

#[test]
fn test_builder() {
    let config = ScoreDirectorConfig::new()
        .with_environment_mode(EnvironmentMode::Reproducible)
        .with_constraint_match_enabled(true)
        .with_constraint_weight("Unassigned shift", "-3");

    assert_eq!(config.environment_mode, EnvironmentMode::Reproducible);
    assert!(config.constraint_match_enabled);
    assert_eq!(config.constraint_weights["Unassigned shift"], "-3");
}

#[test]
fn test_environment_mode_assertions() {
    assert!(!EnvironmentMode::NonReproducible.is_asserted());
    assert!(!EnvironmentMode::Reproducible.is_asserted());
    assert!(EnvironmentMode::FastAssert.is_asserted());
    assert!(!EnvironmentMode::FastAssert.is_fully_asserted());
    assert!(EnvironmentMode::FullAssert.is_fully_asserted());
}

#[test]
fn test_invalid_inputs() {
    assert!(matches!(
        ScoreDirectorConfig::from_toml_str("environment_mode = \"turbo\""),
        Err(ConfigError::Toml(_))
    ));
    assert!(matches!(
        ScoreDirectorConfig::from_yaml_str("environment_mode: [1, 2]"),
        Err(ConfigError::Yaml(_))
    ));
    assert!(matches!(
        ScoreDirectorConfig::from_toml_str("[constraint_weights]\n\"A\" = \"  \""),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_load_from_file() {
    let path = std::env::temp_dir().join(format!(
        "streamforge-config-test-{}.toml",
        std::process::id()
    ));
    std::fs::write(&path, "constraint_match_enabled = true\n").unwrap();

    let config = ScoreDirectorConfig::load(&path).unwrap();
    assert!(config.constraint_match_enabled);

    std::fs::remove_file(&path).unwrap();
    assert!(matches!(
        ScoreDirectorConfig::load(&path),
        Err(ConfigError::Io(_))
    ));
}
