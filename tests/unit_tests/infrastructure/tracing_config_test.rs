use medingest::infrastructure::observability::TracingConfig;

#[test]
fn given_default_config_when_created_then_identifies_the_crate() {
    let config = TracingConfig::default();

    assert_eq!(config.app_name, "medingest");
    assert!(!config.environment.is_empty());
    assert_eq!(config.level, "info");
}

#[test]
fn given_level_when_building_default_directive_then_applies_to_crate_too() {
    let config = TracingConfig {
        level: "DEBUG".to_string(),
        ..TracingConfig::default()
    };

    assert_eq!(config.default_directive(), "debug,medingest=debug");
}
