use punchkit_settings::{JobConfig, SettingsError};

#[test]
fn test_json_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("job.json");

    let mut config = JobConfig::default();
    config.machine.tube_length = 400.0;
    config.generation.random_seed = 42;
    config.save_to_file(&path).unwrap();

    let loaded = JobConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_toml_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("job.toml");

    let mut config = JobConfig::default();
    config.machine.needle_rows = 2;
    config.machine.needle_row_spacing = 4;
    config.kinematics.angular_acceleration = 180.0;
    config.save_to_file(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("[machine]"));
    assert!(text.contains("[[generation.density_classes]]"));

    let loaded = JobConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_load_rejects_out_of_range_parameters() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("job.toml");
    std::fs::write(&path, "[machine]\ninner_diameter = 500.0\nouter_diameter = 510.0\n").unwrap();

    let err = JobConfig::load_from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::Validation(_)));
    assert_eq!(err.field(), Some("inner_diameter"));
}

#[test]
fn test_save_refuses_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("job.json");

    let mut config = JobConfig::default();
    config.machine.punch_depth = 20.0;
    assert!(config.save_to_file(&path).is_err());
    assert!(!path.exists());
}

#[test]
fn test_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("job.yaml");
    std::fs::write(&path, "machine: {}").unwrap();

    assert!(matches!(
        JobConfig::load_from_file(&path),
        Err(SettingsError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_malformed_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("job.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(
        JobConfig::load_from_file(&path),
        Err(SettingsError::Json(_))
    ));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = JobConfig::load_from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, SettingsError::Io(_)));
}

#[test]
fn test_load_rejects_mismatched_cut_marker() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("job.toml");
    std::fs::write(&path, "[generation]\ncut_pause_code = 0\n").unwrap();

    let err = JobConfig::load_from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::InvalidSetting { .. }));
    assert_eq!(err.field(), Some("kinematics.cut_marker_code"));
}

#[test]
fn test_load_rejects_layout_that_fails_generation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("job.json");
    std::fs::write(&path, r#"{"machine": {"volumetric_density": 45}}"#).unwrap();

    let err = JobConfig::load_from_file(&path).unwrap_err();
    assert_eq!(err.field(), Some("machine.substep_count"));
}
