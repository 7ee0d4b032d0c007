use std::path::PathBuf;

use openarm_apps::TrackingConfig;
use openarm_control::PacingMode;

#[test]
fn verify_sample_configs() {
    let files = vec![
        "config/openarm_pd_tracking.toml",
        "config/openarm_dual_sweep.toml",
        "config/openarm_full_sweep.toml",
    ];
    for f in files {
        let result = TrackingConfig::try_new(f);
        assert!(result.is_ok(), "{:?} {:?}", f, result);
        let config = result.unwrap();
        assert!(config.validate().is_ok(), "{:?}", f);
        assert_eq!(
            config.description_path,
            Some(PathBuf::from("config/../../openarm_mujoco/v1/openarm_bimanual.xml"))
        );
        let ser_result = toml::to_string(&config);
        assert!(ser_result.is_ok(), "{:?} {:?}", f, ser_result);
    }
}

#[test]
fn dual_sweep_settings() {
    let config = TrackingConfig::try_new("config/openarm_dual_sweep.toml").unwrap();
    assert!(config.alternate_phase);
    assert_eq!(config.pacing, PacingMode::Deadline);
    assert_eq!(config.duration, Some(30.0));
    let scales = config.amplitude_scales.unwrap();
    assert_eq!(scales.len(), 16);
    assert_eq!(scales[7], 0.02);
}

#[test]
fn full_sweep_settings() {
    let config = TrackingConfig::try_new("config/openarm_full_sweep.toml").unwrap();
    assert_eq!(config.sweep_segment, Some(7.0));
    assert!(config.amplitude_scales.is_none());
    assert!(!config.alternate_phase);
}

#[test]
fn ser_default_config() {
    let s = toml::to_string(&TrackingConfig::default()).unwrap();
    let parsed: TrackingConfig = toml::from_str(&s).unwrap();
    assert_eq!(parsed, TrackingConfig::default());
}

#[test]
fn missing_config_file() {
    let result = TrackingConfig::try_new("config/does_not_exist.toml");
    assert!(matches!(result, Err(openarm_apps::Error::NoFile(..))));
}
