use std::process::Command;

use openarm_apps::{TrackingConfig, DESCRIPTION_ENV_NAME};

fn command(dir: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_openarm_pd_tracking"));
    cmd.current_dir(dir)
        .env_remove(DESCRIPTION_ENV_NAME)
        .env("RUST_LOG", "info");
    cmd
}

#[test]
fn no_description_exits_with_1() {
    let dir = tempfile::tempdir().unwrap();
    let output = command(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("openarm_bimanual.xml"), "{stderr}");
    assert!(stderr.contains("openarm.xml"), "{stderr}");
}

#[test]
fn missing_xml_exits_with_1() {
    let dir = tempfile::tempdir().unwrap();
    let output = command(dir.path())
        .args(["--xml", "no_such_arm.xml"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no_such_arm.xml"), "{stderr}");
}

#[test]
fn invalid_value_exits_with_1() {
    let dir = tempfile::tempdir().unwrap();
    let output = command(dir.path()).arg("--dt=-1").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("dt"));
}

#[test]
fn huge_dt_exits_with_1() {
    let dir = tempfile::tempdir().unwrap();
    let output = command(dir.path()).arg("--dt=1e20").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("dt must be"));
}

#[test]
fn show_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let output = command(dir.path())
        .arg("--show-default-config")
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: TrackingConfig = toml::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    assert_eq!(parsed, TrackingConfig::default());
}

#[test]
fn show_config_schema() {
    let dir = tempfile::tempdir().unwrap();
    let output = command(dir.path())
        .arg("--show-config-schema")
        .output()
        .unwrap();
    assert!(output.status.success());
    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(schema["properties"]["amplitude"].is_object());
}

#[test]
fn description_is_logged_before_loading() {
    let dir = tempfile::tempdir().unwrap();
    let model = dir.path().join("openarm_mujoco/v1/openarm.xml");
    std::fs::create_dir_all(model.parent().unwrap()).unwrap();
    std::fs::write(&model, "<mujoco/>").unwrap();
    let output = command(dir.path())
        .args(["--headless", "--duration", "0"])
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Loading description"), "{stdout}");
    assert!(stdout.contains("openarm.xml"), "{stdout}");
    if cfg!(not(feature = "mujoco")) {
        assert_eq!(output.status.code(), Some(1));
    }
}
