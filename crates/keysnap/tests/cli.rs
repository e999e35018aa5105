use std::path::PathBuf;
use std::process::Command;

/// Writes `content` to a per-test file in the temp directory.
fn temp_config(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "keysnap-cli-{}-{name}.toml",
        std::process::id()
    ));
    std::fs::write(&path, content).expect("failed to write temp config");
    path
}

#[test]
fn help_exits_successfully() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_keysnap"));
    cmd.arg("--help");

    // Act
    let output = cmd.output().expect("failed to execute keysnap");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("window snapping"));
    assert!(stdout.contains("check-config"));
}

#[test]
fn version_exits_successfully() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_keysnap"));
    cmd.arg("--version");

    // Act
    let output = cmd.output().expect("failed to execute keysnap");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("keysnap"));
}

#[test]
fn check_config_accepts_valid_file() {
    // Arrange
    let path = temp_config(
        "valid",
        "[snap]\nkey = \"rctrl\"\npresses = 2\n\n[explorer]\nmode = \"repeated\"\n",
    );
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_keysnap"));
    cmd.args(["check-config", "--file"]).arg(&path);

    // Act
    let output = cmd.output().expect("failed to execute keysnap");
    let _ = std::fs::remove_file(&path);

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("rctrl (0xA3) x2"));
    assert!(stdout.contains("every poll"));
    assert!(stdout.contains("Configuration is valid."));
}

#[test]
fn check_config_rejects_inconsistent_values() {
    // Arrange
    let path = temp_config("invalid", "[snap]\npresses = 1\n");
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_keysnap"));
    cmd.args(["check-config", "--file"]).arg(&path);

    // Act
    let output = cmd.output().expect("failed to execute keysnap");
    let _ = std::fs::remove_file(&path);

    // Assert
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("snap.presses must be at least 2"));
}

#[test]
fn check_config_reports_malformed_toml() {
    // Arrange
    let path = temp_config("malformed", "[snap\npresses = 3\n");
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_keysnap"));
    cmd.args(["check-config", "--file"]).arg(&path);

    // Act
    let output = cmd.output().expect("failed to execute keysnap");
    let _ = std::fs::remove_file(&path);

    // Assert
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Error:"));
}

#[test]
fn check_config_reports_missing_file() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_keysnap"));
    cmd.args(["check-config", "--file", "does-not-exist.toml"]);

    // Act
    let output = cmd.output().expect("failed to execute keysnap");

    // Assert
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does-not-exist.toml"));
}

#[test]
fn help_lists_daemon_commands() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_keysnap"));
    cmd.arg("--help");

    // Act
    let output = cmd.output().expect("failed to execute keysnap");

    // Assert
    let stdout = String::from_utf8_lossy(&output.stdout);
    for name in ["start", "stop", "status", "reset-marks", "run", "debug"] {
        assert!(stdout.contains(name), "missing {name} in help");
    }
}

#[cfg(not(windows))]
#[test]
fn daemon_commands_are_windows_only() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_keysnap"));
    cmd.arg("status");

    // Act
    let output = cmd.output().expect("failed to execute keysnap");

    // Assert
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("only available on Windows"));
}
