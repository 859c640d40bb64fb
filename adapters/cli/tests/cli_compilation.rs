use std::{fs, path::PathBuf, process::Command};

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("maze-chase-{}-{name}", std::process::id()));
    fs::write(&path, contents).expect("scratch file written");
    path
}

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "maze-chase"])
        .status()
        .expect("failed to invoke cargo check for maze-chase CLI binary");

    assert!(status.success(), "cargo check --bin maze-chase should succeed");
}

#[test]
fn headless_run_prints_banner_and_summary() {
    let level = scratch_file("corridor.level", "4 3\n1 1 1 1\n1 2 0 1\n1 1 1 1\n");
    let output = Command::new(env!("CARGO_BIN_EXE_maze-chase"))
        .arg(&level)
        .args(["--headless", "--adversaries", "0", "--ticks", "60"])
        .args(["--hold", "right"])
        .output()
        .expect("binary runs");
    let _ = fs::remove_file(&level);

    assert!(output.status.success(), "headless run should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Welcome to Maze Chase."), "stdout: {stdout}");
    assert!(stdout.contains("status=Won"), "stdout: {stdout}");
    assert!(stdout.contains("pellets_remaining=0"), "stdout: {stdout}");
}

#[test]
fn malformed_level_exits_with_failure() {
    let level = scratch_file("broken.level", "3 3\n1 1 1\n1 0 0\n1 1 1\n");
    let output = Command::new(env!("CARGO_BIN_EXE_maze-chase"))
        .arg(&level)
        .arg("--headless")
        .output()
        .expect("binary runs");
    let _ = fs::remove_file(&level);

    assert!(!output.status.success(), "a level without a spawn must fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to parse level"), "stderr: {stderr}");
}
