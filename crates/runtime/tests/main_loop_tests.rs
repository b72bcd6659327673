use std::io::Write;
use std::process::Command;

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pg_pendulum"))
}

#[test]
fn short_training_run_completes() {
    let output = binary()
        .args(["--episodes", "4", "--batch-size", "2", "--max-steps", "20", "--seed", "5"])
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to launch pg_pendulum");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "stdout:\n{stdout}\nstderr:\n{stderr}");
    assert!(stdout.contains("policy updated"), "stdout:\n{stdout}");
    assert!(stdout.contains("training finished"), "stdout:\n{stdout}");
}

#[test]
fn config_file_is_applied() {
    let path = std::env::temp_dir().join(format!("pg_pendulum_cfg_{}.json", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    write!(file, r#"{{ "batch_size": 1, "learning_rate": 0.005 }}"#).unwrap();
    drop(file);

    let output = binary()
        .arg("--config")
        .arg(&path)
        .args(["--episodes", "2", "--max-steps", "10"])
        .output()
        .expect("failed to launch pg_pendulum");
    let _ = std::fs::remove_file(&path);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stdout:\n{stdout}");
    assert_eq!(stdout.matches("policy updated").count(), 2, "stdout:\n{stdout}");
}

#[test]
fn invalid_config_is_rejected() {
    let output = binary()
        .args(["--episodes", "1", "--batch-size", "0"])
        .output()
        .expect("failed to launch pg_pendulum");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("batch_size"), "stderr:\n{stderr}");
}
