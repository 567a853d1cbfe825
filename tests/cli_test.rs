use std::process::{Command, Output};

fn pcmatrix(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pcmatrix"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

#[test]
fn test_invalid_argument_prints_message_and_fails() {
    let output = pcmatrix(&["0"]);
    let stderr = String::from_utf8(output.stderr).unwrap();

    assert!(!output.status.success());
    assert_eq!(stderr, "pcmatrix: worker thread count must be a positive number\n");
    assert!(output.stdout.is_empty());
}

#[test]
fn test_oversized_mode_fails_before_running() {
    let output = pcmatrix(&["1", "1", "1", "100000000000"]);
    let stderr = String::from_utf8(output.stderr).unwrap();

    assert!(!output.status.success());
    assert!(stderr.starts_with("pcmatrix: invalid matrix mode:"), "{stderr}");
    assert!(output.stdout.is_empty());
}

#[test]
fn test_quiet_run_succeeds() {
    let output = pcmatrix(&["2", "4", "20", "0", "--seed", "3", "--quiet"]);
    let stdout = String::from_utf8(output.stdout).unwrap();

    assert!(output.status.success());
    assert!(stdout.contains("Matrices produced=20"), "{stdout}");
}
