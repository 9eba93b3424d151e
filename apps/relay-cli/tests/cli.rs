use std::io::Write;
use std::process::{Command, Stdio};

fn demo(name: &str) -> String {
    format!("{}/../../demos/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn relay_cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_relay-cli"))
}

#[test]
fn trace_lists_every_throw() {
    let output = relay_cli()
        .args(["trace", &demo("square.txt")])
        .output()
        .expect("failed to run relay-cli trace");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1: 1 -> 5"));
    assert!(stdout.contains("9: 3 -> 10"));
    assert!(stdout.contains("GAME OVER! Final Throws: 9 | Last Player: 10"));
}

#[test]
fn run_without_waiting_reaches_the_end() {
    let output = relay_cli()
        .args(["run", "--no-wait", "--speed", "100", &demo("square.txt")])
        .output()
        .expect("failed to run relay-cli run");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("GAME OVER! Final Throws: 9 | Last Player: 10"));
    assert!(stdout.contains("Active: 0/10"));
}

#[test]
fn run_reads_stdin_and_prints_json() {
    let mut child = relay_cli()
        .args(["run", "--no-wait", "--speed", "60", "--json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn relay-cli run");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(b"1 2 0 0 0 5 N 1")
        .expect("failed to write input");
    let output = child.wait_with_output().expect("relay-cli did not finish");
    assert!(output.status.success());

    let snapshot: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is a JSON snapshot");
    assert_eq!(snapshot["throws"], 1);
    assert_eq!(snapshot["running"], false);
    assert_eq!(snapshot["outcome"]["final_holder"], 2);
}

#[test]
fn malformed_input_fails_with_context() {
    let mut child = relay_cli()
        .args(["trace"])
        .stdin(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn relay-cli trace");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(b"1 1 0 0 UP 1")
        .expect("failed to write input");
    let output = child.wait_with_output().expect("relay-cli did not finish");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("parsing input"));
}

#[test]
fn trace_handles_coordinates_at_the_i64_limits() {
    let mut child = relay_cli()
        .args(["trace"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn relay-cli trace");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(b"1 2 -2 0 9223372036854775807 0 W 1")
        .expect("failed to write input");
    let output = child.wait_with_output().expect("relay-cli did not finish");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1: 1 -> 2"));
    assert!(stdout.contains("GAME OVER! Final Throws: 1 | Last Player: 2"));
}

#[test]
fn rejects_out_of_range_speed() {
    let output = relay_cli()
        .args(["run", "--speed", "150", &demo("square.txt")])
        .output()
        .expect("failed to run relay-cli");
    assert!(!output.status.success());
}
