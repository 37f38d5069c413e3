use std::{
    io::Write,
    path::Path,
    process::{Command, Stdio},
};

use tempfile::TempDir;

fn play(args: &[&str], script: &str) -> String {
    let mut child = Command::new(env!("CARGO_BIN_EXE_world-of-bits"))
        .args(args)
        .args(["--log", "off", "--view-radius", "1"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to launch world-of-bits");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(script.as_bytes())
        .expect("failed to write script");

    let output = child.wait_with_output().expect("failed to wait for world-of-bits");
    assert!(output.status.success(), "world-of-bits exited with {}", output.status);
    String::from_utf8(output.stdout).expect("output is utf-8")
}

fn save_dir_args(dir: &Path) -> Vec<String> {
    vec!["--save-dir".to_owned(), dir.display().to_string()]
}

#[test]
fn scripted_session_greets_moves_and_quits() {
    let output = play(&["--memory"], "d\nbogus\nquit\nw\n");

    assert!(output.starts_with("Welcome to World of Bits.\n"));
    assert!(output.contains("cell -610315,184948"));
    assert!(output.contains("cell -610314,184948"));
    assert_eq!(output.matches("moved to").count(), 1);
    assert!(output.contains("unrecognised command 'bogus'"));
}

#[test]
fn saved_session_resumes_in_a_new_process() {
    let temp_dir = TempDir::new().unwrap();
    let args = save_dir_args(temp_dir.path());
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let _ = play(&args, "d\nd\n");
    let resumed = play(&args, "quit\n");
    assert!(resumed.contains("cell -610313,184948"));

    let mut fresh_args = args.clone();
    fresh_args.push("--fresh");
    let fresh = play(&fresh_args, "quit\n");
    assert!(fresh.contains("cell -610315,184948"));
}
