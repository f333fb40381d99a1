// tests/cli.rs — Integration tests for the cvcl binary surface.
//
// The GPU round-trip test needs an OpenCL GPU and is #[ignore]d so the
// suite passes on machines without one; run it with `cargo test -- --ignored`.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn cvcl(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cvcl"))
        .args(args)
        .output()
        .expect("failed to spawn cvcl")
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("cvcl-cli-test-{}-{}", std::process::id(), name))
}

#[test]
fn no_arguments_exits_one_with_usage() {
    let out = cvcl(&[]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Usage"), "stderr was: {}", stderr);
}

#[test]
fn unexpected_extra_argument_exits_one_with_usage() {
    let out = cvcl(&["one.rgba", "two.rgba"]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Usage"), "stderr was: {}", stderr);
}

#[test]
fn missing_input_file_exits_one_with_open_error() {
    let out = cvcl(&["/no/such/cvcl-input.rgba"]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("failed to open /no/such/cvcl-input.rgba"),
        "stderr was: {}",
        stderr
    );
}

#[test]
fn undersized_input_file_exits_one() {
    let path = temp_path("short.rgba");
    fs::write(&path, vec![0u8; 1024]).unwrap();

    let out = cvcl(&[path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("expected at least"), "stderr was: {}", stderr);

    fs::remove_file(&path).unwrap();
}

#[test]
fn help_exits_zero() {
    let out = cvcl(&["--help"]);
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Usage"), "stdout was: {}", stdout);
}

/// Full identity-copy round trip on a real OpenCL GPU: 720x480 RGBA in,
/// identical bytes out, three timing lines and the success message.
#[test]
#[ignore = "requires an OpenCL GPU"]
fn identity_copy_round_trip() {
    let input = temp_path("source.rgba");
    let output = temp_path("target.rgba");

    let pixels: Vec<u8> = (0..720 * 480 * 4).map(|i| (i % 251) as u8).collect();
    fs::write(&input, &pixels).unwrap();

    let out = cvcl(&[
        input.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
    ]);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(
        out.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    for label in ["write image", "kernel", "read image"] {
        assert!(
            stdout.lines().any(|l| l.starts_with(&format!("Task {} - ", label))
                && l.ends_with(" usec.")),
            "missing timing line for {}: {}",
            label,
            stdout
        );
    }
    assert!(stdout.contains("Completed successfully."));

    let copied = fs::read(&output).unwrap();
    assert_eq!(copied, pixels);

    fs::remove_file(&input).unwrap();
    fs::remove_file(&output).unwrap();
}
