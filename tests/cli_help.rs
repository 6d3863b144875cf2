use std::process::Command;

#[test]
fn test_help_mentions_bare_invocation() {
    let bin = env!("CARGO_BIN_EXE_provis");

    let output = Command::new(bin).arg("--help").output().unwrap();

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Run 'provis' without arguments to provision the current directory."),
        "help output should mention the bare invocation; got:\n{}",
        stdout
    );
    assert!(stdout.contains("provision"));
    assert!(stdout.contains("check"));
}
