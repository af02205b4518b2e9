use std::fs;
use std::process::Command;

fn combined_output(output: &std::process::Output) -> String {
    let mut combined = String::new();
    combined.push_str(&String::from_utf8_lossy(&output.stdout));
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    combined
}

fn tabhint_bin() -> &'static str {
    option_env!("CARGO_BIN_EXE_tabhint").expect("tabhint test binary not built")
}

fn tabhint() -> Command {
    let mut cmd = Command::new(tabhint_bin());
    cmd.env_remove("TABHINT_LOGS")
        .env_remove("TABHINT_LOG_CONTENT")
        .env_remove("TABHINT_NO_LOGS");
    cmd
}

#[test]
fn tabhint_help_mentions_name() {
    let output = tabhint().arg("--help").output().expect("run tabhint --help");
    assert!(output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("tabhint"));
    assert!(combined.contains("--toggle-key"));
}

#[test]
fn tabhint_list_tabs_prints_sample_tabs() {
    let output = tabhint()
        .args(["--list-tabs", "--host-latency-ms", "0"])
        .output()
        .expect("run tabhint --list-tabs");
    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 23);
    assert!(stdout.lines().next().unwrap().contains("[pinned] Inbox (3) - Mail"));
    assert!(stdout.contains("Video call"));
}

#[test]
fn tabhint_list_tabs_reads_tabs_file() {
    let path = std::env::temp_dir().join(format!("tabhint_cli_{}.json", std::process::id()));
    fs::write(
        &path,
        r#"[{"id": 10, "title": "Docs"}, {"id": "b", "title": "Board", "pinned": true}]"#,
    )
    .expect("write tabs file");
    let output = tabhint()
        .arg("--list-tabs")
        .arg("--tabs-file")
        .arg(&path)
        .output()
        .expect("run tabhint --tabs-file");
    let _ = fs::remove_file(&path);
    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("[pinned] Board"), "{stdout}");
    assert!(lines[1].contains("Docs"), "{stdout}");
}

#[cfg(unix)]
#[test]
fn tabhint_list_tabs_from_external_host() {
    let script = r#"read line; echo '{"id":0,"items":[{"id":7,"title":"From host","pinned":false}]}'"#;
    let output = tabhint()
        .args(["--list-tabs", "--host-cmd", "sh", "--host-arg", "-c", "--host-arg", script])
        .output()
        .expect("run tabhint --host-cmd");
    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("From host  (id 7)"), "{stdout}");
}

#[test]
fn tabhint_rejects_invalid_configuration() {
    let output = tabhint()
        .args(["--hint-chars", "12"])
        .output()
        .expect("run tabhint --hint-chars");
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("--hint-chars"));

    let output = tabhint()
        .args(["--toggle-key", "esc"])
        .output()
        .expect("run tabhint --toggle-key");
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("--toggle-key"));
}
