#![cfg(all(unix, feature = "cli"))]

use anyhow::Result;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn write_module(root: &Path, dir: &str, cmd: &str, args: &[&str]) -> Result<()> {
    let module_dir = root.join(dir);
    std::fs::create_dir_all(&module_dir)?;
    let config = serde_json::json!({ "name": dir, "cmd": cmd, "args": args });
    std::fs::write(module_dir.join("module.json"), config.to_string())?;
    Ok(())
}

fn dockr(cwd: &Path, args: &[&str]) -> Result<std::process::Output> {
    Ok(Command::new(env!("CARGO_BIN_EXE_dockr"))
        .current_dir(cwd)
        .args(args)
        .env_remove("RUST_LOG")
        .output()?)
}

#[test]
fn test_list_prints_discovered_modules() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_module(temp_dir.path(), "acs", env!("CARGO_BIN_EXE_acs"), &[])?;
    write_module(temp_dir.path(), "payload", "sleep", &["5"])?;

    let output = dockr(temp_dir.path(), &["list", "."])?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("acs\t"));
    assert_eq!(lines[1], "payload\tsleep 5");
    Ok(())
}

#[test]
fn test_run_forwards_module_output() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_module(temp_dir.path(), "acs", env!("CARGO_BIN_EXE_acs"), &[])?;

    let output = dockr(temp_dir.path(), &["run"])?;
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout)?,
        "Test ACS program successfully executing!\n"
    );
    Ok(())
}

#[test]
fn test_up_uses_settings_file_timeout() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_module(temp_dir.path().join("modules").as_path(), "sleeper", "sleep", &["30"])?;
    std::fs::write(
        temp_dir.path().join("dockr.toml"),
        "[supervisor]\nstop_timeout_ms = 100\n\n[discovery]\nmodules_dir = \"modules\"\n",
    )?;

    let started = std::time::Instant::now();
    let output = dockr(temp_dir.path(), &["up"])?;
    assert!(output.status.success());
    assert!(started.elapsed() < std::time::Duration::from_secs(10));
    Ok(())
}

#[test]
fn test_missing_modules_exit_code() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let output = dockr(temp_dir.path(), &["run", "."])?;
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8(output.stderr)?.contains("No modules found"));
    Ok(())
}

#[test]
fn test_explicit_settings_file_must_exist() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let output = dockr(temp_dir.path(), &["--settings", "nope.toml", "list"])?;
    assert_eq!(output.status.code(), Some(3));
    Ok(())
}

#[test]
fn test_milestones_logged_without_verbose() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_module(temp_dir.path(), "acs", env!("CARGO_BIN_EXE_acs"), &[])?;

    let output = dockr(temp_dir.path(), &["run", "."])?;
    assert!(output.status.success());

    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("Starting dockr"));
    assert!(stderr.contains("Loaded 1 module(s)"));
    assert!(stderr.contains("acs finished"));
    Ok(())
}

#[test]
fn test_json_logs_are_json_lines() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_module(temp_dir.path(), "acs", env!("CARGO_BIN_EXE_acs"), &[])?;

    let output = dockr(temp_dir.path(), &["--json-logs", "run", "."])?;
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout)?,
        "Test ACS program successfully executing!\n"
    );

    let stderr = String::from_utf8(output.stderr)?;
    let events: Vec<serde_json::Value> = stderr
        .lines()
        .map(serde_json::from_str::<serde_json::Value>)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    assert!(events.iter().any(|event| {
        event["fields"]["message"]
            .as_str()
            .is_some_and(|message| message.starts_with("Loaded 1 module(s)"))
    }));
    Ok(())
}

#[test]
fn test_zero_timeout_override_is_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_module(temp_dir.path(), "sleeper", "sleep", &["30"])?;

    let output = dockr(temp_dir.path(), &["up", ".", "--timeout-ms", "0"])?;
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8(output.stderr)?.contains("--timeout-ms"));
    Ok(())
}
