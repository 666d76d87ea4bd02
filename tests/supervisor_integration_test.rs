#![cfg(unix)]

use acs::{collection, Collection, DockrSettings, Module, ModuleState, Supervised};
use anyhow::Result;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn write_module(root: &Path, dir: &str, config: serde_json::Value) -> Result<()> {
    let module_dir = root.join(dir);
    std::fs::create_dir_all(&module_dir)?;
    std::fs::write(module_dir.join(format!("{}.json", dir)), config.to_string())?;
    Ok(())
}

#[tokio::test]
async fn test_runs_acs_binary_as_module() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_module(
        temp_dir.path(),
        "acs",
        serde_json::json!({
            "name": "acs",
            "cmd": env!("CARGO_BIN_EXE_acs"),
            "args": ["ignored", "--args"]
        }),
    )?;

    let mut modules = Collection::open_dir(temp_dir.path())?;
    assert_eq!(modules.names(), vec!["acs"]);

    modules.run_all().await?;

    let acs = modules.iter().next().unwrap();
    assert_eq!(acs.state(), ModuleState::Exited { code: Some(0) });
    Ok(())
}

#[tokio::test]
async fn test_module_runs_in_its_config_directory() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_module(
        temp_dir.path(),
        "marker",
        serde_json::json!({
            "name": "marker",
            "cmd": "sh",
            "args": ["-c", "pwd > seen_from.txt"]
        }),
    )?;

    let mut module = Module::open(temp_dir.path().join("marker/marker.json"))?;
    module.run().await?;

    let seen = std::fs::read_to_string(temp_dir.path().join("marker/seen_from.txt"))?;
    let expected = std::fs::canonicalize(temp_dir.path().join("marker"))?;
    assert_eq!(std::fs::canonicalize(seen.trim())?, expected);
    Ok(())
}

#[tokio::test]
async fn test_args_are_not_shell_expanded() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let out = temp_dir.path().join("args.txt");
    let script = format!("printf '%s' \"$1\" > '{}'", out.display());

    let mut module = Module::create(
        "echo",
        temp_dir.path(),
        "sh",
        vec!["-c", script.as_str(), "sh", "$HOME; rm -rf *"],
    );
    module.run().await?;

    assert_eq!(std::fs::read_to_string(&out)?, "$HOME; rm -rf *");
    Ok(())
}

#[tokio::test]
async fn test_start_then_stop_all_kills_stragglers() -> Result<()> {
    let mut modules = collection!(
        Module::create("quick", ".", "true", vec![]),
        Module::create("stubborn", ".", "sleep", vec!["30"]),
    );

    modules.start_all().await?;
    let started = Instant::now();
    modules.stop_all_in(Duration::from_millis(200)).await?;

    let states: Vec<ModuleState> = modules.iter().map(Module::state).collect();
    assert_eq!(
        states,
        vec![ModuleState::Exited { code: Some(0) }, ModuleState::Killed]
    );
    assert!(started.elapsed() < Duration::from_secs(10));
    Ok(())
}

#[tokio::test]
async fn test_supervised_trait_drives_module_or_collection() -> Result<()> {
    async fn drive(target: &mut dyn Supervised) -> acs::Result<()> {
        target.run().await
    }

    let mut single = Module::create("single", ".", "true", vec![]);
    drive(&mut single).await?;
    assert_eq!(single.state(), ModuleState::Exited { code: Some(0) });

    let mut batch = collection!(Module::create("batched", ".", "true", vec![]));
    drive(&mut batch).await?;
    assert!(batch
        .iter()
        .all(|m| m.state() == ModuleState::Exited { code: Some(0) }));
    Ok(())
}

#[tokio::test]
async fn test_settings_drive_discovery_and_timeout() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let modules_root = temp_dir.path().join("modules");
    write_module(
        &modules_root,
        "payload",
        serde_json::json!({ "name": "payload", "cmd": "sleep", "args": ["30"] }),
    )?;
    std::fs::rename(
        modules_root.join("payload/payload.json"),
        modules_root.join("payload/payload.module"),
    )?;

    let settings = DockrSettings::from_toml_str(&format!(
        "[supervisor]\nstop_timeout_ms = 100\n\n[discovery]\nmodules_dir = \"{}\"\nconfig_extension = \"module\"\n",
        modules_root.display()
    ))?;

    let mut modules = Collection::load(settings.modules_dir(), settings.config_extension())?;
    assert_eq!(modules.names(), vec!["payload"]);

    modules.start().await?;
    modules.stop_in(settings.stop_timeout()).await?;
    assert_eq!(modules.iter().next().map(Module::state), Some(ModuleState::Killed));
    Ok(())
}
