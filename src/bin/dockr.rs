use acs::config::settings::{DockrSettings, DEFAULT_SETTINGS_PATH};
use acs::config::Command;
use acs::utils::{
    logger,
    validation::{validate_positive_number, Validate},
};
use acs::{CliConfig, Collection, DockrError, Supervised};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

fn load_settings(config: &CliConfig) -> acs::Result<DockrSettings> {
    let settings = match &config.settings {
        Some(path) => DockrSettings::from_file(path)?,
        None => DockrSettings::from_file_or_default(DEFAULT_SETTINGS_PATH)?,
    };
    settings.validate()?;
    Ok(settings)
}

/// One `name<TAB>cmd args...` line per module.
fn write_listing<W: Write>(out: &mut W, modules: &Collection) -> acs::Result<()> {
    for module in modules {
        writeln!(out, "{}\t{} {}", module.name(), module.cmd(), module.args().join(" "))?;
    }
    out.flush()?;
    Ok(())
}

async fn execute(config: &CliConfig, settings: &DockrSettings) -> acs::Result<()> {
    if let Command::Up {
        timeout_ms: Some(timeout_ms),
        ..
    } = &config.command
    {
        validate_positive_number("--timeout-ms", *timeout_ms, 1)?;
    }

    let path = config
        .command
        .path()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(settings.modules_dir()));

    let mut modules = Collection::load(&path, settings.config_extension())?;
    tracing::info!("Loaded {} module(s) from {}", modules.len(), path.display());

    match &config.command {
        Command::Run { .. } => {
            modules.run().await?;
            for module in &modules {
                tracing::info!("{} finished: {:?}", module.name(), module.state());
            }
        }
        Command::Up { timeout_ms, .. } => {
            let timeout = timeout_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| settings.stop_timeout());
            modules.start().await?;
            tracing::info!("Started {}, stopping within {:?} each", modules.names().join(", "), timeout);
            modules.stop_in(timeout).await?;
            for module in &modules {
                tracing::info!("{} stopped: {:?}", module.name(), module.state());
            }
        }
        Command::List { .. } => {
            let stdout = std::io::stdout();
            write_listing(&mut stdout.lock(), &modules)?;
        }
    }

    Ok(())
}

fn report(e: &DockrError) -> ! {
    tracing::error!(
        "❌ dockr failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code().max(1));
}

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting dockr");
    tracing::debug!("CLI config: {:?}", config);

    let settings = match load_settings(&config) {
        Ok(settings) => settings,
        Err(e) => report(&e),
    };

    if let Err(e) = execute(&config, &settings).await {
        report(&e);
    }
}
