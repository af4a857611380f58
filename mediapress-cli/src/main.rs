// mediapress-cli/src/main.rs
//
// Command-line interface for the mediapress conversion pipeline:
// - `convert` runs the in-place compression batch over a vault directory
// - `rollback` restores orphaned temporary files from an interrupted run
// - `init-settings` writes a settings file populated with the defaults

use anyhow::Context;
use clap::{Parser, Subcommand};
use console::style;
use mediapress_core::{
    calculate_size_reduction, format_bytes, process_assets, rollback_assets, CommandFfprobe,
    FsVault, Settings, SidecarSpawner, ToolPaths,
};
use std::path::{Path, PathBuf};
use std::process;

mod progress;

use progress::SpinnerReporter;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Mediapress: batch media compression for document vaults",
    long_about = "Scans a vault directory for image, video and audio attachments, converts \
                  each to the configured target format with ffmpeg, and replaces the \
                  original in place with crash-safe staging."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable detailed logging output")]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every matching attachment in the vault in place
    Convert {
        /// Vault root directory
        #[arg(value_name = "VAULT_DIR")]
        vault: PathBuf,

        /// Settings file (JSON), merged over the defaults
        #[arg(short, long, value_name = "FILE")]
        settings: Option<PathBuf>,
    },

    /// Restore orphaned temporary files left behind by an interrupted run
    Rollback {
        /// Vault root directory
        #[arg(value_name = "VAULT_DIR")]
        vault: PathBuf,

        /// Settings file (JSON), merged over the defaults
        #[arg(short, long, value_name = "FILE")]
        settings: Option<PathBuf>,
    },

    /// Write a settings file populated with the defaults
    InitSettings {
        /// Destination path for the settings file
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let settings = match path {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    settings.validate()?;
    Ok(settings)
}

fn run_convert(vault_dir: &Path, settings_path: Option<&Path>) -> anyhow::Result<()> {
    let settings = load_settings(settings_path)?;
    let vault = FsVault::open(vault_dir)?;

    // Resolve the engine before anything is touched; a missing binary aborts
    // the run with no partial state.
    let tools = ToolPaths::resolve(&settings).context(
        "transcoding engine not available; install ffmpeg/ffprobe or set their paths in the settings file",
    )?;
    let prober = CommandFfprobe::new(&tools.ffprobe);
    let reporter = SpinnerReporter::new();

    let outcomes = process_assets(
        &vault,
        &SidecarSpawner,
        &prober,
        &reporter,
        &settings,
        &tools,
    )?;

    if outcomes.is_empty() {
        println!("No files were converted.");
        return Ok(());
    }

    println!();
    println!("{}", style("Conversion summary").bold());
    println!("----------------------------------------");
    for outcome in &outcomes {
        let reduction = calculate_size_reduction(outcome.input_size, outcome.output_size);
        println!("{}", style(&outcome.file_name).bold());
        println!("  Output:      {} ({})", outcome.output_name, outcome.kind);
        println!("  Input size:  {}", format_bytes(outcome.input_size));
        println!("  Output size: {}", format_bytes(outcome.output_size));
        println!("  Reduced by:  {reduction}%");
    }
    println!("----------------------------------------");
    println!(
        "Successfully converted {} file(s).",
        style(outcomes.len()).green().bold()
    );

    Ok(())
}

fn run_rollback(vault_dir: &Path, settings_path: Option<&Path>) -> anyhow::Result<()> {
    let settings = load_settings(settings_path)?;
    let vault = FsVault::open(vault_dir)?;
    let reporter = SpinnerReporter::new();

    let restored = rollback_assets(&vault, &reporter, &settings)?;

    println!(
        "Restored {} temporary file(s).",
        style(restored).green().bold()
    );
    Ok(())
}

fn run_init_settings(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("{} already exists, refusing to overwrite it", path.display());
    }
    Settings::default()
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote default settings to {}", path.display());
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_level),
    )
    .init();

    let result = match &cli.command {
        Commands::Convert { vault, settings } => run_convert(vault, settings.as_deref()),
        Commands::Rollback { vault, settings } => run_rollback(vault, settings.as_deref()),
        Commands::InitSettings { path } => run_init_settings(path),
    };

    if let Err(e) = result {
        log::error!("{e:?}");
        eprintln!("{} {e:#}", style("Error:").red().bold());
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_convert_basic_args() {
        let cli = Cli::parse_from(["mediapress", "convert", "vault_dir"]);
        match cli.command {
            Commands::Convert { vault, settings } => {
                assert_eq!(vault, PathBuf::from("vault_dir"));
                assert!(settings.is_none());
            }
            _ => panic!("expected convert command"),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn parse_convert_with_settings_file() {
        let cli = Cli::parse_from([
            "mediapress",
            "--verbose",
            "convert",
            "vault",
            "--settings",
            "mediapress.json",
        ]);
        match cli.command {
            Commands::Convert { vault, settings } => {
                assert_eq!(vault, PathBuf::from("vault"));
                assert_eq!(settings, Some(PathBuf::from("mediapress.json")));
            }
            _ => panic!("expected convert command"),
        }
        assert!(cli.verbose);
    }

    #[test]
    fn parse_rollback() {
        let cli = Cli::parse_from(["mediapress", "rollback", "vault"]);
        assert!(matches!(cli.command, Commands::Rollback { .. }));
    }
}
