//! wiz-export - Write the whole archive to a JSON file

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use libblogwiz::files::LocalFiles;
use libblogwiz::logging::LoggingConfig;
use libblogwiz::service::ExportOutcome;
use libblogwiz::{BlogwizError, Config, PublishCoordinator};

#[derive(Parser, Debug)]
#[command(name = "wiz-export")]
#[command(version, about = "Export posts, history and settings to a JSON archive")]
#[command(long_about = r#"Export the open post, the history, settings and side collections
to one pretty-printed JSON archive that wiz-import can read back.

Without --output the archive is written to the configured export
directory as blog-wizard-<YYYY-MM-DD>.json.

EXAMPLES:
    # Dated file in the export directory
    wiz-export

    # Explicit destination
    wiz-export --output backup.json

EXIT CODES:
    0 - Success
    1 - Error (file not writable, storage unreadable, etc.)
"#)]
struct Cli {
    /// Where to write the archive
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    LoggingConfig::from_env(level, cli.verbose).init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<BlogwizError>()
            .map_or(1, BlogwizError::exit_code);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    let mut files = LocalFiles::new(config.export_dir());
    if let Some(path) = cli.output {
        files = files.with_save_path(path);
    }
    let coordinator = PublishCoordinator::from_config_with_files(&config, files);

    match coordinator.export().await? {
        ExportOutcome::Exported { path } => {
            println!(
                "Exported to {} ({} history entries)",
                path.display(),
                coordinator.history().len()
            );
        }
        ExportOutcome::Canceled => println!("Export canceled"),
    }

    Ok(())
}
