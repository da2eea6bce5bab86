//! wiz-import - Replace local state with a JSON archive

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use libblogwiz::files::LocalFiles;
use libblogwiz::logging::LoggingConfig;
use libblogwiz::service::ImportOutcome;
use libblogwiz::{BlogwizError, Config, PublishCoordinator};

#[derive(Parser, Debug)]
#[command(name = "wiz-import")]
#[command(version, about = "Import posts, history and settings from a JSON archive")]
#[command(long_about = r#"Import an archive written by wiz-export (or the desktop app).

Settings and history are replaced by the file's. The first post in the
file, if any, becomes the open post; otherwise the open post is kept.
A file that cannot be read or parsed changes nothing.

EXAMPLES:
    wiz-import backup.json

    # Check what was imported
    wiz-import backup.json && wiz-history --stats

EXIT CODES:
    0 - Success (including no file given)
    1 - Error (file missing, not a valid archive, etc.)
"#)]
struct Cli {
    /// Archive to import
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

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
    if let Some(path) = cli.file {
        files = files.with_open_path(path);
    }
    let mut coordinator = PublishCoordinator::from_config_with_files(&config, files);

    match coordinator.import().await? {
        ImportOutcome::Imported {
            path,
            history_count,
            has_post,
        } => {
            println!("Imported {}", path.display());
            println!("  history entries: {}", history_count);
            match coordinator.current().filter(|_| has_post) {
                Some(post) => println!("  open post: {} ({})", post.id, post.title),
                None => println!("  open post: unchanged"),
            }
        }
        ImportOutcome::Canceled => println!("Import canceled"),
    }

    Ok(())
}
