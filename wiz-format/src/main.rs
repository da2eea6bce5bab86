//! wiz-format - Format the open post for a publishing target

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use libblogwiz::logging::LoggingConfig;
use libblogwiz::{BlogwizError, Config, ContentFormatter, Platform, PublishCoordinator};

#[derive(Parser, Debug)]
#[command(name = "wiz-format")]
#[command(version, about = "Format the open post for a publishing target")]
#[command(long_about = r#"Turn the open post into the payload a publishing target expects.

Tistory and Naver need credentials (see wiz-setup). Custom renders a
self-contained Markdown document and needs none.

EXAMPLES:
    # Payload and metadata for the default platform, as JSON
    wiz-format format

    # Just the Markdown body
    wiz-format format --platform custom --raw

    # Write the payload next to other downloads
    wiz-format format --platform naver --output-dir ~/Downloads

    # Rewrite HTML for a target without touching the post
    echo '<h1>Hi</h1>' | wiz-format convert --platform naver -

OUTPUT FORMATS:
    format   JSON object {platform, content, metadata, success, error?}
    --raw    the payload content only
    convert  the rewritten HTML/Markdown

EXIT CODES:
    0 - Success
    1 - Formatting failed or other error
    2 - Platform credentials are incomplete
    3 - Invalid input (no open post, unknown platform)
"#)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the platform payload for the open post
    Format {
        /// Target platform (tistory, naver, custom)
        #[arg(short, long)]
        platform: Option<String>,

        /// Print only the payload content
        #[arg(long)]
        raw: bool,

        /// Write the payload content to a file in this directory
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Rewrite HTML for a platform
    Convert {
        /// Target platform (tistory, naver, custom)
        #[arg(short, long)]
        platform: String,

        /// HTML file to convert ("-" for stdin)
        #[arg(conflicts_with = "current", required_unless_present = "current")]
        input: Option<PathBuf>,

        /// Convert the open post's content instead of a file
        #[arg(long)]
        current: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    LoggingConfig::from_env(level, cli.verbose).init();

    tracing::debug!("wiz-format started with args: {:?}", cli);

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

    match cli.command {
        Command::Format {
            platform,
            raw,
            output_dir,
        } => {
            let platform = match platform {
                Some(name) => parse_platform(&name)?,
                None => config.defaults.platform,
            };
            let coordinator = PublishCoordinator::from_config(&config);
            let result = coordinator.format(platform)?;

            if !result.success {
                println!("{}", serde_json::to_string_pretty(&result)?);
                bail!(
                    "Formatting for {} failed: {}",
                    platform,
                    result.error.unwrap_or_default()
                );
            }

            if let Some(dir) = output_dir {
                let post = coordinator
                    .current()
                    .context("no open post after formatting")?;
                let path = dir.join(ContentFormatter::download_filename(post, platform));
                std::fs::create_dir_all(&dir)
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
                std::fs::write(&path, &result.content)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("{}", path.display());
            } else if raw {
                println!("{}", result.content);
            } else {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
        }
        Command::Convert {
            platform,
            input,
            current,
        } => {
            let platform = parse_platform(&platform)?;
            let converted = if current {
                PublishCoordinator::from_config(&config).convert_markup(platform)?
            } else {
                let html = match input {
                    Some(path) => read_input(&path)?,
                    None => bail!("No input given"),
                };
                ContentFormatter::convert_markup(&html, platform).map_err(BlogwizError::from)?
            };
            println!("{}", converted);
        }
    }

    Ok(())
}

fn parse_platform(name: &str) -> Result<Platform> {
    name.parse::<Platform>()
        .map_err(|e| BlogwizError::InvalidInput(e.to_string()).into())
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read HTML from stdin")?;
        return Ok(buffer);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
