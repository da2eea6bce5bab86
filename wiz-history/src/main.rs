use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use libblogwiz::logging::LoggingConfig;
use libblogwiz::{BlogwizError, Config, HistoryEntry, PostStatus, PublishCoordinator};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "wiz-history")]
#[command(version, about = "Browse and prune save/publish history")]
#[command(long_about = r#"Browse and prune the save/publish history, newest first.

At most 100 entries are kept; the oldest drop off as new ones arrive.
Restore an entry as a new post with `wiz-post restore <ID>`.

EXAMPLES:
    # Show last 20 entries (default)
    wiz-history

    # Only published snapshots
    wiz-history --status published

    # Search titles
    wiz-history --search "제주"

    # Counts by status
    wiz-history --stats

    # JSON output for scripting
    wiz-history --format json | jq '.[] | .title'

    # Full snapshot, including content
    wiz-history show 6f1c2d3e-...

    # Delete an entry
    wiz-history delete 6f1c2d3e-...

OUTPUT FORMATS:
    text  - Human-readable, one entry per block (default)
    json  - JSON array (complete data structure)
    jsonl - JSON lines, one object per line (streaming-friendly)

EXIT CODES:
    0 - Success (including empty results and deleting an unknown id)
    1 - Error (storage unreadable, etc.)
    3 - Invalid input (unknown id for show)
"#)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Filter by status (draft, published)
    #[arg(short, long, value_name = "STATUS")]
    status: Option<PostStatus>,

    /// Search entry titles
    #[arg(long, value_name = "TERM")]
    #[arg(help = "Show entries whose title contains this text (case-insensitive)")]
    search: Option<String>,

    /// Maximum number of entries to return
    #[arg(short, long, default_value = "20", value_name = "N")]
    limit: usize,

    /// Output format
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    #[arg(value_parser = ["text", "json", "jsonl"])]
    format: String,

    /// Print counts by status instead of entries
    #[arg(long)]
    stats: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one entry with its content
    Show {
        /// History entry id
        id: String,
    },

    /// Delete one entry
    Delete {
        /// History entry id
        id: String,
    },
}

/// List row: everything but the content
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryRow<'a> {
    id: &'a str,
    post_id: &'a str,
    title: &'a str,
    status: PostStatus,
    timestamp: String,
}

impl<'a> From<&'a HistoryEntry> for HistoryRow<'a> {
    fn from(entry: &'a HistoryEntry) -> Self {
        Self {
            id: &entry.id,
            post_id: &entry.post_id,
            title: &entry.title,
            status: entry.status,
            timestamp: entry.timestamp.to_rfc3339(),
        }
    }
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    LoggingConfig::from_env(level, args.verbose).init();

    tracing::debug!("wiz-history started with args: {:?}", args);

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<BlogwizError>()
            .map_or(1, BlogwizError::exit_code);
        std::process::exit(code);
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let mut coordinator = PublishCoordinator::from_config(&config);

    match args.command {
        Some(Command::Show { id }) => {
            let entry = coordinator.history().get(&id).ok_or_else(|| {
                BlogwizError::InvalidInput(format!("History entry not found: {}", id))
            })?;
            match args.format.as_str() {
                "json" | "jsonl" => println!("{}", serde_json::to_string_pretty(entry)?),
                _ => print_entry(entry),
            }
        }
        Some(Command::Delete { id }) => {
            if coordinator.delete(&id)? {
                println!("Deleted {}", id);
            } else {
                println!("No history entry {}", id);
            }
        }
        None if args.stats => {
            let stats = coordinator.history().stats();
            match args.format.as_str() {
                "json" | "jsonl" => println!("{}", serde_json::to_string(&stats)?),
                _ => {
                    println!("Total:     {}", stats.total);
                    println!("Drafts:    {}", stats.drafts);
                    println!("Published: {}", stats.published);
                }
            }
        }
        None => {
            let search = args.search.as_deref().map(str::to_lowercase);
            let rows: Vec<HistoryRow> = coordinator
                .history()
                .list(args.status)
                .into_iter()
                .filter(|entry| {
                    search
                        .as_deref()
                        .map_or(true, |term| entry.title.to_lowercase().contains(term))
                })
                .take(args.limit)
                .map(HistoryRow::from)
                .collect();
            print_rows(&rows, &args.format)?;
        }
    }

    Ok(())
}

fn print_rows(rows: &[HistoryRow], format: &str) -> Result<()> {
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(rows)?),
        "jsonl" => {
            for row in rows {
                println!("{}", serde_json::to_string(row)?);
            }
        }
        _ => {
            if rows.is_empty() {
                println!("No history entries.");
                return Ok(());
            }
            for row in rows {
                let title = if row.title.is_empty() { "(untitled)" } else { row.title };
                println!("{} [{}] {}", row.timestamp, row.status, title);
                println!("  id: {}  post: {}", row.id, row.post_id);
                println!();
            }
        }
    }
    Ok(())
}

fn print_entry(entry: &HistoryEntry) {
    println!("ID:        {}", entry.id);
    println!("Post:      {}", entry.post_id);
    println!("Title:     {}", entry.title);
    println!("Status:    {}", entry.status);
    println!("Timestamp: {}", entry.timestamp.to_rfc3339());
    println!();
    println!("{}", entry.content);
}
