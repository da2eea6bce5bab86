//! wiz-post - Write, save, publish and restore the open blog post

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use libblogwiz::logging::LoggingConfig;
use libblogwiz::service::session::{EditorSession, SessionCommand};
use libblogwiz::{BlogwizError, Config, Post, PostEdit, PublishCoordinator};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "wiz-post")]
#[command(version, about = "Write, save, publish and restore the open blog post")]
#[command(long_about = r#"Manage the single open blog post and its save/publish lifecycle.

Every save and publish adds a snapshot to the history (see wiz-history).
Publishing is one-way: a published post stays published.

EXAMPLES:
    # Start a new post
    wiz-post new --title "제주 여행" --content-file draft.html --tag 여행 --tag 제주

    # Change fields of the open post
    wiz-post edit --category 일상 --remove-tag 제주

    # Save a snapshot, then publish
    wiz-post save
    wiz-post publish

    # Show the open post
    wiz-post show --format json

    # Reopen a history entry as a new post
    wiz-post restore 6f1c2d3e-...

    # Edit draft.html in any editor; autosave picks up changes
    wiz-post watch draft.html

EXIT CODES:
    0 - Success
    1 - Error (storage, file access, etc.)
    3 - Invalid input (no open post, unknown history id)
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
    /// Start a new post, replacing the open one
    New {
        #[command(flatten)]
        fields: FieldArgs,

        /// Save right away instead of keeping the post unsaved
        #[arg(long)]
        save: bool,
    },

    /// Change fields of the open post
    Edit {
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Print the open post
    Show {
        /// Output format
        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Save the open post and snapshot it
    Save,

    /// Publish the open post and snapshot it
    Publish,

    /// Reopen a history entry as a new post
    Restore {
        /// History entry id (see wiz-history)
        history_id: String,
    },

    /// Follow a file and autosave its content as the post body
    Watch {
        /// HTML file to follow
        file: PathBuf,

        /// Title for the post
        #[arg(long)]
        title: Option<String>,

        /// How often to check the file, in milliseconds
        #[arg(long, default_value = "500", value_name = "MS")]
        poll_ms: u64,
    },
}

#[derive(Args, Debug, Default)]
struct FieldArgs {
    /// Post title
    #[arg(short, long)]
    title: Option<String>,

    /// Post body (HTML)
    #[arg(short, long, conflicts_with = "content_file")]
    content: Option<String>,

    /// Read the post body from a file ("-" for stdin)
    #[arg(long, value_name = "PATH")]
    content_file: Option<PathBuf>,

    /// Category ("" clears it)
    #[arg(long)]
    category: Option<String>,

    /// Thumbnail URL ("" clears it)
    #[arg(long)]
    thumbnail: Option<String>,

    /// Tag to add (repeatable)
    #[arg(long = "tag", value_name = "TAG")]
    tags: Vec<String>,

    /// Tag to remove (repeatable)
    #[arg(long = "remove-tag", value_name = "TAG")]
    remove_tags: Vec<String>,
}

impl FieldArgs {
    fn into_edit(self) -> Result<PostEdit> {
        let content = match self.content_file {
            Some(path) => Some(read_content(&path)?),
            None => self.content,
        };
        Ok(PostEdit {
            title: self.title,
            content,
            category: self.category,
            thumbnail: self.thumbnail,
            add_tags: self.tags,
            remove_tags: self.remove_tags,
        })
    }
}

fn read_content(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer)
            .context("Failed to read content from stdin")?;
        return Ok(buffer);
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read content from {}", path.display()))
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
    let mut coordinator = PublishCoordinator::from_config(&config);

    match cli.command {
        Command::New { fields, save } => {
            let edit = fields.into_edit()?;
            coordinator.new_post();
            coordinator.edit_current(&edit)?;
            let post = if save {
                coordinator.save_current()?
            } else {
                coordinator.flush()?;
                coordinator.current().cloned().context("no open post after new")?
            };
            println!("{}", post.id);
        }
        Command::Edit { fields } => {
            let edit = fields.into_edit()?;
            if edit.is_empty() {
                return Err(BlogwizError::InvalidInput("Nothing to change".to_string()).into());
            }
            coordinator.edit_current(&edit)?;
            coordinator.flush()?;
            if let Some(post) = coordinator.current() {
                println!("{}", post.id);
            }
        }
        Command::Show { format } => {
            let post = coordinator
                .current()
                .ok_or_else(|| BlogwizError::InvalidInput("No post is open".to_string()))?;
            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(post)?),
                _ => print_post(post),
            }
        }
        Command::Save => {
            let post = coordinator.save_current()?;
            println!("Saved {} ({} history entries)", post.id, coordinator.history().len());
        }
        Command::Publish => {
            let post = coordinator.publish_current()?;
            let published_at = post
                .published_at
                .map(|at| at.to_rfc3339())
                .unwrap_or_default();
            println!("Published {} at {}", post.id, published_at);
        }
        Command::Restore { history_id } => {
            let id = coordinator.restore(&history_id)?.id.clone();
            coordinator.flush()?;
            println!("{}", id);
        }
        Command::Watch {
            file,
            title,
            poll_ms,
        } => {
            watch(coordinator, file, title, poll_ms).await?;
        }
    }

    Ok(())
}

fn print_post(post: &Post) {
    let or_dash = |value: Option<&str>| value.unwrap_or("-").to_string();
    println!("ID:        {}", post.id);
    println!("Title:     {}", post.title);
    println!("Status:    {}", post.status);
    println!("Category:  {}", or_dash(post.category_label()));
    println!("Tags:      {}", if post.tags.is_empty() { "-".to_string() } else { post.tags.join(", ") });
    println!("Thumbnail: {}", or_dash(post.thumbnail_url()));
    println!("Created:   {}", post.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("Updated:   {}", post.updated_at.format("%Y-%m-%d %H:%M:%S"));
    if let Some(published_at) = post.published_at {
        println!("Published: {}", published_at.format("%Y-%m-%d %H:%M:%S"));
    }
    if !post.excerpt.is_empty() {
        println!();
        println!("{}", post.excerpt);
    }
}

async fn watch(
    mut coordinator: PublishCoordinator,
    file: PathBuf,
    title: Option<String>,
    poll_ms: u64,
) -> Result<()> {
    if coordinator.current().is_none() {
        coordinator.new_post();
    }
    if title.is_some() {
        coordinator.edit_current(&PostEdit {
            title,
            ..PostEdit::default()
        })?;
    }

    let (session, tx) = EditorSession::new(coordinator);
    setup_signal_handlers(tx.clone())?;

    let poller = tokio::spawn(poll_file(file.clone(), Duration::from_millis(poll_ms.max(10)), tx));
    info!(file = %file.display(), "watching for changes, Ctrl+C to stop");

    let coordinator = session.run().await;
    poller.abort();

    if let Some(post) = coordinator.current() {
        println!(
            "Stopped. {} ({} history entries)",
            post.id,
            coordinator.history().len()
        );
    }
    Ok(())
}

/// Send an `Edit` every time the file's content changes
async fn poll_file(path: PathBuf, every: Duration, commands: tokio::sync::mpsc::Sender<SessionCommand>) {
    let mut last: Option<String> = None;
    let mut ticker = tokio::time::interval(every);
    loop {
        ticker.tick().await;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) if last.as_deref() != Some(content.as_str()) => {
                last = Some(content.clone());
                let edit = PostEdit {
                    content: Some(content),
                    ..PostEdit::default()
                };
                if commands.send(SessionCommand::Edit(edit)).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => warn!(path = %path.display(), error = %e, "failed to read watched file"),
        }
    }
}

/// Turn SIGINT/SIGTERM into a session shutdown
fn setup_signal_handlers(commands: tokio::sync::mpsc::Sender<SessionCommand>) -> Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM]).context("Signal setup failed")?;

    std::thread::spawn(move || {
        for sig in signals.forever() {
            if sig == SIGINT || sig == SIGTERM {
                info!("Received shutdown signal, saving and stopping...");
                let _ = commands.blocking_send(SessionCommand::Shutdown);
                break;
            }
        }
    });

    Ok(())
}
