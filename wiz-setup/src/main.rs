//! wiz-setup - Configure editor preferences, shortcuts and platform credentials

use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::Parser;
use libblogwiz::config::resolve_config_path;
use libblogwiz::logging::LoggingConfig;
use libblogwiz::service::validation::ConfigValidator;
use libblogwiz::types::{AppSettings, Theme};
use libblogwiz::{BlogwizError, Config, Platform, PublishCoordinator};
use serde_json::json;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "wiz-setup")]
#[command(version, about = "Configure editor preferences, shortcuts and platform credentials")]
#[command(long_about = r#"Change settings without prompts. Only the options you pass change.

Editor preferences, shortcuts and credentials live in the archive and
travel with wiz-export/wiz-import. Storage location, default platform
and export directory live in the TOML config file.

EXAMPLES:
    # Tistory credentials
    wiz-setup --tistory-access-token TOKEN --tistory-blog-name myblog

    # Naver credentials
    wiz-setup --naver-client-id ID --naver-client-secret SECRET --naver-blog-id blog

    # Autosave every 10 seconds, dark theme
    wiz-setup --autosave on --autosave-interval 10000 --theme dark

    # Format for Naver unless told otherwise
    wiz-setup --default-platform naver

    # Current settings (secrets masked) and credential status
    wiz-setup --show
    wiz-setup --show --format json

EXIT CODES:
    0 - Success
    1 - Error (config not writable, etc.)
    3 - Invalid input (zero interval or font size)
"#)]
struct Cli {
    /// Tistory access token
    #[arg(long, value_name = "TOKEN", help_heading = "Tistory")]
    tistory_access_token: Option<String>,

    /// Tistory blog name
    #[arg(long, value_name = "NAME", help_heading = "Tistory")]
    tistory_blog_name: Option<String>,

    /// Tistory category id ("" for none)
    #[arg(long, value_name = "ID", help_heading = "Tistory")]
    tistory_category_id: Option<String>,

    /// Naver client id
    #[arg(long, value_name = "ID", help_heading = "Naver")]
    naver_client_id: Option<String>,

    /// Naver client secret
    #[arg(long, value_name = "SECRET", help_heading = "Naver")]
    naver_client_secret: Option<String>,

    /// Naver blog id
    #[arg(long, value_name = "ID", help_heading = "Naver")]
    naver_blog_id: Option<String>,

    /// Turn autosave on or off
    #[arg(long, value_name = "on|off", value_parser = BoolishValueParser::new(), help_heading = "Editor")]
    autosave: Option<bool>,

    /// Milliseconds between autosaves
    #[arg(long, value_name = "MS", help_heading = "Editor")]
    autosave_interval: Option<u64>,

    /// Editor theme (light, dark)
    #[arg(long, help_heading = "Editor")]
    theme: Option<Theme>,

    /// Editor font size
    #[arg(long, value_name = "PX", help_heading = "Editor")]
    font_size: Option<u32>,

    /// Editor font family
    #[arg(long, value_name = "FAMILY", help_heading = "Editor")]
    font_family: Option<String>,

    /// Save shortcut
    #[arg(long, value_name = "KEYS", help_heading = "Shortcuts")]
    shortcut_save: Option<String>,

    /// Publish shortcut
    #[arg(long, value_name = "KEYS", help_heading = "Shortcuts")]
    shortcut_publish: Option<String>,

    /// New-post shortcut
    #[arg(long, value_name = "KEYS", help_heading = "Shortcuts")]
    shortcut_new_post: Option<String>,

    /// Platform wiz-format uses by default
    #[arg(long, value_name = "PLATFORM", help_heading = "Config file")]
    default_platform: Option<Platform>,

    /// Directory exports are written to
    #[arg(long, value_name = "DIR", help_heading = "Config file")]
    export_dir: Option<String>,

    /// Directory the archive is stored in
    #[arg(long, value_name = "DIR", help_heading = "Config file")]
    storage_path: Option<String>,

    /// Print the current settings after applying changes
    #[arg(long)]
    show: bool,

    /// Output format for --show
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Apply settings flags; returns whether anything changed
    fn apply_settings(&self, settings: &mut AppSettings) -> Result<bool> {
        let before = settings.clone();

        let tistory = &mut settings.platforms.tistory;
        set(&mut tistory.access_token, &self.tistory_access_token);
        set(&mut tistory.blog_name, &self.tistory_blog_name);
        set(&mut tistory.category_id, &self.tistory_category_id);

        let naver = &mut settings.platforms.naver;
        set(&mut naver.client_id, &self.naver_client_id);
        set(&mut naver.client_secret, &self.naver_client_secret);
        set(&mut naver.blog_id, &self.naver_blog_id);

        let editor = &mut settings.editor;
        if let Some(enabled) = self.autosave {
            editor.auto_save = enabled;
        }
        if let Some(interval) = self.autosave_interval {
            if interval == 0 {
                return Err(invalid("Autosave interval must be greater than 0"));
            }
            editor.auto_save_interval = interval;
        }
        if let Some(theme) = self.theme {
            editor.theme = theme;
        }
        if let Some(size) = self.font_size {
            if size == 0 {
                return Err(invalid("Font size must be greater than 0"));
            }
            editor.font_size = size;
        }
        set(&mut editor.font_family, &self.font_family);

        let shortcuts = &mut settings.shortcuts;
        set(&mut shortcuts.save, &self.shortcut_save);
        set(&mut shortcuts.publish, &self.shortcut_publish);
        set(&mut shortcuts.new_post, &self.shortcut_new_post);

        Ok(*settings != before)
    }

    /// Apply config-file flags; returns whether anything changed
    fn apply_config(&self, config: &mut Config) -> bool {
        let before = config.clone();
        if let Some(platform) = self.default_platform {
            config.defaults.platform = platform;
        }
        if let Some(dir) = &self.export_dir {
            config.defaults.export_dir = Some(dir.clone());
        }
        set(&mut config.storage.path, &self.storage_path);
        *config != before
    }
}

fn set(field: &mut String, value: &Option<String>) {
    if let Some(value) = value {
        *field = value.clone();
    }
}

fn invalid(message: &str) -> anyhow::Error {
    BlogwizError::InvalidInput(message.to_string()).into()
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    LoggingConfig::from_env(level, cli.verbose).init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<BlogwizError>()
            .map_or(1, BlogwizError::exit_code);
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;

    let config_changed = cli.apply_config(&mut config);
    if config_changed {
        let path = config.save().context("Failed to save configuration")?;
        info!(path = %path.display(), "configuration saved");
        println!("Saved configuration to {}", path.display());
    }

    // storage may have moved, so open it after the config is settled
    let mut coordinator = PublishCoordinator::from_config(&config);
    let mut settings = coordinator.settings().clone();
    let changed = cli.apply_settings(&mut settings)?;
    if changed {
        coordinator.update_settings(settings)?;
        println!("Settings updated");
    }

    if cli.show || !(changed || config_changed) {
        match cli.format.as_str() {
            "json" => print_json(&config, coordinator.settings())?,
            _ => print_text(&config, coordinator.settings())?,
        }
    }

    Ok(())
}

/// First four characters, the rest starred
fn mask(secret: &str) -> String {
    if secret.is_empty() {
        return "(unset)".to_string();
    }
    let visible: String = secret.chars().take(4).collect();
    if visible.chars().count() == secret.chars().count() {
        "****".to_string()
    } else {
        format!("{}****", visible)
    }
}

fn or_unset(value: &str) -> &str {
    if value.is_empty() {
        "(unset)"
    } else {
        value
    }
}

fn print_text(config: &Config, settings: &AppSettings) -> Result<()> {
    let config_path = resolve_config_path()?;
    let editor = &settings.editor;
    let tistory = &settings.platforms.tistory;
    let naver = &settings.platforms.naver;

    println!("Config file:      {}", config_path.display());
    println!("Storage:          {}", config.storage_dir().display());
    println!("Export dir:       {}", config.export_dir().display());
    println!("Default platform: {}", config.defaults.platform);
    println!();
    println!("Editor");
    match editor.autosave_period() {
        Some(period) => println!("  autosave:   on (every {} ms)", period.as_millis()),
        None => println!("  autosave:   off"),
    }
    println!("  theme:      {}", editor.theme);
    println!("  font:       {} {}", editor.font_family, editor.font_size);
    println!();
    println!("Shortcuts");
    println!("  save:       {}", settings.shortcuts.save);
    println!("  publish:    {}", settings.shortcuts.publish);
    println!("  new post:   {}", settings.shortcuts.new_post);
    println!();
    println!("Tistory");
    println!("  accessToken:  {}", mask(&tistory.access_token));
    println!("  blogName:     {}", or_unset(&tistory.blog_name));
    println!("  categoryId:   {}", or_unset(&tistory.category_id));
    println!("Naver");
    println!("  clientId:     {}", or_unset(&naver.client_id));
    println!("  clientSecret: {}", mask(&naver.client_secret));
    println!("  blogId:       {}", or_unset(&naver.blog_id));
    println!();
    println!("Status");
    for validation in ConfigValidator::validate_all(&settings.platforms) {
        if validation.valid {
            println!("  {:<8} ready", validation.platform.as_str());
        } else {
            println!(
                "  {:<8} incomplete (missing: {})",
                validation.platform.as_str(),
                validation.missing.join(", ")
            );
        }
    }
    Ok(())
}

fn print_json(config: &Config, settings: &AppSettings) -> Result<()> {
    let mut masked = settings.clone();
    masked.platforms.tistory.access_token = mask(&settings.platforms.tistory.access_token);
    masked.platforms.naver.client_secret = mask(&settings.platforms.naver.client_secret);

    let status: Vec<_> = ConfigValidator::validate_all(&settings.platforms)
        .into_iter()
        .map(|v| json!({ "platform": v.platform, "valid": v.valid, "missing": v.missing }))
        .collect();

    let report = json!({
        "configFile": resolve_config_path()?.display().to_string(),
        "storage": config.storage_dir().display().to_string(),
        "exportDir": config.export_dir().display().to_string(),
        "defaultPlatform": config.defaults.platform,
        "settings": masked,
        "status": status,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
