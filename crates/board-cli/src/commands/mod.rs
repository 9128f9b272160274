//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod article;
pub mod comment;
pub mod config;
pub mod hashtag;

use anyhow::{Context as _, Result};
use board_core::article::{ArticleService, ArticleValidator};
use board_core::comment::{CommentService, CommentValidator};
use board_core::config::Config;
use board_core::types::{Author, UserId};
use board_storage::FileSystemStorage;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = ".board/config.toml";

/// board - Discussion board with hashtags and threaded comments
#[derive(Debug, Parser)]
#[command(name = "board")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the board file
    #[arg(long, global = true, env = "BOARD_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Acting user
    #[arg(short, long, global = true, env = "BOARD_USER")]
    pub user: Option<String>,

    /// Nickname shown next to new articles and comments
    #[arg(long, global = true, env = "BOARD_NICKNAME")]
    pub nickname: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write, browse and search articles
    #[command(subcommand)]
    Article(article::ArticleCommand),

    /// Comment on articles
    #[command(subcommand)]
    Comment(comment::CommentCommand),

    /// Browse hashtags
    #[command(subcommand)]
    Hashtag(hashtag::HashtagCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Global settings shared by the command handlers
#[derive(Debug, Clone)]
pub struct Context {
    pub config_path: PathBuf,
    pub data_dir: Option<PathBuf>,
    pub user: Option<String>,
    pub nickname: Option<String>,
}

impl Context {
    fn from_cli(cli: &Cli) -> Self {
        Self {
            config_path: cli
                .config
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)),
            data_dir: cli.data_dir.clone(),
            user: cli.user.clone(),
            nickname: cli.nickname.clone(),
        }
    }

    /// Load the configuration file, defaults when it does not exist
    pub fn config(&self) -> Result<Config> {
        Config::load(&self.config_path).context(format!(
            "Failed to load configuration from {}",
            self.config_path.display()
        ))
    }

    /// Open the board storage
    pub fn storage(&self) -> Result<Arc<FileSystemStorage>> {
        let storage = match &self.data_dir {
            Some(dir) => FileSystemStorage::new(dir),
            None => FileSystemStorage::default_location(),
        }
        .context("Failed to open board storage")?;
        debug!("Using board file {:?}", storage.board_path());
        Ok(Arc::new(storage))
    }

    /// The acting user; required by every write
    pub fn actor(&self) -> Result<UserId> {
        let user = self
            .user
            .as_deref()
            .context("No user given. Pass --user or set BOARD_USER.")?;
        Ok(UserId::new(user)?)
    }

    /// Author stamp for new content written by the acting user
    pub fn author(&self) -> Result<Author> {
        let author = Author::new(self.actor()?);
        Ok(match &self.nickname {
            Some(nickname) => author.with_nickname(nickname),
            None => author,
        })
    }

    pub fn article_service(&self, config: &Config) -> Result<ArticleService<FileSystemStorage>> {
        Ok(ArticleService::with_storage(self.storage()?)
            .with_validator(ArticleValidator::from_config(&config.board)))
    }

    pub fn comment_service(&self, config: &Config) -> Result<CommentService<FileSystemStorage>> {
        Ok(CommentService::with_storage(self.storage()?).with_validator(
            CommentValidator::with_max_length(config.board.max_comment_length),
        ))
    }
}

/// Run the CLI application
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    setup_logging(cli.verbose);

    // Handle color output
    if cli.no_color {
        colored::control::set_override(false);
    }

    let ctx = Context::from_cli(&cli);

    // Dispatch to command handler
    match cli.command {
        Commands::Article(cmd) => article::execute(&ctx, cmd),
        Commands::Comment(cmd) => comment::execute(&ctx, cmd),
        Commands::Hashtag(cmd) => hashtag::execute(&ctx, cmd),
        Commands::Config(cmd) => config::execute(&ctx, cmd),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Ask before a destructive action unless `yes` was given
pub(crate) fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }

    let confirmed = dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    Ok(confirmed)
}
