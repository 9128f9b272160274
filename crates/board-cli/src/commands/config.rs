//! Config command
//!
//! Manage board configuration.

use anyhow::Result;
use board_core::config::Config;
use clap::Subcommand;
use colored::Colorize;
use std::fs;

use super::{confirm, Context};

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Reset to default configuration
    Reset {
        /// Force reset without confirmation
        #[arg(long)]
        force: bool,
    },

    /// Validate configuration
    Validate,

    /// Print the configuration file path
    Path,
}

/// Execute the config command
pub fn execute(ctx: &Context, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => show_config(ctx, json),
        ConfigCommand::Reset { force } => reset_config(ctx, force),
        ConfigCommand::Validate => validate_config(ctx),
        ConfigCommand::Path => {
            println!("{}", ctx.config_path.display());
            Ok(())
        }
    }
}

fn show_config(ctx: &Context, as_json: bool) -> Result<()> {
    let config = ctx.config()?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{}", "Configuration:".bold().underline());
    if ctx.config_path.exists() {
        println!("{}", ctx.config_path.display().to_string().dimmed());
    } else {
        println!("{}", "(defaults, no configuration file)".dimmed());
    }
    println!();
    println!("{}", toml::to_string_pretty(&config)?);

    Ok(())
}

fn reset_config(ctx: &Context, force: bool) -> Result<()> {
    if !confirm("Reset configuration to defaults?", force)? {
        println!("Reset cancelled.");
        return Ok(());
    }

    // Backup existing
    if ctx.config_path.exists() {
        let backup_path = format!(
            "{}.backup-{}",
            ctx.config_path.display(),
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );
        fs::copy(&ctx.config_path, &backup_path)?;
        println!("{} Backed up to {}", "✓".green(), backup_path);
    }

    Config::default().save(&ctx.config_path)?;
    println!("{} Configuration reset to defaults.", "✓".green());

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    if !ctx.config_path.exists() {
        println!(
            "{} No configuration at {}, defaults apply",
            "ℹ".blue(),
            ctx.config_path.display()
        );
        return Ok(());
    }

    match Config::load(&ctx.config_path) {
        Ok(config) => {
            println!("{} Configuration is valid", "✓".green());
            println!(
                "  page size {}, pagination bar {} link(s){}",
                config.board.page_size,
                config.pagination.bar_length,
                if config.pagination.backfill {
                    ", backfilled"
                } else {
                    ""
                }
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e);
            anyhow::bail!("Invalid configuration at {}", ctx.config_path.display())
        }
    }
}
