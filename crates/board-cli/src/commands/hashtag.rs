//! Hashtag command
//!
//! Browse hashtags and the articles carrying them.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use super::article::{print_page, PagingArgs};
use super::Context;

/// Hashtag subcommands
#[derive(Debug, Subcommand)]
pub enum HashtagCommand {
    /// List all hashtags in use
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List articles carrying a hashtag
    Articles {
        /// Hashtag, with or without the leading '#'
        name: String,

        #[command(flatten)]
        paging: PagingArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Execute the hashtag command
pub fn execute(ctx: &Context, cmd: HashtagCommand) -> Result<()> {
    let config = ctx.config()?;
    let service = ctx.article_service(&config)?;

    match cmd {
        HashtagCommand::List { json } => {
            let names = service.hashtag_names()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&names)?);
                return Ok(());
            }

            if names.is_empty() {
                println!("No hashtags found.");
                return Ok(());
            }

            println!("{}", "Hashtags:".bold().underline());
            for name in names {
                println!("  {}", format!("#{}", name).cyan());
            }
            Ok(())
        }
        HashtagCommand::Articles { name, paging, json } => {
            let page =
                service.search_by_hashtag(&name, paging.request(config.board.page_size))?;
            print_page(&page, &config.pagination.window()?, json)
        }
    }
}
