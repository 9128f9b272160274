//! Comment command
//!
//! Add, edit, delete and list comments on articles.

use anyhow::{Context as _, Result};
use board_core::comment::CommentBuilder;
use board_core::types::{ArticleId, CommentId};
use clap::Subcommand;
use colored::Colorize;

use super::{confirm, Context};

/// Comment subcommands
#[derive(Debug, Subcommand)]
pub enum CommentCommand {
    /// Comment on an article
    Add {
        /// Article ID
        article_id: u64,

        /// Comment text
        #[arg(long)]
        content: String,

        /// Reply to this comment
        #[arg(long)]
        reply_to: Option<u64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit your comment
    Edit {
        /// Comment ID
        id: u64,

        /// New comment text
        #[arg(long)]
        content: String,
    },

    /// Delete your comment and its replies
    Delete {
        /// Comment ID
        id: u64,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },

    /// List the comments of an article
    List {
        /// Article ID
        article_id: u64,

        /// Oldest first without nesting
        #[arg(long)]
        flat: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Execute the comment command
pub fn execute(ctx: &Context, cmd: CommentCommand) -> Result<()> {
    let config = ctx.config()?;
    let service = ctx.comment_service(&config)?;

    match cmd {
        CommentCommand::Add {
            article_id,
            content,
            reply_to,
            json,
        } => {
            let actor = ctx.actor()?;
            let draft = CommentBuilder::new(ArticleId(article_id), ctx.author()?)
                .content(content)
                .parent(reply_to.map(CommentId))
                .build()?;
            let comment = service
                .add(&actor, draft)
                .context(format!("Failed to comment on article {}", article_id))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&comment)?);
            } else {
                println!(
                    "{} Added comment {} to article {}",
                    "✓".green(),
                    comment.id.to_string().cyan(),
                    article_id
                );
            }
            Ok(())
        }
        CommentCommand::Edit { id, content } => {
            let actor = ctx.actor()?;
            service
                .edit(&actor, CommentId(id), content)
                .context(format!("Failed to edit comment {}", id))?;
            println!("{} Updated comment {}", "✓".green(), id);
            Ok(())
        }
        CommentCommand::Delete { id, yes } => {
            let actor = ctx.actor()?;
            if !confirm(&format!("Delete comment {} and its replies?", id), yes)? {
                println!("Delete cancelled.");
                return Ok(());
            }

            let removed = service
                .delete(&actor, CommentId(id))
                .context(format!("Failed to delete comment {}", id))?;
            println!(
                "{} Deleted {} comment(s)",
                "✓".green(),
                removed.len()
            );
            Ok(())
        }
        CommentCommand::List {
            article_id,
            flat,
            json,
        } => {
            let article_id = ArticleId(article_id);

            if flat {
                let comments = service.list(article_id)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&comments)?);
                    return Ok(());
                }
                if comments.is_empty() {
                    println!("No comments yet.");
                }
                for comment in &comments {
                    let parent = comment
                        .parent_comment_id
                        .map(|p| format!(" ↳{}", p))
                        .unwrap_or_default();
                    println!(
                        "  [{}{}] {}: {}",
                        comment.id.to_string().dimmed(),
                        parent.dimmed(),
                        comment.author.display_name().green(),
                        comment.content
                    );
                }
                return Ok(());
            }

            let thread = service.thread(article_id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&thread.roots)?);
                return Ok(());
            }
            if thread.roots.is_empty() {
                println!("No comments yet.");
            }
            for root in &thread.roots {
                for (depth, comment) in root.walk() {
                    println!(
                        "{}[{}] {}: {}",
                        "  ".repeat(depth + 1),
                        comment.id.to_string().dimmed(),
                        comment.author.display_name().green(),
                        comment.content
                    );
                }
            }
            for problem in &thread.excluded {
                eprintln!("  {} {}", "⚠".yellow(), problem);
            }
            Ok(())
        }
    }
}
