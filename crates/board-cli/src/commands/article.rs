//! Article command
//!
//! Write, browse and search articles.

use anyhow::{Context as _, Result};
use board_core::article::{Article, ArticleDraft, ArticleUpdate, SearchType};
use board_core::comment::CommentNode;
use board_core::hashtag::SweepReport;
use board_core::pagination::{Page, PageRequest, PaginationWindow};
use board_core::types::ArticleId;
use clap::{Subcommand, ValueEnum};
use colored::Colorize;

use super::{confirm, Context};

/// Article subcommands
#[derive(Debug, Subcommand)]
pub enum ArticleCommand {
    /// Write a new article
    Create {
        /// Article title
        #[arg(long)]
        title: String,

        /// Article body; `#words` become hashtags
        #[arg(long)]
        content: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit your article
    Update {
        /// Article ID
        id: u64,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New body
        #[arg(long)]
        content: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete your article and its comments
    Delete {
        /// Article ID
        id: u64,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },

    /// Show an article with its comments
    Show {
        /// Article ID
        id: u64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List articles, newest first
    List {
        #[command(flatten)]
        paging: PagingArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search articles
    Search {
        /// Search keyword; blank lists everything
        keyword: String,

        /// Field to search
        #[arg(long, value_enum, default_value_t = SearchBy::Title)]
        by: SearchBy,

        #[command(flatten)]
        paging: PagingArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Searchable article fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SearchBy {
    Title,
    Content,
    UserId,
    Nickname,
    Hashtag,
}

impl From<SearchBy> for SearchType {
    fn from(by: SearchBy) -> Self {
        match by {
            SearchBy::Title => SearchType::Title,
            SearchBy::Content => SearchType::Content,
            SearchBy::UserId => SearchType::UserId,
            SearchBy::Nickname => SearchType::Nickname,
            SearchBy::Hashtag => SearchType::Hashtag,
        }
    }
}

/// Page selection shared by listings
#[derive(Debug, Clone, clap::Args)]
pub struct PagingArgs {
    /// Page number, starting at 1
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Articles per page (defaults to board.page_size)
    #[arg(long)]
    pub size: Option<usize>,
}

impl PagingArgs {
    pub fn request(&self, default_size: usize) -> PageRequest {
        PageRequest::new(
            self.page.saturating_sub(1),
            self.size.unwrap_or(default_size),
        )
    }
}

/// Execute the article command
pub fn execute(ctx: &Context, cmd: ArticleCommand) -> Result<()> {
    let config = ctx.config()?;
    let service = ctx.article_service(&config)?;
    let window = config.pagination.window()?;

    match cmd {
        ArticleCommand::Create {
            title,
            content,
            json,
        } => {
            let actor = ctx.actor()?;
            let draft = ArticleDraft::new(title, content, ctx.author()?);
            let article = service.create(&actor, draft)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&article)?);
            } else {
                println!(
                    "{} Created article {}",
                    "✓".green(),
                    article.id.to_string().cyan()
                );
                print_hashtags(&article);
            }
            Ok(())
        }
        ArticleCommand::Update {
            id,
            title,
            content,
            json,
        } => {
            let actor = ctx.actor()?;
            let update = ArticleUpdate { title, content };
            if update.is_empty() {
                anyhow::bail!("Nothing to update. Pass --title and/or --content.");
            }

            let outcome = service
                .update(&actor, ArticleId(id), update)
                .context(format!("Failed to update article {}", id))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("{} Updated article {}", "✓".green(), id.to_string().cyan());
                print_hashtags(&outcome.article);
                print_sweep(&outcome.sweep);
            }
            Ok(())
        }
        ArticleCommand::Delete { id, yes } => {
            let actor = ctx.actor()?;
            let article = service
                .get(ArticleId(id))
                .context(format!("Article '{}' not found", id))?;

            if !confirm(&format!("Delete article '{}'?", article.title), yes)? {
                println!("Delete cancelled.");
                return Ok(());
            }

            let sweep = service.delete(&actor, ArticleId(id))?;
            println!("{} Deleted article {}", "✓".green(), id);
            print_sweep(&sweep);
            Ok(())
        }
        ArticleCommand::Show { id, json } => {
            let view = service
                .get_with_comments(ArticleId(id))
                .context(format!("Article '{}' not found", id))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
                return Ok(());
            }

            let article = &view.article;
            println!("{}", article.title.bold().underline());
            println!(
                "{} {} · {}",
                "by".dimmed(),
                article.author.display_name().green(),
                article
                    .created_at()
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
                    .dimmed()
            );
            println!();
            println!("{}", article.content);
            println!();
            print_hashtags(article);
            println!();

            println!("{} ({})", "Comments".bold(), view.comment_count());
            for root in &view.comments {
                print_thread(root);
            }
            for problem in &view.excluded_comments {
                println!("  {} {}", "⚠".yellow(), problem.dimmed());
            }
            Ok(())
        }
        ArticleCommand::List { paging, json } => {
            let page = service.list(paging.request(config.board.page_size))?;
            print_page(&page, &window, json)
        }
        ArticleCommand::Search {
            keyword,
            by,
            paging,
            json,
        } => {
            let page = service.search(
                by.into(),
                &keyword,
                paging.request(config.board.page_size),
            )?;
            print_page(&page, &window, json)
        }
    }
}

fn print_hashtags(article: &Article) {
    if article.hashtags.is_empty() {
        return;
    }
    let tags: Vec<String> = article
        .hashtag_names()
        .into_iter()
        .map(|name| format!("#{}", name))
        .collect();
    println!("  Hashtags: {}", tags.join(" ").cyan());
}

fn print_sweep(sweep: &SweepReport) {
    if !sweep.deleted.is_empty() {
        println!(
            "  {} Removed {} unused hashtag(s)",
            "ℹ".blue(),
            sweep.deleted.len()
        );
    }
    for (id, reason) in &sweep.failed {
        eprintln!(
            "  {} Could not remove hashtag {}: {}",
            "⚠".yellow(),
            id,
            reason
        );
    }
}

fn print_thread(root: &CommentNode) {
    for (depth, comment) in root.walk() {
        let indent = "  ".repeat(depth + 1);
        let marker = if depth == 0 { "•" } else { "↳" };
        println!(
            "{}{} [{}] {}: {}",
            indent,
            marker,
            comment.id.to_string().dimmed(),
            comment.author.display_name().green(),
            comment.content
        );
    }
}

/// Print a page of articles followed by the page links
pub(crate) fn print_page(page: &Page<Article>, window: &PaginationWindow, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(page)?);
        return Ok(());
    }

    if page.is_empty() {
        println!("No articles found.");
        return Ok(());
    }

    for article in &page.items {
        let tags: Vec<String> = article
            .hashtag_names()
            .into_iter()
            .map(|name| format!("#{}", name))
            .collect();
        println!(
            "  {} {} {} {}",
            format!("{:>4}", article.id).cyan(),
            article.title.bold(),
            article.author.display_name().green(),
            tags.join(" ").dimmed()
        );
    }

    println!();
    println!("  {}", page_bar(page, window));
    Ok(())
}

/// Page links with the current page highlighted, numbered from 1
fn page_bar<T>(page: &Page<T>, window: &PaginationWindow) -> String {
    page.window(window)
        .into_iter()
        .map(|p| {
            let label = (p + 1).to_string();
            if p == page.page {
                format!("[{}]", label).bold().to_string()
            } else {
                label
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
