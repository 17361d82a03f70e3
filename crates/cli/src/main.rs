// crates/cli/src/main.rs
mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use claude_reader_core::{DetectionStrategy, SortOrder, DEFAULT_PAGE_SIZE};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "claude-reader")]
#[command(about = "Browse Claude conversation exports and recover edit branches")]
#[command(version)]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true, env = "CLAUDE_READER_JSON")]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List conversations in an export
    List {
        /// Path to conversations.json
        file: PathBuf,
        /// Only show conversations mentioning this text
        #[arg(long, short)]
        search: Option<String>,
        #[arg(long, default_value_t = SortOrder::Newest, env = "CLAUDE_READER_SORT")]
        sort: SortOrder,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, env = "CLAUDE_READER_PAGE_SIZE")]
        per_page: usize,
    },
    /// Show the branches detected in one conversation
    Branches {
        /// conversations.json or a single conversation file
        file: PathBuf,
        /// Conversation uuid; optional when the file holds one conversation
        #[arg(long, short)]
        conversation: Option<String>,
        #[arg(long, default_value_t = DetectionStrategy::Edit, env = "CLAUDE_READER_STRATEGY")]
        strategy: DetectionStrategy,
    },
    /// Write every conversation to its own file
    Split {
        file: PathBuf,
        #[arg(long, short, env = "CLAUDE_READER_OUT")]
        out: PathBuf,
    },
    /// Save one branch of a conversation as a standalone file
    ExportBranch {
        file: PathBuf,
        #[arg(long, short)]
        conversation: Option<String>,
        /// Branch id, e.g. `main` or `branch-1`
        #[arg(long, short)]
        branch: String,
        #[arg(long, short, env = "CLAUDE_READER_OUT")]
        out: PathBuf,
    },
    /// Summarize users.json
    Users { file: PathBuf },
    /// Summarize projects.json
    Projects { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("CLAUDE_READER_LOG")
                .unwrap_or_else(|_| "warn,claude_reader=info".into()),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let json = cli.json;

    match cli.command {
        Command::List {
            file,
            search,
            sort,
            page,
            per_page,
        } => commands::list(&file, search.as_deref(), sort, page, per_page, json).await,
        Command::Branches {
            file,
            conversation,
            strategy,
        } => commands::branches(&file, conversation.as_deref(), strategy, json).await,
        Command::Split { file, out } => commands::split(&file, &out, json).await,
        Command::ExportBranch {
            file,
            conversation,
            branch,
            out,
        } => commands::export_branch(&file, conversation.as_deref(), &branch, &out, json).await,
        Command::Users { file } => commands::users(&file, json).await,
        Command::Projects { file } => commands::projects(&file, json).await,
    }
}
