// crates/cli/src/commands.rs
//! Subcommand bodies. Each loads its input, runs the core operation, and
//! prints text or JSON to stdout.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use claude_reader_core::{
    branch_display_name, filter_conversations, find_conversation, format_date, load_conversation_file,
    load_conversations, load_projects, load_users, message_text, paginate, single_line,
    sort_conversations, truncate_text, write_all_conversations, Branch, DetectionStrategy, Page,
    SortOrder, DEFAULT_PREVIEW_LEN,
};
use claude_reader_types::{ChatMessage, Conversation, Project, User};
use serde::Serialize;
use tracing::debug;

const MESSAGE_PREVIEW_LEN: usize = 72;

/// One row of the conversation list.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    pub uuid: String,
    pub name: String,
    pub updated_at: DateTime<Utc>,
    pub message_count: usize,
    pub preview: String,
}

impl ConversationSummary {
    fn from_conversation(conversation: &Conversation) -> Self {
        let preview = conversation
            .chat_messages
            .iter()
            .find(|m| m.is_human())
            .map(|m| preview_text(m, DEFAULT_PREVIEW_LEN))
            .unwrap_or_default();
        Self {
            uuid: conversation.uuid.clone(),
            name: conversation.display_name().to_string(),
            updated_at: conversation.updated_at,
            message_count: conversation.chat_messages.len(),
            preview,
        }
    }
}

fn preview_text(message: &ChatMessage, max_len: usize) -> String {
    truncate_text(&single_line(message_text(message)), max_len, "...")
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Pick the conversation named by `uuid`, or the only one in the file.
pub fn select_conversation<'a>(
    conversations: &'a [Conversation],
    uuid: Option<&str>,
    file: &Path,
) -> Result<&'a Conversation> {
    match uuid {
        Some(uuid) => match find_conversation(conversations, uuid) {
            Some(conversation) => Ok(conversation),
            None => bail!("Conversation {uuid} not found in {}", file.display()),
        },
        None => match conversations {
            [only] => Ok(only),
            _ => bail!(
                "{} holds {} conversations; pass --conversation <uuid>",
                file.display(),
                conversations.len()
            ),
        },
    }
}

pub fn render_list(page: &Page<ConversationSummary>) -> String {
    let mut out = String::new();
    if page.total == 0 {
        out.push_str("No conversations found.\n");
        return out;
    }
    let _ = writeln!(
        out,
        "Page {} of {} ({} conversations)",
        page.page,
        page.total_pages.max(1),
        page.total
    );
    for summary in &page.items {
        let _ = writeln!(
            out,
            "\n{}  {}\n  {} · {} message{}",
            summary.uuid,
            summary.name,
            format_date(&summary.updated_at),
            summary.message_count,
            if summary.message_count == 1 { "" } else { "s" }
        );
        if !summary.preview.is_empty() {
            let _ = writeln!(out, "  {}", summary.preview);
        }
    }
    out
}

pub fn render_branches(conversation: &Conversation, strategy: DetectionStrategy, branches: &[Branch]) -> String {
    let mut out = String::new();
    let sides = branches.len().saturating_sub(1);
    let _ = writeln!(
        out,
        "{} ({})\nstrategy: {strategy}, {sides} side branch{}",
        conversation.display_name(),
        conversation.uuid,
        if sides == 1 { "" } else { "es" }
    );
    if sides == 0 {
        out.push_str("No branches detected.\n");
    }
    for branch in branches {
        let _ = write!(
            out,
            "\n[{}] {} · {} message{}",
            branch.id,
            branch.name,
            branch.len(),
            if branch.len() == 1 { "" } else { "s" }
        );
        if let Some(point) = branch.branch_point {
            let _ = write!(out, " · forks at prompt {}", point + 1);
        }
        let _ = writeln!(out, "\n  {}", branch_display_name(&branch.messages));
        for message in &branch.messages {
            let sender = if message.is_human() { "human" } else { "assistant" };
            let _ = writeln!(out, "    {sender:>9}: {}", preview_text(message, MESSAGE_PREVIEW_LEN));
        }
    }
    out
}

pub async fn list(
    file: &Path,
    search: Option<&str>,
    sort: SortOrder,
    page: usize,
    per_page: usize,
    json: bool,
) -> Result<()> {
    let conversations = load_conversations(file).await?;
    let mut matched = filter_conversations(&conversations, search.unwrap_or_default());
    sort_conversations(&mut matched, sort);
    debug!(total = conversations.len(), matched = matched.len(), %sort, "Filtered conversation list");

    let summaries: Vec<ConversationSummary> = matched
        .into_iter()
        .map(ConversationSummary::from_conversation)
        .collect();
    let page = paginate(&summaries, page, per_page);

    if json {
        print_json(&page)
    } else {
        print!("{}", render_list(&page));
        Ok(())
    }
}

pub async fn branches(
    file: &Path,
    uuid: Option<&str>,
    strategy: DetectionStrategy,
    json: bool,
) -> Result<()> {
    let conversations = load_conversation_file(file).await?;
    let conversation = select_conversation(&conversations, uuid, file)?;
    let branches = strategy.detector().detect(&conversation.chat_messages);

    if json {
        print_json(&branches)
    } else {
        print!("{}", render_branches(conversation, strategy, &branches));
        Ok(())
    }
}

pub async fn split(file: &Path, out: &Path, json: bool) -> Result<()> {
    let conversations = load_conversations(file).await?;
    let written = write_all_conversations(out, &conversations).await?;

    if json {
        print_json(&written)
    } else {
        println!("Wrote {} conversation files to {}", written.len(), out.display());
        Ok(())
    }
}

pub async fn export_branch(
    file: &Path,
    uuid: Option<&str>,
    branch_id: &str,
    out: &Path,
    json: bool,
) -> Result<()> {
    let conversations = load_conversation_file(file).await?;
    let conversation = select_conversation(&conversations, uuid, file)?;
    let path = claude_reader_core::export_branch(out, conversation, branch_id).await?;

    if json {
        print_json(&path)
    } else {
        println!("Exported {branch_id} to {}", path.display());
        Ok(())
    }
}

pub fn render_users(users: &[User]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} users", users.len());
    for user in users {
        let _ = write!(out, "\n{}  {}", user.full_name, user.email_address);
        if let Some(phone) = &user.verified_phone_number {
            let _ = write!(out, "  {phone}");
        }
        out.push('\n');
    }
    out
}

pub fn render_projects(projects: &[Project]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} projects", projects.len());
    for project in projects {
        let _ = writeln!(
            out,
            "\n{}{}\n  created {} · {} docs · {} chars",
            project.name,
            if project.is_private { " (private)" } else { "" },
            format_date(&project.created_at),
            project.docs.len(),
            project.docs_size()
        );
        if !project.description.is_empty() {
            let _ = writeln!(
                out,
                "  {}",
                truncate_text(&single_line(&project.description), DEFAULT_PREVIEW_LEN, "...")
            );
        }
    }
    out
}

pub async fn users(file: &Path, json: bool) -> Result<()> {
    let users = load_users(file).await?;
    if json {
        print_json(&users)
    } else {
        print!("{}", render_users(&users));
        Ok(())
    }
}

pub async fn projects(file: &Path, json: bool) -> Result<()> {
    let projects = load_projects(file).await?;
    if json {
        print_json(&projects)
    } else {
        print!("{}", render_projects(&projects));
        Ok(())
    }
}
