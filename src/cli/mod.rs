//! CLI for the Wikipedia search agent backend
//!
//! Operational surface over the library: run the cached lookups, inspect and
//! clear the cache, and browse stored conversations.

pub mod cache;
pub mod db;
pub mod lookup;

use clap::{Args, Parser, Subcommand};

use crate::infrastructure::logging::init_logging;
use crate::{AppConfig, AppContext};

/// Wikipedia search agent - cached lookups and conversation persistence
#[derive(Parser)]
#[command(name = "wiki-search-agent")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Search Wikipedia for a topic
    Lookup(lookup::LookupArgs),

    /// List the sections of a topic's article
    Sections(lookup::SectionsArgs),

    /// Fetch the content of one section of a topic's article
    Section(lookup::SectionArgs),

    /// Cache inspection and maintenance
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },

    /// Conversation store inspection
    Db {
        #[command(subcommand)]
        command: DbCommand,
    },
}

#[derive(Subcommand)]
pub enum CacheCommand {
    /// Show backend status, entry count and TTLs
    Stats,
    /// Delete every cached lookup
    Clear,
}

#[derive(Subcommand)]
pub enum DbCommand {
    /// Show conversation and message totals
    Stats,
    /// List conversations, most recently active first
    Conversations(ConversationsArgs),
    /// Show the message history of a thread
    History(HistoryArgs),
}

#[derive(Args)]
pub struct ConversationsArgs {
    /// Page size
    #[arg(long, default_value_t = crate::domain::conversation::DEFAULT_CONVERSATION_PAGE)]
    pub limit: u32,

    /// Rows to skip
    #[arg(long, default_value_t = 0)]
    pub offset: u32,
}

#[derive(Args)]
pub struct HistoryArgs {
    /// Thread identifier
    pub thread_id: String,

    /// Only the most recent N messages
    #[arg(long, default_value_t = crate::domain::conversation::DEFAULT_HISTORY_LIMIT)]
    pub limit: u32,
}

/// Parses the environment, wires the application and dispatches the command.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_logging(&config.logging);

    let context = AppContext::init(&config).await?;

    let result = match cli.command {
        Command::Lookup(args) => lookup::search(&context, args).await,
        Command::Sections(args) => lookup::sections(&context, args).await,
        Command::Section(args) => lookup::section(&context, args).await,
        Command::Cache { command } => match command {
            CacheCommand::Stats => cache::stats(&context).await,
            CacheCommand::Clear => cache::clear(&context).await,
        },
        Command::Db { command } => match command {
            DbCommand::Stats => db::stats(&context).await,
            DbCommand::Conversations(args) => db::conversations(&context, args).await,
            DbCommand::History(args) => db::history(&context, args).await,
        },
    };

    context.shutdown().await;

    result
}
