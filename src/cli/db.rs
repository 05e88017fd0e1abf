//! Conversation store commands

use serde_json::json;

use super::{ConversationsArgs, HistoryArgs};
use crate::AppContext;

pub async fn stats(context: &AppContext) -> anyhow::Result<()> {
    let stats = context.repository().stats().await?;

    let mut value = json!({
        "total_conversations": stats.total_conversations,
        "total_messages": stats.total_messages,
    });

    if let Some(pool) = context.pg_pool() {
        value["pool"] = json!({
            "connections": pool.size(),
            "idle": pool.num_idle(),
        });
    }

    println!("{}", serde_json::to_string_pretty(&value)?);

    Ok(())
}

pub async fn conversations(context: &AppContext, args: ConversationsArgs) -> anyhow::Result<()> {
    let conversations = context
        .repository()
        .list_conversations(args.limit, args.offset)
        .await?;

    println!("{}", serde_json::to_string_pretty(&conversations)?);

    Ok(())
}

pub async fn history(context: &AppContext, args: HistoryArgs) -> anyhow::Result<()> {
    let messages = context
        .repository()
        .get_messages(&args.thread_id, Some(args.limit))
        .await?;

    println!("{}", serde_json::to_string_pretty(&messages)?);

    Ok(())
}
