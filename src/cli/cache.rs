//! Cache maintenance commands

use serde_json::json;

use crate::AppContext;

pub async fn stats(context: &AppContext) -> anyhow::Result<()> {
    let stats = context.lookup_cache().stats().await;

    println!("{}", serde_json::to_string_pretty(&stats)?);

    Ok(())
}

pub async fn clear(context: &AppContext) -> anyhow::Result<()> {
    let deleted = context.lookup_cache().clear().await;

    println!("{}", serde_json::to_string_pretty(&json!({ "deleted": deleted }))?);

    Ok(())
}
