//! Lookup commands: search, sections, section content

use clap::Args;
use serde::Serialize;

use crate::infrastructure::services::Fetched;
use crate::AppContext;

#[derive(Args)]
pub struct LookupArgs {
    /// Search query
    pub query: String,
}

#[derive(Args)]
pub struct SectionsArgs {
    /// Article topic
    pub topic: String,
}

#[derive(Args)]
pub struct SectionArgs {
    /// Article topic
    pub topic: String,

    /// Section title
    pub title: String,
}

pub async fn search(context: &AppContext, args: LookupArgs) -> anyhow::Result<()> {
    let fetched = context.search(&args.query).await?;
    print_fetched(&fetched)
}

pub async fn sections(context: &AppContext, args: SectionsArgs) -> anyhow::Result<()> {
    let fetched = context.sections(&args.topic).await?;
    print_fetched(&fetched)
}

pub async fn section(context: &AppContext, args: SectionArgs) -> anyhow::Result<()> {
    let fetched = context.section_content(&args.topic, &args.title).await?;
    print_fetched(&fetched)
}

/// Prints the outcome as JSON with a `cached` marker alongside the payload.
fn print_fetched<T: Serialize>(fetched: &Fetched<T>) -> anyhow::Result<()> {
    let mut value = serde_json::to_value(&fetched.outcome)?;

    if let serde_json::Value::Object(map) = &mut value {
        map.insert("cached".to_string(), fetched.from_cache.into());
    }

    println!("{}", serde_json::to_string_pretty(&value)?);

    Ok(())
}
