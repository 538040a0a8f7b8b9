//! Stats command - memory store statistics.

use anyhow::Result;
use clap::Args;

use super::Context;

/// Arguments for the stats command.
#[derive(Args, Debug)]
pub struct StatsArgs {}

/// Run the stats command.
pub fn run(_args: StatsArgs, ctx: &Context) -> Result<()> {
    let bank = ctx.open_bank()?;
    let stats = bank.stats()?;

    if ctx.json_output {
        println!(
            "{}",
            serde_json::json!({
                "entries": stats.entry_count,
                "decisions": stats.decision_count,
                "conversations": stats.conversation_count,
                "schema_version": stats.schema_version,
            })
        );
        return Ok(());
    }

    println!("Memory bank: {}", bank.memory_dir().display());
    println!("  Entries:       {}", stats.entry_count);
    println!("  Decisions:     {}", stats.decision_count);
    println!("  Conversations: {}", stats.conversation_count);
    println!("  Schema:        v{}", stats.schema_version);

    Ok(())
}
