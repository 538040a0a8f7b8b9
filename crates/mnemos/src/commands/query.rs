//! Query command - retrieve relevant context.

use anyhow::Result;
use clap::Args;

use mnemos::format_for_prompt;

use super::Context;

/// Arguments for the query command.
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Free-text query
    pub query: String,
}

/// Run the query command.
pub async fn run(args: QueryArgs, ctx: &Context) -> Result<()> {
    let bank = ctx.open_bank()?;
    let context = bank.get_relevant_context(&args.query).await;

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&context)?);
        return Ok(());
    }

    if context.is_empty() {
        println!("No relevant context found.");
        return Ok(());
    }

    print!("{}", format_for_prompt(&context));

    if ctx.verbose && !context.relevance_scores.is_empty() {
        println!();
        println!("Relevance:");
        for (category, score) in &context.relevance_scores {
            println!("  {category}: {score:.2}");
        }
    }

    Ok(())
}
