//! Track command - log a conversation exchange.

use anyhow::Result;
use clap::Args;

use mnemos_types::Interaction;

use super::Context;

/// Arguments for the track command.
#[derive(Args, Debug)]
pub struct TrackArgs {
    /// What the user said
    #[arg(short, long)]
    pub user: String,

    /// What the assistant answered
    #[arg(short, long)]
    pub assistant: String,

    /// Outcome of the exchange, if known
    #[arg(short, long)]
    pub outcome: Option<String>,
}

/// Run the track command.
pub fn run(args: TrackArgs, ctx: &Context) -> Result<()> {
    let mut interaction = Interaction::new(args.user, args.assistant);
    if let Some(outcome) = args.outcome {
        interaction = interaction.with_outcome(outcome);
    }

    let bank = ctx.open_bank()?;
    let id = bank.track_conversation(&interaction)?;

    if ctx.json_output {
        println!("{}", serde_json::json!({ "id": id }));
    } else {
        println!("Tracked conversation {id}");
    }

    Ok(())
}
