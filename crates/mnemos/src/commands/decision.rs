//! Decision command - record a decision.

use anyhow::Result;
use clap::Args;

use mnemos::DecisionOption;
use mnemos_types::Decision;

use super::Context;

/// Arguments for the decision command.
#[derive(Args, Debug)]
pub struct DecisionArgs {
    /// Decision title
    pub title: String,

    /// Why the decision was needed
    #[arg(short, long)]
    pub context: String,

    /// A considered option (repeatable)
    #[arg(short, long = "option", value_name = "NAME")]
    pub options: Vec<String>,

    /// The option that was chosen
    #[arg(long)]
    pub chosen: String,

    /// Why the chosen option won
    #[arg(short, long)]
    pub rationale: String,

    /// Who made the call
    #[arg(long)]
    pub decision_maker: Option<String>,
}

/// Run the decision command.
pub fn run(args: DecisionArgs, ctx: &Context) -> Result<()> {
    let options = args
        .options
        .iter()
        .map(|name| DecisionOption::new(name.as_str(), ""))
        .collect();

    let mut decision = Decision::new(
        args.title,
        args.context,
        options,
        args.chosen,
        args.rationale,
    );
    if let Some(maker) = args.decision_maker {
        decision = decision.with_decision_maker(maker);
    }

    let bank = ctx.open_bank()?;
    let id = bank.store_decision(&decision)?;

    if ctx.json_output {
        println!("{}", serde_json::json!({ "id": id }));
    } else {
        println!("Stored decision {id}");
    }

    Ok(())
}
