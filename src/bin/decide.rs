//! One-shot decision from the command line.
//!
//! Reads a context snapshot (file or stdin), prints the decision as JSON and
//! optionally feeds a reward back into the learner.
//!
//! ```bash
//! echo '{"perception_input": {"speech_emotion": "fatigue"}}' | cargo run --bin decide
//! cargo run --bin decide -- --reward 0.8 snapshot.json
//! ```

use std::io::Read;

use anyhow::{bail, Context};
use companion::cli::{parse_args, CliCommand, DecideArgs, USAGE};
use companion::config::CompanionConfig;
use companion::contracts::ContextSnapshot;
use companion::discretizer::StateKey;
use companion::pipeline::DecisionPipeline;
use serde_json::json;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match parse_args(std::env::args().skip(1)) {
        Ok(CliCommand::Help) => {
            println!("{}", USAGE);
            Ok(())
        }
        Ok(CliCommand::Version) => {
            println!("decide {}", companion::VERSION);
            Ok(())
        }
        Ok(CliCommand::Decide(args)) => run(args),
        Err(e) => bail!("{}\n\n{}", e, USAGE),
    }
}

fn run(args: DecideArgs) -> anyhow::Result<()> {
    let config = CompanionConfig::load(args.config.as_deref())
        .context("Failed to load companion configuration")?;

    let raw = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read snapshot from stdin")?;
            buf
        }
    };
    let snapshot = ContextSnapshot::from_json(&raw).context("Invalid context snapshot")?;
    if let Some(next) = &args.next_state {
        StateKey::parse(next).context("Invalid --next-state")?;
    }

    let pipeline = DecisionPipeline::from_config(&config);
    let decision = pipeline.decide(&snapshot);

    let output = match args.reward {
        Some(reward) => {
            let q_value = pipeline.reward(
                decision.state_key.as_str(),
                decision.action_id,
                reward,
                args.next_state.as_deref(),
            );
            json!({ "decision": decision, "q_value": q_value })
        }
        None => serde_json::to_value(&decision)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
