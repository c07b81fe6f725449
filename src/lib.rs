//! # Companion
//!
//! Decision and learning pipeline for a personified desk companion.
//!
//! Each interaction arrives as a [`ContextSnapshot`] (perception, memory and
//! system context).  The pipeline discretizes it into a state key, lets the
//! active persona's rule table pick an action, falls back to a tabular
//! Q-learner when no rule applies, renders the action into an
//! [`OutputCommand`] (screen, light, speech, device action) and passes it
//! through the persona's filter.  Rewards for earlier decisions update the
//! learner, whose value table persists as a JSON document.
//!
//! ```no_run
//! use companion::{ContextSnapshot, DecisionPipeline, PerceptionInput};
//! use companion::config::CompanionConfig;
//!
//! let pipeline = DecisionPipeline::from_config(&CompanionConfig::default());
//! let snapshot = ContextSnapshot::new(PerceptionInput::new("how is the report going?"));
//! let decision = pipeline.decide(&snapshot);
//! pipeline.reward(decision.state_key.as_str(), decision.action_id, 0.5, None);
//! ```

#[macro_use]
mod macros;

pub mod actions;
pub mod cli;
pub mod config;
pub mod contracts;
pub mod discretizer;
pub mod error;
pub mod learning;
pub mod persona;
pub mod pipeline;
pub mod server;
pub mod utilities;

pub use actions::ActionId;
pub use config::{CompanionConfig, LearnerConfig};
pub use contracts::{ContextSnapshot, OutputCommand, PerceptionInput, Personality};
pub use discretizer::{discretize, StateKey};
pub use learning::QLearner;
pub use persona::{PersonaBehavior, PersonaRegistry};
pub use pipeline::{Decision, DecisionPipeline, DecisionSource};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
