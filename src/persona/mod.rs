//! # Personas
//!
//! Each personality contributes three behaviours to a decision:
//!
//! ```text
//! perception ─▶ resolve_rule ─▶ Option<RuleMatch>      (rule stage)
//! action     ─▶ message_for  ─▶ spoken line            (templating)
//! output     ─▶ filter       ─▶ output                 (post-processing)
//! ```
//!
//! All six are [`DataPersona`] records: a literal [`RuleTable`], an ordered
//! list of [`FilterStep`]s and the [`PersonaConfig`] description.  They sit
//! behind the [`PersonaBehavior`] trait in a [`PersonaRegistry`] keyed by
//! [`Personality`].

pub mod builtin;
pub mod filter;
pub mod profile;
pub mod registry;
pub mod rules;

pub use filter::FilterStep;
pub use profile::{persona_catalog, PersonaCatalog, PersonaConfig};
pub use registry::PersonaRegistry;
pub use rules::{Ambiguity, Condition, Rule, RuleMatch, RuleTable};

use crate::actions::{self, ActionId};
use crate::contracts::{OutputCommand, PerceptionInput, Personality};

/// Personality-specific behaviour consulted by the pipeline.
pub trait PersonaBehavior: Send + Sync + std::fmt::Debug {
    fn personality(&self) -> Personality;

    /// First matching rule (or table default) for this perception.
    fn resolve_rule(&self, perception: &PerceptionInput) -> Option<RuleMatch>;

    /// Post-process a templated output.
    fn filter(&self, output: OutputCommand) -> OutputCommand;

    /// Line spoken for an action in this persona's voice.
    fn message_for(&self, action: ActionId) -> &str;

    /// Description, if the persona catalog has one.
    fn config(&self) -> Option<&PersonaConfig>;
}

/// Persona defined entirely by data.
#[derive(Debug, Clone)]
pub struct DataPersona {
    personality: Personality,
    rules: RuleTable,
    filters: Vec<FilterStep>,
    config: Option<PersonaConfig>,
}

impl DataPersona {
    pub fn new(
        personality: Personality,
        rules: RuleTable,
        filters: Vec<FilterStep>,
        config: Option<PersonaConfig>,
    ) -> Self {
        Self {
            personality,
            rules,
            filters,
            config,
        }
    }

    /// Built-in rules and filters, described by `config`.
    pub fn builtin(personality: Personality, config: Option<PersonaConfig>) -> Self {
        Self::new(
            personality,
            builtin::rule_table(personality),
            builtin::filter_steps(personality),
            config,
        )
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn filters(&self) -> &[FilterStep] {
        &self.filters
    }
}

impl PersonaBehavior for DataPersona {
    fn personality(&self) -> Personality {
        self.personality
    }

    fn resolve_rule(&self, perception: &PerceptionInput) -> Option<RuleMatch> {
        self.rules.resolve(perception)
    }

    /// Pass-through when the persona has no catalog entry.
    fn filter(&self, output: OutputCommand) -> OutputCommand {
        if self.config.is_none() {
            return output;
        }
        filter::apply_all(&self.filters, output)
    }

    fn message_for(&self, action: ActionId) -> &str {
        actions::message(action, self.personality)
    }

    fn config(&self) -> Option<&PersonaConfig> {
        self.config.as_ref()
    }
}
