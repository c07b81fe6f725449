//! Persona registry.  Resolves a [`Personality`] to its behaviour.
//!
//! The registry always holds all six personalities.  Descriptions come from
//! a [`PersonaCatalog`]; a personality missing from the catalog keeps its
//! rules but skips the filter stage.

use std::sync::Arc;

use log::debug;

use super::{persona_catalog, Ambiguity, DataPersona, PersonaBehavior, PersonaCatalog, PersonaConfig};
use crate::contracts::Personality;

#[derive(Debug, Clone)]
pub struct PersonaRegistry {
    /// Indexed by [`Personality::index`].
    personas: Vec<Arc<dyn PersonaBehavior>>,
}

impl Default for PersonaRegistry {
    /// Described by the process-wide [`persona_catalog`].
    fn default() -> Self {
        Self::from_catalog(persona_catalog())
    }
}

impl PersonaRegistry {
    /// Built-in personas with built-in descriptions.
    pub fn builtin() -> Self {
        Self::from_catalog(&PersonaCatalog::builtin())
    }

    /// Built-in personas described by `catalog`.
    pub fn from_catalog(catalog: &PersonaCatalog) -> Self {
        let personas = Personality::ALL
            .iter()
            .map(|p| {
                let persona = DataPersona::builtin(*p, catalog.get(*p).cloned());
                log_ambiguities(&persona);
                Arc::new(persona) as Arc<dyn PersonaBehavior>
            })
            .collect();
        Self { personas }
    }

    /// Behaviour for a personality.
    pub fn get(&self, personality: Personality) -> &dyn PersonaBehavior {
        self.personas[personality.index()].as_ref()
    }

    /// Descriptions of every persona that has one, in personality order.
    pub fn list(&self) -> Vec<&PersonaConfig> {
        self.personas.iter().filter_map(|p| p.config()).collect()
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}

fn log_ambiguities(persona: &DataPersona) {
    for ambiguity in persona.rules().ambiguities() {
        match ambiguity {
            Ambiguity::Overlap { earlier, later } => debug!(
                "{}: rules '{}' and '{}' overlap, '{}' takes precedence",
                persona.personality(),
                earlier,
                later,
                earlier
            ),
            Ambiguity::Unreachable { rule } => debug!(
                "{}: rule '{}' can never fire",
                persona.personality(),
                rule
            ),
        }
    }
}
