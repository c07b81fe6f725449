//! # Decision Pipeline
//!
//! One call turns a context snapshot into an output command:
//!
//! ```text
//! ContextSnapshot
//!   → discretize            → StateKey
//!   → persona rules         → Some(action)        ─┐
//!   → (no rule) learner     → ε-greedy action     ─┤
//!   → template              → OutputCommand       ◀┘
//!   → persona filter        → OutputCommand
//!   → memory record (opt.)  → OutputCommand
//! ```
//!
//! The learner is the only state that outlives a call.  It sits behind a
//! mutex owned by the pipeline; the rule path never takes the lock.
//! Feedback arrives separately through [`DecisionPipeline::reward`].

use std::fmt;

use chrono::{DateTime, Utc};
use log::{debug, info};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::actions::{self, ActionId};
use crate::config::CompanionConfig;
use crate::contracts::{ContextSnapshot, MemoryToStore, OutputCommand};
use crate::discretizer::{self, StateKey};
use crate::learning::{JsonFileStore, QLearner};
use crate::persona::{PersonaCatalog, PersonaRegistry};

/// Which stage chose the action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecisionSource {
    /// A persona rule matched.
    Rule { name: String },
    /// No rule matched; the persona's table default applied.
    TableDefault,
    /// No rule or default; the learner chose.
    Learned,
}

impl fmt::Display for DecisionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionSource::Rule { name } => write!(f, "rule '{}'", name),
            DecisionSource::TableDefault => f.write_str("table default"),
            DecisionSource::Learned => f.write_str("learned policy"),
        }
    }
}

/// Full record of one decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub id: Uuid,
    pub decided_at: DateTime<Utc>,

    /// Pass back to [`DecisionPipeline::reward`] as the previous state.
    pub state_key: StateKey,

    pub action_id: ActionId,
    pub source: DecisionSource,
    pub output: OutputCommand,
}

/// Learner summary for monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LearnerStats {
    pub epsilon: f64,
    pub state_count: usize,
}

/// Task name inferred from free text, if any.
pub fn infer_related_task(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    if discretizer::mentions_flagship(&lower) {
        Some("Phoenix project draft")
    } else if lower.contains("report") {
        Some("work report")
    } else if lower.contains("project") {
        Some("project task")
    } else {
        None
    }
}

pub struct DecisionPipeline {
    registry: PersonaRegistry,
    learner: Mutex<QLearner>,
    record_memory: bool,
}

impl fmt::Debug for DecisionPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecisionPipeline")
            .field("personas", &self.registry.len())
            .field("record_memory", &self.record_memory)
            .finish()
    }
}

impl DecisionPipeline {
    pub fn new(registry: PersonaRegistry, learner: QLearner) -> Self {
        Self {
            registry,
            learner: Mutex::new(learner),
            record_memory: true,
        }
    }

    pub fn with_memory_record(mut self, record: bool) -> Self {
        self.record_memory = record;
        self
    }

    /// Persona catalog from `persona_file` (or built in) and a file-backed
    /// learner at the configured storage path.
    pub fn from_config(config: &CompanionConfig) -> Self {
        let catalog = PersonaCatalog::load(config.persona_file.as_deref());
        let path = config.learner.resolved_storage_path();
        info!("Value table at {}", path.display());
        let learner = QLearner::new(config.learner.clone(), Box::new(JsonFileStore::new(path)));
        Self::new(PersonaRegistry::from_catalog(&catalog), learner)
            .with_memory_record(config.record_memory)
    }

    pub fn registry(&self) -> &PersonaRegistry {
        &self.registry
    }

    /// Decide and return the full record.
    pub fn decide(&self, snapshot: &ContextSnapshot) -> Decision {
        let state_key = discretizer::discretize(snapshot);
        let persona = self.registry.get(snapshot.personality());

        let (action_id, source) = match persona.resolve_rule(&snapshot.perception_input) {
            Some(m) => (
                m.action,
                m.rule
                    .map_or(DecisionSource::TableDefault, |name| DecisionSource::Rule { name }),
            ),
            None => (
                self.learner.lock().select(state_key.as_str()),
                DecisionSource::Learned,
            ),
        };

        let related_task = infer_related_task(&snapshot.perception_input.user_text);
        let output = actions::render(action_id, related_task, persona.message_for(action_id));
        let mut output = persona.filter(output);

        if self.record_memory {
            output.memory_output.memory_to_store =
                Some(memory_record(snapshot, &state_key, &source, &output));
        }

        let decision = Decision {
            id: Uuid::new_v4(),
            decided_at: Utc::now(),
            state_key,
            action_id,
            source,
            output,
        };
        debug!(
            "Decision {}: state={} source={} action={} ({})",
            decision.id,
            decision.state_key,
            decision.source,
            decision.action_id,
            snapshot.personality()
        );
        decision
    }

    /// Decide and return only the output command.
    pub fn run_once(&self, snapshot: &ContextSnapshot) -> OutputCommand {
        self.decide(snapshot).output
    }

    /// Feed back a reward for an earlier decision.  Touches only the learner.
    pub fn reward(
        &self,
        prev_state: &str,
        action: ActionId,
        reward: f64,
        next_state: Option<&str>,
    ) -> f64 {
        self.learner.lock().update(prev_state, action, reward, next_state)
    }

    pub fn learner_stats(&self) -> LearnerStats {
        let learner = self.learner.lock();
        LearnerStats {
            epsilon: learner.epsilon(),
            state_count: learner.state_count(),
        }
    }

    /// Run `f` with exclusive access to the learner.
    pub fn with_learner<R>(&self, f: impl FnOnce(&mut QLearner) -> R) -> R {
        f(&mut self.learner.lock())
    }
}

fn memory_record(
    snapshot: &ContextSnapshot,
    state_key: &StateKey,
    source: &DecisionSource,
    output: &OutputCommand,
) -> MemoryToStore {
    let p = &snapshot.perception_input;
    let input = json!({
        "user_text": p.user_text,
        "speech_emotion": p.speech_emotion,
        "text_sentiment": p.text_sentiment,
        "context_flags": p.context_flags,
        "time_of_day": p.time_of_day,
        "personality": snapshot.personality(),
        "agent_mode": snapshot.system_context.agent_mode,
        "fact_count": snapshot.memory_input.facts.len(),
        "episode_count": snapshot.memory_input.episodes.len(),
    });

    let decision_reasoning = match source {
        DecisionSource::Learned => format!("{} for state {}", source, state_key),
        _ => format!("{} of {}", source, snapshot.personality()),
    };

    MemoryToStore {
        input,
        decision_reasoning,
        final_action: output.action.action_type.as_str().to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LearnerConfig;
    use crate::contracts::{ActionType, PerceptionInput, Personality, SpeechEmotion, TimeOfDay};
    use crate::learning::MemoryStore;

    fn pipeline(epsilon: f64) -> (DecisionPipeline, MemoryStore) {
        let store = MemoryStore::new();
        let config = LearnerConfig {
            epsilon,
            min_epsilon: epsilon.min(0.05),
            seed: Some(7),
            ..Default::default()
        };
        let learner = QLearner::new(config, Box::new(store.clone()));
        (DecisionPipeline::new(PersonaRegistry::builtin(), learner), store)
    }

    fn snapshot(p: PerceptionInput, personality: Personality) -> ContextSnapshot {
        ContextSnapshot::new(p).with_personality(personality)
    }

    #[test]
    fn test_rule_path_leaves_learner_untouched() {
        let (pipe, store) = pipeline(0.3);
        let s = snapshot(
            PerceptionInput::default()
                .with_emotion(SpeechEmotion::Stress)
                .with_flags(["deadline_near", "interruption_high"]),
            Personality::StandardAssistant,
        );

        let d = pipe.decide(&s);
        assert_eq!(d.action_id, ActionId::DistractionShield);
        assert_eq!(d.source, DecisionSource::Rule { name: "distraction".into() });
        assert_eq!(d.output.action.action_type, ActionType::DistractionProtection);

        let stats = pipe.learner_stats();
        assert_eq!(stats.state_count, 0);
        assert_eq!(stats.epsilon, 0.3);
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_tired_cat_gets_whimsical_stretch() {
        let (pipe, _) = pipeline(0.3);
        let s = snapshot(
            PerceptionInput::default()
                .with_emotion(SpeechEmotion::Fatigue)
                .with_flags(["sitting_over_2h"]),
            Personality::CuteCat,
        );
        let out = pipe.run_once(&s);
        assert_eq!(out.action.action_type, ActionType::MovementReminder);
        let text = out.tts_output.spoken().unwrap();
        assert!(text.contains('~') || text.contains("meow"));
    }

    #[test]
    fn test_repeated_rewards_steer_greedy_choice() {
        let (pipe, _) = pipeline(0.0);
        let s = snapshot(
            PerceptionInput::new("hello").with_time_of_day(TimeOfDay::Night),
            Personality::StandardAssistant,
        );

        let mut last_best = None;
        for reward in [-0.3, -0.3, 0.1, 0.1, 0.8] {
            let d = pipe.decide(&s);
            assert_eq!(d.source, DecisionSource::Learned);
            pipe.reward(d.state_key.as_str(), d.action_id, reward, None);
            if reward == 0.8 {
                last_best = Some(d.action_id);
            }
        }

        let d = pipe.decide(&s);
        assert_eq!(Some(d.action_id), last_best);
    }

    #[test]
    fn test_unmatched_standard_uses_learner() {
        let (pipe, store) = pipeline(0.0);
        let d = pipe.decide(&ContextSnapshot::default());
        assert_eq!(d.source, DecisionSource::Learned);
        assert_eq!(d.action_id, ActionId::DeepWorkMode);
        assert_eq!(pipe.learner_stats().state_count, 1);
        // selection alone does not persist
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_table_default_source() {
        let (pipe, _) = pipeline(0.3);
        let d = pipe.decide(&snapshot(PerceptionInput::default(), Personality::ColdBoss));
        assert_eq!(d.source, DecisionSource::TableDefault);
        assert_eq!(d.action_id, ActionId::DeepWorkMode);
        assert!(d.output.tts_output.spoken().unwrap().ends_with('.'));
    }

    #[test]
    fn test_related_task_flows_into_action() {
        let (pipe, _) = pipeline(0.0);
        let s = snapshot(
            PerceptionInput::new("The phoenix launch").with_flags(["deadline_near"]),
            Personality::StandardAssistant,
        );
        let d = pipe.decide(&s);
        assert_eq!(d.output.action.action_type, ActionType::SetReminder);
        assert_eq!(
            d.output.action.parameters.related_task.as_deref(),
            Some("Phoenix project draft")
        );
    }

    #[test]
    fn test_memory_record() {
        let (pipe, _) = pipeline(0.0);
        let s = snapshot(
            PerceptionInput::new("write the report").with_flags(["deep_work_mode"]),
            Personality::WarmSister,
        )
        .with_facts(["likes tea"]);

        let out = pipe.run_once(&s);
        let record = out.memory_output.memory_to_store.unwrap();
        assert_eq!(record.final_action, "set_reminder");
        assert_eq!(record.input["personality"], "WarmSister");
        assert_eq!(record.input["fact_count"], 1);
        assert_eq!(record.input["context_flags"][0], "deep_work_mode");
        assert!(record.decision_reasoning.contains("WarmSister"));

        let quiet = DecisionPipeline::new(
            PersonaRegistry::builtin(),
            QLearner::new(LearnerConfig::default(), Box::new(MemoryStore::new())),
        )
        .with_memory_record(false);
        assert!(quiet.run_once(&s).memory_output.memory_to_store.is_none());
    }

    #[test]
    fn test_infer_related_task() {
        assert_eq!(infer_related_task("Phoenix status?"), Some("Phoenix project draft"));
        assert_eq!(infer_related_task("the quarterly REPORT"), Some("work report"));
        assert_eq!(infer_related_task("side project"), Some("project task"));
        assert_eq!(infer_related_task("lunch"), None);
    }

    #[test]
    fn test_decision_serializes() {
        let (pipe, _) = pipeline(0.0);
        let d = pipe.decide(&ContextSnapshot::default());
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["source"]["kind"], "learned");
        assert_eq!(json["action_id"], "deep_work_mode");
        assert!(json["state_key"].as_str().unwrap().starts_with("RHYTHM_"));
    }

    #[test]
    fn test_concurrent_rewards_are_serialized() {
        let (pipe, store) = pipeline(0.0);
        let pipe = std::sync::Arc::new(pipe);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pipe = pipe.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        pipe.reward("s", ActionId::HabitNudge, 0.1, None);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.save_count(), 100);
        let q = pipe.with_learner(|l| l.q_values("s").unwrap()[ActionId::HabitNudge.index()]);
        let expected = 0.1 * (1.0 - 0.7f64.powi(100));
        assert!((q - expected).abs() < 1e-9);
    }
}
