//! Context snapshot, the input record of a single decision call.
//!
//! Produced by the perception and memory collaborators, validated at the
//! boundary, then handed to the pipeline by reference.  Nothing downstream
//! mutates it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ContractError;

// ============================================================================
// Closed tag sets
// ============================================================================

closed_tags! {
    /// Emotion detected in the user's voice.
    pub enum SpeechEmotion("speech emotion") {
        Stress => "stress",
        Calm => "calm",
        Happy => "happy",
        Sad => "sad",
        Angry => "angry",
        Fatigue => "fatigue",
    }
}

closed_tags! {
    /// Polarity of the transcribed text.
    pub enum TextSentiment("text sentiment") {
        Positive => "positive",
        Neutral => "neutral",
        Negative => "negative",
    }
}

closed_tags! {
    /// Coarse time-of-day bucket.
    pub enum TimeOfDay("time of day") {
        Morning => "morning",
        Afternoon => "afternoon",
        Evening => "evening",
        Night => "night",
    }
}

closed_tags! {
    /// The six behavioural profiles.
    pub enum Personality("personality") {
        /// Efficiency-oriented, professional.
        StandardAssistant => "StandardAssistant",
        /// Affectionate and playful.
        CuteCat => "CuteCat",
        /// Authoritative, results first.
        ColdBoss => "ColdBoss",
        /// Empathetic, nurturing.
        WarmSister => "WarmSister",
        /// Detached, long-timescale.
        AnimeWizard => "AnimeWizard",
        /// Confrontational motivator.
        SarcasticFighter => "SarcasticFighter",
    }
}

impl Default for Personality {
    fn default() -> Self {
        Personality::StandardAssistant
    }
}

closed_tags! {
    /// Decision strategy requested by the caller.
    pub enum AgentMode("agent mode") {
        /// Rules first, then the tabular learner.
        QLearning => "QLearning",
        /// Alternative policy slot.
        Gspo => "GSPO",
        Hybrid => "Hybrid",
    }
}

impl Default for AgentMode {
    fn default() -> Self {
        AgentMode::QLearning
    }
}

// ============================================================================
// Perception
// ============================================================================

/// What the perception collaborators observed for this interaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerceptionInput {
    /// Transcribed user speech.
    #[serde(default)]
    pub user_text: String,

    #[serde(default)]
    pub speech_emotion: Option<SpeechEmotion>,

    #[serde(default)]
    pub text_sentiment: Option<TextSentiment>,

    /// Free-form context flags (`deadline_near`, `sitting_over_2h`, ...).
    #[serde(default)]
    pub context_flags: BTreeSet<String>,

    #[serde(default)]
    pub time_of_day: Option<TimeOfDay>,
}

impl PerceptionInput {
    /// Create a perception record carrying only transcribed text.
    pub fn new(user_text: impl Into<String>) -> Self {
        Self {
            user_text: user_text.into(),
            ..Default::default()
        }
    }

    pub fn with_emotion(mut self, emotion: SpeechEmotion) -> Self {
        self.speech_emotion = Some(emotion);
        self
    }

    pub fn with_sentiment(mut self, sentiment: TextSentiment) -> Self {
        self.text_sentiment = Some(sentiment);
        self
    }

    pub fn with_time_of_day(mut self, time_of_day: TimeOfDay) -> Self {
        self.time_of_day = Some(time_of_day);
        self
    }

    /// Add context flags.
    pub fn with_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.context_flags.extend(flags.into_iter().map(Into::into));
        self
    }

    /// Whether a context flag is set.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.context_flags.contains(flag)
    }
}

// ============================================================================
// Memory
// ============================================================================

/// One remembered event supplied by the memory collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEpisode {
    /// Event description.
    pub event: String,

    /// Emotion label attached when the episode was stored (free-form).
    #[serde(default)]
    pub emotion: Option<String>,

    /// RFC 3339 timestamp.
    #[serde(default)]
    pub ts: Option<String>,
}

impl MemoryEpisode {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            emotion: None,
            ts: None,
        }
    }
}

/// Facts and episodes relevant to this interaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryInput {
    #[serde(default)]
    pub facts: Vec<String>,

    #[serde(default)]
    pub episodes: Vec<MemoryEpisode>,
}

// ============================================================================
// System context
// ============================================================================

/// Caller-selected configuration for this interaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemContext {
    #[serde(default)]
    pub personality: Personality,

    #[serde(default)]
    pub long_term_goals: Vec<String>,

    #[serde(default)]
    pub agent_mode: AgentMode,
}

// ============================================================================
// Snapshot
// ============================================================================

/// Complete input for one decision call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextSnapshot {
    pub perception_input: PerceptionInput,

    #[serde(default)]
    pub memory_input: MemoryInput,

    #[serde(default)]
    pub system_context: SystemContext,
}

impl ContextSnapshot {
    /// Snapshot with empty memory and the default system context.
    pub fn new(perception_input: PerceptionInput) -> Self {
        Self {
            perception_input,
            ..Default::default()
        }
    }

    pub fn with_personality(mut self, personality: Personality) -> Self {
        self.system_context.personality = personality;
        self
    }

    pub fn with_episodes<I>(mut self, episodes: I) -> Self
    where
        I: IntoIterator<Item = MemoryEpisode>,
    {
        self.memory_input.episodes.extend(episodes);
        self
    }

    pub fn with_facts<I, S>(mut self, facts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.memory_input.facts.extend(facts.into_iter().map(Into::into));
        self
    }

    /// The active personality.
    pub fn personality(&self) -> Personality {
        self.system_context.personality
    }

    /// Decode and validate a snapshot from JSON.
    ///
    /// Tags outside their closed sets fail decoding; the remaining field
    /// checks run in [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self, ContractError> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Boundary checks that the type system cannot express.
    pub fn validate(&self) -> Result<(), ContractError> {
        if let Some(flag) = self
            .perception_input
            .context_flags
            .iter()
            .find(|f| f.trim().is_empty() || f.chars().any(char::is_whitespace))
        {
            return Err(ContractError::Validation(format!(
                "context flag {flag:?} must be a non-empty token without whitespace"
            )));
        }

        for (i, episode) in self.memory_input.episodes.iter().enumerate() {
            if episode.event.trim().is_empty() {
                return Err(ContractError::Validation(format!(
                    "memory episode {i} has an empty event description"
                )));
            }
            if let Some(ts) = &episode.ts {
                chrono::DateTime::parse_from_rfc3339(ts).map_err(|e| {
                    ContractError::Validation(format!(
                        "memory episode {i} timestamp {ts:?} is not RFC 3339: {e}"
                    ))
                })?;
            }
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
