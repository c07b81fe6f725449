//! Collapses a snapshot into a compact state key.
//!
//! The key has five dimensions in fixed order, each prefixed by its tag:
//!
//! ```text
//! RHYTHM_<x>|HEALTH_<x>|EMOTION_<x>|GOAL_<x>|ENV_<x>
//! ```
//!
//! Every dimension is a first-match-wins cascade over the raw flags, the
//! emotion/sentiment tags and the memory episodes.  The function is pure and
//! never fails; absent fields fall back to empty text and an `unknown` time
//! of day.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::contracts::{
    ContextSnapshot, MemoryInput, PerceptionInput, SpeechEmotion, TextSentiment, TimeOfDay,
};
use crate::error::ContractError;

/// Separator between dimension segments.
pub const SEGMENT_SEPARATOR: char = '|';

/// Dimension prefixes, in key order.
pub const DIMENSION_TAGS: [&str; 5] = ["RHYTHM", "HEALTH", "EMOTION", "GOAL", "ENV"];

/// Text keywords naming the tracked flagship project.
pub const FLAGSHIP_KEYWORDS: [&str; 2] = ["phoenix", "flagship project"];

/// Episode keywords that count as goal-related activity.
pub const GOAL_KEYWORDS: [&str; 3] = ["goal", "plan", "project"];

/// Episode keyword that counts as a past interaction.
pub const INTERACTION_KEYWORD: &str = "interaction";

const CONNECTED_MIN_INTERACTIONS: usize = 5;
const ACTIVE_MIN_GOAL_EPISODES: usize = 3;

// ============================================================================
// StateKey
// ============================================================================

/// Opaque learner lookup key derived from a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateKey(String);

impl StateKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The five `TAG_value` segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEGMENT_SEPARATOR)
    }

    /// Accept a key supplied from outside the pipeline.
    ///
    /// The key must have five segments, each carrying its dimension tag in
    /// order followed by a non-empty value.
    pub fn parse(key: &str) -> Result<StateKey, ContractError> {
        let segments: Vec<&str> = key.split(SEGMENT_SEPARATOR).collect();
        if segments.len() != DIMENSION_TAGS.len() {
            return Err(ContractError::Validation(format!(
                "state key {key:?} has {} segments, expected {}",
                segments.len(),
                DIMENSION_TAGS.len()
            )));
        }

        for (segment, tag) in segments.iter().zip(DIMENSION_TAGS) {
            let value = segment
                .strip_prefix(tag)
                .and_then(|rest| rest.strip_prefix('_'))
                .filter(|value| !value.is_empty() && !value.chars().any(char::is_whitespace));
            if value.is_none() {
                return Err(ContractError::Validation(format!(
                    "state key segment {segment:?} must be {tag}_<value>"
                )));
            }
        }

        Ok(StateKey(key.to_string()))
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StateKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<StateKey> for String {
    fn from(key: StateKey) -> Self {
        key.0
    }
}

// ============================================================================
// Discretization
// ============================================================================

/// Derive the state key for a snapshot.
pub fn discretize(snapshot: &ContextSnapshot) -> StateKey {
    let p = &snapshot.perception_input;
    let m = &snapshot.memory_input;

    let env = environment(p);
    let values: [&str; 5] = [
        work_rhythm(p),
        health_status(p),
        emotional_state(p, m),
        goal_context(p, m),
        &env,
    ];

    let key = DIMENSION_TAGS
        .iter()
        .zip(values.iter())
        .map(|(tag, value)| format!("{tag}_{value}"))
        .collect::<Vec<_>>()
        .join(&SEGMENT_SEPARATOR.to_string());

    StateKey(key)
}

fn work_rhythm(p: &PerceptionInput) -> &'static str {
    let emotion = p.speech_emotion;

    if p.has_flag("deep_work_mode") {
        "deep_focus"
    } else if emotion == Some(SpeechEmotion::Stress) && p.has_flag("deadline_near") {
        "intense_work"
    } else if emotion == Some(SpeechEmotion::Fatigue) {
        "energy_low"
    } else if emotion == Some(SpeechEmotion::Calm) && !p.has_flag("task_switching") {
        "steady_flow"
    } else if p.has_flag("task_switching") || p.has_flag("interruption_high") {
        "fragmented"
    } else {
        "normal"
    }
}

fn health_status(p: &PerceptionInput) -> &'static str {
    if p.has_flag("sitting_over_2h") {
        return "sitting_long";
    }
    if p.has_flag("sitting_over_1h") {
        return "sitting_moderate";
    }

    match p.speech_emotion {
        Some(SpeechEmotion::Stress | SpeechEmotion::Angry) if p.has_flag("high_workload") => {
            return "stress_high"
        }
        Some(SpeechEmotion::Fatigue) => return "energy_depleted",
        _ => {}
    }

    if p.has_flag("environment_uncomfortable") {
        "env_poor"
    } else {
        "healthy"
    }
}

fn emotional_state(p: &PerceptionInput, m: &MemoryInput) -> &'static str {
    match (p.speech_emotion, p.text_sentiment) {
        (Some(SpeechEmotion::Stress), Some(TextSentiment::Negative)) => return "overwhelmed",
        (Some(SpeechEmotion::Sad), _) => return "need_comfort",
        (Some(SpeechEmotion::Happy), _) => return "positive_mood",
        (Some(SpeechEmotion::Fatigue), _) => return "emotionally_drained",
        _ => {}
    }

    match count_episodes(m, &[INTERACTION_KEYWORD]) {
        n if n > CONNECTED_MIN_INTERACTIONS => "connected",
        0 => "distant",
        _ => "neutral",
    }
}

fn goal_context(p: &PerceptionInput, m: &MemoryInput) -> &'static str {
    if mentions_flagship(&p.user_text) {
        return if p.has_flag("deadline_near") {
            "important_behind"
        } else {
            "important_progress"
        };
    }

    match count_episodes(m, &GOAL_KEYWORDS) {
        n if n > ACTIVE_MIN_GOAL_EPISODES => "goal_active",
        0 => "goal_unclear",
        _ => "routine",
    }
}

fn environment(p: &PerceptionInput) -> String {
    let tod = p.time_of_day.map(TimeOfDay::as_str).unwrap_or("unknown");

    match p.time_of_day {
        Some(TimeOfDay::Morning) if p.has_flag("energy_high") => {
            return "morning_fresh".to_string()
        }
        Some(TimeOfDay::Afternoon) if p.has_flag("post_lunch_dip") => {
            return "afternoon_low".to_string()
        }
        Some(TimeOfDay::Evening) if p.has_flag("overtime") => {
            return "evening_overtime".to_string()
        }
        _ => {}
    }

    let ambience = if p.has_flag("interruption_high") {
        "chaotic"
    } else if p.has_flag("quiet_space") {
        "peaceful"
    } else {
        "normal"
    };

    format!("{tod}_{ambience}")
}

/// Whether free text references the flagship project.
pub fn mentions_flagship(text: &str) -> bool {
    let lower = text.to_lowercase();
    FLAGSHIP_KEYWORDS.iter().any(|k| lower.contains(k))
}

fn count_episodes(m: &MemoryInput, keywords: &[&str]) -> usize {
    m.episodes
        .iter()
        .filter(|ep| {
            let event = ep.event.to_lowercase();
            keywords.iter().any(|k| event.contains(k))
        })
        .count()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::MemoryEpisode;

    fn snapshot(p: PerceptionInput) -> ContextSnapshot {
        ContextSnapshot::new(p)
    }

    fn segment(key: &StateKey, index: usize) -> String {
        key.segments().nth(index).unwrap().to_string()
    }

    fn episodes(event: &str, n: usize) -> Vec<MemoryEpisode> {
        (0..n).map(|i| MemoryEpisode::new(format!("{event} #{i}"))).collect()
    }

    #[test]
    fn test_key_has_five_tagged_segments_in_order() {
        let inputs = vec![
            PerceptionInput::default(),
            PerceptionInput::new("phoenix").with_emotion(SpeechEmotion::Stress),
            PerceptionInput::default()
                .with_emotion(SpeechEmotion::Fatigue)
                .with_time_of_day(TimeOfDay::Night)
                .with_flags(["sitting_over_2h", "interruption_high"]),
        ];
        for p in inputs {
            let key = discretize(&snapshot(p));
            let parts: Vec<&str> = key.segments().collect();
            assert_eq!(parts.len(), 5, "key {key}");
            for (part, tag) in parts.iter().zip(DIMENSION_TAGS.iter()) {
                assert!(part.starts_with(&format!("{tag}_")), "{part} in {key}");
            }
        }
    }

    #[test]
    fn test_parse_accepts_discretized_keys() {
        let key = discretize(&snapshot(
            PerceptionInput::default().with_emotion(SpeechEmotion::Fatigue),
        ));
        assert_eq!(StateKey::parse(key.as_str()).unwrap(), key);
    }

    #[test]
    fn test_parse_rejects_malformed_keys() {
        for bad in [
            "",
            "s",
            "RHYTHM_normal|HEALTH_healthy|EMOTION_distant|GOAL_goal_unclear",
            "HEALTH_healthy|RHYTHM_normal|EMOTION_distant|GOAL_goal_unclear|ENV_unknown_normal",
            "RHYTHM_|HEALTH_healthy|EMOTION_distant|GOAL_goal_unclear|ENV_unknown_normal",
            "RHYTHMnormal|HEALTH_healthy|EMOTION_distant|GOAL_goal_unclear|ENV_unknown_normal",
            "RHYTHM_normal|HEALTH_healthy|EMOTION_distant|GOAL_goal_unclear|ENV_unknown_normal|X_y",
        ] {
            let err = StateKey::parse(bad).unwrap_err();
            assert!(matches!(err, ContractError::Validation(_)), "{bad:?}");
        }
    }

    #[test]
    fn test_empty_snapshot_key() {
        let key = discretize(&ContextSnapshot::default());
        assert_eq!(
            key.as_str(),
            "RHYTHM_normal|HEALTH_healthy|EMOTION_distant|GOAL_goal_unclear|ENV_unknown_normal"
        );
    }

    #[test]
    fn test_rhythm_priority() {
        let deep = PerceptionInput::default()
            .with_emotion(SpeechEmotion::Stress)
            .with_flags(["deep_work_mode", "deadline_near"]);
        assert_eq!(segment(&discretize(&snapshot(deep)), 0), "RHYTHM_deep_focus");

        let intense = PerceptionInput::default()
            .with_emotion(SpeechEmotion::Stress)
            .with_flags(["deadline_near"]);
        assert_eq!(segment(&discretize(&snapshot(intense)), 0), "RHYTHM_intense_work");

        let tired = PerceptionInput::default().with_emotion(SpeechEmotion::Fatigue);
        assert_eq!(segment(&discretize(&snapshot(tired)), 0), "RHYTHM_energy_low");

        let calm = PerceptionInput::default()
            .with_emotion(SpeechEmotion::Calm)
            .with_flags(["interruption_high"]);
        assert_eq!(segment(&discretize(&snapshot(calm)), 0), "RHYTHM_steady_flow");

        let calm_switching = PerceptionInput::default()
            .with_emotion(SpeechEmotion::Calm)
            .with_flags(["task_switching"]);
        assert_eq!(
            segment(&discretize(&snapshot(calm_switching)), 0),
            "RHYTHM_fragmented"
        );
    }

    #[test]
    fn test_health_priority() {
        let both = PerceptionInput::default().with_flags(["sitting_over_1h", "sitting_over_2h"]);
        assert_eq!(segment(&discretize(&snapshot(both)), 1), "HEALTH_sitting_long");

        let angry = PerceptionInput::default()
            .with_emotion(SpeechEmotion::Angry)
            .with_flags(["high_workload", "environment_uncomfortable"]);
        assert_eq!(segment(&discretize(&snapshot(angry)), 1), "HEALTH_stress_high");

        let stress_only = PerceptionInput::default()
            .with_emotion(SpeechEmotion::Stress)
            .with_flags(["environment_uncomfortable"]);
        assert_eq!(segment(&discretize(&snapshot(stress_only)), 1), "HEALTH_env_poor");

        let tired = PerceptionInput::default().with_emotion(SpeechEmotion::Fatigue);
        assert_eq!(segment(&discretize(&snapshot(tired)), 1), "HEALTH_energy_depleted");
    }

    #[test]
    fn test_emotion_falls_back_to_interaction_history() {
        let overwhelmed = PerceptionInput::default()
            .with_emotion(SpeechEmotion::Stress)
            .with_sentiment(TextSentiment::Negative);
        assert_eq!(
            segment(&discretize(&snapshot(overwhelmed)), 2),
            "EMOTION_overwhelmed"
        );

        let connected = snapshot(PerceptionInput::default())
            .with_episodes(episodes("Morning Interaction", 6));
        assert_eq!(segment(&discretize(&connected), 2), "EMOTION_connected");

        let five = snapshot(PerceptionInput::default()).with_episodes(episodes("interaction", 5));
        assert_eq!(segment(&discretize(&five), 2), "EMOTION_neutral");

        let stress_positive = PerceptionInput::default()
            .with_emotion(SpeechEmotion::Stress)
            .with_sentiment(TextSentiment::Positive);
        assert_eq!(
            segment(&discretize(&snapshot(stress_positive)), 2),
            "EMOTION_distant"
        );
    }

    #[test]
    fn test_goal_dimension() {
        let behind = PerceptionInput::new("The PHOENIX draft is due").with_flags(["deadline_near"]);
        assert_eq!(segment(&discretize(&snapshot(behind)), 3), "GOAL_important_behind");

        let progress = PerceptionInput::new("phoenix is going well");
        assert_eq!(
            segment(&discretize(&snapshot(progress)), 3),
            "GOAL_important_progress"
        );

        let active = snapshot(PerceptionInput::default()).with_episodes(vec![
            MemoryEpisode::new("set a goal"),
            MemoryEpisode::new("weekly plan"),
            MemoryEpisode::new("Project sync"),
            MemoryEpisode::new("another plan"),
        ]);
        assert_eq!(segment(&discretize(&active), 3), "GOAL_goal_active");

        let routine = snapshot(PerceptionInput::default()).with_episodes(episodes("plan", 3));
        assert_eq!(segment(&discretize(&routine), 3), "GOAL_routine");
    }

    #[test]
    fn test_environment_dimension() {
        let fresh = PerceptionInput::default()
            .with_time_of_day(TimeOfDay::Morning)
            .with_flags(["energy_high", "interruption_high"]);
        assert_eq!(segment(&discretize(&snapshot(fresh)), 4), "ENV_morning_fresh");

        let dip = PerceptionInput::default()
            .with_time_of_day(TimeOfDay::Afternoon)
            .with_flags(["post_lunch_dip"]);
        assert_eq!(segment(&discretize(&snapshot(dip)), 4), "ENV_afternoon_low");

        let overtime = PerceptionInput::default()
            .with_time_of_day(TimeOfDay::Evening)
            .with_flags(["overtime"]);
        assert_eq!(segment(&discretize(&snapshot(overtime)), 4), "ENV_evening_overtime");

        let chaotic = PerceptionInput::default()
            .with_time_of_day(TimeOfDay::Afternoon)
            .with_flags(["interruption_high", "quiet_space"]);
        assert_eq!(segment(&discretize(&snapshot(chaotic)), 4), "ENV_afternoon_chaotic");

        let peaceful = PerceptionInput::default().with_flags(["quiet_space"]);
        assert_eq!(segment(&discretize(&snapshot(peaceful)), 4), "ENV_unknown_peaceful");

        let morning_no_energy = PerceptionInput::default().with_time_of_day(TimeOfDay::Morning);
        assert_eq!(
            segment(&discretize(&snapshot(morning_no_energy)), 4),
            "ENV_morning_normal"
        );
    }

    #[test]
    fn test_discretize_is_deterministic() {
        let s = snapshot(
            PerceptionInput::new("phoenix")
                .with_emotion(SpeechEmotion::Stress)
                .with_flags(["deadline_near", "interruption_high"])
                .with_time_of_day(TimeOfDay::Afternoon),
        );
        assert_eq!(discretize(&s), discretize(&s.clone()));
        assert_eq!(
            discretize(&s).as_str(),
            "RHYTHM_intense_work|HEALTH_healthy|EMOTION_distant|GOAL_important_behind|ENV_afternoon_chaotic"
        );
    }
}
