//! The closed set of companion actions and how each one renders into an
//! output command.
//!
//! The learner's value table is indexed by [`ActionId::index`], so the
//! declaration order below is also the tie-break order for greedy selection.

mod catalog;
mod messages;

pub use catalog::{render, spec, template, template_for_key, ActionSpec, CATALOG};
pub use messages::message;

closed_tags! {
    /// Abstract companion action chosen by a rule or by the learner.
    pub enum ActionId("action id") {
        DeepWorkMode => "deep_work_mode",
        FocusFlow => "focus_flow",
        EnergyBoost => "energy_boost",
        MovementReminder => "movement_reminder",
        BreathingGuide => "breathing_guide",
        EnvironmentAdjust => "environment_adjust",
        EmotionalSupport => "emotional_support",
        Celebration => "celebration",
        GentlePresence => "gentle_presence",
        GoalProgress => "goal_progress",
        HabitNudge => "habit_nudge",
        PersonalizedInsight => "personalized_insight",
        SpaceOptimization => "space_optimization",
        DistractionShield => "distraction_shield",
        AmbientCompanion => "ambient_companion",
        SetReminder => "set_reminder",
        /// Silent companionship.
        Noop => "none",
    }
}

closed_tags! {
    /// Grouping used for reporting.
    pub enum ActionFamily("action family") {
        WorkRhythm => "work_rhythm",
        Health => "health",
        EmotionalConnection => "emotional_connection",
        Personalization => "personalization",
        Environment => "environment",
        Legacy => "legacy",
    }
}

impl ActionId {
    pub fn family(self) -> ActionFamily {
        use ActionId::*;
        match self {
            DeepWorkMode | FocusFlow | EnergyBoost => ActionFamily::WorkRhythm,
            MovementReminder | BreathingGuide | EnvironmentAdjust => ActionFamily::Health,
            EmotionalSupport | Celebration | GentlePresence => ActionFamily::EmotionalConnection,
            GoalProgress | HabitNudge | PersonalizedInsight => ActionFamily::Personalization,
            SpaceOptimization | DistractionShield | AmbientCompanion => ActionFamily::Environment,
            SetReminder | Noop => ActionFamily::Legacy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_size_and_order() {
        assert_eq!(ActionId::COUNT, 17);
        assert_eq!(ActionId::ALL.first(), Some(&ActionId::DeepWorkMode));
        assert_eq!(ActionId::ALL.last(), Some(&ActionId::Noop));
        for (i, id) in ActionId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn test_families() {
        assert_eq!(ActionId::BreathingGuide.family(), ActionFamily::Health);
        assert_eq!(ActionId::DistractionShield.family(), ActionFamily::Environment);
        assert_eq!(ActionId::Noop.family(), ActionFamily::Legacy);
        let per_family = ActionFamily::ALL
            .iter()
            .map(|f| ActionId::ALL.iter().filter(|a| a.family() == *f).count())
            .collect::<Vec<_>>();
        assert_eq!(per_family, vec![3, 3, 3, 3, 3, 2]);
    }

    #[test]
    fn test_wire_tags() {
        assert_eq!("none".parse::<ActionId>().unwrap(), ActionId::Noop);
        assert_eq!(
            serde_json::to_string(&ActionId::DistractionShield).unwrap(),
            "\"distraction_shield\""
        );
        assert!("A_NONE".parse::<ActionId>().is_err());
    }
}
