//! Ordered first-match decision tables.
//!
//! A [`RuleTable`] is literal data: a list of named rules, each a
//! [`Condition`] over the raw perception (flags, speech emotion, free text)
//! and the [`ActionId`] it selects.  Rules are evaluated in order and the
//! first one whose condition holds wins; if none hold, the optional table
//! default applies, and failing that the caller falls through to the learner.
//!
//! ```text
//! perception ─▶ rule[0]? ─▶ rule[1]? ─▶ ... ─▶ default? ─▶ None
//!                  │            │                 │
//!                  ▼            ▼                 ▼
//!              RuleMatch    RuleMatch         RuleMatch
//! ```
//!
//! Because conditions are data, a table can be checked for rules whose
//! conditions overlap (first-match order silently decides between them) and
//! for rules that can never fire.  See [`RuleTable::ambiguities`].

use std::collections::BTreeSet;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::actions::ActionId;
use crate::contracts::{PerceptionInput, SpeechEmotion};

/// Boolean atoms above this count are not enumerated by the ambiguity check.
pub const MAX_ANALYSED_ATOMS: usize = 16;

// ============================================================================
// Conditions
// ============================================================================

/// Predicate over the observable facts of one interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// A context flag is set.
    Flag(String),
    /// The speech emotion equals this tag.
    Emotion(SpeechEmotion),
    /// The user text contains this keyword (case-insensitive).
    TextContains(String),
    Not(Box<Condition>),
    AnyOf(Vec<Condition>),
    AllOf(Vec<Condition>),
}

/// Observable facts a condition is evaluated against.
pub trait Facts {
    fn flag(&self, name: &str) -> bool;
    fn emotion(&self) -> Option<SpeechEmotion>;
    fn text_contains(&self, keyword: &str) -> bool;
}

impl Facts for PerceptionInput {
    fn flag(&self, name: &str) -> bool {
        self.has_flag(name)
    }

    fn emotion(&self) -> Option<SpeechEmotion> {
        self.speech_emotion
    }

    fn text_contains(&self, keyword: &str) -> bool {
        self.user_text
            .to_lowercase()
            .contains(&keyword.to_lowercase())
    }
}

impl Condition {
    pub fn flag(name: impl Into<String>) -> Self {
        Condition::Flag(name.into())
    }

    pub fn emotion(emotion: SpeechEmotion) -> Self {
        Condition::Emotion(emotion)
    }

    pub fn text(keyword: impl Into<String>) -> Self {
        Condition::TextContains(keyword.into())
    }

    pub fn not(inner: Condition) -> Self {
        Condition::Not(Box::new(inner))
    }

    pub fn any<I: IntoIterator<Item = Condition>>(conditions: I) -> Self {
        Condition::AnyOf(conditions.into_iter().collect())
    }

    pub fn all<I: IntoIterator<Item = Condition>>(conditions: I) -> Self {
        Condition::AllOf(conditions.into_iter().collect())
    }

    /// Any of the named flags.
    pub fn any_flag<'a, I: IntoIterator<Item = &'a str>>(names: I) -> Self {
        Condition::any(names.into_iter().map(Condition::flag))
    }

    /// Any of the listed emotions.
    pub fn any_emotion<I: IntoIterator<Item = SpeechEmotion>>(emotions: I) -> Self {
        Condition::any(emotions.into_iter().map(Condition::Emotion))
    }

    pub fn holds<F: Facts + ?Sized>(&self, facts: &F) -> bool {
        match self {
            Condition::Flag(name) => facts.flag(name),
            Condition::Emotion(e) => facts.emotion() == Some(*e),
            Condition::TextContains(k) => facts.text_contains(k),
            Condition::Not(inner) => !inner.holds(facts),
            Condition::AnyOf(cs) => cs.iter().any(|c| c.holds(facts)),
            Condition::AllOf(cs) => cs.iter().all(|c| c.holds(facts)),
        }
    }

    fn collect_atoms(&self, flags: &mut BTreeSet<String>, keywords: &mut BTreeSet<String>) {
        match self {
            Condition::Flag(name) => {
                flags.insert(name.clone());
            }
            Condition::TextContains(k) => {
                keywords.insert(k.to_lowercase());
            }
            Condition::Emotion(_) => {}
            Condition::Not(inner) => inner.collect_atoms(flags, keywords),
            Condition::AnyOf(cs) | Condition::AllOf(cs) => {
                for c in cs {
                    c.collect_atoms(flags, keywords);
                }
            }
        }
    }
}

// ============================================================================
// Rules and tables
// ============================================================================

/// One named entry of a decision table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    pub when: Condition,
    pub action: ActionId,
}

impl Rule {
    pub fn new(name: impl Into<String>, when: Condition, action: ActionId) -> Self {
        Self {
            name: name.into(),
            when,
            action,
        }
    }
}

/// Result of a successful rule lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleMatch {
    /// Name of the matching rule; `None` when the table default decided.
    pub rule: Option<String>,
    pub action: ActionId,
}

/// Ordered first-match table with an optional default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTable {
    #[serde(default)]
    pub rules: Vec<Rule>,

    #[serde(default)]
    pub default: Option<ActionId>,
}

/// A questionable pair or entry in a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Ambiguity {
    /// Both rules can hold at once and pick different actions; the earlier
    /// one always wins.
    Overlap { earlier: String, later: String },
    /// The rule never wins for any combination of facts.
    Unreachable { rule: String },
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            default: None,
        }
    }

    pub fn with_default(mut self, action: ActionId) -> Self {
        self.default = Some(action);
        self
    }

    /// First rule whose condition holds, else the default.
    pub fn resolve<F: Facts + ?Sized>(&self, facts: &F) -> Option<RuleMatch> {
        self.rules
            .iter()
            .find(|r| r.when.holds(facts))
            .map(|r| RuleMatch {
                rule: Some(r.name.clone()),
                action: r.action,
            })
            .or_else(|| self.default.map(|action| RuleMatch { rule: None, action }))
    }

    /// Enumerate every combination of the table's atoms and report
    /// overlapping and unreachable rules.
    ///
    /// Atoms are the referenced flags and text keywords (each true or
    /// false) and the speech emotion (absent or one of its tags).  Returns
    /// an empty list, with a warning, when the table references more than
    /// [`MAX_ANALYSED_ATOMS`] boolean atoms.
    pub fn ambiguities(&self) -> Vec<Ambiguity> {
        let mut flags = BTreeSet::new();
        let mut keywords = BTreeSet::new();
        for rule in &self.rules {
            rule.when.collect_atoms(&mut flags, &mut keywords);
        }

        let flags: Vec<String> = flags.into_iter().collect();
        let keywords: Vec<String> = keywords.into_iter().collect();
        let atoms = flags.len() + keywords.len();
        if atoms > MAX_ANALYSED_ATOMS {
            warn!(
                "Rule table references {} atoms, skipping ambiguity analysis (limit {})",
                atoms, MAX_ANALYSED_ATOMS
            );
            return Vec::new();
        }

        let n = self.rules.len();
        let mut overlaps = vec![vec![false; n]; n];
        let mut wins = vec![false; n];

        let emotions = std::iter::once(None).chain(SpeechEmotion::ALL.iter().copied().map(Some));
        for emotion in emotions {
            for mask in 0u32..(1u32 << atoms) {
                let world = World {
                    flags: &flags,
                    keywords: &keywords,
                    mask,
                    emotion,
                };
                let holding: Vec<usize> = (0..n).filter(|&i| self.rules[i].when.holds(&world)).collect();
                if let Some(&first) = holding.first() {
                    wins[first] = true;
                }
                for (k, &i) in holding.iter().enumerate() {
                    for &j in &holding[k + 1..] {
                        overlaps[i][j] = true;
                    }
                }
            }
        }

        let mut found = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                if overlaps[i][j] && self.rules[i].action != self.rules[j].action {
                    found.push(Ambiguity::Overlap {
                        earlier: self.rules[i].name.clone(),
                        later: self.rules[j].name.clone(),
                    });
                }
            }
        }
        for (i, won) in wins.iter().enumerate() {
            if !won {
                found.push(Ambiguity::Unreachable {
                    rule: self.rules[i].name.clone(),
                });
            }
        }
        found
    }
}

/// One truth assignment used by the ambiguity check.
struct World<'a> {
    flags: &'a [String],
    keywords: &'a [String],
    mask: u32,
    emotion: Option<SpeechEmotion>,
}

impl World<'_> {
    fn bit(&self, index: usize) -> bool {
        self.mask & (1 << index) != 0
    }
}

impl Facts for World<'_> {
    fn flag(&self, name: &str) -> bool {
        self.flags
            .iter()
            .position(|f| f == name)
            .map_or(false, |i| self.bit(i))
    }

    fn emotion(&self) -> Option<SpeechEmotion> {
        self.emotion
    }

    fn text_contains(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.keywords
            .iter()
            .position(|k| *k == keyword)
            .map_or(false, |i| self.bit(self.flags.len() + i))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RuleTable {
        RuleTable::new(vec![
            Rule::new("focus", Condition::flag("deep_work_mode"), ActionId::DeepWorkMode),
            Rule::new(
                "noisy",
                Condition::any_flag(["interruption_high", "noise_distraction"]),
                ActionId::DistractionShield,
            ),
            Rule::new(
                "calm",
                Condition::all([
                    Condition::emotion(SpeechEmotion::Calm),
                    Condition::not(Condition::flag("task_switching")),
                ]),
                ActionId::FocusFlow,
            ),
        ])
    }

    #[test]
    fn test_first_match_wins() {
        let p = PerceptionInput::default().with_flags(["interruption_high", "deep_work_mode"]);
        let m = table().resolve(&p).unwrap();
        assert_eq!(m.rule.as_deref(), Some("focus"));
        assert_eq!(m.action, ActionId::DeepWorkMode);
    }

    #[test]
    fn test_no_match_without_default() {
        let p = PerceptionInput::default()
            .with_emotion(SpeechEmotion::Calm)
            .with_flags(["task_switching"]);
        assert!(table().resolve(&p).is_none());
    }

    #[test]
    fn test_default_applies_when_nothing_matches() {
        let t = table().with_default(ActionId::SetReminder);
        let m = t.resolve(&PerceptionInput::default()).unwrap();
        assert!(m.rule.is_none());
        assert_eq!(m.action, ActionId::SetReminder);
    }

    #[test]
    fn test_text_condition_is_case_insensitive() {
        let t = RuleTable::new(vec![Rule::new(
            "phoenix",
            Condition::text("Phoenix"),
            ActionId::SetReminder,
        )]);
        assert!(t.resolve(&PerceptionInput::new("the PHOENIX draft")).is_some());
        assert!(t.resolve(&PerceptionInput::new("the report")).is_none());
    }

    #[test]
    fn test_overlaps_are_reported() {
        let found = table().ambiguities();
        assert!(found.contains(&Ambiguity::Overlap {
            earlier: "focus".into(),
            later: "noisy".into(),
        }));
        assert!(found.contains(&Ambiguity::Overlap {
            earlier: "noisy".into(),
            later: "calm".into(),
        }));
        assert!(!found.iter().any(|a| matches!(a, Ambiguity::Unreachable { .. })));
    }

    #[test]
    fn test_shadowed_rule_is_unreachable() {
        let t = RuleTable::new(vec![
            Rule::new("tired", Condition::any_flag(["fatigue", "sitting_over_2h"]), ActionId::MovementReminder),
            Rule::new(
                "tired_eyes",
                Condition::all([Condition::flag("fatigue"), Condition::flag("eye_strain")]),
                ActionId::BreathingGuide,
            ),
        ]);
        let found = t.ambiguities();
        assert!(found.contains(&Ambiguity::Unreachable {
            rule: "tired_eyes".into()
        }));
    }

    #[test]
    fn test_same_action_overlap_is_not_reported() {
        let t = RuleTable::new(vec![
            Rule::new("a", Condition::flag("x"), ActionId::Celebration),
            Rule::new("b", Condition::flag("y"), ActionId::Celebration),
        ]);
        assert!(t.ambiguities().is_empty());
    }

    #[test]
    fn test_table_yaml_shape() {
        let yaml = r#"
rules:
  - name: noisy
    when:
      any_of:
        - flag: interruption_high
        - emotion: angry
    action: distraction_shield
  - name: tired_not_busy
    when:
      all_of:
        - emotion: fatigue
        - not:
            flag: deadline_near
    action: movement_reminder
default: deep_work_mode
"#;
        let t: RuleTable = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(t.rules.len(), 2);
        assert_eq!(t.default, Some(ActionId::DeepWorkMode));
        let p = PerceptionInput::default().with_emotion(SpeechEmotion::Angry);
        assert_eq!(t.resolve(&p).unwrap().action, ActionId::DistractionShield);

        let tired = PerceptionInput::default().with_emotion(SpeechEmotion::Fatigue);
        assert_eq!(t.resolve(&tired).unwrap().action, ActionId::MovementReminder);
        let rushed = tired.with_flags(["deadline_near"]);
        assert_eq!(t.resolve(&rushed).unwrap().action, ActionId::DeepWorkMode);

        let back: RuleTable = serde_yaml::from_str(&serde_yaml::to_string(&t).unwrap()).unwrap();
        assert_eq!(back, t);
    }
}
