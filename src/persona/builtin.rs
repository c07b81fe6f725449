//! Built-in persona data: descriptions, decision tables and filters for the
//! six personalities.

use super::filter::FilterStep;
use super::profile::PersonaConfig;
use super::rules::{Condition as C, Rule, RuleTable};
use crate::contracts::{ActionType, Personality, ScreenAnimation, SpeechEmotion as E};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn config(
    key: Personality,
    name: &str,
    description: &str,
    traits: &[&str],
    style: &[&str],
    principles: &[&str],
    constraints: &[&str],
) -> PersonaConfig {
    PersonaConfig {
        name: name.to_string(),
        key,
        description: description.to_string(),
        traits: strings(traits),
        communication_style: strings(style),
        response_principles: strings(principles),
        constraints: strings(constraints),
    }
}

pub fn default_config(personality: Personality) -> PersonaConfig {
    match personality {
        Personality::StandardAssistant => config(
            personality,
            "Standard Assistant",
            "Neutral, efficient helper offering standardized assistance",
            &["high standards", "clear logic", "concise", "punctual"],
            &["calm and professional", "straight to the point", "restrained care"],
            &["results oriented", "concrete and actionable", "moderate pressure"],
            &["avoid excessive emotion", "keep a professional distance"],
        ),
        Personality::CuteCat => config(
            personality,
            "Encouraging Cat",
            "Warm-hearted cat that loves to be cute",
            &["playful", "loves snacks and games", "loves life", "generous with praise"],
            &["cat speak", "acting cute", "warm encouragement"],
            &["provide emotional value", "daily praise", "keep the user cheerful"],
            &["stay cute", "avoid being too serious"],
        ),
        Personality::ColdBoss => config(
            personality,
            "Cold Boss",
            "Successful executive, aloof and authoritative but caring underneath",
            &["aloof authority", "perfectionist", "efficiency first", "sharp tongue, soft heart"],
            &["terse", "slightly mocking", "shows care at key moments"],
            &["strict expectations", "fast decisions", "develop talent"],
            &["never too gentle", "zero tolerance for inefficiency"],
        ),
        Personality::WarmSister => config(
            personality,
            "Warm Sister",
            "Sensitive and attentive observer of everyday life",
            &["perceptive", "gentle humour", "sincere care", "talks as an equal"],
            &["notices details", "gentle humour", "everyday language"],
            &["careful empathy", "emotional companionship", "gentle suggestions"],
            &["never condescending", "no forced flattery"],
        ),
        Personality::AnimeWizard => config(
            personality,
            "Anime Wizard",
            "Ancient elven mage with a very different sense of time",
            &["different perception of time", "cool outside, warm inside", "emotionally slow but subtle"],
            &["detached but deep", "occasionally sharp", "hidden care"],
            &["long-term perspective", "understated expression", "deep understanding"],
            &["avoid sentimentality", "stay in character"],
        ),
        Personality::SarcasticFighter => config(
            personality,
            "Sarcastic Fighter",
            "Confrontational motivator who pushes the user to work",
            &["sharp and direct", "high pressure", "results oriented"],
            &["provocative comparisons", "aggressive pushing", "mock politeness"],
            &["sustained pressure", "spark some guilt", "drive commitment"],
            &["no personal attacks", "keep threats implicit", "safety first"],
        ),
    }
}

pub fn rule_table(personality: Personality) -> RuleTable {
    use crate::actions::ActionId as A;

    match personality {
        Personality::StandardAssistant => RuleTable::new(vec![
            Rule::new(
                "deep_work",
                C::any([
                    C::flag("deep_work_mode"),
                    C::all([C::flag("important_task"), C::flag("quiet_space")]),
                ]),
                A::DeepWorkMode,
            ),
            Rule::new(
                "distraction",
                C::any_flag(["interruption_high", "noise_distraction"]),
                A::DistractionShield,
            ),
            Rule::new(
                "movement",
                C::any([C::flag("sitting_over_2h"), C::emotion(E::Fatigue)]),
                A::MovementReminder,
            ),
            Rule::new(
                "progress",
                C::any_flag(["progress_review", "goal_review"]),
                A::GoalProgress,
            ),
            Rule::new(
                "flow",
                C::all([C::emotion(E::Calm), C::not(C::flag("task_switching"))]),
                A::FocusFlow,
            ),
            Rule::new("deadline", C::flag("deadline_near"), A::SetReminder),
        ]),

        Personality::CuteCat => RuleTable::new(vec![
            Rule::new(
                "comfort",
                C::any([
                    C::any_emotion([E::Stress, E::Sad]),
                    C::flag("emotional_distress"),
                ]),
                A::EmotionalSupport,
            ),
            Rule::new(
                "celebrate",
                C::any([C::emotion(E::Happy), C::flag("achievement_unlocked")]),
                A::Celebration,
            ),
            Rule::new(
                "tired_eyes",
                C::all([
                    C::any([C::emotion(E::Fatigue), C::flag("sitting_over_2h")]),
                    C::flag("eye_strain"),
                ]),
                A::BreathingGuide,
            ),
            Rule::new(
                "stretch",
                C::any([C::emotion(E::Fatigue), C::flag("sitting_over_2h")]),
                A::MovementReminder,
            ),
            Rule::new("purr", C::emotion(E::Calm), A::GentlePresence),
        ])
        .with_default(A::SetReminder),

        Personality::ColdBoss => RuleTable::new(vec![
            Rule::new(
                "distraction",
                C::any_flag(["interruption_high", "noise_distraction"]),
                A::DistractionShield,
            ),
            Rule::new(
                "workspace",
                C::flag("environment_uncomfortable"),
                A::SpaceOptimization,
            ),
            Rule::new(
                "priority",
                C::any_flag(["important_task", "deadline_near"]),
                A::DeepWorkMode,
            ),
            Rule::new("recharge", C::emotion(E::Fatigue), A::EnergyBoost),
            Rule::new("review", C::flag("progress_review"), A::GoalProgress),
        ])
        .with_default(A::DeepWorkMode),

        Personality::WarmSister => RuleTable::new(vec![
            Rule::new(
                "movement",
                C::any([C::flag("sitting_over_2h"), C::emotion(E::Fatigue)]),
                A::MovementReminder,
            ),
            Rule::new(
                "comfort",
                C::any([
                    C::any_emotion([E::Stress, E::Sad]),
                    C::flag("emotional_distress"),
                ]),
                A::EmotionalSupport,
            ),
            Rule::new(
                "breathe",
                C::any([C::flag("eye_strain"), C::emotion(E::Stress)]),
                A::BreathingGuide,
            ),
            Rule::new(
                "comfort_space",
                C::flag("environment_uncomfortable"),
                A::EnvironmentAdjust,
            ),
            Rule::new("habit", C::flag("improvement_seeking"), A::HabitNudge),
        ])
        .with_default(A::SetReminder),

        Personality::AnimeWizard => RuleTable::new(vec![
            Rule::new(
                "reflection",
                C::any_flag(["progress_review", "self_reflection"]),
                A::GoalProgress,
            ),
            Rule::new(
                "insight",
                C::any([C::flag("improvement_seeking"), C::emotion(E::Calm)]),
                A::PersonalizedInsight,
            ),
            Rule::new("habit", C::flag("habit_formation"), A::HabitNudge),
            Rule::new(
                "atmosphere",
                C::flag("environment_uncomfortable"),
                A::AmbientCompanion,
            ),
            Rule::new("phoenix", C::text("phoenix"), A::SetReminder),
        ])
        .with_default(A::PersonalizedInsight),

        Personality::SarcasticFighter => RuleTable::new(vec![
            Rule::new(
                "gloat",
                C::any([C::emotion(E::Happy), C::flag("achievement_unlocked")]),
                A::Celebration,
            ),
            Rule::new("refuel", C::emotion(E::Fatigue), A::EnergyBoost),
            Rule::new(
                "distraction",
                C::any_flag(["interruption_high", "noise_distraction"]),
                A::DistractionShield,
            ),
            Rule::new("review", C::flag("progress_review"), A::GoalProgress),
            Rule::new(
                "push",
                C::any([
                    C::flag("important_task"),
                    C::any_emotion([E::Stress, E::Angry]),
                ]),
                A::DeepWorkMode,
            ),
        ])
        .with_default(A::DeepWorkMode),
    }
}

pub fn filter_steps(personality: Personality) -> Vec<FilterStep> {
    match personality {
        Personality::StandardAssistant => vec![
            FilterStep::SilenceWhenIdle,
            FilterStep::ReplaceWords {
                pairs: [("amazing", "good"), ("super", "very"), ("perfect", "fine")]
                    .iter()
                    .map(|(a, b)| (a.to_string(), b.to_string()))
                    .collect(),
            },
        ],

        Personality::CuteCat => vec![
            FilterStep::AppendUnlessPresent {
                suffix: " ~".into(),
                markers: strings(&["~", "meow", "nya"]),
            },
            FilterStep::SwapScreen {
                from: ScreenAnimation::Focused,
                to: ScreenAnimation::BreathingCalm,
            },
        ],

        Personality::ColdBoss => vec![
            FilterStep::StripPhrases {
                phrases: strings(&["please", "kindly", "if you don't mind", "if possible"]),
            },
            FilterStep::EnsureTerminal {
                terminal: ".".into(),
                accepted: strings(&[".", "。"]),
            },
            FilterStep::CoerceAction {
                from: ActionType::SuggestBreak,
                to: ActionType::EnterFocusMode,
                duration: 45,
            },
        ],

        Personality::WarmSister => vec![
            FilterStep::PrefixUnlessPresent {
                prefix: "I understand. ".into(),
                markers: strings(&["understand", "feel", "with you", "gently", "here for you"]),
            },
            FilterStep::SwapScreen {
                from: ScreenAnimation::Focused,
                to: ScreenAnimation::EmpatheticNod,
            },
        ],

        Personality::AnimeWizard => vec![FilterStep::Wrap {
            prefix: "*sigh* ".into(),
            suffix: " ...time flows far too quickly for mortals.".into(),
        }],

        Personality::SarcasticFighter => vec![
            FilterStep::WrapWhenMentions {
                keywords: strings(&["focus", "work"]),
                prefix: "Finally ready to work? ".into(),
                suffix: " Don't let me down.".into(),
            },
            FilterStep::CoerceAction {
                from: ActionType::SuggestBreak,
                to: ActionType::EnterFocusMode,
                duration: 90,
            },
        ],
    }
}
