//! Static action table and the templater.

use log::debug;

use super::{message, ActionId};
use crate::contracts::{
    Action, ActionType, ExecutionOutput, LightEffect, OutputCommand, Personality, ScreenAnimation,
    TtsOutput,
};

/// Fixed rendering of one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSpec {
    pub id: ActionId,
    pub screen: ScreenAnimation,
    pub light: LightEffect,
    pub action_type: ActionType,
    /// Whether the related task is carried into the action parameters.
    pub carries_task: bool,
}

const fn entry(
    id: ActionId,
    screen: ScreenAnimation,
    light: LightEffect,
    action_type: ActionType,
    carries_task: bool,
) -> ActionSpec {
    ActionSpec {
        id,
        screen,
        light,
        action_type,
        carries_task,
    }
}

/// One entry per [`ActionId`], in catalog order.
pub const CATALOG: [ActionSpec; ActionId::COUNT] = {
    use crate::actions::ActionId as A;
    use crate::contracts::{ActionType as T, LightEffect as L, ScreenAnimation as S};
    [
        entry(A::DeepWorkMode, S::DeepFocusShield, L::FocusDeepBlue, T::DeepWorkProtection, true),
        entry(A::FocusFlow, S::FlowWaves, L::FlowGradient, T::FocusFlowGuidance, false),
        entry(A::EnergyBoost, S::EnergySpark, L::EnergizingOrange, T::EnergyBoostSuggestion, false),
        entry(A::MovementReminder, S::GentleStretch, L::HealthGreenPulse, T::MovementReminder, false),
        entry(A::BreathingGuide, S::BreathingGuide, L::CalmBreathing, T::BreathingRelaxation, false),
        entry(A::EnvironmentAdjust, S::EnvironmentAdjust, L::ComfortWarm, T::EnvironmentOptimization, false),
        entry(A::EmotionalSupport, S::EmpatheticPresence, L::WarmEmbrace, T::EmotionalSupport, false),
        entry(A::Celebration, S::CelebrationSparkle, L::JoyRainbow, T::AchievementCelebration, false),
        entry(A::GentlePresence, S::GentlePulse, L::SoftPresence, T::QuietCompanionship, false),
        entry(A::GoalProgress, S::ProgressChart, L::ProgressBlue, T::GoalProgressReview, true),
        entry(A::HabitNudge, S::HabitFormation, L::HabitPurple, T::HabitFormationNudge, false),
        entry(A::PersonalizedInsight, S::WisdomSharing, L::InsightGold, T::PersonalizedInsight, false),
        entry(A::SpaceOptimization, S::SpaceHarmony, L::OptimizationWhite, T::WorkspaceOptimization, false),
        entry(A::DistractionShield, S::ShieldProtection, L::ProtectionCyan, T::DistractionProtection, false),
        entry(A::AmbientCompanion, S::AmbientWaves, L::AmbientMood, T::AmbientAtmosphere, false),
        entry(A::SetReminder, S::EmpatheticNod, L::WarmYellowGlow, T::SetReminder, true),
        entry(A::Noop, S::GentleBreathing, L::SoftAmbient, T::SilentCompanionship, false),
    ]
};

/// Catalog entry for an action.
pub fn spec(id: ActionId) -> &'static ActionSpec {
    &CATALOG[id.index()]
}

/// Render an action into a complete output command.
///
/// Pure: the same arguments always produce the same command.
pub fn template(id: ActionId, related_task: Option<&str>, personality: Personality) -> OutputCommand {
    render(id, related_task, message(id, personality))
}

/// Like [`template`], but takes the personality as its wire tag and falls
/// back to the standard assistant's text when the tag is not recognized.
pub fn template_for_key(id: ActionId, related_task: Option<&str>, personality: &str) -> OutputCommand {
    let personality = personality.parse::<Personality>().unwrap_or_else(|_| {
        debug!("Unrecognized personality {personality:?}, using standard text");
        Personality::StandardAssistant
    });
    template(id, related_task, personality)
}

/// Render an action with an explicit spoken line.
pub fn render(id: ActionId, related_task: Option<&str>, line: &str) -> OutputCommand {
    let spec = spec(id);

    let text = match (id, related_task) {
        (ActionId::GoalProgress, Some(task)) if !line.is_empty() => format!("About {task}: {line}"),
        _ => line.to_string(),
    };

    let action = Action::new(spec.action_type);
    let action = if spec.carries_task {
        action.with_related_task(related_task)
    } else {
        action
    };

    OutputCommand {
        execution_output: ExecutionOutput {
            screen_animation: Some(spec.screen),
            light_effect: Some(spec.light),
        },
        tts_output: TtsOutput {
            text_to_speak: Some(text),
        },
        action,
        ..Default::default()
    }
}
