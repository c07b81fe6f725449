//! Output command: the result record of a single decision call.
//!
//! Every field that reaches an actuator is drawn from a closed enumeration so
//! the display, lighting and TTS collaborators never see free-form effect
//! names.

use serde::{Deserialize, Serialize};

closed_tags! {
    /// Screen animation rendered by the display collaborator.
    pub enum ScreenAnimation("screen animation") {
        Focused => "focused",
        Celebrating => "celebrating",
        EmpatheticNod => "empathetic_nod",
        Sleeping => "sleeping",
        BreathingCalm => "breathing_calm",
        DeepFocusShield => "deep_focus_shield",
        FlowWaves => "flow_waves",
        EnergySpark => "energy_spark",
        GentleStretch => "gentle_stretch",
        BreathingGuide => "breathing_guide",
        EnvironmentAdjust => "environment_adjust",
        EmpatheticPresence => "empathetic_presence",
        CelebrationSparkle => "celebration_sparkle",
        GentlePulse => "gentle_pulse",
        ProgressChart => "progress_chart",
        HabitFormation => "habit_formation",
        WisdomSharing => "wisdom_sharing",
        SpaceHarmony => "space_harmony",
        ShieldProtection => "shield_protection",
        AmbientWaves => "ambient_waves",
        GentleBreathing => "gentle_breathing",
    }
}

closed_tags! {
    /// Light effect rendered by the lighting collaborator.
    pub enum LightEffect("light effect") {
        FocusBlue => "focus_blue",
        WarmYellowGlow => "warm_yellow_glow",
        CalmGreenPulse => "calm_green_pulse",
        Off => "off",
        FocusDeepBlue => "focus_deep_blue",
        FlowGradient => "flow_gradient",
        EnergizingOrange => "energizing_orange",
        HealthGreenPulse => "health_green_pulse",
        CalmBreathing => "calm_breathing",
        ComfortWarm => "comfort_warm",
        WarmEmbrace => "warm_embrace",
        JoyRainbow => "joy_rainbow",
        SoftPresence => "soft_presence",
        ProgressBlue => "progress_blue",
        HabitPurple => "habit_purple",
        InsightGold => "insight_gold",
        OptimizationWhite => "optimization_white",
        ProtectionCyan => "protection_cyan",
        AmbientMood => "ambient_mood",
        SoftAmbient => "soft_ambient",
    }
}

closed_tags! {
    /// Concrete action handed to the actuation layer.
    pub enum ActionType("action type") {
        SetReminder => "set_reminder",
        EnterFocusMode => "enter_focus_mode",
        SuggestBreak => "suggest_break",
        /// Explicit no-op.
        Noop => "none",
        DeepWorkProtection => "deep_work_protection",
        FocusFlowGuidance => "focus_flow_guidance",
        EnergyBoostSuggestion => "energy_boost_suggestion",
        MovementReminder => "movement_reminder",
        BreathingRelaxation => "breathing_relaxation",
        EnvironmentOptimization => "environment_optimization",
        EmotionalSupport => "emotional_support",
        AchievementCelebration => "achievement_celebration",
        QuietCompanionship => "quiet_companionship",
        GoalProgressReview => "goal_progress_review",
        HabitFormationNudge => "habit_formation_nudge",
        PersonalizedInsight => "personalized_insight",
        WorkspaceOptimization => "workspace_optimization",
        DistractionProtection => "distraction_protection",
        AmbientAtmosphere => "ambient_atmosphere",
        /// Present but silent.
        SilentCompanionship => "silent_companionship",
    }
}

impl ActionType {
    /// Whether the action asks the actuators to do nothing audible.
    pub fn is_silent(self) -> bool {
        matches!(self, ActionType::Noop | ActionType::SilentCompanionship)
    }
}

/// Parameters attached to an action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionParameters {
    /// Duration in minutes.
    #[serde(default)]
    pub duration: Option<u32>,

    #[serde(default)]
    pub related_task: Option<String>,

    /// RFC 3339 deadline.
    #[serde(default)]
    pub deadline: Option<String>,
}

/// Structured action with parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub action_type: ActionType,

    #[serde(default)]
    pub parameters: ActionParameters,
}

impl Action {
    pub fn new(action_type: ActionType) -> Self {
        Self {
            action_type,
            parameters: ActionParameters::default(),
        }
    }

    pub fn with_related_task(mut self, task: Option<&str>) -> Self {
        self.parameters.related_task = task.map(str::to_string);
        self
    }
}

impl Default for Action {
    fn default() -> Self {
        Self::new(ActionType::Noop)
    }
}

/// Display and lighting instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutput {
    #[serde(default)]
    pub screen_animation: Option<ScreenAnimation>,

    #[serde(default)]
    pub light_effect: Option<LightEffect>,
}

/// Text for the TTS collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtsOutput {
    #[serde(default)]
    pub text_to_speak: Option<String>,
}

impl TtsOutput {
    /// The text, if there is any non-empty text to speak.
    pub fn spoken(&self) -> Option<&str> {
        self.text_to_speak.as_deref().filter(|t| !t.is_empty())
    }
}

/// Record handed to the memory collaborator for durable storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryToStore {
    /// Summary of the input snapshot.
    pub input: serde_json::Value,

    /// Which stage decided and why.
    pub decision_reasoning: String,

    /// Final action type, as its wire tag.
    pub final_action: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryOutput {
    #[serde(default)]
    pub memory_to_store: Option<MemoryToStore>,
}

/// Complete result of one decision call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputCommand {
    #[serde(default)]
    pub execution_output: ExecutionOutput,

    #[serde(default)]
    pub tts_output: TtsOutput,

    #[serde(default)]
    pub action: Action,

    #[serde(default)]
    pub memory_output: MemoryOutput,
}
