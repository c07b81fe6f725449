//! Post-processing steps applied to a templated output command.
//!
//! Text steps only touch non-empty speech; effect and action steps apply
//! regardless of text.

use log::warn;
use once_cell::sync::Lazy;
use regex::{Captures, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::contracts::{ActionType, OutputCommand, ScreenAnimation};

/// One filter step.  A persona's filter is an ordered list of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum FilterStep {
    /// Blank the text when the action is silent.
    SilenceWhenIdle,

    /// Replace words with plainer synonyms.
    ReplaceWords { pairs: Vec<(String, String)> },

    /// Append `suffix` unless one of `markers` already occurs.
    AppendUnlessPresent { suffix: String, markers: Vec<String> },

    /// Prepend `prefix` unless one of `markers` occurs (case-insensitive).
    PrefixUnlessPresent { prefix: String, markers: Vec<String> },

    /// Remove phrases (case-insensitive), then collapse whitespace.
    StripPhrases { phrases: Vec<String> },

    /// Append `terminal` unless the text already ends with one of `accepted`.
    EnsureTerminal { terminal: String, accepted: Vec<String> },

    /// Surround the text.
    Wrap { prefix: String, suffix: String },

    /// Surround the text when it mentions one of `keywords` (case-insensitive).
    WrapWhenMentions {
        keywords: Vec<String>,
        prefix: String,
        suffix: String,
    },

    /// Swap one screen animation for another.
    SwapScreen {
        from: ScreenAnimation,
        to: ScreenAnimation,
    },

    /// Replace an action type and pin its duration.
    CoerceAction {
        from: ActionType,
        to: ActionType,
        duration: u32,
    },
}

impl FilterStep {
    pub fn apply(&self, out: &mut OutputCommand) {
        match self {
            FilterStep::SilenceWhenIdle => {
                if out.action.action_type.is_silent() {
                    out.tts_output.text_to_speak = Some(String::new());
                }
            }
            FilterStep::SwapScreen { from, to } => {
                if out.execution_output.screen_animation == Some(*from) {
                    out.execution_output.screen_animation = Some(*to);
                }
            }
            FilterStep::CoerceAction { from, to, duration } => {
                if out.action.action_type == *from {
                    out.action.action_type = *to;
                    out.action.parameters.duration = Some(*duration);
                }
            }
            text_step => {
                if let Some(text) = out.tts_output.text_to_speak.as_mut() {
                    if !text.is_empty() {
                        let rewritten = text_step.rewrite(text);
                        *text = rewritten;
                    }
                }
            }
        }
    }

    fn rewrite(&self, text: &str) -> String {
        match self {
            FilterStep::ReplaceWords { pairs } => replace_words(text, pairs),

            FilterStep::AppendUnlessPresent { suffix, markers } => {
                if markers.iter().any(|m| text.contains(m.as_str())) {
                    text.to_string()
                } else {
                    format!("{text}{suffix}")
                }
            }

            FilterStep::PrefixUnlessPresent { prefix, markers } => {
                if contains_any(text, markers) {
                    text.to_string()
                } else {
                    format!("{prefix}{text}")
                }
            }

            FilterStep::StripPhrases { phrases } => strip_phrases(text, phrases),

            FilterStep::EnsureTerminal { terminal, accepted } => {
                if accepted.iter().any(|t| text.ends_with(t.as_str())) {
                    text.to_string()
                } else {
                    format!("{text}{terminal}")
                }
            }

            FilterStep::Wrap { prefix, suffix } => format!("{prefix}{text}{suffix}"),

            FilterStep::WrapWhenMentions {
                keywords,
                prefix,
                suffix,
            } => {
                if contains_any(text, keywords) {
                    format!("{prefix}{text}{suffix}")
                } else {
                    text.to_string()
                }
            }

            FilterStep::SilenceWhenIdle
            | FilterStep::SwapScreen { .. }
            | FilterStep::CoerceAction { .. } => text.to_string(),
        }
    }
}

static LEADING_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\s,;:]+").unwrap());
static SPACE_BEFORE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+([,.!?;:])").unwrap());

fn contains_any(text: &str, needles: &[String]) -> bool {
    let lower = text.to_lowercase();
    needles.iter().any(|n| lower.contains(&n.to_lowercase()))
}

/// Whole-word, case-insensitive replacement.  A capitalised match gets a
/// capitalised replacement.
fn replace_words(text: &str, pairs: &[(String, String)]) -> String {
    pairs.iter().fold(text.to_string(), |acc, (from, to)| {
        let pattern = format!(r"\b{}\b", regex::escape(from));
        match RegexBuilder::new(&pattern).case_insensitive(true).build() {
            Ok(re) => re
                .replace_all(&acc, |caps: &Captures| {
                    let starts_upper = caps[0].chars().next().map_or(false, char::is_uppercase);
                    if starts_upper {
                        capitalize(to)
                    } else {
                        to.clone()
                    }
                })
                .into_owned(),
            Err(e) => {
                warn!("Could not build word filter for {:?}: {}", from, e);
                acc
            }
        }
    })
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn strip_phrases(text: &str, phrases: &[String]) -> String {
    if phrases.is_empty() {
        return text.to_string();
    }

    let pattern = format!(
        r"\b(?:{})\b",
        phrases
            .iter()
            .map(|p| regex::escape(p))
            .collect::<Vec<_>>()
            .join("|")
    );

    let stripped = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => re.replace_all(text, "").into_owned(),
        Err(e) => {
            warn!("Could not build phrase filter: {}", e);
            text.to_string()
        }
    };

    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    let collapsed = SPACE_BEFORE_PUNCT.replace_all(&collapsed, "$1");
    LEADING_PUNCT.replace(&collapsed, "").into_owned()
}

/// Run every step in order.
pub fn apply_all(steps: &[FilterStep], mut out: OutputCommand) -> OutputCommand {
    for step in steps {
        step.apply(&mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::{Action, TtsOutput};

    fn with_text(text: &str) -> OutputCommand {
        OutputCommand {
            tts_output: TtsOutput {
                text_to_speak: Some(text.to_string()),
            },
            action: Action::new(ActionType::SetReminder),
            ..Default::default()
        }
    }

    fn strs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_strip_phrases_collapses_space() {
        let step = FilterStep::StripPhrases {
            phrases: strs(&["please", "if possible"]),
        };
        let out = apply_all(&[step], with_text("Please  finish the report, if possible"));
        assert_eq!(out.tts_output.spoken(), Some("finish the report,"));

        let step = FilterStep::StripPhrases {
            phrases: strs(&["please", "kindly"]),
        };
        let out = apply_all(&[step], with_text("Please, stand up and stretch kindly ."));
        assert_eq!(out.tts_output.spoken(), Some("stand up and stretch."));
    }

    #[test]
    fn test_replace_words_matches_whole_words_only() {
        let step = FilterStep::ReplaceWords {
            pairs: vec![
                ("amazing".into(), "good".into()),
                ("super".into(), "very".into()),
                ("perfect".into(), "fine".into()),
            ],
        };
        let out = apply_all(
            &[step],
            with_text("Perfect. Your supervisor said it was superb and amazing, super amazing."),
        );
        assert_eq!(
            out.tts_output.spoken(),
            Some("Fine. Your supervisor said it was superb and good, very good.")
        );
    }

    #[test]
    fn test_strip_phrases_keeps_longer_words() {
        let step = FilterStep::StripPhrases {
            phrases: strs(&["please"]),
        };
        let out = apply_all(&[step], with_text("I am pleased, please keep this pleasant pace."));
        assert_eq!(
            out.tts_output.spoken(),
            Some("I am pleased, keep this pleasant pace.")
        );
    }

    #[test]
    fn test_text_steps_skip_empty_text() {
        let steps = [
            FilterStep::Wrap {
                prefix: "*sigh* ".into(),
                suffix: " ...".into(),
            },
            FilterStep::EnsureTerminal {
                terminal: ".".into(),
                accepted: strs(&["."]),
            },
        ];
        let out = apply_all(&steps, with_text(""));
        assert_eq!(out.tts_output.text_to_speak.as_deref(), Some(""));
    }

    #[test]
    fn test_silence_when_idle() {
        let mut out = with_text("anything");
        out.action = Action::new(ActionType::SilentCompanionship);
        let out = apply_all(&[FilterStep::SilenceWhenIdle], out);
        assert!(out.tts_output.spoken().is_none());

        let kept = apply_all(&[FilterStep::SilenceWhenIdle], with_text("anything"));
        assert_eq!(kept.tts_output.spoken(), Some("anything"));
    }

    #[test]
    fn test_coerce_action_sets_duration() {
        let mut out = with_text("take a break");
        out.action = Action::new(ActionType::SuggestBreak);
        let step = FilterStep::CoerceAction {
            from: ActionType::SuggestBreak,
            to: ActionType::EnterFocusMode,
            duration: 45,
        };
        let out = apply_all(&[step.clone()], out);
        assert_eq!(out.action.action_type, ActionType::EnterFocusMode);
        assert_eq!(out.action.parameters.duration, Some(45));

        let untouched = apply_all(&[step], with_text("x"));
        assert_eq!(untouched.action.action_type, ActionType::SetReminder);
        assert!(untouched.action.parameters.duration.is_none());
    }

    #[test]
    fn test_prefix_respects_markers() {
        let step = FilterStep::PrefixUnlessPresent {
            prefix: "I understand. ".into(),
            markers: strs(&["understand", "with you"]),
        };
        let out = apply_all(&[step.clone()], with_text("Let's rest."));
        assert_eq!(out.tts_output.spoken(), Some("I understand. Let's rest."));

        let out = apply_all(&[step], with_text("I'm here With You."));
        assert_eq!(out.tts_output.spoken(), Some("I'm here With You."));
    }

    #[test]
    fn test_step_yaml_shape() {
        let yaml = r#"
- step: swap_screen
  from: focused
  to: breathing_calm
- step: append_unless_present
  suffix: " ~"
  markers: ["~"]
"#;
        let steps: Vec<FilterStep> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(steps.len(), 2);
        assert!(matches!(
            steps[0],
            FilterStep::SwapScreen {
                to: ScreenAnimation::BreathingCalm,
                ..
            }
        ));
    }
}
