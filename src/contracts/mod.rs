//! Data contracts exchanged with the perception, memory and actuation
//! collaborators.
//!
//! ```text
//! ContextSnapshot { perception_input, memory_input, system_context }
//!   ↓  DecisionPipeline::run_once
//! OutputCommand { execution_output, tts_output, action, memory_output }
//! ```

pub mod input;
pub mod output;

pub use input::{
    AgentMode, ContextSnapshot, MemoryEpisode, MemoryInput, PerceptionInput, Personality,
    SpeechEmotion, SystemContext, TextSentiment, TimeOfDay,
};
pub use output::{
    Action, ActionParameters, ActionType, ExecutionOutput, LightEffect, MemoryOutput,
    MemoryToStore, OutputCommand, ScreenAnimation, TtsOutput,
};
