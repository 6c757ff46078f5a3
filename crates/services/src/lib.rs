#![forbid(unsafe_code)]

pub mod assessment;
pub mod conversation;
pub mod drill;
pub mod error;
pub mod lesson_flow;

pub use til_core::Clock;

pub use assessment::AssessmentRun;
pub use conversation::{
    ConversationThread, ConversationTurn, Mention, MentionState, Speaker,
};
pub use drill::{DrillPhase, DrillSession};
pub use error::{AssessmentError, ChatError, DrillError, LessonFlowError};
pub use lesson_flow::LessonFlow;
