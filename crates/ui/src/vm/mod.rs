mod assessment_vm;
mod chat_vm;
mod content;
mod drill_vm;

pub use assessment_vm::{AssessmentQuestionVm, AssessmentVm, OutcomeVm, map_assessment};
pub use chat_vm::{ChatVm, MentionVm, TurnVm, map_chat, map_chat_busy};
pub use content::{markdown_to_html, sanitize_html};
pub use drill_vm::{DrillFeedbackVm, DrillVm, map_drill};
