mod assessment;
mod conversation;
mod exercise;
mod ids;
mod lesson;
mod progress;
mod user;
mod vocabulary;

pub use ids::{AttemptId, ExerciseId, LessonId, QuestionId, TestId, UserId, VocabularyId};

pub use assessment::{AssessmentAnswer, AssessmentOutcome, AssessmentQuestion, TestSummary};
pub use conversation::{CarryState, ChatContext, ChatMode, ChatReply, MentionedWord, RefineMode, SourceTag};
pub use exercise::{Exercise, ExerciseResult, ExerciseType};
pub use lesson::{Lesson, LessonSummary, NextLessonInfo};
pub use progress::ProgressSummary;
pub use user::{ProficiencyLevel, SessionContext, UserRole};
pub use vocabulary::{
    DrillMode, DrillPrompt, DrillQuestion, DrillResult, Mastery, VocabularyEntry, VocabularyStatus,
};
