use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use til_core::model::{
    AssessmentAnswer, AssessmentOutcome, AssessmentQuestion, AttemptId, ChatContext, ChatReply,
    DrillMode, DrillPrompt, DrillResult, Exercise, ExerciseId, ExerciseResult, Lesson,
    LessonId, LessonSummary, NextLessonInfo, ProgressSummary, SessionContext, TestId,
    TestSummary, VocabularyEntry, VocabularyId, VocabularyStatus,
};

use crate::error::ApiError;

/// Bearer credential returned by login.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
}

/// Request shape for adding a vocabulary entry: either a known dictionary
/// item by id (assistant mentions) or a manual word/translation pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AddVocabulary {
    ById { vocabulary_id: VocabularyId },
    ByPair { word_source: String, translation: String },
}

/// The remote learning service contract, one method per operation the
/// client consumes. All operations except `login`/`register` carry the
/// stored bearer credential; an expired credential surfaces as
/// `ApiError::Unauthorized` from any of them.
#[async_trait]
pub trait LearningApi: Send + Sync {
    // ── auth ────────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `ApiError` when the credentials are rejected or the request fails.
    async fn login(&self, email: &str, password: &str) -> Result<Credential, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError::Conflict` when the account already exists.
    async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<(), ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` when the credential is missing or expired.
    async fn current_user(&self) -> Result<SessionContext, ApiError>;

    // ── lessons ─────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `ApiError` on service failure.
    async fn list_lessons(&self) -> Result<Vec<LessonSummary>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown lesson.
    async fn get_lesson(&self, id: LessonId) -> Result<Lesson, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on service failure.
    async fn next_lesson(&self, id: LessonId) -> Result<NextLessonInfo, ApiError>;

    /// Idempotent completion intent; enforcement is server-side.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the service rejects the completion.
    async fn complete_lesson(&self, id: LessonId) -> Result<(), ApiError>;

    // ── exercises ───────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `ApiError` on service failure.
    async fn list_exercises(&self, lesson: Option<LessonId>) -> Result<Vec<Exercise>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown exercise.
    async fn get_exercise(&self, id: ExerciseId) -> Result<Exercise, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on service failure.
    async fn submit_exercise(
        &self,
        id: ExerciseId,
        answer: &str,
    ) -> Result<ExerciseResult, ApiError>;

    // ── tests ───────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `ApiError` on service failure.
    async fn list_tests(&self, lesson: Option<LessonId>) -> Result<Vec<TestSummary>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on service failure.
    async fn list_test_questions(
        &self,
        test: TestId,
    ) -> Result<Vec<AssessmentQuestion>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on service failure.
    async fn start_test_attempt(&self, test: TestId) -> Result<AttemptId, ApiError>;

    /// Consumes the attempt; an attempt is submitted at most once.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on service failure.
    async fn submit_test_attempt(
        &self,
        attempt: AttemptId,
        answers: &[AssessmentAnswer],
    ) -> Result<AssessmentOutcome, ApiError>;

    // ── assistant ───────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `ApiError` on service failure.
    async fn chat(&self, message: &str, context: &ChatContext) -> Result<ChatReply, ApiError>;

    // ── vocabulary ──────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `ApiError` on service failure.
    async fn list_vocabulary(
        &self,
        status: Option<VocabularyStatus>,
    ) -> Result<Vec<VocabularyEntry>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError::Conflict` when the word is already in the list.
    async fn add_vocabulary(&self, request: &AddVocabulary)
        -> Result<VocabularyEntry, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown entry.
    async fn remove_vocabulary(&self, id: VocabularyId) -> Result<(), ApiError>;

    /// Next drill question, avoiding immediate repetition of `exclude`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on service failure.
    async fn drill_next(&self, exclude: Option<VocabularyId>) -> Result<DrillPrompt, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on service failure.
    async fn drill_answer(
        &self,
        vocabulary_id: VocabularyId,
        mode: DrillMode,
        answer: &str,
    ) -> Result<DrillResult, ApiError>;

    // ── progress ────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `ApiError` on service failure.
    async fn progress_summary(&self) -> Result<ProgressSummary, ApiError>;
}
