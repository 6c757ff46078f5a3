use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use til_core::model::{
    AssessmentAnswer, AssessmentOutcome, AssessmentQuestion, AttemptId, ChatContext, ChatReply,
    DrillMode, DrillPrompt, DrillQuestion, DrillResult, Exercise, ExerciseId, ExerciseResult,
    Lesson, LessonId, LessonSummary, Mastery, NextLessonInfo, ProficiencyLevel, ProgressSummary,
    SessionContext, SourceTag, TestId, TestSummary, UserId, UserRole, VocabularyEntry,
    VocabularyId, VocabularyStatus,
};

use crate::api::{AddVocabulary, Credential, LearningApi};
use crate::error::ApiError;

const PASS_THRESHOLD: u8 = 70;
const LEARNED_AT: u8 = Mastery::MAX;

/// How the next request should fail, when failure is scripted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptedFailure {
    Unauthorized,
    Conflict(String),
    NotFound(String),
    Service(String),
}

impl ScriptedFailure {
    fn into_error(self) -> ApiError {
        match self {
            ScriptedFailure::Unauthorized => ApiError::Unauthorized,
            ScriptedFailure::Conflict(detail) => ApiError::Conflict { detail },
            ScriptedFailure::NotFound(detail) => ApiError::NotFound { detail },
            ScriptedFailure::Service(detail) => ApiError::Service { status: 500, detail },
        }
    }
}

#[derive(Default)]
struct FakeState {
    user: Option<SessionContext>,
    lessons: Vec<LessonSummary>,
    lesson_bodies: HashMap<LessonId, Lesson>,
    next_lessons: HashMap<LessonId, NextLessonInfo>,
    completed_lessons: Vec<LessonId>,
    exercises: Vec<Exercise>,
    exercise_answers: HashMap<ExerciseId, String>,
    tests: HashMap<Option<LessonId>, Vec<TestSummary>>,
    questions: HashMap<TestId, Vec<AssessmentQuestion>>,
    expected_answers: HashMap<TestId, HashMap<u64, String>>,
    open_attempts: HashMap<AttemptId, TestId>,
    submitted_attempts: Vec<AttemptId>,
    next_attempt_id: u64,
    chat_replies: Vec<ChatReply>,
    chat_requests: Vec<(String, ChatContext)>,
    vocabulary: Vec<VocabularyEntry>,
    drill_message: String,
    fail_next: Option<ScriptedFailure>,
}

/// In-memory stand-in for the remote learning service, used by service and
/// view tests. Behavior is deliberately simple: drill answers are checked
/// against the stored translation, mastery increments on a correct answer
/// and flips the entry to learned at the threshold, test scoring is the
/// percentage of exact matches against the expected answers.
pub struct FakeLearningApi {
    state: Mutex<FakeState>,
    drill_next_calls: AtomicU32,
    drill_answer_calls: AtomicU32,
    chat_calls: AtomicU32,
    add_vocabulary_calls: AtomicU32,
}

impl Default for FakeLearningApi {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeLearningApi {
    #[must_use]
    pub fn new() -> Self {
        let state = FakeState {
            user: Some(SessionContext {
                id: UserId::new(1),
                full_name: "Айгүл Тестова".to_string(),
                role: UserRole::Student,
                proficiency_level: ProficiencyLevel::default(),
            }),
            drill_message: "Нет слов для изучения.".to_string(),
            next_attempt_id: 1,
            ..FakeState::default()
        };
        Self {
            state: Mutex::new(state),
            drill_next_calls: AtomicU32::new(0),
            drill_answer_calls: AtomicU32::new(0),
            chat_calls: AtomicU32::new(0),
            add_vocabulary_calls: AtomicU32::new(0),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn take_failure(&self) -> Option<ApiError> {
        self.lock().fail_next.take().map(ScriptedFailure::into_error)
    }

    // ── scripting ───────────────────────────────────────────────────────

    pub fn set_user(&self, user: SessionContext) {
        self.lock().user = Some(user);
    }

    pub fn add_lesson(&self, lesson: Lesson, is_locked: bool) {
        let mut state = self.lock();
        state.lessons.push(LessonSummary {
            id: lesson.id,
            title: lesson.title.clone(),
            level: lesson.level.clone(),
            topic: lesson.topic.clone(),
            is_locked,
        });
        state.lesson_bodies.insert(lesson.id, lesson);
    }

    pub fn set_next_lesson(&self, after: LessonId, info: NextLessonInfo) {
        self.lock().next_lessons.insert(after, info);
    }

    pub fn add_exercise(&self, exercise: Exercise, expected_answer: &str) {
        let mut state = self.lock();
        state
            .exercise_answers
            .insert(exercise.id, expected_answer.to_string());
        state.exercises.push(exercise);
    }

    pub fn add_test(
        &self,
        lesson: Option<LessonId>,
        test: TestSummary,
        questions: Vec<(AssessmentQuestion, &str)>,
    ) {
        let mut state = self.lock();
        let mut expected = HashMap::new();
        let mut bare = Vec::new();
        for (question, answer) in questions {
            expected.insert(question.id.value(), answer.to_string());
            bare.push(question);
        }
        state.expected_answers.insert(test.id, expected);
        state.questions.insert(test.id, bare);
        state.tests.entry(lesson).or_default().push(test);
    }

    pub fn push_chat_reply(&self, reply: ChatReply) {
        self.lock().chat_replies.push(reply);
    }

    /// Convenience for tests that only care about the reply text.
    pub fn push_plain_reply(&self, text: &str) {
        self.push_chat_reply(ChatReply {
            text: text.to_string(),
            source: SourceTag::Rule,
            nav_buttons: vec![],
            quick_replies: vec![],
            mentioned_words: vec![],
            last_topic: None,
            last_rule: None,
        });
    }

    pub fn add_word(&self, id: u64, word: &str, translation: &str, mastery: u8) {
        self.lock().vocabulary.push(VocabularyEntry {
            id: VocabularyId::new(id),
            word_source: word.to_string(),
            translation: translation.to_string(),
            mastery: Mastery::new(mastery),
            status: if mastery >= LEARNED_AT {
                VocabularyStatus::Learned
            } else {
                VocabularyStatus::InProgress
            },
        });
    }

    pub fn set_drill_message(&self, message: &str) {
        self.lock().drill_message = message.to_string();
    }

    pub fn fail_next_request(&self, failure: ScriptedFailure) {
        self.lock().fail_next = Some(failure);
    }

    // ── inspection ──────────────────────────────────────────────────────

    #[must_use]
    pub fn drill_next_calls(&self) -> u32 {
        self.drill_next_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn drill_answer_calls(&self) -> u32 {
        self.drill_answer_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn chat_calls(&self) -> u32 {
        self.chat_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn add_vocabulary_calls(&self) -> u32 {
        self.add_vocabulary_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn chat_requests(&self) -> Vec<(String, ChatContext)> {
        self.lock().chat_requests.clone()
    }

    #[must_use]
    pub fn completed_lessons(&self) -> Vec<LessonId> {
        self.lock().completed_lessons.clone()
    }

    #[must_use]
    pub fn vocabulary_snapshot(&self) -> Vec<VocabularyEntry> {
        self.lock().vocabulary.clone()
    }
}

#[async_trait]
impl LearningApi for FakeLearningApi {
    async fn login(&self, email: &str, _password: &str) -> Result<Credential, ApiError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        Ok(Credential {
            access_token: format!("token-{email}"),
        })
    }

    async fn register(
        &self,
        _email: &str,
        _password: &str,
        _full_name: &str,
    ) -> Result<(), ApiError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        Ok(())
    }

    async fn current_user(&self) -> Result<SessionContext, ApiError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        self.lock().user.clone().ok_or(ApiError::Unauthorized)
    }

    async fn list_lessons(&self) -> Result<Vec<LessonSummary>, ApiError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        Ok(self.lock().lessons.clone())
    }

    async fn get_lesson(&self, id: LessonId) -> Result<Lesson, ApiError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        self.lock()
            .lesson_bodies
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                detail: "Урок не найден".to_string(),
            })
    }

    async fn next_lesson(&self, id: LessonId) -> Result<NextLessonInfo, ApiError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        Ok(self.lock().next_lessons.get(&id).cloned().unwrap_or_default())
    }

    async fn complete_lesson(&self, id: LessonId) -> Result<(), ApiError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        let mut state = self.lock();
        if !state.completed_lessons.contains(&id) {
            state.completed_lessons.push(id);
        }
        Ok(())
    }

    async fn list_exercises(&self, lesson: Option<LessonId>) -> Result<Vec<Exercise>, ApiError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        let state = self.lock();
        let _ = lesson;
        Ok(state.exercises.clone())
    }

    async fn get_exercise(&self, id: ExerciseId) -> Result<Exercise, ApiError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        self.lock()
            .exercises
            .iter()
            .find(|exercise| exercise.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                detail: "Упражнение не найдено".to_string(),
            })
    }

    async fn submit_exercise(
        &self,
        id: ExerciseId,
        answer: &str,
    ) -> Result<ExerciseResult, ApiError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        let state = self.lock();
        let expected = state.exercise_answers.get(&id).ok_or_else(|| ApiError::NotFound {
            detail: "Упражнение не найдено".to_string(),
        })?;
        Ok(ExerciseResult {
            is_correct: expected.trim().eq_ignore_ascii_case(answer.trim()),
        })
    }

    async fn list_tests(&self, lesson: Option<LessonId>) -> Result<Vec<TestSummary>, ApiError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        let state = self.lock();
        let mut tests = state.tests.get(&lesson).cloned().unwrap_or_default();
        if lesson.is_some() {
            // Lesson-scoped listings also include the unscoped tests.
        } else {
            for scoped in state.tests.values() {
                for test in scoped {
                    if !tests.contains(test) {
                        tests.push(test.clone());
                    }
                }
            }
        }
        Ok(tests)
    }

    async fn list_test_questions(
        &self,
        test: TestId,
    ) -> Result<Vec<AssessmentQuestion>, ApiError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        Ok(self.lock().questions.get(&test).cloned().unwrap_or_default())
    }

    async fn start_test_attempt(&self, test: TestId) -> Result<AttemptId, ApiError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        let mut state = self.lock();
        let attempt = AttemptId::new(state.next_attempt_id);
        state.next_attempt_id += 1;
        state.open_attempts.insert(attempt, test);
        Ok(attempt)
    }

    async fn submit_test_attempt(
        &self,
        attempt: AttemptId,
        answers: &[AssessmentAnswer],
    ) -> Result<AssessmentOutcome, ApiError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        let mut state = self.lock();
        if state.submitted_attempts.contains(&attempt) {
            return Err(ApiError::Conflict {
                detail: "attempt already submitted".to_string(),
            });
        }
        let test = state
            .open_attempts
            .get(&attempt)
            .copied()
            .ok_or_else(|| ApiError::NotFound {
                detail: "Попытка не найдена".to_string(),
            })?;
        let expected = state.expected_answers.get(&test).cloned().unwrap_or_default();
        let total = expected.len().max(1);
        let correct = answers
            .iter()
            .filter(|answer| {
                expected
                    .get(&answer.question_id.value())
                    .is_some_and(|e| e.trim().eq_ignore_ascii_case(answer.user_answer.trim()))
            })
            .count();
        #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]
        let score = ((correct as f64 / total as f64) * 100.0).round() as u8;
        state.submitted_attempts.push(attempt);
        Ok(AssessmentOutcome {
            score,
            passed: score >= PASS_THRESHOLD,
        })
    }

    async fn chat(&self, message: &str, context: &ChatContext) -> Result<ChatReply, ApiError> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        let mut state = self.lock();
        state
            .chat_requests
            .push((message.to_string(), context.clone()));
        if state.chat_replies.is_empty() {
            return Err(ApiError::Service {
                status: 500,
                detail: "no scripted reply".to_string(),
            });
        }
        Ok(state.chat_replies.remove(0))
    }

    async fn list_vocabulary(
        &self,
        status: Option<VocabularyStatus>,
    ) -> Result<Vec<VocabularyEntry>, ApiError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        let state = self.lock();
        Ok(state
            .vocabulary
            .iter()
            .filter(|entry| status.is_none_or(|wanted| entry.status == wanted))
            .cloned()
            .collect())
    }

    async fn add_vocabulary(
        &self,
        request: &AddVocabulary,
    ) -> Result<VocabularyEntry, ApiError> {
        self.add_vocabulary_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        let mut state = self.lock();
        match request {
            AddVocabulary::ById { vocabulary_id } => {
                if let Some(existing) =
                    state.vocabulary.iter().find(|entry| entry.id == *vocabulary_id)
                {
                    return Err(ApiError::Conflict {
                        detail: format!("word already in vocabulary: {}", existing.word_source),
                    });
                }
                let entry = VocabularyEntry {
                    id: *vocabulary_id,
                    word_source: format!("word-{vocabulary_id}"),
                    translation: String::new(),
                    mastery: Mastery::new(0),
                    status: VocabularyStatus::InProgress,
                };
                state.vocabulary.push(entry.clone());
                Ok(entry)
            }
            AddVocabulary::ByPair {
                word_source,
                translation,
            } => {
                if state
                    .vocabulary
                    .iter()
                    .any(|entry| entry.word_source == *word_source)
                {
                    return Err(ApiError::Conflict {
                        detail: format!("word already in vocabulary: {word_source}"),
                    });
                }
                let id = VocabularyId::new(state.vocabulary.len() as u64 + 1000);
                let entry = VocabularyEntry {
                    id,
                    word_source: word_source.clone(),
                    translation: translation.clone(),
                    mastery: Mastery::new(0),
                    status: VocabularyStatus::InProgress,
                };
                state.vocabulary.push(entry.clone());
                Ok(entry)
            }
        }
    }

    async fn remove_vocabulary(&self, id: VocabularyId) -> Result<(), ApiError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        let mut state = self.lock();
        let before = state.vocabulary.len();
        state.vocabulary.retain(|entry| entry.id != id);
        if state.vocabulary.len() == before {
            return Err(ApiError::NotFound {
                detail: "Слово не найдено".to_string(),
            });
        }
        Ok(())
    }

    async fn drill_next(&self, exclude: Option<VocabularyId>) -> Result<DrillPrompt, ApiError> {
        self.drill_next_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        let state = self.lock();
        let next = state
            .vocabulary
            .iter()
            .find(|entry| {
                entry.status == VocabularyStatus::InProgress
                    && exclude.is_none_or(|excluded| entry.id != excluded)
            })
            .or_else(|| {
                // Fall back to the excluded word when it is the only one left.
                state
                    .vocabulary
                    .iter()
                    .find(|entry| entry.status == VocabularyStatus::InProgress)
            });
        Ok(match next {
            Some(entry) => DrillPrompt {
                question: Some(DrillQuestion {
                    vocabulary_id: entry.id,
                    prompt: entry.word_source.clone(),
                    mode: DrillMode::Forward,
                    options: vec![],
                }),
                message: None,
            },
            None => DrillPrompt {
                question: None,
                message: Some(state.drill_message.clone()),
            },
        })
    }

    async fn drill_answer(
        &self,
        vocabulary_id: VocabularyId,
        _mode: DrillMode,
        answer: &str,
    ) -> Result<DrillResult, ApiError> {
        self.drill_answer_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        let mut state = self.lock();
        let entry = state
            .vocabulary
            .iter_mut()
            .find(|entry| entry.id == vocabulary_id)
            .ok_or_else(|| ApiError::NotFound {
                detail: "Слово не найдено".to_string(),
            })?;
        let is_correct = entry.translation.trim().eq_ignore_ascii_case(answer.trim());
        if is_correct {
            entry.mastery = Mastery::new(entry.mastery.value() + 1);
            if entry.mastery.value() >= LEARNED_AT {
                entry.status = VocabularyStatus::Learned;
            }
        }
        Ok(DrillResult {
            is_correct,
            mastery: entry.mastery,
            status: entry.status,
            correct_answer: (!is_correct).then(|| entry.translation.clone()),
        })
    }

    async fn progress_summary(&self) -> Result<ProgressSummary, ApiError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        let state = self.lock();
        #[allow(clippy::cast_possible_truncation)]
        Ok(ProgressSummary {
            completed_lessons: state.completed_lessons.len() as u32,
            total_lessons: state.lessons.len() as u32,
            vocabulary_size: state.vocabulary.len() as u32,
            vocabulary_learned: state
                .vocabulary
                .iter()
                .filter(|entry| entry.status == VocabularyStatus::Learned)
                .count() as u32,
            ..ProgressSummary::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn drill_excludes_the_last_served_word() {
        let api = FakeLearningApi::new();
        api.add_word(1, "сәлем", "привет", 0);
        api.add_word(2, "үй", "дом", 0);

        let first = api.drill_next(None).await.unwrap().question.unwrap();
        let second = api
            .drill_next(Some(first.vocabulary_id))
            .await
            .unwrap()
            .question
            .unwrap();
        assert_ne!(first.vocabulary_id, second.vocabulary_id);
    }

    #[tokio::test]
    async fn correct_answers_raise_mastery_until_learned() {
        let api = FakeLearningApi::new();
        api.add_word(1, "сәлем", "привет", 4);

        let result = api
            .drill_answer(VocabularyId::new(1), DrillMode::Forward, "привет")
            .await
            .unwrap();
        assert!(result.is_correct);
        assert_eq!(result.mastery.value(), 5);
        assert_eq!(result.status, VocabularyStatus::Learned);
    }

    #[tokio::test]
    async fn duplicate_add_is_a_conflict() {
        let api = FakeLearningApi::new();
        api.add_word(7, "кітап", "книга", 0);
        let err = api
            .add_vocabulary(&AddVocabulary::ById {
                vocabulary_id: VocabularyId::new(7),
            })
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn attempts_cannot_be_submitted_twice() {
        let api = FakeLearningApi::new();
        let test = TestSummary {
            id: TestId::new(1),
            title: "Итоговый".to_string(),
            is_final: true,
        };
        api.add_test(
            None,
            test,
            vec![(
                AssessmentQuestion {
                    id: til_core::model::QuestionId::new(1),
                    question_text: "Переведите: дом".to_string(),
                    options: vec![],
                },
                "үй",
            )],
        );

        let attempt = api.start_test_attempt(TestId::new(1)).await.unwrap();
        let answers = vec![AssessmentAnswer {
            question_id: til_core::model::QuestionId::new(1),
            user_answer: "үй".to_string(),
        }];
        let outcome = api.submit_test_attempt(attempt, &answers).await.unwrap();
        assert_eq!(outcome.score, 100);
        assert!(outcome.passed);
        assert!(api.submit_test_attempt(attempt, &answers).await.is_err());
    }
}
