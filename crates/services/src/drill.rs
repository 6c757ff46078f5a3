use std::sync::Arc;

use client::LearningApi;
use til_core::model::{DrillQuestion, DrillResult, VocabularyId};

use crate::error::DrillError;

/// Where the drill currently stands. `Loading` and `Submitting` cover the
/// in-flight window of the corresponding request; on failure the session
/// reverts to the phase it was in before the request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrillPhase {
    /// Not started, or ended.
    Idle,
    /// Waiting for the next question.
    Loading,
    /// A question is on screen, awaiting the learner's answer.
    Presenting,
    /// The answer is on its way to the service.
    Submitting,
    /// The result of the last answer is on screen.
    Feedback,
    /// The service had no more words to serve.
    Exhausted,
}

/// One sitting of the vocabulary drill.
///
/// The session tracks the last word it served and asks the service to avoid
/// repeating it back-to-back. That exclusion is cleared as soon as a word
/// graduates to learned, so the remaining word can still be served when it
/// is the only one left.
pub struct DrillSession {
    api: Arc<dyn LearningApi>,
    phase: DrillPhase,
    question: Option<DrillQuestion>,
    feedback: Option<DrillResult>,
    exhausted_message: Option<String>,
    last_served: Option<VocabularyId>,
    answered: u32,
    correct: u32,
}

impl DrillSession {
    #[must_use]
    pub fn new(api: Arc<dyn LearningApi>) -> Self {
        Self {
            api,
            phase: DrillPhase::Idle,
            question: None,
            feedback: None,
            exhausted_message: None,
            last_served: None,
            answered: 0,
            correct: 0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> DrillPhase {
        self.phase
    }

    #[must_use]
    pub fn question(&self) -> Option<&DrillQuestion> {
        self.question.as_ref()
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&DrillResult> {
        self.feedback.as_ref()
    }

    /// Verbatim service message shown when no words are left to drill.
    #[must_use]
    pub fn exhausted_message(&self) -> Option<&str> {
        self.exhausted_message.as_deref()
    }

    #[must_use]
    pub fn answered(&self) -> u32 {
        self.answered
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    /// Request the next question, excluding the last served word.
    ///
    /// On failure the session reverts to its previous phase, keeping the
    /// current question and exclusion intact so the sitting can continue.
    ///
    /// # Errors
    ///
    /// Returns `DrillError::Api` when the request fails.
    pub async fn request_next(&mut self) -> Result<(), DrillError> {
        let prior = self.phase;
        self.phase = DrillPhase::Loading;
        match self.api.drill_next(self.last_served).await {
            Ok(prompt) => {
                self.feedback = None;
                match prompt.question {
                    Some(question) => {
                        self.last_served = Some(question.vocabulary_id);
                        self.question = Some(question);
                        self.phase = DrillPhase::Presenting;
                    }
                    None => {
                        self.question = None;
                        self.exhausted_message = prompt
                            .message
                            .or_else(|| Some("Нет слов для изучения.".to_string()));
                        self.phase = DrillPhase::Exhausted;
                    }
                }
                Ok(())
            }
            Err(err) => {
                self.phase = prior;
                Err(err.into())
            }
        }
    }

    /// Submit an answer to the presented question.
    ///
    /// An empty (or whitespace-only) answer is rejected locally without
    /// contacting the service, and the question stays on screen.
    ///
    /// # Errors
    ///
    /// Returns `DrillError::EmptyAnswer` for a blank answer,
    /// `DrillError::NoQuestion` when nothing is presented, and
    /// `DrillError::Api` when the request fails (the question is kept).
    pub async fn submit(&mut self, answer: &str) -> Result<DrillResult, DrillError> {
        if self.phase != DrillPhase::Presenting {
            return Err(DrillError::NoQuestion);
        }
        let Some(question) = self.question.clone() else {
            return Err(DrillError::NoQuestion);
        };
        if answer.trim().is_empty() {
            return Err(DrillError::EmptyAnswer);
        }

        self.phase = DrillPhase::Submitting;
        match self
            .api
            .drill_answer(question.vocabulary_id, question.mode, answer)
            .await
        {
            Ok(result) => {
                self.answered += 1;
                if result.is_correct {
                    self.correct += 1;
                }
                if result.is_learned() {
                    // A learned word leaves the rotation, so there is nothing
                    // to avoid repeating any more.
                    self.last_served = None;
                }
                self.feedback = Some(result.clone());
                self.phase = DrillPhase::Feedback;
                Ok(result)
            }
            Err(err) => {
                self.phase = DrillPhase::Presenting;
                Err(err.into())
            }
        }
    }

    /// End the sitting, dropping all per-sitting state.
    pub fn end(&mut self) {
        self.phase = DrillPhase::Idle;
        self.question = None;
        self.feedback = None;
        self.exhausted_message = None;
        self.last_served = None;
        self.answered = 0;
        self.correct = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client::FakeLearningApi;
    use client::fake::ScriptedFailure;

    fn session_with(api: FakeLearningApi) -> (Arc<FakeLearningApi>, DrillSession) {
        let api = Arc::new(api);
        let session = DrillSession::new(api.clone());
        (api, session)
    }

    #[tokio::test]
    async fn empty_answer_is_rejected_without_a_request() {
        let api = FakeLearningApi::new();
        api.add_word(1, "сәлем", "привет", 0);
        let (api, mut session) = session_with(api);

        session.request_next().await.unwrap();
        assert_eq!(session.phase(), DrillPhase::Presenting);

        let err = session.submit("   ").await.unwrap_err();
        assert!(matches!(err, DrillError::EmptyAnswer));
        assert_eq!(err.to_string(), "Введите ответ");
        assert_eq!(session.phase(), DrillPhase::Presenting);
        assert!(session.question().is_some());
        assert_eq!(api.drill_answer_calls(), 0);
    }

    #[tokio::test]
    async fn last_served_word_is_excluded_until_learned() {
        let api = FakeLearningApi::new();
        api.add_word(1, "сәлем", "привет", 4);
        api.add_word(2, "үй", "дом", 0);
        let (_, mut session) = session_with(api);

        session.request_next().await.unwrap();
        let first = session.question().unwrap().vocabulary_id;
        assert_eq!(first, VocabularyId::new(1));

        // Correct answer at mastery 4 graduates the word, which clears the
        // exclusion for the next request.
        let result = session.submit("привет").await.unwrap();
        assert!(result.is_learned());

        session.request_next().await.unwrap();
        assert_eq!(
            session.question().unwrap().vocabulary_id,
            VocabularyId::new(2)
        );
    }

    #[tokio::test]
    async fn exhaustion_keeps_the_service_message_verbatim() {
        let api = FakeLearningApi::new();
        api.set_drill_message("Все слова выучены! Добавьте новые.");
        let (_, mut session) = session_with(api);

        session.request_next().await.unwrap();
        assert_eq!(session.phase(), DrillPhase::Exhausted);
        assert_eq!(
            session.exhausted_message(),
            Some("Все слова выучены! Добавьте новые.")
        );
    }

    #[tokio::test]
    async fn failed_next_request_reverts_to_the_prior_phase() {
        let api = FakeLearningApi::new();
        api.add_word(1, "сәлем", "привет", 0);
        let (api, mut session) = session_with(api);

        session.request_next().await.unwrap();
        session.submit("неверно").await.unwrap();
        assert_eq!(session.phase(), DrillPhase::Feedback);

        api.fail_next_request(ScriptedFailure::Service("down".to_string()));
        assert!(session.request_next().await.is_err());
        assert_eq!(session.phase(), DrillPhase::Feedback);
        assert!(session.question().is_some());
    }

    #[tokio::test]
    async fn failed_submit_keeps_the_question_on_screen() {
        let api = FakeLearningApi::new();
        api.add_word(1, "сәлем", "привет", 0);
        let (api, mut session) = session_with(api);

        session.request_next().await.unwrap();
        api.fail_next_request(ScriptedFailure::Unauthorized);
        let err = session.submit("привет").await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(session.phase(), DrillPhase::Presenting);
        assert!(session.question().is_some());
    }

    #[tokio::test]
    async fn wrong_answer_reports_the_correct_one() {
        let api = FakeLearningApi::new();
        api.add_word(1, "сәлем", "привет", 2);
        let (_, mut session) = session_with(api);

        session.request_next().await.unwrap();
        let result = session.submit("дом").await.unwrap();
        assert!(!result.is_correct);
        assert_eq!(result.correct_answer.as_deref(), Some("привет"));
        assert_eq!(result.mastery.value(), 2);
    }

    #[tokio::test]
    async fn end_resets_the_sitting() {
        let api = FakeLearningApi::new();
        api.add_word(1, "сәлем", "привет", 0);
        let (_, mut session) = session_with(api);

        session.request_next().await.unwrap();
        session.submit("привет").await.unwrap();
        session.end();

        assert_eq!(session.phase(), DrillPhase::Idle);
        assert!(session.question().is_none());
        assert!(session.feedback().is_none());
        assert_eq!(session.answered(), 0);
    }
}
