use std::collections::HashMap;
use std::sync::Arc;

use client::LearningApi;
use til_core::model::{
    AssessmentAnswer, AssessmentOutcome, AssessmentQuestion, AttemptId, QuestionId, TestId,
};

use crate::error::AssessmentError;

/// One sitting of a knowledge test.
///
/// Starting a run fetches the questions and opens an attempt on the
/// service. Answers accumulate locally and are submitted in one shot; an
/// attempt can be submitted at most once, and a failed outcome is retried
/// by starting a fresh run.
pub struct AssessmentRun {
    api: Arc<dyn LearningApi>,
    test_id: TestId,
    attempt: AttemptId,
    questions: Vec<AssessmentQuestion>,
    answers: HashMap<QuestionId, String>,
    outcome: Option<AssessmentOutcome>,
}

impl AssessmentRun {
    /// Fetch the questions and open an attempt.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::NoQuestions` for an empty test, or
    /// `AssessmentError::Api` when either request fails.
    pub async fn begin(api: Arc<dyn LearningApi>, test_id: TestId) -> Result<Self, AssessmentError> {
        let questions = api.list_test_questions(test_id).await?;
        if questions.is_empty() {
            return Err(AssessmentError::NoQuestions);
        }
        let attempt = api.start_test_attempt(test_id).await?;
        Ok(Self {
            api,
            test_id,
            attempt,
            questions,
            answers: HashMap::new(),
            outcome: None,
        })
    }

    #[must_use]
    pub fn test_id(&self) -> TestId {
        self.test_id
    }

    #[must_use]
    pub fn questions(&self) -> &[AssessmentQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn answer(&self, question: QuestionId) -> Option<&str> {
        self.answers.get(&question).map(String::as_str)
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&AssessmentOutcome> {
        self.outcome.as_ref()
    }

    /// Record (or replace) the learner's answer to one question. Answers
    /// can be changed freely until the run is submitted.
    pub fn set_answer(&mut self, question: QuestionId, answer: impl Into<String>) {
        if self.outcome.is_none() {
            self.answers.insert(question, answer.into());
        }
    }

    /// Whether every question has a non-empty answer.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.questions.iter().all(|question| {
            self.answers
                .get(&question.id)
                .is_some_and(|answer| !answer.trim().is_empty())
        })
    }

    /// Submit the accumulated answers and record the outcome.
    ///
    /// On a transport failure the attempt stays open and submission can be
    /// retried; once an outcome is recorded further submissions are
    /// rejected locally.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::AlreadySubmitted` after a recorded
    /// outcome, or `AssessmentError::Api` when the request fails.
    pub async fn submit(&mut self) -> Result<AssessmentOutcome, AssessmentError> {
        if self.outcome.is_some() {
            return Err(AssessmentError::AlreadySubmitted);
        }
        let answers: Vec<AssessmentAnswer> = self
            .questions
            .iter()
            .map(|question| AssessmentAnswer {
                question_id: question.id,
                user_answer: self
                    .answers
                    .get(&question.id)
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect();
        let outcome = self.api.submit_test_attempt(self.attempt, &answers).await?;
        self.outcome = Some(outcome.clone());
        Ok(outcome)
    }

    /// A retake is offered only after a failed outcome.
    #[must_use]
    pub fn can_retake(&self) -> bool {
        self.outcome.as_ref().is_some_and(|outcome| !outcome.passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client::FakeLearningApi;
    use client::fake::ScriptedFailure;
    use til_core::model::TestSummary;

    fn scripted_api(questions: Vec<(&str, &str)>) -> Arc<FakeLearningApi> {
        let api = FakeLearningApi::new();
        let test = TestSummary {
            id: TestId::new(1),
            title: "Тест по уроку".to_string(),
            is_final: false,
        };
        let questions = questions
            .into_iter()
            .enumerate()
            .map(|(i, (text, expected))| {
                (
                    AssessmentQuestion {
                        id: QuestionId::new(i as u64 + 1),
                        question_text: text.to_string(),
                        options: vec![],
                    },
                    expected,
                )
            })
            .collect();
        api.add_test(None, test, questions);
        Arc::new(api)
    }

    #[tokio::test]
    async fn empty_test_refuses_to_begin() {
        let api = Arc::new(FakeLearningApi::new());
        let test = TestSummary {
            id: TestId::new(9),
            title: "Пустой".to_string(),
            is_final: false,
        };
        api.add_test(None, test, vec![]);
        assert!(matches!(
            AssessmentRun::begin(api, TestId::new(9)).await,
            Err(AssessmentError::NoQuestions)
        ));
    }

    #[tokio::test]
    async fn perfect_answers_pass() {
        let api = scripted_api(vec![("Переведите: дом", "үй"), ("Переведите: книга", "кітап")]);
        let mut run = AssessmentRun::begin(api, TestId::new(1)).await.unwrap();

        assert!(!run.is_complete());
        run.set_answer(QuestionId::new(1), "үй");
        run.set_answer(QuestionId::new(2), "кітап");
        assert!(run.is_complete());

        let outcome = run.submit().await.unwrap();
        assert_eq!(outcome.score, 100);
        assert!(outcome.passed);
        assert!(!run.can_retake());
    }

    #[tokio::test]
    async fn failing_score_offers_a_retake() {
        let api = scripted_api(vec![("Переведите: дом", "үй"), ("Переведите: книга", "кітап")]);
        let mut run = AssessmentRun::begin(api, TestId::new(1)).await.unwrap();

        run.set_answer(QuestionId::new(1), "үй");
        run.set_answer(QuestionId::new(2), "неверно");
        let outcome = run.submit().await.unwrap();
        assert_eq!(outcome.score, 50);
        assert!(!outcome.passed);
        assert!(run.can_retake());
    }

    #[tokio::test]
    async fn a_run_submits_at_most_once() {
        let api = scripted_api(vec![("Переведите: дом", "үй")]);
        let mut run = AssessmentRun::begin(api, TestId::new(1)).await.unwrap();
        run.set_answer(QuestionId::new(1), "үй");
        run.submit().await.unwrap();

        assert!(matches!(
            run.submit().await,
            Err(AssessmentError::AlreadySubmitted)
        ));
        // Answers are frozen after submission.
        run.set_answer(QuestionId::new(1), "другое");
        assert_eq!(run.answer(QuestionId::new(1)), Some("үй"));
    }

    #[tokio::test]
    async fn transport_failure_leaves_the_attempt_open() {
        let api = scripted_api(vec![("Переведите: дом", "үй")]);
        let mut run = AssessmentRun::begin(api.clone(), TestId::new(1)).await.unwrap();
        run.set_answer(QuestionId::new(1), "үй");

        api.fail_next_request(ScriptedFailure::Service("down".to_string()));
        assert!(run.submit().await.is_err());
        assert!(run.outcome().is_none());

        let outcome = run.submit().await.unwrap();
        assert!(outcome.passed);
    }
}
