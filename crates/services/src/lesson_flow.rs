use std::sync::Arc;

use client::LearningApi;
use til_core::model::{Lesson, LessonId, NextLessonInfo, TestSummary};

use crate::error::LessonFlowError;

/// Everything the lesson page needs for one lesson: the content, where to
/// go next, and whether a final test stands between the learner and
/// completion.
#[derive(Clone)]
pub struct LessonFlow {
    api: Arc<dyn LearningApi>,
    lesson: Lesson,
    next: NextLessonInfo,
    final_test: Option<TestSummary>,
    completed: bool,
}

impl LessonFlow {
    /// Load the lesson, its successor info, and its tests.
    ///
    /// # Errors
    ///
    /// Returns `LessonFlowError::Api` when any of the requests fail,
    /// including `NotFound` for an unknown lesson.
    pub async fn load(api: Arc<dyn LearningApi>, id: LessonId) -> Result<Self, LessonFlowError> {
        let lesson = api.get_lesson(id).await?;
        let next = api.next_lesson(id).await?;
        let tests = api.list_tests(Some(id)).await?;
        let final_test = tests.into_iter().find(|test| test.is_final);
        Ok(Self {
            api,
            lesson,
            next,
            final_test,
            completed: false,
        })
    }

    #[must_use]
    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    #[must_use]
    pub fn next(&self) -> &NextLessonInfo {
        &self.next
    }

    /// The final test notice is shown only when the lesson actually has
    /// one.
    #[must_use]
    pub fn final_test(&self) -> Option<&TestSummary> {
        self.final_test.as_ref()
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Mark the lesson completed. Repeated calls are local no-ops; the
    /// service enforces whatever completion rules apply.
    ///
    /// # Errors
    ///
    /// Returns `LessonFlowError::Api` when the service rejects the
    /// completion.
    pub async fn complete(&mut self) -> Result<(), LessonFlowError> {
        if self.completed {
            return Ok(());
        }
        self.api.complete_lesson(self.lesson.id).await?;
        self.completed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client::FakeLearningApi;
    use til_core::model::TestId;

    fn api_with_lesson() -> Arc<FakeLearningApi> {
        let api = FakeLearningApi::new();
        api.add_lesson(
            Lesson {
                id: LessonId::new(1),
                title: "Сәлемдесу".to_string(),
                level: "A1".to_string(),
                topic: "greetings".to_string(),
                content: "# Сәлемдесу\n\nСәлем!".to_string(),
            },
            false,
        );
        Arc::new(api)
    }

    #[tokio::test]
    async fn flow_detects_the_final_test() {
        let api = api_with_lesson();
        api.add_test(
            Some(LessonId::new(1)),
            TestSummary {
                id: TestId::new(5),
                title: "Итоговый тест".to_string(),
                is_final: true,
            },
            vec![],
        );
        let flow = LessonFlow::load(api, LessonId::new(1)).await.unwrap();
        assert_eq!(flow.final_test().map(|t| t.id), Some(TestId::new(5)));
    }

    #[tokio::test]
    async fn no_final_test_means_no_notice() {
        let api = api_with_lesson();
        api.add_test(
            Some(LessonId::new(1)),
            TestSummary {
                id: TestId::new(6),
                title: "Промежуточный".to_string(),
                is_final: false,
            },
            vec![],
        );
        let flow = LessonFlow::load(api, LessonId::new(1)).await.unwrap();
        assert!(flow.final_test().is_none());
    }

    #[tokio::test]
    async fn completion_is_idempotent() {
        let api = api_with_lesson();
        let mut flow = LessonFlow::load(api.clone(), LessonId::new(1)).await.unwrap();

        flow.complete().await.unwrap();
        flow.complete().await.unwrap();
        assert!(flow.is_completed());
        assert_eq!(api.completed_lessons(), vec![LessonId::new(1)]);
    }

    #[tokio::test]
    async fn unknown_lesson_is_not_found() {
        let api = Arc::new(FakeLearningApi::new());
        let result = LessonFlow::load(api, LessonId::new(99)).await;
        assert!(matches!(
            result,
            Err(LessonFlowError::Api(inner)) if !inner.is_unauthorized()
        ));
    }
}
