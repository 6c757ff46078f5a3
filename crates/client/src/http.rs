use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use til_core::model::{
    AssessmentAnswer, AssessmentOutcome, AssessmentQuestion, AttemptId, ChatContext, ChatReply,
    DrillMode, DrillPrompt, DrillResult, Exercise, ExerciseId, ExerciseResult, Lesson,
    LessonId, LessonSummary, NextLessonInfo, ProgressSummary, SessionContext, TestId,
    TestSummary, VocabularyEntry, VocabularyId, VocabularyStatus,
};

use crate::api::{AddVocabulary, Credential, LearningApi};
use crate::credentials::CredentialStore;
use crate::error::{ApiError, detail_from_body};

/// HTTP implementation of [`LearningApi`] against the learning service's
/// JSON API. Every request except login/register carries the stored bearer
/// credential.
#[derive(Clone)]
pub struct HttpLearningApi {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
}

impl HttpLearningApi {
    #[must_use]
    pub fn new(base_url: impl Into<String>, credentials: Arc<dyn CredentialStore>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            credentials,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        let builder = self.client.request(method, url);
        match self.credentials.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn request_unauthenticated(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        self.client.request(method, url)
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            return serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()));
        }
        Err(Self::error_for(status, &response.text().await.unwrap_or_default()))
    }

    async fn execute_ack(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(Self::error_for(status, &response.text().await.unwrap_or_default()))
    }

    fn error_for(status: StatusCode, body: &str) -> ApiError {
        let detail = detail_from_body(body, status.canonical_reason().unwrap_or("request failed"));
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            StatusCode::NOT_FOUND => ApiError::NotFound { detail },
            StatusCode::CONFLICT => ApiError::Conflict { detail },
            // The service reports duplicates as 400 with an "already" detail.
            StatusCode::BAD_REQUEST if detail.contains("already") => {
                ApiError::Conflict { detail }
            }
            _ => ApiError::Service {
                status: status.as_u16(),
                detail,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct StartAttemptResponse {
    attempt_id: AttemptId,
}

#[async_trait]
impl LearningApi for HttpLearningApi {
    async fn login(&self, email: &str, password: &str) -> Result<Credential, ApiError> {
        let builder = self
            .request_unauthenticated(Method::POST, "/auth/login")
            .json(&json!({ "email": email, "password": password }));
        self.execute(builder).await
    }

    async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<(), ApiError> {
        let builder = self
            .request_unauthenticated(Method::POST, "/auth/register")
            .json(&json!({ "email": email, "password": password, "full_name": full_name }));
        self.execute_ack(builder).await
    }

    async fn current_user(&self) -> Result<SessionContext, ApiError> {
        self.execute(self.request(Method::GET, "/users/me")).await
    }

    async fn list_lessons(&self) -> Result<Vec<LessonSummary>, ApiError> {
        self.execute(self.request(Method::GET, "/lessons/")).await
    }

    async fn get_lesson(&self, id: LessonId) -> Result<Lesson, ApiError> {
        self.execute(self.request(Method::GET, &format!("/lessons/{id}")))
            .await
    }

    async fn next_lesson(&self, id: LessonId) -> Result<NextLessonInfo, ApiError> {
        self.execute(self.request(Method::GET, &format!("/lessons/{id}/next")))
            .await
    }

    async fn complete_lesson(&self, id: LessonId) -> Result<(), ApiError> {
        self.execute_ack(self.request(Method::POST, &format!("/lessons/{id}/complete")))
            .await
    }

    async fn list_exercises(&self, lesson: Option<LessonId>) -> Result<Vec<Exercise>, ApiError> {
        let mut builder = self.request(Method::GET, "/exercises/");
        if let Some(lesson) = lesson {
            builder = builder.query(&[("lesson_id", lesson.value())]);
        }
        self.execute(builder).await
    }

    async fn get_exercise(&self, id: ExerciseId) -> Result<Exercise, ApiError> {
        self.execute(self.request(Method::GET, &format!("/exercises/{id}")))
            .await
    }

    async fn submit_exercise(
        &self,
        id: ExerciseId,
        answer: &str,
    ) -> Result<ExerciseResult, ApiError> {
        let builder = self
            .request(Method::POST, &format!("/exercises/{id}/attempt"))
            .json(&json!({ "answer": answer }));
        self.execute(builder).await
    }

    async fn list_tests(&self, lesson: Option<LessonId>) -> Result<Vec<TestSummary>, ApiError> {
        let mut builder = self.request(Method::GET, "/tests/");
        if let Some(lesson) = lesson {
            builder = builder.query(&[("lesson_id", lesson.value())]);
        }
        self.execute(builder).await
    }

    async fn list_test_questions(
        &self,
        test: TestId,
    ) -> Result<Vec<AssessmentQuestion>, ApiError> {
        self.execute(self.request(Method::GET, &format!("/tests/{test}/questions")))
            .await
    }

    async fn start_test_attempt(&self, test: TestId) -> Result<AttemptId, ApiError> {
        let response: StartAttemptResponse = self
            .execute(self.request(Method::POST, &format!("/tests/{test}/attempt")))
            .await?;
        Ok(response.attempt_id)
    }

    async fn submit_test_attempt(
        &self,
        attempt: AttemptId,
        answers: &[AssessmentAnswer],
    ) -> Result<AssessmentOutcome, ApiError> {
        let builder = self
            .request(Method::POST, &format!("/tests/attempts/{attempt}/submit"))
            .json(&json!({ "answers": answers }));
        self.execute(builder).await
    }

    async fn chat(&self, message: &str, context: &ChatContext) -> Result<ChatReply, ApiError> {
        let builder = self
            .request(Method::POST, "/assistant/chat")
            .json(&json!({ "message": message, "context": context }));
        self.execute(builder).await
    }

    async fn list_vocabulary(
        &self,
        status: Option<VocabularyStatus>,
    ) -> Result<Vec<VocabularyEntry>, ApiError> {
        let mut builder = self.request(Method::GET, "/vocabulary/");
        if let Some(status) = status {
            builder = builder.query(&[("status_filter", status)]);
        }
        self.execute(builder).await
    }

    async fn add_vocabulary(
        &self,
        request: &AddVocabulary,
    ) -> Result<VocabularyEntry, ApiError> {
        let builder = self.request(Method::POST, "/vocabulary/").json(request);
        self.execute(builder).await
    }

    async fn remove_vocabulary(&self, id: VocabularyId) -> Result<(), ApiError> {
        self.execute_ack(self.request(Method::DELETE, &format!("/vocabulary/{id}")))
            .await
    }

    async fn drill_next(&self, exclude: Option<VocabularyId>) -> Result<DrillPrompt, ApiError> {
        let mut builder = self.request(Method::GET, "/vocabulary/drill/next");
        if let Some(exclude) = exclude {
            builder = builder.query(&[("last_vocabulary_id", exclude.value())]);
        }
        self.execute(builder).await
    }

    async fn drill_answer(
        &self,
        vocabulary_id: VocabularyId,
        mode: DrillMode,
        answer: &str,
    ) -> Result<DrillResult, ApiError> {
        let builder = self.request(Method::POST, "/vocabulary/drill/answer").json(&json!({
            "vocabulary_id": vocabulary_id,
            "mode": mode,
            "user_answer": answer,
        }));
        self.execute(builder).await
    }

    async fn progress_summary(&self) -> Result<ProgressSummary, ApiError> {
        self.execute(self.request(Method::GET, "/progress/summary"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_covers_the_taxonomy() {
        assert!(matches!(
            HttpLearningApi::error_for(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            HttpLearningApi::error_for(StatusCode::CONFLICT, r#"{"detail": "duplicate"}"#),
            ApiError::Conflict { .. }
        ));
        assert!(matches!(
            HttpLearningApi::error_for(StatusCode::NOT_FOUND, ""),
            ApiError::NotFound { .. }
        ));
        assert!(matches!(
            HttpLearningApi::error_for(StatusCode::INTERNAL_SERVER_ERROR, ""),
            ApiError::Service { status: 500, .. }
        ));
    }

    #[test]
    fn duplicate_word_as_bad_request_maps_to_conflict() {
        let err = HttpLearningApi::error_for(
            StatusCode::BAD_REQUEST,
            r#"{"detail": "word already in vocabulary"}"#,
        );
        assert!(err.is_conflict());
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let api = HttpLearningApi::new(
            "http://localhost:8000/api/",
            std::sync::Arc::new(crate::credentials::InMemoryCredentialStore::default()),
        );
        assert_eq!(api.base_url, "http://localhost:8000/api");
    }
}
