//! Shared error types for the services crate.

use client::ApiError;
use thiserror::Error;

/// Errors emitted by `DrillSession`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DrillError {
    /// Local validation, raised before any request is made.
    #[error("Введите ответ")]
    EmptyAnswer,
    #[error("no question is currently presented")]
    NoQuestion,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `ConversationThread`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatError {
    /// Local validation, raised before any request is made.
    #[error("Введите сообщение")]
    EmptyMessage,
    #[error("a previous exchange is still in flight")]
    Busy,
    #[error("there is no assistant reply to refine yet")]
    NothingToRefine,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `AssessmentRun`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AssessmentError {
    #[error("Тест не содержит вопросов")]
    NoQuestions,
    #[error("the attempt was already submitted")]
    AlreadySubmitted,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `LessonFlow`.
#[derive(Debug, Error)]
pub enum LessonFlowError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl DrillError {
    /// Whether the shell should treat this as an expired credential.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, DrillError::Api(err) if err.is_unauthorized())
    }
}

impl ChatError {
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ChatError::Api(err) if err.is_unauthorized())
    }
}

impl AssessmentError {
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AssessmentError::Api(err) if err.is_unauthorized())
    }
}

impl LessonFlowError {
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, LessonFlowError::Api(err) if err.is_unauthorized())
    }
}
