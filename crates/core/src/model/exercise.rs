use serde::{Deserialize, Serialize};

use crate::model::ExerciseId;

/// Input style of an exercise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    MultipleChoice,
    FillBlank,
    Translation,
}

impl ExerciseType {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ExerciseType::MultipleChoice => "выбор ответа",
            ExerciseType::FillBlank => "пропуск",
            ExerciseType::Translation => "перевод",
        }
    }
}

/// A standalone exercise: one question, one answer slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: ExerciseId,
    pub title: String,
    pub exercise_type: ExerciseType,
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
}

impl Exercise {
    #[must_use]
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }
}

/// Result of one exercise attempt. The service never returns the expected
/// answer here, only correctness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseResult {
    pub is_correct: bool,
}
