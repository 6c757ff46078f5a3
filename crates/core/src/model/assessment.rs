use serde::{Deserialize, Serialize};

use crate::model::{QuestionId, TestId};

/// A test as listed by the service. `is_final` marks the mandatory test
/// that gates lesson completion (server-enforced, client-displayed).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSummary {
    pub id: TestId,
    pub title: String,
    #[serde(default)]
    pub is_final: bool,
}

/// One question of an attempt. Empty `options` means free-text input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentQuestion {
    pub id: QuestionId,
    pub question_text: String,
    #[serde(default)]
    pub options: Vec<String>,
}

impl AssessmentQuestion {
    #[must_use]
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }
}

/// One answer of the single batch submit, paired to its question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentAnswer {
    pub question_id: QuestionId,
    pub user_answer: String,
}

/// Outcome returned by the service. `passed` reflects the service-side
/// threshold; the client never recomputes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentOutcome {
    pub score: u8,
    pub passed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_is_taken_verbatim_from_the_service() {
        let outcome: AssessmentOutcome =
            serde_json::from_str(r#"{"score": 65, "passed": false}"#).unwrap();
        assert_eq!(outcome.score, 65);
        assert!(!outcome.passed);
    }

    #[test]
    fn free_text_question_has_no_options() {
        let q: AssessmentQuestion = serde_json::from_str(
            r#"{"id": 1, "question_text": "Переведите: дом"}"#,
        )
        .unwrap();
        assert!(!q.has_options());
    }
}
