use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::VocabularyId;

/// Drill proficiency for a vocabulary item, an integer 0..=5. The service
/// owns the learned threshold; the client only displays the level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mastery(u8);

impl Mastery {
    pub const MAX: u8 = 5;

    /// Creates a mastery level, clamping out-of-range service values.
    #[must_use]
    pub fn new(level: u8) -> Self {
        Self(level.min(Self::MAX))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Fill percentage for the mastery bar (0, 20, .., 100).
    #[must_use]
    pub fn percent(self) -> u8 {
        self.0 * 20
    }
}

impl fmt::Display for Mastery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// Lifecycle of a personal vocabulary entry. The status flips to `Learned`
/// on the service side once mastery reaches its threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocabularyStatus {
    InProgress,
    Learned,
}

/// One entry in the personal vocabulary list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub id: VocabularyId,
    pub word_source: String,
    pub translation: String,
    #[serde(default)]
    pub mastery: Mastery,
    pub status: VocabularyStatus,
}

/// Translation direction of a drill question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillMode {
    /// Source language prompt, target language answer.
    Forward,
    /// Target language prompt, source language answer.
    Reverse,
}

/// A question served by the drill. `options` is empty for free-text input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillQuestion {
    pub vocabulary_id: VocabularyId,
    pub prompt: String,
    pub mode: DrillMode,
    #[serde(default)]
    pub options: Vec<String>,
}

impl DrillQuestion {
    #[must_use]
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }
}

/// Response of the drill `next` operation: either a question or a verbatim
/// exhaustion message from the service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillPrompt {
    #[serde(default)]
    pub question: Option<DrillQuestion>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Result of answering one drill question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillResult {
    pub is_correct: bool,
    pub mastery: Mastery,
    pub status: VocabularyStatus,
    #[serde(default)]
    pub correct_answer: Option<String>,
}

impl DrillResult {
    #[must_use]
    pub fn is_learned(&self) -> bool {
        self.status == VocabularyStatus::Learned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mastery_clamps_and_formats() {
        assert_eq!(Mastery::new(9).value(), 5);
        assert_eq!(Mastery::new(3).percent(), 60);
        assert_eq!(Mastery::new(2).to_string(), "2/5");
    }

    #[test]
    fn drill_prompt_deserializes_exhaustion_shape() {
        let prompt: DrillPrompt =
            serde_json::from_str(r#"{"question": null, "message": "no words"}"#).unwrap();
        assert!(prompt.question.is_none());
        assert_eq!(prompt.message.as_deref(), Some("no words"));
    }

    #[test]
    fn drill_question_with_options_is_single_choice() {
        let question = DrillQuestion {
            vocabulary_id: VocabularyId::new(1),
            prompt: "сәлем".to_string(),
            mode: DrillMode::Forward,
            options: vec!["привет".to_string(), "дом".to_string()],
        };
        assert!(question.has_options());
    }
}
