use serde::{Deserialize, Serialize};

use crate::model::{LessonId, VocabularyId};

/// Whether the exchange is anchored to a lesson or free-form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatMode {
    Free,
    Lesson,
}

/// Classification of where the assistant sourced its reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    Dictionary,
    Lesson,
    Rule,
}

impl SourceTag {
    /// Badge label shown next to the assistant reply.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SourceTag::Dictionary => "словарь",
            SourceTag::Lesson => "урок",
            SourceTag::Rule => "правило",
        }
    }
}

/// A refinement asks the assistant to restate its previous answer
/// differently; the carried topic/rule stand in for the original question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefineMode {
    Simple,
    Detailed,
    Examples,
}

impl RefineMode {
    /// The label doubles as the message text of the synthesized user turn.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            RefineMode::Simple => "Проще",
            RefineMode::Detailed => "Подробнее",
            RefineMode::Examples => "Примеры",
        }
    }

    pub const ALL: [RefineMode; 3] = [RefineMode::Simple, RefineMode::Detailed, RefineMode::Examples];
}

/// Topic/rule carried from the latest assistant turn into the next
/// refinement request, instead of relying on server-side memory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarryState {
    #[serde(default)]
    pub last_topic: Option<String>,
    #[serde(default)]
    pub last_rule: Option<String>,
}

impl CarryState {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.last_topic.is_none() && self.last_rule.is_none()
    }
}

/// Per-turn request context threaded into every assistant call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatContext {
    pub mode: ChatMode,
    pub user_level: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub lesson_id: Option<LessonId>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub refine_mode: Option<RefineMode>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_rule: Option<String>,
}

impl ChatContext {
    /// Base context for a plain (non-refinement) turn.
    #[must_use]
    pub fn new(user_level: impl Into<String>, lesson_id: Option<LessonId>) -> Self {
        Self {
            mode: if lesson_id.is_some() {
                ChatMode::Lesson
            } else {
                ChatMode::Free
            },
            user_level: user_level.into(),
            lesson_id,
            refine_mode: None,
            last_topic: None,
            last_rule: None,
        }
    }

    /// Attach a refinement intent plus the carried topic/rule.
    #[must_use]
    pub fn with_refinement(mut self, mode: RefineMode, carry: &CarryState) -> Self {
        self.refine_mode = Some(mode);
        self.last_topic = carry.last_topic.clone();
        self.last_rule = carry.last_rule.clone();
        self
    }
}

/// A vocabulary item the assistant mentioned, offered for addition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionedWord {
    pub vocabulary_id: VocabularyId,
    pub word_source: String,
}

/// The assistant's reply for one exchange.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(rename = "response")]
    pub text: String,
    pub source: SourceTag,
    #[serde(default)]
    pub nav_buttons: Vec<String>,
    #[serde(default)]
    pub quick_replies: Vec<String>,
    #[serde(default)]
    pub mentioned_words: Vec<MentionedWord>,
    #[serde(default)]
    pub last_topic: Option<String>,
    #[serde(default)]
    pub last_rule: Option<String>,
}

impl ChatReply {
    /// Suggestions in display order: navigation-oriented first, then quick
    /// replies.
    #[must_use]
    pub fn suggestions(&self) -> Vec<String> {
        let mut all = self.nav_buttons.clone();
        all.extend(self.quick_replies.iter().cloned());
        all
    }

    /// Topic/rule to carry forward, when the reply references either.
    #[must_use]
    pub fn carry(&self) -> CarryState {
        CarryState {
            last_topic: self.last_topic.clone(),
            last_rule: self.last_rule.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_mode_follows_lesson_presence() {
        assert_eq!(ChatContext::new("A1", None).mode, ChatMode::Free);
        assert_eq!(
            ChatContext::new("A1", Some(LessonId::new(2))).mode,
            ChatMode::Lesson
        );
    }

    #[test]
    fn refinement_context_serializes_carry_without_nulls() {
        let carry = CarryState {
            last_topic: Some("cases".to_string()),
            last_rule: None,
        };
        let ctx = ChatContext::new("A2", None).with_refinement(RefineMode::Detailed, &carry);
        let json = serde_json::to_value(&ctx).unwrap();
        assert_eq!(json["refine_mode"], "detailed");
        assert_eq!(json["last_topic"], "cases");
        assert!(json.get("last_rule").is_none());
        assert!(json.get("lesson_id").is_none());
    }

    #[test]
    fn suggestions_order_nav_before_quick() {
        let reply = ChatReply {
            text: "…".to_string(),
            source: SourceTag::Rule,
            nav_buttons: vec!["Уроки".to_string()],
            quick_replies: vec!["Ещё пример".to_string()],
            mentioned_words: vec![],
            last_topic: None,
            last_rule: None,
        };
        assert_eq!(reply.suggestions(), vec!["Уроки", "Ещё пример"]);
    }

    #[test]
    fn refine_labels_are_the_message_texts() {
        assert_eq!(RefineMode::Detailed.label(), "Подробнее");
        assert_eq!(RefineMode::Simple.label(), "Проще");
        assert_eq!(RefineMode::Examples.label(), "Примеры");
    }
}
