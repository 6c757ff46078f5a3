use serde::{Deserialize, Serialize};

use crate::model::LessonId;

/// A lesson as listed on the lessons page. `is_locked` is advisory: the
/// service decides access, the client only renders the lock.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonSummary {
    pub id: LessonId,
    pub title: String,
    pub level: String,
    pub topic: String,
    #[serde(default)]
    pub is_locked: bool,
}

/// Full lesson detail, including the markdown-ish content body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    pub level: String,
    pub topic: String,
    pub content: String,
}

/// Access state for the lesson that follows the current one, as reported
/// by the service. Purely advisory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextLessonInfo {
    #[serde(default)]
    pub next_lesson_id: Option<LessonId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub is_accessible: bool,
    #[serde(default)]
    pub locked_reason: Option<String>,
}

impl NextLessonInfo {
    /// Whether there is a following lesson at all. When false, the current
    /// lesson closes out its level.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.next_lesson_id.is_some()
    }
}
