use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Creates a new id from its raw value.
            #[must_use]
            pub fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the underlying u64 value.
            #[must_use]
            pub fn value(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<u64>().map($name::new).map_err(|_| ParseIdError {
                    kind: stringify!($name),
                })
            }
        }
    };
}

id_type!(
    /// Unique identifier for a user account.
    UserId
);
id_type!(
    /// Unique identifier for a lesson.
    LessonId
);
id_type!(
    /// Unique identifier for an exercise.
    ExerciseId
);
id_type!(
    /// Unique identifier for a test.
    TestId
);
id_type!(
    /// Unique identifier for a test attempt.
    AttemptId
);
id_type!(
    /// Unique identifier for a test question.
    QuestionId
);
id_type!(
    /// Unique identifier for a vocabulary item.
    VocabularyId
);

/// Error type for parsing an id from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesson_id_display_and_parse_roundtrip() {
        let id = LessonId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!("42".parse::<LessonId>().unwrap(), id);
    }

    #[test]
    fn invalid_id_fails_to_parse() {
        assert!("not-a-number".parse::<VocabularyId>().is_err());
    }

    #[test]
    fn debug_names_the_type() {
        assert_eq!(format!("{:?}", TestId::new(7)), "TestId(7)");
    }
}
