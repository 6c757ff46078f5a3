use serde::{Deserialize, Serialize};

/// Aggregate learning progress for the dashboard and progress views.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub completed_lessons: u32,
    pub total_lessons: u32,
    pub exercise_attempts: u32,
    pub exercise_correct: u32,
    pub test_attempts: u32,
    pub test_passed: u32,
    pub vocabulary_size: u32,
    pub vocabulary_learned: u32,
}

impl ProgressSummary {
    /// Exercise accuracy as a rounded percentage; 0 when nothing attempted.
    #[must_use]
    pub fn exercise_accuracy_percent(&self) -> u32 {
        if self.exercise_attempts == 0 {
            return 0;
        }
        let ratio = f64::from(self.exercise_correct) / f64::from(self.exercise_attempts);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            (ratio * 100.0).round() as u32
        }
    }
}
