use services::{DrillPhase, DrillSession};
use til_core::model::{DrillMode, VocabularyId};

/// Render model for the drill panel, snapshotted from the session after
/// every transition.
#[derive(Clone, Debug, PartialEq)]
pub struct DrillVm {
    pub phase: DrillPhase,
    pub vocabulary_id: Option<VocabularyId>,
    pub prompt_label: Option<String>,
    pub options: Vec<String>,
    pub feedback: Option<DrillFeedbackVm>,
    pub exhausted_message: Option<String>,
    pub answered: u32,
    pub correct: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrillFeedbackVm {
    pub is_correct: bool,
    pub verdict_label: String,
    pub mastery_label: String,
    pub mastery_percent: u8,
    pub learned: bool,
}

#[must_use]
pub fn map_drill(session: &DrillSession) -> DrillVm {
    let question = session.question();
    let prompt_label = question.map(|q| {
        let direction = match q.mode {
            DrillMode::Forward => "Переведите на русский",
            DrillMode::Reverse => "Переведите на казахский",
        };
        format!("{direction}: {}", q.prompt)
    });
    let feedback = session.feedback().map(|result| DrillFeedbackVm {
        is_correct: result.is_correct,
        verdict_label: if result.is_correct {
            "Верно!".to_string()
        } else {
            match &result.correct_answer {
                Some(answer) => format!("Неверно. Правильный ответ: {answer}"),
                None => "Неверно.".to_string(),
            }
        },
        mastery_label: result.mastery.to_string(),
        mastery_percent: result.mastery.percent(),
        learned: result.is_learned(),
    });

    DrillVm {
        phase: session.phase(),
        vocabulary_id: question.map(|q| q.vocabulary_id),
        prompt_label,
        options: question.map(|q| q.options.clone()).unwrap_or_default(),
        feedback,
        exhausted_message: session.exhausted_message().map(str::to_string),
        answered: session.answered(),
        correct: session.correct(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client::FakeLearningApi;
    use std::sync::Arc;

    #[tokio::test]
    async fn forward_question_maps_to_a_russian_prompt() {
        let api = FakeLearningApi::new();
        api.add_word(1, "сәлем", "привет", 0);
        let mut session = DrillSession::new(Arc::new(api));
        session.request_next().await.unwrap();

        let vm = map_drill(&session);
        assert_eq!(vm.phase, DrillPhase::Presenting);
        assert_eq!(
            vm.prompt_label.as_deref(),
            Some("Переведите на русский: сәлем")
        );
        assert!(vm.feedback.is_none());
    }

    #[tokio::test]
    async fn wrong_answer_maps_to_a_verdict_with_the_correction() {
        let api = FakeLearningApi::new();
        api.add_word(1, "сәлем", "привет", 2);
        let mut session = DrillSession::new(Arc::new(api));
        session.request_next().await.unwrap();
        session.submit("дом").await.unwrap();

        let vm = map_drill(&session);
        let feedback = vm.feedback.unwrap();
        assert!(!feedback.is_correct);
        assert_eq!(feedback.verdict_label, "Неверно. Правильный ответ: привет");
        assert_eq!(feedback.mastery_label, "2/5");
        assert_eq!(feedback.mastery_percent, 40);
    }

    #[tokio::test]
    async fn exhaustion_maps_the_service_message() {
        let api = FakeLearningApi::new();
        api.set_drill_message("Все слова выучены!");
        let mut session = DrillSession::new(Arc::new(api));
        session.request_next().await.unwrap();

        let vm = map_drill(&session);
        assert_eq!(vm.phase, DrillPhase::Exhausted);
        assert_eq!(vm.exhausted_message.as_deref(), Some("Все слова выучены!"));
    }
}
