use services::AssessmentRun;
use til_core::model::QuestionId;

/// Render model for a test sitting.
#[derive(Clone, Debug, PartialEq)]
pub struct AssessmentVm {
    pub questions: Vec<AssessmentQuestionVm>,
    pub is_complete: bool,
    pub outcome: Option<OutcomeVm>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AssessmentQuestionVm {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<String>,
    pub answer: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OutcomeVm {
    pub score_label: String,
    pub passed: bool,
    pub verdict_label: &'static str,
    pub can_retake: bool,
}

#[must_use]
pub fn map_assessment(run: &AssessmentRun) -> AssessmentVm {
    let questions = run
        .questions()
        .iter()
        .map(|question| AssessmentQuestionVm {
            id: question.id,
            text: question.question_text.clone(),
            options: question.options.clone(),
            answer: run.answer(question.id).unwrap_or_default().to_string(),
        })
        .collect();
    let outcome = run.outcome().map(|outcome| OutcomeVm {
        score_label: format!("{}%", outcome.score),
        passed: outcome.passed,
        verdict_label: if outcome.passed {
            "Тест пройден"
        } else {
            "Тест не пройден"
        },
        can_retake: run.can_retake(),
    });

    AssessmentVm {
        questions,
        is_complete: run.is_complete(),
        outcome,
    }
}
