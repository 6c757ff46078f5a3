use til_core::model::{
    AssessmentQuestion, Lesson, LessonId, ProficiencyLevel, QuestionId, SessionContext, TestId,
    TestSummary, UserId, UserRole,
};

use client::{FakeLearningApi, ScriptedFailure};

use super::test_harness::{ViewKind, setup_view_harness, setup_view_harness_with};

fn lesson(id: u64, title: &str) -> Lesson {
    Lesson {
        id: LessonId::new(id),
        title: title.to_string(),
        level: "A1".to_string(),
        topic: "Сәлемдесу".to_string(),
        content: "## Сәлемдесу\n\nСәлем — привет.".to_string(),
    }
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_renders_greeting_and_stats() {
    let api = FakeLearningApi::new();
    api.add_lesson(lesson(1, "Сәлемдесу"), false);
    api.add_word(1, "сәлем", "привет", 5);
    api.add_word(2, "үй", "дом", 2);

    let mut harness = setup_view_harness_with(ViewKind::Dashboard, api).await;
    harness.rebuild();
    let html = harness.render();
    assert!(
        html.contains("Қош келдіңіз, Айгүл Тестова!"),
        "missing greeting in {html}"
    );
    assert!(html.contains("0/1"), "missing lesson stat in {html}");
    assert!(html.contains("1/2"), "missing vocabulary stat in {html}");
    assert!(html.contains("Тренировать слова"), "missing link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn lessons_view_smoke_marks_locked_lessons() {
    let api = FakeLearningApi::new();
    api.add_lesson(lesson(1, "Сәлемдесу"), false);
    api.add_lesson(lesson(2, "Септіктер"), true);

    let mut harness = setup_view_harness_with(ViewKind::Lessons, api).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Сәлемдесу"), "missing open lesson in {html}");
    assert!(html.contains("Септіктер"), "missing locked lesson in {html}");
    assert!(html.contains("Заблокировано"), "missing lock label in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn lesson_view_smoke_renders_content_and_final_test_notice() {
    let api = FakeLearningApi::new();
    api.add_lesson(lesson(3, "Сәлемдесу"), false);
    api.add_test(
        Some(LessonId::new(3)),
        TestSummary {
            id: TestId::new(9),
            title: "Итоговый тест".to_string(),
            is_final: true,
        },
        vec![(
            AssessmentQuestion {
                id: QuestionId::new(1),
                question_text: "Переведите: дом".to_string(),
                options: vec![],
            },
            "үй",
        )],
    );

    let mut harness = setup_view_harness_with(ViewKind::Lesson(3), api).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("<h2>"), "missing rendered markdown in {html}");
    assert!(
        html.contains("Для завершения урока необходимо пройти итоговый тест: Итоговый тест"),
        "missing final test notice in {html}"
    );
    assert!(html.contains("Завершить урок"), "missing complete button in {html}");
    assert!(html.contains("Спросить по уроку"), "missing ask box in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn tests_view_smoke_lists_tests_with_final_badge() {
    let api = FakeLearningApi::new();
    api.add_test(
        None,
        TestSummary {
            id: TestId::new(1),
            title: "Падежи".to_string(),
            is_final: true,
        },
        vec![],
    );

    let mut harness = setup_view_harness_with(ViewKind::Tests, api).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Падежи"), "missing test title in {html}");
    assert!(html.contains("Итоговый"), "missing final badge in {html}");
    assert!(html.contains("Начать тест"), "missing start button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn vocabulary_view_smoke_lists_words() {
    let api = FakeLearningApi::new();
    api.add_word(1, "кітап", "книга", 3);

    let mut harness = setup_view_harness_with(ViewKind::Vocabulary, api).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("кітап"), "missing word in {html}");
    assert!(html.contains("книга"), "missing translation in {html}");
    assert!(html.contains("Начать тренировку"), "missing drill start in {html}");
    assert!(html.contains("Изучаю"), "missing tab in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn chat_view_smoke_renders_empty_transcript() {
    let mut harness = setup_view_harness(ViewKind::Chat).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Чат с ассистентом"), "missing title in {html}");
    assert!(
        html.contains("Задайте вопрос о казахском языке."),
        "missing empty prompt in {html}"
    );
    assert!(html.contains("Отправить"), "missing send button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn progress_view_smoke_renders_error_with_retry() {
    let mut harness = setup_view_harness(ViewKind::Progress).await;
    harness
        .api
        .fail_next_request(ScriptedFailure::Service("база недоступна".to_string()));
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("база недоступна"), "missing error in {html}");
    assert!(html.contains("Повторить"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn admin_view_smoke_hides_content_from_students() {
    let mut harness = setup_view_harness(ViewKind::Admin).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Недостаточно прав."), "missing refusal in {html}");
    assert!(!html.contains("Администрирование"), "admin content leaked in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn admin_view_smoke_renders_tables_for_teacher() {
    let api = FakeLearningApi::new();
    api.set_user(SessionContext {
        id: UserId::new(2),
        full_name: "Берік Мұғалім".to_string(),
        role: UserRole::Teacher,
        proficiency_level: ProficiencyLevel::default(),
    });
    api.add_lesson(lesson(1, "Сәлемдесу"), false);

    let mut harness = setup_view_harness_with(ViewKind::Admin, api).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Администрирование"), "missing title in {html}");
    assert!(html.contains("Уроки (1)"), "missing lesson table in {html}");
}
