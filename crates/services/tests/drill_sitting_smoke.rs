use std::sync::Arc;

use client::FakeLearningApi;
use services::{DrillPhase, DrillSession};
use til_core::model::VocabularyStatus;

#[tokio::test]
async fn a_sitting_drills_every_word_to_learned() {
    let api = Arc::new(FakeLearningApi::new());
    api.add_word(1, "сәлем", "привет", 3);
    api.add_word(2, "үй", "дом", 4);

    let mut session = DrillSession::new(api.clone());
    let mut guard = 0;
    loop {
        session.request_next().await.unwrap();
        match session.phase() {
            DrillPhase::Presenting => {
                let prompt = session.question().unwrap().prompt.clone();
                let answer = match prompt.as_str() {
                    "сәлем" => "привет",
                    "үй" => "дом",
                    other => panic!("unexpected prompt {other}"),
                };
                session.submit(answer).await.unwrap();
            }
            DrillPhase::Exhausted => break,
            other => panic!("unexpected phase {other:?}"),
        }
        guard += 1;
        assert!(guard < 10, "drill did not converge");
    }

    assert_eq!(session.exhausted_message(), Some("Нет слов для изучения."));
    assert!(session.answered() >= 3);
    assert_eq!(session.answered(), session.correct());
    assert!(
        api.vocabulary_snapshot()
            .iter()
            .all(|entry| entry.status == VocabularyStatus::Learned)
    );
}
