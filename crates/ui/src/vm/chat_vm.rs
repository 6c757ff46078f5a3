use services::{ConversationThread, MentionState, Speaker};
use til_core::model::VocabularyId;

use crate::vm::content::sanitize_html;

/// Render model for the conversation transcript.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatVm {
    pub turns: Vec<TurnVm>,
    pub can_refine: bool,
    pub in_flight: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TurnVm {
    pub is_user: bool,
    pub html: String,
    pub time_label: String,
    pub source_label: Option<&'static str>,
    pub suggestions: Vec<String>,
    pub mentions: Vec<MentionVm>,
    pub is_error: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MentionVm {
    pub vocabulary_id: VocabularyId,
    pub word: String,
    pub button_label: &'static str,
    pub disabled: bool,
}

#[must_use]
pub fn map_chat(thread: &ConversationThread) -> ChatVm {
    let turns = thread
        .turns()
        .iter()
        .map(|turn| TurnVm {
            is_user: turn.speaker == Speaker::User,
            html: sanitize_html(&turn.text.replace('\n', "<br>")),
            time_label: turn.at.format("%H:%M").to_string(),
            source_label: turn.source.map(|source| source.label()),
            suggestions: turn.suggestions.clone(),
            mentions: turn
                .mentions
                .iter()
                .map(|mention| {
                    let (button_label, disabled) = match mention.state {
                        MentionState::Offered => ("Добавить в словарь", false),
                        MentionState::Added => ("Добавлено", true),
                        MentionState::AlreadyAdded => ("Уже в словаре", true),
                    };
                    MentionVm {
                        vocabulary_id: mention.word.vocabulary_id,
                        word: mention.word.word_source.clone(),
                        button_label,
                        disabled,
                    }
                })
                .collect(),
            is_error: turn.is_error,
        })
        .collect();

    ChatVm {
        turns,
        can_refine: thread.can_refine(),
        in_flight: thread.is_in_flight(),
    }
}

/// Snapshot published while an exchange is awaited, so the composer and
/// refine buttons stay disabled until the reply lands.
#[must_use]
pub fn map_chat_busy(thread: &ConversationThread) -> ChatVm {
    ChatVm {
        in_flight: true,
        ..map_chat(thread)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client::FakeLearningApi;
    use services::Clock;
    use std::sync::Arc;
    use til_core::model::{ChatReply, MentionedWord, SourceTag};

    fn scripted_thread(reply: ChatReply) -> ConversationThread {
        let api = FakeLearningApi::new();
        api.push_chat_reply(reply);
        ConversationThread::new(
            Arc::new(api),
            Clock::fixed(til_core::time::fixed_now()),
            "A1",
            None,
        )
    }

    #[tokio::test]
    async fn assistant_turn_carries_badge_and_mention_buttons() {
        let mut thread = scripted_thread(ChatReply {
            text: "«үй» значит дом".to_string(),
            source: SourceTag::Dictionary,
            nav_buttons: vec![],
            quick_replies: vec![],
            mentioned_words: vec![MentionedWord {
                vocabulary_id: VocabularyId::new(3),
                word_source: "үй".to_string(),
            }],
            last_topic: None,
            last_rule: None,
        });
        thread.send("что такое үй").await.unwrap();

        let vm = map_chat(&thread);
        assert!(!vm.can_refine, "no topic or rule to refine");
        let assistant = &vm.turns[1];
        assert_eq!(assistant.source_label, Some("словарь"));
        assert_eq!(assistant.mentions[0].button_label, "Добавить в словарь");
        assert!(!assistant.mentions[0].disabled);
        assert_eq!(assistant.time_label, "12:00");
    }

    #[tokio::test]
    async fn duplicate_mention_renders_disabled() {
        let api = FakeLearningApi::new();
        api.add_word(3, "үй", "дом", 0);
        api.push_chat_reply(ChatReply {
            text: "«үй» значит дом".to_string(),
            source: SourceTag::Dictionary,
            nav_buttons: vec![],
            quick_replies: vec![],
            mentioned_words: vec![MentionedWord {
                vocabulary_id: VocabularyId::new(3),
                word_source: "үй".to_string(),
            }],
            last_topic: None,
            last_rule: None,
        });
        let mut thread = ConversationThread::new(
            Arc::new(api),
            Clock::fixed(til_core::time::fixed_now()),
            "A1",
            None,
        );
        thread.send("что такое үй").await.unwrap();
        thread.add_mention(VocabularyId::new(3)).await.unwrap();

        let vm = map_chat(&thread);
        let mention = &vm.turns[1].mentions[0];
        assert_eq!(mention.button_label, "Уже в словаре");
        assert!(mention.disabled);
    }

    #[tokio::test]
    async fn refine_bar_follows_the_reply_topic() {
        let mut thread = scripted_thread(ChatReply {
            text: "Падежи отвечают на вопросы…".to_string(),
            source: SourceTag::Rule,
            nav_buttons: vec![],
            quick_replies: vec![],
            mentioned_words: vec![],
            last_topic: Some("cases".to_string()),
            last_rule: None,
        });
        thread.send("Что такое падежи?").await.unwrap();

        assert!(map_chat(&thread).can_refine);
    }

    #[tokio::test]
    async fn busy_snapshot_disables_the_composer() {
        let mut thread = scripted_thread(ChatReply {
            text: "Сәлем!".to_string(),
            source: SourceTag::Rule,
            nav_buttons: vec![],
            quick_replies: vec![],
            mentioned_words: vec![],
            last_topic: None,
            last_rule: None,
        });
        thread.send("привет").await.unwrap();

        let busy = map_chat_busy(&thread);
        assert!(busy.in_flight);
        assert_eq!(busy.turns.len(), 2);
        assert!(!map_chat(&thread).in_flight);
    }

    #[tokio::test]
    async fn reply_markup_is_sanitized() {
        let mut thread = scripted_thread(ChatReply {
            text: "ok<script>alert(1)</script>".to_string(),
            source: SourceTag::Rule,
            nav_buttons: vec![],
            quick_replies: vec![],
            mentioned_words: vec![],
            last_topic: None,
            last_rule: None,
        });
        thread.send("привет").await.unwrap();

        let vm = map_chat(&thread);
        assert!(!vm.turns[1].html.contains("script"));
    }
}
