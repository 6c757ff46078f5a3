use std::sync::Arc;

use chrono::{DateTime, Utc};
use client::{AddVocabulary, LearningApi};
use til_core::Clock;
use til_core::model::{
    CarryState, ChatContext, LessonId, MentionedWord, RefineMode, SourceTag, VocabularyId,
};

use crate::error::ChatError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

/// Whether a mentioned word can still be added to the learner's vocabulary.
/// Both `Added` and `AlreadyAdded` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MentionState {
    Offered,
    Added,
    AlreadyAdded,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mention {
    pub word: MentionedWord,
    pub state: MentionState,
}

/// One turn in the transcript. Assistant turns carry the source badge and
/// the reply's suggestions; failed exchanges are recorded as error turns so
/// the transcript stays append-only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversationTurn {
    pub speaker: Speaker,
    pub text: String,
    pub at: DateTime<Utc>,
    pub source: Option<SourceTag>,
    pub suggestions: Vec<String>,
    pub mentions: Vec<Mention>,
    pub is_error: bool,
}

impl ConversationTurn {
    fn user(text: &str, at: DateTime<Utc>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.to_string(),
            at,
            source: None,
            suggestions: vec![],
            mentions: vec![],
            is_error: false,
        }
    }

    fn error(text: String, at: DateTime<Utc>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text,
            at,
            source: None,
            suggestions: vec![],
            mentions: vec![],
            is_error: true,
        }
    }
}

/// An assistant conversation, optionally anchored to a lesson.
///
/// The thread owns the transcript and the topic/rule carried between turns.
/// Context is rebuilt per request from the learner's level, the lesson
/// anchor, and (for refinements) the carry from the latest assistant reply;
/// the service itself holds no conversation memory.
pub struct ConversationThread {
    api: Arc<dyn LearningApi>,
    clock: Clock,
    user_level: String,
    lesson_id: Option<LessonId>,
    turns: Vec<ConversationTurn>,
    carry: CarryState,
    in_flight: bool,
}

impl ConversationThread {
    #[must_use]
    pub fn new(
        api: Arc<dyn LearningApi>,
        clock: Clock,
        user_level: impl Into<String>,
        lesson_id: Option<LessonId>,
    ) -> Self {
        Self {
            api,
            clock,
            user_level: user_level.into(),
            lesson_id,
            turns: Vec::new(),
            carry: CarryState::default(),
            in_flight: false,
        }
    }

    #[must_use]
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    #[must_use]
    pub fn carry(&self) -> &CarryState {
        &self.carry
    }

    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Whether refine buttons apply: the latest assistant reply carried a
    /// topic or rule reference to restate.
    #[must_use]
    pub fn can_refine(&self) -> bool {
        self.carry.last_topic.is_some() || self.carry.last_rule.is_some()
    }

    /// Send a learner message.
    ///
    /// An empty message is rejected locally without contacting the service.
    /// The user turn is appended before the request; on failure an error
    /// turn is appended and the error is returned so the shell can react to
    /// an expired credential.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::EmptyMessage`, `ChatError::Busy`, or
    /// `ChatError::Api`.
    pub async fn send(&mut self, message: &str) -> Result<(), ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        let context = ChatContext::new(self.user_level.clone(), self.lesson_id);
        self.exchange(message, context).await
    }

    /// Send a refinement: the button label becomes the user turn, and the
    /// carried topic/rule stand in for the original question.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::NothingToRefine`, `ChatError::Busy`, or
    /// `ChatError::Api`.
    pub async fn refine(&mut self, mode: RefineMode) -> Result<(), ChatError> {
        if !self.can_refine() {
            return Err(ChatError::NothingToRefine);
        }
        let context = ChatContext::new(self.user_level.clone(), self.lesson_id)
            .with_refinement(mode, &self.carry);
        self.exchange(mode.label(), context).await
    }

    async fn exchange(&mut self, message: &str, context: ChatContext) -> Result<(), ChatError> {
        if self.in_flight {
            return Err(ChatError::Busy);
        }
        self.in_flight = true;
        self.turns
            .push(ConversationTurn::user(message, self.clock.now()));

        let outcome = self.api.chat(message, &context).await;
        self.in_flight = false;
        match outcome {
            Ok(reply) => {
                // The carry mirrors the latest reply; a reply without a
                // topic or rule clears it rather than keeping a stale one.
                self.carry = reply.carry();
                self.turns.push(ConversationTurn {
                    speaker: Speaker::Assistant,
                    text: reply.text.clone(),
                    at: self.clock.now(),
                    source: Some(reply.source),
                    suggestions: reply.suggestions(),
                    mentions: reply
                        .mentioned_words
                        .iter()
                        .map(|word| Mention {
                            word: word.clone(),
                            state: MentionState::Offered,
                        })
                        .collect(),
                    is_error: false,
                });
                Ok(())
            }
            Err(err) => {
                self.turns
                    .push(ConversationTurn::error(err.detail_message(), self.clock.now()));
                Err(err.into())
            }
        }
    }

    /// Add a mentioned word to the learner's vocabulary. A duplicate is a
    /// success from the learner's point of view and lands in
    /// `AlreadyAdded`.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Api` for failures other than a duplicate; the
    /// mention stays `Offered` and can be retried.
    pub async fn add_mention(&mut self, vocabulary_id: VocabularyId) -> Result<(), ChatError> {
        let request = AddVocabulary::ById { vocabulary_id };
        let state = match self.api.add_vocabulary(&request).await {
            Ok(_) => MentionState::Added,
            Err(err) if err.is_conflict() => MentionState::AlreadyAdded,
            Err(err) => return Err(err.into()),
        };
        for turn in &mut self.turns {
            for mention in &mut turn.mentions {
                if mention.word.vocabulary_id == vocabulary_id {
                    mention.state = state;
                }
            }
        }
        Ok(())
    }

    /// Current state of a mentioned word across the transcript.
    #[must_use]
    pub fn mention_state(&self, vocabulary_id: VocabularyId) -> Option<MentionState> {
        self.turns
            .iter()
            .flat_map(|turn| &turn.mentions)
            .find(|mention| mention.word.vocabulary_id == vocabulary_id)
            .map(|mention| mention.state)
    }
}
