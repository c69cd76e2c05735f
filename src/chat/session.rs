//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns one
//! conversation: the transcript, the draft input, the typing indicator and
//! the speech toggles.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Deserialize;
use time::OffsetDateTime;

use crate::chat::config::ChatConfig;
use crate::chat::export::{Export, export_conversation};
use crate::classify::classify;
use crate::client::{Transport, error_message};
use crate::error::{Error, Result};
use crate::observability::{CHAT_EXPORTS, CHAT_FAILURES, CHAT_REJECTED, CHAT_SUBMISSIONS};
use crate::speech::{CaptureEvent, SpeechCapability};
use crate::suggestions::{Suggestion, contextual_suggestions};
use crate::types::{Category, ExportFormat, Message};

/// Bot message appended when a chat request fails.
pub const FALLBACK_REPLY: &str =
    "Sorry, there was an error processing your request. Please try again.";

const CHAT_PATH: &str = "/api/chat";
const GREETING_ID: &str = "welcome";

/// Which messages to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Every message.
    #[default]
    All,
    /// Only messages tagged with this category.
    Only(Category),
}

impl CategoryFilter {
    fn matches(&self, message: &Message) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => message.category == Some(*category),
        }
    }
}

/// A star rating left on a bot reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    /// The rated message.
    pub message_id: String,
    /// One to five stars.
    pub rating: u8,
    /// When the rating was given.
    pub timestamp: OffsetDateTime,
}

/// Ticket for a submission whose reply has not been appended yet.
///
/// Returned by [`ChatSession::begin_submit`] and consumed by
/// [`ChatSession::complete_submit`]. Dropping it without completing
/// abandons the submission: the typing indicator is lowered and no reply
/// is appended.
#[derive(Debug)]
#[must_use = "dropping a pending reply abandons the submission"]
pub struct PendingReply {
    text: String,
    typing: Arc<AtomicBool>,
}

impl Drop for PendingReply {
    fn drop(&mut self) {
        self.typing.store(false, Ordering::Release);
    }
}

impl PendingReply {
    /// The trimmed text that was submitted.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Counts describing a transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSummary {
    /// All messages, greeting included.
    pub message_count: usize,
    /// Messages typed by the user.
    pub user_messages: usize,
    /// Messages from the responder, fallbacks included.
    pub bot_messages: usize,
    /// Fallback apologies appended after failed requests.
    pub failed_replies: usize,
    /// Bot messages per category, in [`Category::ALL`] order, zeros omitted.
    pub categories: Vec<(Category, usize)>,
    /// Mean star rating, if anything was rated.
    pub average_rating: Option<f64>,
}

#[derive(Deserialize)]
struct ChatReply {
    response: String,
}

/// A single chat conversation.
///
/// At most one reply is outstanding at a time: submitting while
/// [`is_typing`](Self::is_typing) is true fails with [`Error::Busy`]
/// instead of queueing or cancelling the earlier request. Request failures
/// never reach the caller; they become a [`FALLBACK_REPLY`] in the
/// transcript.
pub struct ChatSession {
    transport: Arc<dyn Transport>,
    speech: Box<dyn SpeechCapability>,
    config: ChatConfig,
    messages: Vec<Message>,
    pending_input: String,
    typing: Arc<AtomicBool>,
    is_listening: bool,
    is_speaking: bool,
    feedback: Vec<Feedback>,
    next_id: u64,
}

impl ChatSession {
    /// Creates a session, seeding the greeting if the config has one.
    pub fn new(
        transport: Arc<dyn Transport>,
        speech: Box<dyn SpeechCapability>,
        config: ChatConfig,
    ) -> Self {
        let mut messages = Vec::new();
        if let Some(greeting) = &config.greeting {
            messages.push(Message::bot(
                GREETING_ID,
                greeting.clone(),
                Some(Category::General),
            ));
        }
        let is_speaking = config.speak_replies;
        Self {
            transport,
            speech,
            config,
            messages,
            pending_input: String::new(),
            typing: Arc::new(AtomicBool::new(false)),
            is_listening: false,
            is_speaking,
            feedback: Vec::new(),
            next_id: 0,
        }
    }

    /// Sends `text` and waits for the reply.
    ///
    /// The user message is appended before the request goes out. The
    /// returned message is the appended bot reply or, if the request
    /// failed, the fallback apology. If the future is dropped before it
    /// completes, the user message stays without a reply and the session
    /// accepts new submissions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for blank text and [`Error::Busy`]
    /// while another reply is pending. Nothing is appended in either case.
    pub async fn submit(&mut self, text: &str) -> Result<&Message> {
        let pending = self.begin_submit(text)?;
        let reply = request_reply(self.transport.as_ref(), pending.text()).await;
        if reply.is_ok() && !self.config.typing_delay.is_zero() {
            tokio::time::sleep(self.config.typing_delay).await;
        }
        Ok(self.complete_submit(pending, reply))
    }

    /// Submits the current draft input.
    pub async fn submit_input(&mut self) -> Result<&Message> {
        let text = self.pending_input.clone();
        self.submit(&text).await
    }

    /// First half of [`submit`](Self::submit) for callers that drive the
    /// request themselves.
    ///
    /// Appends the user message, clears the draft, raises the typing
    /// indicator and stops any active voice capture.
    pub fn begin_submit(&mut self, text: &str) -> Result<PendingReply> {
        let text = text.trim();
        if text.is_empty() {
            CHAT_REJECTED.click();
            return Err(Error::invalid_input("message is empty"));
        }
        if self.typing.load(Ordering::Acquire) {
            CHAT_REJECTED.click();
            return Err(Error::busy("a reply to the previous message is still pending"));
        }
        CHAT_SUBMISSIONS.click();
        let id = self.next_message_id();
        self.messages.push(Message::user(id, text));
        self.pending_input.clear();
        self.typing.store(true, Ordering::Release);
        if self.is_listening {
            if let Err(err) = self.speech.stop_capture() {
                tracing::warn!(error = %err, "failed to stop voice capture");
            }
            self.is_listening = false;
        }
        Ok(PendingReply {
            text: text.to_string(),
            typing: Arc::clone(&self.typing),
        })
    }

    /// Second half of [`submit`](Self::submit): appends the reply (or the
    /// fallback) and lowers the typing indicator. A blank reply counts as
    /// a failure.
    pub fn complete_submit(&mut self, pending: PendingReply, reply: Result<String>) -> &Message {
        let id = self.next_message_id();
        let reply = reply.and_then(|text| {
            if text.trim().is_empty() {
                Err(Error::validation("chat reply was empty", Some("response".to_string())))
            } else {
                Ok(text)
            }
        });
        let message = match reply {
            Ok(text) => {
                let category = classify(&text);
                Message::bot(id, text, Some(category))
            }
            Err(err) => {
                CHAT_FAILURES.click();
                tracing::error!(error = %err, submitted = %pending.text, "chat request failed");
                Message::bot(id, FALLBACK_REPLY, None)
            }
        };
        drop(pending);
        if self.is_speaking
            && message.category.is_some()
            && let Err(err) = self.speech.speak(&message.text)
        {
            tracing::warn!(error = %err, "failed to read reply aloud");
        }
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// Starts or stops voice capture; returns whether capture is now active.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SpeechUnsupported`] when the runtime has no speech
    /// recognition.
    pub fn toggle_voice_capture(&mut self) -> Result<bool> {
        if !self.speech.is_available() {
            return Err(Error::speech_unsupported(
                "Speech recognition is not supported in this environment.",
            ));
        }
        if self.is_listening {
            self.speech.stop_capture()?;
            self.is_listening = false;
        } else {
            self.speech.start_capture()?;
            self.is_listening = true;
        }
        Ok(self.is_listening)
    }

    /// Applies an event reported by the speech adapter.
    pub fn handle_capture_event(&mut self, event: CaptureEvent) {
        match event {
            CaptureEvent::Transcript(transcript) => {
                self.pending_input = transcript;
            }
            CaptureEvent::Error(reason) => {
                tracing::warn!(%reason, "speech recognition error");
            }
            CaptureEvent::Ended => {}
        }
        self.is_listening = false;
    }

    /// Flips whether future replies are read aloud; returns the new value.
    pub fn toggle_speech_playback(&mut self) -> bool {
        self.is_speaking = !self.is_speaking;
        self.is_speaking
    }

    /// Reads an existing message aloud on demand.
    pub fn speak_message(&mut self, id: &str) -> Result<()> {
        let message = self.find_message(id)?;
        let text = message.text.clone();
        self.speech.speak(&text)
    }

    /// Serializes the whole transcript.
    pub fn export_conversation(&self, format: ExportFormat) -> Result<Export> {
        CHAT_EXPORTS.click();
        export_conversation(&self.messages, format)
    }

    /// Records a one-to-five star rating for a bot reply.
    ///
    /// Rating the same message again replaces the earlier rating.
    pub fn rate_message(&mut self, id: &str, rating: u8) -> Result<()> {
        if !(1..=5).contains(&rating) {
            return Err(Error::validation(
                format!("rating must be between 1 and 5, got {rating}"),
                Some("rating".to_string()),
            ));
        }
        if !self.find_message(id)?.is_bot() {
            return Err(Error::validation(
                "only bot replies can be rated",
                Some("message_id".to_string()),
            ));
        }
        tracing::info!(message_id = %id, rating, "feedback recorded");
        let entry = Feedback {
            message_id: id.to_string(),
            rating,
            timestamp: OffsetDateTime::now_utc(),
        };
        match self.feedback.iter_mut().find(|f| f.message_id == id) {
            Some(existing) => *existing = entry,
            None => self.feedback.push(entry),
        }
        Ok(())
    }

    /// Ratings given so far, in the order first given.
    pub fn feedback(&self) -> &[Feedback] {
        &self.feedback
    }

    /// The transcript in insertion order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages passing `filter`, in insertion order.
    pub fn messages_in(&self, filter: CategoryFilter) -> Vec<&Message> {
        self.messages.iter().filter(|m| filter.matches(m)).collect()
    }

    /// The most recent bot message, if any.
    pub fn last_bot_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.is_bot())
    }

    /// Follow-up prompts for the current transcript.
    pub fn suggestions(&self) -> Vec<Suggestion> {
        contextual_suggestions(&self.messages)
    }

    /// The draft input.
    pub fn input(&self) -> &str {
        &self.pending_input
    }

    /// Replaces the draft input.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    /// Copies a suggestion into the draft input without sending it.
    pub fn apply_suggestion(&mut self, suggestion: &str) {
        self.set_input(suggestion);
    }

    /// True from submission until the reply is appended.
    pub fn is_typing(&self) -> bool {
        self.typing.load(Ordering::Acquire)
    }

    /// True while voice capture is active.
    pub fn is_listening(&self) -> bool {
        self.is_listening
    }

    /// True if new replies are read aloud.
    pub fn is_speaking(&self) -> bool {
        self.is_speaking
    }

    /// True if the speech adapter can actually capture and speak.
    pub fn speech_available(&self) -> bool {
        self.speech.is_available()
    }

    /// Returns the number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Returns the current transcript summary.
    pub fn summary(&self) -> ChatSummary {
        let user_messages = self.messages.iter().filter(|m| m.is_user()).count();
        let bot_messages = self.messages.len() - user_messages;
        let failed_replies = self
            .messages
            .iter()
            .filter(|m| m.is_bot() && m.category.is_none())
            .count();
        let categories = Category::ALL
            .iter()
            .filter(|c| **c != Category::User)
            .map(|c| {
                let count = self
                    .messages
                    .iter()
                    .filter(|m| m.is_bot() && m.category == Some(*c))
                    .count();
                (*c, count)
            })
            .filter(|(_, count)| *count > 0)
            .collect();
        let average_rating = if self.feedback.is_empty() {
            None
        } else {
            let total: u32 = self.feedback.iter().map(|f| u32::from(f.rating)).sum();
            Some(f64::from(total) / self.feedback.len() as f64)
        };
        ChatSummary {
            message_count: self.messages.len(),
            user_messages,
            bot_messages,
            failed_replies,
            categories,
            average_rating,
        }
    }

    /// Releases the speech adapter; called automatically on drop.
    pub fn shutdown(&mut self) {
        if self.is_listening {
            self.speech.abort_capture();
            self.is_listening = false;
        }
    }

    fn find_message(&self, id: &str) -> Result<&Message> {
        self.messages.iter().find(|m| m.id == id).ok_or_else(|| {
            Error::validation(
                format!("no message with id {id}"),
                Some("message_id".to_string()),
            )
        })
    }

    fn next_message_id(&mut self) -> String {
        let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        self.next_id += 1;
        format!("{millis}-{}", self.next_id)
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn request_reply(transport: &dyn Transport, text: &str) -> Result<String> {
    let body = serde_json::json!({ "message": text });
    let response = transport.post_json(CHAT_PATH, &body).await?;
    if !response.is_success() {
        let message = error_message(&response.body, "chat request failed");
        return Err(if response.status >= 500 {
            Error::server_error(response.status, message)
        } else {
            Error::api(response.status, message)
        });
    }
    let reply: ChatReply = serde_json::from_str(&response.body).map_err(|err| {
        Error::serialization("failed to parse chat response", Some(Box::new(err)))
    })?;
    Ok(reply.response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::HttpResponse;
    use crate::speech::NoSpeech;
    use crate::types::Sender;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    struct ScriptedTransport {
        replies: Mutex<VecDeque<Result<HttpResponse>>>,
        bodies: Mutex<Vec<serde_json::Value>>,
    }

    impl ScriptedTransport {
        fn new(replies: Vec<Result<HttpResponse>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                bodies: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait::async_trait]
    impl Transport for ScriptedTransport {
        async fn get(&self, _: &str, _: Option<&str>) -> Result<HttpResponse> {
            unreachable!("chat never issues GET")
        }

        async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<HttpResponse> {
            assert_eq!(path, "/api/chat");
            self.bodies.lock().unwrap().push(body.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected chat request")
        }
    }

    #[derive(Default)]
    struct SpeechLog {
        started: usize,
        stopped: usize,
        aborted: usize,
        spoken: Vec<String>,
    }

    struct FakeSpeech(Arc<Mutex<SpeechLog>>);

    impl SpeechCapability for FakeSpeech {
        fn is_available(&self) -> bool {
            true
        }

        fn start_capture(&mut self) -> Result<()> {
            self.0.lock().unwrap().started += 1;
            Ok(())
        }

        fn stop_capture(&mut self) -> Result<()> {
            self.0.lock().unwrap().stopped += 1;
            Ok(())
        }

        fn abort_capture(&mut self) {
            self.0.lock().unwrap().aborted += 1;
        }

        fn speak(&mut self, text: &str) -> Result<()> {
            self.0.lock().unwrap().spoken.push(text.to_string());
            Ok(())
        }
    }

    fn reply(text: &str) -> Result<HttpResponse> {
        Ok(HttpResponse::new(
            200,
            serde_json::json!({ "response": text }).to_string(),
        ))
    }

    fn quick_config() -> ChatConfig {
        ChatConfig::new().with_typing_delay(Duration::ZERO)
    }

    fn session(replies: Vec<Result<HttpResponse>>) -> ChatSession {
        ChatSession::new(ScriptedTransport::new(replies), Box::new(NoSpeech), quick_config())
    }

    #[test]
    fn new_session_has_greeting() {
        let session = session(vec![]);
        assert_eq!(session.message_count(), 1);
        let greeting = &session.messages()[0];
        assert_eq!(greeting.id, "welcome");
        assert_eq!(greeting.sender, Sender::Bot);
        assert_eq!(greeting.category, Some(Category::General));
    }

    #[test]
    fn greeting_can_be_disabled() {
        let session = ChatSession::new(
            ScriptedTransport::new(vec![]),
            Box::new(NoSpeech),
            quick_config().with_greeting(None),
        );
        assert_eq!(session.message_count(), 0);
    }

    #[tokio::test]
    async fn submit_appends_user_then_bot() {
        let transport = ScriptedTransport::new(vec![reply("Your course starts Monday.")]);
        let mut session = ChatSession::new(transport.clone(), Box::new(NoSpeech), quick_config());
        session.set_input("draft");

        let bot = session.submit("  When does class start?  ").await.unwrap();
        assert_eq!(bot.text, "Your course starts Monday.");
        assert_eq!(bot.category, Some(Category::Academic));

        assert_eq!(session.message_count(), 3);
        let user = &session.messages()[1];
        assert_eq!(user.text, "When does class start?");
        assert_eq!(user.category, Some(Category::User));
        assert!(!session.is_typing());
        assert_eq!(session.input(), "");
        assert_eq!(
            transport.bodies.lock().unwrap()[0],
            serde_json::json!({ "message": "When does class start?" })
        );
    }

    #[tokio::test]
    async fn failure_appends_fallback_without_category() {
        let mut session = session(vec![
            Err(Error::connection("refused", None)),
            Ok(HttpResponse::new(500, "oops")),
            Ok(HttpResponse::new(200, r#"{"reply": "wrong field"}"#)),
        ]);
        for expected_len in [3, 5, 7] {
            let bot = session.submit("hello").await.unwrap();
            assert_eq!(bot.text, FALLBACK_REPLY);
            assert!(bot.category.is_none());
            assert_eq!(session.message_count(), expected_len);
            assert!(!session.is_typing());
        }
        assert_eq!(session.summary().failed_replies, 3);
    }

    #[tokio::test]
    async fn empty_reply_becomes_fallback() {
        let mut session = session(vec![reply(""), reply("  \n ")]);
        for _ in 0..2 {
            let bot = session.submit("hi").await.unwrap();
            assert_eq!(bot.text, FALLBACK_REPLY);
            assert!(bot.category.is_none());
        }
        let pending = session.begin_submit("again").unwrap();
        let bot = session.complete_submit(pending, Ok(String::new()));
        assert_eq!(bot.text, FALLBACK_REPLY);
        assert!(session.messages().iter().all(|m| !m.text.is_empty()));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_submit_releases_session() {
        let mut session = ChatSession::new(
            ScriptedTransport::new(vec![reply("first"), reply("Your exam is on Friday.")]),
            Box::new(NoSpeech),
            ChatConfig::new(),
        );
        let cancelled =
            tokio::time::timeout(Duration::from_millis(10), session.submit("hi")).await;
        assert!(cancelled.is_err());
        assert!(!session.is_typing());
        assert_eq!(session.message_count(), 2);

        let bot = session.submit("When is my exam?").await.unwrap();
        assert_eq!(bot.text, "Your exam is on Friday.");
        assert_eq!(session.message_count(), 4);
        assert!(!session.is_typing());
    }

    #[test]
    fn dropped_pending_reply_abandons_submission() {
        let mut session = session(vec![]);
        let pending = session.begin_submit("first").unwrap();
        assert_eq!(pending.text(), "first");
        drop(pending);
        assert!(!session.is_typing());
        assert!(session.begin_submit("second").is_ok());
    }

    #[test]
    fn speech_availability_follows_adapter() {
        assert!(!session(vec![]).speech_available());
        let speaking = ChatSession::new(
            ScriptedTransport::new(vec![]),
            Box::new(FakeSpeech(Arc::new(Mutex::new(SpeechLog::default())))),
            quick_config(),
        );
        assert!(speaking.speech_available());
    }

    #[tokio::test]
    async fn blank_input_rejected() {
        let mut session = session(vec![]);
        let err = session.submit("   ").await.unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(session.message_count(), 1);
    }

    #[test]
    fn second_submission_while_pending_is_busy() {
        let mut session = session(vec![]);
        let pending = session.begin_submit("first").unwrap();
        assert!(session.is_typing());

        let err = session.begin_submit("second").unwrap_err();
        assert!(err.is_busy());
        assert_eq!(session.message_count(), 2);

        session.complete_submit(pending, Ok("done".to_string()));
        assert!(!session.is_typing());
        assert!(session.begin_submit("third").is_ok());
    }

    #[test]
    fn message_ids_are_unique() {
        let mut session = session(vec![]);
        for i in 0..20 {
            let pending = session.begin_submit(&format!("q{i}")).unwrap();
            session.complete_submit(pending, Ok(format!("a{i}")));
        }
        let mut ids: Vec<&str> = session.messages().iter().map(|m| m.id.as_str()).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[tokio::test(start_paused = true)]
    async fn typing_delay_applies_to_successful_replies() {
        let mut session = ChatSession::new(
            ScriptedTransport::new(vec![reply("ok")]),
            Box::new(NoSpeech),
            ChatConfig::new(),
        );
        let started = tokio::time::Instant::now();
        session.submit("hi").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(500));
    }

    #[test]
    fn toggle_voice_capture_without_support_fails_visibly() {
        let mut session = session(vec![]);
        let err = session.toggle_voice_capture().unwrap_err();
        assert!(err.is_speech_unsupported());
        assert!(!session.is_listening());
    }

    #[test]
    fn capture_transcript_fills_input() {
        let log = Arc::new(Mutex::new(SpeechLog::default()));
        let mut session = ChatSession::new(
            ScriptedTransport::new(vec![]),
            Box::new(FakeSpeech(log.clone())),
            quick_config(),
        );
        assert!(session.toggle_voice_capture().unwrap());
        assert!(session.is_listening());
        session.handle_capture_event(CaptureEvent::Transcript("library hours".to_string()));
        assert_eq!(session.input(), "library hours");
        assert!(!session.is_listening());

        session.set_input("keep me");
        session.toggle_voice_capture().unwrap();
        session.handle_capture_event(CaptureEvent::Error("no-speech".to_string()));
        assert_eq!(session.input(), "keep me");
        assert!(!session.is_listening());
        assert_eq!(log.lock().unwrap().started, 2);
    }

    #[test]
    fn toggling_capture_twice_stops_it() {
        let log = Arc::new(Mutex::new(SpeechLog::default()));
        let mut session = ChatSession::new(
            ScriptedTransport::new(vec![]),
            Box::new(FakeSpeech(log.clone())),
            quick_config(),
        );
        assert!(session.toggle_voice_capture().unwrap());
        assert!(!session.toggle_voice_capture().unwrap());
        assert_eq!(log.lock().unwrap().stopped, 1);
    }

    #[tokio::test]
    async fn submit_stops_active_capture_and_speaks_reply() {
        let log = Arc::new(Mutex::new(SpeechLog::default()));
        let mut session = ChatSession::new(
            ScriptedTransport::new(vec![reply("The library opens at 8.")]),
            Box::new(FakeSpeech(log.clone())),
            quick_config(),
        );
        session.toggle_voice_capture().unwrap();
        assert!(session.toggle_speech_playback());
        session.submit("library hours?").await.unwrap();

        assert!(!session.is_listening());
        let log = log.lock().unwrap();
        assert_eq!(log.stopped, 1);
        assert_eq!(log.spoken, vec!["The library opens at 8.".to_string()]);
    }

    #[test]
    fn speech_playback_toggle_is_idempotent_in_pairs() {
        let mut session = session(vec![]);
        let original = session.is_speaking();
        session.toggle_speech_playback();
        session.toggle_speech_playback();
        assert_eq!(session.is_speaking(), original);
    }

    #[test]
    fn playback_only_affects_future_replies() {
        let log = Arc::new(Mutex::new(SpeechLog::default()));
        let mut session = ChatSession::new(
            ScriptedTransport::new(vec![]),
            Box::new(FakeSpeech(log.clone())),
            quick_config(),
        );
        let pending = session.begin_submit("one").unwrap();
        session.complete_submit(pending, Ok("first".to_string()));
        session.toggle_speech_playback();
        assert!(log.lock().unwrap().spoken.is_empty());

        let pending = session.begin_submit("two").unwrap();
        session.complete_submit(pending, Ok("second".to_string()));
        assert_eq!(log.lock().unwrap().spoken, vec!["second".to_string()]);
    }

    #[test]
    fn drop_aborts_active_capture() {
        let log = Arc::new(Mutex::new(SpeechLog::default()));
        let mut session = ChatSession::new(
            ScriptedTransport::new(vec![]),
            Box::new(FakeSpeech(log.clone())),
            quick_config(),
        );
        session.toggle_voice_capture().unwrap();
        drop(session);
        assert_eq!(log.lock().unwrap().aborted, 1);
    }

    #[test]
    fn rating_validates_target_and_range() {
        let mut session = session(vec![]);
        let pending = session.begin_submit("hi").unwrap();
        let bot_id = session.complete_submit(pending, Ok("hello".to_string())).id.clone();
        let user_id = session.messages()[1].id.clone();

        assert!(session.rate_message(&bot_id, 0).unwrap_err().is_validation());
        assert!(session.rate_message(&bot_id, 6).unwrap_err().is_validation());
        assert!(session.rate_message(&user_id, 4).unwrap_err().is_validation());
        assert!(session.rate_message("missing", 4).unwrap_err().is_validation());

        session.rate_message(&bot_id, 2).unwrap();
        session.rate_message(&bot_id, 5).unwrap();
        session.rate_message("welcome", 4).unwrap();
        assert_eq!(session.feedback().len(), 2);
        assert_eq!(session.feedback()[0].rating, 5);
        assert_eq!(session.summary().average_rating, Some(4.5));
    }

    #[test]
    fn filter_by_category() {
        let mut session = session(vec![]);
        for (question, answer) in [
            ("a", "Your course list"),
            ("b", "Reset your password"),
            ("c", "Another course"),
        ] {
            let pending = session.begin_submit(question).unwrap();
            session.complete_submit(pending, Ok(answer.to_string()));
        }
        assert_eq!(session.messages_in(CategoryFilter::All).len(), 7);
        assert_eq!(
            session
                .messages_in(CategoryFilter::Only(Category::Academic))
                .len(),
            2
        );
        assert_eq!(
            session.messages_in(CategoryFilter::Only(Category::User)).len(),
            3
        );
        let summary = session.summary();
        assert_eq!(summary.user_messages, 3);
        assert_eq!(summary.bot_messages, 4);
        assert_eq!(
            summary.categories,
            vec![
                (Category::Academic, 2),
                (Category::Technical, 1),
                (Category::General, 1)
            ]
        );
    }

    #[test]
    fn suggestions_follow_last_reply() {
        let mut session = session(vec![]);
        assert_eq!(session.suggestions()[0].category, Category::Personal);
        let pending = session.begin_submit("How do I reset my password?").unwrap();
        assert!(session.suggestions().is_empty());
        session.complete_submit(pending, Ok("Visit the password portal.".to_string()));
        let suggestions = session.suggestions();
        assert!(suggestions.iter().all(|s| s.category == Category::Technical));
        session.apply_suggestion(suggestions[0].text);
        assert_eq!(session.input(), "How do I reset my password?");
    }
}
