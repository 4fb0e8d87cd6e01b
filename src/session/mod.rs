// src/session/mod.rs — Timed practice session state machine
//
// A session moves idle -> active -> complete. Complete is terminal.
// The transcript is append-only; every relay call sends all of it.

pub mod countdown;
pub mod driver;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::core::cost::CostTracker;
use crate::provider::Role;
use crate::relay::{CompletionReply, CompletionRequest, FeedbackRequest, RelayError};
use crate::scenario::Scenario;

/// Length of a practice session.
pub const DEFAULT_DURATION_SECS: u32 = 180;

/// Appended in place of a reply when the relay call fails.
pub const FALLBACK_REPLY: &str = "I'm having trouble responding right now. Could you try again?";

/// Remaining time under which front ends should warn the user.
pub const LOW_TIME_SECS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl From<TurnRole> for Role {
    fn from(role: TurnRole) -> Self {
        match role {
            TurnRole::User => Role::User,
            TurnRole::Assistant => Role::Assistant,
        }
    }
}

/// One message in the simulated conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionStatus {
    #[serde(rename = "not-started")]
    Idle,
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "complete")]
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session has already been started")]
    AlreadyStarted,
    #[error("session is not active")]
    NotActive,
    #[error("session has ended")]
    Ended,
    #[error("still waiting for a reply")]
    Busy,
    #[error("message is empty")]
    EmptyInput,
    #[error("no reply is pending")]
    NoPendingReply,
}

/// Result of advancing the countdown by one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Session is idle or already complete; nothing changed.
    Inactive,
    Running { remaining_secs: u32 },
    /// Time ran out on this tick. Returned once per session.
    Expired,
}

pub struct Session {
    id: String,
    scenario: &'static Scenario,
    model: String,
    duration_secs: u32,
    turns: Vec<Turn>,
    remaining_secs: u32,
    status: SessionStatus,
    awaiting_reply: bool,
    costs: CostTracker,
    feedback: Option<String>,
}

impl Session {
    /// Sessions last at least one second; a zero duration is raised to one.
    pub fn new(scenario: &'static Scenario, model: impl Into<String>, duration_secs: u32) -> Self {
        let duration_secs = duration_secs.max(1);
        Self {
            id: Uuid::new_v4().to_string(),
            scenario,
            model: model.into(),
            duration_secs,
            turns: Vec::new(),
            remaining_secs: duration_secs,
            status: SessionStatus::Idle,
            awaiting_reply: false,
            costs: CostTracker::new(),
            feedback: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn scenario(&self) -> &'static Scenario {
        self.scenario
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    pub fn costs(&self) -> &CostTracker {
        &self.costs
    }

    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    pub fn is_low_on_time(&self) -> bool {
        self.status == SessionStatus::Active && self.remaining_secs < LOW_TIME_SECS
    }

    /// Remaining time as `m:ss`.
    pub fn formatted_time(&self) -> String {
        format_time(self.remaining_secs)
    }

    /// idle -> active. Seeds the transcript with the scenario's opening line
    /// and resets the clock.
    pub fn start(&mut self) -> Result<&Turn, SessionError> {
        if self.status != SessionStatus::Idle {
            return Err(SessionError::AlreadyStarted);
        }
        self.status = SessionStatus::Active;
        self.remaining_secs = self.duration_secs;
        self.turns.clear();
        self.turns.push(Turn::assistant(self.scenario.opening_message));
        tracing::info!(
            session = %self.id,
            scenario = self.scenario.id,
            model = %self.model,
            "Session started ({}s)",
            self.duration_secs
        );
        Ok(&self.turns[0])
    }

    /// Append a user turn and build the relay request for it.
    ///
    /// The request's history is the transcript as it stood before this turn;
    /// the new text travels separately as `user_input`.
    pub fn submit(&mut self, input: &str) -> Result<CompletionRequest, SessionError> {
        match self.status {
            SessionStatus::Idle => return Err(SessionError::NotActive),
            SessionStatus::Complete => return Err(SessionError::Ended),
            SessionStatus::Active => {}
        }
        if self.awaiting_reply {
            return Err(SessionError::Busy);
        }
        let text = input.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyInput);
        }

        let request = CompletionRequest {
            scenario_id: self.scenario.id.to_string(),
            prompt: self.scenario.system_prompt.to_string(),
            user_input: text.to_string(),
            model: Some(self.model.clone()),
            conversation_history: self.turns.clone(),
        };
        self.turns.push(Turn::user(text));
        self.awaiting_reply = true;
        Ok(request)
    }

    /// Settle the pending relay call. Failures become [`FALLBACK_REPLY`].
    ///
    /// A reply that arrives after the session ended is dropped.
    pub fn resolve_reply(
        &mut self,
        result: Result<CompletionReply, RelayError>,
    ) -> Result<&Turn, SessionError> {
        if !self.awaiting_reply {
            return Err(SessionError::NoPendingReply);
        }
        self.awaiting_reply = false;
        if self.status != SessionStatus::Active {
            return Err(SessionError::Ended);
        }

        let turn = match result {
            Ok(reply) => {
                self.costs
                    .record_priced(&reply.model, &reply.usage, reply.cost);
                Turn::assistant(reply.response)
            }
            Err(e) => {
                tracing::warn!(session = %self.id, "Relay call failed: {}", e);
                Turn::assistant(FALLBACK_REPLY)
            }
        };
        self.turns.push(turn);
        Ok(&self.turns[self.turns.len() - 1])
    }

    /// Advance the clock by one second.
    pub fn tick(&mut self) -> Tick {
        if self.status != SessionStatus::Active {
            return Tick::Inactive;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return Tick::Running {
                remaining_secs: self.remaining_secs,
            };
        }
        self.status = SessionStatus::Complete;
        tracing::info!(
            session = %self.id,
            turns = self.turns.len(),
            "Session complete; {}",
            self.costs.summary()
        );
        Tick::Expired
    }

    /// Switch models for subsequent turns. Not allowed once complete.
    pub fn set_model(&mut self, model: impl Into<String>) -> Result<(), SessionError> {
        if self.status == SessionStatus::Complete {
            return Err(SessionError::Ended);
        }
        self.model = model.into();
        Ok(())
    }

    /// Request for the closing reflection, built from the full transcript.
    pub fn feedback_request(&self) -> FeedbackRequest {
        FeedbackRequest {
            scenario_id: self.scenario.id.to_string(),
            conversation: self.turns.clone(),
        }
    }

    pub fn set_feedback(&mut self, feedback: Option<String>) {
        self.feedback = feedback;
    }
}

/// Format seconds as `m:ss`.
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::errors::InterpersonalError;
    use crate::provider::TokenUsage;
    use crate::scenario;
    use pretty_assertions::assert_eq;

    fn session() -> Session {
        Session::new(scenario::find("rejection").unwrap(), "gpt-4o-mini", 5)
    }

    fn reply(text: &str) -> CompletionReply {
        CompletionReply {
            response: text.into(),
            model: "gpt-4o-mini".into(),
            usage: TokenUsage {
                input_tokens: 120,
                output_tokens: 30,
            },
            cost: 0.000_036,
        }
    }

    #[test]
    fn test_new_session_is_idle_and_empty() {
        let s = session();
        assert_eq!(s.status(), SessionStatus::Idle);
        assert!(s.turns().is_empty());
        assert_eq!(s.remaining_secs(), 5);
        assert!(!s.id().is_empty());
    }

    #[test]
    fn test_start_seeds_exactly_one_opening_turn_for_every_scenario() {
        for sc in scenario::all() {
            let mut s = Session::new(sc, "gpt-4o-mini", DEFAULT_DURATION_SECS);
            s.start().unwrap();
            assert_eq!(s.status(), SessionStatus::Active);
            assert_eq!(s.turns(), &[Turn::assistant(sc.opening_message)]);
            assert_eq!(s.remaining_secs(), DEFAULT_DURATION_SECS);
        }
    }

    #[test]
    fn test_start_twice_fails() {
        let mut s = session();
        s.start().unwrap();
        assert_eq!(s.start().unwrap_err(), SessionError::AlreadyStarted);
        assert_eq!(s.turns().len(), 1);
    }

    #[test]
    fn test_submit_before_start_rejected() {
        let mut s = session();
        assert_eq!(s.submit("hello").unwrap_err(), SessionError::NotActive);
    }

    #[test]
    fn test_submit_carries_prior_history() {
        let mut s = session();
        s.start().unwrap();
        let req = s.submit("  I'm flattered, but no.  ").unwrap();
        assert_eq!(req.scenario_id, "rejection");
        assert_eq!(req.user_input, "I'm flattered, but no.");
        assert_eq!(req.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(req.prompt, s.scenario().system_prompt);
        // History excludes the new turn.
        assert_eq!(req.conversation_history.len(), 1);
        assert_eq!(req.conversation_history[0].role, TurnRole::Assistant);
        assert_eq!(s.turns().len(), 2);
        assert_eq!(s.turns()[1], Turn::user("I'm flattered, but no."));
        assert!(s.is_awaiting_reply());
    }

    #[test]
    fn test_submit_empty_rejected_without_append() {
        let mut s = session();
        s.start().unwrap();
        assert_eq!(s.submit("   \n").unwrap_err(), SessionError::EmptyInput);
        assert_eq!(s.turns().len(), 1);
        assert!(!s.is_awaiting_reply());
    }

    #[test]
    fn test_single_request_in_flight() {
        let mut s = session();
        s.start().unwrap();
        s.submit("first").unwrap();
        assert_eq!(s.submit("second").unwrap_err(), SessionError::Busy);
        assert_eq!(s.turns().len(), 2);
    }

    #[test]
    fn test_successful_reply_appended_and_costed() {
        let mut s = session();
        s.start().unwrap();
        s.submit("No thank you.").unwrap();
        let turn = s.resolve_reply(Ok(reply("Oh. Okay."))).unwrap().clone();
        assert_eq!(turn, Turn::assistant("Oh. Okay."));
        assert_eq!(s.turns().len(), 3);
        assert!(!s.is_awaiting_reply());
        assert_eq!(s.costs().total_calls(), 1);
        assert_eq!(s.costs().total_tokens(), 150);
    }

    #[test]
    fn test_failed_reply_appends_fallback() {
        let mut s = session();
        s.start().unwrap();
        s.submit("No thank you.").unwrap();
        let err = RelayError::Service(InterpersonalError::Provider {
            provider: "openai".into(),
            message: "HTTP 503".into(),
        });
        let turn = s.resolve_reply(Err(err)).unwrap().clone();
        assert_eq!(turn, Turn::assistant(FALLBACK_REPLY));
        assert_eq!(s.status(), SessionStatus::Active);
        assert_eq!(s.costs().total_calls(), 0);
        // The user can try again right away.
        assert!(s.submit("Sorry, as I was saying...").is_ok());
    }

    #[test]
    fn test_resolve_without_pending_request() {
        let mut s = session();
        s.start().unwrap();
        assert_eq!(
            s.resolve_reply(Ok(reply("?"))).unwrap_err(),
            SessionError::NoPendingReply
        );
    }

    #[test]
    fn test_countdown_expires_exactly_once() {
        let mut s = session();
        assert_eq!(s.tick(), Tick::Inactive);
        s.start().unwrap();
        for expected in (1..5).rev() {
            assert_eq!(
                s.tick(),
                Tick::Running {
                    remaining_secs: expected
                }
            );
        }
        assert_eq!(s.tick(), Tick::Expired);
        assert_eq!(s.status(), SessionStatus::Complete);
        assert_eq!(s.remaining_secs(), 0);
        assert_eq!(s.tick(), Tick::Inactive);
        assert_eq!(s.tick(), Tick::Inactive);
    }

    #[test]
    fn test_zero_duration_lasts_one_tick() {
        let mut s = Session::new(scenario::find("rejection").unwrap(), "gpt-4o-mini", 0);
        assert_eq!(s.duration_secs(), 1);
        s.start().unwrap();
        assert_eq!(s.remaining_secs(), 1);
        assert_eq!(s.tick(), Tick::Expired);
        assert_eq!(s.status(), SessionStatus::Complete);
    }

    #[test]
    fn test_reply_after_expiry_dropped() {
        let mut s = session();
        s.start().unwrap();
        s.submit("Hi").unwrap();
        while s.tick() != Tick::Expired {}
        assert_eq!(
            s.resolve_reply(Ok(reply("late"))).unwrap_err(),
            SessionError::Ended
        );
        assert_eq!(s.turns().len(), 2);
        assert_eq!(s.submit("more").unwrap_err(), SessionError::Ended);
    }

    #[test]
    fn test_set_model_until_complete() {
        let mut s = session();
        s.set_model("gpt-4o").unwrap();
        s.start().unwrap();
        s.set_model("gpt-4-turbo").unwrap();
        assert_eq!(s.submit("hi").unwrap().model.as_deref(), Some("gpt-4-turbo"));
        while s.tick() != Tick::Expired {}
        assert_eq!(s.set_model("gpt-4o").unwrap_err(), SessionError::Ended);
    }

    #[test]
    fn test_feedback_request_uses_full_transcript() {
        let mut s = session();
        s.start().unwrap();
        s.submit("No.").unwrap();
        s.resolve_reply(Ok(reply("Okay."))).unwrap();
        let req = s.feedback_request();
        assert_eq!(req.scenario_id, "rejection");
        assert_eq!(req.conversation, s.turns().to_vec());
        s.set_feedback(Some("Well done.".into()));
        assert_eq!(s.feedback(), Some("Well done."));
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(180), "3:00");
        assert_eq!(format_time(65), "1:05");
        assert_eq!(format_time(9), "0:09");
        assert_eq!(format_time(0), "0:00");
    }

    #[test]
    fn test_low_on_time() {
        let mut s = Session::new(scenario::find("rejection").unwrap(), "gpt-4o-mini", 61);
        s.start().unwrap();
        assert!(!s.is_low_on_time());
        s.tick();
        s.tick();
        assert!(s.is_low_on_time());
        assert_eq!(s.formatted_time(), "0:59");
    }

    #[test]
    fn test_turn_serde_shape() {
        let json = serde_json::to_value(Turn::user("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "hi"}));
        let status = serde_json::to_value(SessionStatus::Idle).unwrap();
        assert_eq!(status, "not-started");
    }
}
