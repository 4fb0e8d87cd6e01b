// src/session/driver.rs — Runs one session end to end
//
// The driver owns the loop: countdown ticks, the single in-flight relay call
// and user input are multiplexed with `tokio::select!`. A front end feeds
// `Input`s in and renders the `SessionEvent`s that come out.

use std::time::Duration;

use futures::future::BoxFuture;
use tokio::sync::mpsc;

use super::countdown::Countdown;
use super::{Session, SessionError, Tick, Turn};
use crate::core::cost::resolve_model;
use crate::relay::{ChatRelay, CompletionReply, RelayError};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Message(String),
    SetModel(String),
    Status,
    Leave,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The opening line that seeds the transcript.
    Started(Turn),
    TurnAppended(Turn),
    /// A relay call went out; input is refused until it settles.
    AwaitingReply,
    Tick {
        remaining_secs: u32,
    },
    InputRejected(SessionError),
    ModelChanged(String),
    Status {
        remaining_secs: u32,
        turns: usize,
        cost_summary: String,
    },
    Completed {
        transcript: Vec<Turn>,
    },
    /// `None` when feedback generation failed.
    Feedback(Option<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// Left early, or the input stream closed.
    Abandoned,
}

fn emit(events: &mpsc::UnboundedSender<SessionEvent>, event: SessionEvent) {
    // A front end that stopped listening does not stop the session.
    let _ = events.send(event);
}

async fn wait_for<T>(slot: &mut Option<BoxFuture<'_, T>>) -> T {
    match slot.as_mut() {
        Some(fut) => fut.await,
        None => std::future::pending().await,
    }
}

/// Start `session` and drive it until time runs out or the user leaves.
///
/// On expiry the outstanding relay call (if any) is dropped and one feedback
/// request is made over the full transcript. Its failure is not an error.
pub async fn run_session(
    session: &mut Session,
    relay: &dyn ChatRelay,
    mut input: mpsc::Receiver<Input>,
    events: mpsc::UnboundedSender<SessionEvent>,
) -> Result<Outcome, SessionError> {
    let opener = session.start()?.clone();
    emit(&events, SessionEvent::Started(opener));

    let mut countdown = Countdown::start(TICK_PERIOD);
    let mut in_flight: Option<BoxFuture<'_, Result<CompletionReply, RelayError>>> = None;

    loop {
        tokio::select! {
            _ = countdown.tick() => match session.tick() {
                Tick::Running { remaining_secs } => {
                    emit(&events, SessionEvent::Tick { remaining_secs });
                }
                Tick::Expired | Tick::Inactive => break,
            },

            result = wait_for(&mut in_flight) => {
                in_flight = None;
                match session.resolve_reply(result) {
                    Ok(turn) => emit(&events, SessionEvent::TurnAppended(turn.clone())),
                    Err(e) => tracing::debug!(session = %session.id(), "Reply discarded: {}", e),
                }
            }

            msg = input.recv() => match msg {
                Some(Input::Message(text)) => match session.submit(&text) {
                    Ok(request) => {
                        if let Some(turn) = session.turns().last() {
                            emit(&events, SessionEvent::TurnAppended(turn.clone()));
                        }
                        emit(&events, SessionEvent::AwaitingReply);
                        in_flight = Some(relay.complete(request));
                    }
                    Err(e) => emit(&events, SessionEvent::InputRejected(e)),
                },
                Some(Input::SetModel(name)) => {
                    let model = resolve_model(Some(&name));
                    match session.set_model(model) {
                        Ok(()) => emit(&events, SessionEvent::ModelChanged(model.to_string())),
                        Err(e) => emit(&events, SessionEvent::InputRejected(e)),
                    }
                }
                Some(Input::Status) => emit(
                    &events,
                    SessionEvent::Status {
                        remaining_secs: session.remaining_secs(),
                        turns: session.turns().len(),
                        cost_summary: session.costs().summary(),
                    },
                ),
                Some(Input::Leave) | None => {
                    tracing::info!(
                        session = %session.id(),
                        remaining = session.remaining_secs(),
                        "Session abandoned"
                    );
                    return Ok(Outcome::Abandoned);
                }
            },
        }
    }

    // Late replies are not appended.
    drop(in_flight);

    emit(
        &events,
        SessionEvent::Completed {
            transcript: session.turns().to_vec(),
        },
    );

    let feedback = match relay.feedback(session.feedback_request()).await {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::debug!(session = %session.id(), "Feedback unavailable: {}", e);
            None
        }
    };
    session.set_feedback(feedback.clone());
    emit(&events, SessionEvent::Feedback(feedback));

    Ok(Outcome::Completed)
}
