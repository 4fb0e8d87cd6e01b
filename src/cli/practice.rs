// src/cli/practice.rs — Terminal practice session

use std::io::{self, BufRead, Write};

use tokio::sync::mpsc;

use crate::core::cost::{display_name, resolve_model, SUPPORTED_MODELS};
use crate::infra::config::Config;
use crate::relay::{ChatRelay, HttpRelay, RelayService};
use crate::scenario::{self, Scenario};
use crate::session::driver::{run_session, Input, Outcome, SessionEvent};
use crate::session::{format_time, Session, SessionError, TurnRole, LOW_TIME_SECS};

/// Options from `interpersonal practice`.
pub struct PracticeOptions {
    pub scenario: String,
    pub model: Option<String>,
    pub server: Option<String>,
    pub duration: Option<u32>,
}

/// Run one session against the model, reading turns from stdin.
pub async fn run_practice(options: PracticeOptions, config: &Config) -> anyhow::Result<()> {
    let Some(scenario) = scenario::find(&options.scenario) else {
        let suggestions = scenario::suggest(&options.scenario);
        if suggestions.is_empty() {
            anyhow::bail!(
                "Unknown scenario '{}'. Run `interpersonal scenarios` to list them.",
                options.scenario
            );
        }
        anyhow::bail!(
            "Unknown scenario '{}'. Did you mean: {}?",
            options.scenario,
            suggestions.join(", ")
        );
    };

    let requested = options
        .model
        .as_deref()
        .unwrap_or(&config.simulation.default_model);
    let model = resolve_model(Some(requested));
    if model != requested {
        eprintln!("  Unknown model '{requested}', using {model}.");
    }
    let duration = options.duration.unwrap_or(config.simulation.duration_secs);
    if duration == 0 {
        anyhow::bail!("Session duration must be at least one second");
    }

    let relay: Box<dyn ChatRelay> = match options.server {
        Some(ref url) => Box::new(HttpRelay::new(url)?),
        None => {
            let service = RelayService::from_config(&config.upstream);
            if !service.is_configured() {
                anyhow::bail!(
                    "No API key found. Set {} or pass --server <relay URL>.",
                    config.upstream.api_key_env
                );
            }
            Box::new(service)
        }
    };

    print!("{}", render_card(scenario, model, duration));
    let mut lines = spawn_stdin_reader();
    prompt_line("Press Enter to begin (or /quit)... ");
    match lines.recv().await {
        Some(line) if line.trim() != "/quit" => {}
        _ => return Ok(()),
    }

    let mut session = Session::new(scenario, model, duration);
    let (input_tx, input_rx) = mpsc::channel(16);
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    tokio::spawn(forward_lines(lines, input_tx));

    let (outcome, ()) = tokio::join!(
        run_session(&mut session, relay.as_ref(), input_rx, event_tx),
        print_events(event_rx),
    );

    match outcome? {
        Outcome::Completed => {}
        Outcome::Abandoned => eprintln!("\n  Session ended early."),
    }
    eprintln!("  {}", session.costs().summary());
    Ok(())
}

fn render_card(scenario: &Scenario, model: &str, duration: u32) -> String {
    format!(
        "\n{}\n{} · {}\n\n{}\n\nYou have {} to talk it through with {}.\n\
         Commands: /time  /cost  /model <name>  /quit\n\n",
        scenario.title,
        scenario.category,
        scenario.difficulty,
        scenario.description,
        format_time(duration),
        display_name(model),
    )
}

fn prompt_line(text: &str) {
    print!("{text}");
    io::stdout().flush().ok();
}

/// Stdin is blocking; read it on its own thread and hand lines over.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

async fn forward_lines(mut lines: mpsc::Receiver<String>, input: mpsc::Sender<Input>) {
    while let Some(line) = lines.recv().await {
        match parse_line(&line) {
            Ok(Some(cmd)) => {
                let leaving = cmd == Input::Leave;
                if input.send(cmd).await.is_err() || leaving {
                    break;
                }
            }
            Ok(None) => {}
            Err(hint) => eprintln!("  {hint}"),
        }
    }
}

/// Map one line of user input to a session command.
///
/// Blank lines are ignored; unknown slash commands produce a hint.
fn parse_line(line: &str) -> Result<Option<Input>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if !trimmed.starts_with('/') {
        return Ok(Some(Input::Message(trimmed.to_string())));
    }

    let mut parts = trimmed.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let arg = parts.next().map(str::trim).unwrap_or("");
    match cmd {
        "/quit" | "/exit" => Ok(Some(Input::Leave)),
        "/time" | "/cost" | "/status" => Ok(Some(Input::Status)),
        "/model" if !arg.is_empty() => Ok(Some(Input::SetModel(arg.to_string()))),
        "/model" => Err(format!(
            "Usage: /model <name>  (available: {})",
            SUPPORTED_MODELS.join(", ")
        )),
        other => Err(format!(
            "Unknown command {other}. Try /time, /cost, /model <name> or /quit."
        )),
    }
}

async fn print_events(mut events: mpsc::UnboundedReceiver<SessionEvent>) {
    while let Some(event) = events.recv().await {
        if let Some(text) = render_event(&event) {
            println!("{text}");
        }
        let their_turn = match &event {
            SessionEvent::Started(_) => true,
            SessionEvent::TurnAppended(turn) => turn.role == TurnRole::Assistant,
            _ => false,
        };
        if their_turn {
            prompt_line("> ");
        }
    }
}

/// Whether the clock is worth showing at `remaining` seconds.
fn announces_time(remaining: u32) -> bool {
    remaining % 30 == 0 || remaining <= 10
}

fn render_event(event: &SessionEvent) -> Option<String> {
    match event {
        SessionEvent::Started(turn) => Some(format!("\nThem: {}", turn.content)),
        SessionEvent::TurnAppended(turn) => match turn.role {
            // Already on screen as typed.
            TurnRole::User => None,
            TurnRole::Assistant => Some(format!("\nThem: {}", turn.content)),
        },
        SessionEvent::AwaitingReply => None,
        SessionEvent::Tick { remaining_secs } if announces_time(*remaining_secs) => {
            let marker = if *remaining_secs < LOW_TIME_SECS { "!" } else { " " };
            Some(format!("\n  [{marker}{} left]", format_time(*remaining_secs)))
        }
        SessionEvent::Tick { .. } => None,
        SessionEvent::InputRejected(SessionError::Busy) => {
            Some("  Still waiting for a reply...".into())
        }
        SessionEvent::InputRejected(e) => Some(format!("  {e}")),
        SessionEvent::ModelChanged(model) => {
            Some(format!("  Switched to {}.", display_name(model)))
        }
        SessionEvent::Status {
            remaining_secs,
            turns,
            cost_summary,
        } => Some(format!(
            "  {} left · {} turns · {}",
            format_time(*remaining_secs),
            turns,
            cost_summary
        )),
        SessionEvent::Completed { transcript } => Some(format!(
            "\n\nTime's up. {} turns exchanged.",
            transcript.len()
        )),
        SessionEvent::Feedback(Some(text)) => Some(format!("\nReflection\n\n{text}\n")),
        SessionEvent::Feedback(None) => None,
    }
}
