//! A terminal client for the support chat.

#[macro_use]
extern crate tracing;

use std::env;
use std::io::Write as _;
use std::str::FromStr;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use support_chat::core::config::DEFAULT_FALLBACK_TIMEOUT;
use support_chat::core::conversation::{Message, Role};
use support_chat::core::{CoordinatorConfigBuilder, SubmitError};
use support_chat::input::LineReader;
use support_chat::render::message_line;
use support_chat::{Session, SessionBuilder};
use support_chat_http_provider::{
    DEFAULT_REQUEST_TIMEOUT, HttpConfigBuilder, HttpProvider,
};
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::sleep;

enum SessionEvent {
    Idle,
    Message(Message),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let Ok(endpoint) = env::var("SUPPORT_CHAT_ENDPOINT") else {
        eprintln!("SUPPORT_CHAT_ENDPOINT environment variable is not set");
        return;
    };
    let Some(request_timeout) = secs_from_env(
        "SUPPORT_CHAT_REQUEST_TIMEOUT_SECS",
        DEFAULT_REQUEST_TIMEOUT,
    ) else {
        return;
    };
    let Some(fallback_timeout) = secs_from_env(
        "SUPPORT_CHAT_FALLBACK_TIMEOUT_SECS",
        DEFAULT_FALLBACK_TIMEOUT,
    ) else {
        return;
    };

    let http_config = HttpConfigBuilder::with_endpoint(endpoint)
        .with_request_timeout(request_timeout)
        .build();
    let provider = match HttpProvider::new(http_config) {
        Ok(provider) => provider,
        Err(err) => {
            eprintln!("failed to set up the HTTP client: {err}");
            return;
        }
    };

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let session = SessionBuilder::with_reply_provider(provider)
        .with_config(
            CoordinatorConfigBuilder::new()
                .with_fallback_timeout(fallback_timeout)
                .build(),
        )
        .on_idle({
            let event_tx = event_tx.clone();
            move || {
                event_tx.send(SessionEvent::Idle).ok();
            }
        })
        .on_message({
            let event_tx = event_tx.clone();
            move |message| {
                event_tx.send(SessionEvent::Message(message.clone())).ok();
            }
        })
        .build();
    let session = match session {
        Ok(session) => session,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return;
        }
    };

    match session.transcript().await {
        Ok(messages) => {
            for message in &messages {
                println!("{}", message_line(message, true));
            }
        }
        Err(err) => {
            error!("failed to read the transcript: {err}");
            return;
        }
    }

    let Ok(progress_style) =
        ProgressStyle::with_template("{spinner} {wide_msg}")
    else {
        return;
    };
    let progress_style = progress_style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    let mut input = LineReader::stdin();

    'outer: loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = input.read_line().await else {
            break;
        };
        match line.trim() {
            "/quit" => break,
            "/history" => {
                print_history(&session).await;
                continue;
            }
            _ => {}
        }

        match session.send_message(&line).await {
            Ok(dispatch) => debug!("submitted as {dispatch}"),
            Err(SubmitError::EmptyInput) => continue,
            Err(SubmitError::Busy) => {
                println!("{}", "Still waiting for the last reply.".yellow());
                continue;
            }
            Err(SubmitError::Closed) => break,
        }

        let mut progress_bar = None;

        loop {
            // Create a new progress bar if it has been finished.
            progress_bar
                .get_or_insert_with(|| {
                    let progress_bar = ProgressBar::new_spinner();
                    progress_bar.set_style(progress_style.clone());
                    progress_bar.set_message("Waiting for support...");
                    progress_bar
                })
                .inc(1);

            let sleep = sleep(Duration::from_millis(100));
            let event = select! {
                event = event_rx.recv() => {
                    let Some(event) = event else {
                        break 'outer;
                    };
                    event
                },
                _ = sleep => {
                    continue;
                }
            };

            // Finish the progress bar before printing anything else.
            if let Some(progress_bar) = &progress_bar {
                progress_bar.finish_and_clear();
            }
            progress_bar = None;

            match event {
                // The user's own line is already on screen.
                SessionEvent::Message(message)
                    if message.role() == Role::Requester => {}
                SessionEvent::Message(message) => {
                    println!("{}", message_line(&message, true));
                }
                SessionEvent::Idle => {
                    break;
                }
            }
        }
    }
}

async fn print_history(session: &Session) {
    let messages = match session.transcript().await {
        Ok(messages) => messages,
        Err(err) => {
            error!("failed to read the transcript: {err}");
            return;
        }
    };
    match serde_json::to_string_pretty(&messages) {
        Ok(json) => println!("{json}"),
        Err(err) => error!("failed to serialize the transcript: {err}"),
    }
}

fn secs_from_env(name: &str, default: Duration) -> Option<Duration> {
    let Ok(value) = env::var(name) else {
        return Some(default);
    };
    match u64::from_str(value.trim()) {
        Ok(secs) => Some(Duration::from_secs(secs)),
        Err(err) => {
            eprintln!("{name} must be a whole number of seconds: {err}");
            None
        }
    }
}
