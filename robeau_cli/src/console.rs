//! The interactive console loop.
//!
//! The outer prompt waits for the start phrase, which opens a query window.
//! Every query is processed as user input and keeps the window open; the
//! window closes after a stretch of silence. The exit phrase ends the
//! program from either level, and so does a session whose background loop
//! stopped on a fatal error.

use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::time::Instant;
use tracing::{error, warn};

use robeau_core::{EngineEvent, EventReceiver, Session};
use robeau_graph::QuerySource;

use crate::config::SessionConfig;

type Input = Lines<BufReader<Stdin>>;

/// How a query window ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowEnd {
    TimedOut,
    Exit,
    Stopped,
}

/// Print engine events as they arrive.
pub async fn print_events(mut events: EventReceiver) {
    while let Some(event) = events.recv().await {
        match event {
            EngineEvent::Output { text } => println!("{text}"),
            EngineEvent::NotUnderstood { .. } => println!("Sorry, didn't understand that..."),
            EngineEvent::ExpectationsMet { .. } | EngineEvent::ExpectationsFailed { .. } => {}
        }
    }
}

fn prompt(label: &str) {
    print!("{label}");
    let _ = std::io::stdout().flush();
}

/// Run the outer loop until the exit phrase or end of input.
pub async fn run(session: &Session, config: &SessionConfig) -> Result<()> {
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt(&format!("{} or {}: ", config.start_phrase, config.exit_phrase));
        let line = tokio::select! {
            line = input.next_line() => line?,
            _ = session.stopped() => {
                error!("Background loop stopped, ending session");
                return Ok(());
            }
        };
        let Some(line) = line else {
            return Ok(());
        };
        let line = line.trim();

        if line.eq_ignore_ascii_case(&config.exit_phrase) {
            println!("Exiting...");
            return Ok(());
        }
        if line.eq_ignore_ascii_case(&config.start_phrase) {
            println!("\"{}\" detected. Listening for queries...", config.start_phrase);
            match listen_for_queries(session, config, &mut input).await? {
                WindowEnd::TimedOut => {}
                WindowEnd::Exit => {
                    println!("Exiting...");
                    return Ok(());
                }
                WindowEnd::Stopped => {
                    error!("Background loop stopped, ending session");
                    return Ok(());
                }
            }
        }
    }
}

async fn listen_for_queries(
    session: &Session,
    config: &SessionConfig,
    input: &mut Input,
) -> Result<WindowEnd> {
    let mut deadline = Instant::now() + config.query_window();

    loop {
        prompt("Query: ");
        let line = tokio::select! {
            line = tokio::time::timeout_at(deadline, input.next_line()) => match line {
                Err(_) => {
                    println!("\nRan out of time");
                    return Ok(WindowEnd::TimedOut);
                }
                Ok(line) => line?,
            },
            _ = session.stopped() => return Ok(WindowEnd::Stopped),
        };
        let Some(query) = line.map(|l| l.trim().to_string()) else {
            return Ok(WindowEnd::Exit);
        };

        if query.eq_ignore_ascii_case(&config.exit_phrase) {
            return Ok(WindowEnd::Exit);
        }
        if query.is_empty() {
            continue;
        }

        match session.process(query, QuerySource::User).await {
            Ok(_) => {}
            Err(err) if err.is_fatal() => {
                error!(%err, "Session failed");
                return Err(err.into());
            }
            Err(err) => warn!(%err, "Query processing stopped"),
        }
        deadline = Instant::now() + config.query_window();
    }
}
