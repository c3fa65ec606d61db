//! Operator commands for the interactive dashboard
//!
//! One command per input line: `play <id>`, `pause`, `stop`, `skip`,
//! `dismiss <n>`, `help`, `quit`.

use crate::dashboard::{DashboardHandle, DashboardState};
use mcc_common::models::TrackId;
use thiserror::Error;

pub const HELP: &str = "commands: play <id> | pause | stop | skip | dismiss <n> | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorCommand {
    Play(String),
    Pause,
    Stop,
    Skip,
    Dismiss(u64),
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty input")]
    Empty,
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("unknown command '{0}'")]
    Unknown(String),
}

pub fn parse_operator_command(line: &str) -> Result<OperatorCommand, ParseError> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Err(ParseError::Empty);
    };
    let argument = parts.next();

    match verb.to_ascii_lowercase().as_str() {
        "play" => argument
            .map(|id| OperatorCommand::Play(id.to_string()))
            .ok_or(ParseError::Usage("play <id>")),
        "pause" => Ok(OperatorCommand::Pause),
        "stop" => Ok(OperatorCommand::Stop),
        "skip" | "next" => Ok(OperatorCommand::Skip),
        "dismiss" => argument
            .and_then(|n| n.parse::<u64>().ok())
            .map(OperatorCommand::Dismiss)
            .ok_or(ParseError::Usage("dismiss <n>")),
        "help" | "?" => Ok(OperatorCommand::Help),
        "quit" | "exit" | "q" => Ok(OperatorCommand::Quit),
        other => Err(ParseError::Unknown(other.to_string())),
    }
}

/// Resolve operator input to a track identifier.
///
/// Listed items win, so a service using string ids like `"1"` still
/// receives its own identifier type back.
pub fn resolve_track_id(state: &DashboardState, raw: &str) -> TrackId {
    match state.find_track(raw) {
        Some(item) => item.id.clone(),
        None => match raw.parse::<TrackId>() {
            Ok(id) => id,
            Err(never) => match never {},
        },
    }
}

/// Forward a parsed command to the dashboard. Returns `false` on quit.
pub fn apply_operator_command(handle: &DashboardHandle, command: OperatorCommand) -> bool {
    match command {
        OperatorCommand::Play(raw) => handle.play(resolve_track_id(&handle.state(), &raw)),
        OperatorCommand::Pause => handle.pause(),
        OperatorCommand::Stop => handle.stop(),
        OperatorCommand::Skip => handle.skip(),
        OperatorCommand::Dismiss(id) => handle.dismiss(id),
        OperatorCommand::Help => println!("{}", HELP),
        OperatorCommand::Quit => return false,
    }
    true
}
