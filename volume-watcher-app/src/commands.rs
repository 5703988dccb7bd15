use thiserror::Error;

use volume_watcher_core::models::config::{validate_peak_threshold, validate_poll_interval};
use volume_watcher_core::WatchError;

pub const HELP: &str = "\
Commands:
  tp | toggle        start or pause the session watcher
  start | stop       start or pause explicitly
  ct <0.005-1.0>     change the peak volume threshold
  cr <5-1000>        change the polling rate in milliseconds
  cd [index]         list devices, or change to the device at index (watcher paused)
  sd                 save the current device as the default one
  tb                 toggle the beep after a session gets muted
  ta                 toggle starting the watcher automatically
  devices            list output devices
  status             show device, threshold, polling rate and state
  help               show this text
  exit | quit        stop the watcher and exit";

/// A line command typed at the console.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Toggle,
    Start,
    Stop,
    SetThreshold(f64),
    SetPollInterval(u32),
    ListDevices,
    ChangeDevice(usize),
    SaveDevice,
    ToggleBeep,
    ToggleAutoStart,
    Status,
    Help,
    Exit,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("\"{0}\" is not a command, type \"help\" for a list")]
    Unknown(String),

    #[error("\"{command}\" needs a value: {expected}")]
    MissingValue {
        command: &'static str,
        expected: &'static str,
    },

    #[error("\"{0}\" is not a valid number")]
    InvalidNumber(String),

    #[error(transparent)]
    OutOfRange(#[from] WatchError),
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();

    let command = match name.to_ascii_lowercase().as_str() {
        "tp" | "toggle" => Command::Toggle,
        "start" => Command::Start,
        "stop" | "pause" => Command::Stop,
        "ct" => {
            let value = require(arg, "ct", "a threshold between 0.005 and 1.0")?;
            let threshold = value
                .parse::<f64>()
                .map_err(|_| CommandError::InvalidNumber(value.to_string()))?;
            Command::SetThreshold(validate_peak_threshold(threshold)?)
        }
        "cr" => {
            let value = require(arg, "cr", "a polling rate between 5 and 1000")?;
            let ms = value
                .parse::<u32>()
                .map_err(|_| CommandError::InvalidNumber(value.to_string()))?;
            Command::SetPollInterval(validate_poll_interval(ms)?)
        }
        "cd" => match arg {
            None => Command::ListDevices,
            Some(value) => Command::ChangeDevice(
                value
                    .parse::<usize>()
                    .map_err(|_| CommandError::InvalidNumber(value.to_string()))?,
            ),
        },
        "devices" => Command::ListDevices,
        "sd" => Command::SaveDevice,
        "tb" => Command::ToggleBeep,
        "ta" => Command::ToggleAutoStart,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "exit" | "quit" => Command::Exit,
        _ => return Err(CommandError::Unknown(line.trim().to_string())),
    };
    Ok(Some(command))
}

fn require<'a>(
    arg: Option<&'a str>,
    command: &'static str,
    expected: &'static str,
) -> Result<&'a str, CommandError> {
    arg.ok_or(CommandError::MissingValue { command, expected })
}
