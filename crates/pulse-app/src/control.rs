//! Interactive control commands read from stdin.
//!
//! ```text
//! focus <SYMBOL>   focus an instrument (detail panel + alerts)
//! mute | unmute    toggle audible alerts
//! top              print the top movers summary
//! metrics          print Prometheus metrics
//! quit             stop the dashboard
//! ```

use crate::error::{AppError, AppResult};
use pulse_core::Symbol;
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// One user command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand {
    Focus(Symbol),
    Mute,
    Unmute,
    Top,
    Metrics,
    Quit,
}

impl FromStr for ControlCommand {
    type Err = AppError;

    fn from_str(line: &str) -> AppResult<Self> {
        let mut parts = line.split_whitespace();
        let verb = parts
            .next()
            .ok_or_else(|| AppError::Command("empty command".to_string()))?
            .to_ascii_lowercase();

        let command = match verb.as_str() {
            "focus" => {
                let raw = parts
                    .next()
                    .ok_or_else(|| AppError::Command("usage: focus <SYMBOL>".to_string()))?;
                Self::Focus(Symbol::new(raw)?)
            }
            "mute" => Self::Mute,
            "unmute" => Self::Unmute,
            "top" => Self::Top,
            "metrics" => Self::Metrics,
            "quit" | "exit" => Self::Quit,
            other => return Err(AppError::Command(format!("unknown command '{other}'"))),
        };

        if parts.next().is_some() {
            return Err(AppError::Command(format!("too many arguments for '{verb}'")));
        }
        Ok(command)
    }
}

/// Read commands from stdin until EOF or the receiver is dropped.
pub fn spawn_stdin_reader(tx: mpsc::Sender<ControlCommand>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => match line.parse::<ControlCommand>() {
                    Ok(command) => {
                        if tx.send(command).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!(error = %e, "Ignoring control input"),
                },
                Ok(None) => {
                    debug!("stdin closed");
                    break;
                }
                Err(e) => {
                    warn!(?e, "Failed to read stdin");
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            "focus ethusdt".parse::<ControlCommand>().unwrap(),
            ControlCommand::Focus(Symbol::new("ETHUSDT").unwrap())
        );
        assert_eq!("MUTE".parse::<ControlCommand>().unwrap(), ControlCommand::Mute);
        assert_eq!(
            " unmute ".parse::<ControlCommand>().unwrap(),
            ControlCommand::Unmute
        );
        assert_eq!("top".parse::<ControlCommand>().unwrap(), ControlCommand::Top);
        assert_eq!(
            "metrics".parse::<ControlCommand>().unwrap(),
            ControlCommand::Metrics
        );
        assert_eq!("exit".parse::<ControlCommand>().unwrap(), ControlCommand::Quit);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            "focus".parse::<ControlCommand>(),
            Err(AppError::Command(_))
        ));
        assert!(matches!(
            "focus BTC/USDT".parse::<ControlCommand>(),
            Err(AppError::Symbol(_))
        ));
        assert!("mute now".parse::<ControlCommand>().is_err());
        assert!("dance".parse::<ControlCommand>().is_err());
        assert!("".parse::<ControlCommand>().is_err());
    }
}
