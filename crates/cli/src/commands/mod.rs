pub mod browse;
pub mod config;
pub mod doctor;
pub mod list;

use serde::Serialize;
use serde_json::{json, Value};

/// What a subcommand hands back to `main`: the process exit code and the
/// text to print on stdout.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum OutcomeStatus {
    Ok,
    Error,
}

/// JSON envelope for commands without a report of their own.
#[derive(Debug, Serialize)]
struct CommandOutcome<'a> {
    command: &'a str,
    status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_class: Option<&'a str>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl CommandResult {
    /// Success carrying command-specific data under `details`.
    pub fn success_with_details<D: Serialize>(
        command: &str,
        message: impl Into<String>,
        details: &D,
    ) -> Self {
        match serde_json::to_value(details) {
            Ok(details) => Self::outcome(
                0,
                CommandOutcome {
                    command,
                    status: OutcomeStatus::Ok,
                    error_class: None,
                    message: message.into(),
                    details: Some(details),
                },
            ),
            Err(error) => Self::failure(command, "serialization", error.to_string(), 4),
        }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        Self::outcome(
            exit_code,
            CommandOutcome {
                command,
                status: OutcomeStatus::Error,
                error_class: Some(error_class),
                message: message.into(),
                details: None,
            },
        )
    }

    fn outcome(exit_code: u8, outcome: CommandOutcome<'_>) -> Self {
        let output = serde_json::to_string(&outcome).unwrap_or_else(|error| {
            json!({
                "command": outcome.command,
                "status": OutcomeStatus::Error,
                "error_class": "serialization",
                "message": error.to_string(),
            })
            .to_string()
        });
        Self { exit_code, output }
    }
}
