//! Two-tier result extraction
//!
//! A terminal task carries either command output under
//! `task_result[<command>]` or error detail under `task_errors`. Extraction
//! tries the output first and otherwise surfaces the error detail, so a batch
//! over many hosts always yields something inspectable for every host.

use crate::types::{TaskOutcome, TaskResponse};
use serde_json::{Value, json};

/// Marker placed in the error payload of a task the poller gave up on
pub const TIMEOUT_MARKER: &str = "task_timeout";

/// Payload extracted from a terminal task
#[derive(Clone, Debug, PartialEq)]
pub enum Extracted {
    /// Command output
    Output(Value),
    /// Error detail, from the service or synthesized by the poller
    Errors(Value),
}

impl Extracted {
    /// Whether command output was found
    pub fn is_output(&self) -> bool {
        matches!(self, Extracted::Output(_))
    }

    /// Borrow the payload regardless of tier
    pub fn value(&self) -> &Value {
        match self {
            Extracted::Output(value) | Extracted::Errors(value) => value,
        }
    }

    /// Take the payload regardless of tier
    pub fn into_value(self) -> Value {
        match self {
            Extracted::Output(value) | Extracted::Errors(value) => value,
        }
    }
}

impl TaskResponse {
    /// Output for `command`, if the result holds it
    pub fn command_output(&self, command: &str) -> Option<&Value> {
        self.task_result.as_object()?.get(command)
    }
}

/// Extract the output for `command`, falling back to the task's error detail
pub fn extract_response(response: &TaskResponse, command: &str) -> Extracted {
    match response.command_output(command) {
        Some(output) => Extracted::Output(output.clone()),
        None => {
            tracing::debug!(
                task_id = %response.task_id,
                status = %response.task_status,
                command,
                "no output for command, surfacing task errors"
            );
            Extracted::Errors(response.task_errors.clone())
        }
    }
}

/// Extract from a batch outcome; a timed-out task yields the timeout marker
pub fn extract(outcome: &TaskOutcome, command: &str) -> Extracted {
    match outcome {
        TaskOutcome::Completed(response) => extract_response(response, command),
        TaskOutcome::TimedOut { waited } => Extracted::Errors(json!({
            "error": TIMEOUT_MARKER,
            "waited_secs": waited.as_secs_f64(),
        })),
    }
}
