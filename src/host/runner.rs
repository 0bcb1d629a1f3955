//! Runner that records every registered message and mirrors it to tracing.

use std::fmt;
use tracing::{error, info, warn};

use super::Runner;
use crate::output as out;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub severity: Severity,
    pub text: String,
}

/// Final status of a measure run. An error anywhere makes the run fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunStatus {
    #[default]
    Success,
    Fail,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RunStatus::Success => "Success",
            RunStatus::Fail => "Fail",
        })
    }
}

#[derive(Debug, Default)]
pub struct RecordingRunner {
    messages: Vec<Message>,
    final_condition: Option<String>,
    status: RunStatus,
    echo: bool,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also print warnings/errors/final condition to the terminal.
    pub fn echoing() -> Self {
        Self {
            echo: true,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn texts(&self, severity: Severity) -> impl Iterator<Item = &str> {
        self.messages
            .iter()
            .filter(move |m| m.severity == severity)
            .map(|m| m.text.as_str())
    }

    pub fn errors(&self) -> Vec<&str> {
        self.texts(Severity::Error).collect()
    }

    pub fn warnings(&self) -> Vec<&str> {
        self.texts(Severity::Warning).collect()
    }

    pub fn infos(&self) -> Vec<&str> {
        self.texts(Severity::Info).collect()
    }

    pub fn final_condition(&self) -> Option<&str> {
        self.final_condition.as_deref()
    }

    fn push(&mut self, severity: Severity, text: &str) {
        self.messages.push(Message {
            severity,
            text: text.to_string(),
        });
    }
}

impl Runner for RecordingRunner {
    fn register_info(&mut self, msg: &str) {
        info!(target: "osm_export::measure", "{msg}");
        self.push(Severity::Info, msg);
    }

    fn register_warning(&mut self, msg: &str) {
        warn!(target: "osm_export::measure", "{msg}");
        if self.echo {
            out::print_warn(msg);
        }
        self.push(Severity::Warning, msg);
    }

    fn register_error(&mut self, msg: &str) {
        error!(target: "osm_export::measure", "{msg}");
        if self.echo {
            out::print_error(msg);
        }
        self.status = RunStatus::Fail;
        self.push(Severity::Error, msg);
    }

    fn register_final_condition(&mut self, msg: &str) {
        info!(target: "osm_export::measure", final_condition = true, "{msg}");
        if self.echo {
            out::print_success(msg);
        }
        self.final_condition = Some(msg.to_string());
    }

    fn status(&self) -> RunStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_fails_the_run() {
        let mut r = RecordingRunner::new();
        r.register_info("a");
        r.register_warning("b");
        assert_eq!(r.status(), RunStatus::Success);
        r.register_error("c");
        assert_eq!(r.status(), RunStatus::Fail);
        assert_eq!(r.infos(), vec!["a"]);
        assert_eq!(r.warnings(), vec!["b"]);
        assert_eq!(r.errors(), vec!["c"]);
        assert_eq!(r.messages().len(), 3);
    }
}
