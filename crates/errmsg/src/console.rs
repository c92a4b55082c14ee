use std::collections::VecDeque;

use tracing::{error, info, warn};

use crate::message::Severity;
use crate::services::ConsoleSink;

pub const MAX_OUTPUT_LINES: usize = 256;
const WARNING_PREFIX: &str = "WARNING: ";
const ERROR_PREFIX: &str = "ERROR: ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    pub severity: Severity,
    pub text: String,
}

/// Console output buffer for reported errors, newest last.
#[derive(Debug, Default)]
pub struct ConsoleLog {
    output_lines: VecDeque<ConsoleLine>,
}

impl ConsoleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_lines(&self) -> impl Iterator<Item = &ConsoleLine> {
        self.output_lines.iter()
    }

    pub fn last(&self) -> Option<&ConsoleLine> {
        self.output_lines.back()
    }

    pub fn len(&self) -> usize {
        self.output_lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.output_lines.is_empty()
    }

    pub fn drain_lines_into(&mut self, out: &mut Vec<ConsoleLine>) {
        out.extend(self.output_lines.drain(..));
    }
}

impl ConsoleSink for ConsoleLog {
    fn print(&mut self, severity: Severity, line: &str) {
        let text = match severity {
            Severity::Info => {
                info!(line, "console_info");
                line.to_string()
            }
            Severity::Warning => {
                warn!(line, "console_warning");
                format!("{WARNING_PREFIX}{line}")
            }
            Severity::Critical => {
                error!(line, "console_error");
                format!("{ERROR_PREFIX}{line}")
            }
        };
        push_bounded(
            &mut self.output_lines,
            ConsoleLine { severity, text },
            MAX_OUTPUT_LINES,
        );
    }
}

fn push_bounded(queue: &mut VecDeque<ConsoleLine>, value: ConsoleLine, max_len: usize) {
    if queue.len() == max_len {
        queue.pop_front();
    }
    queue.push_back(value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_selects_prefix() {
        let mut console = ConsoleLog::new();
        console.print(Severity::Warning, "Too close to edge of map");
        console.print(Severity::Critical, "Out of money");

        let lines: Vec<&str> = console.output_lines().map(|l| l.text.as_str()).collect();
        assert_eq!(
            lines,
            vec!["WARNING: Too close to edge of map", "ERROR: Out of money"]
        );
        assert_eq!(
            console.last().map(|line| line.severity),
            Some(Severity::Critical)
        );
    }

    #[test]
    fn info_lines_are_unprefixed() {
        let mut console = ConsoleLog::new();
        console.print(Severity::Info, "autosaving");
        assert_eq!(
            console.last().map(|line| line.text.as_str()),
            Some("autosaving")
        );
    }

    #[test]
    fn buffer_drops_oldest_lines() {
        let mut console = ConsoleLog::new();
        for idx in 0..(MAX_OUTPUT_LINES + 2) {
            console.print(Severity::Warning, &format!("w{idx}"));
        }
        assert_eq!(console.len(), MAX_OUTPUT_LINES);
        assert_eq!(
            console.output_lines().next().map(|line| line.text.as_str()),
            Some("WARNING: w2")
        );
    }

    #[test]
    fn drain_empties_buffer() {
        let mut console = ConsoleLog::new();
        console.print(Severity::Warning, "one");
        console.print(Severity::Critical, "two");

        let mut drained = Vec::new();
        console.drain_lines_into(&mut drained);

        assert_eq!(drained.len(), 2);
        assert!(console.is_empty());
    }
}
