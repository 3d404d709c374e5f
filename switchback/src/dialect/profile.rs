//! Per-dialect session and retrieval definition.

use regex::bytes::Regex;

/// Command used to pull the running configuration off a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalCommand {
    /// The command line sent to the device.
    pub command: String,

    /// Bare line that ends the output. When set, the read stops at this
    /// marker instead of at the next prompt.
    pub end_marker: Option<String>,
}

/// Everything switchback needs to know to talk to one command dialect.
///
/// Built with the `with_*` methods; each vendor module returns one.
#[derive(Debug, Clone)]
pub struct DialectProfile {
    /// Dialect name (e.g., "cisco_ios", "hp_comware", "autodetect").
    pub name: String,

    /// Pattern matching the CLI prompt at the end of the output.
    pub prompt: Regex,

    /// Pager prompt answered with a space while reading.
    pub pager: Option<Regex>,

    /// Commands run once after login to prepare the session.
    pub on_open_commands: Vec<String>,

    /// How to retrieve the running configuration.
    pub retrieval: RetrievalCommand,

    /// Keep only the `#` .. end-marker span of the retrieved output.
    pub extract_span: bool,

    /// Output fragments that mean the device rejected the command.
    pub failed_when_contains: Vec<String>,
}

impl DialectProfile {
    /// Create a profile with a prompt pattern and the default retrieval
    /// command (`display current-configuration` up to `return`).
    pub fn new(name: impl Into<String>, prompt: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            prompt: Regex::new(prompt)?,
            pager: None,
            on_open_commands: vec![],
            retrieval: RetrievalCommand {
                command: "display current-configuration".to_string(),
                end_marker: Some("return".to_string()),
            },
            extract_span: false,
            failed_when_contains: vec![],
        })
    }

    /// Set the pager prompt pattern.
    pub fn with_pager(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.pager = Some(Regex::new(pattern)?);
        Ok(self)
    }

    /// Add an on_open command.
    pub fn with_on_open_command(mut self, command: impl Into<String>) -> Self {
        self.on_open_commands.push(command.into());
        self
    }

    /// Retrieve the configuration with `command`, reading up to the prompt.
    pub fn with_retrieval(mut self, command: impl Into<String>) -> Self {
        self.retrieval = RetrievalCommand {
            command: command.into(),
            end_marker: None,
        };
        self
    }

    /// Retrieve the configuration with `command`, reading up to `end_marker`.
    pub fn with_retrieval_until(
        mut self,
        command: impl Into<String>,
        end_marker: impl Into<String>,
    ) -> Self {
        self.retrieval = RetrievalCommand {
            command: command.into(),
            end_marker: Some(end_marker.into()),
        };
        self
    }

    /// Enable `#` .. end-marker span extraction.
    pub fn with_span_extraction(mut self) -> Self {
        self.extract_span = true;
        self
    }

    /// Add a failure pattern.
    pub fn with_failure_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.failed_when_contains.push(pattern.into());
        self
    }

    /// Return the first failure pattern contained in `output`.
    pub fn detect_failure(&self, output: &str) -> Option<&str> {
        self.failed_when_contains
            .iter()
            .find(|pattern| output.contains(pattern.as_str()))
            .map(String::as_str)
    }

    /// Normalize raw command output.
    ///
    /// Line endings become `\n`, the echoed command line is dropped and so
    /// is a trailing prompt line.
    pub fn normalize_output(&self, raw: &str, command: &str) -> String {
        let text = raw.replace("\r\n", "\n").replace('\r', "");
        let mut lines: Vec<&str> = text.lines().collect();

        if let Some(pos) = lines.iter().position(|line| !line.trim().is_empty()) {
            if lines[pos].trim_end().ends_with(command) {
                lines.drain(..=pos);
            }
        }

        while lines.last().is_some_and(|line| line.trim().is_empty()) {
            lines.pop();
        }
        if lines
            .last()
            .is_some_and(|line| self.prompt.is_match(line.as_bytes()))
        {
            lines.pop();
        }
        while lines.last().is_some_and(|line| line.trim().is_empty()) {
            lines.pop();
        }

        lines.join("\n")
    }
}
