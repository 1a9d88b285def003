//! Local converter commands.
//!
//! Each file extension maps to an external tool that prints the document's
//! text on stdout. The upload is first written to a request-scoped
//! temporary file; the file is removed when the call returns, whatever the
//! outcome.

use std::collections::BTreeMap;
use std::io::Write;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::debug;

use docbinder_types::file_extension;

use crate::error::{ExtractResult, ExtractionError};
use crate::traits::TextExtractor;

/// Placeholder replaced by the temporary file path in converter arguments.
pub const PATH_PLACEHOLDER: &str = "{path}";

/// Stderr chatter some converters print on success.
pub const DEFAULT_STDERR_WHITELIST: [&str; 2] =
    ["Using ODF/OOXML parser.\n", "Using XLS parser.\n"];

/// One converter invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterCommand {
    /// Format name used in error messages ("Word", "Excel", ...)
    pub format: String,
    /// Executable
    pub program: String,
    /// Arguments; `{path}` is replaced by the input path, otherwise the
    /// path is appended as the last argument.
    #[serde(default)]
    pub args: Vec<String>,
}

impl ConverterCommand {
    pub fn new(format: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Final argument list for an input at `path`.
    pub fn arguments_for(&self, path: &str) -> Vec<String> {
        let mut substituted = false;
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|arg| {
                if arg.contains(PATH_PLACEHOLDER) {
                    substituted = true;
                    arg.replace(PATH_PLACEHOLDER, path)
                } else {
                    arg.clone()
                }
            })
            .collect();
        if !substituted {
            args.push(path.to_string());
        }
        args
    }
}

/// Default converter table, keyed by lowercase extension.
pub fn default_commands() -> BTreeMap<String, ConverterCommand> {
    let mut commands = BTreeMap::new();
    commands.insert("doc".into(), ConverterCommand::new("Word", "antiword"));
    commands.insert("xls".into(), ConverterCommand::new("Excel", "xls2csv"));
    commands.insert("ppt".into(), ConverterCommand::new("PowerPoint", "catppt"));
    commands.insert(
        "pdf".into(),
        ConverterCommand::new("PDF", "pdftotext").with_args(["-q", PATH_PLACEHOLDER, "-"]),
    );
    commands.insert("txt".into(), ConverterCommand::new("text", "cat"));
    commands
}

/// Extractor that shells out to per-format converters.
#[derive(Debug, Clone)]
pub struct CommandExtractor {
    commands: BTreeMap<String, ConverterCommand>,
    stderr_whitelist: Vec<String>,
}

impl Default for CommandExtractor {
    fn default() -> Self {
        Self::new(default_commands())
    }
}

impl CommandExtractor {
    /// Create an extractor with the given converter table and the default
    /// stderr whitelist.
    pub fn new(commands: BTreeMap<String, ConverterCommand>) -> Self {
        Self {
            commands: commands
                .into_iter()
                .map(|(ext, cmd)| (ext.trim_start_matches('.').to_lowercase(), cmd))
                .collect(),
            stderr_whitelist: DEFAULT_STDERR_WHITELIST
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Replace the stderr whitelist.
    pub fn with_stderr_whitelist(mut self, whitelist: Vec<String>) -> Self {
        self.stderr_whitelist = whitelist;
        self
    }

    /// Converter for a file name, if its extension is configured.
    pub fn command_for(&self, name: &str) -> Option<&ConverterCommand> {
        file_extension(name).and_then(|ext| self.commands.get(&ext))
    }

    fn stderr_is_benign(&self, stderr: &str) -> bool {
        stderr.is_empty() || self.stderr_whitelist.iter().any(|w| w == stderr)
    }
}

#[async_trait]
impl TextExtractor for CommandExtractor {
    async fn extract(&self, name: &str, content: &[u8]) -> ExtractResult<String> {
        let command = self
            .command_for(name)
            .ok_or_else(|| ExtractionError::UnsupportedFormat {
                name: name.to_string(),
            })?;
        let format = command.format.as_str();

        let suffix = file_extension(name)
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();
        let mut tmp = tempfile::Builder::new()
            .prefix("docbinder-")
            .suffix(&suffix)
            .tempfile()
            .map_err(|e| ExtractionError::conversion(format, e.to_string()))?;
        tmp.write_all(content)
            .and_then(|_| tmp.flush())
            .map_err(|e| ExtractionError::conversion(format, e.to_string()))?;

        let path = tmp.path().to_string_lossy().into_owned();
        let args = command.arguments_for(&path);
        debug!(program = %command.program, file = %name, "Running converter");

        let output = Command::new(&command.program)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                ExtractionError::conversion(format, format!("{} {:?}: {}", command.program, args, e))
            })?;

        // tmp is dropped (and the file removed) when this function returns
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !self.stderr_is_benign(&stderr) {
            return Err(ExtractionError::conversion(format, stderr.into_owned()));
        }
        if !output.status.success() {
            return Err(ExtractionError::conversion(
                format,
                format!("{} exited with {}", command.program, output.status),
            ));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(file = %name, chars = text.len(), "Extracted text");
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "command"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arguments_placeholder() {
        let cmd = ConverterCommand::new("PDF", "pdftotext").with_args(["-q", "{path}", "-"]);
        assert_eq!(cmd.arguments_for("/tmp/x.pdf"), vec!["-q", "/tmp/x.pdf", "-"]);
    }

    #[test]
    fn test_arguments_appended() {
        let cmd = ConverterCommand::new("Word", "antiword").with_args(["-w", "0"]);
        assert_eq!(cmd.arguments_for("/tmp/x.doc"), vec!["-w", "0", "/tmp/x.doc"]);
    }

    #[test]
    fn test_command_lookup_case_insensitive() {
        let extractor = CommandExtractor::default();
        assert_eq!(extractor.command_for("Report.DOC").unwrap().format, "Word");
        assert!(extractor.command_for("boink.png").is_none());
        assert!(extractor.command_for("README").is_none());
    }

    #[test]
    fn test_table_keys_normalized() {
        let mut table = BTreeMap::new();
        table.insert(".TXT".to_string(), ConverterCommand::new("text", "cat"));
        let extractor = CommandExtractor::new(table);
        assert!(extractor.command_for("a.txt").is_some());
    }

    #[test]
    fn test_stderr_whitelist() {
        let extractor = CommandExtractor::default();
        assert!(extractor.stderr_is_benign(""));
        assert!(extractor.stderr_is_benign("Using XLS parser.\n"));
        assert!(!extractor.stderr_is_benign("Using XLS parser."));
        assert!(!extractor.stderr_is_benign("corrupt file\n"));
    }
}
