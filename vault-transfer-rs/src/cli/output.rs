//! Output formatting for CLI commands.

use crate::cli::args::OutputFormat;
use crate::error::Result;
use crate::host::Notifier;
use serde::Serialize;

/// Helper for formatting and printing output.
pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    /// Render a serializable value in the configured format.
    pub fn render<T: Serialize>(&self, value: &T) -> Result<String> {
        Ok(match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(value)?,
            OutputFormat::Yaml => serde_yaml::to_string(value)?,
            OutputFormat::Toml => toml::to_string_pretty(value)?,
        })
    }

    /// Print a serializable value in the configured format.
    pub fn print<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", self.render(value)?);
        Ok(())
    }

    /// Print a message if not in quiet mode.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", message);
        }
    }
}

impl Notifier for Output {
    fn notice(&self, message: &str) {
        self.info(message);
    }
}

/// Dry-run response showing where files would go.
#[derive(Debug, Serialize)]
pub struct DryRunResponse {
    pub action: String,
    pub source: String,
    pub destination: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<PlannedCopy>,
}

#[derive(Debug, Serialize)]
pub struct PlannedCopy {
    pub source: String,
    pub destination: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransferOutcome;

    #[test]
    fn test_render_formats() {
        let outcome = TransferOutcome::CopiedWithLink;

        let json = Output::new(OutputFormat::Json, false).render(&outcome).unwrap();
        assert_eq!(json, "{\n  \"outcome\": \"copied_with_link\"\n}");

        let yaml = Output::new(OutputFormat::Yaml, false).render(&outcome).unwrap();
        assert_eq!(yaml, "outcome: copied_with_link\n");

        let toml = Output::new(OutputFormat::Toml, false).render(&outcome).unwrap();
        assert_eq!(toml.trim(), "outcome = \"copied_with_link\"");
    }
}
