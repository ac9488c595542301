use anyhow::{Context, Result};
use std::process::Command;

use super::SuggestionSource;

/// Runs an external program with the search text as its last argument and
/// reads one suggestion per line of stdout.
#[derive(Debug, Clone)]
pub struct CommandSource {
    program: String,
    args: Vec<String>,
}

impl CommandSource {
    /// Split a command line on whitespace. No shell quoting is applied.
    pub fn parse(command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace().map(String::from);
        let program = parts
            .next()
            .context("Suggestion command is empty")?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl SuggestionSource for CommandSource {
    fn name(&self) -> &str {
        &self.program
    }

    fn query(&self, text: &str) -> Result<Vec<String>> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .output()
            .with_context(|| format!("Failed to run {}", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("{} exited with {}: {}", self.program, output.status, stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let source = CommandSource::parse("  grep -i  ").unwrap();
        assert_eq!(source.program(), "grep");
        assert_eq!(source.args, vec!["-i"]);
        assert!(CommandSource::parse("   ").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_query_reads_stdout_lines() {
        let source = CommandSource::parse("echo alpha").unwrap();
        assert_eq!(source.query("beta").unwrap(), vec!["alpha beta"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command_is_error() {
        let source = CommandSource::parse("false").unwrap();
        assert!(source.query("x").is_err());
    }

    #[test]
    fn test_missing_program_is_error() {
        let source = CommandSource::parse("trellis-no-such-program").unwrap();
        assert!(source.query("x").is_err());
    }
}
