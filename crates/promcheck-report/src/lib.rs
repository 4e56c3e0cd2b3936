//! Result sinks for replay output.
//!
//! A [`Reporter`] receives one [`add_result`](Reporter::add_result) call per
//! (rule, series) evaluation and exactly one terminal
//! [`flush`](Reporter::flush) after all rules have been processed. The text
//! reporter streams each line immediately; the JSON and YAML reporters
//! buffer entries and serialize the whole batch at flush.

use anyhow::Result;
use promcheck_common::duration::format_duration;
use promcheck_common::rules::Rule;
use promcheck_common::types::{format_labels, AlertResult, AlertState};
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;

/// One row of the final report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub group: String,
    pub alert: String,
    /// The series' label set, Prometheus-formatted (`{}` for SILENT).
    pub metric: String,
    pub state: AlertState,
    pub duration_secs: i64,
    pub duration: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub annotations: HashMap<String, String>,
}

impl ReportEntry {
    fn new(group: &str, rule: &Rule, result: &AlertResult) -> Self {
        Self {
            group: group.to_string(),
            alert: rule.alert.clone(),
            metric: format_labels(&result.labels),
            state: result.state,
            duration_secs: result.elapsed.num_seconds(),
            duration: format_duration(result.elapsed),
            annotations: result.annotations.clone(),
        }
    }
}

/// A sink for evaluation results.
pub trait Reporter {
    fn add_result(&mut self, group: &str, rule: &Rule, result: &AlertResult);

    /// Called exactly once after all rules have been processed.
    fn flush(&mut self) -> Result<()>;
}

/// Output format selector for the reporter factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            _ => Err(format!("unknown output format: {s} (expected text, json, or yaml)")),
        }
    }
}

impl OutputFormat {
    /// Build the stdout-backed reporter for this format.
    pub fn create_reporter(self) -> Box<dyn Reporter> {
        match self {
            OutputFormat::Text => Box::new(TextReporter::new(std::io::stdout())),
            OutputFormat::Json => Box::new(JsonReporter::new(std::io::stdout())),
            OutputFormat::Yaml => Box::new(YamlReporter::new(std::io::stdout())),
        }
    }
}

/// Prints one line per result as it arrives.
pub struct TextReporter<W: Write> {
    out: W,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn add_result(&mut self, group: &str, rule: &Rule, result: &AlertResult) {
        let _ = match result.state {
            AlertState::Firing => writeln!(
                self.out,
                "🔥 FIRING  [{}/{}] {} (sustained {})",
                group,
                rule.alert,
                format_labels(&result.labels),
                format_duration(result.elapsed)
            ),
            AlertState::Pending => writeln!(
                self.out,
                "⚠ PENDING [{}/{}] {} (sustained {})",
                group,
                rule.alert,
                format_labels(&result.labels),
                format_duration(result.elapsed)
            ),
            AlertState::Silent => writeln!(
                self.out,
                "✓ SILENT  [{}/{}] (no series returned)",
                group, rule.alert
            ),
        };

        let mut annotations: Vec<_> = result.annotations.iter().collect();
        annotations.sort();
        for (name, value) in annotations {
            let _ = writeln!(self.out, "      - {name}: {value}");
        }
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Buffers entries and emits a pretty-printed JSON array at flush.
pub struct JsonReporter<W: Write> {
    out: W,
    entries: Vec<ReportEntry>,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            entries: Vec::new(),
        }
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn add_result(&mut self, group: &str, rule: &Rule, result: &AlertResult) {
        self.entries.push(ReportEntry::new(group, rule, result));
    }

    fn flush(&mut self) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, &self.entries)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Buffers entries and emits one YAML document at flush.
pub struct YamlReporter<W: Write> {
    out: W,
    entries: Vec<ReportEntry>,
}

impl<W: Write> YamlReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            entries: Vec::new(),
        }
    }
}

impl<W: Write> Reporter for YamlReporter<W> {
    fn add_result(&mut self, group: &str, rule: &Rule, result: &AlertResult) {
        self.entries.push(ReportEntry::new(group, rule, result));
    }

    fn flush(&mut self) -> Result<()> {
        serde_yaml::to_writer(&mut self.out, &self.entries)?;
        self.out.flush()?;
        Ok(())
    }
}
