//! Prometheus alerting rule file schema.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Top level of a Prometheus rule file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleFile {
    #[serde(default)]
    pub groups: Vec<RuleGroup>,
}

/// A named group of alerting rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleGroup {
    pub name: String,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// A single alerting rule definition. Parsed once per run, never mutated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Rule {
    pub alert: String,
    pub expr: String,
    /// Minimum sustain duration before PENDING becomes FIRING, as written in
    /// the rule file (`"5m"`). Empty means instant-fire.
    #[serde(rename = "for", default)]
    pub for_: String,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub annotations: HashMap<String, String>,
}

/// Errors while loading a rule file.
#[derive(Debug, thiserror::Error)]
pub enum RuleFileError {
    #[error("failed to read rule file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rule file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

impl RuleFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RuleFileError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| RuleFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_yaml::from_str(&data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
groups:
  - name: node
    rules:
      - alert: HighCpu
        expr: node_cpu_usage > 0.9
        for: 5m
        labels:
          severity: critical
        annotations:
          summary: "{{ $labels.instance }} CPU at {{ $value }}"
      - alert: InstanceDown
        expr: up == 0
"#;

    #[test]
    fn parses_rule_file_with_defaults() {
        let file: RuleFile = serde_yaml::from_str(SAMPLE).unwrap();
        assert_eq!(file.groups.len(), 1);
        let group = &file.groups[0];
        assert_eq!(group.name, "node");
        assert_eq!(group.rules.len(), 2);

        let high_cpu = &group.rules[0];
        assert_eq!(high_cpu.alert, "HighCpu");
        assert_eq!(high_cpu.for_, "5m");
        assert_eq!(high_cpu.labels.get("severity").unwrap(), "critical");
        assert!(high_cpu.annotations.contains_key("summary"));

        // "for", labels and annotations are all optional.
        let down = &group.rules[1];
        assert_eq!(down.for_, "");
        assert!(down.labels.is_empty());
        assert!(down.annotations.is_empty());
    }

    #[test]
    fn load_reads_from_disk() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(SAMPLE.as_bytes()).unwrap();

        let file = RuleFile::load(tmp.path()).unwrap();
        assert_eq!(file.groups[0].rules.len(), 2);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = RuleFile::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, RuleFileError::Io { .. }));
    }

    #[test]
    fn load_garbage_is_parse_error() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"groups: [ { name: x, rules: [ { alert: 1, expr: [ } ] } ]")
            .unwrap();

        let err = RuleFile::load(tmp.path()).unwrap_err();
        assert!(matches!(err, RuleFileError::Parse(_)));
    }
}
