use crate::judging::*;

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;

/// Where a collaborator gets or puts its data.
///
/// Providers: `csv`, `xlsx`, `placeholder` and `http` for the table,
/// `jsonl`, `none` and `http` for the history, `jsonl`, `stdout` and `http`
/// for submissions.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub provider: String,
    pub path: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct JudgingConfig {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    /// Judge id -> access code. A code may be stored as `sha256:<hex digest>`.
    pub judges: BTreeMap<String, String>,
    #[serde(rename = "tableSource")]
    pub table_source: SourceConfig,
    #[serde(rename = "historySource")]
    pub history_source: Option<SourceConfig>,
    #[serde(rename = "submissionSink")]
    pub submission_sink: SourceConfig,
}

pub fn read_config(path: &str) -> JudgingResult<JudgingConfig> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let config: JudgingConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!(
        "read_config: contest {:?}, {} judges",
        config.contest_name,
        config.judges.len()
    );
    Ok(config)
}

const SHA256_PREFIX: &str = "sha256:";

/// The judges and their access codes, as listed in the configuration.
pub struct StaticCredentials {
    codes: BTreeMap<String, String>,
}

impl StaticCredentials {
    pub fn new(codes: &BTreeMap<String, String>) -> StaticCredentials {
        StaticCredentials {
            codes: codes.clone(),
        }
    }
}

impl IdentityCheck for StaticCredentials {
    fn authenticate(&self, judge_id: &str, code: &str) -> bool {
        match self.codes.get(judge_id) {
            Some(stored) => match stored.strip_prefix(SHA256_PREFIX) {
                Some(digest) => sha256::digest(code) == digest.to_lowercase(),
                None => stored == code,
            },
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "contestName": "Photojournalism Awards 2026",
        "judges": { "judge1": "alpha", "judge2": "beta" },
        "tableSource": { "provider": "xlsx", "path": "entries.xlsx", "excelWorksheetName": "Entries" },
        "submissionSink": { "provider": "jsonl", "path": "votes.jsonl" }
    }"#;

    #[test]
    fn parses_config() {
        let config: JudgingConfig = serde_json::from_str(CONFIG).unwrap();
        assert_eq!(config.contest_name, "Photojournalism Awards 2026");
        assert_eq!(config.judges.len(), 2);
        assert_eq!(config.table_source.provider, "xlsx");
        assert_eq!(
            config.table_source.excel_worksheet_name.as_deref(),
            Some("Entries")
        );
        assert_eq!(config.table_source.url, None);
        assert!(config.history_source.is_none());
        assert_eq!(config.submission_sink.path.as_deref(), Some("votes.jsonl"));
    }

    #[test]
    fn plain_codes() {
        let config: JudgingConfig = serde_json::from_str(CONFIG).unwrap();
        let creds = StaticCredentials::new(&config.judges);
        assert!(creds.authenticate("judge1", "alpha"));
        assert!(!creds.authenticate("judge1", "beta"));
        assert!(!creds.authenticate("judge3", "alpha"));
        assert!(!creds.authenticate("judge3", ""));
    }

    #[test]
    fn hashed_codes() {
        let mut codes = BTreeMap::new();
        codes.insert(
            "judge4".to_string(),
            format!("{}{}", SHA256_PREFIX, sha256::digest("delta").to_uppercase()),
        );
        let creds = StaticCredentials::new(&codes);
        assert!(creds.authenticate("judge4", "delta"));
        assert!(!creds.authenticate("judge4", "gamma"));
        assert!(!creds.authenticate("judge4", "sha256:delta"));
    }
}
