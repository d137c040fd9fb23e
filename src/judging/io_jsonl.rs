// A vote store kept in a local file, one submission per line.
//
// The same file serves as the history: the latest submission of a judge for
// a category is the one that counts.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use log::warn;
use serde_json::Value as JSValue;

use crate::judging::io_common::{read_records, transport_error};
use crate::judging::*;

pub struct JsonlStore {
    path: PathBuf,
}

impl JsonlStore {
    pub fn new(path: PathBuf) -> JsonlStore {
        JsonlStore { path }
    }

    fn append(&self, line: &str) -> JudgingResult<()> {
        let path = self.path.display().to_string();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .context(OpeningFileSnafu { path: path.clone() })?;
        writeln!(file, "{}", line).context(WritingFileSnafu { path })?;
        Ok(())
    }
}

impl SubmissionSink for JsonlStore {
    fn submit(&self, payload: &SubmissionPayload) -> Result<(), TransportError> {
        let line = serde_json::to_string(payload).map_err(|e| transport_error("encoding", e))?;
        self.append(&line)
            .map_err(|e| transport_error("submitting", e))?;
        info!(
            "submit: {} votes of {} for {:?} written to {:?}",
            payload.votes.len(),
            payload.judge_id,
            payload.category_name,
            self.path
        );
        Ok(())
    }
}

/// Reads the submissions of one judge from the lines of a store. Lines that
/// are not JSON objects are skipped.
pub fn history_from_lines(contents: &str, judge_id: &str) -> VoteHistory {
    let mut res = VoteHistory::new();
    for (idx, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let js: JSValue = match serde_json::from_str(line) {
            Ok(js) => js,
            Err(e) => {
                warn!("history_from_lines: line {}: skipping: {}", idx + 1, e);
                continue;
            }
        };
        if js["judgeId"].as_str() != Some(judge_id) {
            continue;
        }
        if let Some(cat_name) = js["category"].as_str() {
            res.insert(cat_name.to_string(), read_records(&js["votes"]));
        }
    }
    res
}

impl HistorySource for JsonlStore {
    fn fetch_history(&self, judge_id: &str) -> Result<VoteHistory, TransportError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            // Nothing was ever submitted.
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(VoteHistory::new()),
            Err(e) => {
                return Err(transport_error(
                    &format!("reading {}", self.path.display()),
                    e,
                ))
            }
        };
        Ok(history_from_lines(&contents, judge_id))
    }
}

/// Prints submissions instead of storing them.
pub struct Stdout;

impl SubmissionSink for Stdout {
    fn submit(&self, payload: &SubmissionPayload) -> Result<(), TransportError> {
        let js = serde_json::to_string_pretty(payload).map_err(|e| transport_error("encoding", e))?;
        println!("{}", js);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn payload(judge_id: &str, category: &str, first: &str) -> SubmissionPayload {
        let votes = [(first, Place::First), ("b", Place::Second), ("c", Place::Third)]
            .iter()
            .map(|(id, place)| VoteRecord {
                entry_id: id.to_string(),
                place: *place,
                title: String::new(),
                filmmaker: String::new(),
            })
            .collect();
        SubmissionPayload {
            judge_id: judge_id.to_string(),
            category_name: category.to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 18, 30, 0).unwrap(),
            votes,
        }
    }

    fn temp_store(name: &str) -> JsonlStore {
        let path = std::env::temp_dir().join(format!(
            "judgebox-{}-{}.jsonl",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        JsonlStore::new(path)
    }

    #[test]
    fn empty_store() {
        let store = temp_store("empty");
        assert!(store.fetch_history("judge1").unwrap().is_empty());
    }

    #[test]
    fn submissions_come_back_as_history() {
        let store = temp_store("roundtrip");
        store.submit(&payload("judge1", "Fire", "a")).unwrap();
        store.submit(&payload("judge2", "Fire", "x")).unwrap();
        store.submit(&payload("judge1", "Sports", "s")).unwrap();
        store.submit(&payload("judge1", "Fire", "z")).unwrap();

        let h = store.fetch_history("judge1").unwrap();
        assert_eq!(h.len(), 2);
        assert_eq!(h["Fire"][0], HistoryRecord::new("z", 1));
        assert_eq!(h["Fire"][2], HistoryRecord::new("c", 3));
        assert_eq!(h["Sports"][0], HistoryRecord::new("s", 1));

        let h2 = store.fetch_history("judge2").unwrap();
        assert_eq!(h2["Fire"][0], HistoryRecord::new("x", 1));
        assert!(store.fetch_history("judge3").unwrap().is_empty());
        let _ = fs::remove_file(&store.path);
    }

    #[test]
    fn broken_lines_are_skipped() {
        let contents = "{\"judgeId\":\"judge1\",\"category\":\"Fire\",\"votes\":[{\"entryId\":\"a\",\"place\":1}]}\nnot json\n\n{\"judgeId\":\"judge1\",\"votes\":[]}\n";
        let h = history_from_lines(contents, "judge1");
        assert_eq!(h.len(), 1);
        assert_eq!(h["Fire"], vec![HistoryRecord::new("a", 1)]);
    }
}
