// Remote table and vote store over HTTP.

use std::time::Duration;

use log::warn;
use serde_json::Value as JSValue;

use crate::judging::io_common::{history_from_json, transport_error};
use crate::judging::*;

fn make_client() -> JudgingResult<reqwest::blocking::Client> {
    let client = reqwest::blocking::Client::builder()
        .connect_timeout(Duration::from_secs(15))
        .timeout(Duration::from_secs(60))
        .build()
        .whatever_context("could not initialize the HTTP client")?;
    Ok(client)
}

/// A published CSV export of the contest table.
pub struct HttpTable {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpTable {
    pub fn new(url: String) -> JudgingResult<HttpTable> {
        Ok(HttpTable {
            url,
            client: make_client()?,
        })
    }
}

impl TableSource for HttpTable {
    fn fetch_table(&self) -> Result<String, TransportError> {
        debug!("fetch_table: GET {}", self.url);
        self.client
            .get(&self.url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(|e| transport_error("fetching the contest table", e))
    }
}

/// A remote store: GET returns the history of a judge, POST records a
/// submission.
pub struct HttpStore {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpStore {
    pub fn new(url: String) -> JudgingResult<HttpStore> {
        Ok(HttpStore {
            url,
            client: make_client()?,
        })
    }
}

/// The store answers `{"status": "success", "votes": {...}}`. Any other
/// answer means the store has no votes for this judge.
fn history_from_response(js: &JSValue) -> VoteHistory {
    match js["status"].as_str() {
        Some("success") => history_from_json(&js["votes"]),
        other => {
            warn!(
                "history_from_response: status {:?}, no previous votes",
                other
            );
            VoteHistory::new()
        }
    }
}

impl HistorySource for HttpStore {
    fn fetch_history(&self, judge_id: &str) -> Result<VoteHistory, TransportError> {
        debug!("fetch_history: GET {} for {:?}", self.url, judge_id);
        let js: JSValue = self
            .client
            .get(&self.url)
            .query(&[("judgeId", judge_id)])
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json())
            .map_err(|e| transport_error("fetching the vote history", e))?;
        Ok(history_from_response(&js))
    }
}

impl SubmissionSink for HttpStore {
    fn submit(&self, payload: &SubmissionPayload) -> Result<(), TransportError> {
        debug!("submit: POST {} for {:?}", self.url, payload.category_name);
        self.client
            .post(&self.url)
            .json(payload)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| transport_error("submitting votes", e))?;
        Ok(())
    }
}
