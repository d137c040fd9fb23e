use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::ballot::Ballot;
use crate::config::{Category, Place, SessionError};

/// One ranked entry of a submission. Title and filmmaker are copied from the
/// catalog so the store can be read without it.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct VoteRecord {
    #[serde(rename = "entryId")]
    pub entry_id: String,
    pub place: Place,
    pub title: String,
    pub filmmaker: String,
}

/// What is handed to the submission sink.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionPayload {
    #[serde(rename = "judgeId")]
    pub judge_id: String,
    #[serde(rename = "category")]
    pub category_name: String,
    pub timestamp: DateTime<Utc>,
    pub votes: Vec<VoteRecord>,
}

/// Returned to the caller once a ballot has been delivered.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SubmissionReceipt {
    pub category_name: String,
    /// Categories still without a submitted ballot.
    pub remaining: usize,
    pub payload: SubmissionPayload,
}

/// Snapshots a ready ballot.
///
/// Votes follow the ballot's own order. An entry that cannot be found in the
/// category gets an empty title and filmmaker.
pub fn build_payload(
    judge_id: &str,
    category: &Category,
    ballot: &Ballot,
    issued_at: DateTime<Utc>,
) -> Result<SubmissionPayload, SessionError> {
    if !ballot.is_ready() {
        return Err(SessionError::BallotNotReady {
            assigned: ballot.places_assigned(),
        });
    }
    let votes: Vec<VoteRecord> = ballot
        .iter()
        .map(|(entry_id, place)| {
            let entry = category.entry(entry_id);
            VoteRecord {
                entry_id: entry_id.to_string(),
                place,
                title: entry.map(|e| e.title.clone()).unwrap_or_default(),
                filmmaker: entry.map(|e| e.filmmaker.clone()).unwrap_or_default(),
            }
        })
        .collect();
    debug!(
        "build_payload: judge {} category {:?}: {:?}",
        judge_id, category.name, votes
    );
    Ok(SubmissionPayload {
        judge_id: judge_id.to_string(),
        category_name: category.name.clone(),
        timestamp: issued_at,
        votes,
    })
}
