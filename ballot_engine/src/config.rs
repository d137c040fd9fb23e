// ********* Data model ***********

use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::submission::SubmissionPayload;

/// A single submission within a category.
///
/// Text fields default to the empty string when the source table does not
/// provide them. The video reference is different: a missing or empty cell
/// means there is no video at all, and it is kept as `None`.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub title: String,
    pub filmmaker: String,
    pub description: String,
    #[serde(rename = "videoUrl")]
    pub video_ref: Option<String>,
}

/// A named contest division.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub entries: Vec<Entry>,
}

impl Category {
    pub fn entry(&self, entry_id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == entry_id)
    }
}

/// One of the three exclusive ranks of a category.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Place {
    First,
    Second,
    Third,
}

impl Place {
    pub const ALL: [Place; 3] = [Place::First, Place::Second, Place::Third];

    pub fn rank(self) -> u8 {
        match self {
            Place::First => 1,
            Place::Second => 2,
            Place::Third => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Place::First => "1st Place",
            Place::Second => "2nd Place",
            Place::Third => "3rd Place",
        }
    }
}

impl TryFrom<u8> for Place {
    type Error = InvalidPlace;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Place::First),
            2 => Ok(Place::Second),
            3 => Ok(Place::Third),
            x => Err(InvalidPlace(x)),
        }
    }
}

impl From<Place> for u8 {
    fn from(place: Place) -> u8 {
        place.rank()
    }
}

impl Display for Place {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.rank())
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct InvalidPlace(pub u8);

impl Error for InvalidPlace {}

impl Display for InvalidPlace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "place must be 1, 2 or 3, got {}", self.0)
    }
}

/// A vote as recorded by the external store.
///
/// Both fields are optional: records coming back from storage are not
/// trusted, and an incomplete record simply does not fill a ballot slot.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(rename = "entryId", default)]
    pub entry_id: Option<String>,
    #[serde(default)]
    pub place: Option<u8>,
}

impl HistoryRecord {
    pub fn new(entry_id: &str, place: u8) -> HistoryRecord {
        HistoryRecord {
            entry_id: Some(entry_id.to_string()),
            place: Some(place),
        }
    }
}

/// All the ballots previously submitted by one judge, keyed by category name.
pub type VoteHistory = HashMap<String, Vec<HistoryRecord>>;

// ********* Errors ***********

/// A collaborator (table source, history store, submission sink) failed to
/// deliver.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> TransportError {
        TransportError {
            message: message.into(),
        }
    }
}

impl Error for TransportError {}

impl Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "transport error: {}", self.message)
    }
}

/// Errors surfaced by a judging session.
///
/// A failed history fetch is not part of this list: it degrades to an empty
/// history (see [`crate::reconcile::HistoryOutcome`]).
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SessionError {
    /// Unknown judge or wrong access code. Nothing was loaded.
    Auth,
    /// The contest table could not be obtained. The judge must retry.
    Ingestion(TransportError),
    /// The ballot could not be delivered. Ballot and open category are kept.
    Submission(TransportError),
    /// The ballot does not hold all three places yet.
    BallotNotReady { assigned: usize },
    NoCategoryOpen,
    UnknownCategory { name: String },
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SessionError::Ingestion(e) | SessionError::Submission(e) => Some(e),
            _ => None,
        }
    }
}

impl Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Auth => write!(f, "invalid judge ID or access code"),
            SessionError::Ingestion(e) => write!(f, "failed to load contest data: {}", e),
            SessionError::Submission(e) => write!(f, "submission failed: {}", e),
            SessionError::BallotNotReady { assigned } => {
                write!(f, "ballot not ready: {} of 3 places assigned", assigned)
            }
            SessionError::NoCategoryOpen => write!(f, "no category is open"),
            SessionError::UnknownCategory { name } => write!(f, "unknown category {:?}", name),
        }
    }
}

// ********* Collaborators **********

/// Provides the raw delimited contest table.
pub trait TableSource {
    fn fetch_table(&self) -> Result<String, TransportError>;
}

/// Provides the votes a judge already submitted.
pub trait HistorySource {
    fn fetch_history(&self, judge_id: &str) -> Result<VoteHistory, TransportError>;
}

/// Delivers a submission. `Ok` must only be returned once delivery is known
/// to have succeeded.
pub trait SubmissionSink {
    fn submit(&self, payload: &SubmissionPayload) -> Result<(), TransportError>;
}

/// Static judge lookup.
pub trait IdentityCheck {
    fn authenticate(&self, judge_id: &str, code: &str) -> bool;
}
