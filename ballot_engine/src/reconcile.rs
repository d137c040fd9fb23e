//! Reconciles the votes a judge already submitted with the current session.

use log::{debug, info, warn};
use std::collections::BTreeSet;

use crate::ballot::Ballot;
use crate::config::{Category, HistorySource, Place, TransportError, VoteHistory};
use crate::ingest::category_id;

/// The ids of the categories a judge has completed.
///
/// It only ever grows during a session.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct CompletionSet {
    ids: BTreeSet<String>,
}

impl CompletionSet {
    pub fn new() -> CompletionSet {
        CompletionSet::default()
    }

    /// Returns true if the id was not already present.
    pub fn insert(&mut self, category_id: &str) -> bool {
        self.ids.insert(category_id.to_string())
    }

    pub fn contains(&self, category_id: &str) -> bool {
        self.ids.contains(category_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.ids.iter().map(|s| s.as_str())
    }
}

/// The result of asking the store for a judge's history.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum HistoryOutcome {
    Loaded(VoteHistory),
    /// The store could not be reached. The session carries on as if the
    /// judge had never voted.
    Degraded(TransportError),
}

impl HistoryOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, HistoryOutcome::Degraded(_))
    }

    pub fn into_history(self) -> VoteHistory {
        match self {
            HistoryOutcome::Loaded(h) => h,
            HistoryOutcome::Degraded(_) => VoteHistory::new(),
        }
    }
}

pub fn load_history(source: &dyn HistorySource, judge_id: &str) -> HistoryOutcome {
    match source.fetch_history(judge_id) {
        Ok(history) => {
            info!(
                "load_history: judge {}: votes found for {} categories",
                judge_id,
                history.len()
            );
            HistoryOutcome::Loaded(history)
        }
        Err(e) => {
            warn!(
                "load_history: judge {}: continuing without history: {}",
                judge_id, e
            );
            HistoryOutcome::Degraded(e)
        }
    }
}

/// Builds the ballot for a category that is being opened.
///
/// History is looked up by category name. The result never carries over the
/// ballot of a previously opened category. Records without an entry id or
/// with a place outside 1..=3 are ignored; when two records claim the same
/// place, the later one keeps it.
pub fn seed_ballot(history: &VoteHistory, category: &Category) -> Ballot {
    let mut ballot = Ballot::new();
    let records = match history.get(&category.name) {
        Some(r) => r,
        None => {
            debug!("seed_ballot: no history for {:?}", category.name);
            return ballot;
        }
    };
    for record in records.iter() {
        let entry_id = match record.entry_id.as_deref() {
            Some(id) => id,
            None => {
                debug!("seed_ballot: {:?}: record without entry id", category.name);
                continue;
            }
        };
        match record.place.map(Place::try_from) {
            Some(Ok(place)) => ballot.assign(entry_id, place),
            x => debug!(
                "seed_ballot: {:?}: ignoring place {:?} for {}",
                category.name, x, entry_id
            ),
        }
    }
    debug!(
        "seed_ballot: {:?}: restored {} places",
        category.name,
        ballot.places_assigned()
    );
    ballot
}

/// Every category named in the history counts as completed.
pub fn completion_from_history(history: &VoteHistory) -> CompletionSet {
    let mut completed = CompletionSet::new();
    for name in history.keys() {
        let id = category_id(name);
        debug!("completion_from_history: {:?} -> {:?}", name, id);
        completed.insert(&id);
    }
    completed
}
