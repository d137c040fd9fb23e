use chrono::Utc;
use log::{debug, info};

use crate::ballot::Ballot;
use crate::config::*;
use crate::ingest::{category_id, parse_table};
use crate::reconcile::{
    completion_from_history, load_history, seed_ballot, CompletionSet, HistoryOutcome,
};
use crate::submission::{build_payload, SubmissionReceipt};

/// Everything one judge works with between login and logout.
///
/// A session only exists once the judge is authenticated and the catalog is
/// loaded, so a category can never be opened before ingestion finished.
#[derive(Debug, Clone)]
pub struct JudgeSession {
    judge_id: String,
    catalog: Vec<Category>,
    history: VoteHistory,
    history_degraded: bool,
    completed: CompletionSet,
    open: Option<usize>,
    ballot: Ballot,
}

impl JudgeSession {
    /// Authenticates the judge, then loads the catalog and the judge's
    /// history, in that order.
    ///
    /// A missing history is not an error: the session starts with no
    /// completed category.
    pub fn login(
        identity: &dyn IdentityCheck,
        judge_id: &str,
        code: &str,
        table: &dyn TableSource,
        history: &dyn HistorySource,
    ) -> Result<JudgeSession, SessionError> {
        if !identity.authenticate(judge_id, code) {
            info!("login: rejected credentials for {:?}", judge_id);
            return Err(SessionError::Auth);
        }
        let text = table.fetch_table().map_err(SessionError::Ingestion)?;
        let catalog = parse_table(&text);
        let outcome = load_history(history, judge_id);
        Ok(JudgeSession::from_parts(judge_id, catalog, outcome))
    }

    pub fn from_parts(judge_id: &str, catalog: Vec<Category>, outcome: HistoryOutcome) -> JudgeSession {
        let history_degraded = outcome.is_degraded();
        let history = outcome.into_history();
        let completed = completion_from_history(&history);
        info!(
            "session: judge {}: {} categories, {} already completed",
            judge_id,
            catalog.len(),
            completed.len()
        );
        JudgeSession {
            judge_id: judge_id.to_string(),
            catalog,
            history,
            history_degraded,
            completed,
            open: None,
            ballot: Ballot::new(),
        }
    }

    pub fn judge_id(&self) -> &str {
        &self.judge_id
    }

    pub fn categories(&self) -> &[Category] {
        &self.catalog
    }

    /// True when the history store could not be reached at login.
    pub fn history_degraded(&self) -> bool {
        self.history_degraded
    }

    pub fn completed(&self) -> &CompletionSet {
        &self.completed
    }

    pub fn is_completed(&self, category: &Category) -> bool {
        self.completed.contains(&category.id)
    }

    /// Number of catalog categories still without a submitted ballot.
    pub fn remaining(&self) -> usize {
        self.catalog
            .iter()
            .filter(|c| !self.completed.contains(&c.id))
            .count()
    }

    /// Finds a category by name, or by id.
    pub fn find_category(&self, name_or_id: &str) -> Option<&Category> {
        self.position(name_or_id).map(|idx| &self.catalog[idx])
    }

    fn position(&self, name_or_id: &str) -> Option<usize> {
        self.catalog
            .iter()
            .position(|c| c.name == name_or_id)
            .or_else(|| {
                let id = category_id(name_or_id);
                self.catalog.iter().position(|c| c.id == id)
            })
    }

    /// Opens a category for judging. Any ballot of the previously open
    /// category is dropped, and the new ballot is seeded from history.
    pub fn open_category(&mut self, name_or_id: &str) -> Result<&Category, SessionError> {
        let idx = self
            .position(name_or_id)
            .ok_or_else(|| SessionError::UnknownCategory {
                name: name_or_id.to_string(),
            })?;
        if let Some(prev) = self.open {
            if prev != idx && !self.ballot.is_empty() {
                debug!(
                    "open_category: dropping unsaved ballot for {:?}",
                    self.catalog[prev].name
                );
            }
        }
        self.ballot = seed_ballot(&self.history, &self.catalog[idx]);
        self.open = Some(idx);
        info!(
            "open_category: {:?} ({} entries, {} places restored)",
            self.catalog[idx].name,
            self.catalog[idx].entries.len(),
            self.ballot.places_assigned()
        );
        Ok(&self.catalog[idx])
    }

    /// Goes back to browsing. The ballot stays in memory until another
    /// category is opened.
    pub fn close_category(&mut self) {
        self.open = None;
    }

    pub fn open_category_ref(&self) -> Option<&Category> {
        self.open.map(|idx| &self.catalog[idx])
    }

    pub fn ballot(&self) -> &Ballot {
        &self.ballot
    }

    pub fn toggle_place(&mut self, entry_id: &str, place: Place) -> Result<(), SessionError> {
        if self.open.is_none() {
            return Err(SessionError::NoCategoryOpen);
        }
        self.ballot.toggle_place(entry_id, place);
        Ok(())
    }

    /// Sends the ballot of the open category.
    ///
    /// On success the category is marked completed, its votes replace the
    /// history of that category, the ballot is discarded and the category is
    /// closed. On failure nothing changes, so the judge can retry.
    pub fn submit(&mut self, sink: &dyn SubmissionSink) -> Result<SubmissionReceipt, SessionError> {
        let idx = self.open.ok_or(SessionError::NoCategoryOpen)?;
        let category = &self.catalog[idx];
        let payload = build_payload(&self.judge_id, category, &self.ballot, Utc::now())?;
        sink.submit(&payload).map_err(SessionError::Submission)?;
        let category_name = category.name.clone();
        let records = payload
            .votes
            .iter()
            .map(|v| HistoryRecord::new(&v.entry_id, v.place.rank()))
            .collect();
        self.history.insert(category_name.clone(), records);
        if !self.completed.insert(&category.id) {
            debug!("submit: {:?} was already completed", category_name);
        }
        self.ballot.clear();
        self.open = None;
        let remaining = self.remaining();
        info!(
            "submit: judge {}: {:?} recorded, {} categories remaining",
            self.judge_id, category_name, remaining
        );
        Ok(SubmissionReceipt {
            category_name,
            remaining,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::SubmissionPayload;
    use std::cell::RefCell;

    const TABLE: &str = "category,entryid,title,filmmaker,description,videourl
Fire,fire_01,Burning Season,Rosa Flores,Indigenous communities fight fires,
Fire,fire_02,Red Tide,Omar Khalil,,https://video/2
Fire,fire_03,Daybreak,Yuki Mori,,
Sports,sports_01,Final Whistle,Erik Lindqvist,,
Sports,sports_02,Field Day,Nina Petrov,,
";

    struct Judges;

    impl IdentityCheck for Judges {
        fn authenticate(&self, judge_id: &str, code: &str) -> bool {
            judge_id == "judge1" && code == "alpha"
        }
    }

    struct Table(Result<String, TransportError>);

    impl TableSource for Table {
        fn fetch_table(&self) -> Result<String, TransportError> {
            self.0.clone()
        }
    }

    struct Store(Option<VoteHistory>);

    impl HistorySource for Store {
        fn fetch_history(&self, _judge_id: &str) -> Result<VoteHistory, TransportError> {
            self.0.clone().ok_or_else(|| TransportError::new("store offline"))
        }
    }

    #[derive(Default)]
    struct Sink {
        fail: bool,
        sent: RefCell<Vec<SubmissionPayload>>,
    }

    impl SubmissionSink for Sink {
        fn submit(&self, payload: &SubmissionPayload) -> Result<(), TransportError> {
            if self.fail {
                return Err(TransportError::new("timeout"));
            }
            self.sent.borrow_mut().push(payload.clone());
            Ok(())
        }
    }

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn login(history: Option<VoteHistory>) -> JudgeSession {
        init_logger();
        JudgeSession::login(
            &Judges,
            "judge1",
            "alpha",
            &Table(Ok(TABLE.to_string())),
            &Store(history),
        )
        .unwrap()
    }

    fn places(session: &JudgeSession) -> Vec<(String, u8)> {
        session
            .ballot()
            .iter()
            .map(|(id, p)| (id.to_string(), p.rank()))
            .collect()
    }

    #[test]
    fn bad_credentials_load_nothing() {
        let res = JudgeSession::login(
            &Judges,
            "judge1",
            "beta",
            &Table(Err(TransportError::new("unreachable"))),
            &Store(None),
        );
        assert_eq!(res.unwrap_err(), SessionError::Auth);
    }

    #[test]
    fn table_failure_is_an_ingestion_error() {
        let res = JudgeSession::login(
            &Judges,
            "judge1",
            "alpha",
            &Table(Err(TransportError::new("unreachable"))),
            &Store(None),
        );
        assert!(matches!(res, Err(SessionError::Ingestion(_))));
    }

    #[test]
    fn history_failure_degrades() {
        let session = login(None);
        assert!(session.history_degraded());
        assert!(session.completed().is_empty());
        assert_eq!(session.remaining(), 2);
    }

    #[test]
    fn history_marks_and_seeds_categories() {
        let mut history = VoteHistory::new();
        history.insert(
            "Sports".to_string(),
            vec![HistoryRecord::new("sports_01", 1)],
        );
        let mut session = login(Some(history));
        assert!(!session.history_degraded());
        let sports = session.find_category("sports").unwrap().clone();
        assert!(session.is_completed(&sports));
        assert_eq!(session.remaining(), 1);

        session.open_category("Sports").unwrap();
        assert_eq!(places(&session), vec![("sports_01".to_string(), 1)]);

        session.toggle_place("sports_02", Place::Second).unwrap();
        session.open_category("Fire").unwrap();
        assert!(session.ballot().is_empty());

        // Re-opening starts again from history, local edits are gone.
        session.open_category("sports").unwrap();
        assert_eq!(places(&session), vec![("sports_01".to_string(), 1)]);
    }

    #[test]
    fn unknown_category_and_closed_session() {
        let mut session = login(Some(VoteHistory::new()));
        assert_eq!(
            session.open_category("Weather").unwrap_err(),
            SessionError::UnknownCategory {
                name: "Weather".to_string()
            }
        );
        assert_eq!(
            session.toggle_place("fire_01", Place::First),
            Err(SessionError::NoCategoryOpen)
        );
        assert!(matches!(
            session.submit(&Sink::default()),
            Err(SessionError::NoCategoryOpen)
        ));
    }

    #[test]
    fn closed_category_rejects_edits() {
        let mut session = login(Some(VoteHistory::new()));
        session.open_category("Fire").unwrap();
        session.toggle_place("fire_01", Place::First).unwrap();
        session.toggle_place("fire_02", Place::Second).unwrap();
        session.toggle_place("fire_03", Place::Third).unwrap();
        session.close_category();
        assert!(session.open_category_ref().is_none());
        assert_eq!(
            session.toggle_place("fire_01", Place::Second),
            Err(SessionError::NoCategoryOpen)
        );
        let sink = Sink::default();
        assert_eq!(session.submit(&sink).unwrap_err(), SessionError::NoCategoryOpen);
        assert!(sink.sent.borrow().is_empty());
        assert!(!session.completed().contains("fire"));
    }

    #[test]
    fn fire_scenario_end_to_end() {
        let mut session = login(Some(VoteHistory::new()));
        session.open_category("Fire").unwrap();

        session.toggle_place("fire_01", Place::First).unwrap();
        session.toggle_place("fire_02", Place::Second).unwrap();
        assert!(!session.ballot().is_ready());

        session.toggle_place("fire_01", Place::First).unwrap();
        assert_eq!(places(&session), vec![("fire_02".to_string(), 2)]);

        session.toggle_place("fire_01", Place::Third).unwrap();
        assert_eq!(
            places(&session),
            vec![("fire_02".to_string(), 2), ("fire_01".to_string(), 3)]
        );
        assert!(!session.ballot().is_ready());

        session.toggle_place("fire_01", Place::First).unwrap();
        assert_eq!(
            places(&session),
            vec![("fire_02".to_string(), 2), ("fire_01".to_string(), 1)]
        );
        assert!(!session.ballot().is_ready());

        session.toggle_place("fire_03", Place::Third).unwrap();
        assert!(session.ballot().is_ready());

        let sink = Sink::default();
        let receipt = session.submit(&sink).unwrap();
        assert_eq!(receipt.category_name, "Fire");
        assert_eq!(receipt.remaining, 1);
        let mut ranks: Vec<u8> = receipt.payload.votes.iter().map(|v| v.place.rank()).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(sink.sent.borrow().len(), 1);
        assert_eq!(sink.sent.borrow()[0].votes[2].title, "Daybreak");

        assert!(session.completed().contains("fire"));
        assert!(session.open_category_ref().is_none());
        assert!(session.ballot().is_empty());

        session.open_category("fire").unwrap();
        assert!(session.ballot().is_ready());
        assert_eq!(session.ballot().get_place("fire_03"), Some(Place::Third));
    }

    #[test]
    fn failed_submission_keeps_ballot() {
        let mut session = login(Some(VoteHistory::new()));
        session.open_category("Fire").unwrap();
        session.toggle_place("fire_01", Place::First).unwrap();
        session.toggle_place("fire_02", Place::Second).unwrap();
        assert_eq!(
            session.submit(&Sink::default()).unwrap_err(),
            SessionError::BallotNotReady { assigned: 2 }
        );
        session.toggle_place("fire_03", Place::Third).unwrap();
        let before = session.ballot().clone();

        let failing = Sink {
            fail: true,
            ..Sink::default()
        };
        assert!(matches!(
            session.submit(&failing),
            Err(SessionError::Submission(_))
        ));
        assert_eq!(session.ballot(), &before);
        assert!(!session.completed().contains("fire"));
        assert_eq!(session.open_category_ref().map(|c| c.id.as_str()), Some("fire"));

        let sink = Sink::default();
        session.submit(&sink).unwrap();
        assert!(session.completed().contains("fire"));
    }
}
