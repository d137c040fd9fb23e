/*!
Ballot engine for judged contests.

A small panel of judges reviews the entries of each contest category and gives
exactly one 1st, 2nd and 3rd place per category. This crate holds the rules of
that process:

- [`ingest`] turns the published contest table into categories and entries,
- [`ballot`] keeps the place assignment of the open category consistent,
- [`reconcile`] restores the votes a judge already submitted,
- [`submission`] snapshots a complete ballot for the store,
- [`session`] ties them together for one judge, from login to logout.

The contest table, the vote store and the judge credentials live elsewhere.
They are reached through the traits in this module ([`TableSource`],
[`HistorySource`], [`SubmissionSink`], [`IdentityCheck`]).

```
use ballot_engine::*;

let table = "category,entryid,title\nFire,fire_01,Thaw\nFire,fire_02,Dust\nFire,fire_03,Red Tide";
let fire = &parse_table(table)[0];

let mut ballot = seed_ballot(&VoteHistory::new(), fire);
ballot.toggle_place("fire_01", Place::First);
ballot.toggle_place("fire_02", Place::Second);
ballot.toggle_place("fire_03", Place::Third);
assert!(ballot.is_ready());

let payload = build_payload("judge1", fire, &ballot, chrono::Utc::now())?;
assert_eq!(payload.votes.len(), 3);
# Ok::<(), SessionError>(())
```
*/

mod config;

pub mod ballot;
pub mod ingest;
pub mod manual;
pub mod reconcile;
pub mod session;
pub mod submission;

pub use crate::ballot::Ballot;
pub use crate::config::*;
pub use crate::ingest::{category_id, parse_table, TableSchema};
pub use crate::reconcile::{
    completion_from_history, load_history, seed_ballot, CompletionSet, HistoryOutcome,
};
pub use crate::session::JudgeSession;
pub use crate::submission::{build_payload, SubmissionPayload, SubmissionReceipt, VoteRecord};
