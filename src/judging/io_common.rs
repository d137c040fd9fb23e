// Helpers shared by the table readers and the vote stores.

use std::fmt::Display;

use ballot_engine::{HistoryRecord, TransportError, VoteHistory};
use serde_json::Value as JSValue;

pub fn transport_error(context: &str, e: impl Display) -> TransportError {
    TransportError::new(format!("{}: {}", context, e))
}

/// Writes a cell in the form the table parser reads back. The parser has no
/// escaping: quotes are dropped and line breaks become spaces.
pub fn render_field(s: &str) -> String {
    let clean: String = s
        .chars()
        .filter(|c| *c != '"')
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if clean.contains(',') {
        format!("\"{}\"", clean)
    } else {
        clean
    }
}

pub fn render_row(cells: &[String]) -> String {
    cells
        .iter()
        .map(|c| render_field(c))
        .collect::<Vec<String>>()
        .join(",")
}

/// A place is either a number or a string holding a number.
pub fn read_place(v: &JSValue) -> Option<u8> {
    match v {
        JSValue::Number(n) => n.as_u64().and_then(|x| u8::try_from(x).ok()),
        JSValue::String(s) => s.trim().parse::<u8>().ok(),
        _ => None,
    }
}

/// Reads the list of `{entryId, place}` records of one category. Records
/// missing a field are kept with that field empty.
pub fn read_records(votes: &JSValue) -> Vec<HistoryRecord> {
    let arr = match votes.as_array() {
        Some(a) => a,
        None => return Vec::new(),
    };
    arr.iter()
        .map(|v| HistoryRecord {
            entry_id: v["entryId"].as_str().map(|s| s.to_string()),
            place: read_place(&v["place"]),
        })
        .collect()
}

/// Reads a history object keyed by category name. Anything that is not an
/// object gives an empty history.
#[cfg_attr(not(feature = "http"), allow(dead_code))]
pub fn history_from_json(js: &JSValue) -> VoteHistory {
    let mut res = VoteHistory::new();
    if let Some(obj) = js.as_object() {
        for (cat_name, votes) in obj.iter() {
            res.insert(cat_name.clone(), read_records(votes));
        }
    }
    res
}
