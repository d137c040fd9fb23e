//! Turns the published contest table into the category catalog.
//!
//! The dialect is deliberately small: fields are separated by commas, a
//! double quote toggles a quoted region in which commas are literal, and the
//! quote characters themselves are dropped. There is no escaping of quotes.
//! Malformed rows never fail the parse, they degrade to empty fields.

use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};

use crate::config::{Category, Entry};

pub const CATEGORY_COLUMN: &str = "category";
pub const ENTRY_ID_COLUMN: &str = "entryid";
pub const TITLE_COLUMN: &str = "title";
pub const FILMMAKER_COLUMN: &str = "filmmaker";
pub const DESCRIPTION_COLUMN: &str = "description";
pub const VIDEO_URL_COLUMN: &str = "videourl";

/// Derives the identifier of a category from its name.
///
/// The name is lowercased and every character outside `[a-z0-9]` becomes an
/// underscore. The same function is used when reading vote history, so a
/// category name always maps to the same id.
pub fn category_id(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Splits one line of the table into trimmed columns.
pub fn split_line(line: &str) -> Vec<String> {
    let mut cols: Vec<String> = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => cols.push(std::mem::take(&mut cur)),
            _ => cur.push(ch),
        }
    }
    cols.push(cur);
    cols.iter().map(|c| c.trim().to_string()).collect()
}

/// Position of each logical column in the header. A column that is not in
/// the header is `None`, and every value read from it is empty.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct TableSchema {
    pub category: Option<usize>,
    pub entry_id: Option<usize>,
    pub title: Option<usize>,
    pub filmmaker: Option<usize>,
    pub description: Option<usize>,
    pub video_url: Option<usize>,
}

impl TableSchema {
    pub fn from_header(header: &[String]) -> TableSchema {
        let col_idx = |name: &str| header.iter().position(|h| h.to_lowercase() == name);
        TableSchema {
            category: col_idx(CATEGORY_COLUMN),
            entry_id: col_idx(ENTRY_ID_COLUMN),
            title: col_idx(TITLE_COLUMN),
            filmmaker: col_idx(FILMMAKER_COLUMN),
            description: col_idx(DESCRIPTION_COLUMN),
            video_url: col_idx(VIDEO_URL_COLUMN),
        }
    }

    /// Names of the logical columns the header does not provide.
    pub fn missing_columns(&self) -> Vec<&'static str> {
        [
            (CATEGORY_COLUMN, self.category),
            (ENTRY_ID_COLUMN, self.entry_id),
            (TITLE_COLUMN, self.title),
            (FILMMAKER_COLUMN, self.filmmaker),
            (DESCRIPTION_COLUMN, self.description),
            (VIDEO_URL_COLUMN, self.video_url),
        ]
        .iter()
        .filter(|(_, idx)| idx.is_none())
        .map(|(name, _)| *name)
        .collect()
    }

    fn text(row: &[String], idx: Option<usize>) -> String {
        idx.and_then(|i| row.get(i)).cloned().unwrap_or_default()
    }

    fn reference(row: &[String], idx: Option<usize>) -> Option<String> {
        idx.and_then(|i| row.get(i))
            .filter(|s| !s.is_empty())
            .cloned()
    }

    fn entry(&self, row: &[String]) -> Entry {
        Entry {
            id: Self::text(row, self.entry_id),
            title: Self::text(row, self.title),
            filmmaker: Self::text(row, self.filmmaker),
            description: Self::text(row, self.description),
            video_ref: Self::reference(row, self.video_url),
        }
    }
}

/// Parses the raw table into categories.
///
/// Categories keep the order in which they first appear, and entries keep
/// their row order. Rows without a category are dropped, every other row
/// becomes an entry. A non-empty entry id seen a second time in the same
/// category is logged but kept.
pub fn parse_table(text: &str) -> Vec<Category> {
    let mut lines = text.trim().split('\n');
    let header = split_line(lines.next().unwrap_or(""));
    let schema = TableSchema::from_header(&header);
    debug!("parse_table: header: {:?} schema: {:?}", header, schema);
    let missing = schema.missing_columns();
    if !missing.is_empty() {
        warn!("parse_table: columns not found in header: {:?}", missing);
    }

    let mut categories: Vec<(String, Vec<Entry>)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut seen_ids: Vec<HashSet<String>> = Vec::new();

    // The header is line 1.
    for (idx, line) in lines.enumerate() {
        let lineno = idx + 2;
        if line.trim().is_empty() {
            continue;
        }
        let row = split_line(line);
        let cat_name = TableSchema::text(&row, schema.category);
        if cat_name.is_empty() {
            debug!("parse_table: line {}: no category, skipping", lineno);
            continue;
        }
        let pos = *positions.entry(cat_name.clone()).or_insert_with(|| {
            categories.push((cat_name.clone(), Vec::new()));
            seen_ids.push(HashSet::new());
            categories.len() - 1
        });
        let entry = schema.entry(&row);
        if !entry.id.is_empty() && !seen_ids[pos].insert(entry.id.clone()) {
            warn!(
                "parse_table: line {}: duplicate entry id {:?} in category {:?}",
                lineno, entry.id, cat_name
            );
        }
        debug!("parse_table: line {}: {:?} -> {:?}", lineno, cat_name, entry);
        categories[pos].1.push(entry);
    }

    let res: Vec<Category> = categories
        .into_iter()
        .map(|(name, entries)| Category {
            id: category_id(&name),
            name,
            entries,
        })
        .collect();
    info!(
        "parse_table: {} categories, {} entries",
        res.len(),
        res.iter().map(|c| c.entries.len()).sum::<usize>()
    );
    res
}
