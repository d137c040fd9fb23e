use log::{debug, info};

use ballot_engine::*;
use snafu::{prelude::*, Snafu};

use std::path::{Path, PathBuf};

use crate::args::Args;
use crate::judging::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_csv;
#[cfg(feature = "http")]
mod io_http;
mod io_jsonl;
mod io_placeholder;
mod io_xlsx;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum JudgingError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error opening workbook {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Workbook {path} has no worksheet {worksheet}"))]
    MissingWorksheet { path: String, worksheet: String },
    #[snafu(display("Unknown provider {provider:?} for the {role}"))]
    UnknownProvider { provider: String, role: String },
    #[snafu(display("Provider {provider:?} needs a {field:?} setting"))]
    MissingSetting { provider: String, field: String },
    #[snafu(display("No configuration file given (use --config)"))]
    MissingConfig {},
    #[snafu(display("Missing judge ID or access code (use --judge and --access-code)"))]
    MissingCredentials {},
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Invalid vote {arg:?}: expected ENTRY=PLACE with PLACE 1, 2 or 3"))]
    InvalidVote { arg: String },
    #[snafu(display("Category {category:?} has no entry {entry:?}"))]
    UnknownEntry { category: String, entry: String },
    #[snafu(display("{source}"))]
    Session { source: SessionError },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type JudgingResult<T> = Result<T, JudgingError>;

/// Used when no history store is configured: the judge simply has no
/// previous votes.
struct NoHistory;

impl HistorySource for NoHistory {
    fn fetch_history(&self, _judge_id: &str) -> Result<VoteHistory, TransportError> {
        Ok(VoteHistory::new())
    }
}

fn resolve(root: &Path, p: &str) -> PathBuf {
    [root, Path::new(p)].iter().collect()
}

fn require_path(src: &SourceConfig, root: &Path) -> JudgingResult<PathBuf> {
    let p = src.path.as_deref().context(MissingSettingSnafu {
        provider: src.provider.clone(),
        field: "path",
    })?;
    Ok(resolve(root, p))
}

#[cfg(feature = "http")]
fn require_url(src: &SourceConfig) -> JudgingResult<String> {
    src.url.clone().context(MissingSettingSnafu {
        provider: src.provider.clone(),
        field: "url",
    })
}

#[cfg(not(feature = "http"))]
fn http_disabled<T>() -> JudgingResult<T> {
    whatever!("the http provider requires building judgebox with the `http` feature")
}

pub fn table_source(src: &SourceConfig, root: &Path) -> JudgingResult<Box<dyn TableSource>> {
    info!("table source: {:?}", src);
    let res: Box<dyn TableSource> = match src.provider.as_str() {
        "csv" => Box::new(io_csv::CsvFile::new(require_path(src, root)?)),
        "xlsx" => Box::new(io_xlsx::XlsxFile::new(
            require_path(src, root)?,
            src.excel_worksheet_name.clone(),
        )),
        "placeholder" => Box::new(io_placeholder::PlaceholderTable),
        #[cfg(feature = "http")]
        "http" => Box::new(io_http::HttpTable::new(require_url(src)?)?),
        #[cfg(not(feature = "http"))]
        "http" => return http_disabled(),
        x => {
            return UnknownProviderSnafu {
                provider: x,
                role: "table source",
            }
            .fail()
        }
    };
    Ok(res)
}

pub fn history_source(
    src: Option<&SourceConfig>,
    root: &Path,
) -> JudgingResult<Box<dyn HistorySource>> {
    info!("history source: {:?}", src);
    let src = match src {
        Some(s) => s,
        None => return Ok(Box::new(NoHistory)),
    };
    let res: Box<dyn HistorySource> = match src.provider.as_str() {
        "jsonl" => Box::new(io_jsonl::JsonlStore::new(require_path(src, root)?)),
        "none" => Box::new(NoHistory),
        #[cfg(feature = "http")]
        "http" => Box::new(io_http::HttpStore::new(require_url(src)?)?),
        #[cfg(not(feature = "http"))]
        "http" => return http_disabled(),
        x => {
            return UnknownProviderSnafu {
                provider: x,
                role: "history source",
            }
            .fail()
        }
    };
    Ok(res)
}

pub fn submission_sink(src: &SourceConfig, root: &Path) -> JudgingResult<Box<dyn SubmissionSink>> {
    info!("submission sink: {:?}", src);
    let res: Box<dyn SubmissionSink> = match src.provider.as_str() {
        "jsonl" => Box::new(io_jsonl::JsonlStore::new(require_path(src, root)?)),
        "stdout" => Box::new(io_jsonl::Stdout),
        #[cfg(feature = "http")]
        "http" => Box::new(io_http::HttpStore::new(require_url(src)?)?),
        #[cfg(not(feature = "http"))]
        "http" => return http_disabled(),
        x => {
            return UnknownProviderSnafu {
                provider: x,
                role: "submission sink",
            }
            .fail()
        }
    };
    Ok(res)
}

/// Parses a `ENTRY=PLACE` command line vote.
pub fn parse_vote(arg: &str) -> JudgingResult<(String, Place)> {
    let (entry, place) = arg
        .rsplit_once('=')
        .context(InvalidVoteSnafu { arg })?;
    let place = place
        .trim()
        .parse::<u8>()
        .ok()
        .and_then(|p| Place::try_from(p).ok())
        .context(InvalidVoteSnafu { arg })?;
    Ok((entry.trim().to_string(), place))
}

fn print_categories(contest_name: &str, session: &JudgeSession) {
    println!("{}", contest_name);
    println!("Judging as: {}", session.judge_id());
    if session.history_degraded() {
        println!("(previous votes could not be loaded)");
    }
    println!();
    for cat in session.categories() {
        let count = cat.entries.len();
        println!(
            "  {:8} {} ({} {})",
            if session.is_completed(cat) { "✓ Done" } else { "" },
            cat.name,
            count,
            if count == 1 { "entry" } else { "entries" }
        );
    }
    println!();
    print_remaining(session.remaining());
}

fn print_remaining(remaining: usize) {
    match remaining {
        0 => println!("You have completed all categories. Thank you!"),
        1 => println!("You have 1 category remaining."),
        n => println!("You have {} categories remaining.", n),
    }
}

fn print_ballot(session: &JudgeSession) {
    let cat = match session.open_category_ref() {
        Some(c) => c,
        None => return,
    };
    let ballot = session.ballot();
    println!("{}", cat.name);
    println!(
        "{} entries · Assign 1st, 2nd, and 3rd place",
        cat.entries.len()
    );
    println!();
    for entry in cat.entries.iter() {
        let title = if entry.title.is_empty() {
            entry.id.as_str()
        } else {
            entry.title.as_str()
        };
        let place = ballot
            .get_place(&entry.id)
            .map(|p| format!("[{}]", p.label()))
            .unwrap_or_default();
        print!("  {:12} {}", place, title);
        if !entry.filmmaker.is_empty() {
            print!(" by {}", entry.filmmaker);
        }
        println!("  ({})", entry.id);
        if let Some(video) = &entry.video_ref {
            println!("  {:12} {}", "", video);
        }
    }
    println!();
    println!("{} of 3 places assigned", ballot.places_assigned());
}

/// Runs one judging session from the command line arguments: log in, then
/// list the categories, or open one, apply the votes and submit it.
pub fn run_session(args: &Args) -> JudgingResult<()> {
    let config_path = args.config.clone().context(MissingConfigSnafu {})?;
    let config = read_config(&config_path)?;
    let root = Path::new(config_path.as_str())
        .parent()
        .context(MissingParentDirSnafu {})?;
    debug!("run_session: config root {:?}", root);

    let (judge_id, code) = match (&args.judge, &args.access_code) {
        (Some(j), Some(c)) => (j.as_str(), c.as_str()),
        _ => return MissingCredentialsSnafu {}.fail(),
    };

    let identity = StaticCredentials::new(&config.judges);
    let table = table_source(&config.table_source, root)?;
    let history = history_source(config.history_source.as_ref(), root)?;

    let mut session = JudgeSession::login(
        &identity,
        judge_id,
        code,
        table.as_ref(),
        history.as_ref(),
    )
    .context(SessionSnafu {})?;

    let category = match &args.category {
        Some(c) => c,
        None => {
            print_categories(&config.contest_name, &session);
            return Ok(());
        }
    };

    let cat = session.open_category(category).context(SessionSnafu {})?.clone();
    for arg in args.votes.iter() {
        let (entry_id, place) = parse_vote(arg)?;
        if cat.entry(&entry_id).is_none() {
            return UnknownEntrySnafu {
                category: cat.name.clone(),
                entry: entry_id,
            }
            .fail();
        }
        session
            .toggle_place(&entry_id, place)
            .context(SessionSnafu {})?;
    }
    print_ballot(&session);

    if !args.submit {
        return Ok(());
    }
    let sink = submission_sink(&config.submission_sink, root)?;
    let receipt = session.submit(sink.as_ref()).context(SessionSnafu {})?;
    println!();
    println!("Votes Submitted");
    println!(
        "Your rankings for {} have been recorded.",
        receipt.category_name
    );
    print_remaining(receipt.remaining);
    Ok(())
}
