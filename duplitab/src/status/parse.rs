//! Parser for the text report of `duplicity collection-status`.
//!
//! The parts consumed look like this:
//!
//! ```text
//! Archive dir: /root/.cache/duplicity/3fe07cc0f71075f95f411fb55ec60120
//! ...
//! Found primary backup chain with matching signature chain:
//! -------------------------
//! Chain start time: Thu Oct 27 19:57:33 2016
//! ...
//!  Type of backup set:                            Time:      Num volumes:
//!                 Full         Thu Oct 27 19:57:33 2016                 1
//!          Incremental         Thu Oct 27 19:57:35 2016                 1
//! -------------------------
//! ```
//!
//! Any deviation from this shape is fatal; nothing is skipped or defaulted.

use super::timestamp::parse_asctime;
use super::{BackupType, ChainStatus, CollectionStatus, SetStatus};
use crate::ParseError;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, trace};

const NO_CHAINS: &str = "No backup chains with active signatures found";

static ARCHIVE_DIR: OnceLock<Regex> = OnceLock::new();
static PRIMARY_CHAIN: OnceLock<Regex> = OnceLock::new();
static SET_LISTING_HEADER: OnceLock<Regex> = OnceLock::new();
static SET_LINE: OnceLock<Regex> = OnceLock::new();

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static pattern compiles"))
}

fn archive_dir_regex() -> &'static Regex {
    regex(&ARCHIVE_DIR, r"Archive dir: (.*)")
}

/// Body between the two 25-hyphen separators following the chain heading.
fn primary_chain_regex() -> &'static Regex {
    regex(
        &PRIMARY_CHAIN,
        r"(?m)^Found primary backup chain.*\s-{25}\s([\w\W]*?)\s-{25}\s",
    )
}

fn set_listing_header_regex() -> &'static Regex {
    regex(&SET_LISTING_HEADER, r"Num volumes: *\r?\n")
}

fn set_line_regex() -> &'static Regex {
    regex(
        &SET_LINE,
        r"^\s*(?P<mode>\w+) {2,}(?P<ts>.+?) {2,} (?P<vol>\d+)",
    )
}

/// Parse a full collection-status report.
pub fn parse_collection_status(text: &str) -> Result<CollectionStatus, ParseError> {
    let archive_dir_path = archive_dir_regex()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or(ParseError::MissingArchiveDir)?;

    let primary_chain = if text.contains(NO_CHAINS) {
        debug!(archive_dir = %archive_dir_path, "no active backup chain");
        None
    } else {
        let body = primary_chain_regex()
            .captures(text)
            .and_then(|c| c.get(1))
            .ok_or(ParseError::MissingPrimaryChain)?;
        Some(parse_chain(text, body.start(), body.as_str())?)
    };

    Ok(CollectionStatus {
        archive_dir_path,
        primary_chain,
    })
}

/// Parse the body of a chain block. `offset` is the body's byte position in
/// `report`, used to number lines in errors.
fn parse_chain(report: &str, offset: usize, body: &str) -> Result<ChainStatus, ParseError> {
    let header = set_listing_header_regex()
        .find(body)
        .ok_or(ParseError::MissingSetListing)?;

    let listing_start = offset + header.end();
    let first_line = line_number(report, listing_start);

    // Only the text up to a second header belongs to this listing.
    let listing = &body[header.end()..];
    let listing = match set_listing_header_regex().find(listing) {
        Some(next) => &listing[..next.start()],
        None => listing,
    };

    let mut sets = Vec::new();
    for (index, line) in listing.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            continue;
        }
        sets.push(parse_set_line(line, first_line + index)?);
    }

    trace!(sets = sets.len(), "parsed primary chain");
    ChainStatus::new(sets).ok_or(ParseError::MissingSetListing)
}

fn parse_set_line(line: &str, line_no: usize) -> Result<SetStatus, ParseError> {
    let malformed = || ParseError::MalformedSetLine {
        line: line_no,
        text: line.to_string(),
    };

    let caps = set_line_regex().captures(line).ok_or_else(malformed)?;
    let volumes = caps["vol"].parse::<u32>().map_err(|_| malformed())?;
    let ts = &caps["ts"];
    let backup_time = parse_asctime(ts).map_err(|reason| ParseError::InvalidTimestamp {
        line: line_no,
        text: ts.to_string(),
        reason,
    })?;

    Ok(SetStatus {
        backup_time,
        backup_type: BackupType::from_token(&caps["mode"]),
        volumes,
    })
}

/// 1-based line number of the byte at `offset`.
fn line_number(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}
