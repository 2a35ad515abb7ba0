//! Structured view of a duplicity `collection-status` report.
//!
//! All types here are immutable values produced fresh by every status
//! request. Equality is structural.

pub mod parse;
pub mod timestamp;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::Serialize;
use std::fmt;

/// Status of one collection as reported by duplicity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionStatus {
    /// Local cache directory duplicity uses for this collection
    pub archive_dir_path: String,

    /// Active backup chain, `None` if duplicity found no chain with signatures
    pub primary_chain: Option<ChainStatus>,
}

impl CollectionStatus {
    pub fn new(archive_dir_path: impl Into<String>, primary_chain: Option<ChainStatus>) -> Self {
        Self {
            archive_dir_path: archive_dir_path.into(),
            primary_chain,
        }
    }

    /// Parse the text printed by `duplicity collection-status`.
    pub fn parse(text: &str) -> Result<Self, crate::ParseError> {
        parse::parse_collection_status(text)
    }

    /// Time of the full backup that started the primary chain.
    pub fn last_full_backup_time(&self) -> Option<NaiveDateTime> {
        self.primary_chain.as_ref().map(ChainStatus::first_backup_time)
    }

    pub fn last_incremental_backup_time(&self) -> Option<NaiveDateTime> {
        self.primary_chain
            .as_ref()
            .and_then(ChainStatus::last_incremental_backup_time)
    }
}

/// One backup chain: a full backup followed by zero or more incrementals.
///
/// Sets keep the order in which duplicity listed them. A chain always holds
/// at least one set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainStatus {
    sets: Vec<SetStatus>,
}

impl ChainStatus {
    /// Build a chain, `None` if `sets` is empty.
    pub fn new(sets: Vec<SetStatus>) -> Option<Self> {
        if sets.is_empty() {
            None
        } else {
            Some(Self { sets })
        }
    }

    pub fn sets(&self) -> &[SetStatus] {
        &self.sets
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Always false: a chain holds at least one set.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// The set tagged `Full`, if duplicity labelled one.
    pub fn full_set(&self) -> Option<&SetStatus> {
        self.sets.iter().find(|s| s.backup_type == BackupType::Full)
    }

    pub fn first_backup_time(&self) -> NaiveDateTime {
        self.backup_times()
            .min()
            .expect("backup chain holds at least one set")
    }

    pub fn last_backup_time(&self) -> NaiveDateTime {
        self.backup_times()
            .max()
            .expect("backup chain holds at least one set")
    }

    /// `None` while the chain consists of the full backup alone.
    pub fn last_incremental_backup_time(&self) -> Option<NaiveDateTime> {
        if self.sets.len() > 1 {
            Some(self.last_backup_time())
        } else {
            None
        }
    }

    fn backup_times(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        self.sets.iter().map(|s| s.backup_time)
    }
}

/// A single backup set within a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetStatus {
    /// Timestamp as printed by duplicity, no zone attached (local time)
    pub backup_time: NaiveDateTime,

    pub backup_type: BackupType,

    /// Number of volumes the set was split into
    pub volumes: u32,
}

impl SetStatus {
    pub fn new(backup_time: NaiveDateTime, backup_type: BackupType, volumes: u32) -> Self {
        Self {
            backup_time,
            backup_type,
            volumes,
        }
    }

    /// Resolve the backup time in the local zone.
    ///
    /// Ambiguous times (DST fall-back) resolve to the earlier instant;
    /// times skipped by a DST jump yield `None`.
    pub fn backup_time_local(&self) -> Option<DateTime<Local>> {
        Local.from_local_datetime(&self.backup_time).earliest()
    }
}

/// Kind of backup set as labelled in the set listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupType {
    Full,
    Incremental,
    Other(String),
}

impl BackupType {
    /// Map the listing's type token, ignoring case.
    pub fn from_token(token: &str) -> Self {
        if token.eq_ignore_ascii_case("full") {
            Self::Full
        } else if token.eq_ignore_ascii_case("incremental") || token.eq_ignore_ascii_case("inc") {
            Self::Incremental
        } else {
            Self::Other(token.to_string())
        }
    }
}

impl fmt::Display for BackupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => f.write_str("full"),
            Self::Incremental => f.write_str("incremental"),
            Self::Other(token) => f.write_str(token),
        }
    }
}
