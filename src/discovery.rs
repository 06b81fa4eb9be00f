//! Listing row parsing and candidate selection
//!
//! A listing row looks like `<name><suffix><date> <time> ...`, for example
//! `01001099999.csv2024-01-19 10:27 4.1M`. When the date is a separate token
//! (`Divvy_Trips_2019_Q1.csv 2024-01-19 10:27`) the next two tokens supply the
//! date and time instead.

use crate::error::{Error, Result, RowParseError};
use crate::types::{CandidateRecord, RejectedRow};
use crate::utils::is_plain_file_name;
use chrono::NaiveDateTime;
use tracing::{debug, info};

/// Timestamp layout used by directory listings
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Rows split into parsed candidates and rejected rows
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedRows {
    /// Successfully parsed candidates, in row order
    pub candidates: Vec<CandidateRecord>,
    /// Rows that failed to parse, in row order
    pub rejected: Vec<RejectedRow>,
}

/// Turns raw listing rows into [`CandidateRecord`]s
#[derive(Clone, Debug)]
pub struct RowParser {
    suffix: String,
    base_url: Option<url::Url>,
}

impl RowParser {
    /// Parser splitting names on `suffix` (e.g. ".csv"); source URLs are the bare file names
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            base_url: None,
        }
    }

    /// Resolve each candidate's file name against the listing endpoint
    pub fn with_base_url(mut self, endpoint: &str) -> Result<Self> {
        let base = url::Url::parse(endpoint).map_err(|e| Error::Config {
            message: format!("invalid listing endpoint {:?}: {}", endpoint, e),
            key: Some("endpoint".to_string()),
        })?;
        self.base_url = Some(base);
        Ok(self)
    }

    /// File name of a candidate: identifier plus suffix
    pub fn filename(&self, record: &CandidateRecord) -> String {
        format!("{}{}", record.identifier, self.suffix)
    }

    /// Parse one row
    pub fn parse(&self, raw_row: &str) -> std::result::Result<CandidateRecord, RowParseError> {
        let tokens: Vec<&str> = raw_row.split_whitespace().collect();

        let first = tokens.first().ok_or_else(|| RowParseError::TooFewTokens {
            row: raw_row.to_string(),
            found: 0,
        })?;

        let (identifier, date_fragment) =
            first
                .split_once(self.suffix.as_str())
                .ok_or_else(|| RowParseError::MissingSuffix {
                    row: raw_row.to_string(),
                    suffix: self.suffix.clone(),
                })?;

        // Date glued to the name uses one more token; a detached date uses two
        let (date, time) = if date_fragment.is_empty() {
            match (tokens.get(1), tokens.get(2)) {
                (Some(date), Some(time)) => (*date, *time),
                _ => {
                    return Err(RowParseError::TooFewTokens {
                        row: raw_row.to_string(),
                        found: tokens.len(),
                    });
                }
            }
        } else {
            match tokens.get(1) {
                Some(time) => (date_fragment, *time),
                None => {
                    return Err(RowParseError::TooFewTokens {
                        row: raw_row.to_string(),
                        found: tokens.len(),
                    });
                }
            }
        };

        let filename = format!("{}{}", identifier, self.suffix);
        // The name becomes a path under the download directory
        if !is_plain_file_name(&filename) {
            return Err(RowParseError::UnsafeName {
                row: raw_row.to_string(),
                name: filename,
            });
        }

        let source_url = match &self.base_url {
            Some(base) => base
                .join(&filename)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| format!("{}{}", base, filename)),
            None => filename,
        };

        Ok(CandidateRecord {
            identifier: identifier.to_string(),
            timestamp: format!("{} {}", date, time),
            source_url,
        })
    }

    /// Parse every row; a bad row is recorded and parsing carries on
    pub fn parse_rows<I>(&self, rows: I) -> ParsedRows
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut parsed = ParsedRows::default();

        for row in rows {
            let row = row.as_ref();
            match self.parse(row) {
                Ok(record) => parsed.candidates.push(record),
                Err(reason) => {
                    debug!(row, error = %reason, "skipping unparseable listing row");
                    parsed.rejected.push(RejectedRow {
                        row: row.to_string(),
                        reason,
                    });
                }
            }
        }

        info!(
            candidates = parsed.candidates.len(),
            rejected = parsed.rejected.len(),
            "parsed listing rows"
        );
        parsed
    }
}

/// Keep the records matching `predicate`, preserving order
pub fn filter<I, P>(records: I, predicate: P) -> Vec<CandidateRecord>
where
    I: IntoIterator<Item = CandidateRecord>,
    P: Fn(&CandidateRecord) -> bool,
{
    records.into_iter().filter(|r| predicate(r)).collect()
}

/// Predicate: timestamp string equals `target` exactly
pub fn timestamp_equals(target: impl Into<String>) -> impl Fn(&CandidateRecord) -> bool {
    let target = target.into();
    move |record| record.timestamp == target
}

/// Predicate: timestamp falls within `start..=end`
///
/// Records whose timestamp does not parse never match.
pub fn timestamp_between(
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> impl Fn(&CandidateRecord) -> bool {
    move |record| {
        parse_timestamp(&record.timestamp).map(|ts| ts >= start && ts <= end).unwrap_or(false)
    }
}

/// Parse a listing timestamp such as "2024-01-19 10:27"
pub fn parse_timestamp(timestamp: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()
}
