//! Line Parser — turns raw feed lines into [`ParsedEntry`] records.
//!
//! The feeds vigil consumes are loosely structured plaintext. The documented
//! line grammar, in precedence order:
//!
//! 1. Blank lines and lines starting with `#` or `//` are skipped.
//! 2. If the line contains the literal delimiter `" : "`, the payload is
//!    everything after the first occurrence (some feeds prefix a row label).
//! 3. The payload splits on the literal delimiter `" # "`: the left side is
//!    the address token (trimmed), the right side starts with a
//!    whitespace-delimited integer Unix timestamp; any trailing tokens on
//!    that side (`UTC`, tool tags, …) are ignored.
//!
//! Every line resolves to either a [`ParsedEntry`] or a typed
//! [`SkipReason`]; one malformed line never aborts the batch.

use crate::types::{ParsedEntry, SkipReason};

/// Parse one raw feed line.
pub fn parse_line(line: &str) -> Result<ParsedEntry, SkipReason> {
    let line = line.trim();
    if line.is_empty() {
        return Err(SkipReason::Blank);
    }
    if line.starts_with('#') || line.starts_with("//") {
        return Err(SkipReason::Comment);
    }

    // Row-label prefix: "label : <address> # <ts>".
    let payload = match line.split_once(" : ") {
        Some((_, rest)) => rest,
        None => line,
    };

    let (address_token, date_part) = payload
        .split_once(" # ")
        .ok_or(SkipReason::MissingTimestamp)?;

    let ts_token = date_part
        .split_whitespace()
        .next()
        .ok_or(SkipReason::MissingTimestamp)?;
    let secs: i64 = ts_token
        .parse()
        .map_err(|_| SkipReason::BadTimestamp(ts_token.to_string()))?;
    let observed_at = chrono::DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| SkipReason::BadTimestamp(ts_token.to_string()))?;

    let address_token = address_token.trim();
    let address = address_token
        .parse()
        .map_err(|_| SkipReason::BadAddress(address_token.to_string()))?;

    Ok(ParsedEntry {
        address,
        observed_at,
    })
}

/// Per-body tally of skipped lines, split so tests and log lines can tell
/// expected noise (blanks, comments) from malformed input.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SkipTally {
    pub blank: usize,
    pub comment: usize,
    pub malformed: usize,
}

impl SkipTally {
    pub fn total(&self) -> usize {
        self.blank + self.comment + self.malformed
    }
}

/// Result of parsing one whole feed body: entries in line order plus the
/// skip tally.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedBody {
    pub entries: Vec<ParsedEntry>,
    pub skipped: SkipTally,
}

/// Parse every line of a feed body. Malformed lines are logged at warning
/// level and counted; the batch always completes.
pub fn parse_body(contents: &str) -> ParsedBody {
    let mut body = ParsedBody::default();
    for line in contents.lines() {
        match parse_line(line) {
            Ok(entry) => body.entries.push(entry),
            Err(SkipReason::Blank) => body.skipped.blank += 1,
            Err(SkipReason::Comment) => body.skipped.comment += 1,
            Err(reason) => {
                body.skipped.malformed += 1;
                tracing::warn!(%reason, line, "skipping malformed feed line");
            }
        }
    }
    tracing::debug!(
        parsed = body.entries.len(),
        malformed = body.skipped.malformed,
        "parsed feed body"
    );
    body
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
