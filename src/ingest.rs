//! Batch match ingestion
//!
//! Parses uploaded text where each line encodes one match as
//! `<dish1><score1><dish2><score2>`, scores being the single characters
//! `0`/`1` with exactly one winner. Lines that fail the grammar are
//! rejected individually (skip-and-warn); a batch is never failed as a
//! whole by bad lines.

use crate::rating::store::RatingStore;
use crate::types::{DishId, MatchOutcome, MatchRecord};
use tracing::warn;

/// A line that failed parsing or validation, with enough context for a
/// human to fix the source data
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedLine {
    pub line_number: usize,
    pub line: String,
    pub reason: String,
}

/// A successfully parsed match, tagged with its source line
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMatch {
    pub line_number: usize,
    pub winner: DishId,
    pub loser: DishId,
}

/// Outcome of parsing a whole upload
#[derive(Debug, Clone, Default)]
pub struct ParsedBatch {
    pub matches: Vec<ParsedMatch>,
    pub rejected: Vec<RejectedLine>,
}

/// Result of applying a parsed batch to the store
#[derive(Debug, Clone, Default)]
pub struct IngestSummary {
    pub outcomes: Vec<MatchOutcome>,
    pub rejected: Vec<RejectedLine>,
}

/// Parse one match line into `(winner, loser)`.
///
/// The score characters split the line non-greedily: the second score is
/// the final character, the first score is the earliest `0`/`1` that
/// leaves both dish names non-empty.
pub fn parse_match_line(line: &str) -> Result<(DishId, DishId), String> {
    let (second_score_at, second_score) = line
        .char_indices()
        .last()
        .filter(|(_, c)| *c == '0' || *c == '1')
        .ok_or_else(|| "line does not end with a 0/1 score".to_string())?;

    let body = &line[..second_score_at];
    let (first_score_at, first_score) = body
        .char_indices()
        .find(|(i, c)| (*c == '0' || *c == '1') && *i > 0 && i + c.len_utf8() < body.len())
        .ok_or_else(|| "no score separating two dish names".to_string())?;

    let dish1 = &line[..first_score_at];
    let dish2 = &line[first_score_at + first_score.len_utf8()..second_score_at];

    match (first_score, second_score) {
        ('1', '0') => Ok((dish1.to_string(), dish2.to_string())),
        ('0', '1') => Ok((dish2.to_string(), dish1.to_string())),
        _ => Err(format!(
            "scores must name exactly one winner, got {first_score} and {second_score}"
        )),
    }
}

/// Parse every non-blank line of an upload, collecting rejections.
///
/// Rejections are warned about with their line number so the source file
/// can be corrected; they never abort the batch.
pub fn parse_batch(content: &str) -> ParsedBatch {
    let mut batch = ParsedBatch::default();

    for (index, raw_line) in content.lines().enumerate() {
        let line_number = index + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_match_line(line) {
            Ok((winner, loser)) => batch.matches.push(ParsedMatch {
                line_number,
                winner,
                loser,
            }),
            Err(reason) => {
                warn!("Skipping line {}: {} ({})", line_number, reason, line);
                batch.rejected.push(RejectedLine {
                    line_number,
                    line: line.to_string(),
                    reason,
                });
            }
        }
    }

    batch
}

/// Parse an upload and apply every valid match to the store.
///
/// Each applied match appends a record to `history`. A match whose two
/// sides normalize to the same identity is rejected like a malformed
/// line; everything else either applies cleanly or was already rejected
/// at parse time, so the caller can persist unconditionally afterwards.
pub fn ingest(
    store: &mut RatingStore,
    history: &mut Vec<MatchRecord>,
    content: &str,
    k: f64,
) -> IngestSummary {
    let batch = parse_batch(content);

    let mut summary = IngestSummary {
        outcomes: Vec::with_capacity(batch.matches.len()),
        rejected: batch.rejected,
    };

    for parsed in batch.matches {
        match store.record_match(&parsed.winner, &parsed.loser, k) {
            Ok(outcome) => {
                history.push(MatchRecord::new(
                    outcome.winner.clone(),
                    outcome.loser.clone(),
                ));
                summary.outcomes.push(outcome);
            }
            Err(err) => {
                warn!("Skipping line {}: {}", parsed.line_number, err);
                summary.rejected.push(RejectedLine {
                    line_number: parsed.line_number,
                    line: format!("{}1{}0", parsed.winner, parsed.loser),
                    reason: err.to_string(),
                });
            }
        }
    }

    summary
}
