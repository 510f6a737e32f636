//! Overlap resolution
//!
//! Greedy interval scheduling over a covered-position array. Cost is
//! O(n·k) for n candidates of average length k, which is fine for log-line
//! sized inputs; oversized inputs never reach here.

use crate::domain::errors::PhiGuardError;
use crate::domain::result::Result;
use crate::sanitization::models::{CandidateSpan, ResolvedSpan};
use std::cmp::Ordering;

/// Total order used to pick winners: priority desc, length desc, start asc,
/// source name asc
fn precedence(a: &CandidateSpan, b: &CandidateSpan) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| b.length.cmp(&a.length))
        .then_with(|| a.start.cmp(&b.start))
        .then_with(|| a.source_name.cmp(&b.source_name))
}

/// Reduce candidates to a disjoint list ordered by start
///
/// # Errors
///
/// Returns [`PhiGuardError::Sanitization`] when a candidate has
/// `start > end` or `end > text_len`.
pub fn resolve(mut candidates: Vec<CandidateSpan>, text_len: usize) -> Result<Vec<ResolvedSpan>> {
    if let Some(bad) = candidates
        .iter()
        .find(|c| c.start > c.end || c.end > text_len)
    {
        return Err(PhiGuardError::sanitization(format!(
            "span {}..{} from '{}' is outside text of length {text_len}",
            bad.start, bad.end, bad.source_name
        )));
    }

    candidates.sort_by(precedence);

    let mut covered = vec![false; text_len];
    let mut accepted = Vec::new();

    for candidate in candidates {
        let range = candidate.start..candidate.end;
        if range.is_empty() || covered[range.clone()].iter().any(|&c| c) {
            continue;
        }
        covered[range].iter_mut().for_each(|c| *c = true);
        accepted.push(ResolvedSpan::accept(candidate));
    }

    accepted.sort_by_key(ResolvedSpan::start);
    Ok(accepted)
}
