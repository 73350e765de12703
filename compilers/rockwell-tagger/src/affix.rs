//! Acceptance policies for affix candidates.
//!
//! Candidates are the matches of the affix rule inside its window, in the
//! order the matcher found them (ascending start offset).

use crate::consolidate::reduce_contained;
use crate::span::Span;

/// Complete affixes and infixes: the candidate must be the window itself.
pub(crate) fn exact(candidates: &[Span], window: Span) -> Option<Span> {
    if window.is_empty() {
        return None;
    }
    candidates.iter().copied().find(|c| *c == window)
}

/// Incomplete prefix: widest reach wins, and it must touch the head.
///
/// Starting from the first candidate, any candidate that starts earlier or
/// ends later replaces the current best. The result is accepted only when it
/// ends exactly where the window ends.
pub(crate) fn prefix(candidates: &[Span], window: Span) -> Option<Span> {
    if window.is_empty() {
        return None;
    }
    let (first, rest) = candidates.split_first()?;

    let mut best = *first;
    for candidate in rest {
        if candidate.start < best.start || candidate.end > best.end {
            best = *candidate;
        }
    }

    (best.end == window.end).then_some(best)
}

/// Incomplete suffix: reduce by strict containment, then take the first
/// survivor that starts right after the head.
pub(crate) fn suffix(candidates: &[Span], window: Span) -> Option<Span> {
    if window.is_empty() {
        return None;
    }
    reduce_contained(candidates.iter().copied())
        .into_iter()
        .find(|c| c.start == window.start)
}
