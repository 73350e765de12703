use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use rockwell_protocol::{Tag, Token};
use rockwell_script::{Affix, AffixPosition, Element, Group, Quantifier, RuleId, RuleSet, Unit};
use tracing::{trace, warn};

use crate::affix as policy;
use crate::span::Span;

/// Words that join the units of a `chain`. Any `CC` token does too.
const SEPARATORS: &[&str] = &[",", "and", "or", "nor", "&"];

fn is_separator(token: &Token) -> bool {
    if token.is_composite() {
        return false;
    }
    let word = token.word().to_lowercase();
    SEPARATORS.contains(&word.as_str()) || token.readings().iter().any(|r| r.pos == "CC")
}

/// Which evaluation of a rule a result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Mode {
    /// Every start offset of the window.
    Free,
    /// Only heads starting at the window start.
    Anchored,
}

type Key = (RuleId, Mode, Span, usize);

/// One matching pass over a token slice.
///
/// Every rule evaluation is keyed by (rule, window). A rule re-entered on
/// the window it is already being evaluated on cannot consume anything new,
/// so that evaluation yields no match instead of recursing.
///
/// Results are memoised per (rule, mode, window, depth), but only when no
/// re-entry or depth cut happened while computing them: a cut result
/// depends on the enclosing evaluations.
pub(crate) struct Matcher<'a> {
    rules: &'a RuleSet,
    tokens: &'a [Token],
    max_depth: usize,
    active: RefCell<Vec<(RuleId, Span)>>,
    memo: RefCell<HashMap<Key, Vec<Span>>>,
    cuts: Cell<usize>,
}

impl<'a> Matcher<'a> {
    pub(crate) fn new(rules: &'a RuleSet, tokens: &'a [Token], max_depth: usize) -> Self {
        Self {
            rules,
            tokens,
            max_depth,
            active: RefCell::new(Vec::new()),
            memo: RefCell::new(HashMap::new()),
            cuts: Cell::new(0),
        }
    }

    /// Converts a slice span to original token indices.
    pub(crate) fn tag(&self, span: Span, label: &str) -> Tag {
        debug_assert!(!span.is_empty() && span.end <= self.tokens.len());
        let start = self.tokens[span.start].first_index().get();
        let end = self.tokens[span.end - 1].last_index().get();
        Tag::new(start, end, label)
    }

    /// All matches of a rule inside `window`, from its first matching group.
    pub(crate) fn spans(&self, id: RuleId, window: Span, depth: usize) -> Vec<Span> {
        self.evaluate(id, Mode::Free, window, depth)
    }

    /// Matches of a rule whose head starts at `window.start`, from the first
    /// group that matches there.
    fn anchored(&self, id: RuleId, window: Span, depth: usize) -> Vec<Span> {
        self.evaluate(id, Mode::Anchored, window, depth)
    }

    fn evaluate(&self, id: RuleId, mode: Mode, window: Span, depth: usize) -> Vec<Span> {
        debug_assert!(
            window.start <= window.end && window.end <= self.tokens.len(),
            "window {window:?} outside {} tokens",
            self.tokens.len()
        );
        let Some(rule) = self.rules.get(id) else {
            return Vec::new();
        };
        if depth > self.max_depth {
            warn!(rule = %rule.label, depth, "rule nesting exceeds depth bound; no match");
            self.cuts.set(self.cuts.get() + 1);
            return Vec::new();
        }
        if self.active.borrow().contains(&(id, window)) {
            trace!(rule = %rule.label, ?window, "rule re-entered on the same window");
            self.cuts.set(self.cuts.get() + 1);
            return Vec::new();
        }

        let key = (id, mode, window, depth);
        if let Some(cached) = self.memo.borrow().get(&key) {
            return cached.clone();
        }

        let cuts_before = self.cuts.get();
        self.active.borrow_mut().push((id, window));
        let starts = match mode {
            Mode::Free => window.start..window.end,
            Mode::Anchored => window.start..window.start + usize::from(!window.is_empty()),
        };
        let mut spans = Vec::new();
        for group in &rule.groups {
            for start in starts.clone() {
                if let Some(span) = self.group_at(group, start, window, depth) {
                    if !spans.contains(&span) {
                        spans.push(span);
                    }
                }
            }
            if !spans.is_empty() {
                break;
            }
        }
        self.active.borrow_mut().pop();

        if self.cuts.get() == cuts_before {
            self.memo.borrow_mut().insert(key, spans.clone());
        }
        spans
    }

    /// Matches one group with its head starting at `start`, then extends the
    /// head with the group's prefix and suffix.
    fn group_at(&self, group: &Group, start: usize, window: Span, depth: usize) -> Option<Span> {
        // 1. Head
        let end = self.sequence(&group.elements, start, window, depth)?;
        if end <= start {
            return None;
        }
        let mut span = Span::new(start, end);

        // 2. Prefix
        if let Some(prefix) = &group.prefix {
            match self.affix(prefix, Span::new(window.start, start), depth) {
                Some(found) => span.start = found.start,
                None if prefix.optional => {}
                None => return None,
            }
        }

        // 3. Suffix
        if let Some(suffix) = &group.suffix {
            match self.affix(suffix, Span::new(end, window.end), depth) {
                Some(found) => span.end = found.end,
                None if suffix.optional => {}
                None => return None,
            }
        }

        Some(span)
    }

    fn affix(&self, affix: &Affix, window: Span, depth: usize) -> Option<Span> {
        if window.is_empty() {
            trace!(position = ?affix.position, "empty affix window");
            return None;
        }

        let candidates = self.spans(affix.rule, window, depth + 1);
        let accepted = match affix.position {
            _ if affix.complete => policy::exact(&candidates, window),
            AffixPosition::Prefix => policy::prefix(&candidates, window),
            AffixPosition::Suffix => policy::suffix(&candidates, window),
            AffixPosition::Infix => policy::exact(&candidates, window),
        };

        trace!(
            position = ?affix.position,
            ?window,
            candidates = candidates.len(),
            ?accepted,
            "affix evaluated"
        );
        accepted
    }

    /// Matches `elements` from `pos`, returning where the first successful
    /// alignment ends. Longer runs are tried before shorter ones.
    fn sequence(&self, elements: &[Element], pos: usize, window: Span, depth: usize) -> Option<usize> {
        let Some((first, rest)) = elements.split_first() else {
            return Some(pos);
        };

        match first {
            Element::Unit { unit, quantifier } => self
                .runs(unit, *quantifier, pos, window, depth)
                .into_iter()
                .find_map(|end| self.sequence(rest, end, window, depth)),
            Element::Infix(infix) => {
                if infix.optional {
                    if let Some(end) = self.sequence(rest, pos, window, depth) {
                        return Some(end);
                    }
                }
                (pos + 1..=window.end).find_map(|gap_end| {
                    self.affix(infix, Span::new(pos, gap_end), depth)?;
                    self.sequence(rest, gap_end, window, depth)
                })
            }
        }
    }

    /// End positions a quantified unit can reach from `pos`, longest first.
    fn runs(&self, unit: &Unit, quantifier: Quantifier, pos: usize, window: Span, depth: usize) -> Vec<usize> {
        match quantifier {
            Quantifier::One => self.unit_ends(unit, pos, window, depth),
            Quantifier::Optional => {
                let mut ends = self.unit_ends(unit, pos, window, depth);
                ends.push(pos);
                ends
            }
            Quantifier::Repeat => self.closure(unit, pos, window, depth, false),
            Quantifier::Chain => self.closure(unit, pos, window, depth, true),
        }
    }

    /// One or more units, adjacent or joined by separators.
    fn closure(&self, unit: &Unit, pos: usize, window: Span, depth: usize, chained: bool) -> Vec<usize> {
        let mut reached: Vec<usize> = Vec::new();
        let mut frontier = self.unit_ends(unit, pos, window, depth);

        while let Some(end) = frontier.pop() {
            if reached.contains(&end) {
                continue;
            }
            reached.push(end);

            if chained {
                // Separators may stack: ", and"
                let mut next = end;
                while next < window.end && is_separator(&self.tokens[next]) {
                    next += 1;
                    frontier.extend(self.unit_ends(unit, next, window, depth));
                }
            } else {
                frontier.extend(self.unit_ends(unit, end, window, depth));
            }
        }

        reached.sort_unstable_by(|a, b| b.cmp(a));
        reached
    }

    /// Where a single unit starting at `pos` can end, longest first. Every
    /// end is past `pos`.
    fn unit_ends(&self, unit: &Unit, pos: usize, window: Span, depth: usize) -> Vec<usize> {
        if pos >= window.end {
            return Vec::new();
        }

        match unit {
            Unit::Token(predicate) => {
                if predicate.matches(&self.tokens[pos]) {
                    vec![pos + 1]
                } else {
                    Vec::new()
                }
            }
            Unit::Rule(id) => {
                let mut ends: Vec<usize> = self
                    .anchored(*id, Span::new(pos, window.end), depth + 1)
                    .into_iter()
                    .filter(|span| span.start == pos)
                    .map(|span| span.end)
                    .collect();
                ends.sort_unstable_by(|a, b| b.cmp(a));
                ends.dedup();
                ends
            }
        }
    }
}
