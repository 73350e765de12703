use std::collections::HashMap;

use rockwell_protocol::define_id;

use crate::predicate::Predicate;

define_id!(RuleId, "Position of a compiled rule within its rule set.");

/// How many consecutive units an element consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    One,
    /// Zero or one
    Optional,
    /// One or more, adjacent
    Repeat,
    /// One or more, joined by conjunction or comma tokens
    Chain,
}

/// What one element matches at a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unit {
    Token(Predicate),
    /// Another rule, anchored at the current position
    Rule(RuleId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffixPosition {
    Prefix,
    Infix,
    Suffix,
}

/// A sub-rule matched against the tokens around (or inside) a head match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affix {
    pub position: AffixPosition,
    pub rule: RuleId,
    /// Must consume its whole window. Infixes are always complete.
    pub complete: bool,
    /// A failed optional affix leaves the head match as it is.
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Unit { unit: Unit, quantifier: Quantifier },
    Infix(Affix),
}

/// One alternative of a rule: a token sequence with optional affixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub prefix: Option<Affix>,
    pub elements: Vec<Element>,
    pub suffix: Option<Affix>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub id: RuleId,
    pub label: String,
    /// 1-based line in the script source
    pub line: usize,
    pub groups: Vec<Group>,
}

/// Compiled, immutable rules in source order, addressable by label.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub(crate) rules: Vec<Rule>,
    pub(crate) labels: HashMap<String, RuleId>,
}

impl RuleSet {
    pub fn rule(&self, label: &str) -> Option<&Rule> {
        self.labels.get(label).and_then(|id| self.get(*id))
    }

    pub fn get(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(id.get())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
