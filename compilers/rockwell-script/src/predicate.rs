use rockwell_protocol::{Reading, Token};

/// The token attribute a test reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Address {
    /// Surface form, case-insensitive
    Word,
    Lemma,
    /// Pre-contraction form, falling back to the surface form
    Cain,
    /// Fine-grained part-of-speech tag, case-sensitive
    Pos,
    /// Coarse type of a reading, or the synthesized type of a composite
    Type,
    Role,
}

impl Address {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "word" => Some(Address::Word),
            "lemma" => Some(Address::Lemma),
            "cain" => Some(Address::Cain),
            "pos" => Some(Address::Pos),
            "type" => Some(Address::Type),
            "role" => Some(Address::Role),
            _ => None,
        }
    }

    fn is_case_sensitive(self) -> bool {
        matches!(self, Address::Pos)
    }

    /// Whether the attribute belongs to a reading rather than the token.
    fn reads_reading(self, token: &Token) -> bool {
        match self {
            Address::Pos | Address::Lemma => true,
            Address::Type => !token.is_composite(),
            Address::Word | Address::Cain | Address::Role => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Exact(String),
    /// Written with a trailing `*`
    Prefix(String),
}

impl Pattern {
    fn matches(&self, value: &str) -> bool {
        match self {
            Pattern::Exact(expected) => value == expected,
            Pattern::Prefix(prefix) => value.starts_with(prefix.as_str()),
        }
    }
}

/// Any-of list of patterns, optionally negated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSet {
    pub negated: bool,
    pub patterns: Vec<Pattern>,
}

impl ValueSet {
    pub fn new(address: Address, negated: bool, values: &[String]) -> Self {
        let patterns = values
            .iter()
            .map(|raw| {
                let value = if address.is_case_sensitive() {
                    raw.clone()
                } else {
                    raw.to_lowercase()
                };
                match value.strip_suffix('*') {
                    Some(prefix) if !prefix.is_empty() => Pattern::Prefix(prefix.to_string()),
                    _ => Pattern::Exact(value),
                }
            })
            .collect();

        Self { negated, patterns }
    }

    fn accepts(&self, value: Option<&str>) -> bool {
        let hit = value.is_some_and(|v| self.patterns.iter().any(|p| p.matches(v)));
        hit != self.negated
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Test {
    pub address: Address,
    pub values: ValueSet,
}

impl Test {
    fn normalise(&self, value: &str) -> String {
        if self.address.is_case_sensitive() {
            value.to_string()
        } else {
            value.to_lowercase()
        }
    }

    /// Evaluates a token-level attribute.
    fn on_token(&self, token: &Token) -> bool {
        let value = match self.address {
            Address::Word => Some(token.word()),
            Address::Cain => Some(token.cain().unwrap_or(token.word())),
            Address::Role => token.role(),
            Address::Type => token.composite_kind(),
            Address::Pos | Address::Lemma => None,
        };
        self.values.accepts(value.map(|v| self.normalise(v)).as_deref())
    }

    /// Evaluates a reading-level attribute.
    fn on_reading(&self, reading: &Reading) -> bool {
        let value = match self.address {
            Address::Pos => reading.pos.as_str(),
            Address::Lemma => reading.lemma.as_str(),
            Address::Type => reading.coarse_type().as_str(),
            Address::Word | Address::Cain | Address::Role => return false,
        };
        self.values.accepts(Some(&self.normalise(value)))
    }
}

/// Conjunction of tests applied to one token position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub tests: Vec<Test>,
}

impl Predicate {
    pub fn new(tests: Vec<Test>) -> Self {
        Self { tests }
    }

    /// True when every token-level test holds and some single reading
    /// satisfies every reading-level test. The token is never modified.
    pub fn matches(&self, token: &Token) -> bool {
        let (reading_tests, token_tests): (Vec<&Test>, Vec<&Test>) = self
            .tests
            .iter()
            .partition(|test| test.address.reads_reading(token));

        if !token_tests.iter().all(|test| test.on_token(token)) {
            return false;
        }
        if reading_tests.is_empty() {
            return true;
        }

        let fallback;
        let readings = match token.readings() {
            [] => {
                // Unanalysed word: empty POS, lemma is the lowercased surface
                fallback = [Reading::new("", token.word().to_lowercase())];
                &fallback[..]
            }
            readings => readings,
        };

        readings
            .iter()
            .any(|reading| reading_tests.iter().all(|test| test.on_reading(reading)))
    }
}
