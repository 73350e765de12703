use core::fmt;

use crate::ids::TokenIndex;
use crate::morphology::CoarseType;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("token '{word}' has no reading with POS '{pos}'")]
    UnknownReading { word: String, pos: String },
    #[error("a composite token needs at least one constituent")]
    EmptyComposite,
}

/// One admissible (part-of-speech, lemma) interpretation of a word.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reading {
    pub pos: String,
    pub lemma: String,
}

impl Reading {
    pub fn new(pos: impl Into<String>, lemma: impl Into<String>) -> Self {
        Self {
            pos: pos.into(),
            lemma: lemma.into(),
        }
    }

    pub fn coarse_type(&self) -> CoarseType {
        CoarseType::from_pos(&self.pos)
    }
}

/// A word as produced by tokenization and lemmatization.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlainToken {
    pub word: String,
    pub readings: Vec<Reading>,
    /// Position in `readings` once the token has been disambiguated.
    pub selected: Option<usize>,
    /// Surface form before contraction expansion ("n't" for "not").
    pub cain: Option<String>,
    pub index: TokenIndex,
    pub role: Option<String>,
}

impl PlainToken {
    pub fn new(index: usize, word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            readings: Vec::new(),
            selected: None,
            cain: None,
            index: TokenIndex::from_position(index),
            role: None,
        }
    }

    pub fn with_reading(mut self, pos: impl Into<String>, lemma: impl Into<String>) -> Self {
        self.readings.push(Reading::new(pos, lemma));
        self
    }

    pub fn with_cain(mut self, cain: impl Into<String>) -> Self {
        self.cain = Some(cain.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn is_ambiguous(&self) -> bool {
        self.selected.is_none() && self.readings.len() > 1
    }

    /// Returns a copy of this token committed to the first reading with `pos`.
    pub fn select(&self, pos: &str) -> Result<PlainToken, ProtocolError> {
        let position = self
            .readings
            .iter()
            .position(|r| r.pos == pos)
            .ok_or_else(|| ProtocolError::UnknownReading {
                word: self.word.clone(),
                pos: pos.to_string(),
            })?;

        Ok(PlainToken {
            selected: Some(position),
            ..self.clone()
        })
    }

    /// The readings a predicate may test: the selected one, or all of them.
    pub fn active_readings(&self) -> &[Reading] {
        match self.selected {
            Some(i) => self.readings.get(i..=i).unwrap_or(self.readings.as_slice()),
            None => &self.readings,
        }
    }
}

/// A merged span of tokens carrying the role of the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompositeToken {
    pub word: String,
    pub parts: Vec<Token>,
    pub role: String,
    pub kind: String,
}

impl CompositeToken {
    pub fn new(
        parts: Vec<Token>,
        role: impl Into<String>,
        kind: impl Into<String>,
    ) -> Result<Self, ProtocolError> {
        if parts.is_empty() {
            return Err(ProtocolError::EmptyComposite);
        }

        let word = parts
            .iter()
            .map(Token::word)
            .collect::<Vec<_>>()
            .join(" ");

        Ok(Self {
            word,
            parts,
            role: role.into(),
            kind: kind.into().to_lowercase(),
        })
    }
}

/// A token position in a sentence: either an original word or a composite.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "token", rename_all = "lowercase"))]
pub enum Token {
    Plain(PlainToken),
    Composite(CompositeToken),
}

impl Token {
    pub fn word(&self) -> &str {
        match self {
            Token::Plain(t) => &t.word,
            Token::Composite(c) => &c.word,
        }
    }

    pub fn role(&self) -> Option<&str> {
        match self {
            Token::Plain(t) => t.role.as_deref(),
            Token::Composite(c) => Some(&c.role),
        }
    }

    pub fn cain(&self) -> Option<&str> {
        match self {
            Token::Plain(t) => t.cain.as_deref(),
            Token::Composite(_) => None,
        }
    }

    /// Readings visible to predicates. A composite exposes its last
    /// constituent's readings.
    pub fn readings(&self) -> &[Reading] {
        match self {
            Token::Plain(t) => t.active_readings(),
            Token::Composite(c) => c.parts.last().map_or(&[][..], Token::readings),
        }
    }

    /// Synthesized type of a composite token; plain tokens derive theirs
    /// per reading.
    pub fn composite_kind(&self) -> Option<&str> {
        match self {
            Token::Plain(_) => None,
            Token::Composite(c) => Some(&c.kind),
        }
    }

    /// Type name of the token: the synthesized kind of a composite, or the
    /// coarse class of a resolved plain token. `None` while ambiguous.
    pub fn coarse_type(&self) -> Option<&str> {
        match self {
            Token::Plain(t) => match t.active_readings() {
                [only] => Some(only.coarse_type().as_str()),
                _ => None,
            },
            Token::Composite(c) => Some(&c.kind),
        }
    }

    pub fn first_index(&self) -> TokenIndex {
        match self {
            Token::Plain(t) => t.index,
            Token::Composite(c) => c
                .parts
                .first()
                .map_or(TokenIndex::new(0), Token::first_index),
        }
    }

    pub fn last_index(&self) -> TokenIndex {
        match self {
            Token::Plain(t) => t.index,
            Token::Composite(c) => c
                .parts
                .last()
                .map_or(TokenIndex::new(0), Token::last_index),
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Token::Composite(_))
    }
}

impl From<PlainToken> for Token {
    fn from(token: PlainToken) -> Self {
        Token::Plain(token)
    }
}

impl From<CompositeToken> for Token {
    fn from(token: CompositeToken) -> Self {
        Token::Composite(token)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Plain(t) => match t.active_readings() {
                [] => write!(f, "{}", t.word),
                [only] => write!(f, "{}/{}", t.word, only.pos),
                many => {
                    let tags: Vec<&str> = many.iter().map(|r| r.pos.as_str()).collect();
                    write!(f, "{}/{}", t.word, tags.join("|"))
                }
            },
            Token::Composite(c) => write!(f, "[{} :{}]", c.word, c.role),
        }
    }
}

/// A labeled span of original token indices, both ends inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tag {
    pub start: usize,
    pub end: usize,
    pub label: String,
}

impl Tag {
    pub fn new(start: usize, end: usize, label: impl Into<String>) -> Self {
        debug_assert!(start <= end, "tag start {start} after end {end}");
        Self {
            start,
            end,
            label: label.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn same_span(&self, other: &Tag) -> bool {
        self.start == other.start && self.end == other.end
    }

    /// True when `self` covers `other` and is larger on at least one side.
    pub fn strictly_contains(&self, other: &Tag) -> bool {
        self.start <= other.start
            && self.end >= other.end
            && (self.start < other.start || self.end > other.end)
    }

    pub fn overlaps(&self, other: &Tag) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self.label, self.start, self.end)
    }
}
