use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Coarse word class, derived from a fine-grained (Penn-style) POS tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CoarseType {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Number,
    Determiner,
    Pronoun,
    Preposition,
    Conjunction,
    Possessive,
    Punctuation,
    Currency,
    Other,
}

impl CoarseType {
    /// Maps a fine POS tag onto its coarse class.
    pub fn from_pos(pos: &str) -> Self {
        match pos {
            "MD" => CoarseType::Verb,
            "CD" => CoarseType::Number,
            "DT" | "PDT" | "WDT" => CoarseType::Determiner,
            "IN" | "TO" => CoarseType::Preposition,
            "CC" => CoarseType::Conjunction,
            "POS" => CoarseType::Possessive,
            "$" | "#" => CoarseType::Currency,
            "WRB" => CoarseType::Adverb,
            "." | "," | ":" | "``" | "''" | "-LRB-" | "-RRB-" | "HYPH" => CoarseType::Punctuation,
            _ if pos.starts_with("NN") => CoarseType::Noun,
            _ if pos.starts_with("VB") => CoarseType::Verb,
            _ if pos.starts_with("JJ") => CoarseType::Adjective,
            _ if pos.starts_with("RB") => CoarseType::Adverb,
            _ if pos.starts_with("PRP") || pos.starts_with("WP") => CoarseType::Pronoun,
            _ => CoarseType::Other,
        }
    }

    /// Lowercase name used by the `type` address of rule scripts.
    pub fn as_str(&self) -> &'static str {
        match self {
            CoarseType::Noun => "noun",
            CoarseType::Verb => "verb",
            CoarseType::Adjective => "adjective",
            CoarseType::Adverb => "adverb",
            CoarseType::Number => "number",
            CoarseType::Determiner => "determiner",
            CoarseType::Pronoun => "pronoun",
            CoarseType::Preposition => "preposition",
            CoarseType::Conjunction => "conjunction",
            CoarseType::Possessive => "possessive",
            CoarseType::Punctuation => "punctuation",
            CoarseType::Currency => "currency",
            CoarseType::Other => "other",
        }
    }
}

bitflags! {
    /// Entity families the NER layer is allowed to run.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct NerFlags: u32 {
        const PERSONS = 1;
        const ORGANIZATIONS = 2;
        const DATES = 4;
        const CURRENCIES = 8;
        const PERCENTAGES = 16;
        const QUANTITIES = 32;
        const NUMBERS = 64;

        const NUMERIC = Self::CURRENCIES.bits()
            | Self::PERCENTAGES.bits()
            | Self::QUANTITIES.bits()
            | Self::NUMBERS.bits();
    }
}

impl NerFlags {
    /// Parses a single lowercase family name (`persons`, `dates`, ...).
    pub fn from_family(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "persons" | "person" => Some(NerFlags::PERSONS),
            "organizations" | "organization" | "orgs" => Some(NerFlags::ORGANIZATIONS),
            "dates" | "date" => Some(NerFlags::DATES),
            "currencies" | "currency" => Some(NerFlags::CURRENCIES),
            "percentages" | "percentage" => Some(NerFlags::PERCENTAGES),
            "quantities" | "quantity" => Some(NerFlags::QUANTITIES),
            "numbers" | "number" => Some(NerFlags::NUMBERS),
            "numeric" => Some(NerFlags::NUMERIC),
            "all" => Some(NerFlags::all()),
            _ => None,
        }
    }
}
