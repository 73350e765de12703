use rockwell_lexicon::Resources;
use rockwell_protocol::{Tag, Token};
use serde::Serialize;

const APPROXIMATIONS: &[&str] = &["cca", "ca", "approx", "approximately", "about", "around", "~"];
const PERCENT_WORDS: &[&str] = &["%", "percent", "pct"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericKind {
    Plain,
    Currency,
    Percentage,
    Quantity,
}

impl NumericKind {
    /// Type and role given to the composite token of this expression.
    pub fn as_str(self) -> &'static str {
        match self {
            NumericKind::Plain => "number",
            NumericKind::Currency => "currency",
            NumericKind::Percentage => "percentage",
            NumericKind::Quantity => "quantity",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Plus,
    Minus,
    PlusMinus,
}

impl Sign {
    fn from_word(word: &str) -> Option<Self> {
        match word.to_lowercase().as_str() {
            "+" | "plus" => Some(Sign::Plus),
            "-" | "minus" => Some(Sign::Minus),
            "±" => Some(Sign::PlusMinus),
            _ => None,
        }
    }
}

/// One numeric expression, in original token indices (both inclusive).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSpan {
    pub start: usize,
    pub end: usize,
    pub kind: NumericKind,
    /// Parsed magnitude with the sign applied; `None` for non-digit numerals.
    pub value: Option<f64>,
    pub sign: Option<Sign>,
    pub approximate: bool,
}

impl NumericSpan {
    pub fn tag(&self) -> Tag {
        Tag::new(self.start, self.end, self.kind.as_str())
    }
}

/// Reads "1,000.50", "3,5" or "15" as a number.
///
/// A lone `,` or `.` followed by exactly three digits groups thousands;
/// otherwise the last separator is the decimal point.
pub fn parse_value(text: &str) -> Option<f64> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.') {
        return None;
    }

    let is_separator = |c: char| c == ',' || c == '.';
    let normalised = match text.rfind(is_separator) {
        None => text.to_string(),
        Some(at) => {
            let (whole, fraction) = (&text[..at], &text[at + 1..]);
            let separator = char::from(text.as_bytes()[at]);
            let lone = !whole.contains(is_separator);
            let repeated = whole.contains(separator);
            if fraction.len() == 3 && (lone || repeated) {
                text.replace(is_separator, "")
            } else {
                format!("{}.{}", whole.replace(is_separator, ""), fraction)
            }
        }
    };
    normalised.parse().ok()
}

/// Finds numeric expressions: an optional approximation marker, an optional
/// sign, a number, and a currency, percent or unit word on either side.
pub struct NumericRecognizer<'a> {
    resources: &'a Resources,
}

impl<'a> NumericRecognizer<'a> {
    pub fn new(resources: &'a Resources) -> Self {
        Self { resources }
    }

    pub fn recognize(&self, tokens: &[Token]) -> Vec<NumericSpan> {
        let mut spans = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            match self.expression_at(tokens, i) {
                Some((span, next)) => {
                    spans.push(span);
                    i = next;
                }
                None => i += 1,
            }
        }
        spans
    }

    fn is_currency(&self, token: &Token) -> bool {
        !token.is_composite() && self.resources.currencies.contains(token.word())
    }

    fn is_unit(&self, token: &Token) -> bool {
        !token.is_composite() && self.resources.units.contains(token.word())
    }

    /// Matches one expression starting at `start`; returns it and the
    /// position right after it.
    fn expression_at(&self, tokens: &[Token], start: usize) -> Option<(NumericSpan, usize)> {
        let word_at = |i: usize| tokens.get(i).filter(|t| !t.is_composite()).map(Token::word);
        let mut i = start;

        // 1. Approximation marker, optionally abbreviated with a period
        let approximate = word_at(i).is_some_and(|w| APPROXIMATIONS.contains(&w.to_lowercase().as_str()));
        if approximate {
            i += 1;
            if word_at(i) == Some(".") {
                i += 1;
            }
        }

        // 2. Sign
        let sign = word_at(i).and_then(Sign::from_word);
        if sign.is_some() {
            i += 1;
        }

        // 3. Leading currency, then the number itself
        let leading_currency = tokens.get(i).is_some_and(|t| self.is_currency(t))
            && tokens.get(i + 1).is_some_and(is_number);
        if leading_currency {
            i += 1;
        }
        let number = tokens.get(i).filter(|t| is_number(t))?;
        let mut value = parse_value(number.word());
        i += 1;

        // 4. Trailing marker
        let kind = if leading_currency {
            NumericKind::Currency
        } else if word_at(i).is_some_and(|w| PERCENT_WORDS.contains(&w.to_lowercase().as_str())) {
            i += 1;
            NumericKind::Percentage
        } else if tokens.get(i).is_some_and(|t| self.is_currency(t)) {
            i += 1;
            NumericKind::Currency
        } else if tokens.get(i).is_some_and(|t| self.is_unit(t)) {
            i += 1;
            NumericKind::Quantity
        } else {
            NumericKind::Plain
        };

        if sign == Some(Sign::Minus) {
            value = value.map(|v| -v);
        }

        let span = NumericSpan {
            start: tokens[start].first_index().get(),
            end: tokens[i - 1].last_index().get(),
            kind,
            value,
            sign,
            approximate,
        };
        Some((span, i))
    }
}

fn is_number(token: &Token) -> bool {
    !token.is_composite() && token.readings().iter().any(|r| r.pos == "CD")
}
