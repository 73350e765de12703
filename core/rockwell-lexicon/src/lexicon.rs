use std::collections::HashMap;
use std::fs;
use std::path::Path;

use rockwell_protocol::Reading;
use tracing::debug;

use crate::error::ResourceError;

/// Word → admissible readings, loaded from `word|POS|lemma` lines.
///
/// Several lines for the same word are alternatives of one ambiguous entry.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<String, Vec<Reading>>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses lexicon text. `source` names the resource in errors.
    pub fn parse(source: &str, text: &str) -> Result<Self, ResourceError> {
        let mut lexicon = Lexicon::new();

        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split('|').map(str::trim).collect();
            match fields.as_slice() {
                [word, pos, lemma] if !word.is_empty() && !pos.is_empty() && !lemma.is_empty() => {
                    lexicon.insert(word, Reading::new(*pos, *lemma));
                }
                _ => {
                    return Err(ResourceError::Malformed {
                        source_name: source.to_string(),
                        line: number + 1,
                        text: line.to_string(),
                    })
                }
            }
        }

        debug!(source, words = lexicon.len(), "lexicon parsed");
        Ok(lexicon)
    }

    pub fn load(path: &Path) -> Result<Self, ResourceError> {
        let text = fs::read_to_string(path).map_err(|source| ResourceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&path.display().to_string(), &text)
    }

    pub fn insert(&mut self, word: &str, reading: Reading) {
        let readings = self.entries.entry(word.to_string()).or_default();
        if !readings.contains(&reading) {
            readings.push(reading);
        }
    }

    /// Exact lookup first, then the lowercased form.
    pub fn lookup(&self, word: &str) -> Option<&[Reading]> {
        self.entries
            .get(word)
            .or_else(|| self.entries.get(&word.to_lowercase()))
            .map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
