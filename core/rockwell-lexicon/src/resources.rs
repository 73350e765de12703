//! Process-wide read-only resources, built at most once on first use.
//!
//! A failed load is returned to the caller and nothing is cached, so the
//! next access retries instead of observing a partial resource.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::Path;

use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::error::ResourceError;
use crate::lexicon::Lexicon;

const DEFAULT_CURRENCIES: &str = include_str!("../resources/currencies.txt");
const DEFAULT_UNITS: &str = include_str!("../resources/units.txt");
const DEFAULT_LEXICON: &str = include_str!("../resources/english.lex");

/// Environment variable naming a lexicon file that replaces the built-in one.
pub const LEXICON_ENV: &str = "ROCKWELL_LEXICON";

static RESOURCES: OnceCell<Resources> = OnceCell::new();
static LEXICON: OnceCell<Lexicon> = OnceCell::new();

/// A case-insensitive set of words, one per line in its source.
#[derive(Debug, Clone, Default)]
pub struct WordSet {
    words: HashSet<String>,
}

impl WordSet {
    pub fn parse(source: &str, text: &str) -> Result<Self, ResourceError> {
        let mut words = HashSet::new();
        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.split_whitespace().count() != 1 {
                return Err(ResourceError::Malformed {
                    source_name: source.to_string(),
                    line: number + 1,
                    text: line.to_string(),
                });
            }
            words.insert(line.to_lowercase());
        }
        Ok(Self { words })
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Currency and measuring-unit vocabularies used by numeric recognition.
#[derive(Debug, Clone)]
pub struct Resources {
    pub currencies: WordSet,
    pub units: WordSet,
}

impl Resources {
    pub fn builtin() -> Result<Self, ResourceError> {
        Ok(Self {
            currencies: WordSet::parse("builtin currencies", DEFAULT_CURRENCIES)?,
            units: WordSet::parse("builtin units", DEFAULT_UNITS)?,
        })
    }

    /// Loads `currencies.txt` and `units.txt` from `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self, ResourceError> {
        let read = |name: &str| -> Result<WordSet, ResourceError> {
            let path = dir.join(name);
            let text = fs::read_to_string(&path).map_err(|source| ResourceError::Io {
                path: path.display().to_string(),
                source,
            })?;
            WordSet::parse(&path.display().to_string(), &text)
        };

        Ok(Self {
            currencies: read("currencies.txt")?,
            units: read("units.txt")?,
        })
    }

    /// The shared instance, built from the embedded word lists.
    pub fn shared() -> Result<&'static Resources, ResourceError> {
        RESOURCES.get_or_try_init(|| {
            let resources = Resources::builtin()?;
            debug!(
                currencies = resources.currencies.len(),
                units = resources.units.len(),
                "numeric resources initialised"
            );
            Ok(resources)
        })
    }
}

impl Lexicon {
    pub fn builtin() -> Result<Self, ResourceError> {
        Lexicon::parse("builtin lexicon", DEFAULT_LEXICON)
    }

    /// The shared lexicon: the file named by `ROCKWELL_LEXICON`, or the
    /// embedded English word list.
    pub fn shared() -> Result<&'static Lexicon, ResourceError> {
        LEXICON.get_or_try_init(|| match env::var_os(LEXICON_ENV) {
            Some(path) => {
                info!(path = ?path, "loading lexicon from environment");
                Lexicon::load(Path::new(&path))
            }
            None => Lexicon::builtin(),
        })
    }
}
