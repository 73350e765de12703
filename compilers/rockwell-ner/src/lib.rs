//! Named-entity layer: numeric expressions are merged into composite tokens,
//! then the rule families selected by [`NerFlags`] tag entities.

pub mod families;
pub mod numeric;

use rockwell_lexicon::{ResourceError, Resources};
use rockwell_protocol::{NerFlags, Tag, Token};
use rockwell_tagger::{consolidate, substitute, Tagger, TaggerError, TaggerOptions};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub use families::{Family, FAMILIES};
pub use numeric::{NumericKind, NumericRecognizer, NumericSpan, Sign};

#[derive(Debug, Error)]
pub enum NerError {
    #[error(transparent)]
    Tagger(#[from] TaggerError),
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// A recognized entity and the family that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub tag: Tag,
    pub family: &'static str,
}

pub struct Ner {
    flags: NerFlags,
    families: Vec<&'static Family>,
    /// `None` when no family is enabled.
    tagger: Option<Tagger>,
    resources: &'static Resources,
}

impl Ner {
    pub fn new(flags: NerFlags) -> Result<Self, NerError> {
        Self::with_options(flags, TaggerOptions::default())
    }

    /// Compiles the scripts of the enabled families only.
    pub fn with_options(flags: NerFlags, options: TaggerOptions) -> Result<Self, NerError> {
        let families: Vec<&'static Family> = families::enabled(flags).collect();
        let resources = Resources::shared()?;

        let tagger = if families.is_empty() {
            None
        } else {
            let script = families
                .iter()
                .map(|family| family.script)
                .collect::<Vec<_>>()
                .join("\n");
            Some(Tagger::from_script(&script, options)?)
        };

        debug!(
            families = ?families.iter().map(|f| f.name).collect::<Vec<_>>(),
            rules = tagger.as_ref().map_or(0, |t| t.rules().len()),
            "entity recognizer compiled"
        );

        Ok(Self {
            flags,
            families,
            tagger,
            resources,
        })
    }

    pub fn flags(&self) -> NerFlags {
        self.flags
    }

    /// Labels of every compiled rule, helpers included.
    pub fn compiled_labels(&self) -> Vec<&str> {
        self.tagger
            .as_ref()
            .map(|t| t.rules().labels().collect())
            .unwrap_or_default()
    }

    pub fn numeric(&self) -> NumericRecognizer<'static> {
        NumericRecognizer::new(self.resources)
    }

    /// Tags entities in a sentence. Tags of different families never
    /// overlap; on conflict the longer span wins, then the family listed
    /// first in [`FAMILIES`].
    pub fn recognize(&self, tokens: &[Token]) -> Result<Vec<Entity>, NerError> {
        let Some(tagger) = &self.tagger else {
            return Ok(Vec::new());
        };

        // 1. Merge numeric expressions
        let numeric: Vec<Tag> = self
            .numeric()
            .recognize(tokens)
            .iter()
            .map(NumericSpan::tag)
            .collect();
        let merged = substitute(tokens, &numeric)?;

        // 2. Run family entry rules in priority order
        let mut found: Vec<(Tag, &'static str)> = Vec::new();
        for family in &self.families {
            for tag in tagger.tag_rules(&merged, family.entries)? {
                found.push((tag, family.name));
            }
        }

        // 3. Resolve overlaps across families
        let kept = consolidate(found.iter().map(|(tag, _)| tag.clone()).collect());
        let entities: Vec<Entity> = kept
            .into_iter()
            .filter_map(|tag| {
                let family = found.iter().find(|(t, _)| *t == tag)?.1;
                Some(Entity { tag, family })
            })
            .collect();

        debug!(entities = entities.len(), "entities recognized");
        Ok(entities)
    }
}
