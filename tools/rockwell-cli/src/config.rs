use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use rockwell_protocol::NerFlags;
use rockwell_tagger::TaggerOptions;
use serde::Deserialize;

/// Settings read from `--config`. Command-line flags override them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(flatten)]
    pub tagger: TaggerOptions,
    /// Entity family names, as accepted by `--flags`.
    pub flags: Vec<String>,
    pub lexicon: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl Config {
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("invalid configuration")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read configuration {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }
}

/// Combines family names; no names means every family.
pub fn parse_flags(names: &[String]) -> anyhow::Result<NerFlags> {
    if names.is_empty() {
        return Ok(NerFlags::all());
    }

    let mut flags = NerFlags::empty();
    for name in names {
        match NerFlags::from_family(name.trim()) {
            Some(flag) => flags |= flag,
            None => bail!("unknown entity family '{name}'"),
        }
    }
    Ok(flags)
}
