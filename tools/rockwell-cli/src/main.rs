mod config;
mod logging;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use rockwell_lexicon::{Lexer, Lexicon};
use rockwell_ner::{Entity, Ner, NumericSpan};
use rockwell_protocol::{Tag, Token};
use rockwell_script::RuleSet;
use rockwell_tagger::{consolidate, Tagger};
use serde::Serialize;
use tracing::info;

use crate::config::{parse_flags, Config};

#[derive(Parser)]
#[command(name = "rockwell", author, version, about = "Tags token spans with Rockwell rule scripts")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log filter directives, e.g. `debug` or `rockwell_tagger=trace`
    #[arg(long, global = true, value_name = "FILTER")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Runs one rule of a script over a sentence
    Tag {
        #[arg(short, long, value_name = "FILE")]
        rules: PathBuf,

        #[arg(short, long)]
        label: String,

        /// `word|POS|lemma` lexicon replacing the built-in one
        #[arg(long, value_name = "FILE")]
        lexicon: Option<PathBuf>,

        /// Print every match instead of the consolidated set
        #[arg(long)]
        all: bool,

        text: String,
    },
    /// Recognizes entities with the built-in families
    Ner {
        /// Families to run, comma separated (default: all)
        #[arg(long, value_delimiter = ',')]
        flags: Vec<String>,

        #[arg(long, value_name = "FILE")]
        lexicon: Option<PathBuf>,

        text: String,
    },
    /// Compiles a script and lists its rules
    Check {
        #[arg(short, long, value_name = "FILE")]
        rules: PathBuf,
    },
}

#[derive(Serialize)]
struct TagReport<'a> {
    label: &'a str,
    tokens: Vec<String>,
    tags: Vec<Tag>,
}

#[derive(Serialize)]
struct NerReport {
    tokens: Vec<String>,
    numeric: Vec<NumericSpan>,
    entities: Vec<Entity>,
}

#[derive(Serialize)]
struct CheckReport<'a> {
    rules: usize,
    labels: Vec<&'a str>,
}

fn read_script(path: &Path) -> anyhow::Result<RuleSet> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read rules {}", path.display()))?;
    RuleSet::parse(&text).with_context(|| format!("in {}", path.display()))
}

/// `--lexicon`, then the configured lexicon, then the shared one.
fn tokenize(text: &str, lexicon: Option<&Path>) -> anyhow::Result<Vec<Token>> {
    let loaded;
    let lexicon = match lexicon {
        Some(path) => {
            loaded = Lexicon::load(path)?;
            &loaded
        }
        None => Lexicon::shared()?,
    };
    Ok(Lexer::new(lexicon).tokenize(text))
}

fn print_json<T: Serialize>(report: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. Configuration, overridden by flags
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    logging::init(cli.log_level.as_deref().or(config.log_level.as_deref()))?;

    match cli.command {
        Command::Tag {
            rules,
            label,
            lexicon,
            all,
            text,
        } => {
            // 2. Compile, tokenize, match
            let tagger = Tagger::new(read_script(&rules)?, config.tagger);
            let tokens = tokenize(&text, lexicon.as_deref().or(config.lexicon.as_deref()))?;

            let mut tags = tagger.tag(&tokens, &label)?;
            if !all {
                tags = consolidate(tags);
            }
            info!(label = %label, tags = tags.len(), "tagging finished");

            print_json(&TagReport {
                label: &label,
                tokens: tokens.iter().map(Token::to_string).collect(),
                tags,
            })
        }
        Command::Ner {
            flags,
            lexicon,
            text,
        } => {
            let names = if flags.is_empty() { &config.flags } else { &flags };
            let ner = Ner::with_options(parse_flags(names)?, config.tagger)?;
            let tokens = tokenize(&text, lexicon.as_deref().or(config.lexicon.as_deref()))?;

            print_json(&NerReport {
                tokens: tokens.iter().map(Token::to_string).collect(),
                numeric: ner.numeric().recognize(&tokens),
                entities: ner.recognize(&tokens)?,
            })
        }
        Command::Check { rules } => {
            let compiled = read_script(&rules)?;
            print_json(&CheckReport {
                rules: compiled.len(),
                labels: compiled.labels().collect(),
            })
        }
    }
}
