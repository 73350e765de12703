//! Rockwell script: a one-rule-per-line pattern language over tokens.
//!
//! ```text
//! @pos+optional:RB ; @pos:JJ* | adjective-unit
//! @rule+prefix:adjectives ; @pos:NN* | adjective-prefix
//! ```
//!
//! Lines are parsed with nom into [`syntax`] trees, then compiled into an
//! immutable [`RuleSet`] whose rules reference each other by [`RuleId`].

pub mod compiler;
pub mod error;
pub mod parser;
pub mod predicate;
pub mod rule;
pub mod syntax;

pub use error::{ScriptError, ScriptErrorKind};
pub use predicate::{Address, Pattern, Predicate, Test, ValueSet};
pub use rule::{Affix, AffixPosition, Element, Group, Quantifier, Rule, RuleId, RuleSet, Unit};
