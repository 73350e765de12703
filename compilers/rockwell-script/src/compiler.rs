use std::collections::HashMap;

use tracing::debug;

use crate::error::{ScriptError, ScriptErrorKind};
use crate::parser::parse_line;
use crate::predicate::{Address, Predicate, Test, ValueSet};
use crate::rule::{Affix, AffixPosition, Element, Group, Quantifier, Rule, RuleId, RuleSet, Unit};
use crate::syntax::{ElementSyntax, RuleLine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modifier {
    Prefix,
    Infix,
    Suffix,
    Complete,
    Optional,
    Repeat,
    Chain,
}

impl Modifier {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "prefix" => Some(Modifier::Prefix),
            "infix" => Some(Modifier::Infix),
            "suffix" => Some(Modifier::Suffix),
            "complete" => Some(Modifier::Complete),
            "optional" => Some(Modifier::Optional),
            "repeat" => Some(Modifier::Repeat),
            "chain" => Some(Modifier::Chain),
            _ => None,
        }
    }
}

/// An element address: a token attribute or a reference to another rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Token(Address),
    Rule,
}

impl Target {
    fn from_name(name: &str) -> Option<Self> {
        if name == "rule" {
            return Some(Target::Rule);
        }
        Address::from_name(name).map(Target::Token)
    }
}

fn invalid(message: &str) -> ScriptErrorKind {
    ScriptErrorKind::InvalidElement(message.to_string())
}

/// A parsed line waiting for its rule references to be resolved.
struct Pending<'a> {
    line: usize,
    text: &'a str,
    syntax: RuleLine,
}

struct Compiler<'a> {
    labels: &'a HashMap<String, RuleId>,
}

impl Compiler<'_> {
    fn element(&self, syntax: &ElementSyntax) -> Result<Element, ScriptErrorKind> {
        // 1. Split names into addresses and modifiers
        let mut targets = Vec::new();
        let mut modifiers = Vec::new();
        for (i, name) in syntax.names.iter().enumerate() {
            if let Some(target) = Target::from_name(name) {
                targets.push(target);
            } else if let Some(modifier) = Modifier::from_name(name) {
                modifiers.push(modifier);
            } else if i == 0 {
                return Err(ScriptErrorKind::UnknownAddress(name.clone()));
            } else {
                return Err(ScriptErrorKind::UnknownModifier(name.clone()));
            }
        }

        if targets.is_empty() {
            return Err(ScriptErrorKind::UnknownAddress(syntax.names[0].clone()));
        }
        if targets.len() != syntax.values.len() {
            return Err(ScriptErrorKind::ArityMismatch {
                addresses: targets.len(),
                values: syntax.values.len(),
            });
        }

        // 2. Read the modifiers
        let has = |m: Modifier| modifiers.contains(&m);
        let positions: Vec<AffixPosition> = modifiers
            .iter()
            .filter_map(|m| match m {
                Modifier::Prefix => Some(AffixPosition::Prefix),
                Modifier::Infix => Some(AffixPosition::Infix),
                Modifier::Suffix => Some(AffixPosition::Suffix),
                _ => None,
            })
            .collect();
        if positions.len() > 1 {
            return Err(invalid("at most one of prefix, infix, suffix"));
        }
        let quantifiers = [Modifier::Optional, Modifier::Repeat, Modifier::Chain]
            .into_iter()
            .filter(|m| has(*m))
            .count();
        if quantifiers > 1 {
            return Err(invalid("at most one of optional, repeat, chain"));
        }

        let is_rule = targets.contains(&Target::Rule);
        if is_rule && targets.len() > 1 {
            return Err(invalid("@rule cannot be combined with token addresses"));
        }

        // 3. Affix elements
        if let Some(position) = positions.first().copied() {
            if !is_rule {
                return Err(invalid("affix modifiers apply to @rule only"));
            }
            if has(Modifier::Repeat) || has(Modifier::Chain) {
                return Err(invalid("an affix cannot repeat"));
            }
            let rule = self.reference(syntax)?;
            return Ok(Element::Infix(Affix {
                position,
                rule,
                complete: has(Modifier::Complete) || position == AffixPosition::Infix,
                optional: has(Modifier::Optional),
            }));
        }
        if has(Modifier::Complete) {
            return Err(invalid("+complete needs prefix, infix or suffix"));
        }

        // 4. Units
        let quantifier = if has(Modifier::Optional) {
            Quantifier::Optional
        } else if has(Modifier::Repeat) {
            Quantifier::Repeat
        } else if has(Modifier::Chain) {
            Quantifier::Chain
        } else {
            Quantifier::One
        };

        let unit = if is_rule {
            Unit::Rule(self.reference(syntax)?)
        } else {
            let tests = targets
                .iter()
                .zip(&syntax.values)
                .filter_map(|(target, list)| match target {
                    Target::Token(address) => Some(Test {
                        address: *address,
                        values: ValueSet::new(*address, list.negated, &list.values),
                    }),
                    Target::Rule => None,
                })
                .collect();
            Unit::Token(Predicate::new(tests))
        };

        Ok(Element::Unit { unit, quantifier })
    }

    fn reference(&self, syntax: &ElementSyntax) -> Result<RuleId, ScriptErrorKind> {
        let list = &syntax.values[0];
        if list.negated || list.values.len() != 1 {
            return Err(invalid("@rule takes exactly one label"));
        }
        let label = &list.values[0];
        self.labels
            .get(label)
            .copied()
            .ok_or_else(|| ScriptErrorKind::UnknownRule(label.clone()))
    }

    /// Pulls the prefix and suffix affixes out of the element list.
    fn group(&self, syntax: &[ElementSyntax]) -> Result<Group, ScriptErrorKind> {
        let mut elements = syntax
            .iter()
            .map(|element| self.element(element))
            .collect::<Result<Vec<_>, _>>()?;

        let prefix = match elements.first() {
            Some(Element::Infix(affix)) if affix.position == AffixPosition::Prefix => Some(*affix),
            _ => None,
        };
        if prefix.is_some() {
            elements.remove(0);
        }
        let suffix = match elements.last() {
            Some(Element::Infix(affix)) if affix.position == AffixPosition::Suffix => Some(*affix),
            _ => None,
        };
        if suffix.is_some() {
            elements.pop();
        }

        for (i, element) in elements.iter().enumerate() {
            let Element::Infix(affix) = element else {
                continue;
            };
            match affix.position {
                AffixPosition::Prefix => return Err(invalid("a prefix must come first")),
                AffixPosition::Suffix => return Err(invalid("a suffix must come last")),
                AffixPosition::Infix => {
                    let inner = i > 0 && i + 1 < elements.len();
                    let after_infix = i > 0 && matches!(elements[i - 1], Element::Infix(_));
                    if !inner || after_infix {
                        return Err(invalid("an infix must sit between two units"));
                    }
                }
            }
        }

        if elements.is_empty() {
            return Err(invalid("a group needs at least one non-affix element"));
        }

        Ok(Group {
            prefix,
            elements,
            suffix,
        })
    }
}

impl RuleSet {
    /// Compiles one rule per line. Blank lines and `#` comments are skipped;
    /// rules may reference rules defined further down.
    pub fn compile<I, S>(lines: I) -> Result<Self, ScriptError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines: Vec<S> = lines.into_iter().collect();

        // 1. Parse lines and register labels
        let mut pending = Vec::new();
        let mut labels = HashMap::new();
        for (i, line) in lines.iter().enumerate() {
            let text = AsRef::<str>::as_ref(line).trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            let line = i + 1;
            let syntax = parse_line(text).map_err(|kind| ScriptError::new(line, text, kind))?;
            if labels.contains_key(&syntax.label) {
                let kind = ScriptErrorKind::DuplicateLabel(syntax.label.clone());
                return Err(ScriptError::new(line, text, kind));
            }
            labels.insert(syntax.label.clone(), RuleId::new(pending.len() as u32));
            pending.push(Pending { line, text, syntax });
        }

        if pending.is_empty() {
            return Err(ScriptError::empty());
        }

        // 2. Compile groups, resolving references
        let compiler = Compiler { labels: &labels };
        let mut rules = Vec::with_capacity(pending.len());
        for (i, entry) in pending.iter().enumerate() {
            let groups = entry
                .syntax
                .groups
                .iter()
                .map(|group| compiler.group(group))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|kind| ScriptError::new(entry.line, entry.text, kind))?;

            rules.push(Rule {
                id: RuleId::new(i as u32),
                label: entry.syntax.label.clone(),
                line: entry.line,
                groups,
            });
        }

        debug!(rules = rules.len(), "compiled rule script");
        Ok(RuleSet { rules, labels })
    }

    /// Compiles a whole script held in one string.
    pub fn parse(script: &str) -> Result<Self, ScriptError> {
        Self::compile(script.lines())
    }
}
