//! Uncompiled shape of one rule line, as read by the parser.

/// `[!]value,value,...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueList {
    pub negated: bool,
    pub values: Vec<String>,
}

/// `@name+name...:values+values...`
///
/// `names` mixes addresses and modifiers; the compiler tells them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSyntax {
    pub names: Vec<String>,
    pub values: Vec<ValueList>,
}

/// `element;element/element | label`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleLine {
    pub groups: Vec<Vec<ElementSyntax>>,
    pub label: String,
}
