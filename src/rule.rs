//! Typed rule representation shared by the compiler, the schema loader and
//! the matching engine.
//!
//! Rules are immutable once built. Every rewrite performed while matching
//! (pruning, splicing, decomposition) works on a borrowed view, see `slot`.

use std::fmt;
use std::ops::Deref;

/// One element of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameter {
    /// Keyword that must case-insensitively equal one token.
    Literal(String),
    /// Named slot capturing one token, or a sub-span for object kinds.
    Positional(Positional),
    /// Ordered alternatives. An empty member means "absent".
    Union(Vec<Vec<Parameter>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Positional {
    pub name: String,
    pub kinds: Vec<ValueKind>,
}

impl Positional {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kinds: vec![ValueKind::Text],
        }
    }

    pub fn with_kinds(name: impl Into<String>, kinds: Vec<ValueKind>) -> Self {
        Self {
            name: name.into(),
            kinds,
        }
    }

    /// Object rules this slot may capture, in declaration order
    pub fn object_rules(&self) -> impl Iterator<Item = &ObjectRule> {
        self.kinds.iter().filter_map(|kind| match kind {
            ValueKind::Object(rule) => Some(rule),
            _ => None,
        })
    }

    pub fn accepts_object(&self, name: &str) -> bool {
        self.object_rules().any(|rule| rule.name == name)
    }

    pub fn accepts_token(&self, token: &str) -> bool {
        self.kinds.iter().any(|kind| match kind {
            ValueKind::Text => true,
            ValueKind::Integer => token.parse::<i64>().is_ok(),
            ValueKind::Object(_) => false,
        })
    }
}

/// What a positional slot may hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Integer,
    Object(ObjectRule),
}

impl Parameter {
    pub fn literal(value: impl Into<String>) -> Self {
        Parameter::Literal(value.into())
    }

    pub fn positional(name: impl Into<String>) -> Self {
        Parameter::Positional(Positional::new(name))
    }

    /// `[ parameters ]`
    pub fn optional(parameters: Vec<Parameter>) -> Self {
        Parameter::Union(vec![parameters, vec![]])
    }
}

/// Whether any literal occurs in `parameters`, at any union depth.
pub(crate) fn has_literal(parameters: &[Parameter]) -> bool {
    parameters.iter().any(|parameter| match parameter {
        Parameter::Literal(_) => true,
        Parameter::Positional(_) => false,
        Parameter::Union(members) => members.iter().any(|m| has_literal(m)),
    })
}

/// Whether any literal of `parameters`, at any union depth, equals one of
/// the tokens.
pub(crate) fn literal_occurs(parameters: &[Parameter], tokens: &[&str]) -> bool {
    parameters.iter().any(|parameter| match parameter {
        Parameter::Literal(value) => occurs(value, tokens),
        Parameter::Positional(_) => false,
        Parameter::Union(members) => members.iter().any(|m| literal_occurs(m, tokens)),
    })
}

pub(crate) fn keyword_eq(value: &str, token: &str) -> bool {
    value.eq_ignore_ascii_case(token)
}

pub(crate) fn occurs(value: &str, tokens: &[&str]) -> bool {
    tokens.iter().any(|token| keyword_eq(value, token))
}

/// An ordered sequence of parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rule(Vec<Parameter>);

impl Rule {
    pub fn new(parameters: Vec<Parameter>) -> Self {
        Self(parameters)
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.0
    }

    pub fn into_parameters(self) -> Vec<Parameter> {
        self.0
    }

    /// Return a copy where every positional named `name`, at any union
    /// depth, carries `kinds`.
    pub fn with_kinds(&self, name: &str, kinds: Vec<ValueKind>) -> Rule {
        Rule(retype(&self.0, name, &kinds))
    }

    /// Whether a positional called `name` occurs anywhere in the rule
    pub fn has_positional(&self, name: &str) -> bool {
        declares(&self.0, name)
    }
}

fn declares(parameters: &[Parameter], name: &str) -> bool {
    parameters.iter().any(|parameter| match parameter {
        Parameter::Positional(p) => p.name == name,
        Parameter::Union(members) => members.iter().any(|m| declares(m, name)),
        Parameter::Literal(_) => false,
    })
}

fn retype(parameters: &[Parameter], name: &str, kinds: &[ValueKind]) -> Vec<Parameter> {
    parameters
        .iter()
        .map(|parameter| match parameter {
            Parameter::Positional(p) if p.name == name => {
                Parameter::Positional(Positional::with_kinds(name, kinds.to_vec()))
            }
            Parameter::Union(members) => Parameter::Union(
                members.iter().map(|m| retype(m, name, kinds)).collect(),
            ),
            other => other.clone(),
        })
        .collect()
}

impl Deref for Rule {
    type Target = [Parameter];

    fn deref(&self) -> &[Parameter] {
        &self.0
    }
}

impl From<Vec<Parameter>> for Rule {
    fn from(parameters: Vec<Parameter>) -> Self {
        Self(parameters)
    }
}

impl AsRef<Rule> for Rule {
    fn as_ref(&self) -> &Rule {
        self
    }
}

/// A named rule with rules for its indented child lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRule {
    pub name: String,
    pub rule: Rule,
    pub children: Vec<ObjectRule>,
}

impl ObjectRule {
    pub fn new(name: impl Into<String>, rule: Rule) -> Self {
        Self {
            name: name.into(),
            rule,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<ObjectRule>) -> Self {
        self.children = children;
        self
    }
}

impl AsRef<Rule> for ObjectRule {
    fn as_ref(&self) -> &Rule {
        &self.rule
    }
}

// Renders parameters back into rule notation. Optional unions are written
// as `[ ... ]`, so the output compiles back to an equal rule.
impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_sequence(f, &self.0)
    }
}

fn write_sequence(f: &mut fmt::Formatter<'_>, parameters: &[Parameter]) -> fmt::Result {
    for (index, parameter) in parameters.iter().enumerate() {
        if index > 0 {
            f.write_str(" ")?;
        }
        match parameter {
            Parameter::Literal(value) => write!(f, "< {value} >")?,
            Parameter::Positional(p) => f.write_str(&p.name)?,
            Parameter::Union(members) => write_union(f, members)?,
        }
    }
    Ok(())
}

fn write_union(f: &mut fmt::Formatter<'_>, members: &[Vec<Parameter>]) -> fmt::Result {
    let optional = members.last().is_some_and(|m| m.is_empty());
    let shown = if optional {
        &members[..members.len() - 1]
    } else {
        members
    };

    f.write_str(if optional { "[ " } else { "{ " })?;
    for (index, member) in shown.iter().enumerate() {
        if index > 0 {
            f.write_str(" | ")?;
        }
        write_sequence(f, member)?;
    }
    f.write_str(if optional { " ]" } else { " }" })
}
