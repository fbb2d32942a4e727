//! Match results. A result borrows the rule it matched from the library and
//! owns everything captured from the tokens.

use crate::rule::{ObjectRule, Rule};

/// Outcome of a successful match.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult<'r, G = Rule> {
    /// The rule that matched
    pub rule: &'r G,
    /// Tokens that satisfied the rule's literals, in rule order
    pub literals: Vec<String>,
    /// Bound positionals in declaration order. A name may repeat.
    pub positionals: Vec<Binding<'r>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binding<'r> {
    pub name: &'r str,
    pub capture: Capture<'r>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Capture<'r> {
    /// A single token
    Value(String),
    /// A token span matched against an object rule
    Object(MatchResult<'r, ObjectRule>),
}

impl Capture<'_> {
    /// Number of tokens this capture consumed
    pub fn consumed(&self) -> usize {
        match self {
            Capture::Value(_) => 1,
            Capture::Object(result) => result.consumed(),
        }
    }
}

impl<'r, G> MatchResult<'r, G> {
    /// First capture bound under `name`
    pub fn get(&self, name: &str) -> Option<&Capture<'r>> {
        self.positionals
            .iter()
            .find(|binding| binding.name == name)
            .map(|binding| &binding.capture)
    }

    /// Every capture bound under `name`, in declaration order
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Capture<'r>> {
        self.positionals
            .iter()
            .filter(move |binding| binding.name == name)
            .map(|binding| &binding.capture)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            Capture::Value(value) => Some(value.as_str()),
            Capture::Object(_) => None,
        }
    }

    pub fn object(&self, name: &str) -> Option<&MatchResult<'r, ObjectRule>> {
        match self.get(name)? {
            Capture::Object(result) => Some(result),
            Capture::Value(_) => None,
        }
    }

    /// Number of tokens accounted for, nested captures included.
    pub fn consumed(&self) -> usize {
        self.literals.len()
            + self
                .positionals
                .iter()
                .map(|binding| binding.capture.consumed())
                .sum::<usize>()
    }
}

impl MatchResult<'_, ObjectRule> {
    /// Name of the object rule that matched
    pub fn name(&self) -> &str {
        &self.rule.name
    }
}

/// Match of a token group and, recursively, of its child groups.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectMatchResult<'r> {
    pub root: MatchResult<'r, ObjectRule>,
    pub children: Vec<ObjectMatchResult<'r>>,
}
