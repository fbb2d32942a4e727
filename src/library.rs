use std::path::Path;

use crate::error::{LoadError, MatchError};
use crate::matcher::Matcher;
use crate::reader::TokenGroup;
use crate::result::{MatchResult, ObjectMatchResult};
use crate::rule::ObjectRule;
use crate::schema;

/// Owned set of top-level object rules.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RuleLibrary(Vec<ObjectRule>);

impl RuleLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a library from a JSON rule document.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let mut library = Self::new();
        library.load(json)?;
        Ok(library)
    }

    /// Append the rules of a JSON rule document.
    /// Nothing is added if the document fails to load.
    pub fn load(&mut self, json: &str) -> Result<(), LoadError> {
        let rules = schema::parse(json)?;
        self.0.extend(rules);
        Ok(())
    }

    /// Append the rules of a JSON rule document read from a file
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.load(&json)
    }

    pub fn add(&mut self, rule: ObjectRule) {
        self.0.push(rule);
    }

    pub fn rules(&self) -> &[ObjectRule] {
        &self.0
    }

    /// First top-level rule called `name`
    pub fn get(&self, name: &str) -> Option<&ObjectRule> {
        self.0.iter().find(|rule| rule.name == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Match one line against the top-level rules.
    pub fn match_tokens(&self, tokens: &[&str]) -> Result<MatchResult<'_, ObjectRule>, MatchError> {
        Matcher::default().match_tokens(tokens, &self.0)
    }

    /// Match every group of a document read with [`crate::read`].
    pub fn match_document(
        &self,
        groups: &[TokenGroup],
    ) -> Result<Vec<ObjectMatchResult<'_>>, MatchError> {
        Matcher::default().match_document(groups, &self.0)
    }
}

impl From<Vec<ObjectRule>> for RuleLibrary {
    fn from(rules: Vec<ObjectRule>) -> Self {
        Self(rules)
    }
}
