use crate::error::MatchError;
use crate::reader::TokenGroup;
use crate::result::{MatchResult, ObjectMatchResult};
use crate::rule::{ObjectRule, Rule};
use crate::select::{select, select_traced};
use crate::trace::MatchTrace;

/// Object rule nesting allowed by [`Matcher::default`].
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Matching engine configuration.
///
/// Holds no state between calls; one value can serve any number of
/// libraries and threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matcher {
    max_depth: usize,
}

impl Default for Matcher {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Matcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Match one tokenized line against `rules` (main entry point)
    pub fn match_tokens<'r, G: AsRef<Rule>>(
        &self,
        tokens: &[&str],
        rules: &'r [G],
    ) -> Result<MatchResult<'r, G>, MatchError> {
        let candidates: Vec<&'r G> = rules.iter().collect();
        select(*self, tokens, &candidates, 0)
    }

    /// Same as [`Matcher::match_tokens`], also recording how every rule of
    /// the library was treated.
    pub fn match_with_trace<'r, G: AsRef<Rule>>(
        &self,
        tokens: &[&str],
        rules: &'r [G],
    ) -> MatchTrace<'r, G> {
        let candidates: Vec<&'r G> = rules.iter().collect();
        let (result, steps) = select_traced(*self, tokens, &candidates, 0);
        MatchTrace { result, steps }
    }

    /// Match a line and its indented child lines. Children are matched
    /// against the `children` of the object rule the line matched.
    pub fn match_group<'r>(
        &self,
        tokens: &[&str],
        children: &[TokenGroup],
        rules: &'r [ObjectRule],
    ) -> Result<ObjectMatchResult<'r>, MatchError> {
        self.match_group_with_depth(tokens, children, rules, 0)
    }

    /// Match every top-level group of a document.
    pub fn match_document<'r>(
        &self,
        groups: &[TokenGroup],
        rules: &'r [ObjectRule],
    ) -> Result<Vec<ObjectMatchResult<'r>>, MatchError> {
        groups
            .iter()
            .map(|group| self.match_group(&group.token_refs(), &group.children, rules))
            .collect()
    }

    fn match_group_with_depth<'r>(
        &self,
        tokens: &[&str],
        children: &[TokenGroup],
        rules: &'r [ObjectRule],
        depth: usize,
    ) -> Result<ObjectMatchResult<'r>, MatchError> {
        let candidates: Vec<&'r ObjectRule> = rules.iter().collect();
        let root = select(*self, tokens, &candidates, depth)?;
        let child_rules: &'r [ObjectRule] = &root.rule.children;

        let children = children
            .iter()
            .map(|child| {
                self.match_group_with_depth(
                    &child.token_refs(),
                    &child.children,
                    child_rules,
                    depth + 1,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ObjectMatchResult { root, children })
    }
}

/// [`Matcher::match_tokens`] with the default configuration.
pub fn match_tokens<'r, G: AsRef<Rule>>(
    tokens: &[&str],
    rules: &'r [G],
) -> Result<MatchResult<'r, G>, MatchError> {
    Matcher::default().match_tokens(tokens, rules)
}

/// [`Matcher::match_group`] with the default configuration.
pub fn match_group<'r>(
    tokens: &[&str],
    children: &[TokenGroup],
    rules: &'r [ObjectRule],
) -> Result<ObjectMatchResult<'r>, MatchError> {
    Matcher::default().match_group(tokens, children, rules)
}
