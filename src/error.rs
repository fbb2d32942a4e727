use thiserror::Error;

/// Failure to compile one line of rule notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// A closing bracket that does not close the innermost open bracket,
    /// or a bracket still open at end of input (`found` is `None`).
    #[error("mismatched bracket {} at offset {offset}", describe(.found))]
    MismatchedBracket { offset: usize, found: Option<char> },

    /// A `< ... >` group that is not exactly one keyword.
    #[error("malformed literal `{lexeme}`: expected exactly one keyword")]
    MalformedLiteral { lexeme: String },

    /// A union with an empty member or fewer than two members.
    #[error("empty member in `{lexeme}`")]
    EmptyUnionMember { lexeme: String },

    /// A `|` outside of any union or optional group.
    #[error("`|` outside of a union or optional group")]
    StraySeparator,

    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<GrammarError>,
    },
}

fn describe(found: &Option<char>) -> String {
    match found {
        Some(c) => format!("`{c}`"),
        None => "(unterminated)".to_string(),
    }
}

/// Failure to match a token sequence against a rule library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("no rule matches `{line}`")]
    RuleNotFound { line: String },

    #[error("too few arguments: {required} required, {available} available")]
    TooFewArguments { required: usize, available: usize },

    #[error("too many arguments: {slots} slots, {supplied} supplied")]
    TooManyArguments { slots: usize, supplied: usize },

    #[error("object rule nesting exceeds maximum depth {max}")]
    DepthExceeded { max: usize },

    /// Engine defect. Never retried and never converted into a mismatch.
    #[error("internal invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}

impl MatchError {
    pub(crate) fn rule_not_found(tokens: &[&str]) -> Self {
        MatchError::RuleNotFound {
            line: tokens.join(" "),
        }
    }

    /// Whether the candidate selector may move on to the next candidate.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            MatchError::RuleNotFound { .. }
                | MatchError::TooFewArguments { .. }
                | MatchError::TooManyArguments { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("rule is not flat after anchoring: `{0}`")]
    NonFlatRule(String),

    #[error("literal slot {slot} has no anchored token")]
    MissingAnchor { slot: usize },
}

/// Failure to read indented configuration text into token groups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("line {line}: indentation mixes spaces and tabs")]
    MixedIndentation { line: usize },

    #[error("line {line}: indentation is not a multiple of the indentation unit")]
    UnevenIndentation { line: usize },

    #[error("line {line}: indentation jumps more than one level")]
    IndentationJump { line: usize },
}

/// Failure to load a rule library.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid rule document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("rule `{rule}`: {source}")]
    Grammar {
        rule: String,
        #[source]
        source: GrammarError,
    },

    #[error("rule `{rule}`: {message}")]
    Invalid { rule: String, message: String },
}
