//! Match tokenized configuration lines against declarative grammar rules.
//!
//! Rules are written in a bracketed notation:
//!
//! ```text
//! < access-list > name [ < line > num ] < extended > { < deny > | < permit > }
//! ```
//!
//! `< kw >` is a keyword, bare words are named slots, `[ ... ]` is optional
//! and `{ a | b }` an alternation. A matched line yields the keywords it
//! used and a binding for every slot it filled:
//!
//! ```
//! use confmatch::{compile, match_tokens};
//!
//! let rules = vec![compile("< access-list > name [ < line > num ] < extended > { < deny > | < permit > }").unwrap()];
//! let result = match_tokens(&["access-list", "MY_ACL", "extended", "permit"], &rules).unwrap();
//!
//! assert_eq!(result.literals, vec!["access-list", "extended", "permit"]);
//! assert_eq!(result.value("name"), Some("MY_ACL"));
//! assert_eq!(result.value("num"), None);
//! ```

mod anchor;
mod assign;
mod ast;
mod compiler;
mod error;
mod library;
mod matcher;
mod parser;
mod prune;
mod reader;
mod result;
mod rule;
pub mod schema;
mod select;
mod slot;
mod trace;

pub use compiler::{compile, compile_all};
pub use error::{GrammarError, InvariantViolation, LoadError, MatchError, ReadError};
pub use library::RuleLibrary;
pub use matcher::{DEFAULT_MAX_DEPTH, Matcher, match_group, match_tokens};
pub use reader::{TokenGroup, read};
pub use result::{Binding, Capture, MatchResult, ObjectMatchResult};
pub use rule::{ObjectRule, Parameter, Positional, Rule, ValueKind};
pub use trace::{CandidateOutcome, CandidateStep, MatchTrace};
