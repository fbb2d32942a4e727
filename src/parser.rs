use pest::{Parser, error::InputLocation, iterators::Pair};
use pest_derive::Parser;

use crate::ast::{Bracket, Group, Node};
use crate::error::GrammarError;

#[derive(Parser)]
#[grammar = "src/grammar.pest"]
pub struct NotationParser;

impl NotationParser {
    /// Parse rule notation into a tree of text runs and bracket groups
    pub fn parse_input<'a>(input: &'a str) -> Result<Vec<Node<'a>>, GrammarError> {
        let mut pairs = NotationParser::parse(Rule::grammar, input)
            .map_err(|e| Self::bracket_error(input, e.location))?;
        let grammar = pairs.next().expect("parser returned no grammar rule");

        Ok(grammar.into_inner().filter_map(Self::parse_node).collect())
    }

    fn parse_node(pair: Pair<'_, Rule>) -> Option<Node<'_>> {
        let bracket = match pair.as_rule() {
            Rule::text => return Some(Node::Text(pair.as_str())),
            Rule::literal_group => Bracket::Literal,
            Rule::optional_group => Bracket::Optional,
            Rule::union_group => Bracket::Union,
            // EOI
            _ => return None,
        };

        Some(Node::Group(Group {
            bracket,
            lexeme: pair.as_str(),
            children: pair.into_inner().filter_map(Self::parse_node).collect(),
        }))
    }

    // Plain text accepts everything but whitespace and brackets, so the only
    // way the notation fails to parse is a bracket out of place.
    fn bracket_error(input: &str, location: InputLocation) -> GrammarError {
        let offset = match location {
            InputLocation::Pos(pos) => pos,
            InputLocation::Span((start, _)) => start,
        };

        GrammarError::MismatchedBracket {
            offset,
            found: input.get(offset..).and_then(|rest| rest.chars().next()),
        }
    }
}
