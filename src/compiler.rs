use crate::ast::{Bracket, Group, Node};
use crate::error::GrammarError;
use crate::parser::NotationParser;
use crate::rule::{Parameter, Rule};

/// Compile one line of rule notation.
///
/// ```text
/// < access-list > name [ < line > num ] < extended > { < deny > | < permit > }
/// ```
///
/// `< kw >` is a literal keyword, bare text a positional slot, `{ a | b }`
/// an alternation and `[ ... ]` an optional span (with or without `|`).
pub fn compile(text: &str) -> Result<Rule, GrammarError> {
    let nodes = NotationParser::parse_input(text)?;
    compile_sequence(&nodes).map(Rule::new)
}

/// Compile one rule per non-blank line.
pub fn compile_all(text: &str) -> Result<Vec<Rule>, GrammarError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            compile(line).map_err(|e| GrammarError::AtLine {
                line: index + 1,
                source: Box::new(e),
            })
        })
        .collect()
}

fn compile_sequence(nodes: &[Node]) -> Result<Vec<Parameter>, GrammarError> {
    nodes
        .iter()
        .map(|node| match node {
            Node::Text("|") => Err(GrammarError::StraySeparator),
            Node::Text(name) => Ok(Parameter::positional(*name)),
            Node::Group(group) => compile_group(group),
        })
        .collect()
}

fn compile_group(group: &Group) -> Result<Parameter, GrammarError> {
    match group.bracket {
        Bracket::Literal => match group.children.as_slice() {
            [Node::Text(value)] => Ok(Parameter::literal(*value)),
            _ => Err(GrammarError::MalformedLiteral {
                lexeme: group.lexeme.to_string(),
            }),
        },
        Bracket::Union => compile_members(group).map(Parameter::Union),
        Bracket::Optional => {
            let mut members = if group.children.iter().any(Node::is_separator) {
                compile_members(group)?
            } else if group.children.is_empty() {
                return Err(empty_member(group));
            } else {
                vec![compile_sequence(&group.children)?]
            };
            members.push(Vec::new());
            Ok(Parameter::Union(members))
        }
    }
}

/// Split a group's children on `|` and compile each span.
fn compile_members(group: &Group) -> Result<Vec<Vec<Parameter>>, GrammarError> {
    let spans: Vec<&[Node]> = group.children.split(Node::is_separator).collect();

    if spans.len() < 2 || spans.iter().any(|span| span.is_empty()) {
        return Err(empty_member(group));
    }

    spans.into_iter().map(compile_sequence).collect()
}

fn empty_member(group: &Group) -> GrammarError {
    GrammarError::EmptyUnionMember {
        lexeme: group.lexeme.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(value: &str) -> Parameter {
        Parameter::literal(value)
    }

    fn pos(name: &str) -> Parameter {
        Parameter::positional(name)
    }

    #[test]
    fn test_compile_access_list_header() {
        let rule =
            compile("< access-list > name [ < line > num ] < extended > { < deny > | < permit > }")
                .unwrap();

        assert_eq!(
            rule.parameters(),
            &[
                lit("access-list"),
                pos("name"),
                Parameter::Union(vec![vec![lit("line"), pos("num")], vec![]]),
                lit("extended"),
                Parameter::Union(vec![vec![lit("deny")], vec![lit("permit")]]),
            ]
        );
    }

    #[test]
    fn test_compile_optional_union_appends_empty_member() {
        let rule = compile("[ < log > [ [ level ] [ < interval > secs ] | < disable > | < default > ] ]")
            .unwrap();

        let expected = Parameter::Union(vec![
            vec![
                lit("log"),
                Parameter::Union(vec![
                    vec![
                        Parameter::Union(vec![vec![pos("level")], vec![]]),
                        Parameter::Union(vec![vec![lit("interval"), pos("secs")], vec![]]),
                    ],
                    vec![lit("disable")],
                    vec![lit("default")],
                    vec![],
                ]),
            ],
            vec![],
        ]);
        assert_eq!(rule.parameters(), &[expected]);
    }

    #[test]
    fn test_compile_is_deterministic() {
        let text = "< object > < network > name [ < description > text ]";
        assert_eq!(compile(text).unwrap(), compile(text).unwrap());
    }

    #[test]
    fn test_display_round_trip() {
        let text = "< access-list > name [ < line > num ] { < deny > | < permit > } [ a | b ]";
        let rule = compile(text).unwrap();
        assert_eq!(compile(&rule.to_string()).unwrap(), rule);
    }

    #[test]
    fn test_malformed_literal() {
        for text in ["< access list >", "< >", "< [ x ] >"] {
            assert!(
                matches!(compile(text), Err(GrammarError::MalformedLiteral { .. })),
                "{text}"
            );
        }
    }

    #[test]
    fn test_empty_union_member() {
        for text in ["{ < deny > }", "{ < deny > | }", "{ | < deny > }", "[ ]", "[ a | | b ]"] {
            assert!(
                matches!(compile(text), Err(GrammarError::EmptyUnionMember { .. })),
                "{text}"
            );
        }
    }

    #[test]
    fn test_stray_separator() {
        assert_eq!(compile("a | b"), Err(GrammarError::StraySeparator));
    }

    #[test]
    fn test_mismatched_bracket_propagates() {
        assert!(matches!(
            compile("{ < deny > | < permit > ]"),
            Err(GrammarError::MismatchedBracket { found: Some(']'), .. })
        ));
    }

    #[test]
    fn test_compile_all_skips_blank_lines() {
        let rules = compile_all("< object > < network > name\n\n   \n< host > ip\n").unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[1].parameters(), &[lit("host"), pos("ip")]);
    }

    #[test]
    fn test_compile_all_reports_line() {
        let err = compile_all("< object > name\n\n< host ip\n").unwrap_err();
        match err {
            GrammarError::AtLine { line, source } => {
                assert_eq!(line, 3);
                assert!(matches!(*source, GrammarError::MismatchedBracket { .. }));
            }
            other => panic!("Expected AtLine error, got {:?}", other),
        }
    }
}
