//! JSON rule documents.
//!
//! These types mirror the runtime rule types but are serde-deserializable.
//! A document is an array of object rules, each given either as an explicit
//! parameter tree or as a line of rule notation:
//!
//! ```json
//! [
//!   { "name": "host", "grammar": "< host > address" },
//!   {
//!     "name": "object-network",
//!     "parameters": [
//!       { "type": "literal", "value": "object" },
//!       { "type": "literal", "value": "network" },
//!       { "type": "positional", "name": "name" }
//!     ],
//!     "children": [{ "name": "description", "grammar": "< description > text" }]
//!   }
//! ]
//! ```
//!
//! Parameters and value kinds use `#[serde(tag = "type")]` for discriminated
//! union deserialization. Everything is validated when loading, so a library
//! that loads never fails later for structural reasons.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::compiler::compile;
use crate::error::LoadError;
use crate::rule::{ObjectRule, Parameter, Positional, Rule, ValueKind};

/// Configuration for an [`ObjectRule`].
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectRuleConfig {
    pub name: String,

    /// Explicit parameter tree. Exclusive with `grammar`.
    #[serde(default)]
    pub parameters: Option<Vec<ParameterConfig>>,

    /// One line of rule notation. Exclusive with `parameters`.
    #[serde(default)]
    pub grammar: Option<String>,

    /// Value kinds for positionals of a `grammar` rule, by positional name.
    #[serde(default)]
    pub kinds: BTreeMap<String, Vec<KindConfig>>,

    #[serde(default)]
    pub children: Vec<ObjectRuleConfig>,
}

/// Configuration for a [`Parameter`].
///
/// ```json
/// { "type": "literal", "value": "access-list" }
/// { "type": "positional", "name": "port", "kinds": [{ "type": "integer" }] }
/// { "type": "union", "members": [[...], [...]] }
/// { "type": "optional", "parameters": [...] }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParameterConfig {
    Literal {
        value: String,
    },
    Positional {
        name: String,
        /// Defaults to `[string]`.
        #[serde(default, alias = "value")]
        kinds: Option<Vec<KindConfig>>,
    },
    Union {
        members: Vec<Vec<ParameterConfig>>,
    },
    Optional {
        parameters: Vec<ParameterConfig>,
    },
}

/// Configuration for a [`ValueKind`].
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum KindConfig {
    String,
    Integer,
    Object(ObjectRuleConfig),
}

/// Parse and validate a JSON rule document.
pub fn parse(json: &str) -> Result<Vec<ObjectRule>, LoadError> {
    let configs: Vec<ObjectRuleConfig> = serde_json::from_str(json)?;
    configs.iter().map(ObjectRuleConfig::build).collect()
}

impl ObjectRuleConfig {
    /// Validate the configuration and build the runtime rule.
    pub fn build(&self) -> Result<ObjectRule, LoadError> {
        if self.name.trim().is_empty() {
            return Err(invalid(&self.name, "rule name is empty"));
        }

        let mut rule = match (&self.parameters, &self.grammar) {
            (Some(parameters), None) => Rule::new(self.build_sequence(parameters)?),
            (None, Some(grammar)) => compile(grammar).map_err(|source| LoadError::Grammar {
                rule: self.name.clone(),
                source,
            })?,
            _ => {
                return Err(invalid(
                    &self.name,
                    "exactly one of `parameters` and `grammar` is required",
                ));
            }
        };

        for (name, kinds) in &self.kinds {
            if !rule.has_positional(name) {
                return Err(invalid(
                    &self.name,
                    &format!("`kinds` names unknown positional `{name}`"),
                ));
            }
            rule = rule.with_kinds(name, self.build_kinds(kinds)?);
        }

        let children = self
            .children
            .iter()
            .map(ObjectRuleConfig::build)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ObjectRule::new(self.name.clone(), rule).with_children(children))
    }

    fn build_sequence(&self, parameters: &[ParameterConfig]) -> Result<Vec<Parameter>, LoadError> {
        parameters
            .iter()
            .map(|parameter| self.build_parameter(parameter))
            .collect()
    }

    fn build_parameter(&self, parameter: &ParameterConfig) -> Result<Parameter, LoadError> {
        match parameter {
            ParameterConfig::Literal { value } => {
                if value.is_empty() || value.contains(char::is_whitespace) {
                    return Err(invalid(&self.name, "literal must be a single keyword"));
                }
                Ok(Parameter::literal(value.as_str()))
            }
            ParameterConfig::Positional { name, kinds } => {
                if name.trim().is_empty() {
                    return Err(invalid(&self.name, "positional name is empty"));
                }
                let kinds = match kinds {
                    Some(kinds) => self.build_kinds(kinds)?,
                    None => vec![ValueKind::Text],
                };
                Ok(Parameter::Positional(Positional::with_kinds(name.as_str(), kinds)))
            }
            ParameterConfig::Union { members } => {
                if members.len() < 2 {
                    return Err(invalid(&self.name, "union needs at least two members"));
                }
                let members = members
                    .iter()
                    .map(|member| self.build_sequence(member))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Parameter::Union(members))
            }
            ParameterConfig::Optional { parameters } => {
                if parameters.is_empty() {
                    return Err(invalid(&self.name, "optional needs at least one parameter"));
                }
                Ok(Parameter::optional(self.build_sequence(parameters)?))
            }
        }
    }

    fn build_kinds(&self, kinds: &[KindConfig]) -> Result<Vec<ValueKind>, LoadError> {
        if kinds.is_empty() {
            return Err(invalid(&self.name, "positional needs at least one kind"));
        }

        kinds
            .iter()
            .map(|kind| match kind {
                KindConfig::String => Ok(ValueKind::Text),
                KindConfig::Integer => Ok(ValueKind::Integer),
                KindConfig::Object(config) => config.build().map(ValueKind::Object),
            })
            .collect()
    }
}

fn invalid(rule: &str, message: &str) -> LoadError {
    LoadError::Invalid {
        rule: rule.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(name: &str) -> Parameter {
        Parameter::positional(name)
    }

    #[test]
    fn test_parse_parameters() {
        let json = r#"[
            {
                "name": "access-list-remark",
                "parameters": [
                    { "type": "literal", "value": "access-list" },
                    { "type": "positional", "name": "access_list_name" },
                    { "type": "optional", "parameters": [
                        { "type": "literal", "value": "line" },
                        { "type": "positional", "name": "line_number", "kinds": [{ "type": "integer" }] }
                    ]},
                    { "type": "union", "members": [
                        [{ "type": "literal", "value": "remark" }],
                        []
                    ]}
                ]
            }
        ]"#;

        let rules = parse(json).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name, "access-list-remark");
        assert_eq!(
            rules[0].rule.parameters(),
            &[
                Parameter::literal("access-list"),
                pos("access_list_name"),
                Parameter::optional(vec![
                    Parameter::literal("line"),
                    Parameter::Positional(Positional::with_kinds(
                        "line_number",
                        vec![ValueKind::Integer]
                    )),
                ]),
                Parameter::Union(vec![vec![Parameter::literal("remark")], vec![]]),
            ]
        );
    }

    #[test]
    fn test_parse_grammar_with_object_kinds_and_children() {
        let json = r#"[
            {
                "name": "access-list",
                "grammar": "< access-list > name < permit > source",
                "kinds": {
                    "source": [
                        { "type": "object", "name": "host", "grammar": "< host > ip" },
                        { "type": "string" }
                    ]
                }
            },
            {
                "name": "object-network",
                "grammar": "< object > < network > name",
                "children": [
                    { "name": "host", "grammar": "< host > address" }
                ]
            }
        ]"#;

        let rules = parse(json).unwrap();

        let Parameter::Positional(source) = &rules[0].rule[3] else {
            panic!("Expected positional");
        };
        assert!(source.accepts_object("host"));
        assert!(source.accepts_token("10.0.0.1"));
        assert_eq!(rules[1].children.len(), 1);
        assert_eq!(rules[1].children[0].name, "host");
    }

    #[test]
    fn test_positional_value_alias() {
        let json = r#"[{ "name": "port", "parameters": [
            { "type": "positional", "name": "port", "value": [{ "type": "integer" }] }
        ]}]"#;
        let rules = parse(json).unwrap();
        assert!(!rules[0].rule.parameters().is_empty());
        let Parameter::Positional(port) = &rules[0].rule[0] else {
            panic!("Expected positional");
        };
        assert_eq!(port.kinds, vec![ValueKind::Integer]);
    }

    #[test]
    fn test_validation_errors() {
        let cases = [
            r#"[{ "name": "x" }]"#,
            r#"[{ "name": "x", "grammar": "< x >", "parameters": [] }]"#,
            r#"[{ "name": "", "grammar": "< x >" }]"#,
            r#"[{ "name": "x", "parameters": [{ "type": "literal", "value": "" }] }]"#,
            r#"[{ "name": "x", "parameters": [{ "type": "positional", "name": " " }] }]"#,
            r#"[{ "name": "x", "parameters": [{ "type": "union", "members": [[]] }] }]"#,
            r#"[{ "name": "x", "parameters": [{ "type": "optional", "parameters": [] }] }]"#,
            r#"[{ "name": "x", "parameters": [{ "type": "positional", "name": "p", "kinds": [] }] }]"#,
        ];

        for json in cases {
            assert!(
                matches!(parse(json), Err(LoadError::Invalid { .. })),
                "{json}"
            );
        }
    }

    #[test]
    fn test_kinds_for_unknown_positional() {
        let json = r#"[{
            "name": "timeout",
            "grammar": "< timeout > minutes",
            "kinds": { "minuets": [{ "type": "integer" }] }
        }]"#;
        match parse(json).unwrap_err() {
            LoadError::Invalid { rule, message } => {
                assert_eq!(rule, "timeout");
                assert!(message.contains("minuets"));
            }
            other => panic!("Expected Invalid error, got {:?}", other),
        }
    }

    #[test]
    fn test_grammar_error_names_rule() {
        let err = parse(r#"[{ "name": "broken", "grammar": "< host ip" }]"#).unwrap_err();
        match err {
            LoadError::Grammar { rule, .. } => assert_eq!(rule, "broken"),
            other => panic!("Expected Grammar error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(parse("[{"), Err(LoadError::Json(_))));
        assert!(matches!(
            parse(r#"[{ "name": "x", "parameters": [{ "type": "keyword" }] }]"#),
            Err(LoadError::Json(_))
        ));
    }
}
