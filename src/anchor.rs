//! Literal anchoring: tie literal parameters to the tokens that satisfy them.

use crate::rule::keyword_eq;
use crate::slot::{Slot, splice};

/// A token confirmed to satisfy the literal at `slot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Anchor {
    pub token: usize,
    pub slot: usize,
}

enum Hit<'r> {
    /// Literal found at this index, rule unchanged
    Direct(usize),
    /// Literal found inside a union; the member was spliced in
    Spliced(Vec<Slot<'r>>, usize),
}

/// Scan the tokens left to right, anchoring each to the first literal after
/// the previous anchor that it matches. A union on the way is searched
/// member by member and the matching member replaces it.
pub(crate) fn anchor_literals<'r>(
    tokens: &[&str],
    slots: Vec<Slot<'r>>,
) -> (Vec<Slot<'r>>, Vec<Anchor>) {
    let mut rule = slots;
    let mut anchors: Vec<Anchor> = Vec::new();

    for (token_index, token) in tokens.iter().enumerate() {
        let from = anchors.last().map_or(0, |anchor| anchor.slot + 1);

        let slot = match find_literal(token, &rule, from) {
            None => continue,
            Some(Hit::Direct(slot)) => slot,
            Some(Hit::Spliced(spliced, slot)) => {
                rule = spliced;
                slot
            }
        };

        anchors.push(Anchor {
            token: token_index,
            slot,
        });
    }

    (rule, anchors)
}

fn find_literal<'r>(token: &str, slots: &[Slot<'r>], from: usize) -> Option<Hit<'r>> {
    for (index, slot) in slots.iter().enumerate().skip(from) {
        match slot {
            Slot::Literal(value) if keyword_eq(value, token) => {
                return Some(Hit::Direct(index));
            }
            Slot::Union(members) => {
                for member in members {
                    let member = Slot::view(*member);
                    let (member, offset) = match find_literal(token, &member, 0) {
                        None => continue,
                        Some(Hit::Direct(offset)) => (member, offset),
                        Some(Hit::Spliced(member, offset)) => (member, offset),
                    };

                    return Some(Hit::Spliced(splice(slots, index, member), index + offset));
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use crate::rule::{Parameter, Rule};
    use crate::slot::to_rule;

    fn lit(value: &str) -> Parameter {
        Parameter::literal(value)
    }

    fn pos(name: &str) -> Parameter {
        Parameter::positional(name)
    }

    fn anchor(tokens: &[&str], rule: &Rule) -> (Rule, Vec<Anchor>) {
        let (slots, anchors) = anchor_literals(tokens, Slot::view(rule));
        (to_rule(&slots), anchors)
    }

    #[test]
    fn test_anchor_flat_rule() {
        let rule = compile("< access-list > name < extended > < permit >").unwrap();
        let tokens = ["access-list", "MY_ACL", "extended", "PERMIT"];

        let (anchored, anchors) = anchor(&tokens, &rule);

        assert_eq!(anchored.len(), 4);
        assert_eq!(
            anchors,
            vec![
                Anchor { token: 0, slot: 0 },
                Anchor { token: 2, slot: 2 },
                Anchor { token: 3, slot: 3 },
            ]
        );
    }

    #[test]
    fn test_anchor_splices_union_member() {
        let rule = compile("< access-list > name [ < line > num ] < extended >").unwrap();
        let tokens = ["access-list", "A", "line", "5", "extended"];

        let (anchored, anchors) = anchor(&tokens, &rule);

        assert_eq!(
            anchored.into_parameters(),
            vec![lit("access-list"), pos("name"), lit("line"), pos("num"), lit("extended")]
        );
        assert_eq!(
            anchors,
            vec![
                Anchor { token: 0, slot: 0 },
                Anchor { token: 2, slot: 2 },
                Anchor { token: 4, slot: 4 },
            ]
        );
    }

    #[test]
    fn test_anchor_splices_nested_unions() {
        let rule = compile("< log > [ [ level ] [ < interval > secs ] | < disable > ]").unwrap();
        let tokens = ["log", "interval", "10"];

        let (anchored, anchors) = anchor(&tokens, &rule);

        assert_eq!(
            anchored.into_parameters(),
            vec![
                lit("log"),
                Parameter::optional(vec![pos("level")]),
                lit("interval"),
                pos("secs"),
            ]
        );
        assert_eq!(anchors[1], Anchor { token: 1, slot: 2 });
    }

    #[test]
    fn test_anchor_never_moves_backwards() {
        let rule = compile("< name > value < name >").unwrap();
        let tokens = ["name", "name", "x"];

        let (_, anchors) = anchor(&tokens, &rule);

        // the second token takes the trailing literal, the value is left unanchored
        assert_eq!(
            anchors,
            vec![Anchor { token: 0, slot: 0 }, Anchor { token: 1, slot: 2 }]
        );
    }

    #[test]
    fn test_anchor_ignores_unknown_tokens() {
        let rule = compile("< object > < network > name").unwrap();
        let (_, anchors) = anchor(&["object", "service", "X"], &rule);
        assert_eq!(anchors, vec![Anchor { token: 0, slot: 0 }]);
    }
}
