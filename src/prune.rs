//! Union pruning: resolve alternations by literal evidence in the tokens.

use crate::error::MatchError;
use crate::rule::{Parameter, has_literal, literal_occurs};
use crate::slot::Slot;

/// Resolve every union of `parameters` against `tokens`.
///
/// A member whose literals occur in the tokens is selected (the first such
/// member wins), pruned recursively and spliced in place of the union.
/// Members without any literal stay in play; if more than one of them (or
/// one of them and the empty member) is left, a smaller union is kept and
/// the choice is deferred to positional assignment. A required union with
/// nothing left fails the candidate.
pub(crate) fn prune_unions<'r>(
    tokens: &[&str],
    parameters: &'r [Parameter],
) -> Result<Vec<Slot<'r>>, MatchError> {
    let mut result = Vec::with_capacity(parameters.len());

    for parameter in parameters {
        let Parameter::Union(members) = parameter else {
            result.push(Slot::from_parameter(parameter));
            continue;
        };

        let optional = members.iter().any(|member| member.is_empty());
        let mut provisional: Vec<&'r [Parameter]> = Vec::new();
        let mut confirmed = None;

        for member in members.iter().filter(|member| !member.is_empty()) {
            if !has_literal(member) {
                provisional.push(member);
            } else if literal_occurs(member, tokens) {
                confirmed = Some(member);
                break;
            }
        }

        if let Some(member) = confirmed {
            result.extend(prune_unions(tokens, member)?);
            continue;
        }

        if optional {
            provisional.push(&[]);
        }

        match provisional.len() {
            0 => return Err(MatchError::rule_not_found(tokens)),
            1 => result.extend(prune_unions(tokens, provisional[0])?),
            _ => result.push(Slot::Union(provisional)),
        }
    }

    Ok(result)
}
