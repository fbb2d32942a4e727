//! Borrowed view of a rule used while matching.
//!
//! Pruning, anchoring and decomposition rewrite the rule many times per
//! match. They build new `Vec<Slot>` values whose leaves borrow from the
//! library, so positional slots (and the object rules they declare) keep
//! the library's lifetime and nested results can point back into it.

use crate::rule::{Parameter, Positional, Rule, has_literal};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Slot<'r> {
    Literal(&'r str),
    Positional(&'r Positional),
    Union(Vec<&'r [Parameter]>),
}

impl<'r> Slot<'r> {
    pub fn view(parameters: &'r [Parameter]) -> Vec<Slot<'r>> {
        parameters.iter().map(Slot::from_parameter).collect()
    }

    pub fn from_parameter(parameter: &'r Parameter) -> Slot<'r> {
        match parameter {
            Parameter::Literal(value) => Slot::Literal(value),
            Parameter::Positional(p) => Slot::Positional(p),
            Parameter::Union(members) => Slot::Union(members.iter().map(Vec::as_slice).collect()),
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Slot::Literal(_))
    }

    /// The positional of a `[[Positional], []]` union
    pub fn as_optional_positional(&self) -> Option<&'r Positional> {
        match self {
            Slot::Union(members) if members.len() == 2 && members[1].is_empty() => {
                let member: &'r [Parameter] = members[0];
                match member {
                    [Parameter::Positional(p)] => Some(p),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// A union that positional assignment cannot decide on its own
    pub fn is_deferred_union(&self) -> bool {
        match self {
            Slot::Union(members) => {
                self.as_optional_positional().is_none() && !members.iter().any(|m| has_literal(m))
            }
            _ => false,
        }
    }

    pub fn to_parameter(&self) -> Parameter {
        match self {
            Slot::Literal(value) => Parameter::literal(*value),
            Slot::Positional(p) => Parameter::Positional((*p).clone()),
            Slot::Union(members) => Parameter::Union(members.iter().map(|m| m.to_vec()).collect()),
        }
    }
}

pub(crate) fn is_flat(slots: &[Slot]) -> bool {
    slots
        .iter()
        .all(|slot| !matches!(slot, Slot::Union(_)) || slot.as_optional_positional().is_some())
}

/// Replace `slots[index]` with `member`.
pub(crate) fn splice<'r>(slots: &[Slot<'r>], index: usize, member: Vec<Slot<'r>>) -> Vec<Slot<'r>> {
    let mut spliced = Vec::with_capacity(slots.len() + member.len());
    spliced.extend_from_slice(&slots[..index]);
    spliced.extend(member);
    spliced.extend_from_slice(&slots[index + 1..]);
    spliced
}

pub(crate) fn to_rule(slots: &[Slot]) -> Rule {
    Rule::new(slots.iter().map(Slot::to_parameter).collect())
}

/// Lazily expands deferred unions, depth first, members in document order.
///
/// A rule without deferred unions yields itself once. Alternatives are only
/// built when the previous one was rejected, so heavily unioned rules are
/// never enumerated up front.
pub(crate) struct Decompositions<'r> {
    pending: Vec<Vec<Slot<'r>>>,
}

impl<'r> Decompositions<'r> {
    pub fn new(slots: Vec<Slot<'r>>) -> Self {
        Self {
            pending: vec![slots],
        }
    }
}

impl<'r> Iterator for Decompositions<'r> {
    type Item = Vec<Slot<'r>>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(slots) = self.pending.pop() {
            let Some(index) = slots.iter().position(Slot::is_deferred_union) else {
                return Some(slots);
            };
            let Slot::Union(members) = &slots[index] else {
                continue;
            };

            // pushed in reverse so the first member is explored first
            for member in members.iter().rev() {
                self.pending.push(splice(&slots, index, Slot::view(*member)));
            }
        }

        None
    }
}
