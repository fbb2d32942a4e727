//! Positional assignment over a flat, anchored rule.
//!
//! The rule is cut at its literals into segments and the tokens are cut at
//! the anchors into spans; segment `k` owns span `k`. Spans whose segment
//! declares object-typed positionals are first run through the nested
//! resolver, which turns matching sub-spans into object captures. The
//! resulting items are then dealt out to the segment's slots.

use crate::anchor::Anchor;
use crate::error::{InvariantViolation, MatchError};
use crate::matcher::Matcher;
use crate::result::{Binding, Capture, MatchResult};
use crate::rule::{ObjectRule, Positional};
use crate::select::select;
use crate::slot::Slot;

/// Captures of one successful assignment, in rule order.
#[derive(Debug)]
pub(crate) struct Assignment<'r> {
    pub literals: Vec<String>,
    pub positionals: Vec<Binding<'r>>,
}

/// A unit of input for positional slots.
#[derive(Debug)]
enum Item<'t, 'r> {
    Token(&'t str),
    Object(MatchResult<'r, ObjectRule>),
}

impl<'r> Item<'_, 'r> {
    fn fits(&self, positional: &Positional) -> bool {
        match self {
            Item::Token(token) => positional.accepts_token(token),
            Item::Object(result) => positional.accepts_object(result.name()),
        }
    }

    fn into_capture(self) -> Capture<'r> {
        match self {
            Item::Token(token) => Capture::Value(token.to_string()),
            Item::Object(result) => Capture::Object(result),
        }
    }
}

pub(crate) fn assign<'r>(
    matcher: Matcher,
    tokens: &[&str],
    slots: &[Slot<'r>],
    anchors: &[Anchor],
    depth: usize,
) -> Result<Assignment<'r>, MatchError> {
    let segments: Vec<&[Slot<'r>]> = slots.split(Slot::is_literal).collect();
    let spans = spans(tokens, anchors);

    let mut items = Vec::with_capacity(segments.len());
    for (segment, span) in segments.iter().zip(&spans) {
        let object_rules = object_rules(segment);
        if object_rules.is_empty() {
            items.push(span.iter().copied().map(Item::Token).collect());
        } else {
            items.push(resolve(matcher, span, &object_rules, depth)?);
        }
    }

    let required = required_positionals(slots);
    let available: usize = items.iter().map(Vec::len).sum();
    if available < required {
        return Err(MatchError::TooFewArguments {
            required,
            available,
        });
    }

    let positional_slots = slots.iter().filter(|slot| !slot.is_literal()).count();
    if positional_slots < available {
        return Err(MatchError::TooManyArguments {
            slots: positional_slots,
            supplied: available,
        });
    }

    let mut positionals = Vec::with_capacity(positional_slots);
    for (segment, items) in segments.into_iter().zip(items) {
        positionals.extend(fill(segment, items)?);
    }

    let mut literals = Vec::with_capacity(anchors.len());
    for (slot, _) in slots.iter().enumerate().filter(|(_, slot)| slot.is_literal()) {
        let anchor = anchors
            .get(literals.len())
            .ok_or(InvariantViolation::MissingAnchor { slot })?;
        literals.push(tokens[anchor.token].to_string());
    }

    Ok(Assignment {
        literals,
        positionals,
    })
}

/// Tokens before the first anchor, between consecutive anchors and after
/// the last one. Always `anchors.len() + 1` spans.
fn spans<'a, 't>(tokens: &'a [&'t str], anchors: &[Anchor]) -> Vec<&'a [&'t str]> {
    let mut spans = Vec::with_capacity(anchors.len() + 1);
    let mut start = 0;
    for anchor in anchors {
        spans.push(&tokens[start..anchor.token]);
        start = anchor.token + 1;
    }
    spans.push(&tokens[start..]);
    spans
}

/// Object rules declared by the segment's positionals, first declaration
/// of each name wins.
fn object_rules<'r>(segment: &[Slot<'r>]) -> Vec<&'r ObjectRule> {
    let mut rules: Vec<&'r ObjectRule> = Vec::new();
    for slot in segment {
        let positional = match slot {
            Slot::Positional(p) => *p,
            other => match other.as_optional_positional() {
                Some(p) => p,
                None => continue,
            },
        };
        for rule in positional.object_rules() {
            if !rules.iter().any(|known| known.name == rule.name) {
                rules.push(rule);
            }
        }
    }
    rules
}

/// Match sub-spans of `span` against object rules, depth first.
///
/// At each position the longest prefix that matches wins. A position where
/// nothing matches keeps its token as a plain item.
fn resolve<'t, 'r>(
    matcher: Matcher,
    span: &[&'t str],
    rules: &[&'r ObjectRule],
    depth: usize,
) -> Result<Vec<Item<'t, 'r>>, MatchError> {
    let mut items = Vec::new();
    let mut start = 0;

    while start < span.len() {
        let mut end = span.len();
        loop {
            match select(matcher, &span[start..end], rules, depth + 1) {
                Ok(result) => {
                    items.push(Item::Object(result));
                    start = end;
                    break;
                }
                Err(MatchError::TooManyArguments { .. }) if end - start > 1 => end -= 1,
                Err(e) if e.is_recoverable() => {
                    items.push(Item::Token(span[start]));
                    start += 1;
                    break;
                }
                Err(e) => return Err(e),
            }
        }
    }

    Ok(items)
}

/// Deal `items` out to the slots of one segment.
fn fill<'t, 'r>(
    segment: &[Slot<'r>],
    items: Vec<Item<'t, 'r>>,
) -> Result<Vec<Binding<'r>>, MatchError> {
    let supplied = items.len();
    let mut items = items.into_iter().peekable();
    let mut bindings = Vec::with_capacity(segment.len());

    for (index, slot) in segment.iter().enumerate() {
        let required_after = required_positionals(&segment[index + 1..]);

        let (positional, item) = match slot {
            &Slot::Positional(positional) => {
                let Some(item) = items.next() else {
                    return Err(MatchError::TooFewArguments {
                        required: required_positionals(segment),
                        available: supplied,
                    });
                };
                // demoted tokens may still land in object-typed slots
                if let Item::Token(token) = &item {
                    if positional.object_rules().next().is_none()
                        && !positional.accepts_token(token)
                    {
                        return Err(MatchError::rule_not_found(&[*token]));
                    }
                }
                (positional, item)
            }
            _ => {
                let Some(positional) = slot.as_optional_positional() else {
                    continue;
                };
                let take = items.len() > required_after
                    && items.peek().is_some_and(|item| item.fits(positional));
                match items.next_if(|_| take) {
                    Some(item) => (positional, item),
                    None => continue,
                }
            }
        };

        bindings.push(Binding {
            name: &positional.name,
            capture: item.into_capture(),
        });
    }

    if items.peek().is_some() {
        return Err(MatchError::TooManyArguments {
            slots: segment.len(),
            supplied,
        });
    }

    Ok(bindings)
}

fn required_positionals(slots: &[Slot]) -> usize {
    slots
        .iter()
        .filter(|slot| matches!(slot, Slot::Positional(_)))
        .count()
}
