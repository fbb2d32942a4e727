//! Candidate selection: score the library, narrow it, and run the matching
//! pipeline against each remaining candidate until one fits.

use crate::anchor::anchor_literals;
use crate::assign::{Assignment, assign};
use crate::error::{InvariantViolation, MatchError};
use crate::matcher::Matcher;
use crate::prune::prune_unions;
use crate::result::MatchResult;
use crate::rule::{Parameter, Rule, keyword_eq, occurs};
use crate::slot::{Decompositions, Slot, is_flat, to_rule};
use crate::trace::{CandidateOutcome, CandidateStep};

pub(crate) fn select<'r, G: AsRef<Rule>>(
    matcher: Matcher,
    tokens: &[&str],
    rules: &[&'r G],
    depth: usize,
) -> Result<MatchResult<'r, G>, MatchError> {
    select_traced(matcher, tokens, rules, depth).0
}

/// Same as `select`, also reporting what happened to every rule.
pub(crate) fn select_traced<'r, G: AsRef<Rule>>(
    matcher: Matcher,
    tokens: &[&str],
    rules: &[&'r G],
    depth: usize,
) -> (Result<MatchResult<'r, G>, MatchError>, Vec<CandidateStep>) {
    let scores: Vec<usize> = rules
        .iter()
        .map(|rule| prefix_score(rule.as_ref(), tokens))
        .collect();
    let best = scores.iter().copied().max().unwrap_or(0);

    let mut steps: Vec<CandidateStep> = scores
        .iter()
        .enumerate()
        .map(|(index, &score)| CandidateStep {
            index,
            score,
            outcome: if best > 0 && score == best {
                CandidateOutcome::NotAttempted
            } else {
                CandidateOutcome::BelowBestScore
            },
        })
        .collect();

    if depth > matcher.max_depth() {
        let max = matcher.max_depth();
        return (Err(MatchError::DepthExceeded { max }), steps);
    }

    let mut last_error = None;

    for (index, &rule) in rules.iter().enumerate() {
        if steps[index].outcome != CandidateOutcome::NotAttempted {
            continue;
        }

        if let Some(missing) = missing_literal(rule.as_ref(), tokens) {
            steps[index].outcome = CandidateOutcome::MissingLiteral(missing.to_string());
            continue;
        }

        match attempt(matcher, tokens, rule.as_ref(), depth) {
            Ok(assignment) => {
                steps[index].outcome = CandidateOutcome::Matched;
                let result = MatchResult {
                    rule,
                    literals: assignment.literals,
                    positionals: assignment.positionals,
                };
                return (Ok(result), steps);
            }
            Err(e) => {
                steps[index].outcome = CandidateOutcome::Failed(e.clone());
                if !e.is_recoverable() {
                    return (Err(e), steps);
                }
                last_error = Some(e);
            }
        }
    }

    let error = last_error.unwrap_or_else(|| MatchError::rule_not_found(tokens));
    (Err(error), steps)
}

/// Length of the unbroken literal prefix of `rule` matched by the tokens.
fn prefix_score(rule: &Rule, tokens: &[&str]) -> usize {
    rule.iter()
        .zip(tokens)
        .take_while(|(parameter, token)| {
            matches!(parameter, Parameter::Literal(value) if keyword_eq(value, token))
        })
        .count()
}

/// First top-level literal that never occurs in the tokens.
fn missing_literal<'r>(rule: &'r Rule, tokens: &[&str]) -> Option<&'r str> {
    rule.iter().find_map(|parameter| match parameter {
        Parameter::Literal(value) if !occurs(value, tokens) => Some(value.as_str()),
        _ => None,
    })
}

/// Prune, anchor, then try each decomposition until one can be assigned.
fn attempt<'r>(
    matcher: Matcher,
    tokens: &[&str],
    rule: &'r Rule,
    depth: usize,
) -> Result<Assignment<'r>, MatchError> {
    let pruned = prune_unions(tokens, rule)?;
    let (anchored, anchors) = anchor_literals(tokens, pruned);

    // keywords out of order leave a literal without a token
    if anchored.iter().filter(|slot| slot.is_literal()).count() > anchors.len() {
        return Err(MatchError::rule_not_found(tokens));
    }

    let mut last_error = None;
    for slots in Decompositions::new(anchored) {
        ensure_flat(&slots)?;
        match assign(matcher, tokens, &slots, &anchors, depth) {
            Ok(assignment) => return Ok(assignment),
            Err(e) if e.is_recoverable() => last_error = Some(e),
            Err(e) => return Err(e),
        }
    }

    Err(last_error.unwrap_or_else(|| MatchError::rule_not_found(tokens)))
}

fn ensure_flat(slots: &[Slot]) -> Result<(), MatchError> {
    if is_flat(slots) {
        Ok(())
    } else {
        Err(InvariantViolation::NonFlatRule(to_rule(slots).to_string()).into())
    }
}
