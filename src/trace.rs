//! Candidate selection trace for debugging which rule matched and why the
//! others did not.
//!
//! ```ignore
//! let trace = Matcher::default().match_with_trace(&tokens, &rules);
//! println!("Result: {:?}", trace.result);
//! for step in &trace.steps {
//!     println!("  rule[{}] score={} {:?}", step.index, step.score, step.outcome);
//! }
//! ```

use crate::error::MatchError;
use crate::result::MatchResult;
use crate::rule::Rule;

/// Trace of one top-level match.
///
/// `result` always equals what `match_tokens` returns for the same input.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchTrace<'r, G = Rule> {
    pub result: Result<MatchResult<'r, G>, MatchError>,
    /// One step per library rule, in library order
    pub steps: Vec<CandidateStep>,
}

impl<G> MatchTrace<'_, G> {
    /// The step of the rule that matched, if any
    pub fn matched(&self) -> Option<&CandidateStep> {
        self.steps
            .iter()
            .find(|step| step.outcome == CandidateOutcome::Matched)
    }

    /// Steps of the rules the full pipeline ran against
    pub fn attempted(&self) -> impl Iterator<Item = &CandidateStep> {
        self.steps.iter().filter(|step| {
            matches!(
                step.outcome,
                CandidateOutcome::Failed(_) | CandidateOutcome::Matched
            )
        })
    }
}

/// How the selector treated one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateStep {
    /// Index in the rule library (0-based)
    pub index: usize,
    /// Length of the leading literal prefix matched by the tokens
    pub score: usize,
    pub outcome: CandidateOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateOutcome {
    /// Scored below the best candidate, or zero
    BelowBestScore,
    /// A mandatory literal never occurs in the tokens
    MissingLiteral(String),
    /// The pipeline ran and rejected the tokens
    Failed(MatchError),
    Matched,
    /// A candidate that was never reached: an earlier one matched or failed
    /// fatally.
    NotAttempted,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(index: usize, outcome: CandidateOutcome) -> CandidateStep {
        CandidateStep {
            index,
            score: 1,
            outcome,
        }
    }

    #[test]
    fn test_matched_and_attempted() {
        let trace: MatchTrace<'_> = MatchTrace {
            result: Err(MatchError::rule_not_found(&["x"])),
            steps: vec![
                step(0, CandidateOutcome::BelowBestScore),
                step(1, CandidateOutcome::Failed(MatchError::rule_not_found(&["x"]))),
                step(2, CandidateOutcome::Matched),
                step(3, CandidateOutcome::NotAttempted),
            ],
        };

        assert_eq!(trace.matched().map(|s| s.index), Some(2));
        assert_eq!(
            trace.attempted().map(|s| s.index).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn test_no_match() {
        let trace: MatchTrace<'_> = MatchTrace {
            result: Err(MatchError::rule_not_found(&["x"])),
            steps: vec![step(0, CandidateOutcome::MissingLiteral("y".into()))],
        };
        assert!(trace.matched().is_none());
        assert_eq!(trace.attempted().count(), 0);
    }
}
