//! Step-by-step evaluation of a string against an [`Fa`], used by both
//! [`crate::fa::Dfa::evaluator`] and [`crate::fa::Nfa::evaluator`]. Useful
//! for tracing or for a UI that wants to animate the frontier one symbol
//! at a time instead of calling `accepts` on the whole word at once.

use crate::fa::Fa;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct Evaluator<'a> {
    fa: &'a Fa,
    frontier: BTreeSet<usize>,
    /// Once a symbol leads to an empty frontier the evaluator is stuck;
    /// `step` keeps returning `None` rather than silently resetting.
    stuck: bool,
}

impl<'a> Evaluator<'a> {
    pub fn deterministic(fa: &'a Fa) -> Self {
        Evaluator {
            fa,
            frontier: BTreeSet::from([fa.start()]),
            stuck: false,
        }
    }

    pub fn nondeterministic(fa: &'a Fa) -> Self {
        Evaluator {
            frontier: fa.epsilon_closure(fa.start()),
            fa,
            stuck: false,
        }
    }

    pub fn is_accepting(&self) -> bool {
        !self.stuck && self.frontier.iter().any(|&q| self.fa.is_accepting(q))
    }

    pub fn current_states(&self) -> &BTreeSet<usize> {
        &self.frontier
    }

    /// Advances the frontier on one symbol. Returns `None` (and marks the
    /// evaluator stuck) if no successor exists.
    pub fn step(&mut self, symbol: &str) -> Option<&BTreeSet<usize>> {
        if self.stuck {
            return None;
        }
        let mut next = BTreeSet::new();
        for &q in &self.frontier {
            for q2 in self.fa.successors(q, symbol) {
                next.extend(self.fa.epsilon_closure(q2));
            }
        }
        if next.is_empty() {
            self.stuck = true;
            return None;
        }
        self.frontier = next;
        Some(&self.frontier)
    }

    pub fn step_all(&mut self, word: &[&str]) -> Option<&BTreeSet<usize>> {
        for &symbol in word {
            self.step(symbol)?;
        }
        Some(&self.frontier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fa::{Dfa, Symbol};
    use std::collections::BTreeMap;

    #[test]
    fn evaluator_tracks_frontier() {
        let mut t = BTreeMap::new();
        t.insert((1, 2), BTreeSet::from([Symbol::from("a")]));
        t.insert((2, 1), BTreeSet::from([Symbol::from("a")]));
        let fa = Fa::new(2, 1, BTreeSet::from([2]), t).unwrap();
        let dfa = Dfa::try_from(fa).unwrap();
        let mut eval = dfa.evaluator();
        assert!(!eval.is_accepting());
        eval.step("a");
        assert!(eval.is_accepting());
        eval.step("b");
        assert!(!eval.is_accepting());
        assert!(eval.step("a").is_none());
    }
}
