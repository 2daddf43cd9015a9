//! Enumerating the words of an automaton's language, in order of
//! increasing length and lexicographically within each length. This backs
//! the CLI's `enumerate` subcommand (component J, "print the first N
//! words of an automaton's or regex's language").
//!
//! The search is a breadth-first walk over ε-closed frontiers, pruned by a
//! precomputed "can this state still reach an accepting state" set so
//! that branches with no hope of ever accepting are abandoned immediately
//! rather than explored to some arbitrary depth bound.

use crate::fa::{Fa, Symbol};
use std::collections::{BTreeSet, VecDeque};

/// A lazy, lexicographic, length-first iterator over the words accepted
/// by an [`Fa`]. Construct via [`crate::fa::Nfa::words`].
pub struct Words<'a> {
    fa: &'a Fa,
    alphabet: Vec<Symbol>,
    alive: BTreeSet<usize>,
    queue: VecDeque<(BTreeSet<usize>, Vec<Symbol>)>,
    remaining: usize,
}

impl<'a> Words<'a> {
    pub(crate) fn new(fa: &'a Fa, limit: usize) -> Self {
        let alphabet: Vec<Symbol> = fa
            .alphabet()
            .into_iter()
            .filter(|s| s.as_ref() != crate::fa::EPSILON)
            .collect();
        let alive = reachability_to_accepting(fa);
        let start = fa.epsilon_closure(fa.start());
        let mut queue = VecDeque::new();
        queue.push_back((start, Vec::new()));
        Words {
            fa,
            alphabet,
            alive,
            queue,
            remaining: limit,
        }
    }
}

/// States from which some accepting state is reachable (forward, any
/// symbol including ε) - the complement of "dead" states, computed
/// directly over the raw `Fa` rather than routing through
/// [`crate::fa::algebra::prune_dead`] since we only need membership here.
fn reachability_to_accepting(fa: &Fa) -> BTreeSet<usize> {
    let mut reverse: std::collections::BTreeMap<usize, Vec<usize>> = Default::default();
    for (&(src, dst), _) in fa.transitions() {
        reverse.entry(dst).or_default().push(src);
    }
    let mut alive: BTreeSet<usize> = fa.accepting().clone();
    let mut queue: VecDeque<usize> = alive.iter().copied().collect();
    while let Some(q) = queue.pop_front() {
        if let Some(preds) = reverse.get(&q) {
            for &p in preds {
                if alive.insert(p) {
                    queue.push_back(p);
                }
            }
        }
    }
    alive
}

impl<'a> Iterator for Words<'a> {
    type Item = Vec<Symbol>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        while let Some((frontier, word)) = self.queue.pop_front() {
            let accepts = frontier.iter().any(|q| self.fa.is_accepting(*q));
            for symbol in &self.alphabet {
                let mut next_frontier = BTreeSet::new();
                for &q in &frontier {
                    for q2 in self.fa.successors(q, symbol) {
                        next_frontier.extend(self.fa.epsilon_closure(q2));
                    }
                }
                if next_frontier.iter().any(|q| self.alive.contains(q)) {
                    let mut next_word = word.clone();
                    next_word.push(symbol.clone());
                    self.queue.push_back((next_frontier, next_word));
                }
            }
            if accepts {
                self.remaining -= 1;
                return Some(word);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fa::{Nfa, EPSILON};
    use std::collections::BTreeMap;

    fn sym(s: &str) -> Symbol {
        Symbol::from(s)
    }

    #[test]
    fn enumerates_in_length_then_lex_order() {
        // (a|b)*, accepts every string over {a,b}.
        let mut t = BTreeMap::new();
        t.insert((1, 1), BTreeSet::from([sym("a"), sym("b")]));
        let fa = Fa::new(1, 1, BTreeSet::from([1]), t).unwrap();
        let nfa = Nfa::from(fa);
        let words: Vec<String> = nfa
            .words(6)
            .map(|w| w.iter().map(|s| s.as_ref()).collect())
            .collect();
        assert_eq!(words, vec!["", "a", "b", "aa", "ab", "ba"]);
    }

    #[test]
    fn pruned_branches_are_never_explored() {
        // a dead branch through state 2 should never surface in the enumeration.
        let mut t = BTreeMap::new();
        t.insert((1, 1), BTreeSet::from([sym("a")]));
        t.insert((1, 2), BTreeSet::from([sym(EPSILON)]));
        let fa = Fa::new(2, 1, BTreeSet::from([1]), t).unwrap();
        let nfa = Nfa::from(fa);
        let words: Vec<String> = nfa
            .words(3)
            .map(|w| w.iter().map(|s| s.as_ref()).collect())
            .collect();
        assert_eq!(words, vec!["", "a", "aa"]);
    }
}
