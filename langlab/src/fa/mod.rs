//! # Finite automaton
//!
//! [`Fa`] is the single data structure backing both NFAs and DFAs (see the
//! module-level discussion in the crate root for why these aren't two
//! separate types). A `Fa` is a tuple `(States, Δ, q0, F)`:
//!
//! * `States` is the contiguous range `1..=state_count`.
//! * `Δ` maps a `(src, dst)` state pair to the *non-empty* set of symbols
//!   labeling that edge - transitions are indexed by state pair, not by
//!   `(state, symbol)`, so a pair of states has at most one entry in `Δ`
//!   no matter how many symbols connect them.
//! * `q0` is the initial state.
//! * `F` is the set of accepting states.
//!
//! `Fa` values are immutable once constructed; every operation in
//! [`algebra`] consumes references and returns a fresh `Fa`.
//!
//! [`Dfa`] and [`Nfa`] are thin typed wrappers that assert (respectively
//! assume) determinism; all the actual algebra lives on `Fa` itself, per
//! the "automaton polymorphism" design note: there is one data structure,
//! and two typed construction paths into it.

pub mod algebra;
pub mod eval;
pub mod parse;
pub mod words;

use crate::error::Error;
use crate::table::Table;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::rc::Rc;

/// The reserved empty-transition symbol. Written `&` in the file format.
pub const EPSILON: &str = "ε";

/// A symbol label. Cheap to clone - automata routinely share labels across
/// many edges.
pub type Symbol = Rc<str>;

/// The core automaton value described in the module docs above. Use
/// [`Dfa::try_from`]/[`Nfa::from`] to obtain a typed view once you know (or
/// want to assert) whether it's deterministic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fa {
    state_count: usize,
    start: usize,
    accepting: BTreeSet<usize>,
    transitions: BTreeMap<(usize, usize), BTreeSet<Symbol>>,
}

impl Fa {
    /// Builds a new automaton, checking the invariants of the data model:
    /// every state referenced by `start`, `accepting` or `transitions` must
    /// lie in `1..=state_count`, and no transition may carry an empty
    /// symbol set.
    pub fn new(
        state_count: usize,
        start: usize,
        accepting: BTreeSet<usize>,
        transitions: BTreeMap<(usize, usize), BTreeSet<Symbol>>,
    ) -> Result<Self, Error> {
        let in_range = |q: usize| q >= 1 && q <= state_count;
        if !in_range(start) {
            return Err(Error::StateNotFound(start));
        }
        for &q in &accepting {
            if !in_range(q) {
                return Err(Error::StateNotFound(q));
            }
        }
        for (&(src, dst), syms) in &transitions {
            if !in_range(src) {
                return Err(Error::StateNotFound(src));
            }
            if !in_range(dst) {
                return Err(Error::StateNotFound(dst));
            }
            if syms.is_empty() {
                return Err(Error::InvalidFile(format!(
                    "transition {src} -> {dst} carries no symbols"
                )));
            }
        }
        Ok(Fa {
            state_count,
            start,
            accepting,
            transitions,
        })
    }

    /// Number of states, i.e. `|States|`.
    pub fn state_count(&self) -> usize {
        self.state_count
    }

    /// All state identifiers, `1..=state_count`.
    pub fn states(&self) -> impl Iterator<Item = usize> {
        1..=self.state_count
    }

    /// The initial state `q0`.
    pub fn start(&self) -> usize {
        self.start
    }

    /// `F`, the accepting states.
    pub fn accepting(&self) -> &BTreeSet<usize> {
        &self.accepting
    }

    pub fn is_accepting(&self, state: usize) -> bool {
        self.accepting.contains(&state)
    }

    /// The raw transition table, `(src, dst) -> symbols`.
    pub fn transitions(&self) -> &BTreeMap<(usize, usize), BTreeSet<Symbol>> {
        &self.transitions
    }

    /// `Σ`, the sorted union of every symbol label appearing in `Δ`
    /// (including `ε` if present).
    pub fn alphabet(&self) -> BTreeSet<Symbol> {
        self.transitions
            .values()
            .flat_map(|syms| syms.iter().cloned())
            .collect()
    }

    /// Sorted list of `q'` such that `a ∈ Δ(q, q')`.
    pub fn successors(&self, state: usize, symbol: &str) -> Vec<usize> {
        self.transitions
            .range((state, 0)..(state + 1, 0))
            .filter(|(_, syms)| syms.iter().any(|s| s.as_ref() == symbol))
            .map(|(&(_, dst), _)| dst)
            .collect()
    }

    /// All `q'` reachable from `state` on any symbol (used by reachability
    /// pruning, which doesn't care about labels).
    fn all_successors(&self, state: usize) -> Vec<usize> {
        self.transitions
            .range((state, 0)..(state + 1, 0))
            .map(|(&(_, dst), _)| dst)
            .collect()
    }

    /// True iff `ε ∈ Σ` or some `(state, symbol)` pair has more than one
    /// successor.
    pub fn is_nondeterministic(&self) -> bool {
        if self.alphabet().iter().any(|s| s.as_ref() == EPSILON) {
            return true;
        }
        for state in self.states() {
            let mut by_symbol: BTreeMap<&str, usize> = BTreeMap::new();
            for (&(src, _), syms) in self.transitions.range((state, 0)..(state + 1, 0)) {
                debug_assert_eq!(src, state);
                for sym in syms {
                    *by_symbol.entry(sym.as_ref()).or_insert(0) += 1;
                    if by_symbol[sym.as_ref()] > 1 {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// The least set containing `state` closed under ε-successors,
    /// computed by DFS (cycles are fine, we track visited states).
    pub fn epsilon_closure(&self, state: usize) -> BTreeSet<usize> {
        let mut closure = BTreeSet::new();
        let mut stack = vec![state];
        while let Some(q) = stack.pop() {
            if closure.insert(q) {
                for q2 in self.successors(q, EPSILON) {
                    if !closure.contains(&q2) {
                        stack.push(q2);
                    }
                }
            }
        }
        closure
    }

    /// Renders this automaton as a transition table suitable for the file
    /// format in [`crate::parser::fa`].
    pub fn to_table_string(&self) -> Result<String, Error> {
        if self.state_count == 0 {
            return Err(Error::EmptyAutomaton);
        }
        let mut out = String::new();
        out.push_str(&format!("*vertices {}\n", self.state_count));
        out.push_str(&format!("*initial {}\n", self.start));
        out.push_str("*final ");
        out.push_str(
            &self
                .accepting
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(" "),
        );
        out.push('\n');
        out.push_str("*transitions\n");
        let mut table = Table::default();
        for (&(src, dst), syms) in &self.transitions {
            let syms = syms
                .iter()
                .map(|s| if s.as_ref() == EPSILON { "&" } else { s.as_ref() })
                .collect::<Vec<_>>()
                .join(" ");
            table.push_row(vec![
                src.to_string(),
                ">".to_string(),
                dst.to_string(),
                "|".to_string(),
                syms,
            ]);
        }
        out.push_str(&table.to_string(" "));
        Ok(out)
    }
}

impl fmt::Display for Fa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_table_string() {
            Ok(s) => write!(f, "{s}"),
            Err(_) => write!(f, "(empty automaton)"),
        }
    }
}

/// An automaton that is known (and enforced at construction) to be
/// deterministic: `ε ∉ Σ` and every `(state, symbol)` has at most one
/// successor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dfa {
    fa: Fa,
}

impl Dfa {
    /// The underlying automaton value.
    pub fn inner(&self) -> &Fa {
        &self.fa
    }

    pub fn into_inner(self) -> Fa {
        self.fa
    }

    /// Used by algebra constructors (determinize, minimize, ...) that are
    /// known by construction to produce a deterministic automaton - saves
    /// re-running the nondeterminism scan just to re-confirm it.
    pub(crate) fn from_fa_infallible(fa: Fa) -> Self {
        debug_assert!(
            !fa.is_nondeterministic(),
            "from_fa_infallible called with a nondeterministic automaton"
        );
        Dfa { fa }
    }

    /// `accepts(w)`: start from `{q0}`, replace the frontier with its
    /// successor on each symbol of `w` in turn, accept iff the final
    /// (singleton, for a true DFA) frontier intersects `F`.
    pub fn accepts(&self, word: &[&str]) -> bool {
        let mut frontier: BTreeSet<usize> = BTreeSet::from([self.fa.start]);
        for &symbol in word {
            frontier = frontier
                .iter()
                .flat_map(|&q| self.fa.successors(q, symbol))
                .collect();
            if frontier.is_empty() {
                return false;
            }
        }
        frontier.iter().any(|q| self.fa.is_accepting(*q))
    }

    pub fn evaluator(&self) -> eval::Evaluator<'_> {
        eval::Evaluator::deterministic(&self.fa)
    }

    pub fn to_nfa(&self) -> Nfa {
        Nfa {
            fa: self.fa.clone(),
        }
    }

    pub fn minimize(&self) -> Dfa {
        Dfa::from_fa_infallible(algebra::minimize(&self.fa))
    }

    pub fn union(&self, other: &Dfa) -> Dfa {
        Dfa::from_fa_infallible(algebra::product(&self.fa, &other.fa, |a, b| a || b))
    }

    pub fn intersection(&self, other: &Dfa) -> Dfa {
        Dfa::from_fa_infallible(algebra::product(&self.fa, &other.fa, |a, b| a && b))
    }

    pub fn difference(&self, other: &Dfa) -> Dfa {
        Dfa::from_fa_infallible(algebra::product(&self.fa, &other.fa, |a, b| a && !b))
    }

    pub fn symmetric_difference(&self, other: &Dfa) -> Dfa {
        Dfa::from_fa_infallible(algebra::product(&self.fa, &other.fa, |a, b| a != b))
    }

    /// Two DFAs are equivalent iff their symmetric difference accepts no
    /// string, i.e. the minimized symmetric difference has no reachable
    /// accepting state.
    pub fn equivalent_to(&self, other: &Dfa) -> bool {
        let diff = self.symmetric_difference(other);
        let pruned = algebra::reachable(diff.inner());
        pruned.accepting().is_empty()
    }
}

impl TryFrom<Fa> for Dfa {
    type Error = Error;

    fn try_from(fa: Fa) -> Result<Self, Self::Error> {
        if fa.is_nondeterministic() {
            Err(Error::DeterminismMismatch(
                "automaton has epsilon transitions or ambiguous (state, symbol) pairs"
                    .to_string(),
            ))
        } else {
            Ok(Dfa { fa })
        }
    }
}

/// An automaton that may be nondeterministic (it may also happen to be
/// deterministic; no claim either way is enforced).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nfa {
    fa: Fa,
}

impl Nfa {
    pub fn inner(&self) -> &Fa {
        &self.fa
    }

    pub fn into_inner(self) -> Fa {
        self.fa
    }

    /// `accepts(w)` for a possibly-nondeterministic automaton: close the
    /// frontier under ε after every symbol (and before the first one).
    pub fn accepts(&self, word: &[&str]) -> bool {
        let mut frontier = self.fa.epsilon_closure(self.fa.start);
        for &symbol in word {
            let mut next = BTreeSet::new();
            for &q in &frontier {
                for q2 in self.fa.successors(q, symbol) {
                    next.extend(self.fa.epsilon_closure(q2));
                }
            }
            frontier = next;
            if frontier.is_empty() {
                return false;
            }
        }
        frontier.iter().any(|q| self.fa.is_accepting(*q))
    }

    pub fn evaluator(&self) -> eval::Evaluator<'_> {
        eval::Evaluator::nondeterministic(&self.fa)
    }

    /// Subset construction: bridges this (possibly nondeterministic)
    /// automaton to an equivalent [`Dfa`].
    pub fn to_dfa(&self) -> Dfa {
        Dfa::from_fa_infallible(algebra::determinize(&self.fa))
    }

    pub fn union(&self, other: &Nfa) -> Nfa {
        Nfa {
            fa: algebra::union(&self.fa, &other.fa),
        }
    }

    pub fn product(&self, other: &Nfa, accept: impl Fn(bool, bool) -> bool) -> Nfa {
        Nfa {
            fa: algebra::product(&self.fa, &other.fa, accept),
        }
    }

    pub fn words(&self, limit: usize) -> words::Words {
        words::Words::new(&self.fa, limit)
    }
}

impl From<Fa> for Nfa {
    fn from(fa: Fa) -> Self {
        Nfa { fa }
    }
}

impl From<Dfa> for Nfa {
    fn from(dfa: Dfa) -> Self {
        Nfa { fa: dfa.fa }
    }
}
