//! # Context-free grammars
//!
//! [`Grammar`] is an ordered mapping from nonterminal to its list of
//! production bodies - the dict-of-lists the reference workbench keeps,
//! generalized just enough to track the nonterminal *insertion order*
//! explicitly (the start symbol is the first one seen), since Rust has no
//! ordered-dict-by-default the way the source language does.
//!
//! A nonterminal is any grammar symbol whose first character is uppercase;
//! everything else - including the reserved `&` (ε) - is a terminal. This
//! module owns the representation, classification, and the FIRST/FOLLOW
//! set computations; [`transform`] owns left factoring and left-recursion
//! elimination, [`ll`] the LL(1) table and driver, and [`slr`] the LR(0)
//! collection and SLR(1) table and driver.

pub mod ll;
pub mod parse;
pub mod slr;
pub mod transform;

use crate::error::Error;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

/// The grammar symbol standing for the empty string. Distinct from
/// [`crate::fa::EPSILON`] - that one is the automaton file format's ε
/// symbol (`ε`, written `&` on disk); this one is the grammar's own ε
/// symbol, which is spelled `&` both on disk and internally.
pub const EPSILON: &str = "&";

/// The end-of-input sentinel used by FOLLOW sets and both parser drivers.
pub const END_OF_INPUT: &str = "$";

/// True iff `symbol` is a nonterminal: its first character is an
/// uppercase letter. Everything else, including `&` and `$`, is a
/// terminal.
pub fn is_nonterminal(symbol: &str) -> bool {
    symbol.chars().next().map(|c| c.is_uppercase()).unwrap_or(false)
}

/// A context-free grammar: an ordered list of nonterminals (the first is
/// the start symbol) plus, for each, an ordered list of production
/// bodies. A body of exactly `[&]` denotes the ε-production.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    order: Vec<Rc<str>>,
    productions: BTreeMap<Rc<str>, Vec<Vec<Rc<str>>>>,
}

impl Grammar {
    /// Builds a grammar directly from already-validated parts. Used by
    /// [`transform`], [`ll`] and [`slr`], which only ever synthesize
    /// well-formed context-free grammars; text ingestion instead goes
    /// through [`parse`]'s `TryFrom`.
    pub(crate) fn from_parts(
        order: Vec<Rc<str>>,
        productions: BTreeMap<Rc<str>, Vec<Vec<Rc<str>>>>,
    ) -> Grammar {
        debug_assert!(!order.is_empty());
        debug_assert!(order.iter().all(|nt| is_nonterminal(nt)));
        debug_assert_eq!(
            order.iter().cloned().collect::<BTreeSet<_>>(),
            productions.keys().cloned().collect::<BTreeSet<_>>()
        );
        Grammar { order, productions }
    }

    /// The nonterminals, in the order they were first declared. The
    /// start symbol is `nonterminals()[0]`.
    pub fn nonterminals(&self) -> &[Rc<str>] {
        &self.order
    }

    pub fn start(&self) -> &Rc<str> {
        &self.order[0]
    }

    /// The bodies for one nonterminal, in declaration order.
    pub fn productions(&self, nonterminal: &str) -> &[Vec<Rc<str>>] {
        self.productions
            .get(nonterminal)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn all_productions(&self) -> impl Iterator<Item = (&Rc<str>, &Vec<Vec<Rc<str>>>)> {
        self.order.iter().map(|nt| (nt, &self.productions[nt]))
    }

    /// The terminal alphabet: every body symbol that isn't a
    /// nonterminal, excluding the ε marker `&` itself.
    pub fn terminals(&self) -> BTreeSet<Rc<str>> {
        self.productions
            .values()
            .flatten()
            .flatten()
            .filter(|s| !is_nonterminal(s) && s.as_ref() != EPSILON)
            .cloned()
            .collect()
    }

    /// Always true: the representation can only hold a single-nonterminal
    /// head per production set, so every `Grammar` that exists is
    /// context-free by construction. [`parse`] is where a malformed,
    /// not-context-free input is rejected before a `Grammar` is built.
    pub fn is_context_free(&self) -> bool {
        true
    }

    /// FIRST sets for every nonterminal, memoized for this one pass.
    /// Fails with [`Error::LeftRecursive`] if the grammar is still left
    /// recursive (checked by running [`transform::eliminate_left_recursion`]
    /// and seeing whether it had to introduce new nonterminals).
    pub fn first_sets(&self) -> Result<BTreeMap<Rc<str>, BTreeSet<Rc<str>>>, Error> {
        let eliminated = transform::eliminate_left_recursion(self)?;
        let before: BTreeSet<&Rc<str>> = self.order.iter().collect();
        let after: BTreeSet<&Rc<str>> = eliminated.order.iter().collect();
        if before != after {
            return Err(Error::LeftRecursive(format!(
                "{} is left-recursive",
                self.start()
            )));
        }

        let mut memo: BTreeMap<Rc<str>, BTreeSet<Rc<str>>> = BTreeMap::new();
        for nt in &self.order {
            self.first_of(nt, &mut memo);
        }
        Ok(memo)
    }

    /// Computes (and memoizes into `memo`) FIRST(value), where `value`
    /// may be a terminal or a nonterminal of this grammar.
    fn first_of(&self, value: &Rc<str>, memo: &mut BTreeMap<Rc<str>, BTreeSet<Rc<str>>>) -> BTreeSet<Rc<str>> {
        if !is_nonterminal(value) {
            return BTreeSet::from([value.clone()]);
        }
        if let Some(cached) = memo.get(value) {
            return cached.clone();
        }
        let eps: Rc<str> = Rc::from(EPSILON);
        let mut first = BTreeSet::new();
        for production in self.productions(value) {
            let nullable_prefix = production
                .iter()
                .filter(|p| *p != value)
                .all(|p| self.first_of(p, memo).contains(EPSILON));
            if nullable_prefix || production.as_slice() == [eps.clone()] {
                first.insert(eps.clone());
            }
            for symbol in production {
                if symbol == value {
                    break;
                }
                let symbol_first = self.first_of(symbol, memo);
                first.extend(symbol_first.iter().filter(|s| s.as_ref() != EPSILON).cloned());
                if !symbol_first.contains(EPSILON) {
                    break;
                }
            }
        }
        memo.insert(value.clone(), first.clone());
        first
    }

    /// FOLLOW sets for every nonterminal, given precomputed FIRST sets.
    /// `FOLLOW(start) ⊇ {$}`; repeat to a fixed point, for every
    /// occurrence `A → α X β`, pushing `FIRST(β) \ {ε}` into `FOLLOW(X)`
    /// and, if `β` is nullable (or empty), also `FOLLOW(A)`.
    pub fn follow_sets(&self, firsts: &BTreeMap<Rc<str>, BTreeSet<Rc<str>>>) -> BTreeMap<Rc<str>, BTreeSet<Rc<str>>> {
        let mut follow: BTreeMap<Rc<str>, BTreeSet<Rc<str>>> =
            self.order.iter().map(|nt| (nt.clone(), BTreeSet::new())).collect();
        follow.get_mut(self.start()).unwrap().insert(Rc::from(END_OF_INPUT));

        loop {
            let before: usize = follow.values().map(BTreeSet::len).sum();
            for (head, productions) in self.all_productions() {
                for production in productions {
                    for (index, symbol) in production.iter().enumerate() {
                        if is_nonterminal(symbol) {
                            insert_follow(&mut follow, firsts, head, production, index, symbol);
                        }
                    }
                }
            }
            let after: usize = follow.values().map(BTreeSet::len).sum();
            if after == before {
                break;
            }
        }
        follow
    }
}

fn insert_follow(
    follow: &mut BTreeMap<Rc<str>, BTreeSet<Rc<str>>>,
    firsts: &BTreeMap<Rc<str>, BTreeSet<Rc<str>>>,
    head: &Rc<str>,
    production: &[Rc<str>],
    mut index: usize,
    target: &Rc<str>,
) {
    loop {
        if index == production.len() - 1 {
            let head_follow = follow.get(head).cloned().unwrap_or_default();
            follow.entry(target.clone()).or_default().extend(head_follow);
            return;
        }
        let next = &production[index + 1];
        if !is_nonterminal(next) {
            follow.entry(target.clone()).or_default().insert(next.clone());
            return;
        }
        let next_first = firsts.get(next).cloned().unwrap_or_default();
        follow
            .entry(target.clone())
            .or_default()
            .extend(next_first.iter().filter(|s| s.as_ref() != EPSILON).cloned());
        if next_first.contains(EPSILON) {
            index += 1;
        } else {
            return;
        }
    }
}

/// `FIRST` of a whole symbol sequence (a production body, or a suffix of
/// one): the union of each leading symbol's FIRST set (minus ε) up to
/// and including the first non-nullable symbol, plus ε itself if every
/// symbol in the sequence is nullable (or the sequence is the
/// ε-production `[&]`/empty).
pub fn first_of_sequence(firsts: &BTreeMap<Rc<str>, BTreeSet<Rc<str>>>, sequence: &[Rc<str>]) -> BTreeSet<Rc<str>> {
    let eps: Rc<str> = Rc::from(EPSILON);
    if sequence.is_empty() || sequence == [eps.clone()] {
        return BTreeSet::from([eps]);
    }
    let mut result = BTreeSet::new();
    let mut all_nullable = true;
    for symbol in sequence {
        let symbol_first = if is_nonterminal(symbol) {
            firsts.get(symbol).cloned().unwrap_or_default()
        } else {
            BTreeSet::from([symbol.clone()])
        };
        result.extend(symbol_first.iter().filter(|s| s.as_ref() != EPSILON).cloned());
        if symbol_first.contains(EPSILON) {
            continue;
        } else {
            all_nullable = false;
            break;
        }
    }
    if all_nullable {
        result.insert(eps);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arithmetic_grammar() -> Grammar {
        let src = "\
E -> T E'
E' -> + T E' | &
T -> F T'
T' -> * F T' | &
F -> ( E ) | id
";
        let parsed = crate::parser::grammar(src).unwrap();
        Grammar::try_from(parsed).unwrap()
    }

    #[test]
    fn start_symbol_is_first_declared() {
        let g = arithmetic_grammar();
        assert_eq!(g.start().as_ref(), "E");
    }

    #[test]
    fn first_sets_match_textbook_grammar() {
        let g = arithmetic_grammar();
        let firsts = g.first_sets().unwrap();
        let f = |nt: &str| -> BTreeSet<String> { firsts[nt].iter().map(|s| s.to_string()).collect() };
        assert_eq!(f("F"), BTreeSet::from(["(".into(), "id".into()]));
        assert_eq!(f("T"), BTreeSet::from(["(".into(), "id".into()]));
        assert_eq!(f("E"), BTreeSet::from(["(".into(), "id".into()]));
        assert_eq!(f("E'"), BTreeSet::from(["+".into(), "&".into()]));
        assert_eq!(f("T'"), BTreeSet::from(["*".into(), "&".into()]));
    }

    #[test]
    fn follow_sets_match_textbook_grammar() {
        let g = arithmetic_grammar();
        let firsts = g.first_sets().unwrap();
        let follows = g.follow_sets(&firsts);
        let fo = |nt: &str| -> BTreeSet<String> { follows[nt].iter().map(|s| s.to_string()).collect() };
        assert_eq!(fo("E"), BTreeSet::from(["$".into(), ")".into()]));
        assert_eq!(fo("E'"), BTreeSet::from(["$".into(), ")".into()]));
        assert_eq!(fo("T"), BTreeSet::from(["+".into(), "$".into(), ")".into()]));
        assert_eq!(fo("F"), BTreeSet::from(["+".into(), "*".into(), "$".into(), ")".into()]));
    }

    #[test]
    fn left_recursive_grammar_is_rejected_by_first_sets() {
        let src = "E -> E + T | T\nT -> id\n";
        let parsed = crate::parser::grammar(src).unwrap();
        let g = Grammar::try_from(parsed).unwrap();
        assert!(matches!(g.first_sets(), Err(Error::LeftRecursive(_))));
    }
}
