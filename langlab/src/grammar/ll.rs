//! # LL(1) construction and driver (§4.G)
//!
//! [`LlTable::build`] left-factors then eliminates left recursion from the
//! input grammar, computes FIRST/FOLLOW over the result, and fills a
//! predictive `(nonterminal, lookahead) -> body` table. [`LlTable::accepts`]
//! is the stack-driven recognizer that consumes that table.

use crate::error::Error;
use crate::grammar::{first_of_sequence, is_nonterminal, transform, Grammar, END_OF_INPUT, EPSILON};
use crate::table::Table;
use std::collections::BTreeMap;
use std::rc::Rc;

/// A built LL(1) predictive table, together with the (factored,
/// non-left-recursive) grammar it was built from - the driver needs the
/// grammar's start symbol, and table entries are keyed by its
/// nonterminals, not the caller's original ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlTable {
    grammar: Grammar,
    entries: BTreeMap<(Rc<str>, Rc<str>), Vec<Rc<str>>>,
}

impl LlTable {
    /// Builds the table for `grammar`, per §4.G. Fails with
    /// [`Error::LeftRecursive`] if the grammar can't be freed of left
    /// recursion by the usual algorithm's normal course (propagated from
    /// [`Grammar::first_sets`]), [`Error::IterationLimit`] if factoring or
    /// recursion removal doesn't converge, or [`Error::NotLL1`] if some
    /// nonterminal has a nullable production while `FIRST ∩ FOLLOW ≠ ∅`.
    pub fn build(grammar: &Grammar) -> Result<LlTable, Error> {
        let factored = transform::left_factor(grammar)?;
        let prepared = transform::eliminate_left_recursion(&factored)?;
        let firsts = prepared.first_sets()?;
        let follows = prepared.follow_sets(&firsts);

        let eps: Rc<str> = Rc::from(EPSILON);
        let mut entries: BTreeMap<(Rc<str>, Rc<str>), Vec<Rc<str>>> = BTreeMap::new();

        for (head, bodies) in prepared.all_productions() {
            let mut any_nullable = false;
            for body in bodies {
                let first = first_of_sequence(&firsts, body);
                for terminal in first.iter().filter(|s| s.as_ref() != EPSILON) {
                    entries.insert((head.clone(), terminal.clone()), body.clone());
                }
                if first.contains(&eps) {
                    any_nullable = true;
                    for lookahead in &follows[head] {
                        entries.insert((head.clone(), lookahead.clone()), body.clone());
                    }
                }
            }
            if any_nullable && firsts[head].intersection(&follows[head]).next().is_some() {
                return Err(Error::NotLL1(head.to_string()));
            }
        }

        Ok(LlTable {
            grammar: prepared,
            entries,
        })
    }

    /// The (factored, non-left-recursive) grammar the table was built
    /// from - its start symbol and productions, not necessarily the
    /// caller's original ones.
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// `LL(nonterminal, lookahead)`, if defined.
    pub fn lookup(&self, nonterminal: &str, lookahead: &str) -> Option<&[Rc<str>]> {
        self.entries
            .get(&(Rc::from(nonterminal), Rc::from(lookahead)))
            .map(Vec::as_slice)
    }

    /// The stack-driven predictive recognizer of §4.G: tokenizes `input`
    /// by whitespace, appends `$`, and drives a stack initialized to
    /// `[$, S]`. Never errors - a malformed or non-matching input simply
    /// returns `false`.
    pub fn accepts(&self, input: &str) -> bool {
        let mut tokens: Vec<&str> = input.split_whitespace().collect();
        tokens.push(END_OF_INPUT);
        let mut pos = 0usize;
        let mut stack: Vec<Rc<str>> = vec![Rc::from(END_OF_INPUT), self.grammar.start().clone()];

        loop {
            let Some(top) = stack.last().cloned() else {
                return false;
            };
            let lookahead = tokens[pos];

            if top.as_ref() == END_OF_INPUT {
                return lookahead == END_OF_INPUT;
            }
            if !is_nonterminal(&top) {
                if top.as_ref() == lookahead {
                    stack.pop();
                    pos += 1;
                    continue;
                }
                return false;
            }
            match self.lookup(&top, lookahead) {
                Some(body) => {
                    stack.pop();
                    if body != [Rc::from(EPSILON)] {
                        for symbol in body.iter().rev() {
                            stack.push(symbol.clone());
                        }
                    }
                }
                None => return false,
            }
        }
    }

    /// Renders the table as rows of `nonterminal | lookahead | body`,
    /// sorted by nonterminal then lookahead - used by the CLI's `ll1`
    /// subcommand.
    pub fn to_table_string(&self) -> String {
        let mut table = Table::default();
        table.push_row(vec!["A".into(), "a".into(), "A -> body".into()]);
        for ((nt, lookahead), body) in &self.entries {
            let rendered = body.iter().map(|s| s.as_ref()).collect::<Vec<_>>().join(" ");
            table.push_row(vec![nt.to_string(), lookahead.to_string(), format!("{nt} -> {rendered}")]);
        }
        table.to_string("  ")
    }
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
        crate::parser::grammar(src).unwrap().try_into().unwrap()
    }

    /// Scenario 5: accepts `id + id * id` and `( id )`; rejects `id id`
    /// and `+ id`.
    #[test]
    fn scenario_5_ll1_recognition() {
        let g = arithmetic_grammar();
        let table = LlTable::build(&g).unwrap();
        assert!(table.accepts("id + id * id"));
        assert!(table.accepts("( id )"));
        assert!(!table.accepts("id id"));
        assert!(!table.accepts("+ id"));
    }

    #[test]
    fn empty_input_accepted_only_for_nullable_start() {
        let src = "S -> a S | &\n";
        let g: Grammar = crate::parser::grammar(src).unwrap().try_into().unwrap();
        let table = LlTable::build(&g).unwrap();
        assert!(table.accepts(""));
        assert!(table.accepts("a a a"));
        assert!(!table.accepts("b"));
    }

    #[test]
    fn left_recursive_input_is_handled_via_elimination() {
        let src = "E -> E + T | T\nT -> id\n";
        let g: Grammar = crate::parser::grammar(src).unwrap().try_into().unwrap();
        let table = LlTable::build(&g).unwrap();
        assert!(table.accepts("id + id + id"));
        assert!(table.accepts("id"));
        assert!(!table.accepts("+ id"));
    }

    #[test]
    fn not_ll1_conflict_is_detected() {
        // Ambiguous dangling-else-ish grammar: S nullable with FIRST/FOLLOW overlap.
        let src = "S -> A a\nA -> a | &\n";
        let g: Grammar = crate::parser::grammar(src).unwrap().try_into().unwrap();
        let result = LlTable::build(&g);
        assert!(matches!(result, Err(Error::NotLL1(_))));
    }
}
