//! # langlab
//!
//! `langlab` is a formal-languages workbench: finite automata, regular
//! expressions, and context-free grammars, with the algorithms that move
//! between them and recognize input against them.
//!
//! Four subsystems, bottom-up:
//!
//! * [`fa`] - the single [`fa::Fa`] data structure backing both NFAs and
//!   DFAs, membership checking, and (in [`fa::algebra`]) reachability
//!   pruning, dead-state removal, partition-refinement minimization,
//!   union/product construction, and subset-construction determinization.
//! * [`regex`] - parses the surface syntax of a regular expression into
//!   the [`regex::tree`] operator tree and derives a [`fa::Dfa`] directly
//!   from its followpos table, with no intermediate NFA.
//! * [`grammar`] - [`grammar::Grammar`], a context-free grammar's
//!   productions plus FIRST/FOLLOW, [`grammar::transform`]'s left
//!   factoring and left-recursion elimination, [`grammar::ll`]'s LL(1)
//!   table and stack-driven recognizer, and [`grammar::slr`]'s LR(0)
//!   item-set collection, SLR(1) tables, and shift-reduce recognizer.
//! * [`parser`] - syntax-only `nom` parsers for the three external file
//!   formats (automaton tables, grammar productions, regex text); each
//!   domain module's own `TryFrom` impl handles the semantic validation
//!   a grammar alone can't express.
//!
//! ## Example
//!
//! ```rust
//! use langlab::fa::{Dfa, Fa};
//! use langlab::grammar::Grammar;
//! use langlab::grammar::ll::LlTable;
//!
//! // An automaton loaded from the `*vertices`/`*transitions` file format.
//! let src = "
//! *vertices 2
//! *initial 1
//! *final 2
//! *transitions
//! 1 > 2 | a
//! 2 > 1 | a
//! 1 > 1 | b
//! 2 > 2 | b
//! ";
//! let fa: Fa = langlab::parser::fa(src).unwrap().try_into().unwrap();
//! let dfa = Dfa::try_from(fa).unwrap();
//! assert!(dfa.accepts(&["a", "b", "a"]));
//! assert!(!dfa.accepts(&["a", "a"]));
//!
//! // A regex translated to a DFA via followpos, with no intermediate NFA.
//! let tokens = langlab::parser::regex("(a+b)*abb").unwrap();
//! let regex = langlab::regex::Regex::try_from(tokens).unwrap();
//! let regex_dfa = regex.to_dfa();
//! assert!(regex_dfa.accepts(&["a", "b", "b"]));
//!
//! // A small grammar, checked for LL(1)-ness and driven against a token string.
//! let grammar_src = "E -> T E'\nE' -> + T E' | &\nT -> id\n";
//! let grammar: Grammar = langlab::parser::grammar(grammar_src).unwrap().try_into().unwrap();
//! let table = LlTable::build(&grammar).unwrap();
//! assert!(table.accepts("id + id"));
//! assert!(!table.accepts("id id"));
//! ```
//!
//! ## File formats
//!
//! See the [`parser`] module docs for the automaton, grammar, and regex
//! surface syntaxes.
//!
//! ## Non-goals
//!
//! No regular-expression character classes or escape syntax beyond the
//! five meta-symbols `+ . * ( )` (plus `&` for ε and `#` reserved as the
//! regex end marker); no parser error recovery (the drivers are pure
//! accept/reject); no performance guarantees beyond correctness on small
//! didactic inputs; no Unicode alphabet normalization.

pub mod error;
pub mod fa;
pub mod grammar;
pub mod parser;
pub mod regex;
mod table;

#[cfg(test)]
mod tests;

pub use error::Error;
