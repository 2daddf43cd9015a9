//! # File formats
//!
//! Three little languages, all parsed with [`nom`] and all handling only
//! *syntax* - turning a well-formed-but-not-necessarily-valid text file
//! into the crate's raw `Parsed*` types. Semantic validation (state ranges,
//! left recursion, reserved symbols, ...) is the job of each domain
//! module's own `TryFrom` impl, never this one.
//!
//! ## Automaton format
//!
//! ```text
//! *vertices 3
//! *initial 1
//! *final 3
//! *transitions
//! 1 > 2 | a b
//! 2 > 3 | c
//! 2 > 2 | &
//! ```
//!
//! `*vertices N` declares states `1..=N`; `*initial` and `*final` name the
//! start state and the (possibly empty) accepting set; each line under
//! `*transitions` is `src > dst | sym1 sym2 ...`, where `&` denotes ε. Any
//! line whose first non-whitespace is `--` is a comment and ignored, as is
//! a blank line.
//!
//! ## Regular expression format
//!
//! `+` (or `|`) for alternation, `.` or plain adjacency for concatenation,
//! postfix `*` for Kleene star, `(`/`)` for grouping, and `&` for ε. There
//! are no character classes and no escape syntax; every character outside
//! the six reserved ones is an ordinary atom. Whitespace is insignificant
//! anywhere in the expression.
//!
//! ## Grammar format
//!
//! ```text
//! -- a tiny expression grammar
//! E -> E + T | T
//! T -> T * F | F
//! F -> ( E ) | id
//! ```
//!
//! One production head per line, `->` separating head from a `|`-delimited
//! list of alternatives, each alternative a whitespace-separated sequence
//! of symbols. `&` denotes the ε-production. `--` starts a line comment.

pub mod fa;
pub mod grammar;
pub mod regex;

use nom::{combinator::all_consuming, error::Error, Finish};

/// Parses the automaton file format above into a [`fa::ParsedFa`]. The
/// whole input must be consumed; a [`fa::ParsedFa`] is not guaranteed to
/// satisfy [`crate::fa::Fa`]'s invariants until run through
/// [`TryInto::try_into`].
pub fn fa(input: &str) -> Result<fa::ParsedFa, Error<&str>> {
    all_consuming(fa::full_fa)(input).finish().map(|(_, fa)| fa)
}

/// Tokenizes a regular expression into the raw token stream consumed by
/// [`crate::regex::Regex`]'s `TryFrom` impl - purely lexical, no
/// adjacency/balance validation and no concatenation insertion.
pub fn regex(input: &str) -> Result<Vec<regex::RawToken>, Error<&str>> {
    all_consuming(regex::full_regex)(input)
        .finish()
        .map(|(_, tokens)| tokens)
}

/// Parses the grammar file format above into a [`grammar::ParsedGrammar`].
pub fn grammar(input: &str) -> Result<grammar::ParsedGrammar, Error<&str>> {
    all_consuming(grammar::full_grammar)(input)
        .finish()
        .map(|(_, grammar)| grammar)
}
