//! The crate-wide error type.
//!
//! Submodules that parse text (`fa::parse`, `grammar::parse`) keep their own
//! lifetime-parameterized error enums for precise, borrow-friendly messages
//! (see [`crate::fa::parse::FaParseError`] and
//! [`crate::grammar::parse::GrammarParseError`]); they are folded into
//! [`Error::InvalidFile`] at the boundary for callers that just want one
//! tagged variant to match on.

use thiserror::Error;

/// Every way a core operation can fail. Input rejection is never one of
/// these - `accepts`, `read_input_ll` and `read_input_slr` return `false`
/// for a rejected word, not an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A file failed to parse or violated a structural invariant (unknown
    /// state reference, duplicate initial state, ...).
    #[error("invalid file: {0}")]
    InvalidFile(String),
    /// A regular expression failed the adjacency/parenthesis-balance checks
    /// of §4.D, or failed to parse at all.
    #[error("invalid regular expression: {0}")]
    InvalidExpression(String),
    /// A constructor was given a state id outside `1..=state_count`.
    #[error("state {0} does not exist in this automaton")]
    StateNotFound(usize),
    /// An operation that needs at least one state (table printing, word
    /// enumeration) was given a zero-state automaton.
    #[error("automaton has no states")]
    EmptyAutomaton,
    /// A deterministic-only operation was called on a nondeterministic
    /// automaton, or vice versa.
    #[error("{0}")]
    DeterminismMismatch(String),
    /// A grammar operation required a context-free grammar but the
    /// productions didn't classify as one.
    #[error("grammar is not context-free: {0}")]
    NotContextFree(String),
    /// FIRST/FOLLOW (and anything built from them) were requested on a
    /// grammar that is still left-recursive.
    #[error("grammar is still left-recursive at {0}")]
    LeftRecursive(String),
    /// FIRST(A) ∩ FOLLOW(A) is non-empty for some ε-producing nonterminal A.
    #[error("grammar is not LL(1): conflict on nonterminal {0}")]
    NotLL1(String),
    /// A fixed-point pass (factoring, left-recursion removal, FIRST/FOLLOW,
    /// LR(0) collection) didn't converge within the configured ceiling.
    #[error("iteration limit ({0}) exceeded without reaching a fixed point")]
    IterationLimit(usize),
}
