//! Turns a [`crate::parser::fa::ParsedFa`] (the raw, syntax-only result of
//! [`crate::parser::fa`]) into a validated [`Fa`], checking the invariants
//! that the grammar alone can't express: every state referenced by
//! `*initial`, `*final` or a transition line must be within `1..=N`.

use crate::fa::{Fa, Symbol};
use crate::parser::fa::ParsedFa;
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FaParseError<'a> {
    #[error("*initial refers to state {0}, which is outside 1..={1}")]
    InitialOutOfRange(usize, usize),
    #[error("*final refers to state {0}, which is outside 1..={1}")]
    FinalOutOfRange(usize, usize),
    #[error("transition references state {0}, which is outside 1..={1}")]
    TransitionOutOfRange(usize, usize),
    #[error("transition from {0} to {1} lists no symbols")]
    EmptyTransition(usize, usize),
    #[error("{0:?} is reserved and can't label a transition in an automaton file")]
    ReservedSymbol(&'a str),
}

impl<'a> TryFrom<ParsedFa<'a>> for Fa {
    type Error = FaParseError<'a>;

    fn try_from(value: ParsedFa<'a>) -> Result<Self, Self::Error> {
        use FaParseError::*;
        let ParsedFa {
            vertex_count,
            initial,
            finals,
            transitions,
        } = value;

        if initial < 1 || initial > vertex_count {
            return Err(InitialOutOfRange(initial, vertex_count));
        }
        let mut final_set = BTreeSet::new();
        for f in finals {
            if f < 1 || f > vertex_count {
                return Err(FinalOutOfRange(f, vertex_count));
            }
            final_set.insert(f);
        }

        let mut table = std::collections::BTreeMap::new();
        for t in transitions {
            if t.src < 1 || t.src > vertex_count {
                return Err(TransitionOutOfRange(t.src, vertex_count));
            }
            if t.dst < 1 || t.dst > vertex_count {
                return Err(TransitionOutOfRange(t.dst, vertex_count));
            }
            if t.symbols.is_empty() {
                return Err(EmptyTransition(t.src, t.dst));
            }
            let entry: &mut BTreeSet<Symbol> =
                table.entry((t.src, t.dst)).or_insert_with(BTreeSet::new);
            for raw in t.symbols {
                if raw == crate::fa::EPSILON {
                    return Err(ReservedSymbol(raw));
                }
                let symbol = if raw == "&" { crate::fa::EPSILON } else { raw };
                entry.insert(Symbol::from(symbol));
            }
        }

        Ok(Fa::new(vertex_count, initial, final_set, table)
            .expect("range and non-empty-transition checks above already cover Fa::new's invariants"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    #[test]
    fn loads_spec_example() {
        let src = "
*vertices 2
*initial 1
*final 2
*transitions
1 > 2 | a
2 > 1 | a
1 > 1 | b
2 > 2 | b
";
        let parsed = parser::fa(src).unwrap();
        let fa: Fa = parsed.try_into().unwrap();
        assert_eq!(fa.state_count(), 2);
        assert_eq!(fa.start(), 1);
        assert_eq!(fa.accepting(), &BTreeSet::from([2]));
    }

    #[test]
    fn rejects_out_of_range_initial() {
        let src = "
*vertices 1
*initial 2
*final
*transitions
";
        let parsed = parser::fa(src).unwrap();
        let fa: Result<Fa, _> = parsed.try_into();
        assert_eq!(fa, Err(InitialOutOfRange(2, 1)));
    }
}
