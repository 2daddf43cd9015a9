//! Turns a [`crate::parser::grammar::ParsedGrammar`] (syntax only) into a
//! validated [`Grammar`]: every production head must be exactly one
//! nonterminal symbol, and every alternative must name at least one
//! symbol.

use crate::grammar::{is_nonterminal, Grammar};
use crate::parser::grammar::ParsedGrammar;
use std::collections::BTreeMap;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GrammarParseError<'a> {
    #[error("production head {0:?} is not context-free: a production head must be exactly one nonterminal")]
    NotContextFree(Vec<&'a str>),
    #[error("{0:?} can't be a production head: it doesn't start with an uppercase letter")]
    NotNonterminal(&'a str),
    #[error("an alternative in {0:?}'s productions is empty")]
    EmptyAlternative(&'a str),
    #[error("grammar file defines no productions")]
    Empty,
}

impl<'a> TryFrom<ParsedGrammar<'a>> for Grammar {
    type Error = GrammarParseError<'a>;

    fn try_from(value: ParsedGrammar<'a>) -> Result<Self, Self::Error> {
        use GrammarParseError::*;
        if value.productions.is_empty() {
            return Err(Empty);
        }

        let mut order: Vec<Rc<str>> = Vec::new();
        let mut productions: BTreeMap<Rc<str>, Vec<Vec<Rc<str>>>> = BTreeMap::new();

        for p in value.productions {
            if p.head.len() != 1 {
                return Err(NotContextFree(p.head));
            }
            let head = p.head[0];
            if !is_nonterminal(head) {
                return Err(NotNonterminal(head));
            }
            let head: Rc<str> = Rc::from(head);
            if !order.contains(&head) {
                order.push(head.clone());
            }
            let entry = productions.entry(head).or_default();
            for body in p.bodies {
                if body.is_empty() {
                    return Err(EmptyAlternative(p.head[0]));
                }
                entry.push(body.into_iter().map(Rc::from).collect());
            }
        }

        Ok(Grammar::from_parts(order, productions))
    }
}

impl From<GrammarParseError<'_>> for crate::error::Error {
    fn from(e: GrammarParseError<'_>) -> Self {
        crate::error::Error::InvalidFile(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    #[test]
    fn loads_arithmetic_grammar() {
        let src = "E -> T E'\nE' -> + T E' | &\nT -> F T'\nT' -> * F T' | &\nF -> ( E ) | id\n";
        let parsed = parser::grammar(src).unwrap();
        let grammar: Grammar = parsed.try_into().unwrap();
        assert_eq!(grammar.nonterminals().len(), 5);
        assert_eq!(grammar.start().as_ref(), "E");
    }

    #[test]
    fn rejects_lowercase_head() {
        let parsed = parser::grammar("e -> a\n").unwrap();
        let result: Result<Grammar, _> = parsed.try_into();
        assert_eq!(result, Err(GrammarParseError::NotNonterminal("e")));
    }

    #[test]
    fn rejects_multi_symbol_head() {
        let parsed = parser::grammar("A B -> a\n").unwrap();
        let result: Result<Grammar, _> = parsed.try_into();
        assert_eq!(result, Err(GrammarParseError::NotContextFree(vec!["A", "B"])));
    }

    #[test]
    fn multiple_lines_extend_the_same_nonterminal() {
        let parsed = parser::grammar("A -> a\nA -> b\n").unwrap();
        let grammar: Grammar = parsed.try_into().unwrap();
        assert_eq!(grammar.productions("A").len(), 2);
    }
}
