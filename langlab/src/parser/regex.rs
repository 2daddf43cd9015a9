//! Tokenizing the regular-expression surface syntax. Purely lexical: no
//! adjacency rules, no concatenation insertion, no check that parentheses
//! balance. All of that is [`crate::regex`]'s job, working over the token
//! stream this module produces.

use nom::branch::alt;
use nom::character::complete::{char, none_of, space0};
use nom::combinator::{map, value};
use nom::multi::many0;
use nom::sequence::{preceded, terminated};
use nom::IResult;

/// One lexical unit of a regular expression. Whitespace is dropped during
/// tokenizing and carries no meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawToken {
    LParen,
    RParen,
    Star,
    /// `+` or its accepted synonym `|`.
    Plus,
    Dot,
    /// `&`, the empty-string atom.
    Epsilon,
    Atom(char),
}

pub(crate) fn full_regex(input: &str) -> IResult<&str, Vec<RawToken>> {
    terminated(many0(one_token), space0)(input)
}

fn one_token(input: &str) -> IResult<&str, RawToken> {
    preceded(
        space0,
        alt((
            value(RawToken::LParen, char('(')),
            value(RawToken::RParen, char(')')),
            value(RawToken::Star, char('*')),
            value(RawToken::Plus, char('+')),
            value(RawToken::Plus, char('|')),
            value(RawToken::Dot, char('.')),
            value(RawToken::Epsilon, char('&')),
            map(none_of("()*+|.&"), RawToken::Atom),
        )),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    #[test]
    fn tokenizes_operators_and_atoms() {
        let tokens = parser::regex("a+b.c*").unwrap();
        assert_eq!(
            tokens,
            vec![
                RawToken::Atom('a'),
                RawToken::Plus,
                RawToken::Atom('b'),
                RawToken::Dot,
                RawToken::Atom('c'),
                RawToken::Star,
            ]
        );
    }

    #[test]
    fn pipe_is_a_synonym_for_plus() {
        let tokens = parser::regex("a|b").unwrap();
        assert_eq!(tokens, vec![RawToken::Atom('a'), RawToken::Plus, RawToken::Atom('b')]);
    }

    #[test]
    fn whitespace_is_insignificant() {
        let with_space = parser::regex("a + b").unwrap();
        let without = parser::regex("a+b").unwrap();
        assert_eq!(with_space, without);
    }

    #[test]
    fn any_non_meta_character_is_an_atom() {
        let tokens = parser::regex("x_1").unwrap();
        assert_eq!(
            tokens,
            vec![RawToken::Atom('x'), RawToken::Atom('_'), RawToken::Atom('1')]
        );
    }
}
