//! Syntax-only parsing of the grammar file format (see the module docs in
//! [`super`]). Whether the head is really a single nonterminal, or the
//! grammar is otherwise context-free, is [`crate::grammar::parse`]'s job.

use nom::branch::alt;
use nom::bytes::complete::{tag, take_till1};
use nom::character::complete::{line_ending, not_line_ending, space0, space1};
use nom::combinator::{eof, recognize, value, verify};
use nom::multi::{many0, many1, separated_list1};
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use nom::IResult;

#[derive(Debug)]
pub struct ParsedGrammar<'a> {
    pub productions: Vec<ParsedProduction<'a>>,
}

#[derive(Debug)]
pub struct ParsedProduction<'a> {
    pub head: Vec<&'a str>,
    pub bodies: Vec<Vec<&'a str>>,
}

pub(crate) fn full_grammar(input: &str) -> IResult<&str, ParsedGrammar> {
    nom::combinator::map(
        delimited(
            many0(blank_or_comment_line),
            separated_list1(many1(blank_or_comment_line), production_line),
            many0(blank_or_comment_line),
        ),
        |productions| ParsedGrammar { productions },
    )(input)
}

fn production_line(input: &str) -> IResult<&str, ParsedProduction> {
    nom::combinator::map(
        delimited(
            space0,
            tuple((head_tokens, preceded(pair(tag("->"), space0), alternatives))),
            space_comment,
        ),
        |(head, bodies)| ParsedProduction { head, bodies },
    )(input)
}

/// One or more whitespace-separated symbols, stopping just before the
/// `->` that always follows a production head.
fn head_tokens(input: &str) -> IResult<&str, Vec<&str>> {
    many1(terminated(
        verify(take_till1(|c: char| c.is_whitespace()), |s: &str| *s != "->"),
        space0,
    ))(input)
}

fn alternatives(input: &str) -> IResult<&str, Vec<Vec<&str>>> {
    separated_list1(delimited(space0, tag("|"), space0), alternative)(input)
}

fn alternative(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list1(space1, symbol_token)(input)
}

fn symbol_token(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace() || c == '|')(input)
}

fn blank_or_comment_line(input: &str) -> IResult<&str, ()> {
    value(
        (),
        verify(
            recognize(terminated(space_comment, alt((line_ending, eof)))),
            |consumed: &str| !consumed.is_empty(),
        ),
    )(input)
}

fn space_comment(input: &str) -> IResult<&str, ()> {
    value((), pair(space0, nom::combinator::opt(comment)))(input)
}

fn comment(input: &str) -> IResult<&str, ()> {
    value((), pair(tag("--"), not_line_ending))(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    #[test]
    fn parses_multi_alternative_productions() {
        let src = "\
-- arithmetic expressions
E -> T E'
E' -> + T E' | &
";
        let parsed = parser::grammar(src).unwrap();
        assert_eq!(parsed.productions.len(), 2);
        assert_eq!(parsed.productions[0].head, vec!["E"]);
        assert_eq!(parsed.productions[0].bodies, vec![vec!["T", "E'"]]);
        assert_eq!(parsed.productions[1].bodies, vec![vec!["+", "T", "E'"], vec!["&"]]);
    }

    #[test]
    fn tight_pipes_still_split_into_alternatives() {
        let parsed = parser::grammar("A -> a|b|&\n").unwrap();
        assert_eq!(parsed.productions[0].bodies, vec![vec!["a"], vec!["b"], vec!["&"]]);
    }
}
