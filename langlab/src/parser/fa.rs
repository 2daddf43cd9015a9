//! Syntax-only parsing of the automaton file format (see the module docs
//! in [`super`]). Validating that the referenced states actually exist is
//! [`crate::fa::parse`]'s job, not this one.

use nom::branch::alt;
use nom::bytes::complete::{tag, take_till1};
use nom::character::complete::{digit1, line_ending, not_line_ending, space0, space1};
use nom::combinator::{eof, map, map_res, recognize, value, verify};
use nom::multi::{many0, many1, separated_list0, separated_list1};
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use nom::IResult;

#[derive(Debug)]
pub struct ParsedFa<'a> {
    pub vertex_count: usize,
    pub initial: usize,
    pub finals: Vec<usize>,
    pub transitions: Vec<ParsedTransition<'a>>,
}

#[derive(Debug)]
pub struct ParsedTransition<'a> {
    pub src: usize,
    pub dst: usize,
    pub symbols: Vec<&'a str>,
}

pub(crate) fn full_fa(input: &str) -> IResult<&str, ParsedFa> {
    map(
        tuple((
            many0(blank_or_comment_line),
            terminated(vertices_header, eol),
            many0(blank_or_comment_line),
            terminated(initial_header, eol),
            many0(blank_or_comment_line),
            terminated(final_header, eol),
            many0(blank_or_comment_line),
            terminated(transitions_header, eol),
            many0(blank_or_comment_line),
            separated_list0(many1(blank_or_comment_line), transition_line),
            many0(blank_or_comment_line),
        )),
        |(_, vertex_count, _, initial, _, finals, _, _, _, transitions, _)| ParsedFa {
            vertex_count,
            initial,
            finals,
            transitions,
        },
    )(input)
}

fn vertices_header(input: &str) -> IResult<&str, usize> {
    delimited(pair(tag("*vertices"), space1), uint, space_comment)(input)
}

fn initial_header(input: &str) -> IResult<&str, usize> {
    delimited(pair(tag("*initial"), space1), uint, space_comment)(input)
}

fn final_header(input: &str) -> IResult<&str, Vec<usize>> {
    delimited(
        pair(tag("*final"), space0),
        separated_list0(space1, uint),
        space_comment,
    )(input)
}

fn transitions_header(input: &str) -> IResult<&str, ()> {
    value((), pair(tag("*transitions"), space_comment))(input)
}

fn transition_line(input: &str) -> IResult<&str, ParsedTransition> {
    map(
        delimited(
            space0,
            tuple((
                terminated(uint, space0),
                terminated(tag(">"), space0),
                terminated(uint, space0),
                preceded(pair(tag("|"), space0), separated_list1(space1, symbol)),
            )),
            space_comment,
        ),
        |(src, _, dst, symbols)| ParsedTransition { src, dst, symbols },
    )(input)
}

fn symbol(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace())(input)
}

fn uint(input: &str) -> IResult<&str, usize> {
    map_res(digit1, |s: &str| s.parse::<usize>())(input)
}

fn eol(input: &str) -> IResult<&str, ()> {
    alt((value((), line_ending), value((), eof)))(input)
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
    fn parses_spec_example_with_comments() {
        let src = "\
-- a two-state automaton
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
        assert_eq!(parsed.vertex_count, 2);
        assert_eq!(parsed.initial, 1);
        assert_eq!(parsed.finals, vec![2]);
        assert_eq!(parsed.transitions.len(), 4);
        assert_eq!(parsed.transitions[0].symbols, vec!["a"]);
    }

    #[test]
    fn empty_final_set_is_allowed() {
        let src = "*vertices 1\n*initial 1\n*final\n*transitions\n";
        let parsed = parser::fa(src).unwrap();
        assert!(parsed.finals.is_empty());
    }

    #[test]
    fn multi_symbol_transition() {
        let src = "*vertices 1\n*initial 1\n*final 1\n*transitions\n1 > 1 | a b c\n";
        let parsed = parser::fa(src).unwrap();
        assert_eq!(parsed.transitions[0].symbols, vec!["a", "b", "c"]);
    }
}
