//! `first-follow`/`left-factor`/`eliminate-left-recursion`/`ll1`/`slr1`:
//! every grammar-facing subcommand, all loading through
//! [`langlab::grammar::Grammar`] and its `parse`/`transform`/`ll`/`slr`
//! submodules.

use crate::log;
use crate::{DriverArgs, GrammarArgs};
use langlab::grammar::{transform, ll::LlTable, slr::SlrTable, Grammar};
use std::fs;
use std::path::Path;
use std::rc::Rc;

fn load_grammar(path: &Path) -> Result<Grammar, String> {
    let content = fs::read_to_string(path).map_err(|e| format!("reading {}: {e}", path.display()))?;
    let parsed = langlab::parser::grammar(&content).map_err(|e| format!("parsing {}: {e}", path.display()))?;
    parsed
        .try_into()
        .map_err(|e: langlab::grammar::parse::GrammarParseError| format!("building grammar from {}: {e}", path.display()))
}

fn render_grammar(grammar: &Grammar) -> String {
    let mut out = String::new();
    for (head, bodies) in grammar.all_productions() {
        let alternatives: Vec<String> = bodies
            .iter()
            .map(|body| body.iter().map(Rc::as_ref).collect::<Vec<_>>().join(" "))
            .collect();
        out.push_str(&format!("{head} -> {}\n", alternatives.join(" | ")));
    }
    out
}

pub fn first_follow(no_log: bool, args: GrammarArgs) -> Result<(), String> {
    let grammar = load_grammar(&args.file)?;
    log!(no_log, "loaded grammar with start symbol {}", grammar.start());

    let firsts = grammar.first_sets().map_err(|e| e.to_string())?;
    let follows = grammar.follow_sets(&firsts);

    for nt in grammar.nonterminals() {
        let first: Vec<&str> = firsts[nt].iter().map(Rc::as_ref).collect();
        let follow: Vec<&str> = follows[nt].iter().map(Rc::as_ref).collect();
        println!("FIRST({nt}) = {{{}}}", first.join(", "));
        println!("FOLLOW({nt}) = {{{}}}", follow.join(", "));
    }
    Ok(())
}

pub fn left_factor(no_log: bool, args: GrammarArgs) -> Result<(), String> {
    let grammar = load_grammar(&args.file)?;
    log!(no_log, "loaded grammar with start symbol {}", grammar.start());
    let factored = transform::left_factor(&grammar).map_err(|e| e.to_string())?;
    print!("{}", render_grammar(&factored));
    Ok(())
}

pub fn eliminate_left_recursion(no_log: bool, args: GrammarArgs) -> Result<(), String> {
    let grammar = load_grammar(&args.file)?;
    log!(no_log, "loaded grammar with start symbol {}", grammar.start());
    let eliminated = transform::eliminate_left_recursion(&grammar).map_err(|e| e.to_string())?;
    print!("{}", render_grammar(&eliminated));
    Ok(())
}

pub fn ll1(no_log: bool, args: DriverArgs) -> Result<(), String> {
    let grammar = load_grammar(&args.file)?;
    log!(no_log, "loaded grammar with start symbol {}", grammar.start());
    let table = LlTable::build(&grammar).map_err(|e| e.to_string())?;
    println!("{}", table.to_table_string());
    if let Some(input) = &args.input {
        let accepted = table.accepts(input);
        println!("{input:?}: {}", if accepted { "accepted" } else { "rejected" });
    }
    Ok(())
}

pub fn slr1(no_log: bool, args: DriverArgs) -> Result<(), String> {
    let grammar = load_grammar(&args.file)?;
    log!(no_log, "loaded grammar with start symbol {}", grammar.start());
    let table = SlrTable::build(&grammar).map_err(|e| e.to_string())?;
    println!("{}", table.to_table_string());
    if let Some(input) = &args.input {
        let accepted = table.accepts(input);
        println!("{input:?}: {}", if accepted { "accepted" } else { "rejected" });
    }
    Ok(())
}
