//! `equivalent`: checks whether two automata (or regexes) accept the same
//! language, via [`Dfa::equivalent_to`][langlab::fa::Dfa::equivalent_to]
//! on their determinized forms.

use crate::automata::Automata;
use crate::{log, EquivalenceArgs};

pub fn run(no_log: bool, args: EquivalenceArgs) -> Result<(), String> {
    let second_type = args.second_type.unwrap_or(args.r#type);

    log!(no_log, "loading {} as {}", args.first.display(), args.r#type);
    let (first, converted1) = Automata::load_file(&args.first, args.r#type)
        .map_err(|e| format!("reading {}: {e}", args.first.display()))?
        .to_dfa();

    log!(no_log, "loading {} as {}", args.second.display(), second_type);
    let (second, converted2) = Automata::load_file(&args.second, second_type)
        .map_err(|e| format!("reading {}: {e}", args.second.display()))?
        .to_dfa();

    if converted1 {
        log!(no_log, "input 1 was determinized before comparing");
    }
    if converted2 {
        log!(no_log, "input 2 was determinized before comparing");
    }

    let equivalent = first.equivalent_to(&second);
    println!("{}", if equivalent { "equivalent" } else { "not equivalent" });
    Ok(())
}
