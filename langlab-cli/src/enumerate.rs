//! `enumerate`: prints the first N words of a file's language, in
//! length-then-lexicographic order, via [`Nfa::words`][langlab::fa::Nfa::words].
//! `langlab`'s `Nfa::words` already closes over ε-transitions internally,
//! so unlike the reference workbench's enumerator there is no separate
//! "remove epsilon moves" step before walking it.

use crate::automata::Automata;
use crate::{log, EnumerateArgs};

pub fn run(no_log: bool, args: EnumerateArgs) -> Result<(), String> {
    log!(no_log, "loading {} as {}", args.file.display(), args.r#type);
    let automata = Automata::load_file(&args.file, args.r#type).map_err(|e| e.to_string())?;
    let (nfa, _) = automata.to_nfa();

    log!(no_log, "first {} words of the language:", args.amount);
    let mut count = 0;
    for word in nfa.words(args.amount) {
        if word.is_empty() {
            println!("(empty word)");
        } else {
            let rendered: Vec<&str> = word.iter().map(|s| s.as_ref()).collect();
            println!("{}", rendered.join(" "));
        }
        count += 1;
    }
    if count < args.amount {
        log!(no_log, "(only {count} words exist in this language)");
    }
    Ok(())
}
