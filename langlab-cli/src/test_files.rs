//! `test`: runs an automaton against every line of one or more test
//! files, one whitespace-tokenized word per line. `langlab`'s alphabet
//! isn't limited to single characters (the file format allows multi-
//! character symbols), so a line's symbols are split on whitespace rather
//! than the reference workbench's per-grapheme acceptance.

use crate::automata::Automata;
use crate::{log, TestFileArgs};
use std::fs;

pub fn run(no_log: bool, args: TestFileArgs) -> Result<(), String> {
    log!(no_log, "loading {} as {}", args.automaton.display(), args.r#type);
    let automata = Automata::load_file(&args.automaton, args.r#type).map_err(|e| e.to_string())?;

    for file in &args.files {
        let content = fs::read_to_string(file).map_err(|e| e.to_string())?;
        println!("testing {}:", file.display());
        let mut passed = 0;
        let mut total = 0;
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            total += 1;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            let ok = automata.accepts(&tokens);
            if ok {
                passed += 1;
            }
            println!("{} {line}", if ok { "[ OK ]" } else { "[FAIL]" });
        }
        println!("{passed}/{total} lines passed in {}", file.display());
    }

    Ok(())
}
