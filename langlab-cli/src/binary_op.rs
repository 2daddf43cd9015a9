//! `union`/`intersection`/`difference`/`symmetric-difference`: all four
//! are one general product construction in [`langlab::fa::algebra`],
//! parametrized only by which `(in A, in B)` pairs accept - so the CLI
//! side is one dispatcher rather than four near-duplicate handlers.
//!
//! Unlike the reference workbench's DFA algebra, `langlab`'s
//! [`Dfa::union`][langlab::fa::Dfa::union] and friends never fail on
//! mismatched alphabets (the product construction simply unions both
//! automata's alphabets), so there is no `DifferentAlphabets` case to
//! handle here.

use crate::automata::Automata;
use crate::{log, BinaryOpArgs};
use std::fmt;

#[derive(Clone, Copy, Debug)]
pub enum BinaryOperation {
    Union,
    Intersection,
    Difference,
    SymmetricDifference,
}

impl BinaryOperation {
    fn as_str(self) -> &'static str {
        match self {
            BinaryOperation::Union => "union",
            BinaryOperation::Intersection => "intersection",
            BinaryOperation::Difference => "difference",
            BinaryOperation::SymmetricDifference => "symmetric difference",
        }
    }
}

impl fmt::Display for BinaryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub fn run(no_log: bool, args: BinaryOpArgs, op: BinaryOperation) -> Result<(), String> {
    let second_type = args.second_type.unwrap_or(args.r#type);

    log!(no_log, "loading {} as {}", args.first.display(), args.r#type);
    let (mut dfa1, converted1) = Automata::load_file(&args.first, args.r#type)
        .map_err(|e| format!("reading {}: {e}", args.first.display()))?
        .to_dfa();

    log!(no_log, "loading {} as {}", args.second.display(), second_type);
    let (mut dfa2, converted2) = Automata::load_file(&args.second, second_type)
        .map_err(|e| format!("reading {}: {e}", args.second.display()))?
        .to_dfa();

    if converted1 {
        log!(no_log, "input 1 was determinized to proceed, since it wasn't a DFA");
    } else if args.minimized {
        dfa1 = dfa1.minimize();
        log!(no_log, "minimized input 1 before the product construction");
    }
    if converted2 {
        log!(no_log, "input 2 was determinized to proceed, since it wasn't a DFA");
    } else if args.minimized {
        dfa2 = dfa2.minimize();
        log!(no_log, "minimized input 2 before the product construction");
    }

    let mut combined = match op {
        BinaryOperation::Union => dfa1.union(&dfa2),
        BinaryOperation::Intersection => dfa1.intersection(&dfa2),
        BinaryOperation::Difference => dfa1.difference(&dfa2),
        BinaryOperation::SymmetricDifference => dfa1.symmetric_difference(&dfa2),
    };

    if args.minimized {
        combined = combined.minimize();
        log!(no_log, "minimized {op} ({} states):", combined.inner().state_count());
    } else {
        log!(no_log, "{op} (not minimized, add --minimized to minimize):");
    }
    println!("{}", combined.inner().to_table_string().map_err(|e| e.to_string())?);

    if let Some(path) = &args.compare_against {
        let compare_to = Automata::load_file(path, args.compare_type)
            .map_err(|e| format!("reading {}: {e}", path.display()))?;
        let (compare_to, _) = compare_to.to_dfa();
        let equivalent = combined.equivalent_to(&compare_to);
        println!(
            "{op} of the two provided {}s is {} to {}",
            args.r#type,
            if equivalent { "equivalent" } else { "not equivalent" },
            path.display()
        );
    }

    Ok(())
}
