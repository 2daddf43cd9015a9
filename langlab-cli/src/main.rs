//! The `langlab` command-line workbench (component J): one subcommand per
//! operation in the library, dispatching straight onto `langlab`'s public
//! API. Diagnostic lines go through [`log`], gated by the global
//! `--no-log` flag; a subcommand's actual result always goes to stdout via
//! plain `println!`, `--no-log` or not.

mod automata;
mod binary_op;
mod enumerate;
mod equivalence;
mod grammar;
mod test_files;

use automata::AutomataType;
use binary_op::BinaryOperation;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Prints `$($arg)*` to stderr unless the top-level `--no-log` flag was
/// given. Mirrors the reference workbench's own log/output split: `log!`
/// lines are diagnostics, plain `println!` is the command's actual
/// output and is never suppressed.
#[macro_export]
macro_rules! log {
    ($no_log:expr, $($arg:tt)*) => {
        if !$no_log {
            eprintln!($($arg)*);
        }
    };
}

#[derive(Parser, Debug)]
#[command(name = "langlab", version, about = "A finite automata, regular expression and context-free grammar workbench")]
struct LanglabArgs {
    /// Suppress diagnostic logging; only the command's result is printed.
    #[arg(long, global = true)]
    no_log: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse an automaton or regex file and print its transition table.
    Show(ShowArgs),
    /// Determinize an NFA or regex into an equivalent DFA.
    Determinize(ConvertArgs),
    /// Minimize a DFA (NFAs and regexes are determinized first).
    Minimize(ConvertArgs),
    /// Print the union of two automata.
    Union(BinaryOpArgs),
    /// Print the intersection of two automata.
    Intersection(BinaryOpArgs),
    /// Print the difference of two automata.
    Difference(BinaryOpArgs),
    /// Print the symmetric difference of two automata.
    SymmetricDifference(BinaryOpArgs),
    /// Check whether two automata accept the same language.
    Equivalent(EquivalenceArgs),
    /// Print the first N words of an automaton's or regex's language.
    Enumerate(EnumerateArgs),
    /// Run an automaton against the lines of one or more test files.
    Test(TestFileArgs),
    /// Print FIRST and FOLLOW sets for every nonterminal of a grammar.
    FirstFollow(GrammarArgs),
    /// Print a grammar after left factoring.
    LeftFactor(GrammarArgs),
    /// Print a grammar after left-recursion elimination.
    EliminateLeftRecursion(GrammarArgs),
    /// Build an LL(1) parsing table, optionally running it on an input.
    Ll1(DriverArgs),
    /// Build an SLR(1) parsing table, optionally running it on an input.
    Slr1(DriverArgs),
}

#[derive(clap::Args, Debug)]
struct ShowArgs {
    file: PathBuf,
    #[arg(long, value_enum, default_value_t = AutomataType::Dfa)]
    r#type: AutomataType,
}

#[derive(clap::Args, Debug)]
struct ConvertArgs {
    file: PathBuf,
    #[arg(long, value_enum, default_value_t = AutomataType::Dfa)]
    r#type: AutomataType,
}

#[derive(clap::Args, Debug)]
struct BinaryOpArgs {
    first: PathBuf,
    second: PathBuf,
    /// Type of both files, unless `--second-type` overrides the second.
    #[arg(long, value_enum, default_value_t = AutomataType::Dfa)]
    r#type: AutomataType,
    #[arg(long, value_enum)]
    second_type: Option<AutomataType>,
    /// Minimize the result before printing it.
    #[arg(long)]
    minimized: bool,
    /// Instead of printing the result, compare it against this file for
    /// equivalence.
    #[arg(long)]
    compare_against: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = AutomataType::Dfa)]
    compare_type: AutomataType,
}

#[derive(clap::Args, Debug)]
struct EquivalenceArgs {
    first: PathBuf,
    second: PathBuf,
    #[arg(long, value_enum, default_value_t = AutomataType::Dfa)]
    r#type: AutomataType,
    #[arg(long, value_enum)]
    second_type: Option<AutomataType>,
}

#[derive(clap::Args, Debug)]
struct EnumerateArgs {
    file: PathBuf,
    #[arg(long, value_enum, default_value_t = AutomataType::Nfa)]
    r#type: AutomataType,
    #[arg(short, long, default_value_t = 10)]
    amount: usize,
}

#[derive(clap::Args, Debug)]
struct TestFileArgs {
    automaton: PathBuf,
    #[arg(long, value_enum, default_value_t = AutomataType::Dfa)]
    r#type: AutomataType,
    /// One or more files, each one test word per line.
    files: Vec<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct GrammarArgs {
    file: PathBuf,
}

#[derive(clap::Args, Debug)]
struct DriverArgs {
    file: PathBuf,
    /// A whitespace-separated token sequence to run the built table on.
    #[arg(long)]
    input: Option<String>,
}

fn main() -> ExitCode {
    let args = LanglabArgs::parse();
    let no_log = args.no_log;

    let result = match args.command {
        Command::Show(a) => show(no_log, a),
        Command::Determinize(a) => convert(no_log, a, Conversion::Determinize),
        Command::Minimize(a) => convert(no_log, a, Conversion::Minimize),
        Command::Union(a) => binary_op::run(no_log, a, BinaryOperation::Union),
        Command::Intersection(a) => binary_op::run(no_log, a, BinaryOperation::Intersection),
        Command::Difference(a) => binary_op::run(no_log, a, BinaryOperation::Difference),
        Command::SymmetricDifference(a) => binary_op::run(no_log, a, BinaryOperation::SymmetricDifference),
        Command::Equivalent(a) => equivalence::run(no_log, a),
        Command::Enumerate(a) => enumerate::run(no_log, a),
        Command::Test(a) => test_files::run(no_log, a),
        Command::FirstFollow(a) => grammar::first_follow(no_log, a),
        Command::LeftFactor(a) => grammar::left_factor(no_log, a),
        Command::EliminateLeftRecursion(a) => grammar::eliminate_left_recursion(no_log, a),
        Command::Ll1(a) => grammar::ll1(no_log, a),
        Command::Slr1(a) => grammar::slr1(no_log, a),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

enum Conversion {
    Determinize,
    Minimize,
}

fn show(no_log: bool, args: ShowArgs) -> Result<(), String> {
    log!(no_log, "loading {} as {}", args.file.display(), args.r#type);
    let automata = automata::Automata::load_file(&args.file, args.r#type).map_err(|e| e.to_string())?;
    println!("{automata}");
    Ok(())
}

fn convert(no_log: bool, args: ConvertArgs, conversion: Conversion) -> Result<(), String> {
    log!(no_log, "loading {} as {}", args.file.display(), args.r#type);
    let automata = automata::Automata::load_file(&args.file, args.r#type).map_err(|e| e.to_string())?;
    match conversion {
        Conversion::Determinize => {
            let (dfa, converted) = automata.to_dfa();
            log!(no_log, "{}", if converted { "determinized" } else { "already deterministic" });
            println!("{}", dfa.inner().to_table_string().map_err(|e| e.to_string())?);
        }
        Conversion::Minimize => {
            let dfa = automata.to_minimized_dfa();
            log!(no_log, "minimized to {} states", dfa.inner().state_count());
            println!("{}", dfa.inner().to_table_string().map_err(|e| e.to_string())?);
        }
    }
    Ok(())
}
