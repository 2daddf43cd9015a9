//! Loading automaton/regex files and converting between the three
//! "automaton-ish" kinds the CLI accepts, per component J.
//!
//! [`Automata`] is the CLI's own answer to the library's "automaton
//! polymorphism" design note: subcommands don't ask the user which of
//! DFA/NFA/regex a file holds ahead of time beyond the `--type` flag, and
//! every conversion between kinds funnels through this one enum.

use clap::ValueEnum;
use langlab::fa::{Dfa, Fa, Nfa};
use langlab::regex::Regex;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse {label} file: {source}")]
    Parse { label: &'static str, source: String },
    #[error("could not build {label}: {source}")]
    Build { label: &'static str, source: String },
}

impl LoadError {
    fn parse(label: &'static str, source: impl fmt::Display) -> Self {
        LoadError::Parse {
            label,
            source: source.to_string(),
        }
    }

    fn build(label: &'static str, source: impl fmt::Display) -> Self {
        LoadError::Build {
            label,
            source: source.to_string(),
        }
    }
}

/// Which of the three file kinds a `--type` flag selects.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AutomataType {
    #[default]
    Dfa,
    Nfa,
    Regex,
}

impl fmt::Display for AutomataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutomataType::Dfa => write!(f, "DFA"),
            AutomataType::Nfa => write!(f, "NFA"),
            AutomataType::Regex => write!(f, "regex"),
        }
    }
}

/// One of a DFA, an NFA, or a regular expression, loaded from a file and
/// ready to be converted, compared, or queried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Automata {
    Dfa(Dfa),
    Nfa(Nfa),
    Regex(Regex),
}

impl Automata {
    pub fn get_type(&self) -> AutomataType {
        match self {
            Automata::Dfa(_) => AutomataType::Dfa,
            Automata::Nfa(_) => AutomataType::Nfa,
            Automata::Regex(_) => AutomataType::Regex,
        }
    }

    pub fn load_file(path: &Path, kind: AutomataType) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::File {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load(&content, kind)
    }

    pub fn load(content: &str, kind: AutomataType) -> Result<Self, LoadError> {
        match kind {
            AutomataType::Dfa => {
                let fa = load_fa(content, "DFA")?;
                let dfa = Dfa::try_from(fa).map_err(|e| LoadError::build("DFA", e))?;
                Ok(Automata::Dfa(dfa))
            }
            AutomataType::Nfa => {
                let fa = load_fa(content, "NFA")?;
                Ok(Automata::Nfa(Nfa::from(fa)))
            }
            AutomataType::Regex => {
                let tokens = langlab::parser::regex(content).map_err(|e| LoadError::parse("regex", e))?;
                let regex = Regex::try_from(tokens).map_err(|e| LoadError::build("regex", e))?;
                Ok(Automata::Regex(regex))
            }
        }
    }

    /// This value as a DFA, determinizing first if it wasn't already one.
    /// The bool records whether a conversion actually happened.
    pub fn to_dfa(self) -> (Dfa, bool) {
        match self {
            Automata::Dfa(dfa) => (dfa, false),
            Automata::Nfa(nfa) => (nfa.to_dfa(), true),
            Automata::Regex(regex) => (regex.to_dfa(), true),
        }
    }

    /// This value as an NFA (every DFA is trivially one; a regex goes via
    /// its followpos DFA first).
    pub fn to_nfa(self) -> (Nfa, bool) {
        match self {
            Automata::Dfa(dfa) => (dfa.to_nfa(), true),
            Automata::Nfa(nfa) => (nfa, false),
            Automata::Regex(regex) => (Nfa::from(regex.to_dfa().into_inner()), true),
        }
    }

    pub fn to_minimized_dfa(self) -> Dfa {
        let (dfa, _) = self.to_dfa();
        dfa.minimize()
    }

    pub fn accepts(&self, word: &[&str]) -> bool {
        match self {
            Automata::Dfa(dfa) => dfa.accepts(word),
            Automata::Nfa(nfa) => nfa.accepts(word),
            Automata::Regex(regex) => Nfa::from(regex.to_dfa().into_inner()).accepts(word),
        }
    }

    pub fn to_table_string(&self) -> String {
        match self {
            Automata::Dfa(dfa) => render_fa(dfa.inner()),
            Automata::Nfa(nfa) => render_fa(nfa.inner()),
            Automata::Regex(regex) => regex.to_string(),
        }
    }
}

fn load_fa(content: &str, label: &'static str) -> Result<Fa, LoadError> {
    let parsed = langlab::parser::fa(content).map_err(|e| LoadError::parse(label, e))?;
    parsed
        .try_into()
        .map_err(|e: langlab::fa::parse::FaParseError| LoadError::build(label, e))
}

fn render_fa(fa: &Fa) -> String {
    fa.to_table_string().unwrap_or_else(|e| e.to_string())
}

impl fmt::Display for Automata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_table_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DFA_SRC: &str = "\
*vertices 2
*initial 1
*final 2
*transitions
1 > 2 | a
2 > 1 | a
1 > 1 | b
2 > 2 | b
";

    #[test]
    fn loads_dfa_and_accepts() {
        let automata = Automata::load(DFA_SRC, AutomataType::Dfa).unwrap();
        assert!(automata.accepts(&["a"]));
        assert!(!automata.accepts(&["a", "a"]));
    }

    #[test]
    fn loading_nondeterministic_file_as_dfa_fails() {
        let src = "*vertices 2\n*initial 1\n*final\n*transitions\n1 > 2 | &\n";
        assert!(Automata::load(src, AutomataType::Dfa).is_err());
        assert!(Automata::load(src, AutomataType::Nfa).is_ok());
    }

    #[test]
    fn regex_converts_to_dfa() {
        let automata = Automata::load("(a+b)*abb", AutomataType::Regex).unwrap();
        let dfa = automata.to_minimized_dfa();
        assert!(dfa.accepts(&["a", "b", "b"]));
        assert!(!dfa.accepts(&["a", "b"]));
    }
}
