//! # SLR(1) construction and driver (§4.H)
//!
//! [`SlrTable::build`] augments the grammar with a fresh start `S' -> S`,
//! removes left recursion from the augmented grammar, runs the canonical
//! LR(0) item-set construction (closure/goto to a fixed point) and fills
//! the SLR action/goto tables from FOLLOW. [`SlrTable::accepts`] is the
//! shift-reduce recognizer that drives them.

use crate::error::Error;
use crate::grammar::{is_nonterminal, transform, Grammar, END_OF_INPUT, EPSILON};
use crate::table::Table;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::rc::Rc;

/// One LR(0) item: a production body with a dot at `dot` (`0..=body.len()`).
/// An ε-production `[ε]` is represented with an *empty* body and `dot ==
/// 0 == body.len()` - already "at the end" - per §4.H's item definition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Item {
    pub head: Rc<str>,
    pub body: Vec<Rc<str>>,
    pub dot: usize,
}

impl Item {
    fn symbol_after_dot(&self) -> Option<&Rc<str>> {
        self.body.get(self.dot)
    }

    fn advanced(&self) -> Item {
        Item {
            head: self.head.clone(),
            body: self.body.clone(),
            dot: self.dot + 1,
        }
    }

    fn at_end(&self) -> bool {
        self.dot == self.body.len()
    }
}

fn normalize_body(body: &[Rc<str>]) -> Vec<Rc<str>> {
    if body.len() == 1 && body[0].as_ref() == EPSILON {
        Vec::new()
    } else {
        body.to_vec()
    }
}

pub type ItemSet = BTreeSet<Item>;

/// closure(I): every item `A -> α • B β` pulls in `B -> • γ` for each of
/// `B`'s productions, to a fixed point.
fn closure(grammar: &Grammar, mut set: ItemSet) -> ItemSet {
    loop {
        let mut added = Vec::new();
        for item in &set {
            if let Some(b) = item.symbol_after_dot() {
                if is_nonterminal(b) {
                    for body in grammar.productions(b) {
                        let new_item = Item {
                            head: b.clone(),
                            body: normalize_body(body),
                            dot: 0,
                        };
                        if !set.contains(&new_item) && !added.contains(&new_item) {
                            added.push(new_item);
                        }
                    }
                }
            }
        }
        if added.is_empty() {
            return set;
        }
        set.extend(added);
    }
}

/// The action a parser stack takes for one `(state, terminal)` cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    Reduce(Rc<str>, Vec<Rc<str>>),
    Accept,
}

/// A built SLR(1) table: the LR(0) item-set collection plus the
/// FOLLOW-driven ACTION/GOTO maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlrTable {
    grammar: Grammar,
    states: Vec<ItemSet>,
    action: BTreeMap<(usize, Rc<str>), Action>,
    goto: BTreeMap<(usize, Rc<str>), usize>,
}

/// Introduces `S' -> S` (S' is the original start's name with a fresh
/// `'`-suffix) and removes left recursion from the result, per §4.H's
/// augmentation step.
fn augment(grammar: &Grammar) -> Result<Grammar, Error> {
    let start = grammar.start().clone();
    let existing: BTreeSet<&Rc<str>> = grammar.nonterminals().iter().collect();
    let mut suffix = String::new();
    let s_prime: Rc<str> = loop {
        suffix.push('\'');
        let candidate = format!("{start}{suffix}");
        if !existing.iter().any(|nt| nt.as_ref() == candidate.as_str()) {
            break Rc::from(candidate.as_str());
        }
    };

    let mut order = vec![s_prime.clone()];
    order.extend(grammar.nonterminals().iter().cloned());
    let mut productions: BTreeMap<Rc<str>, Vec<Vec<Rc<str>>>> = BTreeMap::new();
    productions.insert(s_prime, vec![vec![start]]);
    for nt in grammar.nonterminals() {
        productions.insert(nt.clone(), grammar.productions(nt).to_vec());
    }
    let combined = Grammar::from_parts(order, productions);
    transform::eliminate_left_recursion(&combined)
}

impl SlrTable {
    /// Builds the table for `grammar`, per §4.H.
    pub fn build(grammar: &Grammar) -> Result<SlrTable, Error> {
        let augmented = augment(grammar)?;
        let firsts = augmented.first_sets()?;
        let follows = augmented.follow_sets(&firsts);

        let start_head = augmented.start().clone();
        let start_body = normalize_body(&augmented.productions(&start_head)[0]);
        let start_item = Item {
            head: start_head.clone(),
            body: start_body.clone(),
            dot: 0,
        };
        let start_set = closure(&augmented, BTreeSet::from([start_item]));

        let mut states: Vec<ItemSet> = vec![start_set.clone()];
        let mut index: BTreeMap<ItemSet, usize> = BTreeMap::from([(start_set, 0)]);
        let mut edges: BTreeMap<(usize, Rc<str>), usize> = BTreeMap::new();
        let mut queue: VecDeque<usize> = VecDeque::from([0]);

        let mut symbols: Vec<Rc<str>> = augmented.terminals().into_iter().collect();
        symbols.extend(augmented.nonterminals().iter().cloned());

        while let Some(i) = queue.pop_front() {
            for symbol in &symbols {
                let moved: ItemSet = states[i]
                    .iter()
                    .filter(|it| it.symbol_after_dot() == Some(symbol))
                    .map(Item::advanced)
                    .collect();
                if moved.is_empty() {
                    continue;
                }
                let next = closure(&augmented, moved);
                let id = *index.entry(next.clone()).or_insert_with(|| {
                    let id = states.len();
                    states.push(next.clone());
                    queue.push_back(id);
                    id
                });
                edges.insert((i, symbol.clone()), id);
            }
        }

        let mut action: BTreeMap<(usize, Rc<str>), Action> = BTreeMap::new();
        let mut goto: BTreeMap<(usize, Rc<str>), usize> = BTreeMap::new();

        for (i, set) in states.iter().enumerate() {
            for item in set {
                match item.symbol_after_dot() {
                    Some(sym) if !is_nonterminal(sym) => {
                        if let Some(&j) = edges.get(&(i, sym.clone())) {
                            action.insert((i, sym.clone()), Action::Shift(j));
                        }
                    }
                    Some(sym) => {
                        if let Some(&j) = edges.get(&(i, sym.clone())) {
                            goto.insert((i, sym.clone()), j);
                        }
                    }
                    None => {
                        debug_assert!(item.at_end());
                        if item.head == start_head && item.body == start_body {
                            action.insert((i, Rc::from(END_OF_INPUT)), Action::Accept);
                        } else {
                            for lookahead in follows.get(&item.head).into_iter().flatten() {
                                action.insert(
                                    (i, lookahead.clone()),
                                    Action::Reduce(item.head.clone(), item.body.clone()),
                                );
                            }
                        }
                    }
                }
            }
        }

        Ok(SlrTable {
            grammar: augmented,
            states,
            action,
            goto,
        })
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn states(&self) -> &[ItemSet] {
        &self.states
    }

    pub fn action(&self, state: usize, terminal: &str) -> Option<&Action> {
        self.action.get(&(state, Rc::from(terminal)))
    }

    pub fn goto(&self, state: usize, nonterminal: &str) -> Option<usize> {
        self.goto.get(&(state, Rc::from(nonterminal))).copied()
    }

    /// Shift-reduce recognizer of §4.H: a stack of state indices
    /// initialized to `[0]`. Never errors - rejection is always `false`.
    pub fn accepts(&self, input: &str) -> bool {
        let mut tokens: Vec<&str> = input.split_whitespace().collect();
        tokens.push(END_OF_INPUT);
        let mut pos = 0usize;
        let mut stack: Vec<usize> = vec![0];

        loop {
            let state = *stack.last().expect("stack never empties before accept/reject");
            let lookahead = tokens[pos];
            match self.action(state, lookahead) {
                Some(Action::Shift(j)) => {
                    stack.push(*j);
                    pos += 1;
                }
                Some(Action::Reduce(head, body)) => {
                    for _ in 0..body.len() {
                        stack.pop();
                    }
                    let top = *stack.last().expect("stack never empties mid-reduce");
                    match self.goto(top, head) {
                        Some(next) => stack.push(next),
                        None => return false,
                    }
                }
                Some(Action::Accept) => return true,
                None => return false,
            }
        }
    }

    /// Renders the ACTION/GOTO tables as `state | symbol | action`
    /// rows, sorted by state then symbol - used by the CLI's `slr1`
    /// subcommand.
    pub fn to_table_string(&self) -> String {
        let mut table = Table::default();
        table.push_row(vec!["state".into(), "symbol".into(), "action".into()]);
        for (&(state, ref symbol), act) in &self.action {
            let rendered = match act {
                Action::Shift(j) => format!("shift {j}"),
                Action::Reduce(head, body) => {
                    let b = body.iter().map(|s| s.as_ref()).collect::<Vec<_>>().join(" ");
                    format!("reduce {head} -> {b}")
                }
                Action::Accept => "accept".to_string(),
            };
            table.push_row(vec![state.to_string(), symbol.to_string(), rendered]);
        }
        for (&(state, ref nt), &target) in &self.goto {
            table.push_row(vec![state.to_string(), nt.to_string(), format!("goto {target}")]);
        }
        table.to_string("  ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arithmetic_grammar() -> Grammar {
        let src = "\
E -> E + T | T
T -> T * F | F
F -> ( E ) | id
";
        crate::parser::grammar(src).unwrap().try_into().unwrap()
    }

    /// Scenario 6: accepts `id`, `id + id * id`; rejects `( id`.
    #[test]
    fn scenario_6_slr1_recognition() {
        let g = arithmetic_grammar();
        let table = SlrTable::build(&g).unwrap();
        assert!(table.accepts("id"));
        assert!(table.accepts("id + id * id"));
        assert!(!table.accepts("( id"));
    }

    #[test]
    fn parenthesized_expression_accepted() {
        let g = arithmetic_grammar();
        let table = SlrTable::build(&g).unwrap();
        assert!(table.accepts("( id + id ) * id"));
        assert!(!table.accepts("( id + id"));
    }

    #[test]
    fn already_factored_grammar_also_builds() {
        let src = "\
E -> T E'
E' -> + T E' | &
T -> F T'
T' -> * F T' | &
F -> ( E ) | id
";
        let g: Grammar = crate::parser::grammar(src).unwrap().try_into().unwrap();
        let table = SlrTable::build(&g).unwrap();
        assert!(table.accepts("id + id * id"));
        assert!(!table.accepts("id id"));
    }

    #[test]
    fn nullable_epsilon_production_reduces_correctly() {
        let src = "S -> A b\nA -> a | &\n";
        let g: Grammar = crate::parser::grammar(src).unwrap().try_into().unwrap();
        let table = SlrTable::build(&g).unwrap();
        assert!(table.accepts("a b"));
        assert!(table.accepts("b"));
        assert!(!table.accepts("a"));
    }
}
