//! # Grammar transforms (§4.F)
//!
//! Left factoring and left-recursion elimination, both direct and
//! indirect. Every pass here works over the same `(order, productions)`
//! shape as [`super::Grammar`] and rebuilds a fresh `Grammar` through
//! [`super::Grammar::from_parts`] rather than mutating in place - in
//! keeping with the crate-wide rule that algebra constructors never
//! mutate their input.
//!
//! Both passes are explicit repeat-until-unchanged loops bounded by
//! [`DEFAULT_ITERATION_LIMIT`] rounds (§5's "configurable ceiling,
//! default 100"); exceeding it raises [`Error::IterationLimit`] rather
//! than looping forever on a pathological or genuinely ambiguous input.

use crate::error::Error;
use crate::grammar::{is_nonterminal, Grammar, EPSILON};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Default bound on fixed-point rounds for both passes in this module.
pub const DEFAULT_ITERATION_LIMIT: usize = 100;

fn eps() -> Rc<str> {
    Rc::from(EPSILON)
}

fn is_eps_body(body: &[Rc<str>]) -> bool {
    body.len() == 1 && body[0].as_ref() == EPSILON
}

/// The mutable working copy both passes operate on: an insertion-ordered
/// nonterminal list plus its production-body map, mirroring
/// [`super::Grammar`]'s own shape so a finished pass converts back via
/// [`Grammar::from_parts`] with no further bookkeeping.
struct Working {
    order: Vec<Rc<str>>,
    productions: BTreeMap<Rc<str>, Vec<Vec<Rc<str>>>>,
}

impl Working {
    fn from_grammar(g: &Grammar) -> Working {
        let order = g.nonterminals().to_vec();
        let productions = order
            .iter()
            .map(|nt| (nt.clone(), g.productions(nt).to_vec()))
            .collect();
        Working { order, productions }
    }

    fn into_grammar(self) -> Grammar {
        Grammar::from_parts(self.order, self.productions)
    }

    fn bodies(&self, nt: &Rc<str>) -> Vec<Vec<Rc<str>>> {
        self.productions.get(nt).cloned().unwrap_or_default()
    }

    /// A name guaranteed not to collide with any nonterminal declared so
    /// far (original or freshly introduced).
    fn fresh(&self, base: &str) -> Rc<str> {
        let mut suffix = String::new();
        loop {
            suffix.push('\'');
            let candidate = format!("{base}{suffix}");
            if !self.order.iter().any(|nt| nt.as_ref() == candidate) {
                return Rc::from(candidate.as_str());
            }
        }
    }
}

/// Public entry point: direct factoring to a fixed point, then one round
/// of indirect factoring (substituting an unvisited nonterminal's bodies
/// into the first position, then re-running direct factoring), per §4.F.
pub fn left_factor(grammar: &Grammar) -> Result<Grammar, Error> {
    let mut working = Working::from_grammar(grammar);
    direct_factor(&mut working)?;
    indirect_factor(&mut working)?;
    Ok(working.into_grammar())
}

fn direct_factor(g: &mut Working) -> Result<(), Error> {
    let mut rounds = 0usize;
    loop {
        let mut changed = false;
        let mut i = 0;
        while i < g.order.len() {
            let a = g.order[i].clone();
            if factor_one(g, &a) {
                changed = true;
            }
            i += 1;
        }
        if !changed {
            return Ok(());
        }
        rounds += 1;
        if rounds > DEFAULT_ITERATION_LIMIT {
            return Err(Error::IterationLimit(DEFAULT_ITERATION_LIMIT));
        }
    }
}

/// One round of direct factoring for a single nonterminal: groups its
/// current bodies by first symbol, and for every group of two or more,
/// replaces them with `A -> x A<k>` plus a fresh `A<k> -> tails...`.
/// Returns whether anything changed.
fn factor_one(g: &mut Working, a: &Rc<str>) -> bool {
    let bodies = g.bodies(a);
    let mut group_order: Vec<Rc<str>> = Vec::new();
    let mut groups: BTreeMap<Rc<str>, Vec<Vec<Rc<str>>>> = BTreeMap::new();
    for body in &bodies {
        let key = body[0].clone();
        if !groups.contains_key(&key) {
            group_order.push(key.clone());
        }
        groups.entry(key).or_default().push(body.clone());
    }

    let factorable: Vec<Rc<str>> = group_order
        .into_iter()
        .filter(|k| groups[k].len() >= 2)
        .collect();
    if factorable.is_empty() {
        return false;
    }

    let mut new_bodies: Vec<Vec<Rc<str>>> = bodies
        .iter()
        .filter(|b| !factorable.contains(&b[0]))
        .cloned()
        .collect();

    for x in &factorable {
        let new_nt = g.fresh(a);
        new_bodies.push(vec![x.clone(), new_nt.clone()]);
        let tails: Vec<Vec<Rc<str>>> = groups[x]
            .iter()
            .map(|b| {
                let tail = b[1..].to_vec();
                if tail.is_empty() {
                    vec![eps()]
                } else {
                    tail
                }
            })
            .collect();
        g.order.push(new_nt.clone());
        g.productions.insert(new_nt, tails);
    }
    g.productions.insert(a.clone(), new_bodies);
    true
}

/// Indirect factoring: for each nonterminal in declaration order,
/// substitute the bodies of any not-yet-visited nonterminal heading one
/// of its productions, then re-run direct factoring to a fixed point.
fn indirect_factor(g: &mut Working) -> Result<(), Error> {
    let mut visited: std::collections::BTreeSet<Rc<str>> = Default::default();
    let mut rounds = 0usize;
    let snapshot: Vec<Rc<str>> = g.order.clone();

    for a in snapshot {
        loop {
            let bodies = g.bodies(&a);
            let mut changed = false;
            let mut new_bodies = Vec::new();
            for body in bodies {
                if let Some(head) = body.first() {
                    if is_nonterminal(head)
                        && head.as_ref() != a.as_ref()
                        && !visited.contains(head)
                        && g.productions.contains_key(head)
                    {
                        changed = true;
                        for b_body in g.bodies(head) {
                            let mut combined: Vec<Rc<str>> = if is_eps_body(&b_body) {
                                Vec::new()
                            } else {
                                b_body.clone()
                            };
                            combined.extend(body[1..].iter().cloned());
                            if combined.is_empty() {
                                combined.push(eps());
                            }
                            new_bodies.push(combined);
                        }
                        continue;
                    }
                }
                new_bodies.push(body);
            }
            g.productions.insert(a.clone(), new_bodies);
            if !changed {
                break;
            }
            rounds += 1;
            if rounds > DEFAULT_ITERATION_LIMIT {
                return Err(Error::IterationLimit(DEFAULT_ITERATION_LIMIT));
            }
        }
        visited.insert(a.clone());
    }
    direct_factor(g)
}

/// Public entry point: eliminates both indirect and direct left
/// recursion, visiting nonterminals in declaration order (§4.F).
pub fn eliminate_left_recursion(grammar: &Grammar) -> Result<Grammar, Error> {
    let mut g = Working::from_grammar(grammar);
    let mut visited: std::collections::BTreeSet<Rc<str>> = Default::default();
    let mut rounds = 0usize;
    let snapshot: Vec<Rc<str>> = g.order.clone();

    for a in snapshot {
        // Step 1: substitute away any production beginning with an
        // already-visited (earlier) nonterminal.
        loop {
            let bodies = g.bodies(&a);
            let mut changed = false;
            let mut new_bodies = Vec::new();
            for body in bodies {
                if let Some(head) = body.first() {
                    if is_nonterminal(head) && visited.contains(head) {
                        changed = true;
                        for b_body in g.bodies(head) {
                            let mut combined: Vec<Rc<str>> = if is_eps_body(&b_body) {
                                Vec::new()
                            } else {
                                b_body.clone()
                            };
                            combined.extend(body[1..].iter().cloned());
                            if combined.is_empty() {
                                combined.push(eps());
                            }
                            new_bodies.push(combined);
                        }
                        continue;
                    }
                }
                new_bodies.push(body);
            }
            g.productions.insert(a.clone(), new_bodies);
            if !changed {
                break;
            }
            rounds += 1;
            if rounds > DEFAULT_ITERATION_LIMIT {
                return Err(Error::IterationLimit(DEFAULT_ITERATION_LIMIT));
            }
        }

        // Step 2: split off direct left recursion.
        let bodies = g.bodies(&a);
        let (recursive, nonrecursive): (Vec<_>, Vec<_>) = bodies
            .into_iter()
            .partition(|b| b.first().map(|s| s == &a).unwrap_or(false));

        if !recursive.is_empty() {
            let a_prime = g.fresh(&a);
            g.order.push(a_prime.clone());

            let mut new_a_bodies = Vec::new();
            if nonrecursive.is_empty() {
                new_a_bodies.push(vec![a_prime.clone()]);
            } else {
                for beta in &nonrecursive {
                    let mut body = if is_eps_body(beta) {
                        Vec::new()
                    } else {
                        beta.clone()
                    };
                    body.push(a_prime.clone());
                    new_a_bodies.push(body);
                }
            }
            g.productions.insert(a.clone(), new_a_bodies);

            let mut prime_bodies: Vec<Vec<Rc<str>>> = recursive
                .iter()
                .map(|alpha| {
                    let mut tail = alpha[1..].to_vec();
                    tail.push(a_prime.clone());
                    tail
                })
                .collect();
            prime_bodies.push(vec![eps()]);
            g.productions.insert(a_prime, prime_bodies);
        }

        visited.insert(a);
    }

    Ok(g.into_grammar())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;

    fn parse(src: &str) -> Grammar {
        crate::parser::grammar(src).unwrap().try_into().unwrap()
    }

    fn body_strings(g: &Grammar, nt: &str) -> Vec<Vec<String>> {
        g.productions(nt)
            .iter()
            .map(|b| b.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    /// Scenario 7: classic `E -> E + T | T` left recursion.
    #[test]
    fn scenario_7_eliminates_direct_left_recursion() {
        let g = parse("E -> E + T | T\nT -> T * F | F\nF -> ( E ) | id\n");
        let eliminated = eliminate_left_recursion(&g).unwrap();
        for nt in eliminated.nonterminals() {
            for body in eliminated.productions(nt) {
                assert_ne!(body[0].as_ref(), nt.as_ref(), "{nt} still left-recursive");
            }
        }
        // the new E' / T' auxiliaries exist and carry the tails.
        assert!(eliminated.nonterminals().iter().any(|n| n.as_ref() == "E'"));
        assert!(eliminated.nonterminals().iter().any(|n| n.as_ref() == "T'"));
    }

    #[test]
    fn non_recursive_grammar_is_unchanged_in_key_set() {
        let g = parse("E -> T E'\nE' -> + T E' | &\nT -> F T'\nT' -> * F T' | &\nF -> ( E ) | id\n");
        let eliminated = eliminate_left_recursion(&g).unwrap();
        let before: std::collections::BTreeSet<&Rc<str>> = g.nonterminals().iter().collect();
        let after: std::collections::BTreeSet<&Rc<str>> = eliminated.nonterminals().iter().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn left_factoring_groups_common_prefixes() {
        let g = parse("A -> a b | a c | d\n");
        let factored = left_factor(&g).unwrap();
        assert_eq!(body_strings(&factored, "A"), vec![vec!["d".to_string()], vec!["a".to_string(), "A'".to_string()]]);
        assert_eq!(
            body_strings(&factored, "A'"),
            vec![vec!["b".to_string()], vec!["c".to_string()]]
        );
    }

    #[test]
    fn left_factoring_is_idempotent_on_already_factored_grammar() {
        let g = parse("E -> T E'\nE' -> + T E' | &\nT -> F T'\nT' -> * F T' | &\nF -> ( E ) | id\n");
        let once = left_factor(&g).unwrap();
        let twice = left_factor(&once).unwrap();
        assert_eq!(once.nonterminals().len(), twice.nonterminals().len());
    }
}
