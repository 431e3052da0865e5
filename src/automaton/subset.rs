use std::collections::VecDeque;
use std::hash::BuildHasherDefault;

use hashbrown::HashMap;
use hashers::fx_hash::FxHasher;
use log::debug;

use crate::automaton::machine::{Automaton, Node, Transition};
use crate::util::bits::BitSet;
use crate::util::types::StateId;

/// Epsilon-closure restricted to subset-relevant nodes.
///
/// Walks every node reachable from the seed through epsilon transitions and
/// records the ones that are accepting or carry at least one byte transition;
/// purely transient epsilon nodes are traversed but never recorded, which
/// keeps subset identity tight. Byte conditions met along the way extend the
/// lazily discovered alphabet. Returns the canonical subset together with
/// whether it contains an accepting node.
fn fill(automaton: &Automaton, seed: &BitSet, alphabet: &mut Vec<u8>) -> (BitSet, bool) {
    let size = automaton.node_count();
    let mut subset = BitSet::new(size);
    let mut touched = BitSet::new(size);
    let mut accepting = false;

    let mut pending: Vec<StateId> = (0..size).filter(|id| seed.get(*id)).collect();

    while let Some(id) = pending.pop() {
        if touched.get(id) {
            continue;
        }
        touched.set(id, true);

        let node = automaton.node(id);
        let mut has_byte = false;
        for transition in &node.transitions {
            match *transition {
                Transition::Epsilon { to } => pending.push(to),
                Transition::Byte { on, .. } => {
                    has_byte = true;
                    if !alphabet.contains(&on) {
                        alphabet.push(on);
                    }
                }
            }
        }

        if has_byte || node.accepting {
            subset.set(id, true);
            accepting = accepting || node.accepting;
        }
    }

    (subset, accepting)
}

/// Converts an NFA into an equivalent DFA using the subset construction.
///
/// A DFA state is a subset of NFA nodes, canonicalized by [`fill`] and
/// deduplicated by content through a hash map keyed on the subset bits.
/// States are numbered in discovery order with the start closure as state 0;
/// the alphabet is discovered lazily while closures are computed. A successor
/// whose subset is all-zero offers no continuation and is ignored.
///
/// Returns `None` for an automaton with no nodes, or when the start closure
/// itself contains no relevant node.
pub fn determinize(input: &Automaton) -> Option<Automaton> {
    if input.is_empty() {
        return None;
    }

    let mut alphabet: Vec<u8> = Vec::new();

    let mut start_seed = BitSet::new(input.node_count());
    start_seed.set(input.start(), true);
    let (start_subset, start_accepting) = fill(input, &start_seed, &mut alphabet);

    if start_subset.is_zero() {
        return None;
    }

    // discovered DFA states in discovery order; the map resolves subsets to
    // their state id so duplicates are never requeued
    let mut nodes: Vec<Node> = Vec::new();
    let mut subsets: Vec<BitSet> = Vec::new();
    let mut index: HashMap<BitSet, StateId, BuildHasherDefault<FxHasher>> =
        HashMap::with_hasher(BuildHasherDefault::<FxHasher>::default());
    let mut worklist: VecDeque<StateId> = VecDeque::new();

    let mut start_node = Node::new(0);
    start_node.accepting = start_accepting;
    nodes.push(start_node);
    index.insert(start_subset.clone(), 0);
    subsets.push(start_subset);
    worklist.push_back(0);

    while let Some(current) = worklist.pop_front() {
        // every byte relevant to this subset is already present because fill
        // collected the conditions of all member nodes
        let known = alphabet.len();

        for column in 0..known {
            let byte = alphabet[column];

            // move-on-byte: union of destinations over the subset members
            let mut seed = BitSet::new(input.node_count());
            for id in 0..input.node_count() {
                if !subsets[current].get(id) {
                    continue;
                }
                for transition in &input.node(id).transitions {
                    if let Transition::Byte { on, to } = *transition {
                        if on == byte {
                            seed.set(to, true);
                        }
                    }
                }
            }
            if seed.is_zero() {
                continue;
            }

            let (successor, accepting) = fill(input, &seed, &mut alphabet);
            if successor.is_zero() {
                // no continuation on this byte
                continue;
            }

            let target = match index.get(&successor) {
                Some(existing) => *existing,
                None => {
                    let fresh = nodes.len();
                    let mut node = Node::new(fresh);
                    node.accepting = accepting;
                    nodes.push(node);
                    index.insert(successor.clone(), fresh);
                    subsets.push(successor);
                    worklist.push_back(fresh);
                    fresh
                }
            };

            nodes[current].transitions.push(Transition::Byte { on: byte, to: target });
        }
    }

    debug!("subset construction produced {} states over an alphabet of {} bytes", nodes.len(), alphabet.len());

    Some(Automaton::from_nodes(nodes, 0))
}

#[cfg(test)]
mod tests {
    use super::determinize;
    use crate::automaton::machine::{Automaton, Transition};

    #[test]
    fn merges_duplicate_byte_transitions() {
        // nondeterminism on a byte: 0 --a--> 1(accepting), 0 --a--> 2, 2 --b--> 1
        let mut nfa = Automaton::empty(3);
        nfa.node_mut(0).transitions.push(Transition::Byte { on: b'a', to: 1 });
        nfa.node_mut(0).transitions.push(Transition::Byte { on: b'a', to: 2 });
        nfa.node_mut(1).accepting = true;
        nfa.node_mut(2).transitions.push(Transition::Byte { on: b'b', to: 1 });

        let dfa = determinize(&nfa).unwrap();
        assert!(dfa.is_deterministic());

        assert!(dfa.accept(b"a"));
        assert!(dfa.accept(b"ab"));
        assert!(!dfa.accept(b""));
        assert!(!dfa.accept(b"b"));
        assert!(!dfa.accept(b"aa"));
        assert!(!dfa.accept(b"abb"));
    }

    #[test]
    fn numbers_states_in_discovery_order() {
        let mut nfa = Automaton::empty(3);
        nfa.node_mut(0).transitions.push(Transition::Byte { on: b'a', to: 1 });
        nfa.node_mut(1).transitions.push(Transition::Byte { on: b'b', to: 2 });
        nfa.node_mut(2).accepting = true;

        let dfa = determinize(&nfa).unwrap();

        assert_eq!(dfa.start(), 0);
        assert_eq!(dfa.node_count(), 3);
        assert_eq!(dfa.node(0).transitions, vec![Transition::Byte { on: b'a', to: 1 }]);
        assert_eq!(dfa.node(1).transitions, vec![Transition::Byte { on: b'b', to: 2 }]);
        assert!(dfa.node(2).accepting);
    }

    #[test]
    fn empty_automaton_produces_nothing() {
        let nfa = Automaton::empty(0);
        assert!(determinize(&nfa).is_none());
    }

    #[test]
    fn irrelevant_start_closure_produces_nothing() {
        // the start only reaches epsilon-only, non-accepting nodes
        let mut nfa = Automaton::empty(2);
        nfa.node_mut(0).transitions.push(Transition::Epsilon { to: 1 });

        assert!(determinize(&nfa).is_none());
    }
}
