use log::debug;

use crate::automaton::machine::{Automaton, Node, Transition};

/// Shrinks an automaton without changing the accepted language.
///
/// One sweep applies two local rewrites: a non-start, non-accepting node
/// whose single outgoing transition is an epsilon is dissolved (all inbound
/// transitions are rerouted to its target), and a non-start, non-accepting
/// node with neither outgoing nor inbound transitions is dropped. Surviving
/// nodes are then compacted into a fresh, densely renumbered automaton.
///
/// This is a best-effort simplifier, not a normalizer: equivalent automata
/// need not reduce to the same shape. It exists to contain the size growth
/// of nested compositions.
pub fn reduce(automaton: &Automaton) -> Automaton {
    let size = automaton.node_count();
    let mut nodes: Vec<Node> = automaton.nodes().to_vec();
    let mut removed = vec![false; size];

    for id in 0..size {
        if id == automaton.start() || nodes[id].accepting {
            continue;
        }

        if nodes[id].transitions.len() == 1 {
            // a lone epsilon makes the node a pure pass-through, except when
            // it loops onto itself
            let target = match nodes[id].transitions[0] {
                Transition::Epsilon { to } if to != id => to,
                _ => continue,
            };

            nodes[id].transitions.clear();
            removed[id] = true;

            // divert every transition that pointed at the dissolved node
            for node in nodes.iter_mut() {
                for transition in node.transitions.iter_mut() {
                    if transition.to() == id {
                        transition.redirect(target);
                    }
                }
            }
        } else if nodes[id].transitions.is_empty() {
            let inbound = nodes
                .iter()
                .any(|node| node.transitions.iter().any(|transition| transition.to() == id));
            if !inbound {
                removed[id] = true;
            }
        }
    }

    // renumbering table from surviving old ids to dense new ids
    let mut new_ids: Vec<Option<usize>> = vec![None; size];
    let mut counter = 0;
    for id in 0..size {
        if !removed[id] {
            new_ids[id] = Some(counter);
            counter += 1;
        }
    }

    let mut compacted: Vec<Node> = Vec::with_capacity(counter);
    for (id, node) in nodes.iter().enumerate() {
        if let Some(new_id) = new_ids[id] {
            compacted.push(Node {
                id: new_id,
                accepting: node.accepting,
                transitions: node
                    .transitions
                    .iter()
                    .filter_map(|transition| {
                        new_ids[transition.to()].map(|target| {
                            let mut remapped = *transition;
                            remapped.redirect(target);
                            remapped
                        })
                    })
                    .collect(),
            });
        }
    }

    let start = new_ids[automaton.start()].expect("the start state survives reduction");
    debug!("reduction kept {} of {} nodes", counter, size);

    Automaton::from_nodes(compacted, start)
}

#[cfg(test)]
mod tests {
    use super::reduce;
    use crate::automaton::machine::{Automaton, Transition};
    use crate::automaton::subset::determinize;

    #[test]
    fn dissolves_epsilon_chain() {
        // 0 --a--> 1 --eps--> 2 --eps--> 3(accepting)
        let mut automaton = Automaton::empty(4);
        automaton.node_mut(0).transitions.push(Transition::Byte { on: b'a', to: 1 });
        automaton.node_mut(1).transitions.push(Transition::Epsilon { to: 2 });
        automaton.node_mut(2).transitions.push(Transition::Epsilon { to: 3 });
        automaton.node_mut(3).accepting = true;

        let reduced = reduce(&automaton);

        assert_eq!(reduced.node_count(), 2);
        assert_eq!(reduced.start(), 0);
        assert_eq!(reduced.node(0).transitions, vec![Transition::Byte { on: b'a', to: 1 }]);
        assert!(reduced.node(1).accepting);
    }

    #[test]
    fn drops_isolated_node() {
        let mut automaton = Automaton::empty(3);
        automaton.node_mut(0).transitions.push(Transition::Byte { on: b'a', to: 1 });
        automaton.node_mut(1).accepting = true;
        // node 2 has no inbound and no outbound transitions

        let reduced = reduce(&automaton);

        assert_eq!(reduced.node_count(), 2);
        assert!(reduced.node(1).accepting);
    }

    #[test]
    fn keeps_the_start_state() {
        // the start qualifies as a pass-through but must never be dissolved
        let mut automaton = Automaton::empty(2);
        automaton.node_mut(0).transitions.push(Transition::Epsilon { to: 1 });
        automaton.node_mut(1).accepting = true;

        let reduced = reduce(&automaton);

        assert_eq!(reduced.node_count(), 2);
        assert_eq!(reduced.start(), 0);
        assert_eq!(reduced.node(0).transitions, vec![Transition::Epsilon { to: 1 }]);
    }

    #[test]
    fn refuses_epsilon_self_loop() {
        let mut automaton = Automaton::empty(3);
        automaton.node_mut(0).transitions.push(Transition::Byte { on: b'a', to: 1 });
        automaton.node_mut(1).transitions.push(Transition::Epsilon { to: 1 });
        automaton.node_mut(2).accepting = true;
        automaton.node_mut(0).transitions.push(Transition::Epsilon { to: 2 });

        let reduced = reduce(&automaton);

        // the self-looping node survives untouched
        assert_eq!(reduced.node_count(), 3);
        assert_eq!(reduced.node(1).transitions, vec![Transition::Epsilon { to: 1 }]);
    }

    #[test]
    fn preserves_the_accepted_language() {
        // epsilon-heavy machine for a*: 0 --eps--> 1, 1 --a--> 2, 2 --eps--> 1,
        // 1 --eps--> 3(accepting)
        let mut automaton = Automaton::empty(4);
        automaton.node_mut(0).transitions.push(Transition::Epsilon { to: 1 });
        automaton.node_mut(1).transitions.push(Transition::Byte { on: b'a', to: 2 });
        automaton.node_mut(1).transitions.push(Transition::Epsilon { to: 3 });
        automaton.node_mut(2).transitions.push(Transition::Epsilon { to: 1 });
        automaton.node_mut(3).accepting = true;

        let reduced = reduce(&automaton);
        assert!(reduced.node_count() <= automaton.node_count());

        let before = determinize(&automaton).unwrap();
        let after = determinize(&reduced).unwrap();
        for input in &["", "a", "aa", "aaaa", "b", "ab", "ba"] {
            assert_eq!(before.accept(input.as_bytes()), after.accept(input.as_bytes()), "input {:?}", input);
        }
    }
}
