use crate::automaton::machine::{Automaton, Node, Transition};
use crate::automaton::reduce::reduce;

pub mod machine;
pub mod reduce;
pub mod subset;
pub mod table;

/// Thompson-style constructors for nondeterministic finite automata.
///
/// Expressions are built by composing the three operators over single-byte
/// atoms. Every constructor deep-copies its inputs, so callers keep ownership
/// and may reuse them; every composite re-establishes the canonical shape
/// (exactly one accepting state, distinct from the start) on its inputs with
/// an internal encapsulation step before wiring them together, and runs the
/// reduction pass on the result to contain the size growth of nested
/// compositions.

/// create an automaton accepting exactly the given byte
pub fn atom(byte: u8) -> Automaton {
    let mut automaton = Automaton::empty(2);
    automaton.node_mut(0).transitions.push(Transition::Byte { on: byte, to: 1 });
    automaton.node_mut(1).accepting = true;

    automaton
}

/// Rebuilds an automaton into canonical shape: one fresh accepting state is
/// appended and every formerly accepting node loses its flag in favor of an
/// epsilon transition to the new state. The new state is appended even when
/// the input has no accepting node at all.
fn encapsulate(mut automaton: Automaton) -> Automaton {
    let end = automaton.node_count();

    for id in 0..end {
        let node = automaton.node_mut(id);
        if node.accepting {
            node.accepting = false;
            node.transitions.push(Transition::Epsilon { to: end });
        }
    }

    let mut accept = Node::new(end);
    accept.accepting = true;
    automaton.push_node(accept);

    automaton
}

/// Creates an automaton accepting the union of the two input languages.
///
/// Passing the exact same automaton object on both sides short-circuits to a
/// plain copy of it; two equal but distinct automata take the full path.
pub fn alternation(first: &Automaton, second: &Automaton) -> Automaton {
    if std::ptr::eq(first, second) {
        return first.clone();
    }

    let first = encapsulate(first.clone());
    let second = encapsulate(second.clone());

    // fresh start and accept sandwich the two shifted operands
    let first_offset = 1;
    let second_offset = 1 + first.node_count();
    let size = 2 + first.node_count() + second.node_count();
    let accept = size - 1;

    let mut automaton = Automaton::empty(size);
    automaton.splice(&first, first_offset);
    automaton.splice(&second, second_offset);

    let start = automaton.node_mut(0);
    start.transitions.push(Transition::Epsilon { to: first_offset + first.start() });
    start.transitions.push(Transition::Epsilon { to: second_offset + second.start() });

    // retire both operand accepts in favor of the fresh accepting state
    let first_accept = first_offset + first.node_count() - 1;
    let second_accept = second_offset + second.node_count() - 1;
    for &id in &[first_accept, second_accept] {
        let node = automaton.node_mut(id);
        node.accepting = false;
        node.transitions.push(Transition::Epsilon { to: accept });
    }
    automaton.node_mut(accept).accepting = true;

    reduce(&automaton)
}

/// Creates an automaton accepting the concatenation of the two input
/// languages, first operand first.
pub fn concatenation(first: &Automaton, second: &Automaton) -> Automaton {
    let first = encapsulate(first.clone());
    let second = encapsulate(second.clone());

    let offset = first.node_count();
    let mut automaton = Automaton::empty(offset + second.node_count());
    automaton.splice(&first, 0);
    automaton.splice(&second, offset);
    automaton.set_start(first.start());

    // bridge the first operand's accept into the second operand's start; the
    // second operand keeps the overall accept
    let bridge = automaton.node_mut(offset - 1);
    bridge.accepting = false;
    bridge.transitions.push(Transition::Epsilon { to: offset + second.start() });

    reduce(&automaton)
}

/// Creates an automaton accepting zero or more concatenations of the input
/// language.
pub fn iteration(inner: &Automaton) -> Automaton {
    let inner = encapsulate(inner.clone());

    let size = inner.node_count() + 1;
    let old_accept = size - 2;
    let accept = size - 1;

    let mut automaton = Automaton::empty(size);
    automaton.splice(&inner, 0);
    automaton.set_start(inner.start());

    // zero-iteration path straight from the start
    let start = automaton.start();
    automaton.node_mut(start).transitions.push(Transition::Epsilon { to: accept });

    // the retired accept either loops back for another round or exits forward
    let node = automaton.node_mut(old_accept);
    node.accepting = false;
    node.transitions.push(Transition::Epsilon { to: start });
    node.transitions.push(Transition::Epsilon { to: accept });

    automaton.node_mut(accept).accepting = true;

    reduce(&automaton)
}
