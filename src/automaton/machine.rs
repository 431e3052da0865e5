use std::fmt;

use itertools::Itertools;
use once_cell::unsync::OnceCell;

use crate::automaton::table::LookupTable;
use crate::util::types::StateId;

/// A single outgoing edge of an automaton node.
///
/// Epsilon transitions consume no input; byte transitions consume exactly one
/// input byte equal to the stored literal. The tag makes it impossible to read
/// a condition byte off an epsilon transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Epsilon { to: StateId },
    Byte { on: u8, to: StateId },
}

impl Transition {
    /// destination node of the transition
    pub fn to(&self) -> StateId {
        match *self {
            Transition::Epsilon { to } => to,
            Transition::Byte { to, .. } => to,
        }
    }

    /// returns true if the transition consumes no input
    pub fn is_epsilon(&self) -> bool {
        match self {
            Transition::Epsilon { .. } => true,
            Transition::Byte { .. } => false,
        }
    }

    /// same transition with the destination moved up by `offset`
    pub(crate) fn shifted(&self, offset: usize) -> Transition {
        match *self {
            Transition::Epsilon { to } => Transition::Epsilon { to: to + offset },
            Transition::Byte { on, to } => Transition::Byte { on, to: to + offset },
        }
    }

    /// point the transition at a new destination, keeping its condition
    pub(crate) fn redirect(&mut self, target: StateId) {
        match self {
            Transition::Epsilon { to } => *to = target,
            Transition::Byte { to, .. } => *to = target,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Transition::Epsilon { to } => write!(f, "<eps, {:2}>", to),
            Transition::Byte { on, to } => write!(f, "<'{}', {:2}>", on as char, to),
        }
    }
}

/// An automaton node: identifier, accepting flag and the ordered list of
/// outgoing transitions. Transition order is insertion order and every
/// transformation preserves it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub id: StateId,
    pub accepting: bool,
    pub transitions: Vec<Transition>,
}

impl Node {
    pub(crate) fn new(id: StateId) -> Self {
        Self { id, accepting: false, transitions: Vec::new() }
    }

    /// deep copy of the node moved up by `offset`, destinations included
    pub(crate) fn shifted(&self, offset: usize) -> Node {
        Node {
            id: self.id + offset,
            accepting: self.accepting,
            transitions: self.transitions.iter().map(|transition| transition.shifted(offset)).collect(),
        }
    }
}

/// A finite automaton over byte input.
///
/// Nodes are identified by dense ids `[0, node_count)` that index the node
/// table directly. The same value type covers nondeterministic and
/// deterministic machines; `is_deterministic` tells them apart. Deterministic
/// automata materialize a flat lookup table on the first call to `accept`.
#[derive(Debug)]
pub struct Automaton {
    nodes: Vec<Node>,
    start: StateId,
    pub(crate) table: OnceCell<LookupTable>,
}

impl Clone for Automaton {
    /// Deep copy: the clone owns fresh nodes and transitions and starts with
    /// an empty lookup-table cache, so no later use of either automaton can
    /// observe the other.
    fn clone(&self) -> Self {
        Self { nodes: self.nodes.clone(), start: self.start, table: OnceCell::new() }
    }
}

impl Automaton {
    /// an automaton of `size` unconnected, non-accepting nodes starting at 0
    pub(crate) fn empty(size: usize) -> Self {
        Self { nodes: (0..size).map(Node::new).collect(), start: 0, table: OnceCell::new() }
    }

    pub(crate) fn from_nodes(nodes: Vec<Node>, start: StateId) -> Self {
        debug_assert!(nodes.iter().enumerate().all(|(position, node)| node.id == position));
        debug_assert!(nodes.is_empty() || start < nodes.len());
        Self { nodes, start, table: OnceCell::new() }
    }

    /// number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// returns true if the automaton has no nodes at all
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// identifier of the starting state
    pub fn start(&self) -> StateId {
        self.start
    }

    pub(crate) fn set_start(&mut self, id: StateId) {
        debug_assert!(id < self.nodes.len());
        self.start = id;
    }

    /// the node with the given identifier
    pub fn node(&self, id: StateId) -> &Node {
        &self.nodes[id]
    }

    /// all nodes, indexed by identifier
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub(crate) fn node_mut(&mut self, id: StateId) -> &mut Node {
        &mut self.nodes[id]
    }

    pub(crate) fn push_node(&mut self, node: Node) {
        debug_assert_eq!(node.id, self.nodes.len());
        self.nodes.push(node);
    }

    /// Copies all nodes of `source` into this automaton starting at `offset`.
    /// The copy is deep and transition destinations move up by the same
    /// offset, so the spliced region is self-contained.
    pub(crate) fn splice(&mut self, source: &Automaton, offset: usize) {
        assert!(
            source.node_count() + offset <= self.node_count(),
            "cannot splice {} nodes at offset {} into an automaton of {} nodes",
            source.node_count(),
            offset,
            self.node_count()
        );

        for node in source.nodes() {
            self.nodes[node.id + offset] = node.shifted(offset);
        }
    }

    /// Returns true iff the automaton is deterministic, i.e. none of its
    /// transitions is an epsilon transition.
    pub fn is_deterministic(&self) -> bool {
        self.nodes
            .iter()
            .all(|node| node.transitions.iter().all(|transition| !transition.is_epsilon()))
    }
}

impl fmt::Display for Automaton {
    /// human-readable listing of all nodes and transitions; the exact format
    /// is observational and not part of any contract
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = if self.is_deterministic() { "Deterministic" } else { "Nondeterministic" };
        writeln!(f, "Finite Automaton ({}) of size {}:", kind, self.node_count())?;
        writeln!(f, "{}", "-".repeat(80))?;

        for node in &self.nodes {
            let flag = if node.accepting { "Y" } else { "N" };
            write!(f, "|Node: {:2}|Ending State: {}|Transitions: {:2}", node.id, flag, node.transitions.len())?;
            if !node.transitions.is_empty() {
                write!(f, " {}", node.transitions.iter().join(" "))?;
            }
            writeln!(f)?;
        }

        write!(f, "{}", "-".repeat(80))
    }
}
