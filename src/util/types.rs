/// custom type definitions
/// Identifier of an automaton node. Identifiers are dense in `[0, node_count)`
/// within a single automaton and index its node table directly.
pub type StateId = usize;
