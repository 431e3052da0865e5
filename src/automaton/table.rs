use log::error;

use crate::automaton::machine::{Automaton, Transition};
use crate::util::types::StateId;

/// Flat transition matrix of a deterministic automaton.
///
/// Rows are states, columns the distinct transition bytes in order of first
/// appearance; an empty cell means there is no move and the input is rejected
/// on the spot.
#[derive(Clone, Debug)]
pub(crate) struct LookupTable {
    columns: Vec<u8>,
    cells: Vec<Option<StateId>>,
}

impl LookupTable {
    /// builds the matrix from the automaton's transition lists
    pub(crate) fn build(automaton: &Automaton) -> Self {
        let mut columns: Vec<u8> = Vec::new();
        for node in automaton.nodes() {
            for transition in &node.transitions {
                if let Transition::Byte { on, .. } = *transition {
                    if !columns.contains(&on) {
                        columns.push(on);
                    }
                }
            }
        }

        let width = columns.len();
        let mut cells: Vec<Option<StateId>> = vec![None; automaton.node_count() * width];
        for node in automaton.nodes() {
            for transition in &node.transitions {
                if let Transition::Byte { on, to } = *transition {
                    if let Some(column) = columns.iter().position(|candidate| *candidate == on) {
                        cells[node.id * width + column] = Some(to);
                    }
                }
            }
        }

        Self { columns, cells }
    }

    /// column of the given byte, if the byte occurs in the automaton at all
    fn column(&self, byte: u8) -> Option<usize> {
        self.columns.iter().position(|candidate| *candidate == byte)
    }

    fn cell(&self, state: StateId, column: usize) -> Option<StateId> {
        self.cells[state * self.columns.len() + column]
    }
}

impl Automaton {
    /// Runs the deterministic automaton over the whole input and reports
    /// whether the input is accepted. The first execution materializes the
    /// lookup table; afterwards every step is a plain table probe, and a byte
    /// without a column or a landing on an empty cell rejects immediately.
    ///
    /// Calling this on a nondeterministic automaton is a programming error;
    /// it is reported on the error log and the input is rejected.
    pub fn accept(&self, input: &[u8]) -> bool {
        if !self.is_deterministic() {
            error!("cannot execute a nondeterministic automaton, rejecting the input");
            return false;
        }
        if self.is_empty() {
            return false;
        }

        let table = self.table.get_or_init(|| LookupTable::build(self));

        let mut state = self.start();
        for byte in input {
            let column = match table.column(*byte) {
                Some(column) => column,
                None => return false,
            };
            match table.cell(state, column) {
                Some(target) => state = target,
                None => return false,
            }
        }

        self.node(state).accepting
    }
}
