pub use self::automaton::machine::{Automaton, Node, Transition};
pub use self::automaton::reduce::reduce;
pub use self::automaton::subset::determinize;
pub use self::automaton::{alternation, atom, concatenation, iteration};

pub mod automaton;
pub mod util;
