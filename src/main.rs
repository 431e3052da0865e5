use thompson_regex::{alternation, atom, concatenation, determinize, iteration};

/// Demonstration driver for the automaton engine. Arguments
/// 1. input string: byte string to match against the demo expression
///    `j*(e| )( (o|o-g))*` (defaults to `jje o-g o o o-g`)
fn main() {
    // initialize env_logger
    env_logger::init();

    let input = std::env::args().nth(1).unwrap_or_else(|| "jje o-g o o o-g".to_string());

    // atoms of the demo expression
    let j = atom(b'j');
    let o = atom(b'o');
    let g = atom(b'g');
    let e = atom(b'e');
    let blank = atom(b' ');
    let dash = atom(b'-');

    let j_repeat = iteration(&j);
    let middle = alternation(&e, &blank);
    let o_dash_g = concatenation(&o, &concatenation(&dash, &g));
    let round = concatenation(&blank, &alternation(&o, &o_dash_g));
    let tail = iteration(&round);

    let nfa = concatenation(&j_repeat, &concatenation(&middle, &tail));
    println!("{}", nfa);

    let dfa = match determinize(&nfa) {
        Some(dfa) => dfa,
        None => {
            eprintln!("no deterministic automaton could be produced");
            std::process::exit(1);
        }
    };
    println!("{}", dfa);

    let verdict = dfa.accept(input.as_bytes());
    println!("String match: {:?} : {}", input, verdict);
}
