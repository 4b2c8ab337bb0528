//! Tests for binary serialization of `Runner` with postcard: a parsed
//! program can be cached and reloaded without re-parsing.

use pretty_assertions::assert_eq;
use pyth::{CollectStringPrint, Runner};

fn run_to_string(runner: &Runner) -> String {
    let mut print = CollectStringPrint::new();
    runner.run("", &mut print).unwrap();
    print.into_output()
}

#[test]
fn dump_load_simple() {
    let runner = Runner::new(b"+3 5").unwrap();
    let bytes = runner.dump().unwrap();
    let loaded = Runner::load(&bytes).unwrap();
    assert_eq!(run_to_string(&loaded), "8\n");
}

#[test]
fn dump_load_preserves_blocks_and_inits() {
    for source in ["L*5a2L50", "F9Iqa5BE1", "m5mab", "T19.3", ".\"test\""] {
        let runner = Runner::new(source.as_bytes()).unwrap();
        let direct = run_to_string(&runner);
        let loaded = Runner::load(&runner.dump().unwrap()).unwrap();
        assert_eq!(run_to_string(&loaded), direct, "source: {source:?}");
    }
}

#[test]
fn dump_load_keeps_the_preprocessed_source() {
    let runner = Runner::new(b"  +3 5 ; add").unwrap();
    let loaded = Runner::load(&runner.dump().unwrap()).unwrap();
    assert_eq!(loaded.preprocessed_source(), "+3 5");
    assert_eq!(runner.program_dump(), loaded.program_dump());
}
