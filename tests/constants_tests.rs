// Host-side checks that DOM selectors agree with the attributes they target.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
fn selectors_match_attributes() {
    assert_eq!(NO_FLAME_SELECTOR, format!("[{NO_FLAME_ATTR}]"));
    assert_eq!(TYPEWRITER_SELECTOR, format!("[{TYPEWRITER_ATTR}]"));
}

#[test]
fn effect_classes_are_distinct() {
    let classes = [FLAME_CLASS, HEART_CLASS, PEEK_CLASS];
    for (i, a) in classes.iter().enumerate() {
        for b in &classes[i + 1..] {
            assert_ne!(a, b);
        }
    }
    assert!(!DEFAULT_TAGLINE.is_empty());
}
