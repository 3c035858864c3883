use wasm_bindgen_test::*;

use friday_wasm::{gate_decision, should_search};

#[wasm_bindgen_test]
fn search_needs_two_characters() {
    #[cfg(target_arch = "wasm32")]
    friday_wasm::start();

    assert!(!should_search("S", 2));
    assert!(!should_search("  S  ", 2));
    assert!(should_search("Se", 2));
    assert!(!should_search("Sea", 4));
}

#[wasm_bindgen_test]
fn gate_decision_strings() {
    assert_eq!(gate_decision(true, true), "suspended");
    assert_eq!(gate_decision(true, false), "suspended");
    assert_eq!(gate_decision(false, true), "proceed");
    assert_eq!(gate_decision(false, false), "redirect");
}
