// crates/friday-core/src/gate.rs
use crate::geo::GeoState;
use serde::Serialize;

/// Derived from the geo state; never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateDecision {
    /// Geo is still resolving: the action is disabled, neither allowed nor denied.
    Suspended,
    /// Recognized region: run the primary action.
    Proceed,
    /// Elsewhere: offer the fallback instead of the primary action.
    Redirect,
}

impl GateDecision {
    pub fn from_flags(is_loading: bool, is_recognized_region: bool) -> Self {
        match (is_loading, is_recognized_region) {
            (true, _) => GateDecision::Suspended,
            (false, true) => GateDecision::Proceed,
            (false, false) => GateDecision::Redirect,
        }
    }

    pub fn from_state(state: &GeoState) -> Self {
        match state.is_recognized_region() {
            None => GateDecision::Suspended,
            Some(true) => GateDecision::Proceed,
            Some(false) => GateDecision::Redirect,
        }
    }

    /// Whether the control should accept input right now.
    pub fn is_action_enabled(self) -> bool {
        self != GateDecision::Suspended
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GateDecision::Suspended => "suspended",
            GateDecision::Proceed => "proceed",
            GateDecision::Redirect => "redirect",
        }
    }
}

/// Result of running an action through the gate.
#[derive(Debug, PartialEq, Eq)]
pub enum GateOutcome<P, F> {
    Suspended,
    Primary(P),
    Fallback(F),
}

/// Wires one action to the region gate. Holds no state of its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormGate {
    decision: GateDecision,
}

impl FormGate {
    pub fn new(state: &GeoState) -> Self {
        Self {
            decision: GateDecision::from_state(state),
        }
    }

    pub fn decision(&self) -> GateDecision {
        self.decision
    }

    /// Runs exactly one of `primary` or `fallback`, or neither while suspended.
    pub fn run<P, F>(
        &self,
        primary: impl FnOnce() -> P,
        fallback: impl FnOnce() -> F,
    ) -> GateOutcome<P, F> {
        match self.decision {
            GateDecision::Suspended => GateOutcome::Suspended,
            GateDecision::Proceed => GateOutcome::Primary(primary()),
            GateDecision::Redirect => GateOutcome::Fallback(fallback()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{GeoPolicy, GeoResolution};
    use std::cell::Cell;

    #[test]
    fn loading_disables_the_action() {
        let gate = FormGate::new(&GeoState::Loading);
        assert!(!gate.decision().is_action_enabled());

        let calls = Cell::new(0);
        let out = gate.run(|| calls.set(calls.get() + 1), || calls.set(calls.get() + 10));
        assert_eq!(out, GateOutcome::Suspended);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn unrecognized_region_swaps_in_fallback() {
        let primary_calls = Cell::new(0);
        let state = GeoState::Resolved(GeoPolicy::default().resolve("Canada", "CA", 0));
        let out = FormGate::new(&state).run(
            || primary_calls.set(primary_calls.get() + 1),
            || "alternate list",
        );
        assert_eq!(out, GateOutcome::Fallback("alternate list"));
        assert_eq!(primary_calls.get(), 0);
    }

    #[test]
    fn recognized_region_runs_primary_once() {
        let state = GeoState::Resolved(GeoResolution::fail_open(0));
        let calls = Cell::new(0);
        let out = FormGate::new(&state).run(
            || {
                calls.set(calls.get() + 1);
                "submitted"
            },
            || calls.set(calls.get() + 10),
        );
        assert_eq!(out, GateOutcome::Primary("submitted"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn flags_table() {
        assert_eq!(GateDecision::from_flags(true, false), GateDecision::Suspended);
        assert_eq!(GateDecision::from_flags(true, true), GateDecision::Suspended);
        assert_eq!(GateDecision::from_flags(false, true), GateDecision::Proceed);
        assert_eq!(GateDecision::from_flags(false, false), GateDecision::Redirect);
    }
}
