//! Property-based tests over the evaluation core and machine invariants.

use proptest::prelude::*;
use trazar::eval::{apply_action, ConcreteState};
use trazar::fixtures;
use trazar::model::Value;
use trazar::MachineBuilder;

proptest! {
    /// Clamped counters saturate: no step sequence escapes the bounds.
    #[test]
    fn counter_never_leaves_bounds(steps in proptest::collection::vec(any::<bool>(), 0..64)) {
        let model = fixtures::counter_model();
        let up = model.action("count-up").unwrap();
        let down = model.action("count-down").unwrap();

        let mut state = ConcreteState::initial(&model);
        for step_up in steps {
            let action = if step_up { up } else { down };
            state = apply_action(&model, &state, action, None).state;
            let count = state.get("count").as_int().unwrap();
            prop_assert!((1..=5).contains(&count), "count {count} escaped [1, 5]");
        }
    }

    /// Quiz re-simulation keeps its invariants for arbitrary input text:
    /// the index never passes the table length and the score never exceeds
    /// the number of answered questions.
    #[test]
    fn quiz_invariants_hold_for_arbitrary_inputs(
        inputs in proptest::collection::vec(".{0,12}", 0..8)
    ) {
        let model = fixtures::quiz_model();
        let submit = model.action("submitAnswer").unwrap();

        let mut state = ConcreteState::initial(&model);
        for input in &inputs {
            let enabled = trazar::eval::enabled_actions(&model, &state);
            if enabled.is_empty() {
                break;
            }
            state = apply_action(&model, &state, submit, Some(input)).state;

            let index = state.get("index").as_int().unwrap();
            let score = state.get("score").as_int().unwrap();
            prop_assert!((0..=3).contains(&index));
            prop_assert!(score >= 0 && score <= index);
            match state.get("history") {
                Value::List(items) => prop_assert_eq!(items.len() as i64, index),
                other => prop_assert!(false, "history is not a list: {:?}", other),
            }
        }
    }

    /// Guarded submits are no-ops for whitespace-only input.
    #[test]
    fn whitespace_submit_never_advances(padding in " {0,6}") {
        let model = fixtures::quiz_model();
        let submit = model.action("submitAnswer").unwrap();
        let state = ConcreteState::initial(&model);

        let out = apply_action(&model, &state, submit, Some(&padding));
        prop_assert!(!out.effective);
        prop_assert_eq!(out.state.get("index"), Value::Int(0));
        prop_assert_eq!(out.state.get("score"), Value::Int(0));
    }
}

#[test]
fn machine_invariants_hold_for_all_fixture_models() {
    for model in [
        fixtures::quiz_model(),
        fixtures::survey_model(),
        fixtures::counter_model(),
    ] {
        let fsm = MachineBuilder::new(&model).build().expect("build");

        assert!(
            fsm.orphans().is_empty(),
            "orphaned states in {}",
            model.component
        );
        for t in &fsm.transitions {
            assert!(t.from < fsm.states.len() && t.to < fsm.states.len());
        }
    }

    // Forward-only models additionally never re-enter the initial class
    for model in [fixtures::quiz_model(), fixtures::counter_model()] {
        let fsm = MachineBuilder::new(&model).build().expect("build");
        assert_eq!(
            fsm.in_degree(0),
            0,
            "initial state of {} has incoming edges from other states",
            model.component
        );
    }
}
