//! Deterministic concrete-state evaluation: guard checking, effect
//! application, view selection, and observable rendering.
//!
//! This is the single simulation core shared by the machine builder (to
//! explore the state space) and the assertion planner (as the test oracle).
//! Everything here is pure: a pre-state and an action map to exactly one
//! post-state, with no ambient inputs.

use crate::model::{
    Action, BehavioralModel, Comparison, EffectOp, EntrySource, Guard, ItemPart, Observable,
    TextPart, Value, ViewBranch, ViewPredicate,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A concrete assignment of values to every declared state variable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConcreteState(BTreeMap<String, Value>);

impl ConcreteState {
    /// The initial state of a model.
    pub fn initial(model: &BehavioralModel) -> Self {
        Self(
            model
                .variables
                .iter()
                .map(|v| (v.name.clone(), v.initial.clone()))
                .collect(),
        )
    }

    /// Value of a variable. Missing names resolve to empty text; validation
    /// rules out dangling references before evaluation starts.
    pub fn get(&self, name: &str) -> Value {
        self.0
            .get(name)
            .cloned()
            .unwrap_or(Value::Text(String::new()))
    }

    /// Set a variable.
    pub fn set(&mut self, name: &str, value: Value) {
        self.0.insert(name.to_string(), value);
    }

    fn int(&self, name: &str) -> i64 {
        self.get(name).as_int().unwrap_or_default()
    }

    fn text(&self, name: &str) -> String {
        match self.get(name) {
            Value::Text(s) => s,
            Value::Int(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::List(_) => String::new(),
        }
    }
}

/// Outcome of applying one action to one concrete state.
#[derive(Debug, Clone)]
pub struct Application {
    /// Post-state
    pub state: ConcreteState,
    /// Whether the guard held (the action had effect)
    pub effective: bool,
    /// Comparison outcome, when the action carries one and the guard held
    pub matched: Option<bool>,
}

/// Whether a guard holds in a state.
pub fn guard_holds(state: &ConcreteState, guard: &Guard) -> bool {
    match guard {
        Guard::Always => true,
        Guard::NonEmptyTrimmed { var } => !state.text(var).trim().is_empty(),
        Guard::AllNonEmptyTrimmed { vars } => {
            vars.iter().all(|v| !state.text(v).trim().is_empty())
        }
    }
}

/// Evaluate a comparison in a state. A missing table cell never matches.
pub fn comparison_matches(model: &BehavioralModel, state: &ConcreteState, cmp: &Comparison) -> bool {
    let Some(table) = model.table(&cmp.table) else {
        return false;
    };
    let row = state.int(&cmp.index_var);
    let Some(expected) = table.cell(row, &cmp.column) else {
        return false;
    };
    cmp.normalize.apply(&state.text(&cmp.var)) == cmp.normalize.apply(expected)
}

/// Apply an action, optionally supplying an input value for the action's
/// input variable. The input write happens before the guard is evaluated,
/// exactly as typing precedes clicking in the component.
pub fn apply_action(
    model: &BehavioralModel,
    state: &ConcreteState,
    action: &Action,
    input: Option<&str>,
) -> Application {
    let mut next = state.clone();
    if let (Some(var), Some(value)) = (&action.input, input) {
        next.set(var, Value::Text(value.to_string()));
    }

    let effective = guard_holds(&next, &action.guard);
    if !effective {
        return Application {
            state: next,
            effective: false,
            matched: None,
        };
    }

    let matched = action
        .comparison
        .as_ref()
        .map(|cmp| comparison_matches(model, &next, cmp));

    for effect in &action.effects {
        apply_effect(model, &mut next, effect, input, matched);
    }

    Application {
        state: next,
        effective: true,
        matched,
    }
}

fn apply_effect(
    model: &BehavioralModel,
    state: &mut ConcreteState,
    effect: &EffectOp,
    input: Option<&str>,
    matched: Option<bool>,
) {
    match effect {
        EffectOp::SetFromInput { var } => {
            state.set(var, Value::Text(input.unwrap_or_default().to_string()));
        }
        EffectOp::Clear { var } => state.set(var, Value::Text(String::new())),
        EffectOp::SetBool { var, value } => state.set(var, Value::Bool(*value)),
        EffectOp::Add { var, delta } => {
            let next = state.int(var) + delta;
            state.set(var, Value::Int(next));
        }
        EffectOp::AddClamped {
            var,
            delta,
            min,
            max,
        } => {
            let next = (state.int(var) + delta).clamp(*min, *max);
            state.set(var, Value::Int(next));
        }
        EffectOp::AddOnMatch { var, delta } => {
            if matched == Some(true) {
                let next = state.int(var) + delta;
                state.set(var, Value::Int(next));
            }
        }
        EffectOp::Append { collection, entry } => {
            let mut record = BTreeMap::new();
            for field in entry {
                let value = match &field.source {
                    EntrySource::TableCell {
                        table,
                        index_var,
                        column,
                    } => {
                        let cell = model
                            .table(table)
                            .and_then(|t| t.cell(state.int(index_var), column))
                            .unwrap_or_default();
                        Value::Text(cell.to_string())
                    }
                    EntrySource::MatchFlag => Value::Bool(matched.unwrap_or(false)),
                    EntrySource::Var { var } => state.get(var),
                    EntrySource::Literal { text } => Value::Text(text.clone()),
                };
                record.insert(field.field.clone(), value);
            }
            let mut list = match state.get(collection) {
                Value::List(items) => items,
                _ => Vec::new(),
            };
            list.push(record);
            state.set(collection, Value::List(list));
        }
    }
}

/// Whether a view predicate holds in a state.
pub fn predicate_holds(
    model: &BehavioralModel,
    state: &ConcreteState,
    predicate: &ViewPredicate,
) -> bool {
    match predicate {
        ViewPredicate::IndexWithinTable { var, table } => {
            let len = model.table(table).map(|t| t.len() as i64).unwrap_or(0);
            state.int(var) < len
        }
        ViewPredicate::Flag { var, expected } => {
            state.get(var).as_bool().unwrap_or(false) == *expected
        }
        ViewPredicate::Otherwise => true,
    }
}

/// The active view branch: first branch whose predicate holds, in
/// declaration order.
pub fn active_branch<'a>(
    model: &'a BehavioralModel,
    state: &ConcreteState,
) -> Option<&'a ViewBranch> {
    model
        .views
        .iter()
        .find(|v| predicate_holds(model, state, &v.when))
}

/// Actions enabled in a state: those whose trigger is rendered by the
/// active branch, in model declaration order. A state with no enabled
/// actions is terminal.
pub fn enabled_actions<'a>(model: &'a BehavioralModel, state: &ConcreteState) -> Vec<&'a Action> {
    let Some(branch) = active_branch(model, state) else {
        return Vec::new();
    };
    model
        .actions
        .iter()
        .filter(|a| a.branch == branch.name)
        .collect()
}

/// One rendered item of a collection observable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedItem {
    /// Rendered label text
    pub text: String,
    /// Derived style, when the item template carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

/// The computed value of one observable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "observed", rename_all = "snake_case")]
pub enum Observed {
    /// Visible text
    Text {
        /// Rendered text
        text: String,
    },
    /// An input field's current value
    Field {
        /// Current value
        value: String,
    },
    /// A numeric readout
    Number {
        /// Current value
        value: i64,
    },
    /// A rendered collection
    Items {
        /// Rendered items in insertion order
        items: Vec<ObservedItem>,
    },
}

/// One observable paired with its computed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Assertion target label
    pub target: String,
    /// Computed value
    pub observed: Observed,
}

/// Render every observable of the active branch. Returns the branch name
/// and the observations in declaration order; `None` when no branch matches.
pub fn observe(
    model: &BehavioralModel,
    state: &ConcreteState,
) -> Option<(String, Vec<Observation>)> {
    let branch = active_branch(model, state)?;
    let observations = branch
        .observables
        .iter()
        .map(|obs| Observation {
            target: obs.target().to_string(),
            observed: render_observable(model, state, obs),
        })
        .collect();
    Some((branch.name.clone(), observations))
}

fn render_observable(model: &BehavioralModel, state: &ConcreteState, obs: &Observable) -> Observed {
    match obs {
        Observable::Literal { text, .. } => Observed::Text { text: text.clone() },
        Observable::Template { parts, .. } => Observed::Text {
            text: render_parts(model, state, parts),
        },
        Observable::TableCell {
            table,
            index_var,
            column,
            ..
        } => {
            let cell = model
                .table(table)
                .and_then(|t| t.cell(state.int(index_var), column))
                .unwrap_or_default();
            Observed::Text {
                text: cell.to_string(),
            }
        }
        Observable::FieldValue { var, .. } => Observed::Field {
            value: state.text(var),
        },
        Observable::VarValue { var, .. } => match state.get(var) {
            Value::Int(n) => Observed::Number { value: n },
            other => Observed::Text {
                text: match other {
                    Value::Text(s) => s,
                    Value::Bool(b) => b.to_string(),
                    Value::List(_) | Value::Int(_) => String::new(),
                },
            },
        },
        Observable::CollectionList { var, item, .. } => {
            let items = match state.get(var) {
                Value::List(records) => records
                    .iter()
                    .map(|record| {
                        let text = item
                            .parts
                            .iter()
                            .map(|part| match part {
                                ItemPart::Field { field } => match record.get(field) {
                                    Some(Value::Text(s)) => s.clone(),
                                    Some(Value::Int(n)) => n.to_string(),
                                    Some(Value::Bool(b)) => b.to_string(),
                                    _ => String::new(),
                                },
                                ItemPart::Lit { text } => text.clone(),
                                ItemPart::FlagGlyph {
                                    field,
                                    when_true,
                                    when_false,
                                } => {
                                    let flag = record
                                        .get(field)
                                        .and_then(Value::as_bool)
                                        .unwrap_or(false);
                                    if flag {
                                        when_true.clone()
                                    } else {
                                        when_false.clone()
                                    }
                                }
                            })
                            .collect::<String>();
                        let style = item.style.as_ref().map(|s| {
                            let flag = record
                                .get(&s.field)
                                .and_then(Value::as_bool)
                                .unwrap_or(false);
                            if flag {
                                s.when_true.clone()
                            } else {
                                s.when_false.clone()
                            }
                        });
                        ObservedItem { text, style }
                    })
                    .collect(),
                _ => Vec::new(),
            };
            Observed::Items { items }
        }
    }
}

fn render_parts(model: &BehavioralModel, state: &ConcreteState, parts: &[TextPart]) -> String {
    parts
        .iter()
        .map(|part| match part {
            TextPart::Lit { text } => text.clone(),
            TextPart::Var { var } => state.text(var),
            TextPart::TableLen { table } => model
                .table(table)
                .map(|t| t.len().to_string())
                .unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_initial_state_matches_declarations() {
        let model = fixtures::quiz_model();
        let state = ConcreteState::initial(&model);
        assert_eq!(state.get("index"), Value::Int(0));
        assert_eq!(state.get("answer"), Value::Text(String::new()));
        assert_eq!(state.get("history"), Value::List(Vec::new()));
    }

    #[test]
    fn test_correct_submit_advances_and_scores() {
        let model = fixtures::quiz_model();
        let state = ConcreteState::initial(&model);
        let action = model.action("submitAnswer").unwrap();

        let out = apply_action(&model, &state, action, Some("Paris"));
        assert!(out.effective);
        assert_eq!(out.matched, Some(true));
        assert_eq!(out.state.get("index"), Value::Int(1));
        assert_eq!(out.state.get("score"), Value::Int(1));
        assert_eq!(out.state.get("answer"), Value::Text(String::new()));
        match out.state.get("history") {
            Value::List(items) => {
                assert_eq!(items.len(), 1);
                assert_eq!(
                    items[0].get("question"),
                    Some(&Value::Text("Capital of France?".into()))
                );
                assert_eq!(items[0].get("correct"), Some(&Value::Bool(true)));
            }
            other => panic!("expected history list, got {other:?}"),
        }
    }

    #[test]
    fn test_case_and_whitespace_variant_still_matches() {
        let model = fixtures::quiz_model();
        let state = ConcreteState::initial(&model);
        let action = model.action("submitAnswer").unwrap();

        let out = apply_action(&model, &state, action, Some("  pArIs  "));
        assert_eq!(out.matched, Some(true));
        assert_eq!(out.state.get("score"), Value::Int(1));
    }

    #[test]
    fn test_incorrect_submit_advances_without_scoring() {
        let model = fixtures::quiz_model();
        let state = ConcreteState::initial(&model);
        let action = model.action("submitAnswer").unwrap();

        let out = apply_action(&model, &state, action, Some("London"));
        assert!(out.effective);
        assert_eq!(out.matched, Some(false));
        assert_eq!(out.state.get("index"), Value::Int(1));
        assert_eq!(out.state.get("score"), Value::Int(0));
    }

    #[test]
    fn test_whitespace_submit_is_guarded_noop_but_keeps_typed_text() {
        let model = fixtures::quiz_model();
        let state = ConcreteState::initial(&model);
        let action = model.action("submitAnswer").unwrap();

        let out = apply_action(&model, &state, action, Some("   "));
        assert!(!out.effective);
        assert_eq!(out.state.get("index"), Value::Int(0));
        // The field keeps what was typed, the guard only blocked the effects
        assert_eq!(out.state.get("answer"), Value::Text("   ".into()));
    }

    #[test]
    fn test_clamp_saturates_at_bounds() {
        let model = fixtures::counter_model();
        let up = model.action("count-up").unwrap();
        let down = model.action("count-down").unwrap();

        let mut state = ConcreteState::initial(&model);
        let mut seen = Vec::new();
        for _ in 0..6 {
            state = apply_action(&model, &state, up, None).state;
            seen.push(state.get("count").as_int().unwrap());
        }
        assert_eq!(seen, vec![4, 5, 5, 5, 5, 5]);

        for _ in 0..6 {
            state = apply_action(&model, &state, down, None).state;
        }
        assert_eq!(state.get("count"), Value::Int(1));
    }

    #[test]
    fn test_survey_gating_requires_all_fields() {
        let model = fixtures::survey_model();
        let submit = model.action("handleSubmit").unwrap();
        let mut state = ConcreteState::initial(&model);

        let out = apply_action(&model, &state, submit, None);
        assert!(!out.effective);

        state = apply_action(&model, &state, model.action("set-name").unwrap(), Some("Ada"))
            .state;
        state = apply_action(&model, &state, model.action("set-age").unwrap(), Some("36")).state;
        let out = apply_action(&model, &state, submit, None);
        assert!(!out.effective, "feedback still missing");

        state = apply_action(
            &model,
            &state,
            model.action("set-feedback").unwrap(),
            Some("Nice"),
        )
        .state;
        let out = apply_action(&model, &state, submit, None);
        assert!(out.effective);
        assert_eq!(out.state.get("submitted"), Value::Bool(true));
    }

    #[test]
    fn test_view_selection_first_match_wins() {
        let model = fixtures::quiz_model();
        let mut state = ConcreteState::initial(&model);
        assert_eq!(active_branch(&model, &state).unwrap().name, "questions");

        state.set("index", Value::Int(3));
        assert_eq!(active_branch(&model, &state).unwrap().name, "otherwise");
    }

    #[test]
    fn test_terminal_state_has_no_enabled_actions() {
        let model = fixtures::quiz_model();
        let mut state = ConcreteState::initial(&model);
        assert_eq!(enabled_actions(&model, &state).len(), 1);

        state.set("index", Value::Int(3));
        assert!(enabled_actions(&model, &state).is_empty());
    }

    #[test]
    fn test_observe_renders_summary_branch() {
        let model = fixtures::quiz_model();
        let action = model.action("submitAnswer").unwrap();
        let mut state = ConcreteState::initial(&model);
        for input in ["Paris", "5", "Pacific"] {
            state = apply_action(&model, &state, action, Some(input)).state;
        }

        let (branch, observations) = observe(&model, &state).unwrap();
        assert_eq!(branch, "otherwise");

        let score = observations
            .iter()
            .find(|o| o.target == "template.score")
            .unwrap();
        assert_eq!(
            score.observed,
            Observed::Text {
                text: "Score: 2 / 3".into()
            }
        );

        let history = observations
            .iter()
            .find(|o| o.target == "list.history")
            .unwrap();
        match &history.observed {
            Observed::Items { items } => {
                assert_eq!(items.len(), 3);
                assert_eq!(items[0].text, "Capital of France? — ✅");
                assert_eq!(items[0].style.as_deref(), Some("green"));
                assert_eq!(items[1].text, "2 + 2 * 2? — ❌");
                assert_eq!(items[1].style.as_deref(), Some("red"));
                assert_eq!(items[2].text, "Largest ocean? — ✅");
            }
            other => panic!("expected items, got {other:?}"),
        }
    }
}
