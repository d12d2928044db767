//! Assertion planning: re-simulate each scenario against the model's effect
//! functions and attach the expected observables as assertion points.
//!
//! The re-simulation is the test oracle — expectations are computed from the
//! extracted model, never inferred from the component under test. The final
//! test plan carries a SHA-256 digest of its canonical JSON serialization so
//! that reproducibility can be checked the same way replay hashes are.

use crate::eval::{apply_action, observe, ConcreteState, Observed, ObservedItem};
use crate::machine::{CoverageGap, Fsm, InputClass};
use crate::model::{BehavioralModel, Value};
use crate::result::{TrazarError, TrazarResult};
use crate::scenario::{Purpose, Scenario};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The expected outcome attached to one assertion target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Check {
    /// Exact visible-text match
    Text {
        /// Expected text
        expected: String,
    },
    /// Field value or numeric readout equality
    Value {
        /// Expected value
        expected: Value,
    },
    /// Presence or absence of a conditionally rendered branch
    Presence {
        /// Whether the branch must be rendered
        present: bool,
    },
    /// Collection length plus per-element structural equality
    Collection {
        /// Expected element count
        len: usize,
        /// Expected items in insertion order
        items: Vec<ObservedItem>,
    },
}

/// One expected observable at one scenario step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionPoint {
    /// Assertion target label
    pub target: String,
    /// Expected outcome
    #[serde(flatten)]
    pub check: Check,
}

/// One scenario step paired with its expected post-action observables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedStep {
    /// Action name
    pub action: String,
    /// Input class the step was derived from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_class: Option<InputClass>,
    /// Concrete input value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    /// Expected observables after the action
    pub assertions: Vec<AssertionPoint>,
}

/// A fully planned scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedScenario {
    /// Scenario name
    pub name: String,
    /// Coverage purpose
    pub purpose: Purpose,
    /// Steps with assertions
    pub steps: Vec<PlannedStep>,
}

/// Counts summarizing a plan, for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    /// FSM states explored
    pub states: usize,
    /// FSM transitions recorded
    pub transitions: usize,
    /// Scenarios emitted
    pub scenarios: usize,
    /// Total assertion points
    pub assertion_points: usize,
}

/// The complete test plan handed to an external emission layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestPlan {
    /// Component name
    pub component: String,
    /// Summary counts
    pub summary: PlanSummary,
    /// Expected observables of the initial render, asserted at the start of
    /// every scenario
    pub initial_assertions: Vec<AssertionPoint>,
    /// Planned scenarios in synthesis order
    pub scenarios: Vec<PlannedScenario>,
    /// Input classes that could not be populated
    pub gaps: Vec<CoverageGap>,
    /// SHA-256 hex digest of the plan's canonical JSON (digest field blank)
    pub digest: String,
}

impl TestPlan {
    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> TrazarResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// YAML rendering.
    pub fn to_yaml(&self) -> TrazarResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

/// Computes assertion points for synthesized scenarios.
pub struct AssertionPlanner<'a> {
    model: &'a BehavioralModel,
    fsm: &'a Fsm,
}

impl<'a> AssertionPlanner<'a> {
    /// Create a planner over the model and its FSM.
    pub fn new(model: &'a BehavioralModel, fsm: &'a Fsm) -> Self {
        Self { model, fsm }
    }

    /// Plan every scenario and assemble the test plan.
    pub fn plan(&self, scenarios: &[Scenario]) -> TrazarResult<TestPlan> {
        let initial = ConcreteState::initial(self.model);
        let initial_assertions = self.assertions_for(&initial);

        let mut planned = Vec::with_capacity(scenarios.len());
        let mut assertion_points = initial_assertions.len();
        for scenario in scenarios {
            let steps = self.plan_scenario(scenario)?;
            assertion_points += steps.iter().map(|s| s.assertions.len()).sum::<usize>();
            planned.push(PlannedScenario {
                name: scenario.name.clone(),
                purpose: scenario.purpose,
                steps,
            });
        }

        let mut plan = TestPlan {
            component: self.model.component.clone(),
            summary: PlanSummary {
                states: self.fsm.states.len(),
                transitions: self.fsm.transitions.len(),
                scenarios: planned.len(),
                assertion_points,
            },
            initial_assertions,
            scenarios: planned,
            gaps: self.fsm.gaps.clone(),
            digest: String::new(),
        };
        plan.digest = digest_of(&plan)?;
        Ok(plan)
    }

    fn plan_scenario(&self, scenario: &Scenario) -> TrazarResult<Vec<PlannedStep>> {
        let mut state = ConcreteState::initial(self.model);
        let mut steps = Vec::with_capacity(scenario.steps.len());
        for step in &scenario.steps {
            let action = self.model.action(&step.action).ok_or_else(|| {
                TrazarError::invalid_model(format!(
                    "scenario `{}` references unknown action `{}`",
                    scenario.name, step.action
                ))
            })?;
            state = apply_action(self.model, &state, action, step.input.as_deref()).state;
            steps.push(PlannedStep {
                action: step.action.clone(),
                input_class: step.input_class,
                input: step.input.clone(),
                assertions: self.assertions_for(&state),
            });
        }
        Ok(steps)
    }

    /// Expected observables of one concrete state: presence of each view
    /// branch plus the rendered observables of the active one.
    fn assertions_for(&self, state: &ConcreteState) -> Vec<AssertionPoint> {
        let mut points = Vec::new();
        let (active, observations) = match observe(self.model, state) {
            Some(pair) => pair,
            None => (String::new(), Vec::new()),
        };

        for view in &self.model.views {
            points.push(AssertionPoint {
                target: format!("view.{}", view.name),
                check: Check::Presence {
                    present: view.name == active,
                },
            });
        }

        for observation in observations {
            let check = match observation.observed {
                Observed::Text { text } => Check::Text { expected: text },
                Observed::Field { value } => Check::Value {
                    expected: Value::Text(value),
                },
                Observed::Number { value } => Check::Value {
                    expected: Value::Int(value),
                },
                Observed::Items { items } => Check::Collection {
                    len: items.len(),
                    items,
                },
            };
            points.push(AssertionPoint {
                target: observation.target,
                check,
            });
        }

        points
    }
}

/// SHA-256 hex digest of the plan's canonical JSON with a blank digest field.
fn digest_of(plan: &TestPlan) -> TrazarResult<String> {
    let mut canonical = plan.clone();
    canonical.digest = String::new();
    let bytes = serde_json::to_vec(&canonical)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::machine::MachineBuilder;
    use crate::scenario::Synthesizer;

    fn plan_for(model: &BehavioralModel) -> TestPlan {
        let fsm = MachineBuilder::new(model).build().expect("build");
        let scenarios = Synthesizer::new(model, &fsm).synthesize();
        AssertionPlanner::new(model, &fsm)
            .plan(&scenarios)
            .expect("plan")
    }

    #[test]
    fn test_initial_assertions_cover_presence_and_first_question() {
        let model = fixtures::quiz_model();
        let plan = plan_for(&model);

        let presence: Vec<_> = plan
            .initial_assertions
            .iter()
            .filter_map(|p| match &p.check {
                Check::Presence { present } => Some((p.target.as_str(), *present)),
                _ => None,
            })
            .collect();
        assert!(presence.contains(&("view.questions", true)));
        assert!(presence.contains(&("view.otherwise", false)));

        let question = plan
            .initial_assertions
            .iter()
            .find(|p| p.target == "questions.q")
            .unwrap();
        assert_eq!(
            question.check,
            Check::Text {
                expected: "Capital of France?".into()
            }
        );
    }

    #[test]
    fn test_happy_path_terminal_assertions_tally_three_of_three() {
        let model = fixtures::quiz_model();
        let plan = plan_for(&model);

        let happy = &plan.scenarios[0];
        assert_eq!(happy.purpose, Purpose::HappyPath);
        let last = happy.steps.last().unwrap();

        let score = last
            .assertions
            .iter()
            .find(|p| p.target == "template.score")
            .unwrap();
        assert_eq!(
            score.check,
            Check::Text {
                expected: "Score: 3 / 3".into()
            }
        );

        let history = last
            .assertions
            .iter()
            .find(|p| p.target == "list.history")
            .unwrap();
        match &history.check {
            Check::Collection { len, items } => {
                assert_eq!(*len, 3);
                assert!(items.iter().all(|i| i.style.as_deref() == Some("green")));
                assert_eq!(items[0].text, "Capital of France? — ✅");
            }
            other => panic!("expected collection check, got {other:?}"),
        }
    }

    #[test]
    fn test_boundary_scenario_saturates_without_overflow() {
        let model = fixtures::survey_model();
        let plan = plan_for(&model);

        let up = plan
            .scenarios
            .iter()
            .find(|s| s.name == "rating-up-saturates-rating-max")
            .unwrap();
        let ratings: Vec<i64> = up
            .steps
            .iter()
            .filter_map(|step| {
                step.assertions.iter().find_map(|p| match &p.check {
                    Check::Value {
                        expected: Value::Int(n),
                    } if p.target == "value.rating" => Some(*n),
                    _ => None,
                })
            })
            .collect();
        assert_eq!(ratings, vec![4, 5, 5, 5, 5, 5]);
    }

    #[test]
    fn test_no_assertion_reports_value_outside_bounds() {
        let model = fixtures::survey_model();
        let plan = plan_for(&model);

        for scenario in &plan.scenarios {
            for step in &scenario.steps {
                for point in &step.assertions {
                    if point.target != "value.rating" {
                        continue;
                    }
                    if let Check::Value {
                        expected: Value::Int(n),
                    } = &point.check
                    {
                        assert!((1..=5).contains(n), "rating {n} escaped its bounds");
                    }
                }
            }
        }
    }

    #[test]
    fn test_gating_scenario_reaches_thank_you_with_field_values() {
        let model = fixtures::survey_model();
        let plan = plan_for(&model);

        let happy = &plan.scenarios[0];
        let last = happy.steps.last().unwrap();
        let thank_you = last
            .assertions
            .iter()
            .find(|p| p.target == "template.thank-you")
            .unwrap();
        assert_eq!(
            thank_you.check,
            Check::Text {
                expected: "Thank you, name value!".into()
            }
        );
        assert!(last
            .assertions
            .iter()
            .any(|p| p.target == "view.submitted"
                && p.check == Check::Presence { present: true }));
    }

    #[test]
    fn test_plans_are_byte_identical_across_runs() {
        let model = fixtures::quiz_model();
        let a = plan_for(&model);
        let b = plan_for(&model);
        assert_eq!(a.digest, b.digest);
        assert_eq!(
            a.to_json_pretty().unwrap(),
            b.to_json_pretty().unwrap()
        );
    }

    #[test]
    fn test_plan_round_trips_through_yaml() {
        let model = fixtures::counter_model();
        let plan = plan_for(&model);
        let yaml = plan.to_yaml().unwrap();
        let back: TestPlan = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(plan, back);
    }

    #[test]
    fn test_gaps_propagate_into_plan() {
        let mut model = fixtures::quiz_model();
        model.tables[0].rows[2].insert("a".into(), String::new());
        let plan = plan_for(&model);
        assert!(!plan.gaps.is_empty());
    }
}
