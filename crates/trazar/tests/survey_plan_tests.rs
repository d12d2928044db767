//! End-to-end acceptance tests for the survey example component:
//! required-field gating, clamp saturation, and submission summary.

use trazar::model::Value;
use trazar::plan::{Check, TestPlan};
use trazar::{generate_plan, PipelineConfig, Purpose};

const SURVEY_SOURCE: &str = include_str!("components/survey_form.jsx");

fn survey_plan() -> TestPlan {
    generate_plan(SURVEY_SOURCE, &PipelineConfig::default()).expect("survey plan")
}

fn rating_at(step: &trazar::plan::PlannedStep) -> Option<i64> {
    step.assertions.iter().find_map(|p| match &p.check {
        Check::Value {
            expected: Value::Int(n),
        } if p.target == "value.rating" => Some(*n),
        _ => None,
    })
}

#[test]
fn happy_path_fills_fields_then_submits() {
    let plan = survey_plan();
    let happy = &plan.scenarios[0];
    assert_eq!(happy.purpose, Purpose::HappyPath);

    let actions: Vec<_> = happy.steps.iter().map(|s| s.action.as_str()).collect();
    assert_eq!(
        actions,
        vec!["set-name", "set-age", "set-feedback", "handleSubmit"]
    );

    let last = happy.steps.last().unwrap();
    let thank_you = last
        .assertions
        .iter()
        .find(|p| p.target == "template.thank-you")
        .expect("thank-you assertion");
    assert_eq!(
        thank_you.check,
        Check::Text {
            expected: "Thank you, name value!".into()
        }
    );
    let age = last
        .assertions
        .iter()
        .find(|p| p.target == "template.age")
        .expect("age assertion");
    assert_eq!(
        age.check,
        Check::Text {
            expected: "Age: age value".into()
        }
    );
    let rating = last
        .assertions
        .iter()
        .find(|p| p.target == "template.rating")
        .expect("rating assertion");
    assert_eq!(
        rating.check,
        Check::Text {
            expected: "Rating: 3".into()
        }
    );
}

#[test]
fn submit_stays_a_noop_until_the_last_field_is_valid() {
    let plan = survey_plan();

    // Premature submits keep the form on screen
    let premature: Vec<_> = plan
        .scenarios
        .iter()
        .filter(|s| {
            s.steps.last().map(|step| step.action.as_str()) == Some("handleSubmit")
                && s.steps.len() < 4
        })
        .collect();
    assert!(!premature.is_empty());
    for scenario in premature {
        let last = scenario.steps.last().unwrap();
        assert!(
            last.assertions.iter().any(|p| p.target == "view.otherwise"
                && p.check == Check::Presence { present: true }),
            "premature submit in `{}` must stay on the form",
            scenario.name
        );
    }

    // Exactly one effective submit scenario reaches the summary in the
    // minimal number of steps
    let effective: Vec<_> = plan
        .scenarios
        .iter()
        .filter(|s| {
            s.steps.len() == 4
                && s.steps.last().map(|step| step.action.as_str()) == Some("handleSubmit")
                && s.steps.last().unwrap().assertions.iter().any(|p| {
                    p.target == "view.submitted" && p.check == Check::Presence { present: true }
                })
        })
        .collect();
    assert_eq!(effective.len(), 1);
}

#[test]
fn six_increments_saturate_at_five() {
    let plan = survey_plan();
    let up = plan
        .scenarios
        .iter()
        .find(|s| s.name == "rating-up-saturates-rating-max")
        .expect("saturation scenario");
    assert_eq!(up.purpose, Purpose::Boundary);

    let ratings: Vec<_> = up.steps.iter().filter_map(rating_at).collect();
    assert_eq!(ratings, vec![4, 5, 5, 5, 5, 5]);
}

#[test]
fn six_decrements_saturate_at_one() {
    let plan = survey_plan();
    let down = plan
        .scenarios
        .iter()
        .find(|s| s.name == "rating-down-saturates-rating-min")
        .expect("saturation scenario");

    let ratings: Vec<_> = down.steps.iter().filter_map(rating_at).collect();
    assert_eq!(ratings, vec![2, 1, 1, 1, 1, 1]);
}

#[test]
fn no_rating_assertion_ever_leaves_the_bounds() {
    let plan = survey_plan();
    for scenario in &plan.scenarios {
        for step in &scenario.steps {
            if let Some(n) = rating_at(step) {
                assert!(
                    (1..=5).contains(&n),
                    "rating {n} escaped [1, 5] in `{}`",
                    scenario.name
                );
            }
        }
    }
}

#[test]
fn field_edits_echo_into_their_inputs() {
    let plan = survey_plan();

    // The happy path's first edit lands in the bound input
    let first = &plan.scenarios[0].steps[0];
    assert_eq!(first.action, "set-name");
    assert_eq!(first.input.as_deref(), Some("name value"));
    let input = first
        .assertions
        .iter()
        .find(|p| p.target == "input.name")
        .expect("input assertion");
    assert_eq!(
        input.check,
        Check::Value {
            expected: Value::Text("name value".into())
        }
    );

    // A whitespace-only edit still echoes the typed text
    let whitespace = plan
        .scenarios
        .iter()
        .find(|s| {
            s.steps.len() == 1
                && s.steps[0].action == "set-name"
                && s.steps[0].input.as_deref() == Some("   ")
        })
        .expect("whitespace edit scenario");
    let input = whitespace.steps[0]
        .assertions
        .iter()
        .find(|p| p.target == "input.name")
        .expect("input assertion");
    assert_eq!(
        input.check,
        Check::Value {
            expected: Value::Text("   ".into())
        }
    );
}

#[test]
fn plans_are_reproducible_byte_for_byte() {
    let a = survey_plan();
    let b = survey_plan();
    assert_eq!(a.digest, b.digest);
    assert_eq!(a.to_yaml().expect("yaml"), b.to_yaml().expect("yaml"));
}
