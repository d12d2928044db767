//! Generate and print the test plan for the bundled quiz component.
//!
//! ```bash
//! cargo run --example quiz_plan_demo
//! ```

use trazar::{generate_plan, PipelineConfig};

const QUIZ_SOURCE: &str = include_str!("../tests/components/quiz_game.jsx");

fn main() {
    let plan = generate_plan(QUIZ_SOURCE, &PipelineConfig::default()).expect("pipeline");

    println!("component: {}", plan.component);
    println!(
        "states: {}  transitions: {}  scenarios: {}",
        plan.summary.states, plan.summary.transitions, plan.summary.scenarios
    );
    println!("digest: {}", plan.digest);
    println!();

    for scenario in &plan.scenarios {
        println!("{} ({:?})", scenario.name, scenario.purpose);
        for step in &scenario.steps {
            match &step.input {
                Some(input) => println!("  {} {:?}", step.action, input),
                None => println!("  {}", step.action),
            }
        }
    }
}
