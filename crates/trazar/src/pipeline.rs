//! End-to-end pipeline: component source → behavioral model → FSM →
//! scenarios → test plan.
//!
//! Each stage is pure and deterministic; the pipeline holds no state between
//! invocations, so many components can be processed independently.

use crate::extract::{extract_model, ExtractorConfig};
use crate::machine::{Fsm, MachineBuilder};
use crate::model::BehavioralModel;
use crate::plan::{AssertionPlanner, TestPlan};
use crate::result::TrazarResult;
use crate::scenario::{Scenario, Synthesizer};
use serde::{Deserialize, Serialize};

/// Configuration for a pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Extractor idiom switches
    pub extractor: ExtractorConfig,
}

/// Build the FSM for an already-extracted model.
pub fn build_machine(model: &BehavioralModel) -> TrazarResult<Fsm> {
    MachineBuilder::new(model).build()
}

/// Synthesize the covering scenario set for a model and its FSM.
pub fn synthesize_scenarios(model: &BehavioralModel, fsm: &Fsm) -> Vec<Scenario> {
    Synthesizer::new(model, fsm).synthesize()
}

/// Run the full pipeline on one component's source.
pub fn generate_plan(source: &str, config: &PipelineConfig) -> TrazarResult<TestPlan> {
    let model = extract_model(source, &config.extractor)?;
    let span = tracing::debug_span!("pipeline", component = %model.component);
    let _guard = span.enter();

    let fsm = build_machine(&model)?;
    let scenarios = synthesize_scenarios(&model, &fsm);
    let plan = AssertionPlanner::new(&model, &fsm).plan(&scenarios)?;
    tracing::info!(
        component = %plan.component,
        scenarios = plan.summary.scenarios,
        assertions = plan.summary.assertion_points,
        digest = %plan.digest,
        "test plan generated"
    );
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIZ_SOURCE: &str = include_str!("../tests/components/quiz_game.jsx");

    #[test]
    fn test_generate_plan_end_to_end() {
        let plan = generate_plan(QUIZ_SOURCE, &PipelineConfig::default()).expect("plan");
        assert_eq!(plan.component, "QuizGameWidget");
        assert!(plan.summary.scenarios > 2);
        assert!(!plan.digest.is_empty());
    }

    #[test]
    fn test_pipeline_is_stateless_across_runs() {
        let config = PipelineConfig::default();
        let a = generate_plan(QUIZ_SOURCE, &config).expect("plan");
        let b = generate_plan(QUIZ_SOURCE, &config).expect("plan");
        assert_eq!(a, b);
    }
}
