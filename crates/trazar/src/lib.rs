//! Trazar: behavioral-model extraction and covering test-plan synthesis for
//! stateful UI components.
//!
//! Trazar (Spanish: "to trace out, to draw up a plan") derives a component's
//! behavioral model from its source, builds a finite-state machine over it,
//! and synthesizes a minimal-but-complete set of test scenarios with
//! oracle-computed assertions.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                      TRAZAR Pipeline                               │
//! ├────────────────────────────────────────────────────────────────────┤
//! │  ┌──────────┐   ┌─────────┐   ┌─────────┐   ┌──────────┐           │
//! │  │ Behavior │   │ Machine │   │ Scenario│   │ Assertion│           │
//! │  │ Extractor│──►│ Builder │──►│ Synth   │──►│ Planner  │──► plan   │
//! │  └──────────┘   └─────────┘   └─────────┘   └──────────┘           │
//! │   source →       model →       FSM →         scenarios → TestPlan  │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The plan is the contract handed to an external code-emission layer; the
//! core has no opinion on test-runner syntax. Determinism is a correctness
//! requirement: identical source yields byte-identical plans.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

/// Deterministic concrete-state evaluation: the shared simulation core and
/// test oracle.
pub mod eval;

/// Behavior extraction: component source → behavioral model.
pub mod extract;

/// Reference models mirroring the bundled example components.
pub mod fixtures;

/// Finite-state machine construction with bounded exploration.
pub mod machine;

/// Behavioral model types.
pub mod model;

/// End-to-end pipeline entry points.
pub mod pipeline;

/// Assertion planning and the test-plan output contract.
pub mod plan;

mod result;

/// Scenario synthesis with state, transition, boundary, and guard coverage.
pub mod scenario;

pub use extract::{extract_model, Extractor, ExtractorConfig};
pub use machine::{CoverageGap, Fsm, FsmState, FsmTransition, InputClass, MachineBuilder};
pub use model::BehavioralModel;
pub use pipeline::{build_machine, generate_plan, synthesize_scenarios, PipelineConfig};
pub use plan::{AssertionPlanner, AssertionPoint, Check, TestPlan};
pub use result::{TrazarError, TrazarResult};
pub use scenario::{Purpose, Scenario, ScenarioStep, Synthesizer};
