//! Output formatting and progress reporting

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use trazar::plan::Check;
use trazar::TestPlan;

/// Progress reporter for pipeline runs
#[derive(Debug)]
pub struct ProgressReporter {
    spinner: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            spinner: None,
            use_color,
            quiet,
        }
    }

    /// Start a spinner with a message
    pub fn start(&mut self, message: &str) {
        if self.quiet {
            return;
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }

    /// Finish the spinner and clear it
    pub fn finish(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Render a human-readable plan summary.
#[must_use]
pub fn render_plan_summary(plan: &TestPlan, use_color: bool) -> String {
    let paint = |s: &str| {
        if use_color {
            style(s).bold().to_string()
        } else {
            s.to_string()
        }
    };

    let mut out = String::new();
    out.push_str(&format!("{}\n", paint(&format!("Test plan: {}", plan.component))));
    out.push_str(&format!(
        "  states: {}  transitions: {}  scenarios: {}  assertions: {}\n",
        plan.summary.states,
        plan.summary.transitions,
        plan.summary.scenarios,
        plan.summary.assertion_points
    ));
    out.push_str(&format!("  digest: {}\n", plan.digest));

    if !plan.gaps.is_empty() {
        out.push_str(&format!("{}\n", paint("Coverage gaps:")));
        for gap in &plan.gaps {
            out.push_str(&format!(
                "  {} [{}]: {}\n",
                gap.var, gap.class, gap.reason
            ));
        }
    }

    out.push_str(&format!("{}\n", paint("Scenarios:")));
    for scenario in &plan.scenarios {
        let assertions: usize = scenario.steps.iter().map(|s| s.assertions.len()).sum();
        out.push_str(&format!(
            "  {:<48} {:>2} steps  {:>3} assertions\n",
            scenario.name,
            scenario.steps.len(),
            assertions
        ));
    }
    out
}

/// Render one scenario's steps with their assertion counts by kind, for
/// verbose output.
#[must_use]
pub fn render_scenario_detail(plan: &TestPlan, name: &str) -> Option<String> {
    let scenario = plan.scenarios.iter().find(|s| s.name == name)?;
    let mut out = format!("{name}\n");
    for (i, step) in scenario.steps.iter().enumerate() {
        let input = step
            .input
            .as_deref()
            .map(|v| format!(" {v:?}"))
            .unwrap_or_default();
        let mut kinds = (0usize, 0usize, 0usize, 0usize);
        for point in &step.assertions {
            match point.check {
                Check::Text { .. } => kinds.0 += 1,
                Check::Value { .. } => kinds.1 += 1,
                Check::Presence { .. } => kinds.2 += 1,
                Check::Collection { .. } => kinds.3 += 1,
            }
        }
        out.push_str(&format!(
            "  {}. {}{input}  (text {} / value {} / presence {} / collection {})\n",
            i + 1,
            step.action,
            kinds.0,
            kinds.1,
            kinds.2,
            kinds.3
        ));
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trazar::{generate_plan, PipelineConfig};

    const QUIZ_SOURCE: &str = include_str!("../../trazar/tests/components/quiz_game.jsx");

    #[test]
    fn test_summary_lists_every_scenario() {
        let plan = generate_plan(QUIZ_SOURCE, &PipelineConfig::default()).expect("plan");
        let summary = render_plan_summary(&plan, false);

        assert!(summary.contains("QuizGameWidget"));
        assert!(summary.contains("happy-path"));
        assert!(summary.contains("initial-render"));
        assert!(summary.contains(&plan.digest));
        for scenario in &plan.scenarios {
            assert!(summary.contains(&scenario.name));
        }
    }

    #[test]
    fn test_scenario_detail_counts_assertion_kinds() {
        let plan = generate_plan(QUIZ_SOURCE, &PipelineConfig::default()).expect("plan");
        let detail = render_scenario_detail(&plan, "happy-path").expect("detail");
        assert!(detail.contains("submitAnswer"));
        assert!(detail.contains("collection"));
        assert!(render_scenario_detail(&plan, "missing").is_none());
    }
}
