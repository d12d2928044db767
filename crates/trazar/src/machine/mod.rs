//! Finite-state machine construction over a behavioral model.
//!
//! States are equivalence classes of concrete states sharing an abstract
//! signature (active view branch, enabled actions, and the values of
//! terminal-affecting discrete variables). Free-text variables are abstracted
//! into input-equivalence classes so that exploration stays finite; the depth
//! bound derived from the terminal-affecting variables is the termination
//! guarantee. Reachability analysis and DOT output follow model-checking
//! practice (BFS from the initial state, orphan detection).

use crate::eval::{apply_action, enabled_actions, ConcreteState};
use crate::model::{Action, BehavioralModel, ViewPredicate};
use crate::result::{TrazarError, TrazarResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

/// Representative category of an unbounded text-input domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputClass {
    /// The empty string
    Empty,
    /// Whitespace only
    WhitespaceOnly,
    /// A non-empty value for a field with no comparison
    Valid,
    /// A value matching the expected table cell
    ValidMatching,
    /// A non-empty value that does not match the expected cell
    ValidNonMatching,
    /// The matching value with case toggled and whitespace padding
    CaseWhitespaceVariant,
}

impl InputClass {
    /// Stable kebab-case name, used in scenario names and DOT labels.
    pub fn name(self) -> &'static str {
        match self {
            InputClass::Empty => "empty",
            InputClass::WhitespaceOnly => "whitespace-only",
            InputClass::Valid => "valid",
            InputClass::ValidMatching => "valid-matching",
            InputClass::ValidNonMatching => "valid-non-matching",
            InputClass::CaseWhitespaceVariant => "case-whitespace-variant",
        }
    }
}

impl fmt::Display for InputClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A required input-equivalence class that could not be populated.
/// Non-fatal: synthesis proceeds with reduced coverage.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CoverageGap {
    /// The input variable lacking a representative
    pub var: String,
    /// The missing class
    pub class: InputClass,
    /// Why no representative was available
    pub reason: String,
}

/// Abstracted value of one terminal-affecting variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SigValue {
    /// Concrete integer value (index and flag-adjacent counters)
    Int(i64),
    /// Concrete boolean value
    Bool(bool),
    /// Trimmed non-emptiness of a text variable read by a guard
    Validity(bool),
}

impl fmt::Display for SigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SigValue::Int(n) => write!(f, "{n}"),
            SigValue::Bool(b) => write!(f, "{b}"),
            SigValue::Validity(true) => f.write_str("valid"),
            SigValue::Validity(false) => f.write_str("invalid"),
        }
    }
}

/// Abstract signature of an FSM state: two concrete states belong to the
/// same FSM state exactly when their signatures are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateSignature {
    /// Active view branch
    pub branch: String,
    /// Names of enabled actions, in model order
    pub enabled: Vec<String>,
    /// Terminal-affecting discrete variables
    pub discrete: BTreeMap<String, SigValue>,
}

/// One FSM state: an equivalence class with a representative concrete state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FsmState {
    /// Dense id; the initial state is always 0
    pub id: usize,
    /// Human-readable label derived from the signature
    pub label: String,
    /// Abstract signature
    pub signature: StateSignature,
    /// First concrete state discovered in this class
    pub representative: ConcreteState,
    /// BFS discovery depth from the initial state
    pub depth: usize,
    /// Whether the state has no enabled actions
    pub terminal: bool,
}

/// One FSM transition, kept per input class: classes are never collapsed
/// even when they reach the same target state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FsmTransition {
    /// Source state id
    pub from: usize,
    /// Action name
    pub action: String,
    /// Input class, for input-parameterized actions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_class: Option<InputClass>,
    /// Representative input value for the class
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_value: Option<String>,
    /// Target state id
    pub to: usize,
    /// Whether the guard held
    pub effective: bool,
}

/// The finite-state machine derived from one behavioral model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fsm {
    /// Component name
    pub component: String,
    /// States in BFS discovery order; index 0 is the initial state
    pub states: Vec<FsmState>,
    /// Transitions in discovery order
    pub transitions: Vec<FsmTransition>,
    /// Depth bound used during exploration
    pub depth_bound: usize,
    /// Input classes that could not be populated
    pub gaps: Vec<CoverageGap>,
}

impl Fsm {
    /// The initial state.
    pub fn initial(&self) -> &FsmState {
        &self.states[0]
    }

    /// Terminal states in discovery order.
    pub fn terminal_states(&self) -> Vec<&FsmState> {
        self.states.iter().filter(|s| s.terminal).collect()
    }

    /// States not reachable from the initial state. Empty by construction;
    /// kept as an explicit check mirroring orphan detection in model
    /// checking.
    pub fn orphans(&self) -> Vec<usize> {
        let mut reachable = BTreeSet::new();
        reachable.insert(0usize);
        let mut queue = VecDeque::from([0usize]);
        while let Some(current) = queue.pop_front() {
            for t in &self.transitions {
                if t.from == current && reachable.insert(t.to) {
                    queue.push_back(t.to);
                }
            }
        }
        (0..self.states.len())
            .filter(|id| !reachable.contains(id))
            .collect()
    }

    /// Incoming edges of a state from *other* states (self-loops excluded).
    pub fn in_degree(&self, id: usize) -> usize {
        self.transitions
            .iter()
            .filter(|t| t.to == id && t.from != id)
            .count()
    }

    /// Outgoing transitions of a state, in discovery order.
    pub fn outgoing(&self, id: usize) -> Vec<&FsmTransition> {
        self.transitions.iter().filter(|t| t.from == id).collect()
    }

    /// Render the machine as a Graphviz DOT digraph.
    pub fn to_dot(&self) -> String {
        let mut dot = String::new();
        dot.push_str("digraph StateMachine {\n");
        dot.push_str("  rankdir=LR;\n");
        dot.push_str("  node [shape=ellipse];\n");
        dot.push_str("  __start [shape=point];\n  __start -> \"s0\";\n");

        for state in &self.states {
            let shape = if state.terminal {
                "doublecircle"
            } else {
                "ellipse"
            };
            dot.push_str(&format!(
                "  \"s{}\" [shape={}, label=\"{}\"];\n",
                state.id, shape, state.label
            ));
        }

        for t in &self.transitions {
            let mut label = t.action.clone();
            if let Some(class) = t.input_class {
                label.push_str(&format!(" [{class}]"));
            }
            if !t.effective {
                label.push_str(" (no-op)");
            }
            dot.push_str(&format!(
                "  \"s{}\" -> \"s{}\" [label=\"{}\"];\n",
                t.from, t.to, label
            ));
        }

        dot.push_str("}\n");
        dot
    }
}

/// Kind of a terminal-affecting variable within the signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SigKind {
    Int,
    Bool,
    Validity,
}

/// Builds the FSM for one behavioral model via bounded BFS exploration.
pub struct MachineBuilder<'a> {
    model: &'a BehavioralModel,
    sig_vars: BTreeMap<String, SigKind>,
}

impl<'a> MachineBuilder<'a> {
    /// Create a builder for the given model.
    pub fn new(model: &'a BehavioralModel) -> Self {
        Self {
            sig_vars: signature_vars(model),
            model,
        }
    }

    /// Explore the reachable state space and build the FSM.
    pub fn build(&self) -> TrazarResult<Fsm> {
        self.model.validate()?;
        let depth_bound = self.depth_bound();
        tracing::debug!(component = %self.model.component, depth_bound, "exploring state space");

        let mut states: Vec<FsmState> = Vec::new();
        let mut by_signature: BTreeMap<StateSignature, usize> = BTreeMap::new();
        let mut transitions: Vec<FsmTransition> = Vec::new();
        let mut gaps: BTreeSet<CoverageGap> = BTreeSet::new();

        let initial = ConcreteState::initial(self.model);
        let sig = self.signature_of(&initial);
        by_signature.insert(sig.clone(), 0);
        states.push(self.new_state(0, sig, initial, 0));

        let mut queue = VecDeque::from([0usize]);
        while let Some(id) = queue.pop_front() {
            let snapshot = states[id].representative.clone();
            let depth = states[id].depth;

            for action in enabled_actions(self.model, &snapshot) {
                for (class, value) in self.applications(action, &snapshot, &mut gaps) {
                    let outcome = apply_action(self.model, &snapshot, action, value.as_deref());
                    let sig = self.signature_of(&outcome.state);

                    let to = if let Some(&existing) = by_signature.get(&sig) {
                        existing
                    } else {
                        if depth + 1 > depth_bound {
                            let partial = self.finish(states, transitions, depth_bound, &gaps);
                            return Err(TrazarError::UnboundedExploration {
                                depth_bound,
                                states_discovered: partial.states.len(),
                                partial: Box::new(partial),
                            });
                        }
                        let new_id = states.len();
                        by_signature.insert(sig.clone(), new_id);
                        states.push(self.new_state(new_id, sig, outcome.state, depth + 1));
                        queue.push_back(new_id);
                        new_id
                    };

                    transitions.push(FsmTransition {
                        from: id,
                        action: action.name.clone(),
                        input_class: class,
                        input_value: value,
                        to,
                        effective: outcome.effective,
                    });
                }
            }
        }

        let fsm = self.finish(states, transitions, depth_bound, &gaps);
        tracing::debug!(
            states = fsm.states.len(),
            transitions = fsm.transitions.len(),
            gaps = fsm.gaps.len(),
            "exploration complete"
        );
        Ok(fsm)
    }

    fn finish(
        &self,
        states: Vec<FsmState>,
        transitions: Vec<FsmTransition>,
        depth_bound: usize,
        gaps: &BTreeSet<CoverageGap>,
    ) -> Fsm {
        Fsm {
            component: self.model.component.clone(),
            states,
            transitions,
            depth_bound,
            gaps: gaps.iter().cloned().collect(),
        }
    }

    fn new_state(
        &self,
        id: usize,
        signature: StateSignature,
        representative: ConcreteState,
        depth: usize,
    ) -> FsmState {
        let terminal = enabled_actions(self.model, &representative).is_empty();
        let label = label_of(&signature);
        FsmState {
            id,
            label,
            signature,
            representative,
            depth,
            terminal,
        }
    }

    /// Input applications for one action at one state: one entry per input
    /// class for parameterized actions, a single bare entry otherwise.
    fn applications(
        &self,
        action: &Action,
        state: &ConcreteState,
        gaps: &mut BTreeSet<CoverageGap>,
    ) -> Vec<(Option<InputClass>, Option<String>)> {
        let Some(input_var) = &action.input else {
            return vec![(None, None)];
        };

        let mut out: Vec<(Option<InputClass>, Option<String>)> = vec![
            (Some(InputClass::Empty), Some(String::new())),
            (Some(InputClass::WhitespaceOnly), Some("   ".to_string())),
        ];

        let comparison = action
            .comparison
            .as_ref()
            .filter(|cmp| &cmp.var == input_var);
        if let Some(cmp) = comparison {
            let row = state.get(&cmp.index_var).as_int().unwrap_or_default();
            let answer = self
                .model
                .table(&cmp.table)
                .and_then(|t| t.cell(row, &cmp.column))
                .filter(|cell| !cell.trim().is_empty());
            if let Some(answer) = answer {
                out.push((Some(InputClass::ValidMatching), Some(answer.to_string())));
                out.push((
                    Some(InputClass::ValidNonMatching),
                    Some(format!("{answer}-wrong")),
                ));
                out.push((
                    Some(InputClass::CaseWhitespaceVariant),
                    Some(format!("  {}  ", toggle_case(answer))),
                ));
            } else {
                // Any text fails a comparison against a missing cell, so a
                // non-matching representative survives; the matching-derived
                // classes cannot be populated
                out.push((
                    Some(InputClass::ValidNonMatching),
                    Some(format!("{input_var} value")),
                ));
                for class in [InputClass::ValidMatching, InputClass::CaseWhitespaceVariant] {
                    gaps.insert(CoverageGap {
                        var: input_var.clone(),
                        class,
                        reason: format!(
                            "no answer cell available in `{}.{}` at row {row}",
                            cmp.table, cmp.column
                        ),
                    });
                }
            }
        } else {
            out.push((
                Some(InputClass::Valid),
                Some(format!("{input_var} value")),
            ));
        }

        out
    }

    /// Abstract signature of a concrete state.
    fn signature_of(&self, state: &ConcreteState) -> StateSignature {
        let branch = crate::eval::active_branch(self.model, state)
            .map(|b| b.name.clone())
            .unwrap_or_default();
        let enabled = enabled_actions(self.model, state)
            .iter()
            .map(|a| a.name.clone())
            .collect();
        let discrete = self
            .sig_vars
            .iter()
            .map(|(name, kind)| {
                let value = match kind {
                    SigKind::Int => SigValue::Int(state.get(name).as_int().unwrap_or_default()),
                    SigKind::Bool => {
                        SigValue::Bool(state.get(name).as_bool().unwrap_or_default())
                    }
                    SigKind::Validity => {
                        let text = match state.get(name) {
                            crate::model::Value::Text(s) => s,
                            _ => String::new(),
                        };
                        SigValue::Validity(!text.trim().is_empty())
                    }
                };
                (name.clone(), value)
            })
            .collect();
        StateSignature {
            branch,
            enabled,
            discrete,
        }
    }

    /// The exploration depth bound: the sum of the finite domain sizes of
    /// the terminal-affecting variables, plus one. Exceeding it means some
    /// variable escaped its expected domain — a missing terminal condition.
    fn depth_bound(&self) -> usize {
        let mut sum = 0usize;
        for (name, kind) in &self.sig_vars {
            sum += match kind {
                SigKind::Bool | SigKind::Validity => 2,
                SigKind::Int => self.index_domain(name),
            };
        }
        sum + 1
    }

    /// Expected domain size of an index variable: the length of the table
    /// it walks, plus one for the exhausted position.
    fn index_domain(&self, var: &str) -> usize {
        let from_views = self.model.views.iter().find_map(|v| match &v.when {
            ViewPredicate::IndexWithinTable { var: pv, table } if pv == var => {
                self.model.table(table).map(|t| t.len())
            }
            _ => None,
        });
        let from_comparisons = self.model.actions.iter().find_map(|a| {
            a.comparison
                .as_ref()
                .filter(|cmp| cmp.index_var == var)
                .and_then(|cmp| self.model.table(&cmp.table).map(|t| t.len()))
        });
        from_views.or(from_comparisons).map_or(2, |len| len + 1)
    }
}

/// Terminal-affecting variables: those read by a view predicate, a
/// comparison's row selector, or the guard of an action that does not
/// parameterize them.
fn signature_vars(model: &BehavioralModel) -> BTreeMap<String, SigKind> {
    let mut vars = BTreeMap::new();
    for view in &model.views {
        match &view.when {
            ViewPredicate::IndexWithinTable { var, .. } => {
                vars.insert(var.clone(), SigKind::Int);
            }
            ViewPredicate::Flag { var, .. } => {
                vars.insert(var.clone(), SigKind::Bool);
            }
            ViewPredicate::Otherwise => {}
        }
    }
    for action in &model.actions {
        if let Some(cmp) = &action.comparison {
            vars.entry(cmp.index_var.clone()).or_insert(SigKind::Int);
        }
        for read in action.guard.reads() {
            if action.input.as_deref() != Some(read) {
                vars.entry(read.to_string()).or_insert(SigKind::Validity);
            }
        }
    }
    vars
}

fn label_of(signature: &StateSignature) -> String {
    let mut label = signature.branch.clone();
    for (name, value) in &signature.discrete {
        label.push_str(&format!(" {name}={value}"));
    }
    label
}

fn toggle_case(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_lowercase() {
                c.to_uppercase().collect::<String>()
            } else {
                c.to_lowercase().collect::<String>()
            }
        })
        .collect()
}
