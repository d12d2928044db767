//! Behavioral model types: the abstract description of a component's state,
//! actions, and conditional views that every later pipeline stage consumes.
//!
//! A [`BehavioralModel`] is built once per component by the extractor and is
//! immutable afterwards. All containers are ordered (`Vec`, `BTreeMap`) so
//! that serialization and downstream enumeration are deterministic.

use crate::result::{TrazarError, TrazarResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic type of a state variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SemanticType {
    /// Free-form text (unbounded domain, abstracted into input classes)
    Text,
    /// Unbounded integer
    Number,
    /// Boolean flag
    Boolean,
    /// Integer clamped to an inclusive range
    BoundedInt {
        /// Inclusive lower bound
        min: i64,
        /// Inclusive upper bound
        max: i64,
    },
    /// Append-only collection of records
    Collection,
    /// Record of named fields (flattened to one variable per field during
    /// extraction; kept for completeness of the type lattice)
    Record,
}

/// A concrete runtime value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// Text value
    Text(String),
    /// Integer value
    Int(i64),
    /// Boolean value
    Bool(bool),
    /// Collection of records
    List(Vec<BTreeMap<String, Value>>),
}

impl Value {
    /// Text payload, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer payload, if this is an integer value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Boolean payload, if this is a boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// A declared state variable: name, semantic type, initial value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateVariable {
    /// Variable name (unique within the model)
    pub name: String,
    /// Semantic type
    pub ty: SemanticType,
    /// Initial value
    pub initial: Value,
}

/// A fixed data table driving iteration bounds (e.g. a question list).
/// The table length is a terminal-condition source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTable {
    /// Table name (unique within the model)
    pub name: String,
    /// Column names, in declaration order
    pub columns: Vec<String>,
    /// Rows, each a column → text-cell map
    pub rows: Vec<BTreeMap<String, String>>,
}

impl DataTable {
    /// Cell lookup; `None` when the row index is out of range or the column
    /// is absent.
    pub fn cell(&self, row: i64, column: &str) -> Option<&str> {
        if row < 0 {
            return None;
        }
        self.rows
            .get(row as usize)
            .and_then(|r| r.get(column))
            .map(String::as_str)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// String normalization applied before comparison. A guard-side concern,
/// never a state mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Normalize {
    /// Strip leading/trailing whitespace
    pub trim: bool,
    /// Case-insensitive comparison
    pub case_fold: bool,
}

impl Normalize {
    /// Apply the normalization to a string.
    pub fn apply(&self, s: &str) -> String {
        let s = if self.trim { s.trim() } else { s };
        if self.case_fold {
            s.to_lowercase()
        } else {
            s.to_string()
        }
    }
}

/// Comparison of a text variable against a table cell selected by an index
/// variable, under a normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    /// The compared text variable
    pub var: String,
    /// Table holding the expected values
    pub table: String,
    /// Variable selecting the current row
    pub index_var: String,
    /// Column holding the expected value
    pub column: String,
    /// Normalization applied to both sides
    pub normalize: Normalize,
}

/// Guard predicate: the condition under which an action has effect.
/// Absent guard = [`Guard::Always`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "guard", rename_all = "snake_case")]
pub enum Guard {
    /// Unconditional
    Always,
    /// A single text variable is non-empty after trimming
    NonEmptyTrimmed {
        /// Guarded variable
        var: String,
    },
    /// Every listed text variable is non-empty after trimming
    AllNonEmptyTrimmed {
        /// Guarded variables, in source order
        vars: Vec<String>,
    },
}

impl Guard {
    /// Variables the guard reads.
    pub fn reads(&self) -> Vec<&str> {
        match self {
            Guard::Always => Vec::new(),
            Guard::NonEmptyTrimmed { var } => vec![var.as_str()],
            Guard::AllNonEmptyTrimmed { vars } => vars.iter().map(String::as_str).collect(),
        }
    }

    /// Whether this guard can ever fail.
    pub fn is_conditional(&self) -> bool {
        !matches!(self, Guard::Always)
    }
}

/// Source of one field in an appended record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum EntrySource {
    /// A table cell at the row selected by an index variable
    TableCell {
        /// Table name
        table: String,
        /// Row-selecting variable
        index_var: String,
        /// Column name
        column: String,
    },
    /// The boolean outcome of the action's comparison
    MatchFlag,
    /// The current value of a state variable
    Var {
        /// Variable name
        var: String,
    },
    /// A literal text value
    Literal {
        /// The literal
        text: String,
    },
}

/// One field of an appended record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryField {
    /// Field name in the appended record
    pub field: String,
    /// Where the field value comes from
    pub source: EntrySource,
}

/// One pure state update. Effects apply in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EffectOp {
    /// Set a text variable from the action's input value
    SetFromInput {
        /// Target variable
        var: String,
    },
    /// Reset a text variable to the empty string
    Clear {
        /// Target variable
        var: String,
    },
    /// Set a boolean variable
    SetBool {
        /// Target variable
        var: String,
        /// New value
        value: bool,
    },
    /// Add a delta to an unbounded integer variable
    Add {
        /// Target variable
        var: String,
        /// Signed delta
        delta: i64,
    },
    /// Add a delta to a bounded integer variable, saturating at the bounds
    AddClamped {
        /// Target variable
        var: String,
        /// Signed delta
        delta: i64,
        /// Inclusive lower bound
        min: i64,
        /// Inclusive upper bound
        max: i64,
    },
    /// Add a delta only when the action's comparison matched
    AddOnMatch {
        /// Target variable
        var: String,
        /// Signed delta
        delta: i64,
    },
    /// Append a record to a collection variable
    Append {
        /// Target collection
        collection: String,
        /// Record template
        entry: Vec<EntryField>,
    },
}

impl EffectOp {
    /// The variable this effect writes.
    pub fn writes(&self) -> &str {
        match self {
            EffectOp::SetFromInput { var }
            | EffectOp::Clear { var }
            | EffectOp::SetBool { var, .. }
            | EffectOp::Add { var, .. }
            | EffectOp::AddClamped { var, .. }
            | EffectOp::AddOnMatch { var, .. } => var,
            EffectOp::Append { collection, .. } => collection,
        }
    }
}

/// A transition-triggering action: guard, optional comparison, ordered
/// effects. Effects are pure and deterministic; every effect must be
/// expressible purely in terms of the model's state variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Action name (unique within the model)
    pub name: String,
    /// View branch in which the action's trigger is rendered
    pub branch: String,
    /// UI label of the trigger, when one exists (e.g. button text)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    /// Text variable the action is parameterized over: applying the action
    /// supplies an input value for this variable before the guard runs.
    /// `None` for plain click actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    /// State variables the action reads
    pub reads: Vec<String>,
    /// Guard predicate
    pub guard: Guard,
    /// Comparison feeding `AddOnMatch`/`MatchFlag` effects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<Comparison>,
    /// Effects, applied in order when the guard holds
    pub effects: Vec<EffectOp>,
}

/// Predicate selecting the active render branch. First match wins, in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "when", rename_all = "snake_case")]
pub enum ViewPredicate {
    /// Index variable is below the table length (`idx < table.length`,
    /// exactly as the source writes it — negative indices pass)
    IndexWithinTable {
        /// Index variable
        var: String,
        /// Bounding table
        table: String,
    },
    /// Boolean variable equals the expected value
    Flag {
        /// Flag variable
        var: String,
        /// Expected value
        expected: bool,
    },
    /// Matches any state; used for the final branch of a conditional render
    Otherwise,
}

impl ViewPredicate {
    /// Variables the predicate reads.
    pub fn reads(&self) -> Vec<&str> {
        match self {
            ViewPredicate::IndexWithinTable { var, .. } | ViewPredicate::Flag { var, .. } => {
                vec![var.as_str()]
            }
            ViewPredicate::Otherwise => Vec::new(),
        }
    }
}

/// One part of a templated text observable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "part", rename_all = "snake_case")]
pub enum TextPart {
    /// Literal text
    Lit {
        /// The literal
        text: String,
    },
    /// Current value of a state variable
    Var {
        /// Variable name
        var: String,
    },
    /// Length of a data table
    TableLen {
        /// Table name
        table: String,
    },
}

/// One part of a collection item's rendered label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "part", rename_all = "snake_case")]
pub enum ItemPart {
    /// A record field's value
    Field {
        /// Field name
        field: String,
    },
    /// Literal text
    Lit {
        /// The literal
        text: String,
    },
    /// A glyph chosen by a boolean record field
    FlagGlyph {
        /// Boolean field
        field: String,
        /// Glyph when true
        when_true: String,
        /// Glyph when false
        when_false: String,
    },
}

/// Styling derived from a boolean record field. Part of the derived-view
/// contract: the original components style history items by correctness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStyle {
    /// Boolean field driving the style
    pub field: String,
    /// Style when true
    pub when_true: String,
    /// Style when false
    pub when_false: String,
}

/// Render template for one collection item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTemplate {
    /// Label parts, concatenated in order
    pub parts: Vec<ItemPart>,
    /// Optional per-item styling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<ItemStyle>,
}

/// One observable output of a view branch, as a function of state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "observable", rename_all = "snake_case")]
pub enum Observable {
    /// Fixed visible text
    Literal {
        /// Assertion target label
        target: String,
        /// The text
        text: String,
    },
    /// Templated visible text
    Template {
        /// Assertion target label
        target: String,
        /// Template parts
        parts: Vec<TextPart>,
    },
    /// A table cell at the row selected by an index variable
    TableCell {
        /// Assertion target label
        target: String,
        /// Table name
        table: String,
        /// Row-selecting variable
        index_var: String,
        /// Column name
        column: String,
    },
    /// An input field's current value
    FieldValue {
        /// Assertion target label
        target: String,
        /// Bound variable
        var: String,
    },
    /// A state variable rendered directly (e.g. a counter readout)
    VarValue {
        /// Assertion target label
        target: String,
        /// Variable name
        var: String,
    },
    /// A collection rendered as a list with a per-item template
    CollectionList {
        /// Assertion target label
        target: String,
        /// Collection variable
        var: String,
        /// Per-item template
        item: ItemTemplate,
    },
}

impl Observable {
    /// Assertion target label.
    pub fn target(&self) -> &str {
        match self {
            Observable::Literal { target, .. }
            | Observable::Template { target, .. }
            | Observable::TableCell { target, .. }
            | Observable::FieldValue { target, .. }
            | Observable::VarValue { target, .. }
            | Observable::CollectionList { target, .. } => target,
        }
    }
}

/// A derived view: a predicate selecting a render branch plus the
/// observables the branch exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewBranch {
    /// Branch name (unique within the model)
    pub name: String,
    /// Selection predicate
    pub when: ViewPredicate,
    /// Observables exposed by the branch
    pub observables: Vec<Observable>,
}

/// The extracted behavioral model of one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehavioralModel {
    /// Component name
    pub component: String,
    /// Declared state variables, in declaration order
    pub variables: Vec<StateVariable>,
    /// Fixed data tables
    pub tables: Vec<DataTable>,
    /// Actions, in trigger discovery order
    pub actions: Vec<Action>,
    /// View branches, in declaration order (first predicate match wins)
    pub views: Vec<ViewBranch>,
}

impl BehavioralModel {
    /// Look up a variable by name.
    pub fn variable(&self, name: &str) -> Option<&StateVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Look up a table by name.
    pub fn table(&self, name: &str) -> Option<&DataTable> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Look up an action by name.
    pub fn action(&self, name: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.name == name)
    }

    /// Look up a view branch by name.
    pub fn view(&self, name: &str) -> Option<&ViewBranch> {
        self.views.iter().find(|v| v.name == name)
    }

    /// Validate structural integrity: every reference resolves, effects
    /// type-check against variable semantics, and comparison-dependent
    /// effects have a comparison to depend on.
    pub fn validate(&self) -> TrazarResult<()> {
        if self.component.is_empty() {
            return Err(TrazarError::invalid_model("component name is empty"));
        }
        if self.views.is_empty() {
            return Err(TrazarError::invalid_model("model has no view branches"));
        }

        let mut seen = std::collections::BTreeSet::new();
        for v in &self.variables {
            if !seen.insert(v.name.as_str()) {
                return Err(TrazarError::invalid_model(format!(
                    "duplicate state variable `{}`",
                    v.name
                )));
            }
            self.check_initial(v)?;
        }

        for view in &self.views {
            for var in view.when.reads() {
                self.require_var(var, &format!("view `{}`", view.name))?;
            }
            if let ViewPredicate::IndexWithinTable { table, .. } = &view.when {
                self.require_table(table, &format!("view `{}`", view.name))?;
            }
            for obs in &view.observables {
                self.check_observable(obs, &view.name)?;
            }
        }

        for action in &self.actions {
            let ctx = format!("action `{}`", action.name);
            if self.view(&action.branch).is_none() {
                return Err(TrazarError::invalid_model(format!(
                    "{ctx} references unknown branch `{}`",
                    action.branch
                )));
            }
            if let Some(input_var) = &action.input {
                self.require_var(input_var, &ctx)?;
            }
            for var in action.guard.reads() {
                self.require_var(var, &ctx)?;
            }
            if let Some(cmp) = &action.comparison {
                self.require_var(&cmp.var, &ctx)?;
                self.require_var(&cmp.index_var, &ctx)?;
                let table = self
                    .table(&cmp.table)
                    .ok_or_else(|| {
                        TrazarError::invalid_model(format!(
                            "{ctx} compares against unknown table `{}`",
                            cmp.table
                        ))
                    })?;
                if !table.columns.iter().any(|c| c == &cmp.column) {
                    return Err(TrazarError::invalid_model(format!(
                        "{ctx} compares against unknown column `{}.{}`",
                        cmp.table, cmp.column
                    )));
                }
            }
            for effect in &action.effects {
                self.check_effect(action, effect, &ctx)?;
            }
        }

        Ok(())
    }

    fn check_initial(&self, v: &StateVariable) -> TrazarResult<()> {
        let ok = match (&v.ty, &v.initial) {
            (SemanticType::Text, Value::Text(_))
            | (SemanticType::Number | SemanticType::BoundedInt { .. }, Value::Int(_))
            | (SemanticType::Boolean, Value::Bool(_))
            | (SemanticType::Collection, Value::List(_))
            | (SemanticType::Record, _) => true,
            _ => false,
        };
        if !ok {
            return Err(TrazarError::invalid_model(format!(
                "variable `{}` initial value does not match its semantic type",
                v.name
            )));
        }
        if let SemanticType::BoundedInt { min, max } = v.ty {
            if min > max {
                return Err(TrazarError::invalid_model(format!(
                    "variable `{}` has inverted bounds [{min}, {max}]",
                    v.name
                )));
            }
            let init = v.initial.as_int().unwrap_or_default();
            if init < min || init > max {
                return Err(TrazarError::invalid_model(format!(
                    "variable `{}` initial value {init} outside [{min}, {max}]",
                    v.name
                )));
            }
        }
        Ok(())
    }

    fn check_observable(&self, obs: &Observable, view: &str) -> TrazarResult<()> {
        let ctx = format!("view `{view}` observable `{}`", obs.target());
        match obs {
            Observable::Literal { .. } => Ok(()),
            Observable::Template { parts, .. } => {
                for part in parts {
                    match part {
                        TextPart::Var { var } => self.require_var(var, &ctx)?,
                        TextPart::TableLen { table } => self.require_table(table, &ctx)?,
                        TextPart::Lit { .. } => {}
                    }
                }
                Ok(())
            }
            Observable::TableCell {
                table, index_var, ..
            } => {
                self.require_table(table, &ctx)?;
                self.require_var(index_var, &ctx)
            }
            Observable::FieldValue { var, .. } | Observable::VarValue { var, .. } => {
                self.require_var(var, &ctx)
            }
            Observable::CollectionList { var, .. } => {
                self.require_var(var, &ctx)?;
                let v = self.variable(var).unwrap();
                if v.ty != SemanticType::Collection {
                    return Err(TrazarError::invalid_model(format!(
                        "{ctx} renders non-collection variable `{var}` as a list"
                    )));
                }
                Ok(())
            }
        }
    }

    fn check_effect(&self, action: &Action, effect: &EffectOp, ctx: &str) -> TrazarResult<()> {
        self.require_var(effect.writes(), ctx)?;
        let var = self.variable(effect.writes()).unwrap();
        match effect {
            EffectOp::SetFromInput { .. } | EffectOp::Clear { .. } => {
                if var.ty != SemanticType::Text {
                    return Err(TrazarError::invalid_model(format!(
                        "{ctx} writes text into non-text variable `{}`",
                        var.name
                    )));
                }
            }
            EffectOp::SetBool { .. } => {
                if var.ty != SemanticType::Boolean {
                    return Err(TrazarError::invalid_model(format!(
                        "{ctx} writes a flag into non-boolean variable `{}`",
                        var.name
                    )));
                }
            }
            EffectOp::Add { .. } | EffectOp::AddClamped { .. } | EffectOp::AddOnMatch { .. } => {
                if !matches!(
                    var.ty,
                    SemanticType::Number | SemanticType::BoundedInt { .. }
                ) {
                    return Err(TrazarError::invalid_model(format!(
                        "{ctx} adds to non-numeric variable `{}`",
                        var.name
                    )));
                }
                if matches!(effect, EffectOp::AddOnMatch { .. }) && action.comparison.is_none() {
                    return Err(TrazarError::invalid_model(format!(
                        "{ctx} uses a match-conditional effect without a comparison"
                    )));
                }
            }
            EffectOp::Append { entry, .. } => {
                if var.ty != SemanticType::Collection {
                    return Err(TrazarError::invalid_model(format!(
                        "{ctx} appends to non-collection variable `{}`",
                        var.name
                    )));
                }
                for field in entry {
                    match &field.source {
                        EntrySource::TableCell {
                            table, index_var, ..
                        } => {
                            self.require_table(table, ctx)?;
                            self.require_var(index_var, ctx)?;
                        }
                        EntrySource::MatchFlag => {
                            if action.comparison.is_none() {
                                return Err(TrazarError::invalid_model(format!(
                                    "{ctx} records a match flag without a comparison"
                                )));
                            }
                        }
                        EntrySource::Var { var } => self.require_var(var, ctx)?,
                        EntrySource::Literal { .. } => {}
                    }
                }
            }
        }
        Ok(())
    }

    fn require_var(&self, name: &str, ctx: &str) -> TrazarResult<()> {
        if self.variable(name).is_none() {
            return Err(TrazarError::invalid_model(format!(
                "{ctx} references undeclared variable `{name}`"
            )));
        }
        Ok(())
    }

    fn require_table(&self, name: &str, ctx: &str) -> TrazarResult<()> {
        if self.table(name).is_none() {
            return Err(TrazarError::invalid_model(format!(
                "{ctx} references unknown table `{name}`"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_normalize_apply() {
        let norm = Normalize {
            trim: true,
            case_fold: true,
        };
        assert_eq!(norm.apply("  PaRiS  "), "paris");

        let trim_only = Normalize {
            trim: true,
            case_fold: false,
        };
        assert_eq!(trim_only.apply("  Paris "), "Paris");

        assert_eq!(Normalize::default().apply(" x "), " x ");
    }

    #[test]
    fn test_table_cell_lookup() {
        let model = fixtures::quiz_model();
        let table = model.table("questions").unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.cell(0, "a"), Some("Paris"));
        assert_eq!(table.cell(2, "q"), Some("Largest ocean?"));
        assert_eq!(table.cell(3, "a"), None);
        assert_eq!(table.cell(-1, "a"), None);
        assert_eq!(table.cell(0, "missing"), None);
    }

    #[test]
    fn test_quiz_model_validates() {
        fixtures::quiz_model().validate().expect("quiz model is valid");
    }

    #[test]
    fn test_survey_model_validates() {
        fixtures::survey_model()
            .validate()
            .expect("survey model is valid");
    }

    #[test]
    fn test_validate_rejects_undeclared_effect_target() {
        let mut model = fixtures::quiz_model();
        model.actions[0]
            .effects
            .push(EffectOp::Clear { var: "ghost".into() });
        let err = model.validate().unwrap_err();
        assert!(err.to_string().contains("undeclared variable `ghost`"));
    }

    #[test]
    fn test_validate_rejects_match_effect_without_comparison() {
        let mut model = fixtures::quiz_model();
        let action = model.actions.iter_mut().find(|a| a.comparison.is_some()).unwrap();
        action.comparison = None;
        let err = model.validate().unwrap_err();
        assert!(err.to_string().contains("without a comparison"));
    }

    #[test]
    fn test_validate_rejects_out_of_bounds_initial() {
        let mut model = fixtures::survey_model();
        let rating = model.variables.iter_mut().find(|v| v.name == "rating").unwrap();
        rating.initial = Value::Int(9);
        let err = model.validate().unwrap_err();
        assert!(err.to_string().contains("outside [1, 5]"));
    }

    #[test]
    fn test_validate_rejects_empty_views() {
        let mut model = fixtures::quiz_model();
        model.views.clear();
        model.actions.clear();
        let err = model.validate().unwrap_err();
        assert!(err.to_string().contains("no view branches"));
    }

    #[test]
    fn test_guard_reads() {
        let guard = Guard::AllNonEmptyTrimmed {
            vars: vec!["name".into(), "feedback".into()],
        };
        assert_eq!(guard.reads(), vec!["name", "feedback"]);
        assert!(guard.is_conditional());
        assert!(!Guard::Always.is_conditional());
    }

    #[test]
    fn test_model_round_trips_through_json() {
        let model = fixtures::quiz_model();
        let json = serde_json::to_string(&model).unwrap();
        let back: BehavioralModel = serde_json::from_str(&json).unwrap();
        assert_eq!(model, back);
    }
}
