//! Behavior extraction: component source → behavioral model.
//!
//! Parses React-style function components (`useState` hooks, handler
//! arrows, conditional JSX) into the typed model the rest of the pipeline
//! consumes. Recognition is idiom-driven: fixed data tables, min/max clamps,
//! trim/case-fold normalization, append-only accumulators, non-empty guards.
//! State mutation that cannot be traced to declared variables is an
//! extraction error — reported, never guessed.

mod idioms;
mod jsx;

use crate::model::{
    Action, BehavioralModel, DataTable, EffectOp, Guard, SemanticType, StateVariable, Value,
    ViewBranch,
};
use crate::result::{TrazarError, TrazarResult};
use idioms::{collapse, quoted, split_top_level, HandlerAnalysis, HandlerKind, Idioms};
use jsx::{JsxPatterns, Wire};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Idiom switches. All recognized idioms are on by default; disabling one
/// makes components that use it fail extraction instead of being guessed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Detect `Math.max`/`Math.min` clamp composition as bounded integers
    pub bounded_clamp: bool,
    /// Detect trim/case-fold applied before comparison
    pub normalize_on_compare: bool,
    /// Detect append-only collection state
    pub accumulator_collections: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            bounded_clamp: true,
            normalize_on_compare: true,
            accumulator_collections: true,
        }
    }
}

/// Name maps shared by the idiom recognizers: setters, record fields, and
/// declared variables.
#[derive(Debug, Clone, Default)]
pub(crate) struct SourceMaps {
    setters: BTreeMap<String, SetterTarget>,
    records: BTreeMap<String, Vec<String>>,
    variables: BTreeSet<String>,
}

#[derive(Debug, Clone)]
enum SetterTarget {
    Var(String),
    Record(String),
}

impl SourceMaps {
    pub(crate) fn add_var_setter(&mut self, setter: &str, var: &str) {
        self.setters
            .insert(setter.to_string(), SetterTarget::Var(var.to_string()));
        self.variables.insert(var.to_string());
    }

    pub(crate) fn add_record_setter(&mut self, setter: &str, record: &str, fields: &[&str]) {
        self.setters
            .insert(setter.to_string(), SetterTarget::Record(record.to_string()));
        self.records.insert(
            record.to_string(),
            fields.iter().map(|f| (*f).to_string()).collect(),
        );
        for field in fields {
            self.variables.insert((*field).to_string());
        }
    }

    pub(crate) fn var_of_setter(&self, setter: &str) -> Option<String> {
        match self.setters.get(setter) {
            Some(SetterTarget::Var(var)) => Some(var.clone()),
            _ => None,
        }
    }

    pub(crate) fn record_of_setter(&self, setter: &str) -> Option<&str> {
        match self.setters.get(setter) {
            Some(SetterTarget::Record(record)) => Some(record.as_str()),
            _ => None,
        }
    }

    /// Resolve a source reference to a model variable name:
    /// `formData.name` and `prev.rating` resolve to the flattened field.
    pub(crate) fn resolve(&self, reference: &str) -> String {
        reference
            .rsplit('.')
            .next()
            .unwrap_or(reference)
            .to_string()
    }

    pub(crate) fn is_state_ref(&self, reference: &str) -> bool {
        self.variables.contains(&self.resolve(reference))
    }
}

/// Index of the bracket matching the one at `open_idx`, respecting quoted
/// strings.
pub(crate) fn matching_bracket(s: &str, open_idx: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0i32;
    let mut in_str: Option<char> = None;
    for (i, c) in s[open_idx..].char_indices() {
        match in_str {
            Some(q) => {
                if c == q {
                    in_str = None;
                }
            }
            None => {
                if c == '\'' || c == '"' {
                    in_str = Some(c);
                } else if c == open {
                    depth += 1;
                } else if c == close {
                    depth -= 1;
                    if depth == 0 {
                        return Some(open_idx + i);
                    }
                }
            }
        }
    }
    None
}

/// Index of the `>` closing the tag opened at `at`, respecting embedded
/// `{...}` attribute expressions and quoted strings.
pub(crate) fn tag_end(s: &str, at: usize) -> Option<usize> {
    let mut depth = 0i32;
    let mut in_str: Option<char> = None;
    for (i, c) in s[at..].char_indices() {
        match in_str {
            Some(q) => {
                if c == q {
                    in_str = None;
                }
            }
            None => match c {
                '\'' | '"' => in_str = Some(c),
                '{' => depth += 1,
                '}' => depth -= 1,
                '>' if depth == 0 && i > 0 => return Some(at + i),
                _ => {}
            },
        }
    }
    None
}

/// One `const name = (params) => { body }` declaration.
#[derive(Debug, Clone)]
struct ArrowDecl {
    name: String,
    body: String,
}

/// Extracts behavioral models from component source.
pub struct Extractor {
    config: ExtractorConfig,
    arrow: Regex,
    use_state: Regex,
    table_decl: Regex,
    export_default: Regex,
    field_pair: Regex,
    target_destructure: Regex,
    int_literal: Regex,
}

impl Extractor {
    /// Create an extractor with the given idiom configuration.
    pub fn new(config: ExtractorConfig) -> Self {
        let re = |pattern: &str| Regex::new(pattern).expect("static extraction pattern");
        Self {
            config,
            arrow: re(r"const\s+(\w+)\s*=\s*\(([^)]*)\)\s*=>\s*(\{)"),
            use_state: re(r"const\s*\[\s*(\w+)\s*,\s*(\w+)\s*\]\s*=\s*useState\s*(\()"),
            table_decl: re(r"const\s+(\w+)\s*=\s*(\[)"),
            export_default: re(r"export\s+default\s+(\w+)"),
            field_pair: re(r"^(\w+)\s*:\s*(.+)$"),
            target_destructure: re(r"const\s*\{[^}]*\}\s*=\s*\w+\.target\s*;"),
            int_literal: re(r"^-?\d+$"),
        }
    }

    /// Extract the behavioral model of the component in `source`.
    pub fn extract(&self, source: &str) -> TrazarResult<BehavioralModel> {
        let (component, body) = self.find_component(source)?;
        tracing::debug!(component = %component, "extracting behavioral model");

        let mut maps = SourceMaps::default();
        let tables = self.extract_tables(&body)?;
        let mut variables = self.extract_state(&body, &mut maps)?;
        let handlers = self.extract_handlers(&body, &maps)?;

        let return_body = self.find_return(&body, &component)?;
        let scan = JsxPatterns::new().scan(&collapse(&return_body), &maps)?;

        let (actions, clamps) = self.assemble_actions(&scan, &handlers)?;
        for (var, (min, max)) in clamps {
            let Some(v) = variables.iter_mut().find(|v| v.name == var) else {
                return Err(TrazarError::extraction(format!(
                    "clamp targets undeclared variable `{var}`"
                )));
            };
            v.ty = SemanticType::BoundedInt { min, max };
        }

        let views = scan
            .branches
            .into_iter()
            .map(|b| ViewBranch {
                name: b.name,
                when: b.predicate,
                observables: b.observables,
            })
            .collect();

        let model = BehavioralModel {
            component,
            variables,
            tables,
            actions,
            views,
        };
        model.validate()?;
        tracing::debug!(
            variables = model.variables.len(),
            actions = model.actions.len(),
            views = model.views.len(),
            "model extracted"
        );
        Ok(model)
    }

    /// The component declaration: exported arrow, or the first arrow that
    /// renders something.
    fn find_component(&self, source: &str) -> TrazarResult<(String, String)> {
        let exported = self
            .export_default
            .captures(source)
            .map(|caps| caps[1].to_string());
        let arrows = self.arrows_in(source)?;

        let component = arrows
            .into_iter()
            .find(|arrow| match &exported {
                Some(name) => &arrow.name == name,
                None => arrow.body.contains("return ("),
            })
            .ok_or_else(|| TrazarError::extraction("no component declaration found"))?;
        Ok((component.name, component.body))
    }

    /// All `const name = (...) => { ... }` declarations in a region.
    fn arrows_in(&self, region: &str) -> TrazarResult<Vec<ArrowDecl>> {
        let mut arrows = Vec::new();
        for caps in self.arrow.captures_iter(region) {
            let brace = caps.get(3).unwrap().start();
            let close = matching_bracket(region, brace, '{', '}').ok_or_else(|| {
                TrazarError::extraction(format!("unbalanced body for `{}`", &caps[1]))
            })?;
            arrows.push(ArrowDecl {
                name: caps[1].to_string(),
                body: region[brace + 1..close].to_string(),
            });
        }
        Ok(arrows)
    }

    /// Fixed data tables: `const name = [ { col: 'text', ... }, ... ]`.
    fn extract_tables(&self, body: &str) -> TrazarResult<Vec<DataTable>> {
        let mut tables = Vec::new();
        for caps in self.table_decl.captures_iter(body) {
            let name = caps[1].to_string();
            let open = caps.get(2).unwrap().start();
            let close = matching_bracket(body, open, '[', ']').ok_or_else(|| {
                TrazarError::extraction(format!("unbalanced table literal `{name}`"))
            })?;
            let inner = &body[open + 1..close];

            let mut columns: Vec<String> = Vec::new();
            let mut rows = Vec::new();
            for raw in split_top_level(&collapse(inner), ',') {
                let raw = raw.trim();
                if raw.is_empty() {
                    continue;
                }
                let row_body = raw
                    .strip_prefix('{')
                    .and_then(|r| r.strip_suffix('}'))
                    .ok_or_else(|| {
                        TrazarError::extraction(format!(
                            "table `{name}` holds a non-record row `{raw}`"
                        ))
                    })?;
                let mut row = BTreeMap::new();
                for pair in split_top_level(row_body, ',') {
                    let pair = pair.trim();
                    if pair.is_empty() {
                        continue;
                    }
                    let caps = self.field_pair.captures(pair).ok_or_else(|| {
                        TrazarError::extraction(format!(
                            "table `{name}` holds untraceable cell `{pair}`"
                        ))
                    })?;
                    let column = caps[1].to_string();
                    let text = quoted(&caps[2]).ok_or_else(|| {
                        TrazarError::extraction(format!(
                            "table `{name}` cell `{column}` is not a text literal"
                        ))
                    })?;
                    if !columns.iter().any(|c| c == &column) {
                        columns.push(column.clone());
                    }
                    row.insert(column, text);
                }
                rows.push(row);
            }
            tables.push(DataTable {
                name,
                columns,
                rows,
            });
        }
        Ok(tables)
    }

    /// `useState` declarations, with record state flattened field by field.
    fn extract_state(
        &self,
        body: &str,
        maps: &mut SourceMaps,
    ) -> TrazarResult<Vec<StateVariable>> {
        let mut variables = Vec::new();
        for caps in self.use_state.captures_iter(body) {
            let name = caps[1].to_string();
            let setter = caps[2].to_string();
            let open = caps.get(3).unwrap().start();
            let close = matching_bracket(body, open, '(', ')').ok_or_else(|| {
                TrazarError::extraction(format!("unbalanced useState for `{name}`"))
            })?;
            let init = collapse(&body[open + 1..close]);
            let init = init.trim();

            if init.starts_with('{') {
                let record_body = init
                    .strip_prefix('{')
                    .and_then(|r| r.strip_suffix('}'))
                    .ok_or_else(|| {
                        TrazarError::extraction(format!(
                            "untraceable initial state for `{name}`"
                        ))
                    })?;
                let mut fields = Vec::new();
                for pair in split_top_level(record_body, ',') {
                    let pair = pair.trim();
                    if pair.is_empty() {
                        continue;
                    }
                    let caps = self.field_pair.captures(pair).ok_or_else(|| {
                        TrazarError::extraction(format!(
                            "untraceable field `{pair}` in state `{name}`"
                        ))
                    })?;
                    let field = caps[1].to_string();
                    let (ty, initial) = self.classify_initial(&caps[2], &field)?;
                    variables.push(StateVariable {
                        name: field.clone(),
                        ty,
                        initial,
                    });
                    fields.push(field);
                }
                let field_refs: Vec<&str> = fields.iter().map(String::as_str).collect();
                maps.add_record_setter(&setter, &name, &field_refs);
            } else {
                let (ty, initial) = self.classify_initial(init, &name)?;
                variables.push(StateVariable {
                    name: name.clone(),
                    ty,
                    initial,
                });
                maps.add_var_setter(&setter, &name);
            }
        }
        if variables.is_empty() {
            return Err(TrazarError::extraction(
                "component declares no traceable state variables",
            ));
        }
        Ok(variables)
    }

    /// Semantic type and initial value of one `useState` initializer.
    fn classify_initial(&self, init: &str, name: &str) -> TrazarResult<(SemanticType, Value)> {
        let init = init.trim();
        if let Some(text) = quoted(init) {
            return Ok((SemanticType::Text, Value::Text(text)));
        }
        if self.int_literal.is_match(init) {
            let n: i64 = init.parse().map_err(|_| {
                TrazarError::extraction(format!("numeric initial for `{name}` out of range"))
            })?;
            return Ok((SemanticType::Number, Value::Int(n)));
        }
        if init == "true" || init == "false" {
            return Ok((SemanticType::Boolean, Value::Bool(init == "true")));
        }
        if init == "[]" {
            return Ok((SemanticType::Collection, Value::List(Vec::new())));
        }
        Err(TrazarError::extraction(format!(
            "untraceable initial state `{init}` for `{name}`"
        )))
    }

    /// Analyze every handler arrow declared inside the component body.
    fn extract_handlers(
        &self,
        body: &str,
        maps: &SourceMaps,
    ) -> TrazarResult<BTreeMap<String, HandlerAnalysis>> {
        let idioms = Idioms::new();
        let mut handlers = BTreeMap::new();
        for arrow in self.arrows_in(body)? {
            let handler_body = self.target_destructure.replace_all(&arrow.body, "");
            let analysis =
                idioms.analyze_handler(&arrow.name, &handler_body, maps, &self.config)?;
            handlers.insert(arrow.name, analysis);
        }
        Ok(handlers)
    }

    /// The `return ( ... )` render body.
    fn find_return(&self, body: &str, component: &str) -> TrazarResult<String> {
        let at = body.find("return (").ok_or_else(|| {
            TrazarError::extraction(format!("component `{component}` renders nothing"))
        })?;
        let open = at + "return ".len();
        let close = matching_bracket(body, open, '(', ')').ok_or_else(|| {
            TrazarError::extraction(format!("unbalanced render body in `{component}`"))
        })?;
        Ok(body[open + 1..close].to_string())
    }

    /// Turn the scanned wiring into model actions. Returns the actions plus
    /// the clamp bounds to upgrade onto their variables.
    fn assemble_actions(
        &self,
        scan: &jsx::JsxScan,
        handlers: &BTreeMap<String, HandlerAnalysis>,
    ) -> TrazarResult<(Vec<Action>, BTreeMap<String, (i64, i64)>)> {
        let mut actions: Vec<Action> = Vec::new();
        let mut clamps = BTreeMap::new();

        for branch in &scan.branches {
            for wire in &branch.wires {
                match wire {
                    Wire::Input { var, handler } => {
                        if let Some(name) = handler {
                            self.check_field_setter(name, var, handlers)?;
                        }
                        let name = format!("set-{var}");
                        if actions.iter().any(|a| a.name == name) {
                            continue;
                        }
                        actions.push(Action {
                            name,
                            branch: branch.name.clone(),
                            trigger: None,
                            input: Some(var.clone()),
                            reads: Vec::new(),
                            guard: Guard::Always,
                            comparison: None,
                            effects: vec![EffectOp::SetFromInput { var: var.clone() }],
                        });
                    }
                    Wire::Trigger {
                        handler,
                        arg,
                        label,
                    } => {
                        let analysis = handlers.get(handler).ok_or_else(|| {
                            TrazarError::extraction(format!(
                                "trigger wired to unknown handler `{handler}`"
                            ))
                        })?;
                        let action = self.trigger_action(
                            analysis,
                            &branch.name,
                            *arg,
                            label.clone(),
                            &mut clamps,
                        )?;
                        if actions.iter().any(|a| a.name == action.name) {
                            continue;
                        }
                        actions.push(action);
                    }
                }
            }
        }

        // Input variables consumed by a guarded, clearing action fold into
        // that action's parameter; their standalone setters disappear
        let consumed: BTreeSet<String> = actions
            .iter()
            .filter(|a| !a.name.starts_with("set-"))
            .filter_map(|a| a.input.clone())
            .collect();
        actions.retain(|a| {
            !(a.name.starts_with("set-")
                && a.input.as_ref().is_some_and(|var| consumed.contains(var)))
        });

        Ok((actions, clamps))
    }

    fn check_field_setter(
        &self,
        name: &str,
        var: &str,
        handlers: &BTreeMap<String, HandlerAnalysis>,
    ) -> TrazarResult<()> {
        let analysis = handlers.get(name).ok_or_else(|| {
            TrazarError::extraction(format!("input wired to unknown handler `{name}`"))
        })?;
        match &analysis.kind {
            HandlerKind::DynamicFieldSetter => Ok(()),
            HandlerKind::Effects { effects, .. }
                if effects.len() == 1
                    && matches!(&effects[0], EffectOp::SetFromInput { var: v } if v == var) =>
            {
                Ok(())
            }
            _ => Err(TrazarError::extraction(format!(
                "change handler `{name}` does more than set the bound field `{var}`"
            ))),
        }
    }

    fn trigger_action(
        &self,
        analysis: &HandlerAnalysis,
        branch: &str,
        arg: Option<i64>,
        label: Option<String>,
        clamps: &mut BTreeMap<String, (i64, i64)>,
    ) -> TrazarResult<Action> {
        match &analysis.kind {
            HandlerKind::ClampStepper { var, min, max } => {
                let delta = arg.ok_or_else(|| {
                    TrazarError::extraction(format!(
                        "clamp stepper `{}` triggered without a step argument",
                        analysis.name
                    ))
                })?;
                clamps.insert(var.clone(), (*min, *max));
                let direction = if delta >= 0 { "up" } else { "down" };
                Ok(Action {
                    name: format!("{var}-{direction}"),
                    branch: branch.to_string(),
                    trigger: label,
                    input: None,
                    reads: vec![var.clone()],
                    guard: Guard::Always,
                    comparison: None,
                    effects: vec![EffectOp::AddClamped {
                        var: var.clone(),
                        delta,
                        min: *min,
                        max: *max,
                    }],
                })
            }
            HandlerKind::Effects {
                guard,
                comparison,
                effects,
            } => {
                let input = self.consumed_input(guard, comparison.as_ref(), effects);
                let reads = self.reads_of(guard, comparison.as_ref(), effects);
                Ok(Action {
                    name: analysis.name.clone(),
                    branch: branch.to_string(),
                    trigger: label,
                    input,
                    reads,
                    guard: guard.clone(),
                    comparison: comparison.clone(),
                    effects: effects.clone(),
                })
            }
            HandlerKind::DynamicFieldSetter => Err(TrazarError::extraction(format!(
                "trigger wired to field setter `{}`",
                analysis.name
            ))),
        }
    }

    /// The variable a guarded action consumes as its input parameter: read
    /// by its guard or comparison and cleared by its effects.
    fn consumed_input(
        &self,
        guard: &Guard,
        comparison: Option<&crate::model::Comparison>,
        effects: &[EffectOp],
    ) -> Option<String> {
        let mut read: Vec<&str> = guard.reads();
        if let Some(cmp) = comparison {
            read.push(cmp.var.as_str());
        }
        read.into_iter()
            .find(|var| {
                effects
                    .iter()
                    .any(|e| matches!(e, EffectOp::Clear { var: v } if v == var))
            })
            .map(str::to_string)
    }

    fn reads_of(
        &self,
        guard: &Guard,
        comparison: Option<&crate::model::Comparison>,
        effects: &[EffectOp],
    ) -> Vec<String> {
        let mut reads: Vec<String> = Vec::new();
        let mut push = |name: &str| {
            if !reads.iter().any(|r| r == name) {
                reads.push(name.to_string());
            }
        };
        for var in guard.reads() {
            push(var);
        }
        if let Some(cmp) = comparison {
            push(&cmp.var);
            push(&cmp.index_var);
        }
        for effect in effects {
            match effect {
                EffectOp::Add { var, .. }
                | EffectOp::AddClamped { var, .. }
                | EffectOp::AddOnMatch { var, .. } => push(var),
                EffectOp::Append { collection, entry } => {
                    for field in entry {
                        match &field.source {
                            crate::model::EntrySource::TableCell { index_var, .. } => {
                                push(index_var)
                            }
                            crate::model::EntrySource::Var { var } => push(var),
                            _ => {}
                        }
                    }
                    push(collection);
                }
                EffectOp::SetFromInput { .. }
                | EffectOp::Clear { .. }
                | EffectOp::SetBool { .. } => {}
            }
        }
        reads
    }
}

/// Extract a behavioral model with the given configuration.
pub fn extract_model(source: &str, config: &ExtractorConfig) -> TrazarResult<BehavioralModel> {
    Extractor::new(*config).extract(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Comparison, Normalize, ViewPredicate};

    const QUIZ_SOURCE: &str = include_str!("../../tests/components/quiz_game.jsx");
    const SURVEY_SOURCE: &str = include_str!("../../tests/components/survey_form.jsx");

    fn extract(source: &str) -> BehavioralModel {
        extract_model(source, &ExtractorConfig::default()).expect("extract")
    }

    #[test]
    fn test_quiz_state_variables() {
        let model = extract(QUIZ_SOURCE);
        assert_eq!(model.component, "QuizGameWidget");

        let names: Vec<_> = model.variables.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["index", "answer", "score", "history"]);
        assert_eq!(
            model.variable("history").unwrap().ty,
            SemanticType::Collection
        );
        assert_eq!(
            model.variable("answer").unwrap().initial,
            Value::Text(String::new())
        );
    }

    #[test]
    fn test_quiz_data_table() {
        let model = extract(QUIZ_SOURCE);
        let table = model.table("questions").unwrap();
        assert_eq!(table.columns, vec!["q", "a"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.cell(1, "a"), Some("6"));
    }

    #[test]
    fn test_quiz_submit_action() {
        let model = extract(QUIZ_SOURCE);
        assert_eq!(model.actions.len(), 1);
        let submit = model.action("submitAnswer").unwrap();

        assert_eq!(submit.branch, "questions");
        assert_eq!(submit.trigger.as_deref(), Some("Submit"));
        assert_eq!(submit.input.as_deref(), Some("answer"));
        assert_eq!(
            submit.guard,
            Guard::NonEmptyTrimmed {
                var: "answer".into()
            }
        );
        assert_eq!(
            submit.comparison,
            Some(Comparison {
                var: "answer".into(),
                table: "questions".into(),
                index_var: "index".into(),
                column: "a".into(),
                normalize: Normalize {
                    trim: true,
                    case_fold: true
                },
            })
        );
        assert_eq!(submit.effects.len(), 4);
    }

    #[test]
    fn test_quiz_views() {
        let model = extract(QUIZ_SOURCE);
        assert_eq!(model.views.len(), 2);
        assert_eq!(model.views[0].name, "questions");
        assert_eq!(
            model.views[0].when,
            ViewPredicate::IndexWithinTable {
                var: "index".into(),
                table: "questions".into()
            }
        );
        assert_eq!(model.views[1].name, "otherwise");

        let summary = &model.views[1];
        assert!(summary
            .observables
            .iter()
            .any(|o| o.target() == "template.score"));
        assert!(summary
            .observables
            .iter()
            .any(|o| o.target() == "list.history"));
    }

    #[test]
    fn test_survey_record_state_is_flattened_and_clamped() {
        let model = extract(SURVEY_SOURCE);
        assert_eq!(model.component, "SurveyFormWidget");

        let names: Vec<_> = model.variables.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["name", "age", "feedback", "rating", "submitted"]
        );
        assert_eq!(
            model.variable("rating").unwrap().ty,
            SemanticType::BoundedInt { min: 1, max: 5 }
        );
        assert_eq!(model.variable("rating").unwrap().initial, Value::Int(3));
    }

    #[test]
    fn test_survey_actions_in_render_order() {
        let model = extract(SURVEY_SOURCE);
        let names: Vec<_> = model.actions.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "set-name",
                "set-age",
                "rating-down",
                "rating-up",
                "set-feedback",
                "handleSubmit"
            ]
        );

        let submit = model.action("handleSubmit").unwrap();
        assert_eq!(
            submit.guard,
            Guard::AllNonEmptyTrimmed {
                vars: vec!["name".into(), "feedback".into(), "age".into()]
            }
        );
        assert!(submit.input.is_none());
    }

    #[test]
    fn test_survey_views_split_on_submitted_flag() {
        let model = extract(SURVEY_SOURCE);
        assert_eq!(model.views[0].name, "submitted");
        assert_eq!(
            model.views[0].when,
            ViewPredicate::Flag {
                var: "submitted".into(),
                expected: true
            }
        );
        assert!(model.views[0]
            .observables
            .iter()
            .any(|o| o.target() == "template.thank-you"));
        assert!(model.views[1]
            .observables
            .iter()
            .any(|o| o.target() == "value.rating"));
    }

    #[test]
    fn test_extracted_models_validate() {
        extract(QUIZ_SOURCE).validate().expect("quiz validates");
        extract(SURVEY_SOURCE).validate().expect("survey validates");
    }

    #[test]
    fn test_untraceable_mutation_fails_extraction() {
        let source = r"
            import React, { useState } from 'react';
            const Clock = () => {
                const [now, setNow] = useState(0);
                const tick = () => { setNow(Date.now()); };
                return (
                    <div>
                        <button onClick={tick}>Tick</button>
                    </div>
                );
            };
            export default Clock;
        ";
        let err = extract_model(source, &ExtractorConfig::default()).unwrap_err();
        assert!(matches!(err, TrazarError::Extraction { .. }));
        assert!(err.to_string().contains("untraceable"));
    }

    #[test]
    fn test_missing_component_fails_extraction() {
        let err = extract_model("const x = 1;", &ExtractorConfig::default()).unwrap_err();
        assert!(err.to_string().contains("no component declaration"));
    }

    #[test]
    fn test_disabled_accumulator_idiom_is_reported() {
        let config = ExtractorConfig {
            accumulator_collections: false,
            ..ExtractorConfig::default()
        };
        let err = extract_model(QUIZ_SOURCE, &config).unwrap_err();
        assert!(err.to_string().contains("accumulator"));
    }
}
