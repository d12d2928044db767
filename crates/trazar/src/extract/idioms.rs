//! Handler-body idiom recognition.
//!
//! Recognizes the mutation idioms a handler body may contain (guarded
//! effects, clamped steps, dynamic field setters) and lifts them into typed
//! model constructs. Anything outside the recognized set is an extraction
//! error — untraceable behavior is reported, never guessed.

use super::{ExtractorConfig, SourceMaps};
use crate::model::{Comparison, EffectOp, EntryField, EntrySource, Guard, Normalize};
use crate::result::{TrazarError, TrazarResult};
use regex::Regex;

/// What a handler does, after analysis.
#[derive(Debug, Clone)]
pub(crate) enum HandlerKind {
    /// Ordinary guarded effect sequence
    Effects {
        /// Guard wrapped around the body, if any
        guard: Guard,
        /// Comparison bound inside the body, if any
        comparison: Option<Comparison>,
        /// Effects in statement order
        effects: Vec<EffectOp>,
    },
    /// `({ ...prev, [name]: value })` — sets whichever field the wired
    /// input names; becomes one setter action per bound input
    DynamicFieldSetter,
    /// `Math.max(lo, Math.min(hi, prev.v + delta))` — a clamped step whose
    /// delta arrives at the call site
    ClampStepper {
        /// Clamped variable
        var: String,
        /// Inclusive lower bound
        min: i64,
        /// Inclusive upper bound
        max: i64,
    },
}

/// One analyzed handler.
#[derive(Debug, Clone)]
pub(crate) struct HandlerAnalysis {
    pub name: String,
    pub kind: HandlerKind,
}

/// Compiled idiom patterns. Built once per extraction; no global state.
pub(crate) struct Idioms {
    prevent_default: Regex,
    dynamic_setter: Regex,
    clamp_outer_max: Regex,
    clamp_outer_min: Regex,
    whole_body_guard: Regex,
    guard_term: Regex,
    const_binding: Regex,
    comparison: Regex,
    table_lookup: Regex,
    conditional_set: Regex,
    setter_call: Regex,
    add_arg: Regex,
    spread_append: Regex,
    entry_field: Regex,
    input_value_arg: Regex,
}

impl Idioms {
    pub(crate) fn new() -> Self {
        let re = |pattern: &str| Regex::new(pattern).expect("static idiom pattern");
        Self {
            prevent_default: re(r"^\s*\w+\.preventDefault\(\)\s*;\s*"),
            dynamic_setter: re(
                r"^(\w+)\(\s*\(?(\w+)\)?\s*=>\s*\(\{\s*\.\.\.\w+\s*,\s*\[(\w+)\]\s*:\s*(\w+)\s*,?\s*\}\)\s*\)\s*;?\s*$",
            ),
            clamp_outer_max: re(
                r"^(\w+)\(\s*\(?(\w+)\)?\s*=>\s*\(\{\s*\.\.\.\w+\s*,\s*(\w+)\s*:\s*Math\.max\(\s*(-?\d+)\s*,\s*Math\.min\(\s*(-?\d+)\s*,\s*[\w.]+\s*\+\s*(\w+)\s*\)\s*\)\s*,?\s*\}\)\s*\)\s*;?\s*$",
            ),
            clamp_outer_min: re(
                r"^(\w+)\(\s*\(?(\w+)\)?\s*=>\s*\(\{\s*\.\.\.\w+\s*,\s*(\w+)\s*:\s*Math\.min\(\s*(-?\d+)\s*,\s*Math\.max\(\s*(-?\d+)\s*,\s*[\w.]+\s*\+\s*(\w+)\s*\)\s*\)\s*,?\s*\}\)\s*\)\s*;?\s*$",
            ),
            whole_body_guard: re(r"^if\s*\((.+?)\)\s*\{(.*)\}\s*$"),
            guard_term: re(r"^([\w.]+)\.trim\(\)(?:\s*!==\s*'')?$"),
            const_binding: re(r"^const\s+(\w+)\s*=\s*(.+)$"),
            comparison: re(
                r"^([\w.\[\]]+?)((?:\.(?:toLowerCase|toUpperCase|trim)\(\))*)\s*===\s*([\w.\[\]]+?)((?:\.(?:toLowerCase|toUpperCase|trim)\(\))*)$",
            ),
            table_lookup: re(r"^(\w+)\[(\w+)\]\.(\w+)$"),
            conditional_set: re(r"^if\s*\((\w+)\)\s*(\w+)\((.+)\)$"),
            setter_call: re(r"^(\w+)\((.*)\)$"),
            add_arg: re(r"^([\w.]+)\s*([+-])\s*(\d+)$"),
            spread_append: re(r"^\[\s*\.\.\.(\w+)\s*,\s*\{(.+)\}\s*\]$"),
            entry_field: re(r"^(\w+)(?:\s*:\s*(.+))?$"),
            input_value_arg: re(r"^\w+\.target\.value$"),
        }
    }

    /// Analyze one handler body.
    pub(crate) fn analyze_handler(
        &self,
        name: &str,
        body: &str,
        maps: &SourceMaps,
        config: &ExtractorConfig,
    ) -> TrazarResult<HandlerAnalysis> {
        let body = collapse(body);
        let body = self.prevent_default.replace(&body, "").to_string();
        let body = body.trim().trim_end_matches(';').trim();

        if let Some(caps) = self.dynamic_setter.captures(body) {
            let setter = &caps[1];
            maps.record_of_setter(setter).ok_or_else(|| {
                TrazarError::extraction(format!(
                    "handler `{name}` writes through unknown setter `{setter}`"
                ))
            })?;
            return Ok(HandlerAnalysis {
                name: name.to_string(),
                kind: HandlerKind::DynamicFieldSetter,
            });
        }

        if let Some((var, min, max)) = self.match_clamp(body, maps)? {
            if !config.bounded_clamp {
                return Err(TrazarError::extraction(format!(
                    "handler `{name}` uses the min/max clamp idiom but clamp \
                     detection is disabled"
                )));
            }
            return Ok(HandlerAnalysis {
                name: name.to_string(),
                kind: HandlerKind::ClampStepper { var, min, max },
            });
        }

        let (guard, inner) = self.split_guard(body, maps)?;
        let mut comparison: Option<(String, Comparison)> = None;
        let mut effects = Vec::new();

        for stmt in split_statements(inner) {
            if let Some(caps) = self.const_binding.captures(&stmt) {
                let binding = caps[1].to_string();
                let cmp = self.parse_comparison(name, &caps[2], maps, config)?;
                comparison = Some((binding, cmp));
                continue;
            }
            let binding = comparison.as_ref().map(|(b, _)| b.as_str());
            if let Some(caps) = self.conditional_set.captures(&stmt) {
                let cond = &caps[1];
                if binding != Some(cond) {
                    return Err(TrazarError::extraction(format!(
                        "handler `{name}` branches on `{cond}`, which is not \
                         a comparison bound in the handler"
                    )));
                }
                let effect = self.parse_setter(name, &caps[2], &caps[3], maps, config, binding)?;
                let EffectOp::Add { var, delta } = effect else {
                    return Err(TrazarError::extraction(format!(
                        "handler `{name}` conditionally applies an effect other \
                         than a counter increment"
                    )));
                };
                effects.push(EffectOp::AddOnMatch { var, delta });
                continue;
            }
            if let Some(caps) = self.setter_call.captures(&stmt) {
                let effect = self.parse_setter(name, &caps[1], &caps[2], maps, config, binding)?;
                effects.push(effect);
                continue;
            }
            return Err(TrazarError::extraction(format!(
                "handler `{name}` contains untraceable statement `{stmt}`"
            )));
        }

        Ok(HandlerAnalysis {
            name: name.to_string(),
            kind: HandlerKind::Effects {
                guard,
                comparison: comparison.map(|(_, cmp)| cmp),
                effects,
            },
        })
    }

    fn match_clamp(
        &self,
        body: &str,
        maps: &SourceMaps,
    ) -> TrazarResult<Option<(String, i64, i64)>> {
        let parsed = if let Some(caps) = self.clamp_outer_max.captures(body) {
            // Math.max(lo, Math.min(hi, ...))
            Some((caps[3].to_string(), caps[4].to_string(), caps[5].to_string()))
        } else if let Some(caps) = self.clamp_outer_min.captures(body) {
            // Math.min(hi, Math.max(lo, ...)) — reversed nesting
            Some((caps[3].to_string(), caps[5].to_string(), caps[4].to_string()))
        } else {
            None
        };
        let Some((field, lo, hi)) = parsed else {
            return Ok(None);
        };
        let var = maps.resolve(&field);
        let min: i64 = lo.parse().map_err(|_| {
            TrazarError::extraction(format!("clamp bound `{lo}` is not an integer"))
        })?;
        let max: i64 = hi.parse().map_err(|_| {
            TrazarError::extraction(format!("clamp bound `{hi}` is not an integer"))
        })?;
        Ok(Some((var, min, max)))
    }

    /// Split a whole-body `if (...) { ... }` guard from the effect sequence.
    fn split_guard(&self, body: &str, maps: &SourceMaps) -> TrazarResult<(Guard, String)> {
        let Some(caps) = self.whole_body_guard.captures(body) else {
            return Ok((Guard::Always, body.to_string()));
        };
        let cond = caps[1].trim().to_string();
        let inner = caps[2].trim().to_string();

        let terms: Vec<&str> = cond.split("&&").map(str::trim).collect();
        let mut vars = Vec::new();
        for term in &terms {
            let Some(t) = self.guard_term.captures(term) else {
                return Err(TrazarError::extraction(format!(
                    "unrecognized guard condition `{cond}`"
                )));
            };
            vars.push(maps.resolve(&t[1]));
        }
        let guard = if vars.len() == 1 {
            Guard::NonEmptyTrimmed {
                var: vars.remove(0),
            }
        } else {
            Guard::AllNonEmptyTrimmed { vars }
        };
        Ok((guard, inner))
    }

    fn parse_comparison(
        &self,
        handler: &str,
        expr: &str,
        maps: &SourceMaps,
        config: &ExtractorConfig,
    ) -> TrazarResult<Comparison> {
        let expr = expr.trim();
        let Some(caps) = self.comparison.captures(expr) else {
            return Err(TrazarError::extraction(format!(
                "handler `{handler}` binds untraceable expression `{expr}`"
            )));
        };
        let (left, left_norm, right, right_norm) = (&caps[1], &caps[2], &caps[3], &caps[4]);

        let (lookup, lookup_norm, var_side, var_norm) =
            if self.table_lookup.is_match(left) {
                (left, left_norm, right, right_norm)
            } else if self.table_lookup.is_match(right) {
                (right, right_norm, left, left_norm)
            } else {
                return Err(TrazarError::extraction(format!(
                    "handler `{handler}` compares `{left}` with `{right}`; neither \
                     side is a data-table lookup"
                )));
            };

        let caps = self.table_lookup.captures(lookup).unwrap();
        let normalize = Normalize {
            trim: lookup_norm.contains(".trim()") || var_norm.contains(".trim()"),
            case_fold: lookup_norm.contains("Case()") || var_norm.contains("Case()"),
        };
        if (normalize.trim || normalize.case_fold) && !config.normalize_on_compare {
            return Err(TrazarError::extraction(format!(
                "handler `{handler}` normalizes before comparing but \
                 normalization detection is disabled"
            )));
        }

        Ok(Comparison {
            var: maps.resolve(var_side),
            table: caps[1].to_string(),
            index_var: maps.resolve(&caps[2]),
            column: caps[3].to_string(),
            normalize,
        })
    }

    /// Parse one `setX(arg)` call into an effect.
    fn parse_setter(
        &self,
        handler: &str,
        setter: &str,
        arg: &str,
        maps: &SourceMaps,
        config: &ExtractorConfig,
        binding: Option<&str>,
    ) -> TrazarResult<EffectOp> {
        let Some(var) = maps.var_of_setter(setter) else {
            return Err(TrazarError::extraction(format!(
                "handler `{handler}` calls `{setter}`, which is not a state setter"
            )));
        };
        let arg = arg.trim();

        if arg == "''" || arg == "\"\"" {
            return Ok(EffectOp::Clear { var });
        }
        if arg == "true" || arg == "false" {
            return Ok(EffectOp::SetBool {
                var,
                value: arg == "true",
            });
        }
        if self.input_value_arg.is_match(arg) {
            return Ok(EffectOp::SetFromInput { var });
        }
        if let Some(caps) = self.add_arg.captures(arg) {
            if maps.resolve(&caps[1]) != var {
                return Err(TrazarError::extraction(format!(
                    "handler `{handler}` sets `{var}` from a different variable \
                     `{}`",
                    &caps[1]
                )));
            }
            let magnitude: i64 = caps[3].parse().map_err(|_| {
                TrazarError::extraction(format!("delta `{}` is not an integer", &caps[3]))
            })?;
            let delta = if &caps[2] == "-" { -magnitude } else { magnitude };
            return Ok(EffectOp::Add { var, delta });
        }
        if let Some(caps) = self.spread_append.captures(arg) {
            if !config.accumulator_collections {
                return Err(TrazarError::extraction(format!(
                    "handler `{handler}` appends to a collection but accumulator \
                     detection is disabled"
                )));
            }
            if maps.resolve(&caps[1]) != var {
                return Err(TrazarError::extraction(format!(
                    "handler `{handler}` spreads `{}` into `{var}`",
                    &caps[1]
                )));
            }
            let entry = self.parse_entry(handler, &caps[2], maps, binding)?;
            return Ok(EffectOp::Append {
                collection: var,
                entry,
            });
        }
        Err(TrazarError::extraction(format!(
            "handler `{handler}` sets `{var}` from untraceable expression `{arg}`"
        )))
    }

    fn parse_entry(
        &self,
        handler: &str,
        body: &str,
        maps: &SourceMaps,
        binding: Option<&str>,
    ) -> TrazarResult<Vec<EntryField>> {
        let mut fields = Vec::new();
        for raw in split_top_level(body, ',') {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let Some(caps) = self.entry_field.captures(raw) else {
                return Err(TrazarError::extraction(format!(
                    "handler `{handler}` appends untraceable record field `{raw}`"
                )));
            };
            let field = caps[1].to_string();
            let value = caps.get(2).map(|m| m.as_str().trim().to_string());
            // Shorthand `{ correct }` reads the binding named by the field
            let value = value.unwrap_or_else(|| field.clone());
            let source = if binding == Some(value.as_str()) {
                EntrySource::MatchFlag
            } else if let Some(lookup) = self.table_lookup.captures(&value) {
                EntrySource::TableCell {
                    table: lookup[1].to_string(),
                    index_var: maps.resolve(&lookup[2]),
                    column: lookup[3].to_string(),
                }
            } else if let Some(text) = quoted(&value) {
                EntrySource::Literal { text }
            } else if maps.is_state_ref(&value) {
                EntrySource::Var {
                    var: maps.resolve(&value),
                }
            } else {
                return Err(TrazarError::extraction(format!(
                    "handler `{handler}` appends untraceable record field \
                     `{field}: {value}`"
                )));
            };
            fields.push(EntryField { field, source });
        }
        Ok(fields)
    }
}

/// Collapse all whitespace runs to single spaces.
pub(crate) fn collapse(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split on a separator, ignoring separators nested in brackets or quotes.
pub(crate) fn split_top_level(s: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut in_str: Option<char> = None;
    let mut current = String::new();
    for c in s.chars() {
        match in_str {
            Some(q) => {
                current.push(c);
                if c == q {
                    in_str = None;
                }
            }
            None => match c {
                '\'' | '"' => {
                    in_str = Some(c);
                    current.push(c);
                }
                '(' | '[' | '{' => {
                    depth += 1;
                    current.push(c);
                }
                ')' | ']' | '}' => {
                    depth -= 1;
                    current.push(c);
                }
                c if c == sep && depth == 0 => {
                    parts.push(std::mem::take(&mut current));
                }
                c => current.push(c),
            },
        }
    }
    if !current.trim().is_empty() {
        parts.push(current);
    }
    parts
}

/// Statements of a collapsed handler body.
fn split_statements(body: String) -> Vec<String> {
    split_top_level(&body, ';')
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// The inner text of a single-quoted or double-quoted literal.
pub(crate) fn quoted(s: &str) -> Option<String> {
    let s = s.trim();
    for q in ['\'', '"'] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            return Some(s[1..s.len() - 1].to_string());
        }
    }
    None
}
