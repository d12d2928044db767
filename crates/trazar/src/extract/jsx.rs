//! Render-tree scanning: conditional branches, observables, and the wiring
//! of inputs and action triggers.
//!
//! Works on the whitespace-collapsed `return (...)` body. The scanner walks
//! the markup element by element; every embedded `{...}` expression must be
//! consumed by a recognized pattern, otherwise extraction fails — render
//! behavior is never guessed.

use super::{matching_bracket, tag_end, SourceMaps};
use crate::model::{
    ItemPart, ItemStyle, ItemTemplate, Observable, TextPart, ViewPredicate,
};
use crate::result::{TrazarError, TrazarResult};
use regex::Regex;

/// An input binding or an action trigger, in render order.
#[derive(Debug, Clone)]
pub(crate) enum Wire {
    /// A value-bound input field
    Input {
        /// Bound state variable
        var: String,
        /// Named change handler, when not an inline setter
        handler: Option<String>,
    },
    /// A clickable trigger
    Trigger {
        /// Handler name
        handler: String,
        /// Literal call-site argument, for parameterized handlers
        arg: Option<i64>,
        /// Button label
        label: Option<String>,
    },
}

/// One scanned render branch.
#[derive(Debug, Clone)]
pub(crate) struct BranchScan {
    pub name: String,
    pub predicate: ViewPredicate,
    pub observables: Vec<Observable>,
    pub wires: Vec<Wire>,
}

/// The scanned render tree of one component.
#[derive(Debug, Clone)]
pub(crate) struct JsxScan {
    pub branches: Vec<BranchScan>,
}

/// Compiled render patterns.
pub(crate) struct JsxPatterns {
    ternary_open: Regex,
    map_open: Regex,
    index_predicate: Regex,
    flag_predicate: Regex,
    expr_token: Regex,
    table_lookup_expr: Regex,
    table_len_expr: Regex,
    var_expr: Regex,
    glyph_expr: Regex,
    item_field_expr: Regex,
    li_style: Regex,
    li_content: Regex,
    attr_value: Regex,
    attr_on_change_named: Regex,
    attr_on_change_inline: Regex,
    attr_on_click_named: Regex,
    attr_on_click_call: Regex,
    attr_on_submit: Regex,
    attr_type_submit: Regex,
    strip_tags: Regex,
}

impl JsxPatterns {
    pub(crate) fn new() -> Self {
        let re = |pattern: &str| Regex::new(pattern).expect("static render pattern");
        Self {
            ternary_open: re(r"\{\s*([^{}?]+?)\s*\?\s*\("),
            map_open: re(r"^\{\s*([\w.]+)\.map\s*(\()"),
            index_predicate: re(r"^([\w.]+)\s*<\s*(\w+)\.length$"),
            flag_predicate: re(r"^(!?)([\w.]+)$"),
            expr_token: re(r"\{([^{}]+)\}"),
            table_lookup_expr: re(r"^(\w+)\[(\w+)\]\.(\w+)$"),
            table_len_expr: re(r"^(\w+)\.length$"),
            var_expr: re(r"^[\w.]+$"),
            glyph_expr: re(r"^(\w+)\.(\w+)\s*\?\s*'([^']*)'\s*:\s*'([^']*)'$"),
            item_field_expr: re(r"^(\w+)\.(\w+)$"),
            li_style: re(r"color:\s*(\w+)\.(\w+)\s*\?\s*'([^']*)'\s*:\s*'([^']*)'"),
            li_content: re(r"<li\b[^>]*?>(.*)</li>"),
            attr_value: re(r"\bvalue=\{([\w.]+)\}"),
            attr_on_change_named: re(r"\bonChange=\{(\w+)\}"),
            attr_on_change_inline: re(r"\bonChange=\{\(?\w+\)?\s*=>\s*(\w+)\(\w+\.target\.value\)\}"),
            attr_on_click_named: re(r"\bonClick=\{(\w+)\}"),
            attr_on_click_call: re(r"\bonClick=\{\(\)\s*=>\s*(\w+)\(([^)]*)\)\}"),
            attr_on_submit: re(r"\bonSubmit=\{(\w+)\}"),
            attr_type_submit: re(r#"\btype="submit""#),
            strip_tags: re(r"</?[a-zA-Z][^>]*>"),
        }
    }

    /// Scan a collapsed `return (...)` body into render branches.
    pub(crate) fn scan(&self, body: &str, maps: &SourceMaps) -> TrazarResult<JsxScan> {
        if let Some(caps) = self.ternary_open.captures(body) {
            let whole = caps.get(0).unwrap();
            let condition = caps[1].trim().to_string();

            let then_open = whole.end() - 1;
            let then_close = matching_bracket(body, then_open, '(', ')').ok_or_else(|| {
                TrazarError::extraction("unbalanced conditional render branch")
            })?;
            let rest = &body[then_close + 1..];
            let else_rel = rest.find('(').ok_or_else(|| {
                TrazarError::extraction("conditional render without an else branch")
            })?;
            if !rest[..else_rel].trim_start().starts_with(':') {
                return Err(TrazarError::extraction(
                    "conditional render without an else branch",
                ));
            }
            let else_open = then_close + 1 + else_rel;
            let else_close = matching_bracket(body, else_open, '(', ')').ok_or_else(|| {
                TrazarError::extraction("unbalanced conditional render branch")
            })?;
            let expr_end = body[else_close..].find('}').map(|i| else_close + i).ok_or_else(
                || TrazarError::extraction("unterminated conditional render expression"),
            )?;

            let outer = format!(
                "{} {}",
                &body[..whole.start()],
                &body[expr_end + 1..]
            );
            let then_chunk = &body[then_open + 1..then_close];
            let else_chunk = &body[else_open + 1..else_close];

            let (predicate, then_name) = self.parse_predicate(&condition, maps)?;
            let shared = self.scan_chunk(&outer, maps)?;
            let then_scan = self.scan_chunk(then_chunk, maps)?;
            let else_scan = self.scan_chunk(else_chunk, maps)?;

            let merge = |scan: ChunkScan, name: String, predicate: ViewPredicate| BranchScan {
                name,
                predicate,
                observables: shared
                    .observables
                    .iter()
                    .cloned()
                    .chain(scan.observables)
                    .collect(),
                wires: shared.wires.iter().cloned().chain(scan.wires).collect(),
            };
            Ok(JsxScan {
                branches: vec![
                    merge(then_scan, then_name, predicate),
                    merge(else_scan, "otherwise".into(), ViewPredicate::Otherwise),
                ],
            })
        } else {
            let scan = self.scan_chunk(body, maps)?;
            Ok(JsxScan {
                branches: vec![BranchScan {
                    name: "main".into(),
                    predicate: ViewPredicate::Otherwise,
                    observables: scan.observables,
                    wires: scan.wires,
                }],
            })
        }
    }

    fn parse_predicate(
        &self,
        condition: &str,
        maps: &SourceMaps,
    ) -> TrazarResult<(ViewPredicate, String)> {
        if let Some(caps) = self.index_predicate.captures(condition) {
            let table = caps[2].to_string();
            return Ok((
                ViewPredicate::IndexWithinTable {
                    var: maps.resolve(&caps[1]),
                    table: table.clone(),
                },
                table,
            ));
        }
        if let Some(caps) = self.flag_predicate.captures(condition) {
            let var = maps.resolve(&caps[2]);
            let expected = caps[1].is_empty();
            return Ok((
                ViewPredicate::Flag {
                    var: var.clone(),
                    expected,
                },
                var,
            ));
        }
        Err(TrazarError::extraction(format!(
            "unrecognized render condition `{condition}`"
        )))
    }

    /// Walk one markup chunk element by element.
    fn scan_chunk(&self, chunk: &str, maps: &SourceMaps) -> TrazarResult<ChunkScan> {
        let mut scan = ChunkScan::default();
        let mut submit_handler: Option<String> = None;
        let mut pos = 0;

        while pos < chunk.len() {
            let rest = &chunk[pos..];
            let Some(offset) = rest.find(['<', '{']) else {
                break;
            };
            let at = pos + offset;

            if chunk[at..].starts_with('{') {
                pos = self.scan_expression(chunk, at, maps, &mut scan)?;
                continue;
            }
            pos = self.scan_element(chunk, at, maps, &mut scan, &mut submit_handler)?;
        }
        Ok(scan)
    }

    /// A top-level `{...}` block: only collection `.map` renders are
    /// recognized here.
    fn scan_expression(
        &self,
        chunk: &str,
        at: usize,
        maps: &SourceMaps,
        scan: &mut ChunkScan,
    ) -> TrazarResult<usize> {
        let rest = &chunk[at..];
        let Some(caps) = self.map_open.captures(rest) else {
            let snippet: String = rest.chars().take(40).collect();
            return Err(TrazarError::extraction(format!(
                "unrecognized render expression `{snippet}`"
            )));
        };
        let var = maps.resolve(&caps[1]);
        let paren = at + caps.get(2).unwrap().start();
        let close = matching_bracket(chunk, paren, '(', ')')
            .ok_or_else(|| TrazarError::extraction("unbalanced collection render"))?;
        let end = chunk[close..]
            .find('}')
            .map(|i| close + i)
            .ok_or_else(|| TrazarError::extraction("unterminated collection render"))?;

        let callback = &chunk[paren + 1..close];
        let item = self.parse_item_template(callback)?;
        scan.observables.push(Observable::CollectionList {
            target: format!("list.{var}"),
            var,
            item,
        });
        Ok(end + 1)
    }

    /// Parse the `(item, idx) => (<li …>…</li>)` callback of a collection
    /// render into a per-item template.
    fn parse_item_template(&self, callback: &str) -> TrazarResult<ItemTemplate> {
        let content = self
            .li_content
            .captures(callback)
            .ok_or_else(|| {
                TrazarError::extraction("collection render without a recognized list item")
            })?
            .get(1)
            .unwrap()
            .as_str()
            .trim()
            .to_string();

        let style = self.li_style.captures(callback).map(|caps| ItemStyle {
            field: caps[2].to_string(),
            when_true: caps[3].to_string(),
            when_false: caps[4].to_string(),
        });

        let mut parts = Vec::new();
        let mut cursor = 0;
        for token in self.expr_token.captures_iter(&content) {
            let whole = token.get(0).unwrap();
            let lit = &content[cursor..whole.start()];
            if !lit.is_empty() {
                parts.push(ItemPart::Lit {
                    text: lit.to_string(),
                });
            }
            cursor = whole.end();

            let expr = token[1].trim().to_string();
            if let Some(glyph) = self.glyph_expr.captures(&expr) {
                parts.push(ItemPart::FlagGlyph {
                    field: glyph[2].to_string(),
                    when_true: glyph[3].to_string(),
                    when_false: glyph[4].to_string(),
                });
            } else if let Some(field) = self.item_field_expr.captures(&expr) {
                parts.push(ItemPart::Field {
                    field: field[2].to_string(),
                });
            } else {
                return Err(TrazarError::extraction(format!(
                    "unrecognized list item expression `{expr}`"
                )));
            }
        }
        let tail = &content[cursor..];
        if !tail.is_empty() {
            parts.push(ItemPart::Lit {
                text: tail.to_string(),
            });
        }
        Ok(ItemTemplate { parts, style })
    }

    /// One element starting at `<`.
    fn scan_element(
        &self,
        chunk: &str,
        at: usize,
        maps: &SourceMaps,
        scan: &mut ChunkScan,
        submit_handler: &mut Option<String>,
    ) -> TrazarResult<usize> {
        let rest = &chunk[at..];
        if rest.starts_with("</") {
            // Closing tag or fragment close
            let end = rest
                .find('>')
                .ok_or_else(|| TrazarError::extraction("unterminated closing tag"))?;
            return Ok(at + end + 1);
        }
        if rest.starts_with("<>") {
            return Ok(at + 2);
        }

        let name_end = rest[1..]
            .find(|c: char| !c.is_alphanumeric())
            .map(|i| i + 1)
            .unwrap_or(rest.len());
        let name = rest[1..name_end].to_lowercase();
        let tag_close = tag_end(chunk, at)
            .ok_or_else(|| TrazarError::extraction(format!("unterminated `<{name}>` tag")))?;
        let tag_text = &chunk[at..=tag_close];
        let self_closing = tag_text.ends_with("/>");

        match name.as_str() {
            "input" => {
                self.scan_field(tag_text, maps, scan)?;
                Ok(tag_close + 1)
            }
            "textarea" => {
                self.scan_field(tag_text, maps, scan)?;
                if self_closing {
                    Ok(tag_close + 1)
                } else {
                    let close = chunk[tag_close..].find("</textarea>").map(|i| {
                        tag_close + i + "</textarea>".len()
                    });
                    Ok(close.unwrap_or(tag_close + 1))
                }
            }
            "button" => {
                let (content, end) = element_content(chunk, tag_close, "button")?;
                self.scan_button(tag_text, &content, submit_handler, scan)?;
                Ok(end)
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "p" | "label" => {
                let (content, end) = element_content(chunk, tag_close, &name)?;
                if let Some(obs) = self.text_observable(&content, maps)? {
                    scan.observables.push(obs);
                }
                Ok(end)
            }
            "span" => {
                let (content, end) = element_content(chunk, tag_close, "span")?;
                let trimmed = content.trim();
                if let Some(caps) = self.expr_token.captures(trimmed) {
                    if caps.get(0).unwrap().as_str() == trimmed
                        && self.var_expr.is_match(caps[1].trim())
                    {
                        let var = maps.resolve(caps[1].trim());
                        scan.observables.push(Observable::VarValue {
                            target: format!("value.{var}"),
                            var,
                        });
                        return Ok(end);
                    }
                }
                if let Some(obs) = self.text_observable(&content, maps)? {
                    scan.observables.push(obs);
                }
                Ok(end)
            }
            "form" => {
                if let Some(caps) = self.attr_on_submit.captures(tag_text) {
                    *submit_handler = Some(caps[1].to_string());
                }
                Ok(tag_close + 1)
            }
            _ => Ok(tag_close + 1),
        }
    }

    /// A value-bound input or textarea.
    fn scan_field(
        &self,
        tag_text: &str,
        maps: &SourceMaps,
        scan: &mut ChunkScan,
    ) -> TrazarResult<()> {
        let Some(value) = self.attr_value.captures(tag_text) else {
            return Err(TrazarError::extraction(format!(
                "input without a bound value: `{}`",
                tag_text.trim()
            )));
        };
        let var = maps.resolve(&value[1]);

        let handler = if let Some(caps) = self.attr_on_change_named.captures(tag_text) {
            Some(caps[1].to_string())
        } else if let Some(caps) = self.attr_on_change_inline.captures(tag_text) {
            let setter = &caps[1];
            let target = maps.var_of_setter(setter).ok_or_else(|| {
                TrazarError::extraction(format!(
                    "input change handler calls unknown setter `{setter}`"
                ))
            })?;
            if target != var {
                return Err(TrazarError::extraction(format!(
                    "input bound to `{var}` writes `{target}` on change"
                )));
            }
            None
        } else {
            return Err(TrazarError::extraction(format!(
                "input bound to `{var}` has no recognized change handler"
            )));
        };

        scan.observables.push(Observable::FieldValue {
            target: format!("input.{var}"),
            var: var.clone(),
        });
        scan.wires.push(Wire::Input { var, handler });
        Ok(())
    }

    fn scan_button(
        &self,
        tag_text: &str,
        content: &str,
        submit_handler: &Option<String>,
        scan: &mut ChunkScan,
    ) -> TrazarResult<()> {
        let label = {
            let text = content.trim();
            if text.is_empty() {
                None
            } else {
                Some(text.to_string())
            }
        };
        if let Some(caps) = self.attr_on_click_named.captures(tag_text) {
            scan.wires.push(Wire::Trigger {
                handler: caps[1].to_string(),
                arg: None,
                label,
            });
            return Ok(());
        }
        if let Some(caps) = self.attr_on_click_call.captures(tag_text) {
            let arg = caps[2].trim();
            let arg = if arg.is_empty() {
                None
            } else {
                Some(arg.parse::<i64>().map_err(|_| {
                    TrazarError::extraction(format!(
                        "trigger argument `{arg}` is not an integer literal"
                    ))
                })?)
            };
            scan.wires.push(Wire::Trigger {
                handler: caps[1].to_string(),
                arg,
                label,
            });
            return Ok(());
        }
        if self.attr_type_submit.is_match(tag_text) {
            let handler = submit_handler.clone().ok_or_else(|| {
                TrazarError::extraction("submit button outside a form with an onSubmit handler")
            })?;
            scan.wires.push(Wire::Trigger {
                handler,
                arg: None,
                label,
            });
            return Ok(());
        }
        Err(TrazarError::extraction(format!(
            "button without a recognized click wiring: `{}`",
            tag_text.trim()
        )))
    }

    /// A text-bearing element: literal, template, or current table cell.
    fn text_observable(
        &self,
        content: &str,
        maps: &SourceMaps,
    ) -> TrazarResult<Option<Observable>> {
        let stripped = self.strip_tags.replace_all(content, "").trim().to_string();
        if stripped.is_empty() {
            return Ok(None);
        }

        if !stripped.contains('{') {
            return Ok(Some(Observable::Literal {
                target: format!("text.{}", slug(&stripped)),
                text: stripped,
            }));
        }

        // A lone `{table[index].column}` expression is a table-cell lookup
        if let Some(caps) = self.expr_token.captures(&stripped) {
            if caps.get(0).unwrap().as_str() == stripped {
                if let Some(lookup) = self.table_lookup_expr.captures(caps[1].trim()) {
                    return Ok(Some(Observable::TableCell {
                        target: format!("{}.{}", &lookup[1], &lookup[3]),
                        table: lookup[1].to_string(),
                        index_var: maps.resolve(&lookup[2]),
                        column: lookup[3].to_string(),
                    }));
                }
            }
        }

        let mut parts = Vec::new();
        let mut cursor = 0;
        for token in self.expr_token.captures_iter(&stripped) {
            let whole = token.get(0).unwrap();
            let lit = &stripped[cursor..whole.start()];
            if !lit.is_empty() {
                parts.push(TextPart::Lit {
                    text: lit.to_string(),
                });
            }
            cursor = whole.end();

            let expr = token[1].trim().to_string();
            if let Some(caps) = self.table_len_expr.captures(&expr) {
                parts.push(TextPart::TableLen {
                    table: caps[1].to_string(),
                });
            } else if self.var_expr.is_match(&expr) {
                parts.push(TextPart::Var {
                    var: maps.resolve(&expr),
                });
            } else {
                return Err(TrazarError::extraction(format!(
                    "unrecognized render expression `{expr}`"
                )));
            }
        }
        let tail = &stripped[cursor..];
        if !tail.is_empty() {
            parts.push(TextPart::Lit {
                text: tail.to_string(),
            });
        }

        let target = parts
            .iter()
            .find_map(|p| match p {
                TextPart::Lit { text } if !slug(text).is_empty() => {
                    Some(format!("template.{}", slug(text)))
                }
                _ => None,
            })
            .or_else(|| {
                parts.iter().find_map(|p| match p {
                    TextPart::Var { var } => Some(format!("template.{var}")),
                    _ => None,
                })
            })
            .unwrap_or_else(|| "template.text".to_string());

        Ok(Some(Observable::Template { target, parts }))
    }
}

/// Chunk scan output: observables and wiring, both in render order.
#[derive(Debug, Clone, Default)]
pub(crate) struct ChunkScan {
    pub observables: Vec<Observable>,
    pub wires: Vec<Wire>,
}

/// Content between an element's open tag and its first matching close tag.
fn element_content(chunk: &str, tag_close: usize, name: &str) -> TrazarResult<(String, usize)> {
    let close_tag = format!("</{name}>");
    let start = tag_close + 1;
    let rel = chunk[start..].find(&close_tag).ok_or_else(|| {
        TrazarError::extraction(format!("unterminated `<{name}>` element"))
    })?;
    let content = chunk[start..start + rel].to_string();
    Ok((content, start + rel + close_tag.len()))
}

/// Lowercased, dash-separated slug of a text fragment.
pub(crate) fn slug(s: &str) -> String {
    let mut out = String::new();
    let mut dash = false;
    for c in s.chars() {
        if c.is_alphanumeric() {
            if dash && !out.is_empty() {
                out.push('-');
            }
            dash = false;
            out.extend(c.to_lowercase());
        } else {
            dash = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> JsxPatterns {
        JsxPatterns::new()
    }

    fn quiz_maps() -> SourceMaps {
        let mut maps = SourceMaps::default();
        maps.add_var_setter("setAnswer", "answer");
        maps.add_var_setter("setIndex", "index");
        maps
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Quick Quiz"), "quick-quiz");
        assert_eq!(slug("Quiz Complete!"), "quiz-complete");
        assert_eq!(slug("Score: "), "score");
        assert_eq!(slug("Thank you, "), "thank-you");
    }

    #[test]
    fn test_scan_splits_conditional_branches() {
        let body = "<div style={{ padding: 24 }}> <h2>Quick Quiz</h2> \
                    {index < questions.length ? ( <> <p><strong>{questions[index].q}</strong></p> \
                    <input value={answer} onChange={(e) => setAnswer(e.target.value)} \
                    placeholder=\"Your answer\" style={{ width: '100%' }} /> \
                    <button onClick={submitAnswer} style={{ marginTop: 10 }}>Submit</button> </> ) : ( \
                    <> <h3>Quiz Complete!</h3> </> )} </div>";
        let scan = patterns().scan(body, &quiz_maps()).expect("scan");

        assert_eq!(scan.branches.len(), 2);
        assert_eq!(scan.branches[0].name, "questions");
        assert_eq!(
            scan.branches[0].predicate,
            ViewPredicate::IndexWithinTable {
                var: "index".into(),
                table: "questions".into()
            }
        );
        assert_eq!(scan.branches[1].name, "otherwise");
        assert_eq!(scan.branches[1].predicate, ViewPredicate::Otherwise);

        // Shared heading lands in both branches
        for branch in &scan.branches {
            assert!(matches!(
                &branch.observables[0],
                Observable::Literal { text, .. } if text == "Quick Quiz"
            ));
        }

        let question = &scan.branches[0].observables[1];
        assert!(matches!(
            question,
            Observable::TableCell { table, column, .. } if table == "questions" && column == "q"
        ));

        assert_eq!(scan.branches[0].wires.len(), 2);
        assert!(matches!(
            &scan.branches[0].wires[0],
            Wire::Input { var, handler: None } if var == "answer"
        ));
        assert!(matches!(
            &scan.branches[0].wires[1],
            Wire::Trigger { handler, arg: None, label: Some(l) }
                if handler == "submitAnswer" && l == "Submit"
        ));
    }

    #[test]
    fn test_scan_collection_render_with_glyph_and_style() {
        let body = "<ul> {history.map((h, i) => ( <li key={i} style={{ color: h.correct ? \
                    'green' : 'red' }}> {h.question} — {h.correct ? '✅' : '❌'} </li> ))} </ul>";
        let patterns = patterns();
        let scan = patterns
            .scan_chunk(body, &SourceMaps::default())
            .expect("scan");

        assert_eq!(scan.observables.len(), 1);
        let Observable::CollectionList { target, var, item } = &scan.observables[0] else {
            panic!("expected collection observable");
        };
        assert_eq!(target, "list.history");
        assert_eq!(var, "history");
        assert_eq!(
            item.style,
            Some(ItemStyle {
                field: "correct".into(),
                when_true: "green".into(),
                when_false: "red".into()
            })
        );
        assert_eq!(item.parts.len(), 3);
        assert!(matches!(&item.parts[0], ItemPart::Field { field } if field == "question"));
        assert!(matches!(&item.parts[1], ItemPart::Lit { text } if text == " — "));
        assert!(matches!(
            &item.parts[2],
            ItemPart::FlagGlyph { field, when_true, when_false }
                if field == "correct" && when_true == "✅" && when_false == "❌"
        ));
    }

    #[test]
    fn test_scan_template_with_table_length() {
        let body = "<p>Score: {score} / {questions.length}</p>";
        let patterns = patterns();
        let scan = patterns
            .scan_chunk(body, &SourceMaps::default())
            .expect("scan");
        let Observable::Template { target, parts } = &scan.observables[0] else {
            panic!("expected template observable");
        };
        assert_eq!(target, "template.score");
        assert_eq!(parts.len(), 4);
        assert!(matches!(&parts[3], TextPart::TableLen { table } if table == "questions"));
    }

    #[test]
    fn test_submit_button_resolves_form_handler() {
        let body = "<form onSubmit={handleSubmit}> <button type=\"submit\">Submit</button> </form>";
        let patterns = patterns();
        let scan = patterns
            .scan_chunk(body, &SourceMaps::default())
            .expect("scan");
        assert!(matches!(
            &scan.wires[0],
            Wire::Trigger { handler, .. } if handler == "handleSubmit"
        ));
    }

    #[test]
    fn test_parameterized_click_argument() {
        let body = "<button type=\"button\" onClick={() => handleRatingChange(-1)}>-</button>";
        let patterns = patterns();
        let scan = patterns
            .scan_chunk(body, &SourceMaps::default())
            .expect("scan");
        assert!(matches!(
            &scan.wires[0],
            Wire::Trigger { handler, arg: Some(-1), label: Some(l) }
                if handler == "handleRatingChange" && l == "-"
        ));
    }

    #[test]
    fn test_unrecognized_expression_is_an_error() {
        let body = "<p>{compute(a, b)}</p>";
        let patterns = patterns();
        let err = patterns.scan_chunk(body, &SourceMaps::default()).unwrap_err();
        assert!(err.to_string().contains("unrecognized render expression"));
    }

    #[test]
    fn test_top_level_expression_outside_elements_is_an_error() {
        let body = "<div> {mystery} </div>";
        let patterns = patterns();
        let err = patterns.scan_chunk(body, &SourceMaps::default()).unwrap_err();
        assert!(err.to_string().contains("unrecognized render expression"));
    }
}
