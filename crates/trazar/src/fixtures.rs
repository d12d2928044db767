//! Hand-built reference models used by the test suites and examples.
//!
//! These mirror the two bundled example components (a quiz game and a survey
//! form) plus a minimal bounded counter, so that the evaluation, machine,
//! scenario, and planning stages can be tested without going through source
//! extraction.

use crate::model::{
    Action, BehavioralModel, Comparison, DataTable, EffectOp, EntryField, EntrySource, Guard,
    ItemPart, ItemStyle, ItemTemplate, Normalize, Observable, SemanticType, StateVariable,
    TextPart, Value, ViewBranch, ViewPredicate,
};
use std::collections::BTreeMap;

fn row(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// Quiz game: three fixed questions, case/whitespace-insensitive matching,
/// score tally and an answer history with per-item correctness markers.
pub fn quiz_model() -> BehavioralModel {
    BehavioralModel {
        component: "QuizGameWidget".into(),
        variables: vec![
            StateVariable {
                name: "index".into(),
                ty: SemanticType::Number,
                initial: Value::Int(0),
            },
            StateVariable {
                name: "answer".into(),
                ty: SemanticType::Text,
                initial: Value::Text(String::new()),
            },
            StateVariable {
                name: "score".into(),
                ty: SemanticType::Number,
                initial: Value::Int(0),
            },
            StateVariable {
                name: "history".into(),
                ty: SemanticType::Collection,
                initial: Value::List(Vec::new()),
            },
        ],
        tables: vec![DataTable {
            name: "questions".into(),
            columns: vec!["q".into(), "a".into()],
            rows: vec![
                row(&[("q", "Capital of France?"), ("a", "Paris")]),
                row(&[("q", "2 + 2 * 2?"), ("a", "6")]),
                row(&[("q", "Largest ocean?"), ("a", "Pacific")]),
            ],
        }],
        actions: vec![Action {
            name: "submitAnswer".into(),
            branch: "questions".into(),
            trigger: Some("Submit".into()),
            input: Some("answer".into()),
            reads: vec!["answer".into(), "index".into(), "score".into(), "history".into()],
            guard: Guard::NonEmptyTrimmed {
                var: "answer".into(),
            },
            comparison: Some(Comparison {
                var: "answer".into(),
                table: "questions".into(),
                index_var: "index".into(),
                column: "a".into(),
                normalize: Normalize {
                    trim: true,
                    case_fold: true,
                },
            }),
            effects: vec![
                EffectOp::Append {
                    collection: "history".into(),
                    entry: vec![
                        EntryField {
                            field: "question".into(),
                            source: EntrySource::TableCell {
                                table: "questions".into(),
                                index_var: "index".into(),
                                column: "q".into(),
                            },
                        },
                        EntryField {
                            field: "correct".into(),
                            source: EntrySource::MatchFlag,
                        },
                    ],
                },
                EffectOp::AddOnMatch {
                    var: "score".into(),
                    delta: 1,
                },
                EffectOp::Add {
                    var: "index".into(),
                    delta: 1,
                },
                EffectOp::Clear {
                    var: "answer".into(),
                },
            ],
        }],
        views: vec![
            ViewBranch {
                name: "questions".into(),
                when: ViewPredicate::IndexWithinTable {
                    var: "index".into(),
                    table: "questions".into(),
                },
                observables: vec![
                    Observable::Literal {
                        target: "text.quick-quiz".into(),
                        text: "Quick Quiz".into(),
                    },
                    Observable::TableCell {
                        target: "questions.q".into(),
                        table: "questions".into(),
                        index_var: "index".into(),
                        column: "q".into(),
                    },
                    Observable::FieldValue {
                        target: "input.answer".into(),
                        var: "answer".into(),
                    },
                ],
            },
            ViewBranch {
                name: "otherwise".into(),
                when: ViewPredicate::Otherwise,
                observables: vec![
                    Observable::Literal {
                        target: "text.quick-quiz".into(),
                        text: "Quick Quiz".into(),
                    },
                    Observable::Literal {
                        target: "text.quiz-complete".into(),
                        text: "Quiz Complete!".into(),
                    },
                    Observable::Template {
                        target: "template.score".into(),
                        parts: vec![
                            TextPart::Lit {
                                text: "Score: ".into(),
                            },
                            TextPart::Var {
                                var: "score".into(),
                            },
                            TextPart::Lit {
                                text: " / ".into(),
                            },
                            TextPart::TableLen {
                                table: "questions".into(),
                            },
                        ],
                    },
                    Observable::CollectionList {
                        target: "list.history".into(),
                        var: "history".into(),
                        item: ItemTemplate {
                            parts: vec![
                                ItemPart::Field {
                                    field: "question".into(),
                                },
                                ItemPart::Lit {
                                    text: " — ".into(),
                                },
                                ItemPart::FlagGlyph {
                                    field: "correct".into(),
                                    when_true: "✅".into(),
                                    when_false: "❌".into(),
                                },
                            ],
                            style: Some(ItemStyle {
                                field: "correct".into(),
                                when_true: "green".into(),
                                when_false: "red".into(),
                            }),
                        },
                    },
                ],
            },
        ],
    }
}

/// Survey form: three required text fields gating submission, plus a rating
/// counter clamped to [1, 5].
pub fn survey_model() -> BehavioralModel {
    let text_var = |name: &str| StateVariable {
        name: name.into(),
        ty: SemanticType::Text,
        initial: Value::Text(String::new()),
    };
    let setter = |name: &str, var: &str| Action {
        name: name.into(),
        branch: "otherwise".into(),
        trigger: None,
        input: Some(var.into()),
        reads: vec![],
        guard: Guard::Always,
        comparison: None,
        effects: vec![EffectOp::SetFromInput { var: var.into() }],
    };
    let rating_step = |name: &str, trigger: &str, delta: i64| Action {
        name: name.into(),
        branch: "otherwise".into(),
        trigger: Some(trigger.into()),
        input: None,
        reads: vec!["rating".into()],
        guard: Guard::Always,
        comparison: None,
        effects: vec![EffectOp::AddClamped {
            var: "rating".into(),
            delta,
            min: 1,
            max: 5,
        }],
    };

    BehavioralModel {
        component: "SurveyFormWidget".into(),
        variables: vec![
            text_var("name"),
            text_var("age"),
            text_var("feedback"),
            StateVariable {
                name: "rating".into(),
                ty: SemanticType::BoundedInt { min: 1, max: 5 },
                initial: Value::Int(3),
            },
            StateVariable {
                name: "submitted".into(),
                ty: SemanticType::Boolean,
                initial: Value::Bool(false),
            },
        ],
        tables: vec![],
        actions: vec![
            setter("set-name", "name"),
            setter("set-age", "age"),
            rating_step("rating-down", "-", -1),
            rating_step("rating-up", "+", 1),
            setter("set-feedback", "feedback"),
            Action {
                name: "handleSubmit".into(),
                branch: "otherwise".into(),
                trigger: Some("Submit".into()),
                input: None,
                reads: vec!["name".into(), "feedback".into(), "age".into()],
                guard: Guard::AllNonEmptyTrimmed {
                    vars: vec!["name".into(), "feedback".into(), "age".into()],
                },
                comparison: None,
                effects: vec![EffectOp::SetBool {
                    var: "submitted".into(),
                    value: true,
                }],
            },
        ],
        views: vec![
            ViewBranch {
                name: "submitted".into(),
                when: ViewPredicate::Flag {
                    var: "submitted".into(),
                    expected: true,
                },
                observables: vec![
                    Observable::Template {
                        target: "template.thank-you".into(),
                        parts: vec![
                            TextPart::Lit {
                                text: "Thank you, ".into(),
                            },
                            TextPart::Var { var: "name".into() },
                            TextPart::Lit { text: "!".into() },
                        ],
                    },
                    Observable::Template {
                        target: "template.age".into(),
                        parts: vec![
                            TextPart::Lit {
                                text: "Age: ".into(),
                            },
                            TextPart::Var { var: "age".into() },
                        ],
                    },
                    Observable::Template {
                        target: "template.rating".into(),
                        parts: vec![
                            TextPart::Lit {
                                text: "Rating: ".into(),
                            },
                            TextPart::Var {
                                var: "rating".into(),
                            },
                        ],
                    },
                    Observable::Template {
                        target: "template.feedback".into(),
                        parts: vec![
                            TextPart::Lit {
                                text: "Feedback: ".into(),
                            },
                            TextPart::Var {
                                var: "feedback".into(),
                            },
                        ],
                    },
                ],
            },
            ViewBranch {
                name: "otherwise".into(),
                when: ViewPredicate::Otherwise,
                observables: vec![
                    Observable::Literal {
                        target: "text.user-survey".into(),
                        text: "User Survey".into(),
                    },
                    Observable::FieldValue {
                        target: "input.name".into(),
                        var: "name".into(),
                    },
                    Observable::FieldValue {
                        target: "input.age".into(),
                        var: "age".into(),
                    },
                    Observable::VarValue {
                        target: "value.rating".into(),
                        var: "rating".into(),
                    },
                    Observable::FieldValue {
                        target: "input.feedback".into(),
                        var: "feedback".into(),
                    },
                ],
            },
        ],
    }
}

/// Minimal bounded counter in [1, 5] starting at 3, with no terminal state.
pub fn counter_model() -> BehavioralModel {
    let step = |name: &str, trigger: &str, delta: i64| Action {
        name: name.into(),
        branch: "main".into(),
        trigger: Some(trigger.into()),
        input: None,
        reads: vec!["count".into()],
        guard: Guard::Always,
        comparison: None,
        effects: vec![EffectOp::AddClamped {
            var: "count".into(),
            delta,
            min: 1,
            max: 5,
        }],
    };
    BehavioralModel {
        component: "CounterWidget".into(),
        variables: vec![StateVariable {
            name: "count".into(),
            ty: SemanticType::BoundedInt { min: 1, max: 5 },
            initial: Value::Int(3),
        }],
        tables: vec![],
        actions: vec![step("count-down", "-", -1), step("count-up", "+", 1)],
        views: vec![ViewBranch {
            name: "main".into(),
            when: ViewPredicate::Otherwise,
            observables: vec![Observable::VarValue {
                target: "value.count".into(),
                var: "count".into(),
            }],
        }],
    }
}

/// A model with a missing terminal condition: the only action walks the
/// index away from the table bound, so exploration never converges.
pub fn runaway_model() -> BehavioralModel {
    BehavioralModel {
        component: "RunawayWidget".into(),
        variables: vec![StateVariable {
            name: "index".into(),
            ty: SemanticType::Number,
            initial: Value::Int(0),
        }],
        tables: vec![DataTable {
            name: "items".into(),
            columns: vec!["label".into()],
            rows: vec![
                row(&[("label", "one")]),
                row(&[("label", "two")]),
                row(&[("label", "three")]),
            ],
        }],
        actions: vec![Action {
            name: "back".into(),
            branch: "items".into(),
            trigger: Some("Back".into()),
            input: None,
            reads: vec!["index".into()],
            guard: Guard::Always,
            comparison: None,
            effects: vec![EffectOp::Add {
                var: "index".into(),
                delta: -1,
            }],
        }],
        views: vec![
            ViewBranch {
                name: "items".into(),
                when: ViewPredicate::IndexWithinTable {
                    var: "index".into(),
                    table: "items".into(),
                },
                observables: vec![Observable::TableCell {
                    target: "items.label".into(),
                    table: "items".into(),
                    index_var: "index".into(),
                    column: "label".into(),
                }],
            },
            ViewBranch {
                name: "otherwise".into(),
                when: ViewPredicate::Otherwise,
                observables: vec![],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_fixture_models_validate() {
        quiz_model().validate().expect("quiz");
        survey_model().validate().expect("survey");
        counter_model().validate().expect("counter");
        runaway_model().validate().expect("runaway");
    }
}
