//! Annotation template rendering.
//!
//! Annotation values are arbitrary operator-supplied template strings in the
//! Prometheus convention (`{{ $labels.instance }}`, `{{ $value }}`), so a
//! fresh [`minijinja::Environment`] is built per render call and every key
//! renders independently: a parse or execution failure in one annotation
//! becomes a diagnostic placeholder in that key's value and never affects
//! its siblings.

use minijinja::{context, Environment, UndefinedBehavior, Value};
use std::collections::HashMap;

/// Render every annotation template against the series' label set and its
/// latest sample value.
///
/// The output always has exactly one entry per input key. Failures are
/// inlined per key: `<template_error: ..>` when the template does not parse,
/// `<render_error: ..>` when it fails during execution. A reference to a
/// label that does not exist renders as the empty string.
pub fn render_annotations(
    templates: &HashMap<String, String>,
    labels: &HashMap<String, String>,
    value: f64,
) -> HashMap<String, String> {
    let env = annotation_env();
    let ctx = context! { labels => labels, value => template_value(value) };

    let mut rendered = HashMap::with_capacity(templates.len());
    for (name, template) in templates {
        rendered.insert(name.clone(), render_one(&env, template, &ctx));
    }
    rendered
}

fn render_one(env: &Environment<'_>, template: &str, ctx: &Value) -> String {
    // `$labels` / `$value` are not valid minijinja identifiers; rewrite them
    // to the plain names bound in the context.
    let source = template.replace("$labels", "labels").replace("$value", "value");

    let compiled = match env.template_from_str(&source) {
        Ok(t) => t,
        Err(e) => return format!("<template_error: {e}>"),
    };
    match compiled.render(ctx) {
        Ok(out) => out,
        Err(e) => format!("<render_error: {e}>"),
    }
}

fn annotation_env() -> Environment<'static> {
    let mut env = Environment::new();
    // Chainable: `{{ labels.missing }}` renders as "" instead of erroring.
    env.set_undefined_behavior(UndefinedBehavior::Chainable);
    env
}

/// Whole-number sample values render without a trailing `.0`, so
/// `{{ $value }}` of 1.0 substitutes as `1`.
fn template_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}
