use chrono::Duration;
use promcheck_common::duration::parse_duration;
use promcheck_common::rules::Rule;
use promcheck_common::types::{AlertResult, AlertState, Series};
use std::collections::HashMap;

use crate::render::render_annotations;

/// Evaluate one rule against the matrix its query returned.
///
/// An empty matrix yields a single synthetic SILENT result. Otherwise every
/// series produces exactly one result, in matrix order: FIRING when the span
/// between its earliest and latest sample has reached the rule's `for`
/// duration (equality fires — `for` is a minimum sustain threshold), PENDING
/// otherwise. Firing results get their annotations rendered from the series
/// labels and the latest sample value.
pub fn evaluate(rule: &Rule, matrix: &[Series]) -> Vec<AlertResult> {
    let sustain = sustain_duration(rule);

    if matrix.is_empty() {
        return vec![AlertResult {
            labels: HashMap::new(),
            elapsed: Duration::zero(),
            state: AlertState::Silent,
            annotations: HashMap::new(),
        }];
    }

    matrix
        .iter()
        .map(|series| {
            let elapsed = series.elapsed();
            let state = if elapsed >= sustain {
                AlertState::Firing
            } else {
                AlertState::Pending
            };

            let annotations = match (state, series.latest_value()) {
                (AlertState::Firing, Some(value)) => {
                    render_annotations(&rule.annotations, &series.labels, value)
                }
                _ => HashMap::new(),
            };

            AlertResult {
                labels: series.labels.clone(),
                elapsed,
                state,
                annotations,
            }
        })
        .collect()
}

/// The rule's `for` duration. Empty means instant-fire; an unparsable value
/// also degrades to instant-fire, with a warning naming the rule.
fn sustain_duration(rule: &Rule) -> Duration {
    if rule.for_.is_empty() {
        return Duration::zero();
    }
    match parse_duration(&rule.for_) {
        Some(d) => Duration::from_std(d).unwrap_or(Duration::MAX),
        None => {
            tracing::warn!(
                rule = %rule.alert,
                value = %rule.for_,
                "Unparsable 'for' duration, treating as 0s"
            );
            Duration::zero()
        }
    }
}
