use promcheck_client::PromClient;
use promcheck_common::rules::RuleFile;
use promcheck_engine::evaluate;
use promcheck_report::Reporter;
use std::time::Duration as StdDuration;

use crate::config::ReplayWindow;

/// Replay every rule in the file against the window and feed the results to
/// the reporter.
///
/// A failed query skips that rule entirely (no partial results) and the run
/// continues with the next rule. The reporter is flushed exactly once, after
/// all rules.
pub async fn run(
    client: &PromClient,
    rule_file: &RuleFile,
    window: &ReplayWindow,
    step: StdDuration,
    reporter: &mut dyn Reporter,
) -> anyhow::Result<()> {
    for group in &rule_file.groups {
        for rule in &group.rules {
            let matrix = match client
                .query_range(&rule.expr, window.start, window.end, step)
                .await
            {
                Ok(matrix) => matrix,
                Err(e) => {
                    tracing::error!(
                        group = %group.name,
                        rule = %rule.alert,
                        error = %e,
                        "Query failed, skipping rule"
                    );
                    continue;
                }
            };

            for result in evaluate(rule, &matrix) {
                reporter.add_result(&group.name, rule, &result);
            }
        }
    }

    reporter.flush()
}
