use crate::error::{PloverError, PloverErrorKind};
use crate::expectation::Reporter;
use crate::frame::Frame;
use crate::suite::{Check, Suite};
use crate::Plover;

use std::collections::BTreeMap;
use std::path::Path;


/// Runs a trivial query to prove the connection works.
pub async fn peck(plover: &Plover) -> Result<serde_json::Value, PloverError> {
    tracing::info!("Pecking database...");
    plover.frame_from_sql("SELECT 1").await?;
    tracing::info!("Pecking successful 🐦");

    Ok(serde_json::json!({
        "engine": plover.engine().name(),
        "context": plover.context(),
    }))
}

pub async fn query(plover: &Plover, sql: &str) -> Result<Frame, PloverError> {
    plover.frame_from_sql(sql).await
}

/// Runs every check of the suite in file order and captures each result under the check's name.
///
/// Human output is printed here when a reporter is given. Any failed expectation turns into
/// an error once all checks have run. A query that cannot run aborts the suite, after the
/// results captured so far are reported.
pub async fn check(
    plover: &mut Plover,
    suite_path: &Path,
    vars: &[(String, String)],
    reporter: Option<&Reporter>,
) -> Result<(), PloverError> {
    let suite = Suite::from_file(suite_path)?;
    let overrides: BTreeMap<String, String> = vars.iter().cloned().collect();
    let checks = suite.render(&overrides);
    tracing::info!("Running {} check(s) from '{}'", checks.len(), suite_path.display());

    let outcome = run_checks(plover, &checks).await;

    if let Some(reporter) = reporter {
        plover.report_all(reporter);
    }
    outcome?;

    let recorder = plover.recorder();
    match recorder.failures() {
        0 => {
            tracing::info!("All {} expectation(s) met 🐦", recorder.len());
            Ok(())
        }
        failed => Err(PloverError {
            kind: PloverErrorKind::ExpectationsFailed { failed, total: recorder.len() },
        }),
    }
}


async fn run_checks(plover: &mut Plover, checks: &[Check]) -> Result<(), PloverError> {
    for check in checks {
        tracing::debug!("Check '{}'", check.name);
        let frame = plover.expectation_frame_from_sql(&check.sql).await?;
        let result = check.expectation.evaluate(&frame);
        plover.capture(&check.name, result);
    }
    Ok(())
}
