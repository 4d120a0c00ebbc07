//! JSON Output

use crate::report::Report;

/// Current `meta.schema_version` of the JSON report
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Generate a prettified JSON report.
///
/// Unlike CSV, the JSON report carries metadata, scenario failures and
/// surface divergences alongside the results.
pub fn generate_json_report(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
