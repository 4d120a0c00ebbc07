//! CSV Output
//!
//! Fixed column set, one row per (scenario, candidate):
//!
//! ```text
//! Selectors,Facets,Function,Old_Gas,New_Gas,Gas_Saved,Pct_Saved
//! 40,20,OldFacet,141000,141000,0,0.00
//! 40,20,NewFacet,141000,120500,20500,14.54
//! ```

use crate::report::BenchmarkResult;
use std::fmt::Write;

/// Header row of the CSV report
pub const CSV_HEADER: &str = "Selectors,Facets,Function,Old_Gas,New_Gas,Gas_Saved,Pct_Saved";

/// Generate the CSV report. Zero results yield the header row only.
pub fn generate_csv_report(results: &[BenchmarkResult]) -> String {
    let mut csv = String::with_capacity(CSV_HEADER.len() + 1 + results.len() * 48);
    csv.push_str(CSV_HEADER);
    csv.push('\n');

    for r in results {
        // writing to a String cannot fail
        let _ = writeln!(
            csv,
            "{},{},{},{},{},{},{:.2}",
            r.total_selectors,
            r.facet_count,
            r.candidate_label,
            r.baseline_gas,
            r.gas_used,
            r.gas_saved,
            r.percent_saved
        );
    }

    csv
}

#[cfg(test)]
mod tests {
    use super::*;
    use loupebench_core::Scenario;

    #[test]
    fn test_header_only() {
        assert_eq!(generate_csv_report(&[]), format!("{}\n", CSV_HEADER));
    }

    #[test]
    fn test_rows() {
        let s = Scenario::new(40, 20);
        let results = vec![
            BenchmarkResult::compare(s, "OldFacet", 5, 3_000, 3_000),
            BenchmarkResult::compare(s, "NewFacet", 5, 2_000, 3_000),
        ];
        let csv = generate_csv_report(&results);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "40,20,OldFacet,3000,3000,0,0.00");
        assert_eq!(lines[2], "40,20,NewFacet,3000,2000,1000,33.33");
    }

    #[test]
    fn test_negative_savings() {
        let s = Scenario::new(64, 16);
        let r = BenchmarkResult::compare(s, "NewFacet", 5, 1_250, 1_000);
        let csv = generate_csv_report(&[r]);
        assert!(csv.ends_with("64,16,NewFacet,1000,1250,-250,-25.00\n"));
    }
}
