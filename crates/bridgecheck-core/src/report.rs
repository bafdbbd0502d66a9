//! Run outcome and rendering.

use serde::Serialize;

use crate::model::Finding;

/// The outcome of one validation run.
///
/// SUCCESS iff `findings` is empty. Counts are carried so the report can
/// say how much source backed a clean result.
#[derive(Debug, Serialize)]
pub struct Report {
    /// Number of distinct backend commands in the registry.
    pub command_count: usize,
    /// Number of invocation sites that produced at least one key.
    pub invocation_count: usize,
    /// All findings across all files, in discovery order.
    pub findings: Vec<Finding>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Human-readable report: a mismatch section, an unknown-command
    /// section, and a closing verdict line.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "found {} backend commands, {} checkable invoke payloads\n",
            self.command_count, self.invocation_count
        ));

        let mismatches: Vec<&Finding> = self
            .findings
            .iter()
            .filter(|f| matches!(f, Finding::KeyMismatch { .. }))
            .collect();
        let unknown: Vec<&Finding> = self
            .findings
            .iter()
            .filter(|f| matches!(f, Finding::UnknownCommand { .. }))
            .collect();

        if !mismatches.is_empty() {
            out.push_str("\nFound payload key mismatches:\n");
            for finding in mismatches {
                out.push_str(&format!("  {finding}\n"));
            }
        }
        if !unknown.is_empty() {
            out.push_str("\nInvokes referencing unregistered commands:\n");
            for finding in unknown {
                out.push_str(&format!("  {finding}\n"));
            }
        }

        if self.is_clean() {
            out.push_str("\nAll invoke payloads match backend commands.\n");
        } else {
            out.push_str("\nFix the above payloads before continuing.\n");
        }
        out
    }

    /// Machine-readable report.
    pub fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
