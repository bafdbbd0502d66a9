//! Joins the command registry with the scanned invocation sites.
//!
//! Never fails fast: every site is classified and every finding is
//! collected, so one run surfaces every problem at once.

use crate::model::{CommandRegistry, Finding, InvocationSite};

/// Classify every invocation site against the registry.
///
/// Findings come out in site order: unknown-command and key-mismatch
/// findings interleave exactly as the sites were discovered, which keeps
/// repeated runs over unchanged source byte-identical.
pub fn reconcile(registry: &CommandRegistry, sites: &[InvocationSite]) -> Vec<Finding> {
    let mut findings = Vec::new();
    for site in sites {
        let Some(sig) = registry.get(&site.command) else {
            findings.push(Finding::UnknownCommand {
                command: site.command.clone(),
                file: site.file.clone(),
                line: site.line,
            });
            continue;
        };
        // Opaque commands are filtered before key extraction; this guard
        // holds the invariant even for sites built by other callers.
        if sig.opaque_payload {
            continue;
        }
        let extra_keys: Vec<String> = site
            .payload_keys
            .iter()
            .filter(|key| !sig.accepted.contains(*key))
            .cloned()
            .collect();
        if !extra_keys.is_empty() {
            findings.push(Finding::KeyMismatch {
                command: site.command.clone(),
                file: site.file.clone(),
                line: site.line,
                extra_keys,
            });
        }
    }
    findings
}
