//! File discovery and run driving for the `bridgecheck` binary.
//!
//! The core works purely over text; this crate owns everything that
//! touches the filesystem: walking the two source roots, reading file
//! contents, and absorbing per-file read failures so a single bad file
//! never blocks the rest of the scan.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use ignore::WalkBuilder;

use bridgecheck_core::{CommandRegistry, Report, reconcile, scan_commands, scan_invocations};

/// Frontend extensions scanned by default. `.svelte` files get
/// `<script>`-region extraction; the rest are scanned whole.
pub const FRONTEND_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "svelte"];

/// Run a full validation with the default frontend extension set.
pub fn run(backend_root: &Path, frontend_root: &Path) -> Result<Report> {
    run_with_extensions(backend_root, frontend_root, FRONTEND_EXTENSIONS)
}

/// Run a full validation: build the registry from `backend_root`, scan
/// invocations under `frontend_root`, reconcile, and return the report.
///
/// The only fatal errors are a missing root directory and a source tree
/// with zero candidate files on both sides — a report over nothing would
/// be meaningless. Everything below that granularity (an undecodable
/// file, an unbalanced declaration) is skipped with a log line.
pub fn run_with_extensions(
    backend_root: &Path,
    frontend_root: &Path,
    frontend_extensions: &[impl AsRef<str>],
) -> Result<Report> {
    if !backend_root.is_dir() {
        bail!("backend root {} is not a directory", backend_root.display());
    }
    if !frontend_root.is_dir() {
        bail!("frontend root {} is not a directory", frontend_root.display());
    }

    let backend_files = discover(backend_root, &["rs"]);
    let frontend_files = discover(frontend_root, frontend_extensions);
    if backend_files.is_empty() && frontend_files.is_empty() {
        bail!(
            "no candidate files under {} or {}",
            backend_root.display(),
            frontend_root.display()
        );
    }
    tracing::debug!(
        backend = backend_files.len(),
        frontend = frontend_files.len(),
        "discovered candidate files"
    );

    let mut registry = CommandRegistry::new();
    for path in &backend_files {
        let Some(text) = read_text(path) else { continue };
        scan_commands(&text, &mut registry);
    }

    let opaque = registry.opaque_names();
    let mut sites = Vec::new();
    for path in &frontend_files {
        let Some(text) = read_text(path) else { continue };
        // cheap pre-filter, same as grepping for call sites up front
        if !text.contains("invoke(") {
            continue;
        }
        sites.extend(scan_invocations(path, &text, &opaque));
    }

    let findings = reconcile(&registry, &sites);
    Ok(Report {
        command_count: registry.len(),
        invocation_count: sites.len(),
        findings,
    })
}

/// Walk `root` and collect files with one of `extensions`, sorted by
/// path so repeated runs report in a fixed order.
///
/// Walk errors (an unreadable subdirectory, a vanished entry) are
/// absorbed with a warning: losing one corner of the tree must not
/// abort the report on the rest.
fn discover(root: &Path, extensions: &[impl AsRef<str>]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkBuilder::new(root).build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(root = %root.display(), %err, "skipping unwalkable entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                extensions
                    .iter()
                    .any(|want| ext.eq_ignore_ascii_case(want.as_ref()))
            });
        if matches {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    files
}

/// Read a file as UTF-8, or skip it with a warning.
fn read_text(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(err) => {
            tracing::warn!(file = %path.display(), %err, "skipping unreadable file");
            None
        }
    }
}
