//! Backend command registry builder.
//!
//! Scans Rust source text for command declarations of the form:
//!
//! ```text
//! #[tauri::command]
//! pub async fn rename_channel(app: AppHandle, channel_id: String, name: String) -> ...
//! ```
//!
//! The attribute anchors the match; the parameter list itself is walked
//! with the balanced-region extractor rather than a regex, so nested
//! parentheses and generic arguments cannot truncate it. Framework-injected
//! parameters are dropped from the accepted key set, and commands taking a
//! single structured payload type are marked opaque.

use std::sync::LazyLock;

use regex::Regex;

use bridgecheck_scan::{QuoteStyle, extract_balanced, split_top_level};

use crate::model::{CommandRegistry, CommandSignature};

/// Marker types the framework injects; their parameters are never
/// caller-supplied payload fields.
const INJECTED_TYPE_MARKERS: [&str; 3] = ["AppHandle", "State", "Window"];

/// Anchors a command declaration: the attribute (optionally with
/// arguments), an optional visibility qualifier, an optional `async`,
/// then `fn name`. The parameter list is extracted separately.
static COMMAND_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"#\s*\[\s*tauri\s*::\s*command(?:\s*\([^)]*\))?\s*\]\s*(?:pub(?:\s*\([^)]*\))?\s+)?(?:async\s+)?fn\s+([A-Za-z0-9_]+)",
    )
    .expect("hardcoded pattern compiles")
});

/// Scan one backend source file's text and record every command found.
///
/// A declaration whose parameter list fails to balance is skipped; a
/// malformed parameter entry (no `name: Type` shape) is skipped. Neither
/// aborts the scan.
pub fn scan_commands(text: &str, registry: &mut CommandRegistry) {
    for caps in COMMAND_MARKER.captures_iter(text) {
        let name = &caps[1];
        let after_name = caps.get(0).map_or(0, |m| m.end());
        let params_start = skip_generic_args(text, after_name);

        let Some((params, _)) =
            extract_balanced(text, params_start, b'(', b')', QuoteStyle::Rust)
        else {
            tracing::debug!(command = name, "unbalanced parameter list, skipping declaration");
            continue;
        };

        registry.insert(parse_signature(name, &params[1..params.len() - 1]));
    }
}

/// Skip a `<...>` generic parameter list (if present) after the command
/// name, returning the offset where the parameter list should start.
fn skip_generic_args(text: &str, start: usize) -> usize {
    let bytes = text.as_bytes();
    let mut i = start;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if i >= bytes.len() || bytes[i] != b'<' {
        return start;
    }
    let mut depth = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            // `->` in a bound like `F: Fn() -> R` is not a closer
            b'>' if i == 0 || bytes[i - 1] != b'-' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    start
}

/// Parse the inner text of a parameter list into a signature.
fn parse_signature(name: &str, params: &str) -> CommandSignature {
    let mut accepted = std::collections::HashSet::new();
    let mut opaque_payload = false;

    for entry in split_top_level(params, b',', QuoteStyle::Rust) {
        let entry = entry.strip_prefix("mut ").unwrap_or(entry);
        let Some((param_name, type_text)) = entry.split_once(':') else {
            continue;
        };
        let param_name = param_name.trim();
        let type_text = type_text.trim();
        if INJECTED_TYPE_MARKERS.iter().any(|t| type_text.contains(t)) {
            continue;
        }
        if is_opaque_type(type_text) {
            opaque_payload = true;
        }
        accepted.insert(param_name.to_string());
    }

    CommandSignature {
        name: name.to_string(),
        accepted,
        opaque_payload,
    }
}

/// A type accepting a whole pre-validated structure rather than a field.
///
/// `CommandResult` is carved out: result-wrapper names contain "Command"
/// without being payload types.
fn is_opaque_type(type_text: &str) -> bool {
    type_text.contains("Payload")
        || type_text.contains("Request")
        || (type_text.contains("Command") && !type_text.ends_with("CommandResult"))
}
