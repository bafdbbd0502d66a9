//! Frontend invocation scanning.
//!
//! Finds `invoke("command", { ... })` call sites in frontend source text
//! and resolves the payload literal's top-level key names. `.svelte`
//! files are markup hybrids: only their `<script>` regions are scanned,
//! but line numbers are always computed against the full original file so
//! findings point at real editor locations.
//!
//! Calls whose payload is not a literal object (a variable, a function
//! call, nothing at all) produce no site — they cannot be checked
//! statically. The same goes for dynamically constructed command names
//! and computed `[expr]:` keys: both are invisible to this scan, a known
//! false-negative class rather than a bug.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use bridgecheck_scan::{
    QuoteStyle, extract_balanced, line_number, skip_block_comment, skip_line_comment, skip_string,
};

use crate::model::InvocationSite;

/// An invocation call site: `invoke(` then the quoted command name, then
/// the comma introducing the payload argument.
static INVOKE_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"invoke\(\s*['"]([A-Za-z0-9_]+)['"]\s*,"#).expect("hardcoded pattern compiles")
});

/// Embedded script region of a markup-hybrid file.
static SCRIPT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<script[^>]*>(.*?)</script>").expect("hardcoded pattern compiles"));

/// Scan one frontend file's text for invocation sites.
///
/// `opaque` is the registry's opaque-command name set; calls to those
/// commands are skipped before payload extraction since any payload
/// shape is acceptable for them. Sites with zero resolvable keys are
/// not emitted.
pub fn scan_invocations(file: &Path, text: &str, opaque: &HashSet<String>) -> Vec<InvocationSite> {
    let mut sites = Vec::new();
    for (region, base) in script_regions(file, text) {
        if !region.contains("invoke(") {
            continue;
        }
        for caps in INVOKE_CALL.captures_iter(region) {
            let command = &caps[1];
            if opaque.contains(command) {
                continue;
            }
            let Some(call) = caps.get(0) else {
                continue;
            };
            let Some((literal, _)) =
                extract_balanced(region, call.end(), b'{', b'}', QuoteStyle::Script)
            else {
                continue;
            };
            let payload_keys = object_keys(literal);
            if payload_keys.is_empty() {
                continue;
            }
            sites.push(InvocationSite {
                file: file.to_path_buf(),
                command: command.to_string(),
                line: line_number(text, base + call.start()),
                payload_keys,
            });
        }
    }
    tracing::debug!(file = %file.display(), sites = sites.len(), "scanned invocations");
    sites
}

/// The regions of `text` to scan, each with its byte offset in the file.
///
/// `.svelte` files yield one region per `<script>` block; everything else
/// is a single region at offset 0.
fn script_regions<'a>(file: &Path, text: &'a str) -> Vec<(&'a str, usize)> {
    let is_markup = file
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svelte"));
    if !is_markup {
        return vec![(text, 0)];
    }
    SCRIPT_TAG
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| (m.as_str(), m.start()))
        .collect()
}

/// Top-level key names of an object literal (delimiters included).
///
/// Walks at brace depth 1 only, so keys of nested object values never
/// leak into the result. Both quoted and bare identifier keys are
/// recognized; a token counts as a key only if it sits in key position
/// (start of the literal or after a top-level comma) and the next
/// non-whitespace character after it is `:`. Shorthand properties,
/// spread expressions, and strings inside value expressions (ternaries,
/// concatenations) are never keys.
pub fn object_keys(literal: &str) -> Vec<String> {
    let bytes = literal.as_bytes();
    let mut keys = Vec::new();
    let mut depth = 0usize;
    let mut expecting_key = true;
    let mut i = 0usize;

    while i < bytes.len() {
        let b = bytes[i];
        if b == b'{' {
            depth += 1;
            i += 1;
            continue;
        }
        if b == b'}' {
            depth = depth.saturating_sub(1);
            i += 1;
            continue;
        }
        if b == b'/' && i + 1 < bytes.len() && bytes[i + 1] == b'/' {
            i = skip_line_comment(literal, i);
            continue;
        }
        if b == b'/' && i + 1 < bytes.len() && bytes[i + 1] == b'*' {
            i = skip_block_comment(literal, i);
            continue;
        }
        if depth != 1 {
            // Inside a nested value: strings skipped so braces within
            // them cannot corrupt the depth count.
            if QuoteStyle::Script.is_quote(b) {
                i = skip_string(literal, i);
            } else {
                i += 1;
            }
            continue;
        }

        if b == b',' {
            expecting_key = true;
            i += 1;
            continue;
        }
        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        // Bracketed values ([...] arrays, (...) call or grouping
        // expressions) are jumped wholesale so commas inside them do
        // not look like property separators.
        if b == b'[' || b == b'(' {
            let close = if b == b'[' { b']' } else { b')' };
            match extract_balanced(literal, i, b, close, QuoteStyle::Script) {
                Some((_, end)) => i = end,
                None => i += 1,
            }
            continue;
        }
        if !expecting_key {
            if QuoteStyle::Script.is_quote(b) {
                i = skip_string(literal, i);
            } else {
                i += 1;
            }
            continue;
        }

        let key = if QuoteStyle::Script.is_quote(b) {
            let end = skip_string(literal, i);
            let inner = literal.get(i + 1..end.saturating_sub(1)).unwrap_or("");
            i = end;
            inner.to_string()
        } else if is_identifier_byte(b) {
            let start = i;
            while i < bytes.len() && is_identifier_byte(bytes[i]) {
                i += 1;
            }
            literal[start..i].to_string()
        } else {
            // spread dots, operators, non-ASCII — not a key start
            i += 1;
            continue;
        };
        if key.is_empty() {
            i += 1;
            continue;
        }

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i < bytes.len() && bytes[i] == b':' {
            keys.push(key);
            i += 1;
        }
        expecting_key = false;
    }
    keys
}

#[inline]
fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}
