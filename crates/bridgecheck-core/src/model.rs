//! Data model for a validation run.
//!
//! Everything here is a plain value: the registry and the invocation list
//! are built by independent passes and handed to reconciliation by
//! reference. No process-global state.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// A backend command's declared payload shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSignature {
    /// Command name, unique within the registry.
    pub name: String,
    /// Payload keys the handler accepts. Framework-injected parameters
    /// (`AppHandle`, `State`, `Window`) are already excluded.
    pub accepted: HashSet<String>,
    /// True when the handler takes a single pre-validated structured
    /// argument (a `*Payload` / `*Request` / `*Command` type) rather than
    /// discrete named fields. Key-level checking is suppressed for such
    /// commands: any payload shape is trusted.
    pub opaque_payload: bool,
}

/// All commands found across the backend source set.
///
/// Built once per run by [`crate::registry::scan_commands`], read-only
/// afterwards.
#[derive(Debug, Default, Serialize)]
pub struct CommandRegistry {
    commands: HashMap<String, CommandSignature>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a signature under its name.
    ///
    /// A name declared twice keeps the later declaration (last writer
    /// wins, matching how the backend framework itself resolves the
    /// collision). The overwrite is logged so the drift is visible.
    pub fn insert(&mut self, sig: CommandSignature) {
        if self.commands.contains_key(&sig.name) {
            tracing::warn!(
                command = %sig.name,
                "command declared more than once; keeping the later declaration"
            );
        }
        self.commands.insert(sig.name.clone(), sig);
    }

    pub fn get(&self, name: &str) -> Option<&CommandSignature> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Names of commands exempt from key-level checking.
    pub fn opaque_names(&self) -> HashSet<String> {
        self.commands
            .values()
            .filter(|sig| sig.opaque_payload)
            .map(|sig| sig.name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// One qualifying frontend call site.
///
/// Only produced for calls whose payload is a literal object with at
/// least one statically resolvable key. Calls passing a variable, a
/// spread-only literal, or no payload at all are invisible to the scan —
/// a known false-negative class, inherent to static matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationSite {
    /// Path of the file containing the call, as handed in by discovery.
    pub file: PathBuf,
    /// Command name referenced by the call.
    pub command: String,
    /// 1-based line number within the original file text (not within an
    /// embedded `<script>` slice).
    pub line: usize,
    /// Top-level keys of the payload object literal, in source order.
    pub payload_keys: Vec<String>,
}

/// A reportable discrepancy between the two sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// The invocation references a command name absent from the registry.
    UnknownCommand {
        command: String,
        file: PathBuf,
        line: usize,
    },
    /// The invocation supplies keys the command does not accept.
    /// `extra_keys` is always non-empty.
    KeyMismatch {
        command: String,
        file: PathBuf,
        line: usize,
        extra_keys: Vec<String>,
    },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::UnknownCommand { command, file, line } => {
                write!(f, "{command} ({}:{line})", file.display())
            }
            Finding::KeyMismatch { command, file, line, extra_keys } => {
                write!(
                    f,
                    "{command} @ {}:{line} -> unexpected keys [{}]",
                    file.display(),
                    extra_keys.join(", ")
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(name: &str, accepted: &[&str], opaque: bool) -> CommandSignature {
        CommandSignature {
            name: name.to_string(),
            accepted: accepted.iter().map(|s| s.to_string()).collect(),
            opaque_payload: opaque,
        }
    }

    #[test]
    fn duplicate_declaration_last_writer_wins() {
        let mut registry = CommandRegistry::new();
        registry.insert(sig("save_file", &["path"], false));
        registry.insert(sig("save_file", &["path", "contents"], false));

        assert_eq!(registry.len(), 1);
        let kept = registry.get("save_file").expect("present");
        assert!(kept.accepted.contains("contents"));
    }

    #[test]
    fn opaque_names_filters() {
        let mut registry = CommandRegistry::new();
        registry.insert(sig("plain", &["id"], false));
        registry.insert(sig("structured", &["payload"], true));

        let opaque = registry.opaque_names();
        assert!(opaque.contains("structured"));
        assert!(!opaque.contains("plain"));
    }

    #[test]
    fn finding_display() {
        let unknown = Finding::UnknownCommand {
            command: "ghost".into(),
            file: PathBuf::from("src/App.svelte"),
            line: 12,
        };
        assert_eq!(unknown.to_string(), "ghost (src/App.svelte:12)");

        let mismatch = Finding::KeyMismatch {
            command: "rename_channel".into(),
            file: PathBuf::from("src/lib/api.ts"),
            line: 40,
            extra_keys: vec!["channelId".into()],
        };
        assert_eq!(
            mismatch.to_string(),
            "rename_channel @ src/lib/api.ts:40 -> unexpected keys [channelId]"
        );
    }
}
