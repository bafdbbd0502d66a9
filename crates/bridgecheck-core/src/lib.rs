//! bridgecheck-core: the matching engine.
//!
//! This crate provides:
//!
//! - **Model**: `CommandSignature`, `CommandRegistry`, `InvocationSite`,
//!   and the two `Finding` variants
//! - **Registry builder**: extracts command declarations from backend
//!   Rust source
//! - **Invocation scanner**: locates `invoke("name", { ... })` call sites
//!   in frontend source, including `<script>` regions of `.svelte` files
//! - **Reconciliation**: joins the two and classifies each call site as
//!   matched, key-mismatched, or referencing an unknown command
//!
//! The core works purely over in-memory text. Enumerating candidate files
//! and reading them is the caller's job (see bridgecheck-cli); printing
//! the report is driven from [`report::Report`].

pub mod invocation;
pub mod model;
pub mod reconcile;
pub mod registry;
pub mod report;

pub use invocation::scan_invocations;
pub use model::{CommandRegistry, CommandSignature, Finding, InvocationSite};
pub use reconcile::reconcile;
pub use registry::scan_commands;
pub use report::Report;
