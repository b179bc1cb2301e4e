//! Redraft - text correction and restyling client
//!
//! Redraft sends free-form text to a correction service together with a set
//! of stylistic directives (tone, translation, typo fixing) and brings the
//! rewritten text back as Markdown, sanitized HTML, or plain text via the
//! system clipboard. Session state (input text, custom instruction,
//! directive selections) persists between invocations.
//!
//! # Modules
//!
//! - [`directive`] - directive catalog and selection rules
//! - [`compose`] - instruction string composition
//! - [`format`] - Markdown/HTML/clipboard interop
//! - [`client`] - correction service client with single-flight guarantee
//! - [`store`] - session snapshot persistence
//! - [`session`] - the orchestrator tying the pieces together
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod client;
pub mod compose;
pub mod config;
pub mod directive;
pub mod format;
pub mod repl;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use client::{
    CorrectionApi, CorrectionClient, CorrectionError, CorrectionRequest, HttpCorrectionApi, SubmitOutcome,
};
pub use compose::compose;
pub use config::{Config, ServiceConfig, StorageConfig};
pub use directive::{DirectiveGroup, DirectiveOption, DirectiveSet};
pub use format::{ClipboardPort, SystemClipboard, html_to_markdown, markdown_to_safe_html, wrap_as_document};
pub use session::{GenerateStatus, TransformationSession};
pub use store::{DirectiveSelection, FileStorage, SessionSnapshot, SessionStore, StateStorage};
