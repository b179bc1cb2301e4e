//! Transformation session orchestrator
//!
//! Owns the live session state - input text, raw output, custom instruction,
//! busy flag, last error - and wires the directive catalog, composer,
//! correction client, format bridge, and snapshot store into the
//! user-facing operations.

use tracing::debug;

use crate::client::{CorrectionClient, CorrectionError, CorrectionRequest, SubmitOutcome};
use crate::compose::compose;
use crate::directive::DirectiveSet;
use crate::format::{self, ClipboardPort};
use crate::store::{SessionSnapshot, SessionStore};

/// Prefix marking the free-text instruction as supplementary
const CUSTOM_INSTRUCTION_PREFIX: &str = "Dodatočné inštrukcie: ";

/// What a generate attempt did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateStatus {
    /// Output text was replaced and the snapshot persisted
    Updated,
    /// The service answered but produced no usable output; prior output kept
    NoOutput,
    /// The request failed; the error is recorded in `last_error`
    Failed,
    /// Empty input or a request already pending - a silent no-op
    Skipped,
}

/// The orchestrator owning live session state
///
/// State transitions for generation: Idle -> Pending (busy set before the
/// first suspension point) -> Idle on every resolution. Only the orchestrator
/// mutates the directive catalog, and only in response to explicit selection
/// operations.
pub struct TransformationSession {
    directives: DirectiveSet,
    input_text: String,
    raw_output: String,
    custom_instruction: String,
    busy: bool,
    last_error: Option<String>,
    client: CorrectionClient,
    store: SessionStore,
    temperature: f32,
}

impl TransformationSession {
    /// Create a session, restoring the persisted snapshot if one exists
    pub fn new(client: CorrectionClient, store: SessionStore, temperature: f32) -> Self {
        let mut session = Self {
            directives: DirectiveSet::builtin(),
            input_text: String::new(),
            raw_output: String::new(),
            custom_instruction: String::new(),
            busy: false,
            last_error: None,
            client,
            store,
            temperature,
        };

        if let Some(snapshot) = session.store.load() {
            session.input_text = snapshot.input_text;
            session.custom_instruction = snapshot.custom_instruction;
            session.raw_output = snapshot.raw_output;
            session.directives.apply_selections(&snapshot.directive_selections);
        }

        session
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn set_input_text(&mut self, text: impl Into<String>) {
        self.input_text = text.into();
    }

    pub fn raw_output(&self) -> &str {
        &self.raw_output
    }

    pub fn custom_instruction(&self) -> &str {
        &self.custom_instruction
    }

    pub fn set_custom_instruction(&mut self, instruction: impl Into<String>) {
        self.custom_instruction = instruction.into();
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn directives(&self) -> &DirectiveSet {
        &self.directives
    }

    /// The instruction payload the next generate call would send
    pub fn composed_instruction(&self) -> String {
        let custom = self.custom_instruction.trim();
        let custom = if custom.is_empty() {
            String::new()
        } else {
            format!("{}{}", CUSTOM_INSTRUCTION_PREFIX, custom)
        };
        compose(&self.directives.active_descriptions(), &custom)
    }

    /// Send the current input through the correction service
    ///
    /// Empty/whitespace-only input or a request already pending is a silent
    /// no-op. On success the output is replaced and the snapshot persisted;
    /// on failure the output is left untouched and the error recorded. The
    /// busy flag clears on every path.
    pub async fn handle_generate(&mut self) -> GenerateStatus {
        let input = self.input_text.trim().to_string();
        if input.is_empty() || self.busy {
            debug!(empty = input.is_empty(), busy = self.busy, "handle_generate: skipped");
            return GenerateStatus::Skipped;
        }

        self.busy = true;
        self.last_error = None;

        let request = CorrectionRequest {
            text: input,
            instruction: self.composed_instruction(),
            temperature: self.temperature,
        };

        let status = match self.client.submit(&request).await {
            Ok(SubmitOutcome::Corrected(text)) => {
                self.raw_output = text;
                self.persist();
                GenerateStatus::Updated
            }
            Ok(SubmitOutcome::NoUsableOutput) => {
                debug!("handle_generate: no usable output, keeping previous");
                GenerateStatus::NoOutput
            }
            Ok(SubmitOutcome::Rejected) => GenerateStatus::Skipped,
            Err(CorrectionError::Service { status }) => {
                self.last_error = Some(format!("API Error: {}", status));
                GenerateStatus::Failed
            }
            Err(CorrectionError::Transport(e)) => {
                debug!(error = %e, "handle_generate: transport failure");
                self.last_error = Some("Chyba komunikácie.".to_string());
                GenerateStatus::Failed
            }
        };

        self.busy = false;
        status
    }

    /// Reset input, output, and custom instruction; directives stay as-is
    pub fn handle_clear(&mut self) {
        self.input_text.clear();
        self.raw_output.clear();
        self.custom_instruction.clear();
        self.persist();
    }

    /// Replace the input text from the clipboard, preferring rich content
    ///
    /// A denied or empty clipboard leaves the input unchanged and persists
    /// nothing; a successful paste is persisted so a later invocation can
    /// pick the text up.
    pub fn handle_paste(&mut self, clipboard: &mut dyn ClipboardPort) {
        if let Some(markdown) = format::paste_as_markdown(clipboard) {
            self.input_text = markdown;
            self.persist();
        }
    }

    /// Copy the literal output string to the clipboard as plain text
    pub fn copy_as_text(&self, clipboard: &mut dyn ClipboardPort) -> bool {
        format::export_text(clipboard, &self.raw_output)
    }

    /// Copy the output as sanitized HTML, falling back to a plain write
    pub fn copy_as_html(&self, clipboard: &mut dyn ClipboardPort) -> bool {
        let safe = format::markdown_to_safe_html(&self.raw_output);
        format::export_html(clipboard, &safe, &self.raw_output)
    }

    /// Transfer the output into the input field and clear the output
    ///
    /// A no-op when there is no output, so an accidental swap cannot wipe
    /// the stored input.
    pub fn move_result_to_input(&mut self) {
        if self.raw_output.trim().is_empty() {
            debug!("move_result_to_input: no output, skipping");
            return;
        }
        self.input_text = std::mem::take(&mut self.raw_output);
        self.persist();
    }

    /// Flip a directive's selection and persist
    pub fn toggle_directive(&mut self, key: &str) {
        let active = self.directives.is_active(key);
        self.directives.set_active(key, !active);
        self.persist();
    }

    /// Set a directive's selection explicitly and persist
    pub fn set_directive(&mut self, key: &str, active: bool) {
        self.directives.set_active(key, active);
        self.persist();
    }

    /// Sanitized HTML preview of the current output
    pub fn preview_html(&self) -> String {
        format::markdown_to_safe_html(&self.raw_output)
    }

    fn persist(&mut self) {
        let snapshot = SessionSnapshot {
            input_text: self.input_text.clone(),
            custom_instruction: self.custom_instruction.clone(),
            raw_output: self.raw_output.clone(),
            directive_selections: self.directives.selection_snapshot(),
        };
        self.store.save(&snapshot);
    }
}
