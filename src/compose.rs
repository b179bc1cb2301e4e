//! Instruction string composition
//!
//! Combines active directive descriptions and a free-text custom instruction
//! into the single instruction payload sent to the correction service.

/// Compose the instruction payload
///
/// Directive descriptions are joined with newlines, followed by the trimmed
/// custom instruction; each part is included only when non-empty. An empty
/// result is valid and means "no steering instructions". Identical directive
/// texts are not deduplicated.
pub fn compose(directive_descriptions: &[String], custom_instruction: &str) -> String {
    let mut segments: Vec<String> = Vec::with_capacity(2);

    if !directive_descriptions.is_empty() {
        segments.push(directive_descriptions.join("\n"));
    }

    let custom = custom_instruction.trim();
    if !custom.is_empty() {
        segments.push(custom.to_string());
    }

    segments.join("\n")
}
