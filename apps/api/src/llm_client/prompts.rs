//! Shared prompt fragments.
//! Each stage defines its own templates in `interview/prompts.rs`.
//! This file contains cross-cutting instructions.

/// Instruction appended to every interviewer-facing prompt.
/// Output is scrubbed afterwards regardless.
pub const NO_PLACEHOLDERS_INSTRUCTION: &str =
    "IMPORTANT: Do NOT use any placeholders like [Your Name] or [Company Name].";

/// Instruction used in the resume prompt, where generic filler names are the failure mode.
pub const NO_GENERIC_NAMES_INSTRUCTION: &str = "Use current best practices in resume writing \
    and avoid generic placeholders like \"XYZ\" or \"ABC\".";
