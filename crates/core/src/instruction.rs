//! Role-conditioned instruction builder.
//!
//! The agent's persona is a pure function of the request, not fixed state:
//! the instruction is computed freshly at generation time from whatever
//! role label the caller supplied, never baked into the agent at
//! construction. This keeps concurrent calls with different roles fully
//! independent.

/// Build the system instruction for a given role label.
///
/// Total over all string inputs: any role — empty, malformed, or containing
/// control characters — is interpolated verbatim. A degenerate role degrades
/// to a degenerate instruction rather than an error.
pub fn build(role: &str) -> String {
    format!("You are {role}. Stay in character and answer as {role} would.")
}
