/// Nesting depth at which variable expansion gives up.
pub const MAX_VARIABLE_DEPTH: usize = 5;
/// Longest substituted variable value, in characters.
pub const MAX_VARIABLE_VALUE_LEN: usize = 1_000;
/// Bodies may grow to this many variable values after substitution.
pub const BODY_SIZE_MULTIPLIER: usize = 10;
pub const MAX_BODY_LEN: usize = MAX_VARIABLE_VALUE_LEN * BODY_SIZE_MULTIPLIER;
/// Response bodies larger than this are rejected before extraction.
pub const MAX_RESPONSE_BODY_BYTES: u64 = 10 * 1024 * 1024;
