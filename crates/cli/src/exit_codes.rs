//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! | Code | Description                                          |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | `verify` found rule violations                       |
//! | 2    | CLI usage error (bad args, bad rematch request)      |
//! | 3    | Invalid group file or assignments file               |
//! | 4    | No valid draw exists under the group's constraints   |
//! | 5    | IO or serialization failure                          |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use secretsanta_matching::MatchingError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// The checked assignments break at least one rule.
/// Like `diff(1)`, exit 1 means "not what was expected."
pub const EXIT_VERIFY_VIOLATIONS: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Group file (or stored assignments) failed to parse or validate.
pub const EXIT_INVALID_INPUT: u8 = 3;

/// The engine found no complete matching.
pub const EXIT_INFEASIBLE: u8 = 4;

/// Cannot read or write a file, or cannot serialize output.
pub const EXIT_IO: u8 = 5;

/// Map a MatchingError to its exit code.
pub fn matching_exit_code(err: &MatchingError) -> u8 {
    match err {
        MatchingError::InvalidRematch(_) => EXIT_USAGE,
        MatchingError::UnknownMember { context, .. } if context == "rematch" => EXIT_USAGE,
        MatchingError::Io(_) => EXIT_IO,
        MatchingError::ConfigParse(_)
        | MatchingError::ConfigValidation(_)
        | MatchingError::GroupTooSmall { .. }
        | MatchingError::DuplicateMember(_)
        | MatchingError::UnknownMember { .. }
        | MatchingError::DuplicateForbiddenPair { .. }
        | MatchingError::AssignmentsParse(_) => EXIT_INVALID_INPUT,
    }
}
