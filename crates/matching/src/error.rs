use std::fmt;

/// Everything that can go wrong around the engine.
///
/// Infeasibility is not in here: the engine reports it as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchingError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Group file validation error (blank id, bad couple key, bad settings).
    ConfigValidation(String),
    /// A draw needs at least two members.
    GroupTooSmall { members: usize },
    /// Two members share the same id.
    DuplicateMember(String),
    /// An id referenced somewhere is not a member of the group.
    UnknownMember { context: String, id: String },
    /// The same forbidden pair is listed twice.
    DuplicateForbiddenPair { giver: String, receiver: String },
    /// Rematch request is empty, too large, or repeats a giver.
    InvalidRematch(String),
    /// Existing assignments could not be read.
    AssignmentsParse(String),
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for MatchingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "group file parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "group file validation error: {msg}"),
            Self::GroupTooSmall { members } => {
                write!(f, "a draw needs at least 2 members, found {members}")
            }
            Self::DuplicateMember(id) => write!(f, "duplicate member id '{id}'"),
            Self::UnknownMember { context, id } => write!(f, "{context}: unknown member '{id}'"),
            Self::DuplicateForbiddenPair { giver, receiver } => {
                write!(f, "forbidden pair '{giver}' -> '{receiver}' is listed twice")
            }
            Self::InvalidRematch(msg) => write!(f, "invalid rematch request: {msg}"),
            Self::AssignmentsParse(msg) => write!(f, "cannot read assignments: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for MatchingError {}
