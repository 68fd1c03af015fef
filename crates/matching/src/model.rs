use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A member of the draw. The same pool normally serves as givers and receivers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub couple_key: Option<String>,
}

impl Participant {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            couple_key: None,
        }
    }

    pub fn in_couple(id: impl Into<String>, couple_key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            couple_key: Some(couple_key.into()),
        }
    }

    /// The couple key, if one is set and non-empty.
    pub fn couple(&self) -> Option<&str> {
        self.couple_key.as_deref().filter(|k| !k.is_empty())
    }

    /// Two participants sharing a non-empty couple key never give to each other.
    pub fn is_couple_of(&self, other: &Participant) -> bool {
        matches!((self.couple(), other.couple()), (Some(a), Some(b)) if a == b)
    }
}

/// Explicit directed prohibition: `giver_id` must not give to `receiver_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForbiddenEdge {
    pub giver_id: String,
    pub receiver_id: String,
}

impl ForbiddenEdge {
    pub fn new(giver_id: impl Into<String>, receiver_id: impl Into<String>) -> Self {
        Self {
            giver_id: giver_id.into(),
            receiver_id: receiver_id.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Giver id -> receiver id. Ordered by giver id so serialized output is stable.
pub type Matching = BTreeMap<String, String>;

/// One row of a matching, as persisted by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub giver_id: String,
    pub receiver_id: String,
}
