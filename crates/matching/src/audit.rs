//! Draw records and after-the-fact checks of a matching.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MatchingError;
use crate::model::{Assignment, ForbiddenEdge, Matching, Participant};

// ---------------------------------------------------------------------------
// Draw record
// ---------------------------------------------------------------------------

/// What gets stored about a draw: enough to replay it from the same seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub group: String,
    pub seed: String,
    pub engine_version: String,
    pub run_at: String,
    pub assignments_count: usize,
    /// Givers whose receiver gives back to them.
    pub reciprocal_givers: usize,
    /// Givers redrawn by a partial rematch.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rematched: Vec<String>,
    pub assignments: Vec<Assignment>,
}

impl DrawRecord {
    pub fn new(group: &str, seed: &str, matching: &Matching) -> Self {
        Self {
            group: group.to_string(),
            seed: seed.to_string(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            assignments_count: matching.len(),
            reciprocal_givers: reciprocal_givers(matching),
            rematched: Vec::new(),
            assignments: assignments(matching),
        }
    }

    pub fn with_rematched(mut self, givers: &[String]) -> Self {
        self.rematched = givers.to_vec();
        self
    }

    pub fn matching(&self) -> Matching {
        self.assignments
            .iter()
            .map(|a| (a.giver_id.clone(), a.receiver_id.clone()))
            .collect()
    }
}

/// Givers `g` with `m[m[g]] == g`. A mutual pair counts twice.
pub fn reciprocal_givers(matching: &Matching) -> usize {
    matching
        .iter()
        .filter(|(giver, receiver)| matching.get(*receiver) == Some(*giver))
        .count()
}

/// Rows in giver-id order.
pub fn assignments(matching: &Matching) -> Vec<Assignment> {
    matching
        .iter()
        .map(|(giver, receiver)| Assignment {
            giver_id: giver.clone(),
            receiver_id: receiver.clone(),
        })
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredMatching {
    Record(DrawRecord),
    Map(Matching),
}

/// Read a matching stored either as a [`DrawRecord`] or as a bare
/// `{ "giver": "receiver" }` object.
pub fn parse_matching_json(input: &str) -> Result<Matching, MatchingError> {
    let stored: StoredMatching = serde_json::from_str(input).map_err(|e| {
        MatchingError::AssignmentsParse(format!(
            "expected a draw record or a giver -> receiver map: {e}"
        ))
    })?;
    Ok(match stored {
        StoredMatching::Record(record) => record.matching(),
        StoredMatching::Map(map) => map,
    })
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    UnknownGiver(String),
    UnknownReceiver { giver: String, receiver: String },
    Unassigned(String),
    SelfAssigned(String),
    SameCouple { giver: String, receiver: String },
    Forbidden { giver: String, receiver: String },
    ReceiverReused { receiver: String, givers: Vec<String> },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownGiver(id) => write!(f, "'{id}' is not a giver"),
            Self::UnknownReceiver { giver, receiver } => {
                write!(f, "'{giver}' gives to '{receiver}', who is not a receiver")
            }
            Self::Unassigned(id) => write!(f, "'{id}' has no receiver"),
            Self::SelfAssigned(id) => write!(f, "'{id}' gives to themselves"),
            Self::SameCouple { giver, receiver } => {
                write!(f, "'{giver}' gives to '{receiver}' in the same couple")
            }
            Self::Forbidden { giver, receiver } => {
                write!(f, "'{giver}' -> '{receiver}' is a forbidden pair")
            }
            Self::ReceiverReused { receiver, givers } => {
                write!(f, "'{receiver}' receives from {}", givers.join(", "))
            }
        }
    }
}

/// Check `matching` against the draw rules. Empty means valid.
///
/// Violations are listed givers first (in `givers` order), then per
/// assignment in giver-id order, then reused receivers.
pub fn verify_matching(
    matching: &Matching,
    givers: &[Participant],
    receivers: &[Participant],
    forbidden: &[ForbiddenEdge],
) -> Vec<Violation> {
    let giver_by_id: HashMap<&str, &Participant> =
        givers.iter().map(|g| (g.id.as_str(), g)).collect();
    let receiver_by_id: HashMap<&str, &Participant> =
        receivers.iter().map(|r| (r.id.as_str(), r)).collect();
    let forbidden: HashSet<(&str, &str)> = forbidden
        .iter()
        .map(|e| (e.giver_id.as_str(), e.receiver_id.as_str()))
        .collect();

    let mut violations = Vec::new();

    let mut seen = HashSet::new();
    for giver in givers {
        if seen.insert(giver.id.as_str()) && !matching.contains_key(&giver.id) {
            violations.push(Violation::Unassigned(giver.id.clone()));
        }
    }

    let mut givers_of: HashMap<&str, Vec<String>> = HashMap::new();
    for (giver_id, receiver_id) in matching {
        givers_of
            .entry(receiver_id.as_str())
            .or_default()
            .push(giver_id.clone());

        let Some(giver) = giver_by_id.get(giver_id.as_str()) else {
            violations.push(Violation::UnknownGiver(giver_id.clone()));
            continue;
        };
        let Some(receiver) = receiver_by_id.get(receiver_id.as_str()) else {
            violations.push(Violation::UnknownReceiver {
                giver: giver_id.clone(),
                receiver: receiver_id.clone(),
            });
            continue;
        };

        if giver_id == receiver_id {
            violations.push(Violation::SelfAssigned(giver_id.clone()));
        } else if giver.is_couple_of(receiver) {
            violations.push(Violation::SameCouple {
                giver: giver_id.clone(),
                receiver: receiver_id.clone(),
            });
        }
        if forbidden.contains(&(giver_id.as_str(), receiver_id.as_str())) {
            violations.push(Violation::Forbidden {
                giver: giver_id.clone(),
                receiver: receiver_id.clone(),
            });
        }
    }

    let mut reused: Vec<(&str, Vec<String>)> = givers_of
        .into_iter()
        .filter(|(_, givers)| givers.len() > 1)
        .collect();
    reused.sort();
    violations.extend(reused.into_iter().map(|(receiver, givers)| Violation::ReceiverReused {
        receiver: receiver.to_string(),
        givers,
    }));

    violations
}
