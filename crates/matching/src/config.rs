use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::MatchingError;
use crate::model::{ForbiddenEdge, Participant};

/// Longest accepted couple key, after trimming.
pub const MAX_COUPLE_KEY_LEN: usize = 100;

/// Most givers a single rematch request may name.
pub const MAX_REMATCH_GIVERS: usize = 100;

// ---------------------------------------------------------------------------
// Engine settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchingConfig {
    /// Run the multi-attempt search that minimizes mutual pairs.
    #[serde(default = "default_avoid_reciprocal")]
    pub avoid_reciprocal: bool,
    /// Attempts of the minimizer, each with its own derived seed.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

fn default_avoid_reciprocal() -> bool {
    true
}

fn default_max_attempts() -> usize {
    20
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            avoid_reciprocal: default_avoid_reciprocal(),
            max_attempts: default_max_attempts(),
        }
    }
}

// ---------------------------------------------------------------------------
// Group file
// ---------------------------------------------------------------------------

/// A group as described in a `.group.toml` file.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupConfig {
    pub name: String,
    #[serde(default)]
    pub members: Vec<MemberConfig>,
    #[serde(default)]
    pub forbidden: Vec<ForbiddenPairConfig>,
    #[serde(default)]
    pub matching: MatchingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemberConfig {
    pub id: String,
    #[serde(default)]
    pub couple: Option<String>,
}

impl MemberConfig {
    /// Trimmed couple key; blank means none.
    pub fn couple_key(&self) -> Option<&str> {
        self.couple
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForbiddenPairConfig {
    pub giver: String,
    pub receiver: String,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl GroupConfig {
    pub fn from_toml(input: &str) -> Result<Self, MatchingError> {
        let config: GroupConfig =
            toml::from_str(input).map_err(|e| MatchingError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, MatchingError> {
        let input = std::fs::read_to_string(path)
            .map_err(|e| MatchingError::Io(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml(&input)
    }

    pub fn validate(&self) -> Result<(), MatchingError> {
        if self.members.len() < 2 {
            return Err(MatchingError::GroupTooSmall {
                members: self.members.len(),
            });
        }

        let mut ids = HashSet::new();
        for (i, member) in self.members.iter().enumerate() {
            if member.id.trim().is_empty() {
                return Err(MatchingError::ConfigValidation(format!(
                    "member #{}: id must not be empty",
                    i + 1
                )));
            }
            if !ids.insert(member.id.as_str()) {
                return Err(MatchingError::DuplicateMember(member.id.clone()));
            }
            if let Some(key) = member.couple_key() {
                if key.chars().count() > MAX_COUPLE_KEY_LEN {
                    return Err(MatchingError::ConfigValidation(format!(
                        "member '{}': couple key longer than {MAX_COUPLE_KEY_LEN} characters",
                        member.id
                    )));
                }
            }
        }

        let mut pairs = HashSet::new();
        for pair in &self.forbidden {
            for id in [&pair.giver, &pair.receiver] {
                if !ids.contains(id.as_str()) {
                    return Err(MatchingError::UnknownMember {
                        context: "forbidden pair".into(),
                        id: id.clone(),
                    });
                }
            }
            if pair.giver == pair.receiver {
                return Err(MatchingError::ConfigValidation(format!(
                    "forbidden pair '{0}' -> '{0}': a member cannot be forbidden from themselves",
                    pair.giver
                )));
            }
            if !pairs.insert((pair.giver.as_str(), pair.receiver.as_str())) {
                return Err(MatchingError::DuplicateForbiddenPair {
                    giver: pair.giver.clone(),
                    receiver: pair.receiver.clone(),
                });
            }
        }

        if self.matching.max_attempts == 0 {
            return Err(MatchingError::ConfigValidation(
                "matching.max_attempts must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Check a list of givers to redraw against this group.
    pub fn validate_rematch(&self, givers: &[String]) -> Result<(), MatchingError> {
        if givers.is_empty() {
            return Err(MatchingError::InvalidRematch("no giver to rematch".into()));
        }
        if givers.len() > MAX_REMATCH_GIVERS {
            return Err(MatchingError::InvalidRematch(format!(
                "at most {MAX_REMATCH_GIVERS} givers per rematch, got {}",
                givers.len()
            )));
        }

        let mut seen = HashSet::new();
        for giver in givers {
            if !self.members.iter().any(|m| &m.id == giver) {
                return Err(MatchingError::UnknownMember {
                    context: "rematch".into(),
                    id: giver.clone(),
                });
            }
            if !seen.insert(giver.as_str()) {
                return Err(MatchingError::InvalidRematch(format!(
                    "giver '{giver}' listed twice"
                )));
            }
        }
        Ok(())
    }

    /// Members as engine participants. Everyone is both giver and receiver.
    pub fn participants(&self) -> Vec<Participant> {
        self.members
            .iter()
            .map(|m| Participant {
                id: m.id.clone(),
                couple_key: m.couple_key().map(str::to_string),
            })
            .collect()
    }

    pub fn forbidden_edges(&self) -> Vec<ForbiddenEdge> {
        self.forbidden
            .iter()
            .map(|p| ForbiddenEdge::new(p.giver.as_str(), p.receiver.as_str()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
