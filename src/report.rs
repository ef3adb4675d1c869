//! Validation reports.
//!
//! A [`BoardReport`] is a flat, serializable summary of a validated board
//! (or of why it failed), printed by `boardcheck` as text or JSON.

use core::fmt;

use serde::Serialize;

use crate::error::BoardError;
use crate::resolver::ResolvedBoard;

#[derive(Debug, Clone, Serialize)]
pub struct AliasRow {
    pub path: String,
    pub target: String,
    pub pin: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupRow {
    pub pin: String,
    pub members: Vec<String>,
    pub roles: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum Outcome {
    Valid {
        aliases: Vec<AliasRow>,
        groups: Vec<GroupRow>,
        shared_targets: Vec<String>,
    },
    Invalid {
        errors: Vec<String>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardReport {
    pub board: String,
    pub chip: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl BoardReport {
    pub fn valid(board: &ResolvedBoard) -> Self {
        let aliases = board
            .bindings()
            .into_iter()
            .map(|b| AliasRow {
                path: b.path.to_string(),
                target: b.target.to_string(),
                pin: b.pin.map(|p| p.to_string()),
            })
            .collect();
        let groups = board
            .exclusivity_groups()
            .iter()
            .map(|g| GroupRow {
                pin: g.pin.to_string(),
                members: g.members.iter().map(ToString::to_string).collect(),
                roles: g.roles.to_string(),
            })
            .collect();
        let shared_targets = board
            .shared_targets()
            .iter()
            .map(|s| {
                let paths: Vec<String> = s.paths.iter().map(ToString::to_string).collect();
                format!("{} <- {}", s.resource, paths.join(", "))
            })
            .collect();
        Self {
            board: board.name().to_owned(),
            chip: board.chip().to_owned(),
            outcome: Outcome::Valid {
                aliases,
                groups,
                shared_targets,
            },
        }
    }

    pub fn invalid(board: &str, chip: &str, errors: &[BoardError]) -> Self {
        Self {
            board: board.to_owned(),
            chip: chip.to_owned(),
            outcome: Outcome::Invalid {
                errors: errors.iter().map(ToString::to_string).collect(),
            },
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.outcome, Outcome::Valid { .. })
    }
}

impl fmt::Display for BoardReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Valid {
                aliases,
                groups,
                shared_targets,
            } => {
                writeln!(
                    f,
                    "{} ({}): ok, {} aliases, {} exclusivity groups",
                    self.board,
                    self.chip,
                    aliases.len(),
                    groups.len()
                )?;
                for g in groups {
                    writeln!(f, "  {} {}: {}", g.pin, g.roles, g.members.join(", "))?;
                }
                for s in shared_targets {
                    writeln!(f, "  shared: {s}")?;
                }
            }
            Outcome::Invalid { errors } => {
                writeln!(f, "{} ({}): FAILED, {} errors", self.board, self.chip, errors.len())?;
                for e in errors {
                    writeln!(f, "  {e}")?;
                }
            }
        }
        Ok(())
    }
}
