// ********* Input data structures ***********

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The definition of a poll: its declared candidates and metadata.
///
/// The order of `candidates` is authoritative: every tie (fewest votes in an
/// elimination, most points in the Borda tally) is resolved in favor of the
/// candidate declared earliest.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PollDefinition {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub candidates: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "expiresAt", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// One voter's ballot: an ordered list of candidate names, most preferred
/// first.
///
/// Rankings do not need to be complete, unique or even valid candidate
/// names. The tabulation skips over entries it cannot use instead of
/// rejecting the ballot.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Ballot {
    pub id: String,
    #[serde(rename = "pollId")]
    pub poll_id: String,
    pub rankings: Vec<String>,
    #[serde(rename = "votedAt")]
    pub voted_at: DateTime<Utc>,
}

// ******** Output data structures *********

/// First-preference counts for one elimination round.
///
/// `votes` covers every candidate still running in that round, including
/// those with a count of zero. `eliminated` is absent only on the terminal
/// round.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    #[serde(rename = "roundNumber")]
    pub round_number: u32,
    pub votes: BTreeMap<String, u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eliminated: Option<String>,
}

/// The complete outcome of a tabulation.
///
/// The value is intended to be serialized as-is by the caller; all maps are
/// ordered so that identical inputs produce identical output bytes.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TabulationResult {
    #[serde(rename = "pollId")]
    pub poll_id: String,
    #[serde(rename = "totalVotes")]
    pub total_votes: u64,
    pub rounds: Vec<Round>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    #[serde(rename = "bordaCount")]
    pub borda_count: BTreeMap<String, u64>,
    #[serde(rename = "bordaWinner", skip_serializing_if = "Option::is_none")]
    pub borda_winner: Option<String>,
}

// ********* Errors **********

/// Structural problems with a poll definition.
///
/// These are boundary errors: callers are expected to reject such polls
/// before tabulating. The tabulation itself never fails.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum PollError {
    /// Fewer than two distinct, non-empty candidate names were declared.
    TooFewCandidates { distinct: usize },
    /// A declared candidate name is empty.
    BlankCandidate,
}

impl Error for PollError {}

impl Display for PollError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PollError::TooFewCandidates { distinct } => {
                write!(f, "a poll needs at least 2 distinct candidates, got {}", distinct)
            }
            PollError::BlankCandidate => write!(f, "a declared candidate name is empty"),
        }
    }
}
