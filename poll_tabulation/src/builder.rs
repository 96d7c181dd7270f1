pub use crate::model::*;

use chrono::Utc;

/// A builder for assembling a poll snapshot in code.
///
/// This is the in-process counterpart of a stored poll: it wires the poll
/// identifier into every ballot and hands back values ready for
/// [crate::tabulate].
///
/// ```
/// use poll_tabulation::builder::SnapshotBuilder;
/// # use poll_tabulation::PollError;
///
/// let mut builder = SnapshotBuilder::new("fruit", "Favorite fruit")
///     .candidates(&["Apple", "Banana"]);
/// builder.add_ballot(&["Apple", "Banana"]);
/// builder.add_ballot(&["Apple"]);
/// builder.add_ballot(&["Banana"]);
///
/// let (poll, ballots) = builder.snapshot()?;
/// let result = poll_tabulation::tabulate(&poll, &ballots);
/// assert_eq!(result.winner, Some("Apple".to_string()));
/// # Ok::<(), PollError>(())
/// ```
pub struct SnapshotBuilder {
    poll: PollDefinition,
    ballots: Vec<Ballot>,
}

impl SnapshotBuilder {
    pub fn new(id: &str, title: &str) -> SnapshotBuilder {
        SnapshotBuilder {
            poll: PollDefinition {
                id: id.to_string(),
                title: title.to_string(),
                description: String::new(),
                candidates: Vec::new(),
                created_at: Utc::now(),
                expires_at: None,
            },
            ballots: Vec::new(),
        }
    }

    pub fn description(mut self, description: &str) -> SnapshotBuilder {
        self.poll.description = description.to_string();
        self
    }

    /// Declares the candidates, in the order that settles all tie-breaks.
    pub fn candidates(mut self, names: &[&str]) -> SnapshotBuilder {
        self.poll.candidates = names.iter().map(|name| name.to_string()).collect();
        self
    }

    /// Adds a ballot with the given ranking, most preferred first.
    ///
    /// Rankings are taken as-is. Partial, duplicated or unknown entries are
    /// left for the tabulation to neutralize.
    pub fn add_ballot(&mut self, rankings: &[&str]) {
        let id = format!("ballot-{}", self.ballots.len() + 1);
        self.ballots.push(Ballot {
            id,
            poll_id: self.poll.id.clone(),
            rankings: rankings.iter().map(|name| name.to_string()).collect(),
            voted_at: Utc::now(),
        });
    }

    /// The poll definition as declared so far, without validation.
    pub fn poll_definition(&self) -> PollDefinition {
        self.poll.clone()
    }

    /// Validates the poll definition and returns the snapshot.
    pub fn snapshot(&self) -> Result<(PollDefinition, Vec<Ballot>), PollError> {
        crate::validate_poll(&self.poll)?;
        Ok((self.poll.clone(), self.ballots.clone()))
    }
}
