mod model;

pub mod builder;
pub mod manual;
pub mod quick_start;

use log::{debug, info};

use std::collections::{BTreeMap, HashMap, HashSet};

pub use crate::model::*;

// **** Private structures ****

type RoundId = u32;

/// Interned candidate handle. Ids are positions in the declaration order,
/// so the derived `Ord` is exactly "declared earlier".
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
struct CandidateRef(u32);

/// The declared candidates of a poll, in declaration order.
///
/// Every tie in the tabulation (fewest votes at an elimination, most points
/// in the Borda tally) is resolved through this table rather than through
/// whatever order a hash container happens to iterate in.
struct CandidateRegistry {
    names: Vec<String>,
    by_name: HashMap<String, CandidateRef>,
}

impl CandidateRegistry {
    fn build(declared: &[String]) -> CandidateRegistry {
        let mut names: Vec<String> = Vec::new();
        let mut by_name: HashMap<String, CandidateRef> = HashMap::new();
        for name in declared.iter() {
            if !by_name.contains_key(name) {
                by_name.insert(name.clone(), CandidateRef(names.len() as u32));
                names.push(name.clone());
            }
        }
        CandidateRegistry { names, by_name }
    }

    fn lookup(&self, name: &str) -> Option<CandidateRef> {
        self.by_name.get(name).copied()
    }

    fn name(&self, cref: CandidateRef) -> &str {
        &self.names[cref.0 as usize]
    }

    fn all(&self) -> impl Iterator<Item = CandidateRef> {
        (0..self.names.len() as u32).map(CandidateRef)
    }
}

/// Reduces the ballots to interned candidate handles.
///
/// Unknown names are dropped here once and for all. Duplicate entries are
/// kept: the round scan stops at the first still-running candidate anyway,
/// and the Borda pass does its own deduplication.
fn resolve_ballots(registry: &CandidateRegistry, ballots: &[Ballot]) -> Vec<Vec<CandidateRef>> {
    ballots
        .iter()
        .map(|ballot| {
            ballot
                .rankings
                .iter()
                .filter_map(|name| registry.lookup(name))
                .collect()
        })
        .collect()
}

#[derive(Eq, PartialEq, Debug, Clone)]
struct RoundInternal {
    tally: BTreeMap<CandidateRef, u64>,
    eliminated: Option<CandidateRef>,
}

/// First-preference counts over the still-running candidates.
///
/// Every remaining candidate gets an entry, even with zero votes. A ballot
/// whose ranking holds no remaining candidate is exhausted for this round
/// and counts toward no one.
fn tally_first_preferences(
    prefs: &[Vec<CandidateRef>],
    remaining: &HashSet<CandidateRef>,
) -> BTreeMap<CandidateRef, u64> {
    let mut tally: BTreeMap<CandidateRef, u64> = remaining.iter().map(|&c| (c, 0)).collect();
    for ranking in prefs.iter() {
        if let Some(c) = ranking.iter().find(|c| remaining.contains(*c)) {
            *tally.entry(*c).or_insert(0) += 1;
        }
    }
    tally
}

/// The candidate to eliminate: fewest first-preference votes, with ties
/// going to the earliest declared. The tally iterates in declaration order,
/// so the first candidate found at the minimum settles the tie.
fn find_elimination_candidate(tally: &BTreeMap<CandidateRef, u64>) -> Option<CandidateRef> {
    let min_count = tally.values().min().copied()?;
    tally
        .iter()
        .find(|&(_, &count)| count == min_count)
        .map(|(&c, _)| c)
}

/// Runs the elimination rounds to termination.
///
/// The majority denominator is the full ballot count in every round,
/// exhausted ballots included.
fn run_rounds(
    prefs: &[Vec<CandidateRef>],
    registry: &CandidateRegistry,
    total_votes: u64,
) -> (Vec<RoundInternal>, Option<CandidateRef>) {
    let mut rounds: Vec<RoundInternal> = Vec::new();
    if total_votes == 0 {
        debug!("run_rounds: no ballots, nothing to tally");
        return (rounds, None);
    }
    let mut remaining: HashSet<CandidateRef> = registry.all().collect();
    loop {
        let round_id: RoundId = rounds.len() as u32 + 1;
        let tally = tally_first_preferences(prefs, &remaining);
        debug!("run_rounds: round {}: tally {:?}", round_id, tally);

        let majority = tally
            .iter()
            .find(|&(_, &count)| 2 * count > total_votes)
            .map(|(&c, &count)| (c, count));
        if let Some((winner, count)) = majority {
            info!(
                "run_rounds: round {}: {} has a majority ({} of {})",
                round_id,
                registry.name(winner),
                count,
                total_votes
            );
            rounds.push(RoundInternal {
                tally,
                eliminated: None,
            });
            return (rounds, Some(winner));
        }

        // Exhausted ballots can starve the majority test over the full
        // denominator; the last candidate standing wins regardless.
        if remaining.len() == 1 {
            let winner = remaining.iter().next().copied();
            rounds.push(RoundInternal {
                tally,
                eliminated: None,
            });
            return (rounds, winner);
        }

        match find_elimination_candidate(&tally) {
            Some(loser) => {
                debug!(
                    "run_rounds: round {}: eliminating {}",
                    round_id,
                    registry.name(loser)
                );
                remaining.remove(&loser);
                rounds.push(RoundInternal {
                    tally,
                    eliminated: Some(loser),
                });
            }
            // Not reachable with two or more remaining candidates.
            None => return (rounds, None),
        }
    }
}

/// Positional scoring over the unfiltered ballots, independent of the
/// elimination rounds.
///
/// A ballot ranking `k` valid candidates awards `k-1-i` points to the
/// candidate in position `i`. Duplicate entries keep their first position;
/// every declared candidate has an entry, if only at zero.
fn borda_tally(
    prefs: &[Vec<CandidateRef>],
    registry: &CandidateRegistry,
) -> BTreeMap<CandidateRef, u64> {
    let mut scores: BTreeMap<CandidateRef, u64> = registry.all().map(|c| (c, 0)).collect();
    for ranking in prefs.iter() {
        let mut seen: HashSet<CandidateRef> = HashSet::new();
        let ranked: Vec<CandidateRef> = ranking
            .iter()
            .filter(|&&c| seen.insert(c))
            .copied()
            .collect();
        let k = ranked.len() as u64;
        for (position, c) in ranked.iter().enumerate() {
            if let Some(score) = scores.get_mut(c) {
                *score += k - 1 - position as u64;
            }
        }
    }
    scores
}

fn borda_leader(scores: &BTreeMap<CandidateRef, u64>) -> Option<CandidateRef> {
    let max_score = scores.values().max().copied()?;
    scores
        .iter()
        .find(|&(_, &score)| score == max_score)
        .map(|(&c, _)| c)
}

// **** Public entry points ****

/// Checks the structural input contract on a poll definition: at least two
/// distinct, non-empty candidate names.
///
/// This is meant for boundary layers. [tabulate] itself does not fail and
/// will process whatever definition it is handed.
pub fn validate_poll(poll: &PollDefinition) -> Result<(), PollError> {
    if poll.candidates.iter().any(|name| name.is_empty()) {
        return Err(PollError::BlankCandidate);
    }
    let distinct: HashSet<&String> = poll.candidates.iter().collect();
    if distinct.len() < 2 {
        return Err(PollError::TooFewCandidates {
            distinct: distinct.len(),
        });
    }
    Ok(())
}

/// Computes the outcome of a poll from a snapshot of its ballots.
///
/// Runs the instant-runoff rounds to termination, then an independent Borda
/// tally over the same ballots, and merges both into one
/// [TabulationResult].
///
/// The function is total: rankings may be partial, contain duplicates or
/// name unknown candidates, and the ballot list may be empty. It is also a
/// pure function of its inputs. Identical snapshots produce identical
/// results, tie-breaks included, so it may be called concurrently without
/// coordination.
pub fn tabulate(poll: &PollDefinition, ballots: &[Ballot]) -> TabulationResult {
    info!(
        "tabulate: poll {:?}: {} declared candidates, {} ballots",
        poll.id,
        poll.candidates.len(),
        ballots.len()
    );
    let registry = CandidateRegistry::build(&poll.candidates);
    let prefs = resolve_ballots(&registry, ballots);
    let total_votes = ballots.len() as u64;

    let (rounds, winner) = run_rounds(&prefs, &registry, total_votes);
    let scores = borda_tally(&prefs, &registry);
    let borda_winner = if ballots.is_empty() {
        None
    } else {
        borda_leader(&scores)
    };

    TabulationResult {
        poll_id: poll.id.clone(),
        total_votes,
        rounds: rounds
            .iter()
            .enumerate()
            .map(|(idx, round)| Round {
                round_number: idx as u32 + 1,
                votes: round
                    .tally
                    .iter()
                    .map(|(&c, &count)| (registry.name(c).to_string(), count))
                    .collect(),
                eliminated: round.eliminated.map(|c| registry.name(c).to_string()),
            })
            .collect(),
        winner: winner.map(|c| registry.name(c).to_string()),
        borda_count: scores
            .iter()
            .map(|(&c, &score)| (registry.name(c).to_string(), score))
            .collect(),
        borda_winner: borda_winner.map(|c| registry.name(c).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SnapshotBuilder;

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn snapshot(candidates: &[&str], rankings: &[&[&str]]) -> (PollDefinition, Vec<Ballot>) {
        let mut builder = SnapshotBuilder::new("poll-1", "Test poll").candidates(candidates);
        for ranking in rankings.iter() {
            builder.add_ballot(ranking);
        }
        builder.snapshot().unwrap()
    }

    fn votes_of(round: &Round, name: &str) -> u64 {
        *round.votes.get(name).unwrap()
    }

    #[test]
    fn cyclic_preferences_break_toward_declaration_order() {
        init_logs();
        let (poll, ballots) = snapshot(
            &["A", "B", "C"],
            &[&["A", "B", "C"], &["B", "C", "A"], &["C", "A", "B"]],
        );
        let result = tabulate(&poll, &ballots);

        assert_eq!(result.total_votes, 3);
        assert_eq!(result.rounds.len(), 2);

        let round1 = &result.rounds[0];
        assert_eq!(round1.round_number, 1);
        assert_eq!(votes_of(round1, "A"), 1);
        assert_eq!(votes_of(round1, "B"), 1);
        assert_eq!(votes_of(round1, "C"), 1);
        // Three-way tie at the bottom: the earliest declared goes.
        assert_eq!(round1.eliminated, Some("A".to_string()));

        let round2 = &result.rounds[1];
        assert_eq!(round2.round_number, 2);
        assert_eq!(votes_of(round2, "B"), 2);
        assert_eq!(votes_of(round2, "C"), 1);
        assert_eq!(round2.eliminated, None);
        assert_eq!(result.winner, Some("B".to_string()));
    }

    #[test]
    fn immediate_majority_ends_after_one_round() {
        init_logs();
        let (poll, ballots) = snapshot(&["X", "Y"], &[&["X"]]);
        let result = tabulate(&poll, &ballots);

        assert_eq!(result.rounds.len(), 1);
        let round1 = &result.rounds[0];
        assert_eq!(votes_of(round1, "X"), 1);
        assert_eq!(votes_of(round1, "Y"), 0);
        assert_eq!(round1.eliminated, None);
        assert_eq!(result.winner, Some("X".to_string()));
    }

    #[test]
    fn empty_ballot_list_yields_no_rounds_and_no_winners() {
        let (poll, ballots) = snapshot(&["P", "Q"], &[]);
        let result = tabulate(&poll, &ballots);

        assert_eq!(result.total_votes, 0);
        assert!(result.rounds.is_empty());
        assert_eq!(result.winner, None);
        assert_eq!(result.borda_winner, None);
        // The score map still covers every declared candidate.
        assert_eq!(result.borda_count.get("P"), Some(&0));
        assert_eq!(result.borda_count.get("Q"), Some(&0));
    }

    #[test]
    fn unknown_and_duplicate_rankings_are_skipped() {
        let (poll, ballots) = snapshot(
            &["A", "B"],
            &[&["Zed", "A", "A", "B"], &["B", "Zed", "B"]],
        );
        let result = tabulate(&poll, &ballots);

        let round1 = &result.rounds[0];
        assert_eq!(votes_of(round1, "A"), 1);
        assert_eq!(votes_of(round1, "B"), 1);
        assert_eq!(result.winner, Some("B".to_string()));

        // Valid rankings after cleanup: [A, B] and [B].
        assert_eq!(result.borda_count.get("A"), Some(&1));
        assert_eq!(result.borda_count.get("B"), Some(&1));
        assert_eq!(result.borda_winner, Some("A".to_string()));
    }

    #[test]
    fn exhausted_ballots_count_toward_majority_denominator() {
        let (poll, ballots) = snapshot(&["A", "B"], &[&["A"], &["B"], &["Mystery"]]);
        let result = tabulate(&poll, &ballots);

        // Round 1: 1 vs 1 with one exhausted ballot; 2*1 is not > 3, so no
        // majority even though only two ballots are live.
        let round1 = &result.rounds[0];
        assert_eq!(votes_of(round1, "A"), 1);
        assert_eq!(votes_of(round1, "B"), 1);
        assert_eq!(round1.eliminated, Some("A".to_string()));

        // Round 2: B holds 1 of 3 and never reaches a majority; it wins as
        // the last candidate standing.
        let round2 = &result.rounds[1];
        assert_eq!(round2.votes.len(), 1);
        assert_eq!(votes_of(round2, "B"), 1);
        assert_eq!(round2.eliminated, None);
        assert_eq!(result.winner, Some("B".to_string()));
    }

    #[test]
    fn rounds_shrink_by_one_until_last_standing() {
        let (poll, ballots) = snapshot(&["P", "Q", "R"], &[&["Q"], &["R"]]);
        let result = tabulate(&poll, &ballots);

        assert_eq!(result.rounds.len(), 3);
        assert_eq!(result.rounds[0].votes.len(), 3);
        assert_eq!(result.rounds[1].votes.len(), 2);
        assert_eq!(result.rounds[2].votes.len(), 1);

        assert_eq!(result.rounds[0].eliminated, Some("P".to_string()));
        // Q and R tie at one vote each; Q was declared first.
        assert_eq!(result.rounds[1].eliminated, Some("Q".to_string()));
        assert_eq!(result.rounds[2].eliminated, None);
        assert_eq!(result.winner, Some("R".to_string()));
    }

    #[test]
    fn winner_is_never_a_previously_eliminated_candidate() {
        let (poll, ballots) = snapshot(
            &["A", "B", "C", "D"],
            &[
                &["A", "B"],
                &["A", "C"],
                &["B", "A"],
                &["B", "D"],
                &["C", "B"],
                &["D", "B"],
                &["D", "B"],
            ],
        );
        let result = tabulate(&poll, &ballots);

        let winner = result.winner.clone().unwrap();
        for round in result.rounds.iter() {
            assert_ne!(round.eliminated.as_deref(), Some(winner.as_str()));
        }
        assert_eq!(result.winner, Some("B".to_string()));
    }

    #[test]
    fn round_counts_sum_to_total_unless_ballots_exhaust() {
        let (poll, ballots) = snapshot(
            &["A", "B", "C", "D"],
            &[
                &["A", "B"],
                &["A", "C"],
                &["B", "A"],
                &["B", "D"],
                &["C", "B"],
                &["D", "B"],
                &["D", "B"],
            ],
        );
        let result = tabulate(&poll, &ballots);

        // The ballot [A, C] exhausts in round 3, once both its choices are
        // out; every earlier round accounts for all seven ballots.
        let sums: Vec<u64> = result
            .rounds
            .iter()
            .map(|round| round.votes.values().sum())
            .collect();
        assert_eq!(sums, vec![7, 7, 6]);
        for sum in sums {
            assert!(sum <= result.total_votes);
        }
    }

    #[test]
    fn borda_scores_follow_positional_weights() {
        let (poll, ballots) = snapshot(
            &["A", "B", "C"],
            &[
                &["A", "B", "C"],
                &["B", "Zed", "B", "A"],
                &["Zed"],
                &["C"],
            ],
        );
        let result = tabulate(&poll, &ballots);

        // Valid rankings: [A,B,C] (k=3), [B,A] (k=2), [] (k=0), [C] (k=1).
        assert_eq!(result.borda_count.get("A"), Some(&2));
        assert_eq!(result.borda_count.get("B"), Some(&2));
        assert_eq!(result.borda_count.get("C"), Some(&0));

        // Each ballot contributes k*(k-1)/2 points in total.
        let total: u64 = result.borda_count.values().sum();
        assert_eq!(total, 3 + 1 + 0 + 0);

        // A and B tie at two points; A was declared first.
        assert_eq!(result.borda_winner, Some("A".to_string()));
    }

    #[test]
    fn borda_tie_breaks_by_declaration_order() {
        let (poll, ballots) = snapshot(&["A", "B"], &[&["A", "B"], &["B", "A"]]);
        let result = tabulate(&poll, &ballots);

        // The runoff eliminates A on the tie and B wins; the Borda
        // cross-check lands on the same 1-1 tie and keeps A instead.
        assert_eq!(result.winner, Some("B".to_string()));
        assert_eq!(result.borda_count.get("A"), Some(&1));
        assert_eq!(result.borda_count.get("B"), Some(&1));
        assert_eq!(result.borda_winner, Some("A".to_string()));
    }

    #[test]
    fn identical_snapshots_tabulate_identically() {
        let (poll, ballots) = snapshot(
            &["A", "B", "C"],
            &[&["A", "B", "C"], &["B", "C", "A"], &["C", "A", "B"]],
        );
        let first = tabulate(&poll, &ballots);
        let second = tabulate(&poll, &ballots);
        assert_eq!(first, second);

        // Down to the serialized bytes: the output maps are ordered.
        let js_first = serde_json::to_string(&first).unwrap();
        let js_second = serde_json::to_string(&second).unwrap();
        assert_eq!(js_first, js_second);
    }

    #[test]
    fn validate_poll_enforces_the_input_contract() {
        let make = |candidates: &[&str]| {
            let builder = SnapshotBuilder::new("poll-1", "Test poll").candidates(candidates);
            builder.poll_definition()
        };

        assert_eq!(
            validate_poll(&make(&["Solo"])),
            Err(PollError::TooFewCandidates { distinct: 1 })
        );
        assert_eq!(
            validate_poll(&make(&["A", "A"])),
            Err(PollError::TooFewCandidates { distinct: 1 })
        );
        assert_eq!(
            validate_poll(&make(&["A", ""])),
            Err(PollError::BlankCandidate)
        );
        assert_eq!(validate_poll(&make(&["A", "B"])), Ok(()));
    }
}
