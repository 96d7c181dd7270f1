/*!

This is the long-form manual for `poll_tabulation` and `rankedpoll`.

## The snapshot format

`rankedpoll` consumes a poll snapshot: a single JSON document holding the
poll definition and the ballots cast for it. Snapshots are produced by
whatever layer stores the polls (a database export, an HTTP service dump, a
hand-written file).

```text
{
  "poll": {
    "id": "team-offsite",
    "title": "Offsite location",
    "description": "Pick one",
    "candidates": ["Lisbon", "Prague", "Oslo"],
    "createdAt": "2024-05-01T12:00:00Z",
    "expiresAt": "2024-06-01T12:00:00Z"
  },
  "ballots": [
    {
      "id": "b-1",
      "pollId": "team-offsite",
      "rankings": ["Prague", "Lisbon"],
      "votedAt": "2024-05-02T09:30:00Z"
    }
  ]
}
```

Notes:
- `description` and `expiresAt` are optional.
- `rankings` lists candidate names, most preferred first. It may be
  partial, repeat a name, or contain names that are not declared
  candidates; such entries are skipped during tabulation, never rejected.
- ballots whose `pollId` does not match the poll are dropped with a warning
  before tabulation.

A poll must declare at least two distinct, non-empty candidates. Snapshots
that do not are rejected before any tabulation runs.

## Tabulation rules

The winner is decided by single-winner instant-runoff voting:

1. Each round counts every ballot for its highest-ranked candidate that is
   still running. A ballot with no such candidate left is exhausted for
   that round and counts for nobody.
2. A candidate counted on more than half of **all** ballots wins
   immediately. The denominator stays at the full ballot count in every
   round; exhausted ballots are not subtracted from it.
3. Otherwise the candidate with the fewest votes is eliminated and the next
   round begins. When several candidates share the fewest votes, the one
   declared earliest in the poll is eliminated.
4. If eliminations leave a single candidate without the majority test ever
   passing, that candidate wins as the last one standing.

Every round is reported in the summary with its per-candidate counts and
the candidate it eliminated, so the outcome can be audited by hand.

## The Borda cross-check

Independently of the runoff, every tabulation also computes a Borda count
over the same ballots: a ballot ranking `k` valid candidates gives `k-1`
points to its first choice, `k-2` to the second, down to zero. Duplicate
and unknown entries are discarded before scoring. The summary reports the
accumulated score of every declared candidate and the Borda winner, with
score ties resolved toward the earliest declared candidate.

The two methods can disagree; when they do, that is usually a sign of a
closely contested poll worth a second look.

## The summary format

The summary is the [crate::TabulationResult] value serialized verbatim:

```text
{
  "pollId": "team-offsite",
  "totalVotes": 1,
  "rounds": [
    {
      "roundNumber": 1,
      "votes": { "Lisbon": 0, "Oslo": 0, "Prague": 1 }
    }
  ],
  "winner": "Prague",
  "bordaCount": { "Lisbon": 0, "Oslo": 0, "Prague": 1 },
  "bordaWinner": "Prague"
}
```

`winner`, `bordaWinner` and per-round `eliminated` are omitted when absent
(a poll with no ballots has no rounds and no winners). Maps are emitted in
candidate-name order, so tabulating the same snapshot twice produces
byte-identical summaries.

*/
