/*!

# Quick start

This example runs a small poll end to end with the `rankedpoll` command
line tool. All it takes is one JSON file.

**Writing a snapshot** Save the following as `lunch.json`. It declares
three candidates and four ballots (see the [manual](crate::manual) for the
full format):

```text
{
  "poll": {
    "id": "lunch",
    "title": "Team lunch",
    "candidates": ["Ramen", "Tacos", "Pizza"],
    "createdAt": "2024-05-01T12:00:00Z"
  },
  "ballots": [
    { "id": "b-1", "pollId": "lunch", "rankings": ["Ramen", "Pizza"], "votedAt": "2024-05-01T12:10:00Z" },
    { "id": "b-2", "pollId": "lunch", "rankings": ["Tacos", "Ramen"], "votedAt": "2024-05-01T12:11:00Z" },
    { "id": "b-3", "pollId": "lunch", "rankings": ["Pizza", "Ramen"], "votedAt": "2024-05-01T12:12:00Z" },
    { "id": "b-4", "pollId": "lunch", "rankings": ["Ramen"], "votedAt": "2024-05-01T12:13:00Z" }
  ]
}
```

**Tabulating** Run:

```bash
rankedpoll --input lunch.json
```

The summary of the election is written to the standard output: the
round-by-round counts, the instant-runoff winner and the Borda cross-check.
Here `Ramen` starts with two of four first preferences (not a majority),
`Tacos` is eliminated, and its ballot transfers to `Ramen` which then holds
three of four votes and wins.

**Keeping the summary** Use `--out results.json` to write the summary to a
file instead, and `--verbose` to see each round as it is tallied.

**Checking against a reference** If you already have a trusted summary for
the same snapshot (say, from a previous run), pass it with
`--reference trusted.json`: the program diffs its own output against the
reference and fails if they differ in any way.

If you want to drive the tabulation from your own Rust code instead, start
with [crate::builder::SnapshotBuilder] and [crate::tabulate].

*/
