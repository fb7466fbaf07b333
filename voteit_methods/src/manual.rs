/*!

This is the long-form manual for `voteit_methods` and `voteit`.

## Methods

### `majority`

Each ballot names one candidate. The candidates with the highest count win.
When only ranked ballots are available, the first choice of each ranking is
used and blank rankings are ignored. The other names of a ranking do not count,
but each of them must still be a candidate, otherwise the tabulation fails. If
several candidates share the highest count, all of them are returned and the
outcome is `tied`. A candidate with no vote still appears in the tally with a
count of 0.

### `schulze`

Each ballot ranks some or all of the candidates, the most preferred first.
Candidates left out of a ranking are not compared against anything on that
ballot. The computation proceeds in three steps:

1. the pairwise preferences: for every ordered pair of candidates, the number
   of ballots that rank the first above the second;
2. the strongest paths: a pair starts with its preference count when it beats
   the reverse count, and 0 otherwise. A path is as strong as its weakest link
   and the strongest path between two candidates is kept;
3. the winners: a candidate wins unless some other candidate has a stronger
   path to it than it has back.

There is always at least one winner when there is at least one candidate.
Several winners are reported as `tied`, in candidate order.

## Input formats

### `csv`

One ballot per line, one column per rank. Blank cells are skipped. Optional
columns hold a ballot id and a ballot count (the number of identical ballots).
A count is a weight: the ballot is counted once, with that weight.
Header rows are skipped with `firstVoteRowIndex`.

```text
id,count,first,second,third
b1,12,Alice,Bob,Charlie
b2,3,Charlie,,Bob
```

### `msforms`

Results from Microsoft Forms when using the ranking widget, downloaded in
Excel (.xlsx) format. The ranking of each response is in a single cell, with
the choices separated by `;`. The first row holds the questions and is
skipped.

## Configuration

```json
{
  "outputSettings": {
    "contestName": "Board election",
    "outputDirectory": "output",
    "contestDate": "2026-10-16"
  },
  "cvrFileSources": [
    {
      "provider": "csv",
      "filePath": "votes.csv",
      "firstVoteColumnIndex": "C",
      "firstVoteRowIndex": 2,
      "idColumnIndex": 1,
      "countColumnIndex": 2
    }
  ],
  "candidates": [
    { "name": "Alice" },
    { "name": "Bob" },
    { "name": "Charlie", "excluded": true }
  ],
  "rules": { "method": "schulze" }
}
```

All the indices are 1-based. Columns may be given as Excel letters. File paths
are relative to the configuration file. Excluded candidates are removed from
the election and skipped on ballots. A name that is not a candidate fails the
tabulation, wherever it appears in a ranking and whatever the method.

## Command line

```bash
voteit --input votes.csv --method majority
voteit --config election.json --out summary.json
voteit --config election.json --reference expected_summary.json
```

Without a configuration and without `--candidates`, the candidates are the
names found in the ballots, in order of first appearance.

*/
