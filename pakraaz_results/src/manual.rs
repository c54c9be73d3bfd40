/*!

This is the long-form manual for `pakraaz_results` and the `pakraaz` command.

## Input formats

The command reads the responses of the voting API, saved as JSON files.

### Results

The response of `/api/vote/results/allcities`:

```json
{
  "success": true,
  "data": {
    "Lahore": { "Imran Ali": 120, "Sana Malik": 95 },
    "Karachi": { "Bilal Shah": 80 }
  }
}
```

Counts must be non-negative integers. The order of the candidates in each
city is kept, and it decides between candidates with the same number of votes
unless the `alphabetical` tie break is selected.

### Feedback

The response of `/api/feedbacks/all`: an object with a `feedbacks` array.
Each entry has an `_id`, an optional `voterID`, `name` and `city`, a `message`
(or `feedback`) and a `submittedAt` (or `timestamp`) date in the RFC 3339 format.
An entry may carry both names: a non-empty `message` is preferred over
`feedback`, and `timestamp` over `submittedAt`.

### Voter profile and candidates

The response of `/api/voter/profile` is a single object with `_id`, `voterID`,
`name` and `city`. The response of `/api/candidates` is an object with a
`data` array of candidates (`_id`, `name`, `party`, `symbol`, `city`).

## Configuration

A JSON file passed with `--config`:

```json
{
  "tiebreakMode": "alphabetical",
  "feedbackFilter": "recent",
  "outputPath": "report.json"
}
```

- `tiebreakMode`: `inputOrder` (default) or `alphabetical`
- `feedbackFilter`: `all` (default), `withID`, `anonymous` or `recent`.
  Unknown values select all the feedback.
- `outputPath`: where to write the report, `stdout` by default.

Options given on the command line take precedence over the file.

## Matching voters and candidates

City names are compared after normalization: surrounding spaces are removed,
letters are lowercased, `saint` becomes `st`, runs of spaces are collapsed and
every character that is not a letter or a space is dropped. `" St. John's "`
and `"saint johns"` both become `"st johns"`.

*/
