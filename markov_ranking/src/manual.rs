/*!

This is the long-form manual for `markov_ranking` and `markovrank`.

## The ranking method

Each respondent provides a full ranking of the same options. For every pair of options,
the ranking says which one is preferred. These pairwise preferences are counted in a
tally matrix:

- the entry `(loser, winner)` counts the respondents who ranked `winner` above `loser`
- the diagonal entry `(winner, winner)` counts all the pairwise wins of `winner`

The tally is then turned into a Markov chain over the options. The weight held by an
option flows to every option that was preferred over it, in proportion of the number of
respondents who preferred it, and stays on the option in proportion of its own wins.
The final score of an option is the share of the weight it holds once the chain has
settled, i.e. the stationary distribution of the chain. The scores sum to 1.

Example with three respondents ranking `A, B, C`, `A, B, C` and `B, C, A`:

|       | A  | B  | C  |
|-------|----|----|----|
| **A** | 4  | 1  | 1  |
| **B** | 2  | 4  | 0  |
| **C** | 2  | 3  | 1  |

The stationary distribution is `A: 50%`, `B: 40%`, `C: 10%`.

## Stationary solvers

* `powerIteration` (default): starts from the uniform distribution and applies the
  transition matrix until the largest change of a score is below `tolerance`. It fails
  after `maxIterations`.
* `directSolve`: solves the linear system for the eigenvector of the eigenvalue 1.

With complete rankings, every pair of options has a winner for at least one
respondent, so weight can always flow towards the options that win their comparisons
and the chain has a single stationary distribution. Before solving, the chain is still
checked for blocs that never exchange any weight, and the run fails with
`MultipleStationaryStates` listing them. Only a transition matrix that does not come
from a table of complete rankings can trigger this error.

Options that are never preferred over any other option get a score of 0.

## Input formats

Rankings must be complete: every respondent ranks every option exactly once. A row with
some rank cells left blank is rejected, and rows with all rank cells blank are skipped.

### `csv`

The export of a survey in Comma Separated Values. The columns that hold the ranks are
recognized by a `(#N)` marker in their header, as produced by the ranking questions of
Google Forms:

```text
Timestamp,Rank the options (#1),Rank the options (#2),Rank the options (#3)
2022/10/21 9:55:59,Alice,Bob,Charlie
2022/10/21 9:56:14,Bob,Charlie,Alice
```

The columns are ordered by their rank number, wherever they appear in the file. The other
columns are ignored. Alternatively, the headers of the rank columns can be listed
explicitly with the `--choices` flag, in rank order.

### `xlsx`

The same layout, in an Excel workbook. The first worksheet is used, unless a name is
provided with `--excel-worksheet-name`.

## Configuration

`markovrank` accepts a configuration file in JSON:

```text
{
  "outputSettings": {
    "contestName": "Team lunch",
    "contestDate": "2022-10-21"
  },
  "fileSources": [
    { "provider": "csv", "filePath": "votes.csv" }
  ],
  "rules": {
    "stationaryMethod": "powerIteration",
    "tolerance": 1e-12,
    "maxIterations": 100000
  }
}
```

File paths are relative to the configuration file. All the file sources are read and
their rankings concatenated. The `rules` section is optional.

FileSource options:
 - `provider` (string): `csv` or `xlsx`
 - `filePath` (string): the location of the file
 - `excelWorksheetName` (string, optional): for Excel-based inputs, the name of the worksheet.
 - `choices` (array of strings, optional): the headers of the rank columns, in rank order.

 */
