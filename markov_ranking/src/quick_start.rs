/*!

# Quick start with Google Forms

This example runs a preference survey end to end, using Google Forms to collect the rankings.

We would like to rank 3 options for a team lunch: Pizza, Sushi and Tacos.

**Creating a poll** Create a new Form in Google Drive and add one question of the
**Multiple Choice Grid** type. The rows are the ranks, each labeled with a `(#N)` marker
(`First choice (#1)`, `Second choice (#2)`, `Third choice (#3)`), the columns are the options.
Enable "Require a response in each row" and "Limit to one response per column": every
respondent must rank every option exactly once.

**Getting the results** After the poll is ended, open the `Responses` tab and download the
responses in the CSV format. The file should look like the following:

```text
Timestamp,Where do we go? [First choice (#1)],Where do we go? [Second choice (#2)],Where do we go? [Third choice (#3)]
2022/10/21 9:55:59,Pizza,Sushi,Tacos
2022/10/21 9:56:14,Pizza,Sushi,Tacos
2022/10/21 9:57:02,Sushi,Tacos,Pizza
```

Run `markovrank` with the following command (the name of the file may differ for you):

```bash
markovrank -i 'Where do we go.csv'
```

You should see the ranking of the options:

```text
Pizza: 50.00%
Sushi: 40.00%
Tacos: 10.00%
```

**Saving the output** The ranking can also be written in the JSON format with the `--out` flag:

```bash
markovrank -i 'Where do we go.csv' --out lunch_results.json
```

It is the end of this quick start. You can explore the following sections:
- the [manual](../manual/index.html) describes the method, the input formats and the
  configuration file.
- the `--reference` flag checks that a new run still matches a previously saved output.

*/
