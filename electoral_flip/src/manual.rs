/*!

This is the long-form manual for `electoral_flip` and `evflip`.

## Input formats

The following formats are supported:
* `csv` Comma Separated Values with a header row
* `xlsx` Excel workbook, same columns as the CSV

### `csv`

One row per electoral unit and per year. A unit is a state, or a congressional district
for the states that split their electors (for example `ME-01` or `NE-02`, next to the
statewide `ME` and `NE` rows).

```text
year,abbr,D_votes,R_votes,T_votes,total_votes,electoral_votes
2016,PA,2926441,2970733,218228,6115402,20
2016,ME-02,154384,181177,24894,360455,1
```

All seven columns are required; the order does not matter and extra columns are ignored.
Numbers may be written as decimals (`12.0` is read as 12). Empty, negative or unreadable
numbers are read as 0, with a warning. An unreadable `year` stops the program, and so does a
unit that appears twice in the same year.

### `xlsx`

The same table in an Excel worksheet, headers in the first row. When the workbook has more
than one worksheet, the name of the worksheet must be provided.

## Outputs

The summary table has one row per year:

```text
year,winner_party,winner_ev,runner_party,runner_ev,need,classic_min_votes,classic_ev,classic_states,no_majority_min_votes,no_majority_ev,no_majority_states,total_ev
```

* `need` is the majority threshold, `floor(total_ev / 2) + 1` by default.
* `classic_*` describes the cheapest set of flips that hands the runner-up a majority.
* `no_majority_*` describes the cheapest set of flips that takes the majority away from the
  winner, without electing anyone.
* `*_min_votes` is `-1` when the scenario cannot happen (not enough electoral votes to flip).
* `*_ev` is the number of electoral votes flipped, which may exceed what is strictly needed.

The party codes are `D`, `R` and `O` (everything else).

The detail table lists the flipped units:

```text
year,mode,abbr,ev,votes_to_flip,pct_of_state_votes
```

`pct_of_state_votes` is `votes_to_flip` as a percentage of the unit's `total_votes`, rounded
to 3 decimals with ties to even (0.0625 is written 0.062). A year whose electoral votes add
up to more than 100000 is rejected.

## Method

A unit flips when half of its winner's margin over its local runner-up, plus one vote,
changes side. This is exact in a two-way race. In a three-way race, the flip is still priced
against the local runner-up, even if the scenario hands the unit to another party.

The units to flip are selected by a 0/1 knapsack that minimizes the popular votes moved
subject to a minimum number of electoral votes. Among equally cheap selections, the one
reported is determined by processing the units by ascending votes per electoral vote, then
by name.

## Configuration

All the options can be given on the command line, or in a JSON configuration file:

```json
{
  "inputFile": "presidential_margins.csv",
  "inputType": "csv",
  "summaryOutput": "flip_results.csv",
  "detailsOutput": "flip_details.csv",
  "jsonOutput": "flip_report.json",
  "startYear": 1972,
  "endYear": 2024,
  "majorityThreshold": 270
}
```

Relative paths are resolved from the directory of the configuration file. The options
passed on the command line take precedence. `majorityThreshold` replaces the
`floor(total_ev / 2) + 1` rule with a fixed number for every year.

 */
