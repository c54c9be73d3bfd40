/*!

Result aggregation for the PakRaaz electronic voting system.

The voting backend counts the votes; this crate turns its answers into the
figures the election commission and the presiding officers look at:

- the ranking of the candidates in each constituency, with the winner, the
  loser and the share of each candidate ([`rank`], [`percentage`]);
- the summary over all the cities ([`summarize`]);
- the candidates a voter may vote for, matched on the city of the voter
  ([`normalize_city`], [`candidates_for_city`]);
- the filters and counters of the feedback dashboard ([`filter_feedback`],
  [`feedback_stats`]).

All the functions are pure: they borrow their inputs and return new values.

```
use pakraaz_results::*;

let results: CityResults = serde_json::from_str(
    r#"{"Lahore": {"A": 100, "B": 50}, "Karachi": {"A": 30, "C": 70}}"#,
).unwrap();

let stats = summarize(&results);
assert_eq!(stats.total_votes, 250);
assert_eq!(stats.avg_votes, 125);

let lahore = rank(results.get("Lahore").unwrap(), TieBreakMode::InputOrder);
assert_eq!(lahore.winner.as_deref(), Some("A"));
```
*/
mod city;
mod config;
mod feedback;
pub mod manual;
mod ranking;
mod summary;

pub use crate::city::*;
pub use crate::config::*;
pub use crate::feedback::*;
pub use crate::ranking::*;
pub use crate::summary::*;
