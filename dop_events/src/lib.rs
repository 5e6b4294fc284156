/*!
Rebuilds the timeline of a distribution of preferences (DOP) from the tally
rows published after an election.

The published files give, for every count, the standing of every candidate.
This crate walks these rows in order and turns them into a sequence of events:
the count itself, the transfers of papers between candidates, the exclusions
and the elections.

Two kinds of counts are supported:
- a single-seat preferential count ([`house`]), with four rows per candidate
  and per count
- a multi-seat single transferable vote count ([`senate`]), with one row per
  candidate and per count, grouped by ticket

The rows are expected in the order of the published files: the grouping
functions never sort, they only split the input into consecutive runs.

```
use dop_events::*;

let fields = [
    "NSW", "101", "Banks", "0", "1", "1", "ALPHA", "Ann", "RP", "Red Party",
    "Y", "N", "Preference Count", "600",
];
let mut rows = vec![parse_house_row(&fields)?];
for (calc, value) in [("Preference Percent", "60.0"), ("Transfer Count", "0"), ("Transfer Percent", "0")] {
    let mut f = fields;
    f[12] = calc;
    f[13] = value;
    rows.push(parse_house_row(&f)?);
}
let divisions = house::convert_house(&rows)?;
assert!(matches!(divisions[0].method, Method::FirstPreferences { .. }));
# Ok::<(), DopError>(())
```
*/

mod config;
mod events;
pub mod grouping;
pub mod house;
mod normalize;
pub mod senate;

pub use crate::config::*;
pub use crate::events::*;
pub use crate::normalize::*;
